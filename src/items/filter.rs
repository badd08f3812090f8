//! Composable item filters over a borrowed view of a snapshot.

use super::types::{ClassType, EquipmentSlot, Item, Owner, TierType};

/// A single predicate, parameterised by the value it compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFilter<'f> {
    Slot(EquipmentSlot),
    BucketHash(u32),
    ItemHash(u32),
    Tier(TierType),
    NotTier(TierType),
    Owner(Owner<'f>),
    /// Usable by the class: class-restricted gear of that class, or unrestricted gear.
    UsableBy(ClassType),
}

impl ItemFilter<'_> {
    pub fn matches(&self, item: &Item) -> bool {
        match *self {
            ItemFilter::Slot(slot) => item.bucket_hash == slot.bucket_hash(),
            ItemFilter::BucketHash(hash) => item.bucket_hash == hash,
            ItemFilter::ItemHash(hash) => item.item_hash == hash,
            ItemFilter::Tier(tier) => item.tier == tier,
            ItemFilter::NotTier(tier) => item.tier != tier,
            ItemFilter::Owner(owner) => item.owner() == owner,
            ItemFilter::UsableBy(class) => class.can_use(item.class_type),
        }
    }
}

/// Ordered, borrowed subset of a snapshot's items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemList<'a> {
    items: Vec<&'a Item>,
}

impl<'a> ItemList<'a> {
    pub fn new(items: Vec<&'a Item>) -> Self {
        Self { items }
    }

    /// Items matching `filter`, in their original relative order.
    pub fn filter(&self, filter: ItemFilter<'_>) -> ItemList<'a> {
        ItemList {
            items: self
                .items
                .iter()
                .copied()
                .filter(|item| filter.matches(item))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Item> + '_ {
        self.items.iter().copied()
    }

    pub fn as_slice(&self) -> &[&'a Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities, counting each instanced item once.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity.max(1)).sum()
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<&'a Item> {
        &mut self.items
    }
}

impl<'a> FromIterator<&'a Item> for ItemList<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for ItemList<'a> {
    type Item = &'a Item;
    type IntoIter = std::vec::IntoIter<&'a Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
