use super::filter::{ItemFilter, ItemList};
use super::types::{EquipmentSlot, Item};
use std::collections::BTreeMap;

/// Items grouped by equipment slot, each group ranked by power, highest first.
#[derive(Debug, Clone, Default)]
pub struct SlotGroups<'a> {
    groups: BTreeMap<EquipmentSlot, ItemList<'a>>,
}

impl<'a> SlotGroups<'a> {
    /// Ranked candidates for `slot`; empty when nothing fits.
    pub fn get(&self, slot: EquipmentSlot) -> &[&'a Item] {
        self.groups
            .get(&slot)
            .map(ItemList::as_slice)
            .unwrap_or(&[])
    }
}

/// Groups `items` per slot and sorts every group by descending power.
///
/// The sort is stable, so equal-power items keep their input order.
pub fn group_and_sort_gear<'a>(items: &ItemList<'a>) -> SlotGroups<'a> {
    let groups = EquipmentSlot::ALL
        .into_iter()
        .map(|slot| (slot, sort_gear_bucket(slot, items)))
        .collect();
    SlotGroups { groups }
}

pub fn sort_gear_bucket<'a>(slot: EquipmentSlot, items: &ItemList<'a>) -> ItemList<'a> {
    let mut result = items.filter(ItemFilter::Slot(slot));
    result.items_mut().sort_by(|a, b| b.power.cmp(&a.power));
    result
}
