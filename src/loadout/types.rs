use crate::items::types::{EquipmentSlot, Item};
use std::collections::BTreeMap;

/// Chosen item per equipment slot, borrowed from the snapshot it was planned on.
///
/// A slot with no entry could not be optimized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loadout<'a> {
    slots: BTreeMap<EquipmentSlot, &'a Item>,
}

impl<'a> Loadout<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&'a Item> {
        self.slots.get(&slot).copied()
    }

    pub fn set(&mut self, slot: EquipmentSlot, item: Option<&'a Item>) {
        match item {
            Some(item) => {
                self.slots.insert(slot, item);
            }
            None => {
                self.slots.remove(&slot);
            }
        }
    }

    /// Assigned slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlot, &'a Item)> + '_ {
        self.slots.iter().map(|(slot, item)| (*slot, *item))
    }

    pub fn unassigned_slots(&self) -> Vec<EquipmentSlot> {
        EquipmentSlot::ALL
            .into_iter()
            .filter(|slot| !self.slots.contains_key(slot))
            .collect()
    }

    pub fn assigned_count(&self) -> usize {
        self.slots.len()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.slots.values().any(|chosen| chosen.same_item(item))
    }

    pub fn power_of(&self, slot: EquipmentSlot) -> u32 {
        self.get(slot).map(|item| item.power).unwrap_or(0)
    }

    /// Weighted power level this loadout gives when fully equipped.
    pub fn power_level(&self) -> f64 {
        self.iter()
            .map(|(slot, item)| item.power as f64 * slot.power_weight())
            .sum()
    }
}
