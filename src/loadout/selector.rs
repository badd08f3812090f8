//! Highest-power loadout selection for one destination character.
//!
//! Selection runs in two passes. The baseline pass fills every slot with the
//! strongest non-exotic gear the destination's class can wear. The exotic
//! pass then allows at most one exotic weapon, at most one exotic armor
//! piece and an exotic class item to replace a weaker baseline choice.
//! Ghost and artifact slots never take an exotic.

use super::types::Loadout;
use crate::core::error::InputError;
use crate::items::filter::ItemFilter;
use crate::items::grouping::{group_and_sort_gear, SlotGroups};
use crate::items::profile::Profile;
use crate::items::types::{EquipmentSlot, Item, TierType};
use tracing::debug;

/// Slot groups that may each hold a single exotic.
const EXOTIC_GROUPS: [&[EquipmentSlot]; 3] = [
    &[EquipmentSlot::ClassArmor],
    &EquipmentSlot::WEAPONS,
    &EquipmentSlot::ARMOR,
];

/// Computes the best achievable loadout for `destination_id` from `profile`.
///
/// Pure: the same snapshot and destination always produce the same loadout.
pub fn find_max_light_loadout<'a>(
    profile: &'a Profile,
    destination_id: &str,
) -> Result<Loadout<'a>, InputError> {
    let destination = profile.require_character(destination_id)?;
    let usable = profile
        .all_items()
        .filter(ItemFilter::UsableBy(destination.class_type));

    let baseline = group_and_sort_gear(&usable.filter(ItemFilter::NotTier(TierType::Exotic)));
    let mut loadout = Loadout::new();
    for slot in EquipmentSlot::ALL {
        loadout.set(
            slot,
            find_best_item_for_bucket(baseline.get(slot), destination_id),
        );
    }

    let exotics = group_and_sort_gear(&usable.filter(ItemFilter::Tier(TierType::Exotic)));
    for group in EXOTIC_GROUPS {
        if let Some((slot, exotic)) =
            best_exotic_override(group, &exotics, &loadout, destination_id)
        {
            debug!(
                %slot,
                item_hash = exotic.item_hash,
                power = exotic.power,
                "exotic override"
            );
            loadout.set(slot, Some(exotic));
        }
    }

    Ok(loadout)
}

/// Picks the single exotic in `group` that most improves on the baseline.
fn best_exotic_override<'a>(
    group: &[EquipmentSlot],
    exotics: &SlotGroups<'a>,
    loadout: &Loadout<'a>,
    destination_id: &str,
) -> Option<(EquipmentSlot, &'a Item)> {
    let mut best: Option<(EquipmentSlot, &'a Item)> = None;
    for &slot in group {
        let Some(candidate) = find_best_item_for_bucket(exotics.get(slot), destination_id) else {
            continue;
        };
        if candidate.power <= loadout.power_of(slot) {
            continue;
        }
        if best.map_or(true, |(_, current)| candidate.power > current.power) {
            best = Some((slot, candidate));
        }
    }
    best
}

/// Chooses among the top-power candidates of a slot ranked by descending power.
///
/// Only items tied with the strongest are considered. Among those, an item
/// already on the destination wins (the equipped one if several are), then
/// one in the vault, then one on another character. Remaining ties keep the
/// ranking order.
pub fn find_best_item_for_bucket<'a>(
    ranked: &[&'a Item],
    destination_id: &str,
) -> Option<&'a Item> {
    let top = ranked.first()?.power;
    ranked
        .iter()
        .copied()
        .take_while(|item| item.power == top)
        .min_by_key(|item| placement_rank(item, destination_id))
}

fn placement_rank(item: &Item, destination_id: &str) -> u8 {
    if item.is_on(destination_id) {
        if item.is_equipped() {
            0
        } else {
            1
        }
    } else if item.is_in_vault() {
        2
    } else {
        3
    }
}
