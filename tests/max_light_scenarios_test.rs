//! Integration test: max-light selection and realization end to end
//!
//! Builds small snapshots, runs the selector and the orchestrator against the
//! scripted inventory service and checks both the chosen loadout and the
//! calls that reached the service.

use guardian::items::{
    Account, Character, ClassType, EquipmentSlot, Item, Profile, TierType, TransferStatus,
};
use guardian::loadout::{
    find_max_light_loadout, Orchestrator, Phase, RealizationReport, SkipReason, StepOutcome,
};
use guardian::operations::equip_max_light;
use guardian::remote::{MockInventoryService, RecordedCall, RetryPolicy};
use guardian::RemoteError;

const WARLOCK: &str = "2305843009260001";
const TITAN: &str = "2305843009260002";

fn account() -> Account {
    Account {
        membership_id: "4611686018400001".to_string(),
        membership_type: 2,
    }
}

fn character(id: &str, class_type: ClassType) -> Character {
    Character {
        character_id: id.to_string(),
        membership_id: "4611686018400001".to_string(),
        membership_type: 2,
        class_type,
        power_level: 0,
        date_last_played: None,
    }
}

fn gear(id: &str, slot: EquipmentSlot, power: u32, tier: TierType, owner: Option<&str>) -> Item {
    Item {
        item_hash: id.bytes().map(u32::from).sum(),
        instance_id: Some(id.to_string()),
        character_id: owner.map(str::to_string),
        bucket_hash: slot.bucket_hash(),
        tier,
        class_type: ClassType::Unknown,
        power,
        transfer_status: TransferStatus::CanTransfer,
        quantity: 1,
    }
}

fn profile(items: Vec<Item>) -> Profile {
    Profile::new(
        account(),
        vec![character(WARLOCK, ClassType::Warlock), character(TITAN, ClassType::Titan)],
        items,
    )
    .unwrap()
}

fn max_light_for_warlock(service: &MockInventoryService) -> RealizationReport {
    let policy = RetryPolicy::immediate();
    equip_max_light(service, &policy, &account(), Some(ClassType::Warlock)).unwrap()
}

fn chosen_id(profile: &Profile, slot: EquipmentSlot) -> Option<String> {
    find_max_light_loadout(profile, WARLOCK)
        .unwrap()
        .get(slot)
        .and_then(|item| item.instance_id.clone())
}

// =============================================================================
// Exotic override against an empty destination
// =============================================================================

#[test]
fn test_weaker_exotic_helmet_does_not_override() {
    let profile = profile(vec![
        gear("ordinary", EquipmentSlot::Helmet, 300, TierType::Legendary, None),
        gear("exotic", EquipmentSlot::Helmet, 280, TierType::Exotic, None),
    ]);
    assert_eq!(chosen_id(&profile, EquipmentSlot::Helmet).as_deref(), Some("ordinary"));
}

#[test]
fn test_stronger_exotic_helmet_overrides() {
    let profile = profile(vec![
        gear("ordinary", EquipmentSlot::Helmet, 300, TierType::Legendary, None),
        gear("exotic", EquipmentSlot::Helmet, 320, TierType::Exotic, None),
    ]);
    assert_eq!(chosen_id(&profile, EquipmentSlot::Helmet).as_deref(), Some("exotic"));
}

#[test]
fn test_equal_power_exotic_does_not_override() {
    let profile = profile(vec![
        gear("ordinary", EquipmentSlot::Helmet, 300, TierType::Legendary, None),
        gear("exotic", EquipmentSlot::Helmet, 300, TierType::Exotic, None),
    ]);
    assert_eq!(chosen_id(&profile, EquipmentSlot::Helmet).as_deref(), Some("ordinary"));
}

#[test]
fn test_only_strongest_exotic_weapon_is_used() {
    let profile = profile(vec![
        gear("k", EquipmentSlot::Kinetic, 300, TierType::Legendary, None),
        gear("e", EquipmentSlot::Energy, 300, TierType::Legendary, None),
        gear("k-exotic", EquipmentSlot::Kinetic, 310, TierType::Exotic, None),
        gear("e-exotic", EquipmentSlot::Energy, 315, TierType::Exotic, None),
    ]);
    let loadout = find_max_light_loadout(&profile, WARLOCK).unwrap();
    let exotics = loadout.iter().filter(|(_, item)| item.is_exotic()).count();
    assert_eq!(exotics, 1);
    let id = |slot| loadout.get(slot).and_then(|item| item.instance_id.as_deref());
    assert_eq!(id(EquipmentSlot::Energy), Some("e-exotic"));
    assert_eq!(id(EquipmentSlot::Kinetic), Some("k"));
}

// =============================================================================
// Realization against the scripted service
// =============================================================================

#[test]
fn test_equipped_elsewhere_without_substitute_still_transfers() {
    let mut helmet = gear(
        "titan-helm",
        EquipmentSlot::Helmet,
        305,
        TierType::Legendary,
        Some(TITAN),
    );
    helmet.transfer_status = TransferStatus::ItemIsEquipped;
    let profile = profile(vec![helmet]);
    let rejected = RemoteError::from_envelope(1641, "DestinyItemIsEquipped", "item is equipped");
    let service = MockInventoryService::new(profile.clone())
        .fail_transfers_of("titan-helm", rejected.clone());

    let loadout = find_max_light_loadout(&profile, WARLOCK).unwrap();
    let report = Orchestrator::new(&service, RetryPolicy::immediate())
        .realize(&profile, &loadout, WARLOCK)
        .unwrap();

    assert_eq!(
        report.step(Phase::Swap, EquipmentSlot::Helmet).unwrap().outcome,
        StepOutcome::Skipped {
            reason: SkipReason::NoSubstitute
        }
    );
    assert_eq!(
        report.step(Phase::Transfer, EquipmentSlot::Helmet).unwrap().outcome,
        StepOutcome::Failed {
            attempts: 1,
            error: rejected
        }
    );
    assert_eq!(
        report.step(Phase::Equip, EquipmentSlot::Helmet).unwrap().outcome,
        StepOutcome::Skipped {
            reason: SkipReason::TransferFailed
        }
    );
    // the only calls are the single failed transfer
    assert_eq!(service.calls().len(), 1);
    assert_eq!(report.slots_realized(), 0);
}

#[test]
fn test_partial_success_is_reported_per_slot() {
    let profile = profile(vec![
        gear("kinetic", EquipmentSlot::Kinetic, 300, TierType::Legendary, None),
        gear("ghost", EquipmentSlot::Ghost, 300, TierType::Legendary, Some(TITAN)),
        gear("legs", EquipmentSlot::Legs, 300, TierType::Legendary, Some(WARLOCK)),
    ]);
    let full = RemoteError::from_envelope(1642, "DestinyNoRoomInDestination", "no room");
    let service = MockInventoryService::new(profile.clone()).fail_transfers_of("kinetic", full);

    let report = max_light_for_warlock(&service);

    assert_eq!(report.slots_realized(), 2);
    assert_eq!(report.failures().count(), 1);
    assert_eq!(report.failures().next().unwrap().slot, EquipmentSlot::Kinetic);
    let equipped: Vec<String> = service.equips().into_iter().map(|e| e.item_id).collect();
    assert_eq!(equipped, vec!["ghost".to_string(), "legs".to_string()]);
}

#[test]
fn test_throttled_transfer_retries_then_equips() {
    let throttled = RemoteError::from_envelope(36, "ThrottleLimitExceededMomentarily", "");
    let profile = profile(vec![gear(
        "chest",
        EquipmentSlot::Chest,
        300,
        TierType::Legendary,
        None,
    )]);
    let service = MockInventoryService::new(profile.clone())
        .script_transfers([Err(throttled.clone()), Err(throttled), Ok(())]);

    let report = max_light_for_warlock(&service);

    assert_eq!(
        report.step(Phase::Transfer, EquipmentSlot::Chest).unwrap().outcome,
        StepOutcome::Succeeded { attempts: 3 }
    );
    assert!(report.is_complete());
    let last = service.calls().last().cloned();
    assert!(matches!(last, Some(RecordedCall::Equip(ref e)) if e.character_id == WARLOCK));
}
