//! Realizes a selected loadout against the remote service.
//!
//! A run goes through three ordered phases:
//! 1. Swap: gear equipped on another character is replaced there by a
//!    temporary substitute so it can be moved.
//! 2. Transfer: every chosen item not already on the destination is moved.
//! 3. Equip: every chosen item now on the destination is equipped, ordinary
//!    gear first so an exotic already worn is replaced before a new exotic
//!    goes on.
//!
//! Every remote call is retried on throttling. A failing slot never stops the
//! other slots; the report carries one step per slot and phase.

use super::types::Loadout;
use crate::core::error::{InputError, RemoteError};
use crate::items::filter::ItemFilter;
use crate::items::profile::Profile;
use crate::items::types::{EquipmentSlot, Item, Owner, TierType};
use crate::remote::moves::{equip, move_item};
use crate::remote::retry::{Attempted, RetryPolicy};
use crate::remote::service::{EquipRequest, InventoryService};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Swap,
    Transfer,
    Equip,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Phase::Swap => "swap",
            Phase::Transfer => "transfer",
            Phase::Equip => "equip",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The owning character has nothing else to equip in that slot.
    NoSubstitute,
    AlreadyOnDestination,
    TransferFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::NoSubstitute => "no substitute available on the owning character",
            SkipReason::AlreadyOnDestination => "already on the destination",
            SkipReason::TransferFailed => "transfer failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded { attempts: u32 },
    Skipped { reason: SkipReason },
    Failed { attempts: u32, error: RemoteError },
}

impl StepOutcome {
    fn from_attempt(outcome: Attempted<(), RemoteError>) -> Self {
        match outcome.result {
            Ok(()) => StepOutcome::Succeeded {
                attempts: outcome.attempts,
            },
            Err(error) => StepOutcome::Failed {
                attempts: outcome.attempts,
                error,
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }
}

/// One phase applied to one slot. `item_hash` names the item acted on, which
/// for a swap is the substitute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub phase: Phase,
    pub slot: EquipmentSlot,
    pub item_hash: u32,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RealizationReport {
    pub run_id: Uuid,
    pub destination_id: String,
    pub steps: Vec<StepReport>,
    /// Slots the selector could not fill.
    pub unassigned: Vec<EquipmentSlot>,
    /// Weighted power of the planned loadout.
    pub projected_power: f64,
}

impl RealizationReport {
    /// Slots whose item ended up equipped on the destination.
    pub fn slots_realized(&self) -> usize {
        self.phase_steps(Phase::Equip)
            .filter(|step| matches!(step.outcome, StepOutcome::Succeeded { .. }))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| step.outcome.is_failure())
    }

    pub fn phase_steps(&self, phase: Phase) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(move |step| step.phase == phase)
    }

    pub fn step(&self, phase: Phase, slot: EquipmentSlot) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|step| step.phase == phase && step.slot == slot)
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
            && self
                .phase_steps(Phase::Equip)
                .all(|step| matches!(step.outcome, StepOutcome::Succeeded { .. }))
    }
}

/// Drives the swap, transfer and equip phases for one loadout at a time.
pub struct Orchestrator<'s, S: InventoryService + ?Sized> {
    service: &'s S,
    policy: RetryPolicy,
}

impl<'s, S: InventoryService + ?Sized> Orchestrator<'s, S> {
    pub fn new(service: &'s S, policy: RetryPolicy) -> Self {
        Self { service, policy }
    }

    /// Realizes `loadout`, planned on `profile`, for `destination_id`.
    ///
    /// Only an unknown destination is an error; remote failures are reported
    /// per step.
    pub fn realize(
        &self,
        profile: &Profile,
        loadout: &Loadout<'_>,
        destination_id: &str,
    ) -> Result<RealizationReport, InputError> {
        let destination = profile.require_character(destination_id)?;
        let membership_type = destination.membership_type;
        let run_id = Uuid::new_v4();
        let span = info_span!("realize", %run_id, destination = destination_id);
        let _guard = span.enter();

        let mut steps = Vec::new();
        self.swap_phase(profile, loadout, destination_id, membership_type, &mut steps);
        let failed = self.transfer_phase(loadout, destination_id, membership_type, &mut steps);
        self.equip_phase(loadout, destination_id, membership_type, &failed, &mut steps);

        let report = RealizationReport {
            run_id,
            destination_id: destination_id.to_string(),
            steps,
            unassigned: loadout.unassigned_slots(),
            projected_power: loadout.power_level(),
        };
        info!(
            realized = report.slots_realized(),
            failures = report.failures().count(),
            unassigned = report.unassigned.len(),
            "loadout realization finished"
        );
        Ok(report)
    }

    fn swap_phase(
        &self,
        profile: &Profile,
        loadout: &Loadout<'_>,
        destination_id: &str,
        membership_type: u32,
        steps: &mut Vec<StepReport>,
    ) {
        for (slot, item) in loadout.iter() {
            let Some(owner_id) = item.character_id.as_deref() else {
                continue;
            };
            if !item.is_equipped() || owner_id == destination_id {
                continue;
            }

            let substitute = find_substitute(profile, loadout, item, slot, owner_id);
            let (item_hash, outcome) = match substitute {
                Some(substitute) => {
                    debug!(
                        %slot,
                        owner = owner_id,
                        substitute = substitute.item_hash,
                        "swapping out equipped item"
                    );
                    let request = EquipRequest::new(substitute, owner_id, membership_type);
                    let attempt = equip(self.service, &self.policy, &request);
                    (substitute.item_hash, StepOutcome::from_attempt(attempt))
                }
                None => {
                    warn!(
                        %slot,
                        owner = owner_id,
                        item_hash = item.item_hash,
                        "no substitute to free equipped item, transfer will be attempted anyway"
                    );
                    let skipped = StepOutcome::Skipped {
                        reason: SkipReason::NoSubstitute,
                    };
                    (item.item_hash, skipped)
                }
            };
            steps.push(StepReport {
                phase: Phase::Swap,
                slot,
                item_hash,
                outcome,
            });
        }
    }

    /// Returns the slots whose transfer failed.
    fn transfer_phase(
        &self,
        loadout: &Loadout<'_>,
        destination_id: &str,
        membership_type: u32,
        steps: &mut Vec<StepReport>,
    ) -> BTreeSet<EquipmentSlot> {
        let mut failed = BTreeSet::new();
        for (slot, item) in loadout.iter() {
            let outcome = if item.is_on(destination_id) {
                StepOutcome::Skipped {
                    reason: SkipReason::AlreadyOnDestination,
                }
            } else {
                let moved = move_item(
                    self.service,
                    &self.policy,
                    item,
                    Owner::Character(destination_id),
                    item.quantity.max(1),
                    membership_type,
                );
                StepOutcome::from_attempt(moved)
            };
            if let StepOutcome::Failed { error, .. } = &outcome {
                warn!(%slot, item_hash = item.item_hash, %error, "transfer failed");
                failed.insert(slot);
            }
            steps.push(StepReport {
                phase: Phase::Transfer,
                slot,
                item_hash: item.item_hash,
                outcome,
            });
        }
        failed
    }

    fn equip_phase(
        &self,
        loadout: &Loadout<'_>,
        destination_id: &str,
        membership_type: u32,
        failed_transfers: &BTreeSet<EquipmentSlot>,
        steps: &mut Vec<StepReport>,
    ) {
        // stable: slot order is kept within each tier
        let mut order: Vec<_> = loadout.iter().collect();
        order.sort_by_key(|(_, item)| item.is_exotic());

        for (slot, item) in order {
            let outcome = if failed_transfers.contains(&slot) {
                StepOutcome::Skipped {
                    reason: SkipReason::TransferFailed,
                }
            } else {
                let request = EquipRequest::new(item, destination_id, membership_type);
                StepOutcome::from_attempt(equip(self.service, &self.policy, &request))
            };
            if let StepOutcome::Failed { error, .. } = &outcome {
                warn!(%slot, item_hash = item.item_hash, %error, "equip failed");
            }
            steps.push(StepReport {
                phase: Phase::Equip,
                slot,
                item_hash: item.item_hash,
                outcome,
            });
        }
    }
}

/// Lowest-power non-exotic item the owner could equip in `slot` instead of
/// `equipped`, never one the loadout itself wants. Earlier snapshot order
/// wins among equal power.
///
/// Picking the weakest item lowers the other character's power until it
/// re-equips; kept as the long-standing behavior rather than picking the
/// strongest.
fn find_substitute<'a>(
    profile: &'a Profile,
    loadout: &Loadout<'_>,
    equipped: &Item,
    slot: EquipmentSlot,
    owner_id: &str,
) -> Option<&'a Item> {
    let owner_class = profile.character(owner_id)?.class_type;
    profile
        .all_items()
        .filter(ItemFilter::Owner(Owner::Character(owner_id)))
        .filter(ItemFilter::Slot(slot))
        .filter(ItemFilter::NotTier(TierType::Exotic))
        .filter(ItemFilter::UsableBy(owner_class))
        .into_iter()
        .filter(|candidate| !candidate.same_item(equipped) && !loadout.contains(candidate))
        .min_by_key(|candidate| candidate.power)
}
