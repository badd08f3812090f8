use super::transfer::{move_stacks, TransferReport};
use crate::core::constants::ENGRAM_BUCKET;
use crate::core::error::GuardianResult;
use crate::items::filter::{ItemFilter, ItemList};
use crate::items::types::{Account, Owner};
use crate::remote::retry::RetryPolicy;
use crate::remote::service::InventoryService;
use tracing::{info, instrument};

/// Sends every engram carried by any character to the vault.
#[instrument(skip_all, fields(membership_id = %account.membership_id))]
pub fn unload_engrams<S: InventoryService + ?Sized>(
    service: &S,
    policy: &RetryPolicy,
    account: &Account,
) -> GuardianResult<TransferReport> {
    let profile = service.fetch_profile(account)?;
    let engrams: ItemList<'_> = profile
        .all_items()
        .filter(ItemFilter::BucketHash(ENGRAM_BUCKET))
        .into_iter()
        .filter(|item| !item.is_in_vault())
        .collect();

    let report = move_stacks(
        service,
        policy,
        &profile,
        engrams,
        Owner::Vault,
        None,
        account.membership_type,
    );
    info!(moved = report.moved, failures = report.failures.len(), "engrams unloaded");
    Ok(report)
}
