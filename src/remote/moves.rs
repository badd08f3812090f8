use super::retry::{retry_with_backoff, Attempted, RetryPolicy};
use super::service::{EquipRequest, InventoryService, TransferRequest};
use crate::core::error::RemoteError;
use crate::items::types::{Item, Owner};
use tracing::{debug, instrument};

/// Moves `quantity` of `item` to `to`, retrying throttled calls.
///
/// Character-to-character moves go through the vault in two transfers; when
/// the first hop fails the second is not attempted. Attempts are summed
/// across hops.
#[instrument(
    skip(service, policy, item),
    fields(item_hash = item.item_hash, from = %item.owner(), to = %to)
)]
pub fn move_item<S: InventoryService + ?Sized>(
    service: &S,
    policy: &RetryPolicy,
    item: &Item,
    to: Owner<'_>,
    quantity: u32,
    membership_type: u32,
) -> Attempted<(), RemoteError> {
    match (item.owner(), to) {
        (Owner::Vault, Owner::Vault) => already_there(),
        (Owner::Vault, Owner::Character(destination)) => transfer(
            service,
            policy,
            &TransferRequest::from_vault(item, destination, quantity, membership_type),
        ),
        (Owner::Character(source), Owner::Vault) => transfer(
            service,
            policy,
            &TransferRequest::to_vault(item, source, quantity, membership_type),
        ),
        (Owner::Character(source), Owner::Character(destination)) if source == destination => {
            already_there()
        }
        (Owner::Character(source), Owner::Character(destination)) => {
            let first = transfer(
                service,
                policy,
                &TransferRequest::to_vault(item, source, quantity, membership_type),
            );
            if first.result.is_err() {
                return first;
            }
            debug!("first hop reached the vault");
            let second = transfer(
                service,
                policy,
                &TransferRequest::from_vault(item, destination, quantity, membership_type),
            );
            Attempted {
                attempts: first.attempts + second.attempts,
                result: second.result,
            }
        }
    }
}

fn already_there() -> Attempted<(), RemoteError> {
    Attempted {
        attempts: 0,
        result: Ok(()),
    }
}

pub fn transfer<S: InventoryService + ?Sized>(
    service: &S,
    policy: &RetryPolicy,
    request: &TransferRequest,
) -> Attempted<(), RemoteError> {
    retry_with_backoff(policy, RemoteError::is_throttle, |_| service.transfer_item(request))
}

pub fn equip<S: InventoryService + ?Sized>(
    service: &S,
    policy: &RetryPolicy,
    request: &EquipRequest,
) -> Attempted<(), RemoteError> {
    retry_with_backoff(policy, RemoteError::is_throttle, |_| service.equip_item(request))
}
