use crate::core::error::{GuardianResult, InputError, RemoteError};
use crate::items::filter::{ItemFilter, ItemList};
use crate::items::profile::Profile;
use crate::items::types::{Account, Item, Owner};
use crate::lookup::{Destination, ItemLookup};
use crate::remote::moves::move_item;
use crate::remote::retry::RetryPolicy;
use crate::remote::service::InventoryService;
use tracing::{debug, info, instrument, warn};

/// A validated "move N of item X from A to B" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    pub item_name: String,
    /// `None` moves everything found.
    pub quantity: Option<u32>,
    /// `None` takes from every owner except the destination.
    pub source: Option<Destination>,
    pub destination: Destination,
}

impl TransferCommand {
    /// Validates raw voice-layer values.
    pub fn parse(
        item_name: &str,
        quantity: Option<i64>,
        source: Option<&str>,
        destination: Option<&str>,
    ) -> Result<Self, InputError> {
        let quantity = match quantity {
            Some(n) if n <= 0 => return Err(InputError::NonPositiveQuantity(n)),
            Some(n) => Some(u32::try_from(n).unwrap_or(u32::MAX)),
            None => None,
        };
        let destination = match destination.map(str::trim) {
            Some(name) if !name.is_empty() => Destination::parse(name)?,
            _ => return Err(InputError::MissingDestination),
        };
        let source = source
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Destination::parse)
            .transpose()?;
        Ok(Self {
            item_name: item_name.to_string(),
            quantity,
            source,
            destination,
        })
    }
}

/// A move that did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFailure {
    pub item_hash: u32,
    /// Owner the stack or instance was on, as spoken ("vault", "hunter").
    pub from: String,
    pub quantity: u32,
    pub attempts: u32,
    pub error: RemoteError,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransferReport {
    pub requested: Option<u32>,
    pub moved: u32,
    pub failures: Vec<TransferFailure>,
}

impl TransferReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.requested.map_or(true, |n| self.moved >= n)
    }
}

/// Moves the named item to the command's destination.
#[instrument(
    skip(service, lookup, policy, account),
    fields(item = %command.item_name, to = %command.destination)
)]
pub fn transfer_item<S: InventoryService + ?Sized>(
    service: &S,
    lookup: &dyn ItemLookup,
    policy: &RetryPolicy,
    account: &Account,
    command: &TransferCommand,
) -> GuardianResult<TransferReport> {
    let item_hash = lookup.hash_for_name(&command.item_name)?;
    let profile = service.fetch_profile(account)?;

    let destination = resolve_owner(&profile, command.destination)?;
    let source = command
        .source
        .map(|source| resolve_owner(&profile, source))
        .transpose()?;

    let mut candidates = profile.all_items().filter(ItemFilter::ItemHash(item_hash));
    if let Some(source) = source {
        candidates = candidates.filter(ItemFilter::Owner(source));
    }
    let candidates: ItemList<'_> = candidates
        .into_iter()
        .filter(|item| item.owner() != destination)
        .collect();
    debug!(
        found = candidates.len(),
        available = candidates.total_quantity(),
        "transfer candidates"
    );

    let report = move_stacks(
        service,
        policy,
        &profile,
        candidates,
        destination,
        command.quantity,
        account.membership_type,
    );
    info!(moved = report.moved, failures = report.failures.len(), "transfer finished");
    Ok(report)
}

pub(crate) fn resolve_owner(
    profile: &Profile,
    destination: Destination,
) -> Result<Owner<'_>, InputError> {
    match destination {
        Destination::Vault => Ok(Owner::Vault),
        Destination::Class(class) => {
            let character = profile.character_for_class(class)?;
            Ok(Owner::Character(&character.character_id))
        }
    }
}

/// Spoken name of an owner: "vault" or the character's class.
pub(crate) fn owner_label(profile: &Profile, owner: Owner<'_>) -> String {
    match owner {
        Owner::Vault => "vault".to_string(),
        Owner::Character(id) => profile
            .character(id)
            .map_or_else(|| id.to_string(), |c| c.class_type.to_string()),
    }
}

/// Moves items in order until `limit` units have moved, or all of them.
/// Equipped items are left in place.
pub(crate) fn move_stacks<S: InventoryService + ?Sized>(
    service: &S,
    policy: &RetryPolicy,
    profile: &Profile,
    items: ItemList<'_>,
    to: Owner<'_>,
    limit: Option<u32>,
    membership_type: u32,
) -> TransferReport {
    let mut report = TransferReport {
        requested: limit,
        ..TransferReport::default()
    };
    let mut remaining = limit.unwrap_or(u32::MAX);

    for item in items {
        if remaining == 0 {
            break;
        }
        if item.is_equipped() {
            debug!(item_hash = item.item_hash, "leaving equipped item in place");
            continue;
        }
        let quantity = item.quantity.max(1).min(remaining);
        let outcome = move_item(service, policy, item, to, quantity, membership_type);
        match outcome.result {
            Ok(()) => {
                report.moved += quantity;
                remaining -= quantity;
            }
            Err(error) => {
                warn!(item_hash = item.item_hash, %error, "move failed");
                report.failures.push(failure(profile, item, quantity, outcome.attempts, error));
            }
        }
    }
    report
}

fn failure(
    profile: &Profile,
    item: &Item,
    quantity: u32,
    attempts: u32,
    error: RemoteError,
) -> TransferFailure {
    TransferFailure {
        item_hash: item.item_hash,
        from: owner_label(profile, item.owner()),
        quantity,
        attempts,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GuardianError;
    use crate::items::types::{Character, ClassType, TierType, TransferStatus};
    use crate::lookup::{DefinitionTable, ItemDefinition};
    use crate::remote::mock::MockInventoryService;

    const GLIMMER: u32 = 3159615086;

    fn stack(quantity: u32, owner: Option<&str>) -> Item {
        Item {
            item_hash: GLIMMER,
            instance_id: None,
            character_id: owner.map(str::to_string),
            bucket_hash: 1469714392,
            tier: TierType::Currency,
            class_type: ClassType::Unknown,
            power: 0,
            transfer_status: TransferStatus::CanTransfer,
            quantity,
        }
    }

    fn profile(items: Vec<Item>) -> Profile {
        let character = |id: &str, class| Character {
            character_id: id.to_string(),
            membership_id: "m".to_string(),
            membership_type: 2,
            class_type: class,
            power_level: 0,
            date_last_played: None,
        };
        Profile::new(
            Account {
                membership_id: "m".to_string(),
                membership_type: 2,
            },
            vec![character("t", ClassType::Titan), character("h", ClassType::Hunter)],
            items,
        )
        .unwrap()
    }

    fn lookup() -> DefinitionTable {
        DefinitionTable::from_definitions(vec![ItemDefinition {
            item_hash: GLIMMER,
            name: "Glimmer".to_string(),
            item_type_name: "Currency".to_string(),
            tier: TierType::Currency,
            class_type: ClassType::Unknown,
            bucket_hash: 1469714392,
            max_stack_size: 250000,
        }])
    }

    fn run(
        service: &MockInventoryService,
        command: TransferCommand,
    ) -> GuardianResult<TransferReport> {
        let account = service.current_account().unwrap();
        transfer_item(service, &lookup(), &RetryPolicy::immediate(), &account, &command)
    }

    #[test]
    fn test_parse_validates_before_anything_else() {
        assert_eq!(
            TransferCommand::parse("glimmer", Some(0), None, Some("vault")),
            Err(InputError::NonPositiveQuantity(0))
        );
        assert_eq!(
            TransferCommand::parse("glimmer", Some(-3), None, Some("vault")),
            Err(InputError::NonPositiveQuantity(-3))
        );
        assert_eq!(
            TransferCommand::parse("glimmer", None, None, None),
            Err(InputError::MissingDestination)
        );
        assert_eq!(
            TransferCommand::parse("glimmer", None, Some("paladin"), Some("vault")),
            Err(InputError::UnknownClass("paladin".to_string()))
        );
        let command =
            TransferCommand::parse("glimmer", Some(5), Some("fault"), Some("tatum")).unwrap();
        assert_eq!(command.source, Some(Destination::Vault));
        assert_eq!(command.destination, Destination::Class(ClassType::Titan));
        assert_eq!(command.quantity, Some(5));
    }

    #[test]
    fn test_moves_requested_quantity_across_stacks() {
        let service =
            MockInventoryService::new(profile(vec![stack(30, Some("h")), stack(50, None)]));
        let command = TransferCommand::parse("glimmer", Some(40), None, Some("titan")).unwrap();
        let report = run(&service, command).unwrap();

        assert_eq!(report.moved, 40);
        assert!(report.is_complete());
        let transfers = service.transfers();
        // hunter stack hops via the vault, then 10 more from the vault
        assert_eq!(transfers.len(), 3);
        assert_eq!(transfers[0].stack_size, 30);
        assert_eq!(transfers[2].stack_size, 10);
        assert_eq!(transfers[2].item_id, "0");
    }

    #[test]
    fn test_moves_everything_without_quantity() {
        let service =
            MockInventoryService::new(profile(vec![stack(30, Some("h")), stack(50, Some("t"))]));
        let command = TransferCommand::parse("glimmer", None, None, Some("vault")).unwrap();
        let report = run(&service, command).unwrap();
        assert_eq!(report.moved, 80);
        assert_eq!(report.requested, None);
        assert!(service.transfers().iter().all(|t| t.transfer_to_vault));
    }

    #[test]
    fn test_source_restricts_candidates() {
        let service =
            MockInventoryService::new(profile(vec![stack(30, Some("h")), stack(50, None)]));
        let command =
            TransferCommand::parse("glimmer", None, Some("vault"), Some("hunter")).unwrap();
        let report = run(&service, command).unwrap();
        assert_eq!(report.moved, 50);
        assert_eq!(service.transfers().len(), 1);
    }

    #[test]
    fn test_unknown_item_fails_before_any_call() {
        let service = MockInventoryService::new(profile(vec![]));
        let command = TransferCommand::parse("unobtainium", None, None, Some("vault")).unwrap();
        let account = service.current_account().unwrap();
        let policy = RetryPolicy::immediate();
        let err = transfer_item(&service, &lookup(), &policy, &account, &command).unwrap_err();
        assert!(matches!(err, GuardianError::Input(InputError::UnknownItem(_))));
        assert_eq!(service.calls().len(), 1);
    }

    #[test]
    fn test_missing_destination_class() {
        let service = MockInventoryService::new(profile(vec![stack(5, None)]));
        let command = TransferCommand::parse("glimmer", None, None, Some("warlock")).unwrap();
        let err = run(&service, command).unwrap_err();
        assert!(matches!(
            err,
            GuardianError::Input(InputError::NoCharacterForClass(ClassType::Warlock))
        ));
        assert!(service.transfers().is_empty());
    }

    #[test]
    fn test_failed_stack_is_reported_and_next_tried() {
        let denied = RemoteError::from_envelope(1642, "DestinyNoRoomInDestination", "full");
        let mut blocked = stack(30, Some("h"));
        blocked.instance_id = Some("blocked".to_string());
        let service = MockInventoryService::new(profile(vec![blocked, stack(50, None)]))
            .fail_transfers_of("blocked", denied.clone());
        let command = TransferCommand::parse("glimmer", Some(40), None, Some("titan")).unwrap();
        let report = run(&service, command).unwrap();

        assert_eq!(report.moved, 40);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].from, "hunter");
        assert_eq!(report.failures[0].error, denied);
        assert!(!report.is_complete());
    }
}
