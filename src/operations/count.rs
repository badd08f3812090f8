use super::transfer::owner_label;
use crate::core::error::GuardianResult;
use crate::items::filter::ItemFilter;
use crate::items::types::{Account, Owner};
use crate::lookup::ItemLookup;
use crate::remote::service::InventoryService;
use std::fmt;
use tracing::instrument;

/// Quantity held by one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerCount {
    /// "vault" or the character's class.
    pub owner: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCount {
    pub item_hash: u32,
    /// Characters in snapshot order, then the vault. Owners holding none are omitted.
    pub per_owner: Vec<OwnerCount>,
    pub total: u32,
}

impl fmt::Display for ItemCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.per_owner.is_empty() {
            return write!(f, "none");
        }
        let parts: Vec<String> = self
            .per_owner
            .iter()
            .map(|c| format!("{} on {}", c.quantity, c.owner))
            .collect();
        write!(f, "{} ({} total)", parts.join(", "), self.total)
    }
}

/// Counts the named item on every character and in the vault.
#[instrument(skip(service, lookup, account))]
pub fn count_item<S: InventoryService + ?Sized>(
    service: &S,
    lookup: &dyn ItemLookup,
    account: &Account,
    item_name: &str,
) -> GuardianResult<ItemCount> {
    let item_hash = lookup.hash_for_name(item_name)?;
    let profile = service.fetch_profile(account)?;
    let matching = profile.all_items().filter(ItemFilter::ItemHash(item_hash));

    let owners = profile
        .characters()
        .iter()
        .map(|c| Owner::Character(&c.character_id))
        .chain(std::iter::once(Owner::Vault));

    let per_owner: Vec<OwnerCount> = owners
        .map(|owner| OwnerCount {
            owner: owner_label(&profile, owner),
            quantity: matching.filter(ItemFilter::Owner(owner)).total_quantity(),
        })
        .filter(|count| count.quantity > 0)
        .collect();
    let total = per_owner.iter().map(|c| c.quantity).sum();

    Ok(ItemCount {
        item_hash,
        per_owner,
        total,
    })
}
