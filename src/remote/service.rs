//! Boundary to the remote inventory service.

use crate::core::error::RemoteError;
use crate::items::profile::Profile;
use crate::items::types::{Account, Item};
use serde::Serialize;

/// Moves an item between a character and the vault. The wire format names
/// the character on the non-vault side of the move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub item_reference_hash: u32,
    pub stack_size: u32,
    pub transfer_to_vault: bool,
    /// Instance id, or "0" for stackable items.
    pub item_id: String,
    pub character_id: String,
    pub membership_type: u32,
}

impl TransferRequest {
    pub fn to_vault(item: &Item, character_id: &str, quantity: u32, membership_type: u32) -> Self {
        Self::new(item, character_id, quantity, membership_type, true)
    }

    pub fn from_vault(
        item: &Item,
        character_id: &str,
        quantity: u32,
        membership_type: u32,
    ) -> Self {
        Self::new(item, character_id, quantity, membership_type, false)
    }

    fn new(
        item: &Item,
        character_id: &str,
        quantity: u32,
        membership_type: u32,
        to_vault: bool,
    ) -> Self {
        Self {
            item_reference_hash: item.item_hash,
            stack_size: quantity,
            transfer_to_vault: to_vault,
            item_id: item.instance_id.clone().unwrap_or_else(|| "0".to_string()),
            character_id: character_id.to_string(),
            membership_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipRequest {
    pub item_id: String,
    pub character_id: String,
    pub membership_type: u32,
}

impl EquipRequest {
    pub fn new(item: &Item, character_id: &str, membership_type: u32) -> Self {
        Self {
            item_id: item.instance_id.clone().unwrap_or_else(|| "0".to_string()),
            character_id: character_id.to_string(),
            membership_type,
        }
    }
}

/// Reads and mutates a player's inventory. Each call is a single blocking
/// request; retries are applied by the caller.
pub trait InventoryService: Send + Sync {
    /// The account linked to the caller's credentials.
    fn current_account(&self) -> Result<Account, RemoteError>;

    fn fetch_profile(&self, account: &Account) -> Result<Profile, RemoteError>;

    fn transfer_item(&self, request: &TransferRequest) -> Result<(), RemoteError>;

    fn equip_item(&self, request: &EquipRequest) -> Result<(), RemoteError>;
}
