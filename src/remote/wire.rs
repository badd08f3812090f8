//! JSON shapes exchanged with the platform and their conversion into the
//! snapshot model.

use crate::core::constants::SUCCESS_ERROR_CODE;
use crate::core::error::RemoteError;
use crate::items::profile::Profile;
use crate::items::types::{Account, Character, ClassType, Item, TierType, TransferStatus};
use crate::lookup::ItemLookup;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Wrapper around every platform response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    pub response: Option<T>,
    pub error_code: i32,
    #[serde(default)]
    pub error_status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub throttle_seconds: u32,
}

impl<T> Envelope<T> {
    /// Payload on success, otherwise the classified error.
    pub fn into_result(self) -> Result<T, RemoteError> {
        if self.error_code != SUCCESS_ERROR_CODE {
            return Err(RemoteError::from_envelope(
                self.error_code,
                &self.error_status,
                &self.message,
            ));
        }
        self.response
            .ok_or_else(|| RemoteError::Decode("success envelope without a response".to_string()))
    }

    /// Success check for mutations whose payload carries nothing useful.
    pub fn into_unit(self) -> Result<(), RemoteError> {
        if self.error_code == SUCCESS_ERROR_CODE {
            Ok(())
        } else {
            Err(RemoteError::from_envelope(
                self.error_code,
                &self.error_status,
                &self.message,
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipsResponse {
    #[serde(default)]
    pub destiny_memberships: Vec<MembershipData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipData {
    pub membership_id: String,
    pub membership_type: u32,
}

impl MembershipsResponse {
    /// First linked game account.
    pub fn into_account(self) -> Result<Account, RemoteError> {
        self.destiny_memberships
            .into_iter()
            .next()
            .map(|m| Account {
                membership_id: m.membership_id,
                membership_type: m.membership_type,
            })
            .ok_or_else(|| RemoteError::Decode("no game memberships on account".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct Component<T> {
    pub data: Option<T>,
}

impl<T: Default> Component<T> {
    fn into_data(self) -> T {
        self.data.unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InventoryComponent {
    #[serde(default)]
    pub items: Vec<ItemComponent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemComponent {
    pub item_hash: u32,
    pub item_instance_id: Option<String>,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default)]
    pub bucket_hash: u32,
    #[serde(default)]
    pub transfer_status: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterComponent {
    pub membership_id: String,
    pub membership_type: u32,
    pub character_id: String,
    #[serde(default)]
    pub date_last_played: Option<DateTime<Utc>>,
    #[serde(default, alias = "powerLevel")]
    pub light: u32,
    #[serde(default = "unknown_class_code")]
    pub class_type: u32,
    #[serde(default)]
    pub class_hash: u32,
}

fn unknown_class_code() -> u32 {
    3
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceComponent {
    pub primary_stat: Option<Stat>,
    #[serde(default)]
    pub is_equipped: bool,
}

#[derive(Debug, Deserialize)]
pub struct Stat {
    pub value: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemComponents {
    pub instances: Option<Component<HashMap<String, InstanceComponent>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile_inventory: Option<Component<InventoryComponent>>,
    pub characters: Option<Component<BTreeMap<String, CharacterComponent>>>,
    pub character_inventories: Option<Component<BTreeMap<String, InventoryComponent>>>,
    pub character_equipment: Option<Component<BTreeMap<String, InventoryComponent>>>,
    #[serde(default)]
    pub item_components: ItemComponents,
}

impl ProfileResponse {
    /// Builds a snapshot. Tier, class restriction and bucket come from the
    /// definitions; items without a definition keep the component bucket.
    pub fn into_profile(
        self,
        account: &Account,
        lookup: &dyn ItemLookup,
    ) -> Result<Profile, RemoteError> {
        let instances = self
            .item_components
            .instances
            .map(Component::into_data)
            .unwrap_or_default();

        let mut characters: Vec<Character> = self
            .characters
            .map(Component::into_data)
            .unwrap_or_default()
            .into_values()
            .map(|c| Character {
                class_type: match ClassType::from_code(c.class_type) {
                    ClassType::Unknown => ClassType::from_class_hash(c.class_hash),
                    known => known,
                },
                character_id: c.character_id,
                membership_id: c.membership_id,
                membership_type: c.membership_type,
                power_level: c.light,
                date_last_played: c.date_last_played,
            })
            .collect();
        characters.sort_by(|a, b| b.date_last_played.cmp(&a.date_last_played));

        let convert = |component: ItemComponent, owner: Option<&str>, equipped: bool| {
            to_item(component, owner, equipped, &instances, lookup)
        };

        let equipment = self
            .character_equipment
            .map(Component::into_data)
            .unwrap_or_default();
        let inventories = self
            .character_inventories
            .map(Component::into_data)
            .unwrap_or_default();

        let mut items = Vec::new();
        for (character_id, list) in equipment {
            let owner = Some(character_id.as_str());
            items.extend(list.items.into_iter().map(|c| convert(c, owner, true)));
        }
        for (character_id, list) in inventories {
            let owner = Some(character_id.as_str());
            items.extend(list.items.into_iter().map(|c| convert(c, owner, false)));
        }
        if let Some(vault) = self.profile_inventory {
            let vault_items = vault.into_data().items;
            items.extend(vault_items.into_iter().map(|c| convert(c, None, false)));
        }

        let undefined_gear = items
            .iter()
            .filter(|item| item.slot().is_some() && lookup.definition(item.item_hash).is_none())
            .count();
        if undefined_gear > 0 {
            warn!(
                count = undefined_gear,
                "gear without item definitions, tier and class unknown"
            );
        }
        debug!(characters = characters.len(), items = items.len(), "decoded profile");
        Profile::new(account.clone(), characters, items)
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

fn to_item(
    component: ItemComponent,
    owner: Option<&str>,
    equipped: bool,
    instances: &HashMap<String, InstanceComponent>,
    lookup: &dyn ItemLookup,
) -> Item {
    let instance = component
        .item_instance_id
        .as_ref()
        .and_then(|id| instances.get(id));
    let equipped = equipped || instance.is_some_and(|i| i.is_equipped);

    let (bucket_hash, tier, class_type) = match lookup.definition(component.item_hash) {
        Some(def) => (def.bucket_hash, def.tier, def.class_type),
        None => (component.bucket_hash, TierType::Unknown, ClassType::Unknown),
    };

    Item {
        item_hash: component.item_hash,
        instance_id: component.item_instance_id,
        character_id: owner.map(str::to_string),
        bucket_hash,
        tier,
        class_type,
        power: instance
            .and_then(|i| i.primary_stat.as_ref())
            .map_or(0, |stat| stat.value),
        transfer_status: if equipped {
            TransferStatus::ItemIsEquipped
        } else {
            TransferStatus::from_flags(component.transfer_status)
        },
        quantity: component.quantity,
    }
}
