use crate::core::constants::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Equipment slots, in the fixed order used for every per-slot iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Kinetic,
    Energy,
    Power,
    Ghost,
    Helmet,
    Gauntlets,
    Chest,
    Legs,
    ClassArmor,
    Artifact,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 10] = [
        EquipmentSlot::Kinetic,
        EquipmentSlot::Energy,
        EquipmentSlot::Power,
        EquipmentSlot::Ghost,
        EquipmentSlot::Helmet,
        EquipmentSlot::Gauntlets,
        EquipmentSlot::Chest,
        EquipmentSlot::Legs,
        EquipmentSlot::ClassArmor,
        EquipmentSlot::Artifact,
    ];

    /// Slots that share the one-exotic-weapon rule.
    pub const WEAPONS: [EquipmentSlot; 3] = [
        EquipmentSlot::Kinetic,
        EquipmentSlot::Energy,
        EquipmentSlot::Power,
    ];

    /// Slots that share the one-exotic-armor rule.
    pub const ARMOR: [EquipmentSlot; 4] = [
        EquipmentSlot::Helmet,
        EquipmentSlot::Gauntlets,
        EquipmentSlot::Chest,
        EquipmentSlot::Legs,
    ];

    pub fn bucket_hash(self) -> u32 {
        match self {
            EquipmentSlot::Kinetic => KINETIC_BUCKET,
            EquipmentSlot::Energy => ENERGY_BUCKET,
            EquipmentSlot::Power => POWER_BUCKET,
            EquipmentSlot::Ghost => GHOST_BUCKET,
            EquipmentSlot::Helmet => HELMET_BUCKET,
            EquipmentSlot::Gauntlets => GAUNTLETS_BUCKET,
            EquipmentSlot::Chest => CHEST_BUCKET,
            EquipmentSlot::Legs => LEGS_BUCKET,
            EquipmentSlot::ClassArmor => CLASS_ARMOR_BUCKET,
            EquipmentSlot::Artifact => ARTIFACT_BUCKET,
        }
    }

    pub fn from_bucket_hash(bucket_hash: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.bucket_hash() == bucket_hash)
    }

    /// Weight of this slot in the character power level.
    pub fn power_weight(self) -> f64 {
        match self {
            EquipmentSlot::Kinetic | EquipmentSlot::Energy | EquipmentSlot::Power => {
                WEAPON_POWER_WEIGHT
            }
            EquipmentSlot::Helmet
            | EquipmentSlot::Gauntlets
            | EquipmentSlot::Chest
            | EquipmentSlot::Legs => ARMOR_POWER_WEIGHT,
            EquipmentSlot::ClassArmor => CLASS_ARMOR_POWER_WEIGHT,
            EquipmentSlot::Ghost | EquipmentSlot::Artifact => 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentSlot::Kinetic => "kinetic",
            EquipmentSlot::Energy => "energy",
            EquipmentSlot::Power => "power",
            EquipmentSlot::Ghost => "ghost",
            EquipmentSlot::Helmet => "helmet",
            EquipmentSlot::Gauntlets => "gauntlets",
            EquipmentSlot::Chest => "chest",
            EquipmentSlot::Legs => "legs",
            EquipmentSlot::ClassArmor => "class armor",
            EquipmentSlot::Artifact => "artifact",
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Item rarity as reported by the item definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TierType {
    Unknown = 0,
    Currency = 1,
    Basic = 2,
    Common = 3,
    Rare = 4,
    Legendary = 5,
    Exotic = 6,
}

impl TierType {
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => TierType::Currency,
            2 => TierType::Basic,
            3 => TierType::Common,
            4 => TierType::Rare,
            5 => TierType::Legendary,
            6 => TierType::Exotic,
            _ => TierType::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TierType::Unknown => "Unknown",
            TierType::Currency => "Currency",
            TierType::Basic => "Basic",
            TierType::Common => "Common",
            TierType::Rare => "Rare",
            TierType::Legendary => "Legendary",
            TierType::Exotic => "Exotic",
        }
    }
}

/// Character class. Items report `Unknown` when any class may use them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassType {
    Titan,
    Hunter,
    Warlock,
    Unknown,
}

impl ClassType {
    pub const PLAYABLE: [ClassType; 3] = [ClassType::Titan, ClassType::Hunter, ClassType::Warlock];

    pub fn from_code(code: u32) -> Self {
        match code {
            0 => ClassType::Titan,
            1 => ClassType::Hunter,
            2 => ClassType::Warlock,
            _ => ClassType::Unknown,
        }
    }

    pub fn from_class_hash(hash: u32) -> Self {
        match hash {
            TITAN_CLASS_HASH => ClassType::Titan,
            HUNTER_CLASS_HASH => ClassType::Hunter,
            WARLOCK_CLASS_HASH => ClassType::Warlock,
            _ => ClassType::Unknown,
        }
    }

    /// Whether a character of this class can equip gear restricted to `item_class`.
    pub fn can_use(self, item_class: ClassType) -> bool {
        item_class == ClassType::Unknown || item_class == self
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClassType::Titan => "titan",
            ClassType::Hunter => "hunter",
            ClassType::Warlock => "warlock",
            ClassType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferStatus {
    CanTransfer,
    ItemIsEquipped,
    NotTransferrable,
    NoRoomInDestination,
}

impl TransferStatus {
    /// Decodes the platform's flag value; equipped wins over the other flags.
    pub fn from_flags(flags: u32) -> Self {
        if flags & 1 != 0 {
            TransferStatus::ItemIsEquipped
        } else if flags & 2 != 0 {
            TransferStatus::NotTransferrable
        } else if flags & 4 != 0 {
            TransferStatus::NoRoomInDestination
        } else {
            TransferStatus::CanTransfer
        }
    }
}

/// Where an item currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner<'a> {
    Vault,
    Character(&'a str),
}

impl fmt::Display for Owner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Vault => f.write_str("vault"),
            Owner::Character(id) => write!(f, "character {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_hash: u32,
    /// Present for instanced gear, absent for stackables.
    pub instance_id: Option<String>,
    /// `None` means the item sits in the shared vault.
    pub character_id: Option<String>,
    pub bucket_hash: u32,
    pub tier: TierType,
    pub class_type: ClassType,
    pub power: u32,
    pub transfer_status: TransferStatus,
    pub quantity: u32,
}

impl Item {
    pub fn slot(&self) -> Option<EquipmentSlot> {
        EquipmentSlot::from_bucket_hash(self.bucket_hash)
    }

    pub fn owner(&self) -> Owner<'_> {
        match &self.character_id {
            Some(id) => Owner::Character(id),
            None => Owner::Vault,
        }
    }

    pub fn is_in_vault(&self) -> bool {
        self.character_id.is_none()
    }

    pub fn is_on(&self, character_id: &str) -> bool {
        self.character_id.as_deref() == Some(character_id)
    }

    pub fn is_equipped(&self) -> bool {
        self.transfer_status == TransferStatus::ItemIsEquipped
    }

    pub fn is_exotic(&self) -> bool {
        self.tier == TierType::Exotic
    }

    /// Same physical item: instance id when instanced, otherwise hash and owner.
    pub fn same_item(&self, other: &Item) -> bool {
        match (&self.instance_id, &other.instance_id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => {
                self.item_hash == other.item_hash && self.character_id == other.character_id
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub character_id: String,
    pub membership_id: String,
    pub membership_type: u32,
    pub class_type: ClassType,
    pub power_level: u32,
    pub date_last_played: Option<DateTime<Utc>>,
}

/// A destination account as addressed by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub membership_id: String,
    pub membership_type: u32,
}
