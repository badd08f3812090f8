//! Point-in-time snapshot of an account's characters and items.

use super::filter::ItemList;
use super::types::{Account, Character, ClassType, Item};
use crate::core::error::{InputError, SnapshotError};
use std::collections::HashSet;

/// Characters plus every item across characters and the vault, fetched together.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    account: Account,
    characters: Vec<Character>,
    items: Vec<Item>,
}

impl Profile {
    /// Builds a snapshot, checking that every carried item belongs to a listed character.
    pub fn new(
        account: Account,
        characters: Vec<Character>,
        items: Vec<Item>,
    ) -> Result<Self, SnapshotError> {
        let mut ids = HashSet::new();
        for character in &characters {
            if !ids.insert(character.character_id.as_str()) {
                return Err(SnapshotError::DuplicateCharacter(
                    character.character_id.clone(),
                ));
            }
        }

        if let Some(orphan) = items.iter().find(|item| {
            item.character_id
                .as_deref()
                .is_some_and(|id| !ids.contains(id))
        }) {
            return Err(SnapshotError::UnknownOwner {
                item_hash: orphan.item_hash,
                character_id: orphan.character_id.clone().unwrap_or_default(),
            });
        }

        Ok(Self {
            account,
            characters,
            items,
        })
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn all_items(&self) -> ItemList<'_> {
        self.items.iter().collect()
    }

    pub fn character(&self, character_id: &str) -> Option<&Character> {
        self.characters
            .iter()
            .find(|c| c.character_id == character_id)
    }

    pub fn require_character(&self, character_id: &str) -> Result<&Character, InputError> {
        self.character(character_id)
            .ok_or_else(|| InputError::UnknownCharacter(character_id.to_string()))
    }

    /// First character of the given class, in snapshot order.
    pub fn character_for_class(&self, class: ClassType) -> Result<&Character, InputError> {
        self.characters
            .iter()
            .find(|c| c.class_type == class)
            .ok_or(InputError::NoCharacterForClass(class))
    }

    /// Most recently played character; characters without a timestamp sort last.
    pub fn most_recent_character(&self) -> Option<&Character> {
        self.characters
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| {
                a.date_last_played
                    .cmp(&b.date_last_played)
                    .then_with(|| ib.cmp(ia))
            })
            .map(|(_, c)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::types::{EquipmentSlot, TierType, TransferStatus};
    use chrono::{TimeZone, Utc};

    fn account() -> Account {
        Account {
            membership_id: "4611686018".to_string(),
            membership_type: 2,
        }
    }

    fn character(id: &str, class: ClassType, played: Option<i64>) -> Character {
        Character {
            character_id: id.to_string(),
            membership_id: "4611686018".to_string(),
            membership_type: 2,
            class_type: class,
            power_level: 280,
            date_last_played: played.map(|ts| Utc.timestamp_opt(ts, 0).unwrap()),
        }
    }

    fn item_on(owner: Option<&str>) -> Item {
        Item {
            item_hash: 11,
            instance_id: Some("1".to_string()),
            character_id: owner.map(str::to_string),
            bucket_hash: EquipmentSlot::Helmet.bucket_hash(),
            tier: TierType::Legendary,
            class_type: ClassType::Unknown,
            power: 290,
            transfer_status: TransferStatus::CanTransfer,
            quantity: 1,
        }
    }

    #[test]
    fn test_rejects_orphaned_item() {
        let err = Profile::new(
            account(),
            vec![character("a", ClassType::Titan, None)],
            vec![item_on(Some("missing"))],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SnapshotError::UnknownOwner {
                item_hash: 11,
                character_id: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_characters() {
        let err = Profile::new(
            account(),
            vec![
                character("a", ClassType::Titan, None),
                character("a", ClassType::Hunter, None),
            ],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, SnapshotError::DuplicateCharacter("a".to_string()));
    }

    #[test]
    fn test_accepts_vault_and_character_items() {
        let profile = Profile::new(
            account(),
            vec![character("a", ClassType::Titan, None)],
            vec![item_on(None), item_on(Some("a"))],
        )
        .unwrap();
        assert_eq!(profile.all_items().len(), 2);
        assert!(profile.character("a").is_some());
        assert_eq!(
            profile.require_character("zzz"),
            Err(InputError::UnknownCharacter("zzz".to_string()))
        );
    }

    #[test]
    fn test_character_for_class() {
        let profile = Profile::new(
            account(),
            vec![
                character("a", ClassType::Titan, None),
                character("b", ClassType::Warlock, None),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(
            profile.character_for_class(ClassType::Warlock).unwrap().character_id,
            "b"
        );
        assert_eq!(
            profile.character_for_class(ClassType::Hunter),
            Err(InputError::NoCharacterForClass(ClassType::Hunter))
        );
    }

    #[test]
    fn test_most_recent_character() {
        let profile = Profile::new(
            account(),
            vec![
                character("a", ClassType::Titan, Some(1_500_000_000)),
                character("b", ClassType::Warlock, Some(1_600_000_000)),
                character("c", ClassType::Hunter, None),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(profile.most_recent_character().unwrap().character_id, "b");
    }

    #[test]
    fn test_most_recent_character_ties_pick_first() {
        let profile = Profile::new(
            account(),
            vec![
                character("a", ClassType::Titan, None),
                character("b", ClassType::Warlock, None),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(profile.most_recent_character().unwrap().character_id, "a");
    }
}
