//! Normalisation of spoken item and class names.
//!
//! Speech recognition splits or mishears several item and class names; these
//! tables map the common variants back to the canonical names.

use crate::core::error::InputError;
use crate::items::types::ClassType;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

const ITEM_NAME_TRANSLATIONS: [(&str, &str); 12] = [
    ("spin metal", "spinmetal"),
    ("spin mental", "spinmetal"),
    ("spin middle", "spinmetal"),
    ("passage coins", "passage coin"),
    ("strange coins", "strange coin"),
    ("exotic shards", "exotic shard"),
    ("worm spore", "wormspore"),
    ("worms for", "wormspore"),
    ("worm for", "wormspore"),
    ("3 of coins", "three of coins"),
    ("motes", "mote of light"),
    ("motes of light", "mote of light"),
];

const CLASS_NAME_TRANSLATIONS: [(&str, &str); 2] = [("fault", "vault"), ("tatum", "titan")];

fn collapse(spoken: &str) -> String {
    spoken
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn translate(name: String, table: &[(&str, &str)]) -> String {
    table
        .iter()
        .find(|(heard, _)| *heard == name)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(name)
}

/// Lowercased, whitespace-collapsed, translated item name.
pub fn normalize_item_name(spoken: &str) -> String {
    translate(collapse(spoken), &ITEM_NAME_TRANSLATIONS)
}

/// Where a transfer should end up, as named by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Vault,
    Class(ClassType),
}

impl Destination {
    pub fn parse(spoken: &str) -> Result<Self, InputError> {
        let name = translate(collapse(spoken), &CLASS_NAME_TRANSLATIONS);
        match name.as_str() {
            "" => Err(InputError::MissingDestination),
            "vault" => Ok(Destination::Vault),
            "titan" => Ok(Destination::Class(ClassType::Titan)),
            "hunter" => Ok(Destination::Class(ClassType::Hunter)),
            "warlock" => Ok(Destination::Class(ClassType::Warlock)),
            _ => {
                warn!(class_name = %spoken, "unknown class name");
                Err(InputError::UnknownClass(spoken.to_string()))
            }
        }
    }
}

impl FromStr for Destination {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Destination::parse(s)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Vault => f.write_str("vault"),
            Destination::Class(class) => write!(f, "{}", class),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_item_name() {
        assert_eq!(normalize_item_name("  Spin   Metal "), "spinmetal");
        assert_eq!(normalize_item_name("Motes"), "mote of light");
        assert_eq!(normalize_item_name("Gjallarhorn"), "gjallarhorn");
    }

    #[test]
    fn test_destination_parse() {
        assert_eq!(Destination::parse("Vault"), Ok(Destination::Vault));
        assert_eq!(Destination::parse("fault"), Ok(Destination::Vault));
        assert_eq!(
            Destination::parse("tatum"),
            Ok(Destination::Class(ClassType::Titan))
        );
        assert_eq!(
            "warlock".parse::<Destination>(),
            Ok(Destination::Class(ClassType::Warlock))
        );
    }

    #[test]
    fn test_destination_errors() {
        assert_eq!(Destination::parse("   "), Err(InputError::MissingDestination));
        assert_eq!(
            Destination::parse("paladin"),
            Err(InputError::UnknownClass("paladin".to_string()))
        );
    }

    #[test]
    fn test_destination_display() {
        assert_eq!(Destination::Vault.to_string(), "vault");
        assert_eq!(Destination::Class(ClassType::Hunter).to_string(), "hunter");
    }
}
