use super::names::normalize_item_name;
use crate::core::constants::UNRESOLVABLE_ITEM_TYPES;
use crate::core::error::{ConfigError, InputError};
use crate::items::types::{ClassType, TierType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Static description of an item, keyed by its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    pub item_hash: u32,
    pub name: String,
    #[serde(default)]
    pub item_type_name: String,
    #[serde(default = "unknown_tier")]
    pub tier: TierType,
    #[serde(default = "any_class")]
    pub class_type: ClassType,
    pub bucket_hash: u32,
    #[serde(default = "single_stack")]
    pub max_stack_size: u32,
}

fn unknown_tier() -> TierType {
    TierType::Unknown
}

fn any_class() -> ClassType {
    ClassType::Unknown
}

fn single_stack() -> u32 {
    1
}

/// Resolves spoken item names and item metadata.
pub trait ItemLookup: Send + Sync {
    /// Item hash for a spoken name. Unknown names are recorded and rejected.
    fn hash_for_name(&self, name: &str) -> Result<u32, InputError>;

    fn definition(&self, item_hash: u32) -> Option<&ItemDefinition>;
}

/// In-memory definition table.
#[derive(Debug, Default)]
pub struct DefinitionTable {
    definitions: HashMap<u32, ItemDefinition>,
    names: HashMap<String, u32>,
    unknown_names: Mutex<Vec<String>>,
}

impl DefinitionTable {
    pub fn from_definitions(definitions: Vec<ItemDefinition>) -> Self {
        let mut names: HashMap<String, u32> = HashMap::new();
        let mut by_hash = HashMap::with_capacity(definitions.len());

        for definition in definitions {
            if !UNRESOLVABLE_ITEM_TYPES.contains(&definition.item_type_name.as_str()) {
                let key = normalize_item_name(&definition.name);
                let replace = names
                    .get(&key)
                    .and_then(|hash| by_hash.get(hash))
                    .map_or(true, |existing: &ItemDefinition| {
                        definition.max_stack_size > existing.max_stack_size
                    });
                if replace {
                    names.insert(key, definition.item_hash);
                }
            }
            by_hash.insert(definition.item_hash, definition);
        }

        Self {
            definitions: by_hash,
            names,
            unknown_names: Mutex::new(Vec::new()),
        }
    }

    /// Loads a JSON array of definitions.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let definitions: Vec<ItemDefinition> = serde_json::from_str(&json)?;
        info!(count = definitions.len(), path = %path.display(), "loaded item definitions");
        Ok(Self::from_definitions(definitions))
    }

    /// Loads the configured table. Gear tiers and class restrictions come
    /// from here, so an unset path or a table with no entries is rejected.
    pub fn load_required(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.ok_or(ConfigError::Missing("definitions_path"))?;
        let table = Self::load(path)?;
        if table.is_empty() {
            return Err(ConfigError::EmptyDefinitions(path.to_path_buf()));
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Names that failed to resolve, oldest first, for later curation.
    pub fn unknown_names(&self) -> Vec<String> {
        self.unknown_names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ItemLookup for DefinitionTable {
    fn hash_for_name(&self, name: &str) -> Result<u32, InputError> {
        let key = normalize_item_name(name);
        match self.names.get(&key) {
            Some(hash) => Ok(*hash),
            None => {
                warn!(item_name = %key, "no transferable item with that name");
                self.unknown_names
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(key);
                Err(InputError::UnknownItem(name.to_string()))
            }
        }
    }

    fn definition(&self, item_hash: u32) -> Option<&ItemDefinition> {
        self.definitions.get(&item_hash)
    }
}
