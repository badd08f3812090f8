//! Error taxonomy shared by the planning, orchestration and remote layers.

use crate::core::constants::{THROTTLE_ERROR_CODE, THROTTLE_ERROR_STATUS};
use crate::items::types::ClassType;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single call against the remote inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("throttled by remote service: {status} ({code})")]
    Throttled { code: i32, status: String },

    #[error("remote service rejected request: {status} ({code}): {message}")]
    Rejected {
        code: i32,
        status: String,
        message: String,
    },

    #[error("HTTP transport failure: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Classifies a non-success envelope returned by the platform.
    pub fn from_envelope(code: i32, status: &str, message: &str) -> Self {
        if code == THROTTLE_ERROR_CODE || status == THROTTLE_ERROR_STATUS {
            RemoteError::Throttled {
                code,
                status: status.to_string(),
            }
        } else {
            RemoteError::Rejected {
                code,
                status: status.to_string(),
                message: message.to_string(),
            }
        }
    }

    /// True for the momentary throttle signal, the only retryable failure.
    pub fn is_throttle(&self) -> bool {
        matches!(self, RemoteError::Throttled { .. })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}

/// Request rejected before any remote call was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown item name: {0}")]
    UnknownItem(String),

    #[error("unknown class name: {0}")]
    UnknownClass(String),

    #[error("quantity must be a positive number, got {0}")]
    NonPositiveQuantity(i64),

    #[error("a destination is required")]
    MissingDestination,

    #[error("no {0} character on this account")]
    NoCharacterForClass(ClassType),

    #[error("character {0} is not part of this profile")]
    UnknownCharacter(String),

    #[error("no characters on this account")]
    NoCharacters,
}

/// Snapshot failed its consistency checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("item {item_hash} references unknown character {character_id}")]
    UnknownOwner { item_hash: u32, character_id: String },

    #[error("duplicate character {0} in snapshot")]
    DuplicateCharacter(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing required configuration value: {0}")]
    Missing(&'static str),

    #[error("no item definitions in {0}")]
    EmptyDefinitions(PathBuf),

    #[error("invalid local address {0:?}")]
    InvalidAddress(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("could not determine the configuration directory")]
    NoConfigDir,
}

/// Umbrella error for the user-facing operations and the binary.
#[derive(Debug, Error)]
pub enum GuardianError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type GuardianResult<T> = Result<T, GuardianError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_code_is_classified_as_throttle() {
        let err = RemoteError::from_envelope(36, "SomethingElse", "slow down");
        assert!(err.is_throttle());
    }

    #[test]
    fn test_throttle_status_is_classified_as_throttle() {
        let err = RemoteError::from_envelope(1672, THROTTLE_ERROR_STATUS, "");
        assert!(err.is_throttle());
    }

    #[test]
    fn test_other_codes_are_permanent() {
        let err = RemoteError::from_envelope(1642, "DestinyNoRoomInDestination", "full");
        assert!(!err.is_throttle());
        assert_eq!(
            err.to_string(),
            "remote service rejected request: DestinyNoRoomInDestination (1642): full"
        );
    }

    #[test]
    fn test_input_error_messages() {
        assert_eq!(
            InputError::NonPositiveQuantity(-3).to_string(),
            "quantity must be a positive number, got -3"
        );
        assert_eq!(
            InputError::NoCharacterForClass(ClassType::Warlock).to_string(),
            "no warlock character on this account"
        );
    }
}
