//! Guardian - inventory assistant core
//!
//! Reads a player's cross-character inventory, picks the highest-power
//! loadout for a character and realizes it (and plain item moves) against
//! the rate-limited remote inventory service.

pub mod core;
pub mod items;
pub mod loadout;
pub mod lookup;
pub mod operations;
pub mod remote;

pub use crate::core::error::{
    ConfigError, GuardianError, GuardianResult, InputError, RemoteError, SnapshotError,
};
