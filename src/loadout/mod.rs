//! Max-light loadout selection and its realization against the remote service.

pub mod orchestrator;
pub mod selector;
pub mod types;

pub use orchestrator::*;
pub use selector::*;
pub use types::*;
