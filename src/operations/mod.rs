//! User-facing operations consumed by the voice layer and the CLI.

pub mod count;
pub mod engrams;
pub mod max_light;
pub mod transfer;

pub use count::*;
pub use engrams::*;
pub use max_light::*;
pub use transfer::{transfer_item, TransferCommand, TransferFailure, TransferReport};
