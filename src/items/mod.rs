//! Inventory snapshot model: items, characters, filters and slot grouping.

pub mod filter;
pub mod grouping;
pub mod profile;
pub mod types;

pub use filter::*;
pub use grouping::*;
pub use profile::*;
pub use types::*;
