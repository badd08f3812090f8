//! Item definitions and spoken-name resolution.

pub mod definitions;
pub mod names;

pub use definitions::*;
pub use names::*;
