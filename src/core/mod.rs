//! Constants, errors, configuration and logging shared across the crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use logging::*;
