//! Remote inventory service: HTTP client pool, wire format, retry policy and
//! item moves.

pub mod client;
pub mod mock;
pub mod moves;
pub mod pool;
pub mod retry;
pub mod service;
pub mod wire;

pub use client::*;
pub use mock::*;
pub use moves::*;
pub use pool::*;
pub use retry::*;
pub use service::*;
