//! Utility modules for swarm-sync.

pub mod errors;
pub mod logger;

pub use errors::{Result, SyncError};
