//! swarm-sync library
//!
//! Manifest-driven bulk upload and download against Swarm, delegating the
//! network work to the external `swarm-cli` binary.

pub mod config;
pub mod filelist;
pub mod fs;
pub mod manifest;
pub mod shutdown;
pub mod swarm;
pub mod transfer;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use manifest::{FileRecord, Manifest, SwarmHash};
pub use utils::errors::{Result, SyncError};
