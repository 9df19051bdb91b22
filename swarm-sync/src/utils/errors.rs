//! Custom error types for swarm-sync.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read settings {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Failed to load manifest {path}: {source}")]
    ManifestLoad {
        path: PathBuf,
        #[source]
        source: Box<SyncError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid swarm reference: {0}")]
    InvalidReference(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
