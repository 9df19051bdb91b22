use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("Failed to read {path}: {source}")]
    Include {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Sync(#[from] swarm_sync::SyncError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
