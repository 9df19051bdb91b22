//! The manifest: a JSON array of file records tracking upload/download state.
//!
//! The whole manifest is the unit of durability. Upload and download runs
//! call [`Manifest::save`] after every processed record, so an interrupted
//! run loses at most the record that was in flight.

pub mod record;
pub mod reference;
pub mod timestamp;

pub use record::{DigestComparison, DownloadAttempt, FileRecord, UploadAttempt};
pub use reference::SwarmHash;

use crate::utils::errors::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    records: Vec<FileRecord>,
}

impl Manifest {
    pub fn new(records: Vec<FileRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [FileRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read a manifest from disk
    pub fn load(path: &Path) -> Result<Self> {
        let load = || -> Result<Self> {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        };
        load().map_err(|e| SyncError::ManifestLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Rewrite the whole manifest.
    ///
    /// Writes to a sibling `.tmp` file first and renames it over `path`, so
    /// readers never observe a half-written document.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp_path = tmp_path_for(path);
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            self.serialize(&mut serializer)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, path)?;
        tracing::trace!("Saved manifest with {} records to {}", self.len(), path.display());
        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "manifest.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
