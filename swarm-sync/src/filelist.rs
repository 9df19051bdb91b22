//! Manifest builder: turns a directory tree into the initial file list.

use crate::fs::digest::sha256_file;
use crate::fs::walker::{walk_directory, WalkOptions};
use crate::manifest::{FileRecord, Manifest};
use crate::utils::errors::Result;
use std::path::Path;
use tracing::info;

/// Default output file for `swarm-sync filelist`
pub const DEFAULT_FILELIST: &str = "filelist.json";

/// Hash every regular file under `root` into a fresh manifest.
///
/// Any I/O failure aborts the whole build.
pub fn build_manifest(root: &Path, recursive: bool) -> Result<Manifest> {
    let files = walk_directory(root, WalkOptions::recursive(recursive))?;
    let mut records = Vec::with_capacity(files.len());

    for file in files {
        info!("Processing {}...", file.path.display());
        let digest = sha256_file(&file.path)?;
        records.push(FileRecord::new(file.path, file.file_name, digest, file.size));
    }

    Ok(Manifest::new(records))
}

/// Build the manifest for `root` and write it to `output`
pub fn generate_filelist(root: &Path, recursive: bool, output: &Path) -> Result<Manifest> {
    let manifest = build_manifest(root, recursive)?;
    manifest.save(output)?;
    info!("File list generated: {} ({} files)", output.display(), manifest.len());
    Ok(manifest)
}
