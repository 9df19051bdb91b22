//! Upload and download runs over the manifest.
//!
//! Both runs walk the manifest in order, one swarm-cli process at a time,
//! append one attempt per processed record and rewrite the manifest
//! after each one.

pub mod download;
pub mod summary;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use download::Downloader;
pub use summary::{DownloadSummary, UploadSummary};
pub use upload::Uploader;
