//! Download run: fetch every uploaded record back and verify its digest.

use super::summary::DownloadSummary;
use crate::config::Settings;
use crate::fs::digest::{digests_match, sha256_file};
use crate::manifest::{timestamp, DigestComparison, DownloadAttempt, FileRecord, Manifest, SwarmHash};
use crate::swarm::SwarmClient;
use crate::utils::errors::Result;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Drives swarm-cli downloads over a manifest
pub struct Downloader<C> {
    client: C,
    location: PathBuf,
    manifest_path: PathBuf,
    cancel_token: CancellationToken,
}

impl<C: SwarmClient> Downloader<C> {
    pub fn new(client: C, settings: &Settings) -> Self {
        Self::with_cancel(client, settings, CancellationToken::new())
    }

    pub fn with_cancel(client: C, settings: &Settings, cancel_token: CancellationToken) -> Self {
        Self {
            client,
            location: settings.download.location_path.clone(),
            manifest_path: settings.manifest.path.clone(),
            cancel_token,
        }
    }

    /// Download every record that has a reference, saving after each one.
    ///
    /// Creates the download directory when missing. Process failures and
    /// digest mismatches are recorded on the record, not raised.
    pub async fn run(&self, manifest: &mut Manifest) -> Result<DownloadSummary> {
        let mut summary = DownloadSummary::default();

        if !self.location.exists() {
            info!("Creating download directory {}", self.location.display());
            std::fs::create_dir_all(&self.location)?;
        }

        for index in 0..manifest.len() {
            if self.cancel_token.is_cancelled() {
                summary.interrupted = true;
                break;
            }

            let record = &manifest.records()[index];
            let Some(reference) = record.swarm_hash.clone() else {
                summary.skipped += 1;
                continue;
            };

            println!("Working on file: {}", record.filename);

            let attempt = tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => None,
                attempt = self.download_record(record, &reference) => Some(attempt),
            };
            let Some(attempt) = attempt else {
                info!("Download of {} abandoned on shutdown", record.filename);
                summary.interrupted = true;
                break;
            };

            let record = &mut manifest.records_mut()[index];
            match (&attempt.error, attempt.sha256_comparison) {
                (Some(error), _) => {
                    summary.failed += 1;
                    warn!("Download of {} failed: {}", record.filename, error);
                    println!("Download failed for: {}", record.filename);
                }
                (None, DigestComparison::Failed) => {
                    summary.downloaded += 1;
                    summary.digest_mismatches += 1;
                    summary.bytes_downloaded += record.size;
                    println!("SHA-256 comparison failed for: {}", record.filename);
                }
                (None, DigestComparison::Successful) => {
                    summary.downloaded += 1;
                    summary.bytes_downloaded += record.size;
                    println!("Successfully downloaded: {}", record.filename);
                }
            }
            record.record_download(attempt);

            manifest.save(&self.manifest_path)?;
        }

        if summary.interrupted {
            manifest.save(&self.manifest_path)?;
        }

        Ok(summary)
    }

    async fn download_record(&self, record: &FileRecord, reference: &SwarmHash) -> DownloadAttempt {
        let start = timestamp::now();
        let result = self.client.download(reference, &self.location).await;
        let end = timestamp::now();

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                return DownloadAttempt::failed(
                    start,
                    end,
                    None,
                    format!("failed to run swarm-cli: {}", e),
                )
            }
        };

        if !output.success {
            let error = output.error_text();
            return DownloadAttempt::failed(start, end, Some(output.stdout), error);
        }

        let downloaded = self.location.join(&record.filename);
        match sha256_file(&downloaded) {
            Ok(digest) => {
                let comparison = if digests_match(&digest, &record.sha256) {
                    DigestComparison::Successful
                } else {
                    DigestComparison::Failed
                };
                DownloadAttempt::completed(start, end, comparison, output.stdout)
            }
            Err(e) => DownloadAttempt::failed(
                start,
                end,
                Some(output.stdout),
                format!("cannot read downloaded file {}: {}", downloaded.display(), e),
            ),
        }
    }
}
