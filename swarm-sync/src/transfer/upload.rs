//! Upload run: push every eligible manifest record through swarm-cli.

use super::summary::UploadSummary;
use crate::config::{Settings, UploadFilter, UploadSettings};
use crate::manifest::{timestamp, FileRecord, Manifest, SwarmHash, UploadAttempt};
use crate::swarm::SwarmClient;
use crate::utils::errors::Result;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why a record was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Filter is `pending` and the record already has a reference
    AlreadyUploaded,
    TooLarge { size: u64, max: u64 },
}

/// Decide whether `record` is skipped under the given upload settings
pub fn skip_reason(record: &FileRecord, options: &UploadSettings) -> Option<SkipReason> {
    if options.filter == UploadFilter::Pending && record.swarm_hash.is_some() {
        return Some(SkipReason::AlreadyUploaded);
    }
    match options.max_file_size {
        Some(max) if record.size > max => Some(SkipReason::TooLarge {
            size: record.size,
            max,
        }),
        _ => None,
    }
}

/// Drives swarm-cli uploads over a manifest
pub struct Uploader<C> {
    client: C,
    options: UploadSettings,
    manifest_path: PathBuf,
    cancel_token: CancellationToken,
}

impl<C: SwarmClient> Uploader<C> {
    /// Create an uploader (no cancellation support)
    pub fn new(client: C, settings: &Settings) -> Self {
        Self::with_cancel(client, settings, CancellationToken::new())
    }

    /// Create an uploader that stops when `cancel_token` is cancelled
    pub fn with_cancel(client: C, settings: &Settings, cancel_token: CancellationToken) -> Self {
        Self {
            client,
            options: settings.upload.clone(),
            manifest_path: settings.manifest.path.clone(),
            cancel_token,
        }
    }

    /// Upload every eligible record, saving the manifest after each one.
    ///
    /// Per-file failures are recorded on the record and never abort the
    /// run; only a failed manifest save does.
    pub async fn run(&self, manifest: &mut Manifest) -> Result<UploadSummary> {
        let mut summary = UploadSummary::default();

        info!(
            "Starting upload of {} records (filter: {:?}, max size: {:?})",
            manifest.len(),
            self.options.filter,
            self.options.max_file_size
        );

        for index in 0..manifest.len() {
            if self.cancel_token.is_cancelled() {
                summary.interrupted = true;
                break;
            }

            let record = &manifest.records()[index];
            if let Some(reason) = skip_reason(record, &self.options) {
                debug!("Skipping {}: {:?}", record.full_path.display(), reason);
                if let SkipReason::TooLarge { size, max } = reason {
                    println!(
                        "Skipping {}: {} bytes exceeds limit of {} bytes",
                        record.full_path.display(),
                        size,
                        max
                    );
                }
                summary.skipped += 1;
                continue;
            }

            println!("Working on file: {}", record.full_path.display());

            let outcome = tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => None,
                outcome = self.upload_record(record) => Some(outcome),
            };
            let Some((attempt, reference)) = outcome else {
                info!("Upload of {} abandoned on shutdown", record.full_path.display());
                summary.interrupted = true;
                break;
            };

            let record = &mut manifest.records_mut()[index];
            match &attempt.error {
                None => {
                    summary.uploaded += 1;
                    summary.bytes_uploaded += record.size;
                    println!("Successfully uploaded: {}", record.full_path.display());
                }
                Some(error) => {
                    summary.failed += 1;
                    warn!("Upload of {} failed: {}", record.full_path.display(), error);
                    println!("Failed to upload: {}", record.full_path.display());
                }
            }
            record.record_upload(attempt, reference);

            manifest.save(&self.manifest_path)?;
        }

        if summary.interrupted {
            manifest.save(&self.manifest_path)?;
        }

        Ok(summary)
    }

    /// Run swarm-cli for one record and turn its output into an attempt
    async fn upload_record(&self, record: &FileRecord) -> (UploadAttempt, Option<SwarmHash>) {
        let start = timestamp::now();
        let result = self.client.upload(&record.full_path).await;
        let end = timestamp::now();

        match result {
            Ok(output) if output.success => match SwarmHash::from_cli_output(&output.stdout) {
                Some(reference) => (
                    UploadAttempt::succeeded(start, end, output.stdout),
                    Some(reference),
                ),
                None => (
                    UploadAttempt::failed(
                        start,
                        end,
                        Some(output.stdout),
                        "no swarm reference found in swarm-cli output".to_string(),
                    ),
                    None,
                ),
            },
            Ok(output) => {
                let error = output.error_text();
                (UploadAttempt::failed(start, end, Some(output.stdout), error), None)
            }
            Err(e) => (
                UploadAttempt::failed(start, end, None, format!("failed to run swarm-cli: {}", e)),
                None,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::testing::{fail, ok, FakeSwarm, Scripted};
    use tempfile::TempDir;

    fn hash(byte: &str) -> String {
        byte.repeat(32)
    }

    fn record(name: &str, size: u64) -> FileRecord {
        FileRecord::new(
            PathBuf::from(format!("/data/{}", name)),
            name.to_string(),
            hash("00"),
            size,
        )
    }

    fn setup(records: Vec<FileRecord>) -> (TempDir, Settings, Manifest) {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.manifest.path = dir.path().join("filelist.json");
        settings.swarm.stamp_id = "stamp".to_string();
        let manifest = Manifest::new(records);
        manifest.save(&settings.manifest.path).unwrap();
        (dir, settings, manifest)
    }

    #[test]
    fn test_skip_reason() {
        let mut options = UploadSettings::default();
        let mut uploaded = record("a.bin", 10);
        uploaded.swarm_hash = Some(hash("ab").parse().unwrap());

        assert_eq!(skip_reason(&uploaded, &options), None);

        options.filter = UploadFilter::Pending;
        assert_eq!(skip_reason(&uploaded, &options), Some(SkipReason::AlreadyUploaded));
        assert_eq!(skip_reason(&record("b.bin", 10), &options), None);

        options.max_file_size = Some(10);
        assert_eq!(skip_reason(&record("c.bin", 10), &options), None);
        assert_eq!(
            skip_reason(&record("d.bin", 11), &options),
            Some(SkipReason::TooLarge { size: 11, max: 10 })
        );
    }

    #[tokio::test]
    async fn test_one_attempt_per_record_and_saved_after_each() -> Result<()> {
        let (_dir, settings, mut manifest) =
            setup(vec![record("a.bin", 100), record("b.bin", 200), record("c.bin", 300)]);

        let mut client = FakeSwarm::new(vec![
            ok(&format!("curl -X POST ...\n{}", hash("aa"))),
            fail(1, "Error: stamp expired"),
            Scripted::SpawnError,
        ]);
        client.watch_manifest = Some(settings.manifest.path.clone());

        let uploader = Uploader::new(client, &settings);
        let summary = uploader.run(&mut manifest).await?;

        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.bytes_uploaded, 100);
        assert!(!summary.interrupted);

        let records = manifest.records();
        assert!(records.iter().all(|r| r.upload_attempts.len() == 1));
        assert_eq!(records[0].swarm_hash.as_ref().map(|h| h.to_string()), Some(hash("aa")));
        assert!(records[0].upload_attempts[0].is_success());
        assert_eq!(records[1].swarm_hash, None);
        assert_eq!(
            records[1].upload_attempts[0].error.as_deref(),
            Some("Error: stamp expired")
        );
        assert!(records[2].upload_attempts[0]
            .error
            .as_deref()
            .unwrap()
            .starts_with("failed to run swarm-cli"));

        // Before each call the previous record's attempt is already on disk
        let snapshots = uploader.client.snapshots.borrow();
        let attempts_on_disk: Vec<usize> = snapshots
            .iter()
            .map(|m| m.records().iter().map(|r| r.upload_attempts.len()).sum())
            .collect();
        assert_eq!(attempts_on_disk, vec![0, 1, 2]);

        assert_eq!(Manifest::load(&settings.manifest.path)?, manifest);
        Ok(())
    }

    #[tokio::test]
    async fn test_skipped_records_are_untouched() -> Result<()> {
        let mut already = record("a.bin", 100);
        already.swarm_hash = Some(hash("ab").parse().unwrap());
        let (_dir, mut settings, mut manifest) =
            setup(vec![already, record("big.bin", 5_000), record("c.bin", 10)]);
        settings.upload.filter = UploadFilter::Pending;
        settings.upload.max_file_size = Some(1_000);

        let client = FakeSwarm::new(vec![ok(&hash("cc"))]);
        let uploader = Uploader::new(client, &settings);
        let summary = uploader.run(&mut manifest).await?;

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.uploaded, 1);
        assert_eq!(
            *uploader.client.calls.borrow(),
            vec!["upload /data/c.bin".to_string()]
        );

        let records = manifest.records();
        assert!(records[0].upload_attempts.is_empty());
        assert_eq!(records[0].swarm_hash.as_ref().map(|h| h.to_string()), Some(hash("ab")));
        assert!(records[1].upload_attempts.is_empty());
        assert_eq!(records[2].upload_attempts.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_reupload_overwrites_reference() -> Result<()> {
        let mut already = record("a.bin", 100);
        already.swarm_hash = Some(hash("ab").parse().unwrap());
        let (_dir, settings, mut manifest) = setup(vec![already]);

        let uploader = Uploader::new(FakeSwarm::new(vec![ok(&hash("cd"))]), &settings);
        uploader.run(&mut manifest).await?;

        let record = &manifest.records()[0];
        assert_eq!(record.swarm_hash.as_ref().map(|h| h.to_string()), Some(hash("cd")));
        assert_eq!(record.upload_attempts.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_success_without_reference_is_a_failure() -> Result<()> {
        let (_dir, settings, mut manifest) = setup(vec![record("a.bin", 100)]);

        let uploader = Uploader::new(FakeSwarm::new(vec![ok("upload queued")]), &settings);
        let summary = uploader.run(&mut manifest).await?;

        assert_eq!(summary.failed, 1);
        let attempt = &manifest.records()[0].upload_attempts[0];
        assert_eq!(attempt.response_body.as_deref(), Some("upload queued"));
        assert!(attempt.error.as_deref().unwrap().contains("no swarm reference"));
        assert_eq!(manifest.records()[0].swarm_hash, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_cancellation_saves_and_stops() -> Result<()> {
        let (_dir, settings, mut manifest) =
            setup(vec![record("a.bin", 100), record("b.bin", 200), record("c.bin", 300)]);

        let token = CancellationToken::new();
        let client = FakeSwarm::new(vec![
            ok(&hash("aa")),
            Scripted::CancelAndHang(token.clone()),
            ok(&hash("cc")),
        ]);
        let uploader = Uploader::with_cancel(client, &settings, token);
        let summary = uploader.run(&mut manifest).await?;

        assert!(summary.interrupted);
        assert_eq!(summary.uploaded, 1);
        assert_eq!(uploader.client.calls.borrow().len(), 2);

        let saved = Manifest::load(&settings.manifest.path)?;
        assert_eq!(saved, manifest);
        assert_eq!(saved.records()[0].upload_attempts.len(), 1);
        assert!(saved.records()[1].upload_attempts.is_empty());
        assert!(saved.records()[2].upload_attempts.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_cancelled_before_start() -> Result<()> {
        let (_dir, settings, mut manifest) = setup(vec![record("a.bin", 100)]);

        let token = CancellationToken::new();
        token.cancel();
        let uploader = Uploader::with_cancel(FakeSwarm::new(vec![]), &settings, token);
        let summary = uploader.run(&mut manifest).await?;

        assert!(summary.interrupted);
        assert!(uploader.client.calls.borrow().is_empty());
        Ok(())
    }
}
