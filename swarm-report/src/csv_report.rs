//! CSV summary of upload/download history, one row per manifest record.

use crate::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use swarm_sync::manifest::timestamp;
use swarm_sync::{FileRecord, Manifest};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Column names, in [`ReportRow`] field order
pub const HEADER: [&str; 9] = [
    "filename",
    "size",
    "swarmHash",
    "first uploaded",
    "last uploaded",
    "last successful download",
    "number of times successfully downloaded",
    "last successful download speed (MB/s)",
    "last successful upload speed (MB/s)",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub filename: String,
    pub size: u64,
    #[serde(rename = "swarmHash")]
    pub swarm_hash: String,
    #[serde(rename = "first uploaded")]
    pub first_uploaded: String,
    #[serde(rename = "last uploaded")]
    pub last_uploaded: String,
    #[serde(rename = "last successful download")]
    pub last_successful_download: String,
    #[serde(rename = "number of times successfully downloaded")]
    pub successful_downloads: usize,
    /// `None` when the speed cannot be computed; written as an empty cell
    #[serde(rename = "last successful download speed (MB/s)")]
    pub last_download_speed: Option<f64>,
    #[serde(rename = "last successful upload speed (MB/s)")]
    pub last_upload_speed: Option<f64>,
}

impl ReportRow {
    pub fn from_record(record: &FileRecord) -> Self {
        let upload_ends: Vec<_> = record.successful_uploads().map(|a| a.timestamp_end).collect();
        let download_ends: Vec<_> = record.successful_downloads().map(|a| a.timestamp_end).collect();

        let last_upload_speed = record
            .successful_uploads()
            .last()
            .and_then(|a| speed_mbps(record.size, a.elapsed_secs()));
        let last_download_speed = record
            .successful_downloads()
            .last()
            .and_then(|a| speed_mbps(record.size, Some(a.elapsed_secs())));

        let format_opt = |value: Option<&chrono::NaiveDateTime>| {
            value.map(timestamp::format).unwrap_or_default()
        };

        Self {
            filename: record.filename.clone(),
            size: record.size,
            swarm_hash: record
                .swarm_hash
                .as_ref()
                .map(|h| h.to_string())
                .unwrap_or_default(),
            first_uploaded: format_opt(upload_ends.iter().min()),
            last_uploaded: format_opt(upload_ends.iter().max()),
            last_successful_download: format_opt(download_ends.iter().max()),
            successful_downloads: download_ends.len(),
            last_download_speed,
            last_upload_speed,
        }
    }
}

/// Transfer speed in MB/s rounded to two decimals.
///
/// Returns `None` when the duration is unknown, zero or negative.
pub fn speed_mbps(size_bytes: u64, elapsed_secs: Option<i64>) -> Option<f64> {
    let elapsed = elapsed_secs.filter(|secs| *secs > 0)?;
    let speed = size_bytes as f64 / BYTES_PER_MB / elapsed as f64;
    Some((speed * 100.0).round() / 100.0)
}

pub fn build_rows(manifest: &Manifest) -> Vec<ReportRow> {
    manifest.records().iter().map(ReportRow::from_record).collect()
}

/// Write the report, header first, to any writer
pub fn write_report<W: Write>(manifest: &Manifest, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    // Written up front so an empty manifest still yields a header line
    csv_writer.write_record(HEADER)?;
    for row in build_rows(manifest) {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_file(manifest: &Manifest, output: &Path) -> Result<()> {
    let file = std::fs::File::create(output)?;
    write_report(manifest, file)?;
    tracing::info!("Wrote {} CSV rows to {}", manifest.len(), output.display());
    Ok(())
}
