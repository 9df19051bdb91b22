//! File records and the upload/download attempts appended to them.

use super::reference::SwarmHash;
use super::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One tracked file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub full_path: PathBuf,
    pub filename: String,
    /// Hex SHA-256 of the content, fixed by the manifest builder
    pub sha256: String,
    pub size: u64,

    /// Reference of the most recent successful upload
    #[serde(rename = "swarmHash", default, skip_serializing_if = "Option::is_none")]
    pub swarm_hash: Option<SwarmHash>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upload_attempts: Vec<UploadAttempt>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub download_attempts: Vec<DownloadAttempt>,
}

impl FileRecord {
    pub fn new(full_path: PathBuf, filename: String, sha256: String, size: u64) -> Self {
        Self {
            full_path,
            filename,
            sha256,
            size,
            swarm_hash: None,
            upload_attempts: Vec::new(),
            download_attempts: Vec::new(),
        }
    }

    /// Append an upload attempt; a returned reference replaces the stored one
    pub fn record_upload(&mut self, attempt: UploadAttempt, reference: Option<SwarmHash>) {
        if let Some(reference) = reference {
            self.swarm_hash = Some(reference);
        }
        self.upload_attempts.push(attempt);
    }

    pub fn record_download(&mut self, attempt: DownloadAttempt) {
        self.download_attempts.push(attempt);
    }

    pub fn successful_uploads(&self) -> impl Iterator<Item = &UploadAttempt> {
        self.upload_attempts.iter().filter(|a| a.is_success())
    }

    /// Downloads whose content matched the recorded digest
    pub fn successful_downloads(&self) -> impl Iterator<Item = &DownloadAttempt> {
        self.download_attempts
            .iter()
            .filter(|a| a.sha256_comparison == DigestComparison::Successful)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadAttempt {
    /// Absent on attempts written with the older single-`timestamp` layout
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub timestamp_start: Option<NaiveDateTime>,

    #[serde(with = "timestamp", alias = "timestamp")]
    pub timestamp_end: NaiveDateTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadAttempt {
    pub fn succeeded(start: NaiveDateTime, end: NaiveDateTime, response_body: String) -> Self {
        Self {
            timestamp_start: Some(start),
            timestamp_end: end,
            response_body: non_empty(response_body),
            error: None,
        }
    }

    pub fn failed(
        start: NaiveDateTime,
        end: NaiveDateTime,
        response_body: Option<String>,
        error: String,
    ) -> Self {
        Self {
            timestamp_start: Some(start),
            timestamp_end: end,
            response_body: response_body.and_then(non_empty),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Wall-clock seconds the upload took, if the start was recorded
    pub fn elapsed_secs(&self) -> Option<i64> {
        self.timestamp_start
            .map(|start| (self.timestamp_end - start).num_seconds())
    }
}

/// Outcome of comparing a downloaded file's digest with the recorded one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigestComparison {
    Successful,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadAttempt {
    #[serde(with = "timestamp")]
    pub timestamp_start: NaiveDateTime,

    #[serde(with = "timestamp")]
    pub timestamp_end: NaiveDateTime,

    pub sha256_comparison: DigestComparison,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DownloadAttempt {
    /// The transfer itself went through; the digest may still disagree
    pub fn completed(
        start: NaiveDateTime,
        end: NaiveDateTime,
        comparison: DigestComparison,
        response_body: String,
    ) -> Self {
        Self {
            timestamp_start: start,
            timestamp_end: end,
            sha256_comparison: comparison,
            response_body: non_empty(response_body),
            error: None,
        }
    }

    pub fn failed(
        start: NaiveDateTime,
        end: NaiveDateTime,
        response_body: Option<String>,
        error: String,
    ) -> Self {
        Self {
            timestamp_start: start,
            timestamp_end: end,
            sha256_comparison: DigestComparison::Failed,
            response_body: response_body.and_then(non_empty),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn elapsed_secs(&self) -> i64 {
        (self.timestamp_end - self.timestamp_start).num_seconds()
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
