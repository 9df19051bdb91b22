//! Running totals for upload and download runs.

/// Counts accumulated over one upload run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub bytes_uploaded: u64,
    /// The run stopped early on a shutdown signal
    pub interrupted: bool,
}

impl UploadSummary {
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.interrupted {
            out.push_str("\nUpload interrupted, manifest saved.");
        }
        out.push_str(&format!("\nSuccessfully uploaded {} files.", self.uploaded));
        out.push_str(&format!("\nFailed to upload {} files.", self.failed));
        out.push_str(&format!("\nSkipped {} files.", self.skipped));
        out.push_str(&format!(
            "\nTotal data uploaded: {}",
            format_bytes(self.bytes_uploaded)
        ));
        out
    }
}

/// Counts accumulated over one download run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Transfers that completed, whatever their digest outcome
    pub downloaded: usize,
    pub failed: usize,
    pub digest_mismatches: usize,
    pub skipped: usize,
    pub bytes_downloaded: u64,
    pub interrupted: bool,
}

impl DownloadSummary {
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.interrupted {
            out.push_str("\nDownload interrupted, manifest saved.");
        }
        out.push_str("\nDownload Summary:");
        out.push_str(&format!("\nSuccessfully downloaded: {} files", self.downloaded));
        out.push_str(&format!("\nFailed to download: {} files", self.failed));
        out.push_str(&format!(
            "\nSHA-256 comparison failed: {} files",
            self.digest_mismatches
        ));
        out.push_str(&format!("\nSkipped (no swarm reference): {} files", self.skipped));
        out.push_str(&format!(
            "\nTotal data downloaded: {}",
            format_bytes(self.bytes_downloaded)
        ));
        out
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0.00 B");
        assert_eq!(format_bytes(1023), "1023.00 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GB");
    }

    #[test]
    fn test_upload_summary_render() {
        let summary = UploadSummary {
            uploaded: 3,
            failed: 1,
            skipped: 2,
            bytes_uploaded: 3 * 1024 * 1024,
            interrupted: false,
        };
        let text = summary.render();
        assert!(text.contains("Successfully uploaded 3 files."));
        assert!(text.contains("Failed to upload 1 files."));
        assert!(text.contains("Total data uploaded: 3.00 MB"));
        assert!(!text.contains("interrupted"));
    }

    #[test]
    fn test_download_summary_render_interrupted() {
        let summary = DownloadSummary {
            downloaded: 2,
            digest_mismatches: 1,
            interrupted: true,
            ..DownloadSummary::default()
        };
        let text = summary.render();
        assert!(text.starts_with("\nDownload interrupted"));
        assert!(text.contains("Successfully downloaded: 2 files"));
        assert!(text.contains("SHA-256 comparison failed: 1 files"));
    }
}
