//! Settings shared by the uploader, the downloader and the report generators.
//!
//! Loaded once at startup from a TOML file. Every section is optional and
//! falls back to the defaults below.

use crate::utils::errors::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file looked up when `--settings` is not given
pub const DEFAULT_SETTINGS_PATH: &str = "settings.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub manifest: ManifestSettings,
    pub swarm: SwarmSettings,
    pub upload: UploadSettings,
    pub download: DownloadSettings,
    pub page: PageSettings,
    pub report: ReportSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSettings {
    /// Manifest (file list) read and rewritten by upload/download runs
    #[serde(default = "default_manifest_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmSettings {
    /// swarm-cli executable, resolved through PATH when not absolute
    #[serde(default = "default_cli_path")]
    pub cli_path: PathBuf,

    /// Bee node API URL passed as `--bee-api-url`
    #[serde(default)]
    pub bee_api_endpoint: Option<String>,

    /// Postage batch id used to pay for uploads
    #[serde(default)]
    pub stamp_id: String,

    /// Deferred upload mode
    #[serde(default = "default_true")]
    pub deferred_upload: bool,

    /// Ask swarm-cli to echo the equivalent curl commands
    #[serde(default = "default_true")]
    pub curl: bool,

    /// Gateway prefix used to build links in the HTML page
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFilter {
    /// Upload every record, re-uploading ones that already have a reference
    #[default]
    All,
    /// Only upload records without a swarm reference
    Pending,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadSettings {
    #[serde(default)]
    pub filter: UploadFilter,

    /// Files larger than this many bytes are skipped
    #[serde(default)]
    pub max_file_size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Directory swarm-cli downloads into
    #[serde(default = "default_download_location")]
    pub location_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSettings {
    #[serde(default = "default_page_title")]
    pub title: String,

    /// Stylesheet inlined into a `<style>` block
    #[serde(default)]
    pub css_path: Option<PathBuf>,

    /// HTML fragment inserted after the table
    #[serde(default)]
    pub footer_path: Option<PathBuf>,

    #[serde(default = "default_page_output")]
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_csv_output")]
    pub csv_output_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_manifest_path() -> PathBuf {
    PathBuf::from("filelist.json")
}

fn default_cli_path() -> PathBuf {
    PathBuf::from("swarm-cli")
}

fn default_true() -> bool {
    true
}

fn default_gateway_url() -> String {
    "https://gateway.ethswarm.org/bzz/".to_string()
}

fn default_download_location() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_page_title() -> String {
    "Swarm files".to_string()
}

fn default_page_output() -> PathBuf {
    PathBuf::from("generated_page.html")
}

fn default_csv_output() -> PathBuf {
    PathBuf::from("report.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ManifestSettings {
    fn default() -> Self {
        Self {
            path: default_manifest_path(),
        }
    }
}

impl Default for SwarmSettings {
    fn default() -> Self {
        Self {
            cli_path: default_cli_path(),
            bee_api_endpoint: None,
            stamp_id: String::new(),
            deferred_upload: true,
            curl: true,
            gateway_url: default_gateway_url(),
        }
    }
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            location_path: default_download_location(),
        }
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            title: default_page_title(),
            css_path: None,
            footer_path: None,
            output_path: default_page_output(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            csv_output_path: default_csv_output(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SyncError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Checks the keys an upload run cannot do without
    pub fn validate_for_upload(&self) -> Result<()> {
        if self.swarm.stamp_id.trim().is_empty() {
            return Err(SyncError::Config(
                "swarm.stamp_id must be set to upload".to_string(),
            ));
        }
        Ok(())
    }
}
