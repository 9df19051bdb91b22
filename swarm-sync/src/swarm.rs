//! Adapter around the external `swarm-cli` binary.
//!
//! The uploader and downloader only see [`SwarmClient`]; [`SwarmCli`] is
//! the production implementation that spawns one child process per call.

use crate::config::SwarmSettings;
use crate::manifest::SwarmHash;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Captured result of one swarm-cli invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Trimmed stdout
    pub stdout: String,
    /// Trimmed stderr
    pub stderr: String,
}

impl CliOutput {
    /// Text describing a failed invocation: stderr, or the exit status
    pub fn error_text(&self) -> String {
        if !self.stderr.is_empty() {
            self.stderr.clone()
        } else {
            match self.exit_code {
                Some(code) => format!("swarm-cli exited with status {}", code),
                None => "swarm-cli terminated by signal".to_string(),
            }
        }
    }
}

impl From<Output> for CliOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Storage operations the transfer loops depend on.
///
/// `Err` means the process could not be run at all; a process that ran and
/// failed is reported through [`CliOutput::success`].
pub trait SwarmClient {
    fn upload(&self, path: &Path) -> impl Future<Output = std::io::Result<CliOutput>>;

    fn download(
        &self,
        reference: &SwarmHash,
        destination: &Path,
    ) -> impl Future<Output = std::io::Result<CliOutput>>;
}

/// Runs `swarm-cli` as a child process
#[derive(Debug, Clone)]
pub struct SwarmCli {
    program: PathBuf,
    bee_api_endpoint: Option<String>,
    stamp_id: String,
    deferred_upload: bool,
    curl: bool,
}

impl SwarmCli {
    pub fn new(settings: &SwarmSettings) -> Self {
        Self {
            program: settings.cli_path.clone(),
            bee_api_endpoint: settings.bee_api_endpoint.clone().filter(|e| !e.is_empty()),
            stamp_id: settings.stamp_id.clone(),
            deferred_upload: settings.deferred_upload,
            curl: settings.curl,
        }
    }

    pub fn upload_args(&self, path: &Path) -> Vec<String> {
        let mut args = vec![
            "upload".to_string(),
            path.to_string_lossy().into_owned(),
            "--quiet".to_string(),
        ];
        self.push_endpoint(&mut args);
        args.extend([
            "--stamp".to_string(),
            self.stamp_id.clone(),
            "--deferred".to_string(),
            self.deferred_upload.to_string(),
        ]);
        if self.curl {
            args.push("--curl".to_string());
        }
        args
    }

    pub fn download_args(&self, reference: &SwarmHash, destination: &Path) -> Vec<String> {
        let mut args = vec![
            "download".to_string(),
            reference.to_string(),
            destination.to_string_lossy().into_owned(),
            "--quiet".to_string(),
        ];
        self.push_endpoint(&mut args);
        if self.curl {
            args.push("--curl".to_string());
        }
        args
    }

    fn push_endpoint(&self, args: &mut Vec<String>) {
        if let Some(endpoint) = &self.bee_api_endpoint {
            args.push("--bee-api-url".to_string());
            args.push(endpoint.clone());
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            // Dropping the future on cancellation kills the child
            .kill_on_drop(true);
        // Own process group, so a terminal Ctrl+C reaches only us
        #[cfg(unix)]
        command.process_group(0);
        command
    }

    async fn run(&self, args: Vec<String>) -> std::io::Result<CliOutput> {
        debug!("Running {} {}", self.program.display(), args.join(" "));

        let output = self.command(&args).output().await?;

        Ok(CliOutput::from(output))
    }
}

impl SwarmClient for SwarmCli {
    async fn upload(&self, path: &Path) -> std::io::Result<CliOutput> {
        self.run(self.upload_args(path)).await
    }

    async fn download(&self, reference: &SwarmHash, destination: &Path) -> std::io::Result<CliOutput> {
        self.run(self.download_args(reference, destination)).await
    }
}
