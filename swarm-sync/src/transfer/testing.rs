//! Scripted stand-in for swarm-cli used by the transfer tests.

use crate::manifest::{Manifest, SwarmHash};
use crate::swarm::{CliOutput, SwarmClient};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

pub enum Scripted {
    Output(CliOutput),
    SpawnError,
    /// Cancel the token and never finish, like a hung child process
    CancelAndHang(CancellationToken),
}

pub fn ok(stdout: &str) -> Scripted {
    Scripted::Output(CliOutput {
        success: true,
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    })
}

pub fn fail(code: i32, stderr: &str) -> Scripted {
    Scripted::Output(CliOutput {
        success: false,
        exit_code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    })
}

#[derive(Default)]
pub struct FakeSwarm {
    responses: RefCell<VecDeque<Scripted>>,
    /// Bytes written to `<destination>/<filename>` on a successful download
    content: RefCell<HashMap<SwarmHash, (String, Vec<u8>)>>,
    pub calls: RefCell<Vec<String>>,
    /// Manifest file to snapshot at the start of each call
    pub watch_manifest: Option<PathBuf>,
    pub snapshots: RefCell<Vec<Manifest>>,
}

impl FakeSwarm {
    pub fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn serve(&self, reference: &SwarmHash, filename: &str, bytes: &[u8]) {
        self.content
            .borrow_mut()
            .insert(reference.clone(), (filename.to_string(), bytes.to_vec()));
    }

    async fn respond(&self, call: String) -> std::io::Result<CliOutput> {
        if let Some(path) = &self.watch_manifest {
            if let Ok(manifest) = Manifest::load(path) {
                self.snapshots.borrow_mut().push(manifest);
            }
        }
        self.calls.borrow_mut().push(call);

        let next = self.responses.borrow_mut().pop_front();
        match next {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::SpawnError) | None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "swarm-cli: not found",
            )),
            Some(Scripted::CancelAndHang(token)) => {
                token.cancel();
                std::future::pending().await
            }
        }
    }
}

impl SwarmClient for FakeSwarm {
    async fn upload(&self, path: &Path) -> std::io::Result<CliOutput> {
        self.respond(format!("upload {}", path.display())).await
    }

    async fn download(&self, reference: &SwarmHash, destination: &Path) -> std::io::Result<CliOutput> {
        let output = self.respond(format!("download {}", reference)).await?;
        if output.success {
            if let Some((filename, bytes)) = self.content.borrow().get(reference) {
                std::fs::write(destination.join(filename), bytes)?;
            }
        }
        Ok(output)
    }
}
