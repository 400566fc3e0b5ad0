//! Lifecycle management for the annotator's support servers.
//!
//! Each server is a long-lived external process driven through its control
//! binary (`<ctl> start` / `<ctl> stop`). Liveness is a TCP connect probe on
//! the server's port; the same probe doubles as the readiness check after a
//! start, since the control scripts return before the server listens.
//!
//! `ServerGuard` owns the started-by-us bookkeeping: servers that were
//! already up are left alone, servers this run started are stopped when the
//! guard drops, including on early error returns.
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::types::ServerKind;

const PROBE_TIMEOUT: Duration = Duration::from_millis(250);
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind} start command failed: {detail}")]
    StartFailed { kind: ServerKind, detail: String },

    #[error("{kind} did not accept connections on port {port} within {waited:?}")]
    NotReady {
        kind: ServerKind,
        port: u16,
        waited: Duration,
    },
}

/// One support server: its control binary and the port it listens on.
#[derive(Debug, Clone)]
pub struct ServerSpec {
    pub kind: ServerKind,
    pub ctl: PathBuf,
    pub port: u16,
    pub ready_timeout: Duration,
}

impl ServerSpec {
    /// Probe the server's port. A successful connect means running.
    pub fn is_running(&self) -> bool {
        let addr = SocketAddr::from(([127, 0, 0, 1], self.port));
        TcpStream::connect_timeout(&addr, PROBE_TIMEOUT).is_ok()
    }

    /// Invoke `<ctl> start` and wait until the server accepts connections.
    fn start(&self) -> Result<(), ServerError> {
        info!("Starting {}", self.kind);
        let output = Command::new(&self.ctl).arg("start").output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ServerError::StartFailed {
                kind: self.kind,
                detail: format!("exit {}: {}", output.status, stderr.trim()),
            });
        }
        self.wait_ready()
    }

    fn wait_ready(&self) -> Result<(), ServerError> {
        let deadline = Instant::now() + self.ready_timeout;
        loop {
            if self.is_running() {
                info!("{} is up on port {}", self.kind, self.port);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ServerError::NotReady {
                    kind: self.kind,
                    port: self.port,
                    waited: self.ready_timeout,
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// Invoke `<ctl> stop`. Best-effort: failures are logged, not returned.
    fn stop(&self) {
        info!("Stopping {}", self.kind);
        match Command::new(&self.ctl).arg("stop").output() {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(
                    "{} stop command exited {}: {}",
                    self.kind,
                    output.status,
                    stderr.trim()
                );
            }
            Err(e) => warn!("Failed to run stop command for {}: {}", self.kind, e),
        }
    }
}

#[derive(Debug)]
struct GuardEntry {
    spec: ServerSpec,
    started_by_us: bool,
}

/// RAII handle over the support servers for one batch run.
#[derive(Debug)]
pub struct ServerGuard {
    entries: Vec<GuardEntry>,
    armed: bool,
}

impl ServerGuard {
    /// Ensure every server is running, starting the ones that are down.
    ///
    /// If a start fails partway through, servers already started by this
    /// call are stopped again as the partially built guard drops.
    pub fn ensure(specs: Vec<ServerSpec>) -> Result<Self, ServerError> {
        let mut guard = Self {
            entries: specs
                .into_iter()
                .map(|spec| GuardEntry {
                    spec,
                    started_by_us: false,
                })
                .collect(),
            armed: true,
        };
        guard.start_missing()?;
        Ok(guard)
    }

    fn start_missing(&mut self) -> Result<(), ServerError> {
        for entry in &mut self.entries {
            if entry.spec.is_running() {
                info!("{} already running, leaving it alone", entry.spec.kind);
            } else {
                entry.spec.start()?;
                entry.started_by_us = true;
            }
        }
        Ok(())
    }

    /// Whether this guard performed the start transition for `kind`.
    pub fn started(&self, kind: ServerKind) -> bool {
        self.entries
            .iter()
            .any(|e| e.spec.kind == kind && e.started_by_us)
    }

    /// Leave the servers running on drop, even the ones this run started.
    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        for entry in &self.entries {
            if entry.started_by_us {
                entry.spec.stop();
            }
        }
    }
}
