//! Location and validation of the external binaries a run depends on.
//!
//! The annotator and both server control binaries must all exist before any
//! file is touched; a missing one is a fatal precondition failure naming the
//! expected path.
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::types::{ANNOTATOR_BIN, ServerKind};

/// Resolved paths to the annotator and server control binaries.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub bin_dir: PathBuf,
    pub annotator: PathBuf,
    pub wsd_ctl: PathBuf,
    pub tagger_ctl: PathBuf,
}

impl Toolchain {
    /// Resolve the `bin` directory and verify every required executable
    /// exists. `bin_dir` overrides the default location, which is `bin/`
    /// next to the running executable.
    pub fn locate(bin_dir: Option<&Path>) -> Result<Self> {
        let bin_dir = match bin_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_bin_dir()?,
        };

        let annotator = require(bin_dir.join(ANNOTATOR_BIN))?;
        let wsd_ctl = require(bin_dir.join(ServerKind::Wsd.ctl_name()))?;
        let tagger_ctl = require(bin_dir.join(ServerKind::MedPost.ctl_name()))?;

        info!("Using binaries from: {:?}", bin_dir);

        Ok(Self {
            bin_dir,
            annotator,
            wsd_ctl,
            tagger_ctl,
        })
    }

    /// Control binary for the given server.
    pub fn ctl_for(&self, kind: ServerKind) -> &Path {
        match kind {
            ServerKind::Wsd => &self.wsd_ctl,
            ServerKind::MedPost => &self.tagger_ctl,
        }
    }
}

fn default_bin_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .map(|p| p.join("bin"))
        .unwrap_or_else(|| PathBuf::from("bin"));
    Ok(dir)
}

fn require(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::MissingExecutable { path })
    }
}
