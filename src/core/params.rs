use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::SourceFilter;

/// Run parameters suitable for config files and embedding callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunParams {
    /// Directory holding the annotator and server control binaries;
    /// None means `bin/` next to the running executable
    pub bin_dir: Option<PathBuf>,
    /// Write a `.concepts.json` sidecar next to each output
    pub concepts: bool,
    /// Source vocabularies accepted during concept extraction
    pub source_filter: SourceFilter,
    /// Leave servers running even when this run started them
    pub keep_servers: bool,
    /// WSD Server port override; None means the stock port
    pub wsd_port: Option<u16>,
    /// MedPost-SKR tagger port override; None means the stock port
    pub tagger_port: Option<u16>,
    /// How long to wait for a started server to accept connections
    pub ready_timeout_secs: u64,
}

impl RunParams {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            bin_dir: None,
            concepts: false,
            source_filter: SourceFilter::All,
            keep_servers: false,
            wsd_port: None,
            tagger_port: None,
            ready_timeout_secs: 60,
        }
    }
}
