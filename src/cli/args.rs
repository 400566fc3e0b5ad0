use clap::Parser;
use std::path::PathBuf;

use annobatch::types::SourceFilter;

#[derive(Parser)]
#[command(name = "annobatch", version, about = "ANNOBATCH CLI")]
pub struct CliArgs {
    /// Run directory holding a metamap_input/ subdirectory of documents;
    /// annotated results land in metamap_output/
    pub run_dir: Option<PathBuf>,

    /// Directory holding the annotator and server control binaries
    /// (default: bin/ next to this executable)
    #[arg(long)]
    pub bin_dir: Option<PathBuf>,

    /// Write a .concepts.json sidecar next to each annotated output
    #[arg(long, default_value_t = false)]
    pub concepts: bool,

    /// Source vocabularies accepted during concept extraction
    #[arg(long, value_enum, default_value_t = SourceFilter::All)]
    pub sources: SourceFilter,

    /// Leave the support servers running even when this run started them
    #[arg(long, default_value_t = false)]
    pub keep_servers: bool,

    /// WSD Server port (default: stock MetaMap port 5554)
    #[arg(long)]
    pub wsd_port: Option<u16>,

    /// MedPost-SKR tagger port (default: stock MetaMap port 1795)
    #[arg(long)]
    pub tagger_port: Option<u16>,

    /// Seconds to wait for a started server to accept connections
    #[arg(long, default_value_t = 60)]
    pub ready_timeout: u64,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
