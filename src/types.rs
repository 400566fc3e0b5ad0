//! Shared types and enums used across ANNOBATCH.
//! Includes `ServerKind` (the two MetaMap support servers), `SourceFilter`
//! for concept extraction, and the annotator binary name.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Name of the annotator binary expected under the `bin` directory.
pub const ANNOTATOR_BIN: &str = "metamap";

/// The two long-lived support servers the annotator depends on.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum ServerKind {
    /// Word-sense disambiguation server.
    Wsd,
    /// MedPost-SKR part-of-speech tagger server.
    MedPost,
}

impl ServerKind {
    pub const ALL: [ServerKind; 2] = [ServerKind::Wsd, ServerKind::MedPost];

    /// Name of the control binary that accepts `start`/`stop`.
    pub fn ctl_name(&self) -> &'static str {
        match self {
            ServerKind::Wsd => "wsdserverctl",
            ServerKind::MedPost => "skrmedpostctl",
        }
    }

    /// Port the server listens on in a stock MetaMap installation.
    pub fn default_port(&self) -> u16 {
        match self {
            ServerKind::Wsd => 5554,
            ServerKind::MedPost => 1795,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServerKind::Wsd => "WSD Server",
            ServerKind::MedPost => "MedPost-SKR tagger",
        }
    }
}

impl std::fmt::Display for ServerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which UMLS source vocabularies to accept during concept extraction.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum SourceFilter {
    /// Keep every mapping candidate regardless of source.
    All,
    /// Keep only candidates carrying a SNOMEDCT or MTH source.
    SnomedMth,
}

impl SourceFilter {
    /// Whether a candidate with the given source list passes the filter.
    pub fn accepts(&self, sources: &[String]) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::SnomedMth => sources.iter().any(|s| s == "SNOMEDCT" || s == "MTH"),
        }
    }
}

impl std::fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceFilter::All => "all",
            SourceFilter::SnomedMth => "snomed-mth",
        };
        write!(f, "{}", s)
    }
}
