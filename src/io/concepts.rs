//! Concept extraction from the annotator's XML machine output.
//!
//! Walks `MMO → Utterances → Utterance → Phrases → Phrase → Mappings →
//! Mapping → MappingCandidates → Candidate` and collects the UMLS concept of
//! each mapping candidate. Phrase-level `Candidates` blocks (the unmapped
//! candidate pool) are ignored. An optional source filter keeps only
//! candidates backed by the SNOMEDCT or MTH vocabularies.
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::types::SourceFilter;

#[derive(Debug, Error)]
pub enum ConceptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One UMLS concept pulled from a mapping candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub cui: String,
    pub preferred: Option<String>,
    /// MetaMap candidate score; more negative is a stronger match.
    pub score: Option<i32>,
    pub sources: Vec<String>,
}

/// Concepts extracted from one annotated document, de-duplicated by CUI in
/// first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptSet {
    pub concepts: Vec<Concept>,
}

impl ConceptSet {
    pub fn cuis(&self) -> Vec<&str> {
        self.concepts.iter().map(|c| c.cui.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

/// Extract the mapped concepts from annotator XML output.
pub fn extract_concepts(xml: &str, filter: SourceFilter) -> Result<ConceptSet, ConceptError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut curr = String::new();
    let mut in_mappings = false;
    let mut in_candidate = false;
    let mut in_sources = false;

    let mut cui = String::new();
    let mut preferred: Option<String> = None;
    let mut score: Option<i32> = None;
    let mut sources: Vec<String> = Vec::new();

    let mut seen: HashSet<String> = HashSet::new();
    let mut set = ConceptSet::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                curr = tag.clone();
                match tag.as_str() {
                    "Mappings" => in_mappings = true,
                    "Candidate" if in_mappings => {
                        in_candidate = true;
                        cui.clear();
                        preferred = None;
                        score = None;
                        sources.clear();
                    }
                    "Sources" if in_candidate => in_sources = true,
                    _ => {}
                }
            }
            Event::End(ref e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "Mappings" => in_mappings = false,
                    "Candidate" if in_candidate => {
                        in_candidate = false;
                        if !cui.is_empty()
                            && filter.accepts(&sources)
                            && seen.insert(cui.clone())
                        {
                            set.concepts.push(Concept {
                                cui: cui.clone(),
                                preferred: preferred.take(),
                                score,
                                sources: sources.clone(),
                            });
                        }
                    }
                    "Sources" => in_sources = false,
                    _ => {}
                }
                curr.clear();
            }
            Event::Text(e) => {
                let txt = e.unescape()?;
                match curr.as_str() {
                    "CandidateCUI" if in_candidate => cui = txt.to_string(),
                    "CandidatePreferred" if in_candidate => preferred = Some(txt.to_string()),
                    "CandidateScore" if in_candidate => score = txt.parse().ok(),
                    "Source" if in_sources => sources.push(txt.to_string()),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(set)
}

/// Sidecar document written next to each annotated output.
#[derive(Debug, Serialize)]
struct ConceptSidecar<'a> {
    tool: &'static str,
    version: &'static str,
    generated: String,
    source_filter: SourceFilter,
    concepts: &'a [Concept],
}

/// Write `<output>.concepts.json` next to an annotated output file.
pub fn write_concept_sidecar(
    output: &Path,
    set: &ConceptSet,
    filter: SourceFilter,
) -> Result<PathBuf, ConceptError> {
    let mut sidecar_path = output.as_os_str().to_owned();
    sidecar_path.push(".concepts.json");
    let sidecar_path = PathBuf::from(sidecar_path);

    let sidecar = ConceptSidecar {
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        generated: chrono::Utc::now().to_rfc3339(),
        source_filter: filter,
        concepts: &set.concepts,
    };

    fs::write(&sidecar_path, serde_json::to_string_pretty(&sidecar)?)?;
    info!(
        "Wrote {} concept(s) to {:?}",
        set.concepts.len(),
        sidecar_path
    );
    Ok(sidecar_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<MMOs><MMO><Utterances Count="1"><Utterance>
      <Phrases Count="1"><Phrase>
        <Candidates Total="1">
          <Candidate><CandidateCUI>C9999999</CandidateCUI></Candidate>
        </Candidates>
        <Mappings Count="2">
          <Mapping>
            <MappingCandidates Total="1">
              <Candidate>
                <CandidateScore>-1000</CandidateScore>
                <CandidateCUI>C0008031</CandidateCUI>
                <CandidatePreferred>Chest Pain</CandidatePreferred>
                <Sources Count="2"><Source>MTH</Source><Source>SNOMEDCT</Source></Sources>
              </Candidate>
            </MappingCandidates>
          </Mapping>
          <Mapping>
            <MappingCandidates Total="2">
              <Candidate>
                <CandidateScore>-861</CandidateScore>
                <CandidateCUI>C0684224</CandidateCUI>
                <CandidatePreferred>Aspirin 81 MG</CandidatePreferred>
                <Sources Count="1"><Source>RXNORM</Source></Sources>
              </Candidate>
              <Candidate>
                <CandidateScore>-900</CandidateScore>
                <CandidateCUI>C0008031</CandidateCUI>
                <CandidatePreferred>Chest Pain</CandidatePreferred>
                <Sources Count="1"><Source>SNOMEDCT</Source></Sources>
              </Candidate>
            </MappingCandidates>
          </Mapping>
        </Mappings>
      </Phrase></Phrases>
    </Utterance></Utterances></MMO></MMOs>"#;

    #[test]
    fn extracts_mapped_candidates_only() {
        let set = extract_concepts(SAMPLE, SourceFilter::All).unwrap();
        // phrase-level candidate pool (C9999999) is ignored, C0008031 de-duplicated
        assert_eq!(set.cuis(), vec!["C0008031", "C0684224"]);
        assert_eq!(set.concepts[0].preferred.as_deref(), Some("Chest Pain"));
        assert_eq!(set.concepts[0].score, Some(-1000));
        assert_eq!(set.concepts[0].sources, vec!["MTH", "SNOMEDCT"]);
    }

    #[test]
    fn source_filter_restricts_to_snomed_and_mth() {
        let set = extract_concepts(SAMPLE, SourceFilter::SnomedMth).unwrap();
        assert_eq!(set.cuis(), vec!["C0008031"]);
    }

    #[test]
    fn empty_output_yields_empty_set() {
        let set = extract_concepts("<MMOs><MMO></MMO></MMOs>", SourceFilter::All).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn sidecar_lands_next_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("doc.txt");
        let set = extract_concepts(SAMPLE, SourceFilter::All).unwrap();

        let sidecar = write_concept_sidecar(&output, &set, SourceFilter::All).unwrap();
        assert_eq!(sidecar, dir.path().join("doc.txt.concepts.json"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&sidecar).unwrap()).unwrap();
        assert_eq!(json["concepts"][0]["cui"], "C0008031");
        assert_eq!(json["tool"], env!("CARGO_PKG_NAME"));
    }
}
