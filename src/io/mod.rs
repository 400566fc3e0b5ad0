//! I/O layer: the run-directory layout contract and concept extraction from
//! annotated XML output.
pub mod layout;
pub use layout::{InputScan, LayoutError, RunLayout};

pub mod concepts;
pub use concepts::{Concept, ConceptError, ConceptSet, extract_concepts, write_concept_sidecar};
