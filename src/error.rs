//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, layout, server, annotator, and concept errors, and
//! provides a semantic variant for toolchain validation.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Run directory error: {0}")]
    Layout(#[from] crate::io::LayoutError),

    #[error("Server error: {0}")]
    Server(#[from] crate::core::server::ServerError),

    #[error("Annotator error: {0}")]
    Annotator(#[from] crate::core::annotator::AnnotatorError),

    #[error("Concept extraction error: {0}")]
    Concept(#[from] crate::io::ConceptError),

    #[error("Required executable not found: {path}")]
    MissingExecutable { path: PathBuf },
}
