//! Invocation of the external annotator binary.
//!
//! One document at a time: the document text is piped to the annotator's
//! stdin, flags request machine-readable XML with banner chatter suppressed,
//! and stdout is captured. The annotator still prints a single banner line
//! before its real output; `strip_banner` is the one place that convention
//! lives.
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::info;

/// Flags requesting formatted XML output with the banner suppressed.
const ANNOTATOR_FLAGS: [&str; 2] = ["--XMLf", "--silent"];

#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Annotator binary not found: {0}")]
    NotFound(PathBuf),

    #[error("Annotator failed on {input:?} ({status}): {stderr}")]
    Failed {
        input: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("Annotator produced non-UTF-8 output for {0:?}")]
    InvalidOutput(PathBuf),
}

/// Handle on the annotator binary.
#[derive(Debug, Clone)]
pub struct Annotator {
    bin: PathBuf,
}

impl Annotator {
    pub fn new(bin: PathBuf) -> Self {
        Self { bin }
    }

    /// Annotate one document: pipe the text through the annotator and return
    /// its output with the banner line already stripped.
    pub fn annotate(&self, input: &Path, text: &str) -> Result<String, AnnotatorError> {
        let mut child = Command::new(&self.bin)
            .args(ANNOTATOR_FLAGS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AnnotatorError::NotFound(self.bin.clone()),
                _ => AnnotatorError::Io(e),
            })?;

        // Closing stdin signals end of document. A broken pipe just means
        // the annotator stopped reading; its exit status tells the story.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(AnnotatorError::Failed {
                input: input.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| AnnotatorError::InvalidOutput(input.to_path_buf()))?;
        info!("Annotated {:?} ({} bytes of output)", input, stdout.len());
        Ok(strip_banner(&stdout).to_string())
    }
}

/// Drop the annotator's banner line: everything up to and including the
/// first newline. Output without any newline is all banner.
pub fn strip_banner(output: &str) -> &str {
    match output.split_once('\n') {
        Some((_banner, rest)) => rest,
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fake_annotator(body: &str) -> (tempfile::TempDir, Annotator) {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("metamap");
        fs::write(&bin, body).unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();
        let annotator = Annotator::new(bin);
        (dir, annotator)
    }

    #[test]
    fn strip_banner_drops_first_line_only() {
        assert_eq!(strip_banner("banner\nbody\nmore\n"), "body\nmore\n");
        assert_eq!(strip_banner("banner only"), "");
        assert_eq!(strip_banner("banner\n"), "");
        assert_eq!(strip_banner(""), "");
    }

    #[test]
    fn annotate_pipes_stdin_and_strips_banner() {
        let (_dir, annotator) = fake_annotator("#!/bin/sh\necho 'MetaMap (2020)'\ncat\n");
        let out = annotator
            .annotate(Path::new("doc.txt"), "patient denies chest pain\n")
            .unwrap();
        assert_eq!(out, "patient denies chest pain\n");
    }

    #[test]
    fn annotate_reports_nonzero_exit_with_stderr() {
        let (_dir, annotator) = fake_annotator("#!/bin/sh\necho 'no UMLS data' >&2\nexit 3\n");
        let err = annotator.annotate(Path::new("doc.txt"), "text").unwrap_err();
        match err {
            AnnotatorError::Failed { input, stderr, .. } => {
                assert_eq!(input, Path::new("doc.txt"));
                assert!(stderr.contains("no UMLS data"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn annotate_missing_binary_is_not_found() {
        let annotator = Annotator::new(PathBuf::from("/nonexistent/metamap"));
        let err = annotator.annotate(Path::new("doc.txt"), "text").unwrap_err();
        assert!(matches!(err, AnnotatorError::NotFound(_)));
    }
}
