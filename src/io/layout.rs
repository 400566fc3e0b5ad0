//! Run-directory contract: where inputs come from and where outputs go.
//!
//! A run directory holds a `metamap_input/` subdirectory of documents and
//! receives a `metamap_output/` subdirectory of annotated results. Output
//! paths are derived from input paths by substituting the input marker path
//! segment with the output marker, keeping the filename.
use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Input marker path segment.
pub const INPUT_DIR: &str = "metamap_input";
/// Output marker path segment.
pub const OUTPUT_DIR: &str = "metamap_output";

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Run directory does not exist or is not a directory: {0}")]
    InvalidRunDir(PathBuf),

    #[error("Input directory missing: {0}")]
    MissingInputDir(PathBuf),

    #[error("Could not create output directory {path}: {source}")]
    OutputDirCreation {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Validated view of a run directory.
#[derive(Debug, Clone)]
pub struct RunLayout {
    pub run_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Result of enumerating the input directory.
#[derive(Debug, Default)]
pub struct InputScan {
    /// Regular files, in filesystem enumeration order.
    pub files: Vec<PathBuf>,
    /// Non-file entries that were skipped.
    pub skipped: usize,
}

impl RunLayout {
    /// Validate the run directory and prepare the output directory.
    ///
    /// The input directory must pre-exist; the output directory is created
    /// on demand and only a failed creation is fatal.
    pub fn open<P: AsRef<Path>>(run_dir: P) -> Result<Self, LayoutError> {
        let run_dir = run_dir.as_ref().to_path_buf();
        if !run_dir.is_dir() {
            return Err(LayoutError::InvalidRunDir(run_dir));
        }

        let input_dir = run_dir.join(INPUT_DIR);
        if !input_dir.is_dir() {
            return Err(LayoutError::MissingInputDir(input_dir));
        }

        let output_dir = run_dir.join(OUTPUT_DIR);
        fs::create_dir_all(&output_dir).map_err(|source| LayoutError::OutputDirCreation {
            path: output_dir.clone(),
            source,
        })?;

        info!("Run directory: {:?}", run_dir);
        Ok(Self {
            run_dir,
            input_dir,
            output_dir,
        })
    }

    /// Enumerate input documents in filesystem order. No ordering is
    /// promised beyond what the filesystem yields.
    pub fn scan_inputs(&self) -> Result<InputScan, LayoutError> {
        let mut scan = InputScan::default();
        for entry in fs::read_dir(&self.input_dir)? {
            let path = entry?.path();
            if path.is_file() {
                scan.files.push(path);
            } else {
                scan.skipped += 1;
            }
        }
        Ok(scan)
    }

    /// Derive the output path for an input document: the first path segment
    /// equal to the input marker becomes the output marker. Inputs from
    /// outside the marked directory fall back to the output directory plus
    /// the input's filename.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        substitute_marker(input).unwrap_or_else(|| {
            let name = input.file_name().unwrap_or_default();
            self.output_dir.join(name)
        })
    }
}

fn substitute_marker(path: &Path) -> Option<PathBuf> {
    let mut substituted = false;
    let mapped: PathBuf = path
        .components()
        .map(|c| match c {
            Component::Normal(seg) if !substituted && seg == INPUT_DIR => {
                substituted = true;
                Component::Normal(OUTPUT_DIR.as_ref())
            }
            other => other,
        })
        .collect();
    substituted.then_some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_rejects_missing_run_dir() {
        let err = RunLayout::open("/nonexistent/run").unwrap_err();
        assert!(matches!(err, LayoutError::InvalidRunDir(_)));
    }

    #[test]
    fn open_requires_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunLayout::open(dir.path()).unwrap_err();
        match err {
            LayoutError::MissingInputDir(path) => assert!(path.ends_with(INPUT_DIR)),
            other => panic!("unexpected error: {other}"),
        }
        // a failed open must not leave an output directory behind
        assert!(!dir.path().join(OUTPUT_DIR).exists());
    }

    #[test]
    fn open_creates_output_dir_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(INPUT_DIR)).unwrap();

        let layout = RunLayout::open(dir.path()).unwrap();
        assert!(layout.output_dir.is_dir());

        // idempotent on rerun
        RunLayout::open(dir.path()).unwrap();
    }

    #[test]
    fn output_path_substitutes_marker_segment() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(INPUT_DIR)).unwrap();
        let layout = RunLayout::open(dir.path()).unwrap();

        let input = layout.input_dir.join("NCT0001.txt");
        let output = layout.output_path_for(&input);
        assert_eq!(output, layout.output_dir.join("NCT0001.txt"));
    }

    #[test]
    fn scan_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join(INPUT_DIR);
        fs::create_dir(&input_dir).unwrap();
        fs::write(input_dir.join("a.txt"), "a").unwrap();
        fs::write(input_dir.join("b.txt"), "b").unwrap();
        fs::create_dir(input_dir.join("nested")).unwrap();

        let layout = RunLayout::open(dir.path()).unwrap();
        let scan = layout.scan_inputs().unwrap();
        assert_eq!(scan.files.len(), 2);
        assert_eq!(scan.skipped, 1);
    }
}
