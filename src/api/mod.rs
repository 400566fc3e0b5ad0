//! High-level, ergonomic library API: run a whole batch against a run
//! directory, annotate single documents, and extract concepts from annotated
//! output. Prefer these entrypoints over the low-level core modules when
//! embedding ANNOBATCH.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::annotator::Annotator;
use crate::core::params::RunParams;
use crate::core::server::{ServerGuard, ServerSpec};
use crate::core::toolchain::Toolchain;
use crate::error::Result;
use crate::io::{LayoutError, RunLayout, extract_concepts, write_concept_sidecar};
use crate::types::ServerKind;

/// Outcome counters for one batch run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Run the full batch against a run directory.
///
/// Preconditions (run directory, input directory, output directory,
/// executables, server startup) abort before any file is processed.
/// Per-file annotation failures are logged and counted without aborting the
/// rest of the batch. Servers started by this call are stopped when it
/// returns, on error paths included, unless `params.keep_servers` is set.
pub fn run_batch(run_dir: &Path, params: &RunParams) -> Result<BatchReport> {
    // Precondition order: run directory, executables, then the input/output
    // layout — a missing binary must not leave a fresh output dir behind.
    if !run_dir.is_dir() {
        return Err(LayoutError::InvalidRunDir(run_dir.to_path_buf()).into());
    }
    let toolchain = Toolchain::locate(params.bin_dir.as_deref())?;
    let layout = RunLayout::open(run_dir)?;

    let mut guard = ServerGuard::ensure(server_specs(&toolchain, params))?;
    if params.keep_servers {
        guard.disarm();
    }

    let annotator = Annotator::new(toolchain.annotator.clone());
    let scan = layout.scan_inputs()?;

    info!(
        "Starting batch: {} document(s) in {:?}",
        scan.files.len(),
        layout.input_dir
    );

    let mut report = BatchReport {
        skipped: scan.skipped,
        ..BatchReport::default()
    };

    for input in &scan.files {
        let output = layout.output_path_for(input);
        match annotate_to_path(&annotator, input, &output, params) {
            Ok(()) => {
                info!("Annotated: {:?} -> {:?}", input, output);
                report.processed += 1;
            }
            Err(e) => {
                warn!("Error annotating {:?}: {}", input, e);
                report.errors += 1;
            }
        }
    }

    info!(
        "Batch complete: processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(report)
}

/// Annotate one document file and return the banner-stripped output.
pub fn annotate_file(annotator: &Annotator, input: &Path) -> Result<String> {
    let text = fs::read_to_string(input)?;
    Ok(annotator.annotate(input, &text)?)
}

/// Extract the mapped UMLS concepts from an annotated output file.
pub fn extract_concepts_from_file(
    path: &Path,
    filter: crate::types::SourceFilter,
) -> Result<crate::io::ConceptSet> {
    let xml = fs::read_to_string(path)?;
    Ok(extract_concepts(&xml, filter)?)
}

fn annotate_to_path(
    annotator: &Annotator,
    input: &Path,
    output: &Path,
    params: &RunParams,
) -> Result<()> {
    let annotated = annotate_file(annotator, input)?;
    fs::write(output, &annotated)?;

    if params.concepts {
        let set = extract_concepts(&annotated, params.source_filter)?;
        write_concept_sidecar(output, &set, params.source_filter)?;
    }
    Ok(())
}

fn server_specs(toolchain: &Toolchain, params: &RunParams) -> Vec<ServerSpec> {
    ServerKind::ALL
        .into_iter()
        .map(|kind| ServerSpec {
            kind,
            ctl: toolchain.ctl_for(kind).to_path_buf(),
            port: match kind {
                ServerKind::Wsd => params.wsd_port.unwrap_or_else(|| kind.default_port()),
                ServerKind::MedPost => params.tagger_port.unwrap_or_else(|| kind.default_port()),
            },
            ready_timeout: params.ready_timeout(),
        })
        .collect()
}
