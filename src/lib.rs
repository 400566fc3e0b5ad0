#![doc = r#"
ANNOBATCH — a batch annotation runner for MetaMap-style clinical NLP annotators.

This crate drives an external annotator binary over a directory of clinical
documents: it makes sure the two support servers the annotator depends on
(the WSD Server and the MedPost-SKR tagger) are running, pipes every file in
`<run-dir>/metamap_input/` through the annotator, strips the banner line, and
writes one annotated XML file per input into `<run-dir>/metamap_output/`.
Servers this run started are stopped again when it finishes, error paths
included. It powers the `annobatch` CLI and can be embedded in your own Rust
applications.

Requirements
------------
- A MetaMap-style installation: the `metamap` annotator plus the
  `wsdserverctl` and `skrmedpostctl` control binaries, together under one
  `bin` directory (by default `bin/` next to the running executable).

Quick start: run a batch
------------------------
```rust,no_run
use std::path::Path;
use annobatch::{RunParams, run_batch};

fn main() -> annobatch::Result<()> {
    let params = RunParams::default();
    let report = run_batch(Path::new("/data/run-42"), &params)?;
    println!(
        "processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(())
}
```

Concept sidecars
----------------
With `RunParams::concepts` set, every annotated output gets a
`.concepts.json` sidecar listing the mapped UMLS concepts (CUIs), optionally
restricted to the SNOMEDCT/MTH vocabularies:

```rust,no_run
use std::path::Path;
use annobatch::{RunParams, SourceFilter, run_batch};

fn main() -> annobatch::Result<()> {
    let params = RunParams {
        concepts: true,
        source_filter: SourceFilter::SnomedMth,
        ..RunParams::default()
    };
    run_batch(Path::new("/data/run-42"), &params)?;
    Ok(())
}
```

Error handling
--------------
All public functions return `annobatch::Result<T>`; match on
`annobatch::Error` to handle specific cases, e.g. layout or server errors.
Precondition failures (bad run directory, missing input directory, missing
executables, server start failure) abort before any document is touched;
per-document annotation failures are counted in the `BatchReport` and do not
abort the batch.

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`types`] — shared enums (`ServerKind`, `SourceFilter`).
- [`io`] — run-directory layout and concept extraction.
- [`core`] — annotator invocation, server lifecycle, run parameters.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::params::RunParams;
pub use error::{Error, Result};
pub use types::{ANNOTATOR_BIN, ServerKind, SourceFilter};

// Run-directory layout and concept extraction
pub use io::{Concept, ConceptSet, LayoutError, RunLayout, extract_concepts};

// Annotator and server lifecycle
pub use core::annotator::{Annotator, AnnotatorError, strip_banner};
pub use core::server::{ServerError, ServerGuard, ServerSpec};
pub use core::toolchain::Toolchain;

// High-level API re-exports
pub use api::{BatchReport, annotate_file, extract_concepts_from_file, run_batch};
