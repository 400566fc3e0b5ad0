//! Command Line Interface (CLI) layer for ANNOBATCH.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for batch annotation runs. It
//! wires user-provided options to the underlying library functionality
//! exposed via `annobatch::api`.
//!
//! If you are embedding ANNOBATCH into another application, prefer using
//! the high-level `annobatch::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
