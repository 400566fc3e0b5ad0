//! Core building blocks: run parameters, toolchain location, support-server
//! lifecycle, and annotator invocation. These are internal primitives
//! consumed by the high-level `api` module.
pub mod annotator;
pub mod params;
pub mod server;
pub mod toolchain;
