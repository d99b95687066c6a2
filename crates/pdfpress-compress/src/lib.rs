#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! PDF compression pipeline around an external Ghostscript binary.
//!
//! Layout: `quality.rs` (profiles), `scratch.rs` (per-job scratch files),
//! `compressor.rs` (external tool seam), `probe.rs` (availability check),
//! `service.rs` (request orchestration), `error.rs` (error type).

pub mod compressor;
pub mod error;
pub mod probe;
pub mod quality;
pub mod scratch;
pub mod service;

pub use compressor::{Compressor, CompressorFailure, GhostscriptCompressor};
pub use error::{CompressError, CompressResult};
pub use probe::{HealthStatus, check_health};
pub use quality::QualityProfile;
pub use scratch::{CompressionJob, ScratchDir};
pub use service::{CompressRequest, CompressedPdf, CompressionService, compression_ratio};
