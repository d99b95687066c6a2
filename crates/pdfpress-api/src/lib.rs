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
#![allow(clippy::module_name_repetitions, clippy::redundant_pub_crate)]

//! HTTP surface of the pdfpress service.
//!
//! Layout: `http/router.rs` (server host and middleware), `http/compress.rs`
//! (upload endpoint), `http/health.rs` (health and metrics), `http/errors.rs`
//! (problem documents), `http/telemetry.rs` (request metrics layer).

pub mod error;
pub mod http;
pub(crate) mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use pdfpress_api_models as models;
