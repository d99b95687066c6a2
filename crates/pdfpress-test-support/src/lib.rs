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

//! Shared test helpers used across pdfpress test suites.
//! Layout: fixtures.rs (documents, multipart bodies), compressor.rs (scripted fake compressor).

pub mod compressor;
pub mod fixtures;

pub use compressor::{FAKE_VERSION, FakeBehavior, FakeCompressor};
pub use fixtures::{multipart_body, sample_pdf, scratch_entries};
