//! Compression request orchestration.
//!
//! # Design
//! - All validation happens before the first filesystem write.
//! - The job owns its scratch files; dropping it on any exit path unlinks them.
//! - The input file is unlinked as soon as the tool finishes, the output file
//!   right after it is read into memory.
//! - Every outcome is counted in the metrics registry.

use std::sync::Arc;

use pdfpress_telemetry::{JobOutcome, Metrics, current_request_id};
use tracing::{error, info};
use uuid::Uuid;

use crate::compressor::{Compressor, CompressorFailure};
use crate::error::{CompressError, CompressResult};
use crate::probe::{HealthStatus, check_health};
use crate::quality::QualityProfile;
use crate::scratch::ScratchDir;

const UNKNOWN_QUALITY_LABEL: &str = "unknown";
const OUTPUT_PREFIX: &str = "compressed_";

/// Inputs of a single compression request.
#[derive(Debug, Clone, Copy)]
pub struct CompressRequest<'a> {
    /// Client-supplied filename of the upload.
    pub filename: &'a str,
    /// Quality label (`low`, `medium`, `high`).
    pub quality: &'a str,
    /// Uploaded document bytes.
    pub bytes: &'a [u8],
}

/// Successful compression result.
#[derive(Debug, Clone)]
pub struct CompressedPdf {
    /// Token of the job that produced the document.
    pub token: Uuid,
    /// Filename to present to the client (`compressed_<name>`).
    pub filename: String,
    /// Compressed document.
    pub bytes: Vec<u8>,
    /// Size of the uploaded document in bytes.
    pub original_size: u64,
    /// Size of the compressed document in bytes.
    pub compressed_size: u64,
    /// Size reduction in percent; zero or negative when the tool did not shrink it.
    pub ratio: f64,
    /// Profile the job ran with.
    pub profile: QualityProfile,
}

/// Compression service shared by all request handlers.
#[derive(Clone)]
pub struct CompressionService {
    scratch: ScratchDir,
    compressor: Arc<dyn Compressor>,
    metrics: Metrics,
}

impl CompressionService {
    /// Build a service over a prepared scratch directory.
    #[must_use]
    pub fn new(scratch: ScratchDir, compressor: Arc<dyn Compressor>, metrics: Metrics) -> Self {
        Self {
            scratch,
            compressor,
            metrics,
        }
    }

    /// Scratch directory used for job files.
    #[must_use]
    pub const fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Metrics registry the service reports into.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Compress one uploaded document.
    ///
    /// # Errors
    ///
    /// - [`CompressError::InvalidInput`] when the filename is not a PDF or the
    ///   quality label is unknown. Nothing is written in that case.
    /// - [`CompressError::CompressionFailed`] when the tool fails, times out,
    ///   or leaves no output.
    /// - [`CompressError::Io`] when scratch files cannot be written or read.
    pub async fn compress(&self, request: CompressRequest<'_>) -> CompressResult<CompressedPdf> {
        let (filename, profile) = match validate(&request) {
            Ok(valid) => valid,
            Err(err) => {
                let label = QualityProfile::parse(request.quality)
                    .map_or(UNKNOWN_QUALITY_LABEL, QualityProfile::as_str);
                self.metrics.inc_compress_job(label, JobOutcome::Rejected);
                return Err(err);
            }
        };

        let result = self.run(filename, profile, request.bytes).await;
        match &result {
            Ok(pdf) => {
                self.metrics
                    .inc_compress_job(profile.as_str(), JobOutcome::Succeeded);
                self.metrics
                    .observe_compression(pdf.original_size, pdf.compressed_size, pdf.ratio);
            }
            Err(_) => {
                self.metrics
                    .inc_compress_job(profile.as_str(), JobOutcome::Failed);
            }
        }
        result
    }

    /// Probe the compressor and record its availability.
    pub async fn check_health(&self) -> HealthStatus {
        let status = check_health(self.compressor.as_ref()).await;
        self.metrics
            .set_compressor_available(status.compressor_available);
        status
    }

    async fn run(
        &self,
        filename: String,
        profile: QualityProfile,
        bytes: &[u8],
    ) -> CompressResult<CompressedPdf> {
        let job = self.scratch.job();
        let request_id = current_request_id().unwrap_or_default();
        let original_size = job.write_input(bytes).await?;

        let ran = self
            .compressor
            .compress(job.input_path(), job.output_path(), profile)
            .await;
        job.discard_input();
        if let Err(source) = ran {
            error!(
                request_id = %request_id,
                token = %job.token(),
                quality = profile.as_str(),
                error = %source,
                "pdf compression failed"
            );
            return Err(CompressError::failed(source));
        }

        let Some(compressed) = job.take_output().await? else {
            error!(
                request_id = %request_id,
                token = %job.token(),
                "compressor reported success without output"
            );
            return Err(CompressError::failed(CompressorFailure::MissingOutput {
                path: job.output_path().to_path_buf(),
            }));
        };

        let compressed_size = compressed.len() as u64;
        let ratio = compression_ratio(original_size, compressed_size);
        info!(
            request_id = %request_id,
            token = %job.token(),
            quality = profile.as_str(),
            original_kb = %format!("{:.2}", kilobytes(original_size)),
            compressed_kb = %format!("{:.2}", kilobytes(compressed_size)),
            ratio_percent = %format!("{ratio:.1}"),
            "pdf compressed"
        );

        Ok(CompressedPdf {
            token: job.token(),
            filename,
            bytes: compressed,
            original_size,
            compressed_size,
            ratio,
            profile,
        })
    }
}

/// Size reduction in percent: `(1 - compressed / original) * 100`.
///
/// An empty original reports `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn compression_ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}

#[allow(clippy::cast_precision_loss)]
const fn kilobytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

fn validate(request: &CompressRequest<'_>) -> CompressResult<(String, QualityProfile)> {
    let filename = output_filename(request.filename)?;
    let profile = QualityProfile::parse(request.quality)?;
    Ok((filename, profile))
}

fn output_filename(filename: &str) -> CompressResult<String> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    if !base.to_ascii_lowercase().ends_with(".pdf") {
        return Err(CompressError::invalid("file", "not_a_pdf", filename));
    }
    Ok(format!("{OUTPUT_PREFIX}{base}"))
}
