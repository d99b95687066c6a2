//! Summaries printed once a command succeeds.

use std::path::Path;

use pdfpress_api_models::HealthResponse;

/// Savings and sizes reported after a successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CompressionSummary {
    pub(crate) original_size: u64,
    pub(crate) compressed_size: u64,
}

impl CompressionSummary {
    /// Reduction in percent; negative when the output grew.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) const fn savings_percent(self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.compressed_size as f64 / self.original_size as f64) * 100.0
    }
}

pub(crate) fn render_compress_summary(output: &Path, summary: CompressionSummary) -> String {
    format!(
        "wrote {}\noriginal:   {}\ncompressed: {}\nsaved:      {:.1}%",
        output.display(),
        format_size(summary.original_size),
        format_size(summary.compressed_size),
        summary.savings_percent()
    )
}

pub(crate) fn render_health(health: &HealthResponse) -> String {
    let ghostscript = if health.ghostscript_available {
        "available"
    } else {
        "unavailable"
    };
    format!("status: {}\nghostscript: {ghostscript}", health.status)
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    match bytes {
        b if b >= MIB => format!("{:.2} MiB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.1} KiB", b as f64 / KIB as f64),
        b => format!("{b} B"),
    }
}
