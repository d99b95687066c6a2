use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use pdfpress_api_models::{FIELD_FILE, FIELD_QUALITY, HEADER_COMPRESSED_SIZE, HEADER_ORIGINAL_SIZE};
use reqwest::Response;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::cli::CompressArgs;
use crate::client::{AppContext, CliError, CliResult, classify_problem};
use crate::output::{CompressionSummary, render_compress_summary};

const CONTENT_TYPE_PDF: &str = "application/pdf";

pub(crate) async fn handle_compress(ctx: &AppContext, args: CompressArgs) -> CliResult<()> {
    let filename = pdf_file_name(&args.file)?;
    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.file, &filename));

    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))
        .map_err(CliError::failure)?;
    let uploaded = bytes.len() as u64;

    let part = Part::bytes(bytes)
        .file_name(filename)
        .mime_str(CONTENT_TYPE_PDF)
        .map_err(|err| CliError::failure(anyhow!("failed to build upload: {err}")))?;
    let form = Form::new()
        .part(FIELD_FILE, part)
        .text(FIELD_QUALITY, args.quality.as_str());

    let url = ctx.endpoint("/compress")?;
    debug!(url = %url, quality = args.quality.as_str(), bytes = uploaded, "uploading PDF");
    let response = ctx
        .client
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("request to /compress failed: {err}")))?;

    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }

    let original_size = size_header(&response, HEADER_ORIGINAL_SIZE);
    let compressed_size = size_header(&response, HEADER_COMPRESSED_SIZE);
    let body = response
        .bytes()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to read compressed PDF: {err}")))?;

    tokio::fs::write(&output, &body)
        .await
        .with_context(|| format!("failed to write {}", output.display()))
        .map_err(CliError::failure)?;

    let summary = CompressionSummary {
        original_size: original_size.unwrap_or(uploaded),
        compressed_size: compressed_size.unwrap_or(body.len() as u64),
    };
    println!("{}", render_compress_summary(&output, summary));
    Ok(())
}

/// Base name of `path`, which must carry a `.pdf` extension.
fn pdf_file_name(path: &Path) -> CliResult<String> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::validation(format!("{} is not a file name", path.display())))?;
    let is_pdf = Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(CliError::validation(format!("{name} is not a PDF file")));
    }
    Ok(name.to_string())
}

fn default_output_path(input: &Path, filename: &str) -> PathBuf {
    input.with_file_name(format!("compressed_{filename}"))
}

fn size_header(response: &Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}
