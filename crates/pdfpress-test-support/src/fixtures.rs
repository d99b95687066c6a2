//! Document and request fixtures.

use std::fs;
use std::path::Path;

use anyhow::Result;

const PDF_HEADER: &[u8] = b"%PDF-1.4\n";
const PDF_TRAILER: &[u8] = b"%%EOF\n";

/// Build a byte buffer of roughly `size` bytes that starts with a PDF header.
///
/// The body is comment padding, which is enough for the fake compressor and
/// for header sniffing; it is not a renderable document.
#[must_use]
pub fn sample_pdf(size: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(size.max(PDF_HEADER.len() + PDF_TRAILER.len()));
    bytes.extend_from_slice(PDF_HEADER);
    let line = b"% pdfpress fixture padding line\n";
    while bytes.len() + line.len() + PDF_TRAILER.len() <= size {
        bytes.extend_from_slice(line);
    }
    bytes.extend_from_slice(PDF_TRAILER);
    bytes
}

/// Encode a `multipart/form-data` body.
///
/// Each part is `(name, filename, bytes)`; parts without a filename are plain
/// text fields. Returns the content type (with boundary) and the encoded body.
#[must_use]
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "pdfpress-test-boundary-7d9c2a";
    let mut body = Vec::new();
    for (name, filename, bytes) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

/// List the file names currently present in a scratch directory, sorted.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn scratch_entries(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
