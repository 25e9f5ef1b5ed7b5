//! Receipt Documents
//!
//! The server renders PDFs and ships them base64-encoded. The client only
//! decodes, checks the magic bytes and hands the bytes on.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::fs;
use tracing::info;

use crate::error::DocumentError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Decode a base64 PDF, tolerating a `data:` URI prefix and line breaks.
pub fn decode_pdf(encoded: &str) -> Result<Vec<u8>, DocumentError> {
    let body = match encoded.split_once("base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(DocumentError::Empty);
    }

    let bytes = STANDARD.decode(compact)?;
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(DocumentError::NotPdf);
    }
    Ok(bytes)
}

pub fn encode_document(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode `encoded` and write it to `path`. Returns the byte count.
pub async fn save_pdf(encoded: &str, path: impl AsRef<Path>) -> Result<usize, DocumentError> {
    let bytes = decode_pdf(encoded)?;
    fs::write(path.as_ref(), &bytes).await?;
    info!("Saved {} byte receipt to {}", bytes.len(), path.as_ref().display());
    Ok(bytes.len())
}
