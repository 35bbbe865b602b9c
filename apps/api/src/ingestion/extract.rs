//! Text extraction for uploaded resumes (PDF or plain text).

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Uploaded file is empty")]
    Empty,

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Document is not valid UTF-8 text")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Decides the format from the magic bytes first, then the content type, then the extension.
pub fn detect_format(doc: &UploadedDocument) -> Result<DocumentFormat, ExtractionError> {
    if doc.data.starts_with(PDF_MAGIC) {
        return Ok(DocumentFormat::Pdf);
    }

    if let Some(content_type) = doc.content_type.as_deref() {
        let mime = content_type.split(';').next().unwrap_or("").trim();
        if mime == "application/pdf" {
            return Ok(DocumentFormat::Pdf);
        }
        if mime.starts_with("text/") {
            return Ok(DocumentFormat::PlainText);
        }
    }

    let extension = doc
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => Ok(DocumentFormat::Pdf),
        Some("txt") | Some("md") | Some("text") => Ok(DocumentFormat::PlainText),
        Some(other) => Err(ExtractionError::UnsupportedFormat(format!(".{other}"))),
        None => Err(ExtractionError::UnsupportedFormat(
            doc.content_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        )),
    }
}

/// Extracts the full text of an uploaded resume.
pub async fn extract_text(doc: UploadedDocument) -> Result<String, ExtractionError> {
    if doc.data.is_empty() {
        return Err(ExtractionError::Empty);
    }

    let format = detect_format(&doc)?;
    debug!(
        "Extracting {:?} document ({} bytes)",
        format,
        doc.data.len()
    );

    match format {
        DocumentFormat::PlainText => Ok(String::from_utf8(doc.data.to_vec())?),
        DocumentFormat::Pdf => {
            let data = doc.data;
            // pdf-extract is CPU bound and can panic on malformed input
            tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&data).map_err(|e| e.to_string())
            })
            .await
            .map_err(|e| {
                warn!("PDF extraction task failed: {e}");
                ExtractionError::Pdf("document could not be parsed".to_string())
            })?
            .map_err(ExtractionError::Pdf)
        }
    }
}
