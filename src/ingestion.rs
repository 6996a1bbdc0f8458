use crate::error::{AnalyzerError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use calamine::{open_workbook_auto_from_rs, Reader};
use log::debug;
use std::io::Cursor;
use std::path::Path;
use tokio::fs;

/// Advertised upload limit, enforced here rather than trusted to the UI.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const CSV_MIME: &str = "text/csv";
const FALLBACK_MIME: &str = "text/plain";

/// A user-selected file normalized into the payload shape the analysis
/// request needs. Consumed exactly once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Base64-encoded content (CSV text for tabular files, raw bytes otherwise).
    pub payload: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Spreadsheet or CSV; converted to CSV text before encoding.
    Tabular,
    /// PDF or anything else; encoded byte-for-byte.
    Opaque,
}

/// Deterministic classification by extension and declared content type.
pub fn classify(file_name: &str, content_type: Option<&str>) -> FileKind {
    let name = file_name.to_lowercase();
    if name.ends_with(".xlsx") || name.ends_with(".xls") || name.ends_with(".csv") {
        return FileKind::Tabular;
    }
    if let Some(ct) = content_type {
        let ct = ct.to_lowercase();
        if ct.contains("spreadsheet") || ct.contains("excel") || ct == CSV_MIME {
            return FileKind::Tabular;
        }
    }
    FileKind::Opaque
}

/// Converts raw file bytes into an [`UploadedFile`].
///
/// Tabular files become base64-encoded CSV text with a fixed `text/csv`
/// MIME type regardless of their original extension; everything else is
/// base64-encoded verbatim under its declared (or guessed) content type.
pub fn ingest_bytes(
    file_name: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<UploadedFile> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AnalyzerError::FileTooLarge {
            limit_bytes: MAX_UPLOAD_BYTES,
            actual_bytes: bytes.len(),
        });
    }

    match classify(file_name, content_type) {
        FileKind::Tabular => {
            let csv_text = if is_plain_csv(file_name, content_type) {
                String::from_utf8(bytes.to_vec()).map_err(|e| {
                    AnalyzerError::Ingestion(format!("CSV file was not valid UTF-8: {}", e))
                })?
            } else {
                workbook_to_csv(bytes)?
            };
            debug!(
                "Ingested tabular file '{}' ({} bytes of CSV text)",
                file_name,
                csv_text.len()
            );
            Ok(UploadedFile {
                payload: BASE64.encode(csv_text.as_bytes()),
                mime_type: CSV_MIME.to_string(),
            })
        }
        FileKind::Opaque => {
            let mime_type = match content_type {
                Some(ct) if !ct.is_empty() => ct.to_string(),
                _ => mime_guess::from_path(file_name)
                    .first_raw()
                    .unwrap_or(FALLBACK_MIME)
                    .to_string(),
            };
            debug!(
                "Ingested opaque file '{}' as {} ({} bytes)",
                file_name,
                mime_type,
                bytes.len()
            );
            Ok(UploadedFile {
                payload: BASE64.encode(bytes),
                mime_type,
            })
        }
    }
}

/// Reads a file from disk and ingests it.
pub async fn ingest_path(path: &Path) -> Result<UploadedFile> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AnalyzerError::Ingestion("Invalid file name".to_string()))?;

    let bytes = fs::read(path).await?;
    ingest_bytes(file_name, None, &bytes)
}

fn is_plain_csv(file_name: &str, content_type: Option<&str>) -> bool {
    file_name.to_lowercase().ends_with(".csv")
        || content_type.is_some_and(|ct| ct.eq_ignore_ascii_case(CSV_MIME))
}

/// First sheet of the workbook, row-major, as CSV text.
fn workbook_to_csv(bytes: &[u8]) -> Result<String> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| AnalyzerError::Ingestion(format!("Unreadable workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AnalyzerError::Ingestion("Workbook has no sheets".to_string()))?
        .map_err(|e| AnalyzerError::Ingestion(format!("Unreadable first sheet: {}", e)))?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in range.rows() {
        let record: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        writer
            .write_record(&record)
            .map_err(|e| AnalyzerError::Ingestion(format!("CSV conversion failed: {}", e)))?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| AnalyzerError::Ingestion(format!("CSV conversion failed: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| AnalyzerError::Ingestion(format!("CSV output was not UTF-8: {}", e)))
}
