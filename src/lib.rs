//! # Statement Analyzer
//!
//! A library driving the upload → encode → request → validate → render
//! pipeline for an AI-powered financial statement analyzer.
//!
//! ## Core Concepts
//!
//! - **Ingestion**: a user-selected file (spreadsheet, CSV, PDF) is
//!   normalized into a base64 payload plus MIME type; spreadsheets are
//!   converted to CSV text (first sheet) before encoding
//! - **Analysis Client**: exactly one Gemini `generateContent` call with a
//!   fixed Thai analyst prompt, the file as inline data, and a strict JSON
//!   response schema
//! - **Validation**: the loosely-typed model response is cleaned (code
//!   fences stripped) and parsed into a fully-typed [`AnalysisResult`];
//!   collections are always present, enums are closed
//! - **State Machine**: `Upload → Analyzing(0..=100) → Result | Error`,
//!   with a cosmetic progress ticker joined explicitly with the real
//!   request before a result is shown
//! - **Export**: a three-sheet workbook (executive report, variance
//!   analysis, financial ratios) produced from a validated result
//!
//! ## Example
//!
//! ```rust,ignore
//! use statement_analyzer::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = GeminiClient::from_env()?;
//!     let mut controller = AppController::new();
//!
//!     let bytes = std::fs::read("statement.xlsx")?;
//!     let state = analyze_file(&mut controller, &client, "statement.xlsx", None, &bytes).await?;
//!
//!     if let AppState::Result(result) = state {
//!         std::fs::write(EXPORT_FILE_NAME, build_workbook(result)?)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod export;
pub mod ingestion;
pub mod llm;
pub mod schema;
pub mod state;

pub use error::{AnalyzerError, Result};
pub use export::{build_workbook, EXPORT_FILE_NAME};
pub use ingestion::{classify, ingest_bytes, ingest_path, FileKind, UploadedFile, MAX_UPLOAD_BYTES};
pub use llm::{clean_json_response, parse_analysis_response, GeminiClient, API_KEY_ENV};
pub use schema::*;
pub use state::{AppController, AppState, Event};

use log::warn;

/// Runs the full pipeline for one uploaded file: ingest, request, state
/// transitions.
///
/// Ingestion failures return an error without touching the controller, so
/// the UI can alert and stay on the upload view; everything after that is
/// absorbed by the state machine and surfaced as [`AppState::Error`].
pub async fn analyze_file<'a>(
    controller: &'a mut AppController,
    client: &GeminiClient,
    file_name: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<&'a AppState> {
    let file = match ingestion::ingest_bytes(file_name, content_type, bytes) {
        Ok(file) => file,
        Err(e) => {
            warn!("Ingestion of '{}' failed: {}", file_name, e);
            return Err(e);
        }
    };

    Ok(controller.run_analysis(client.analyze(&file)).await)
}
