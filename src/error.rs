use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Ingestion failed: {0}")]
    Ingestion(String),

    #[error("File exceeds the {limit_bytes} byte upload limit ({actual_bytes} bytes)")]
    FileTooLarge {
        limit_bytes: usize,
        actual_bytes: usize,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Gemini API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Response validation failed: {0}")]
    ResponseValidation(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
