use crate::error::{AnalyzerError, Result};
use crate::ingestion::UploadedFile;
use crate::llm::prompts::ANALYSIS_PROMPT;
use crate::llm::types::*;
use crate::schema::{response_schema, AnalysisResult};
use log::{debug, info};
use reqwest::Client;
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// The underlying transport has no timeout of its own; bound it here so a
/// hung request cannot stall the session forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Reads the credential from [`API_KEY_ENV`]. A missing or empty key is
    /// a configuration error; no client is constructed in that case.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(AnalyzerError::Configuration(format!(
                "{} is not set",
                API_KEY_ENV
            ))),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Issues the single analysis request: fixed prompt plus the encoded
    /// file as inline data, constrained-JSON response mode.
    ///
    /// Exactly one call per invocation; failures are not retried. When the
    /// credential is empty no network request is issued at all.
    pub async fn analyze(&self, file: &UploadedFile) -> Result<AnalysisResult> {
        if self.api_key.trim().is_empty() {
            return Err(AnalyzerError::Configuration(format!(
                "{} is not set",
                API_KEY_ENV
            )));
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::text(ANALYSIS_PROMPT),
                Part::inline_data(&file.mime_type, &file.payload),
            ])],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Some(response_schema()),
            },
        };

        info!("Requesting statement analysis from {}", self.model);

        let res = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await?;
            return Err(AnalyzerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse = res.json().await?;
        let text = first_text_part(body)?;

        parse_analysis_response(&text)
    }
}

fn first_text_part(body: GenerateContentResponse) -> Result<String> {
    let candidates = body.candidates.ok_or_else(|| {
        AnalyzerError::ResponseValidation("No candidates returned".to_string())
    })?;

    let candidate = candidates.into_iter().next().ok_or_else(|| {
        AnalyzerError::ResponseValidation("Empty candidates list".to_string())
    })?;

    candidate
        .content
        .parts
        .into_iter()
        .find_map(|part| match part {
            Part::Text { text } => Some(text),
            _ => None,
        })
        .ok_or_else(|| {
            AnalyzerError::ResponseValidation("Model returned no text content".to_string())
        })
}

/// Strips a surrounding markdown code fence (with optional `json` language
/// token) from the raw model output.
pub fn clean_json_response(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        text = rest.trim_start();
        if let Some(inner) = text.strip_suffix("```") {
            text = inner.trim_end();
        }
    }
    text
}

/// Parses the (cleaned) model output strictly into an [`AnalysisResult`].
///
/// Any parse failure or schema violation is a hard failure; the raw text is
/// kept out of user-facing messages and logged for diagnosis instead.
pub fn parse_analysis_response(raw: &str) -> Result<AnalysisResult> {
    let cleaned = clean_json_response(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        debug!("Rejected model response: {}", raw);
        AnalyzerError::ResponseValidation(format!("Response did not match schema: {}", e))
    })
}
