//! The external generative-text capability and its Gemini implementation.
//!
//! The model invocation hides behind [`TextGenerator`] so pipeline-logic
//! tests can substitute a deterministic stub returning fixed JSON, fully
//! decoupled from the live service. [`GeminiGenerator`] is the production
//! implementation: one `generateContent` call per request over reqwest, with
//! JSON output mode requested when the caller wants structured output.
//!
//! No automatic retry lives here. A failed generation surfaces immediately
//! and the caller decides whether to re-request the whole preprocessing run.

use crate::config::PipelineConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the Gemini API credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// An opaque generative-text capability.
///
/// `structured_json` asks the service to constrain its response to JSON
/// (structured output mode); implementations that cannot honour it must still
/// return the model's text and let the validator judge it.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        structured_json: bool,
    ) -> Result<String, GenerationError>;
}

/// Gemini `generateContent` client.
#[derive(Debug)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: usize,
    timeout_secs: u64,
}

impl GeminiGenerator {
    /// Build a generator with an explicit API key.
    pub fn new(api_key: impl Into<String>, config: &PipelineConfig) -> Result<Self, GenerationError> {
        let timeout_secs = config.api_timeout_secs;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GenerationError::Unavailable {
                detail: format!("HTTP client construction failed: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout_secs,
        })
    }

    /// Build a generator from `config.api_key`, falling back to the
    /// `GEMINI_API_KEY` environment variable.
    pub fn from_env(config: &PipelineConfig) -> Result<Self, GenerationError> {
        let key = match config.api_key.clone() {
            Some(k) if !k.is_empty() => k,
            _ => std::env::var(API_KEY_ENV)
                .ok()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| GenerationError::Unavailable {
                    detail: format!("{API_KEY_ENV} not set"),
                })?,
        };
        Self::new(key, config)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        structured_json: bool,
    ) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
                response_mime_type: structured_json.then(|| "application/json".to_string()),
            },
        };

        let url = format!("{API_BASE}/{}:generateContent", self.model);
        debug!("Calling {} ({} prompt bytes)", self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    GenerationError::Unavailable {
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Generation request rejected: HTTP {status}");
            return Err(GenerationError::Unavailable {
                detail: format!("HTTP {status}: {}", truncate(&body, 500)),
            });
        }

        let parsed: GenerateResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::Unavailable {
                    detail: format!("response decode failed: {e}"),
                })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .concat()
            })
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GenerationError::Unavailable {
                detail: "response carried no candidate text".into(),
            })?;

        debug!("Received {} bytes of model output", text.len());
        Ok(text)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}
