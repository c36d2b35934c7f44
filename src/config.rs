//! Configuration for the preprocessing pipeline.
//!
//! All tunables live in one [`PipelineConfig`] built via its
//! [`PipelineConfigBuilder`]. Keeping every knob in a single struct makes it
//! trivial to share across requests, log, and diff two runs to understand why
//! their outputs differ.
//!
//! # Design choice: builder over constructor
//! A constructor with this many fields breaks on every new field. The builder
//! lets callers set only what they care about and rely on documented defaults
//! for the rest.

use crate::error::PreprocessError;
use serde::{Deserialize, Serialize};

/// Configuration shared by extraction and segment generation.
///
/// Built via [`PipelineConfig::builder()`] or [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use studycast::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .model("gemini-2.0-flash")
///     .api_timeout_secs(90)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Generative-text model identifier. Default: `"gemini-2.0-flash"`.
    pub model: String,

    /// API key override. Default: `None` — the key is read from the
    /// `GEMINI_API_KEY` environment variable at generator construction time.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,

    /// Sampling temperature for the generation call. Default: 0.3.
    ///
    /// Low enough that the model stays faithful to the source material, high
    /// enough that the rewrite into spoken prose doesn't become a verbatim
    /// copy of the document.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 8192.
    ///
    /// A 25-minute lecture at ~120 words per minute is roughly 3 000 words;
    /// 8 192 tokens leaves headroom for JSON syntax and longer scripts
    /// without truncating the array mid-element.
    pub max_output_tokens: usize,

    /// Per-call timeout for the generation request in seconds. Default: 120.
    ///
    /// Structured generation of a full lecture is slow; 120 s covers the long
    /// tail while still bounding a hung connection.
    pub api_timeout_secs: u64,

    /// Lower bound of the narration duration window in seconds. Default: 1200.
    ///
    /// The 20–30 minute window is a prompt-level contract, not a hard
    /// invariant — the validator logs a warning when the batch lands outside
    /// it but does not reject the batch.
    pub narration_min_secs: u32,

    /// Upper bound of the narration duration window in seconds. Default: 1800.
    pub narration_max_secs: u32,

    /// Assumed narration speed used in the prompt's duration estimates.
    /// Default: 120 words per minute.
    pub words_per_minute: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            temperature: 0.3,
            max_output_tokens: 8192,
            api_timeout_secs: 120,
            narration_min_secs: 1200,
            narration_max_secs: 1800,
            words_per_minute: 120,
        }
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// The narration window in whole minutes, used when rendering the prompt.
    pub fn narration_window_minutes(&self) -> (u32, u32) {
        (self.narration_min_secs / 60, self.narration_max_secs / 60)
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: usize) -> Self {
        self.config.max_output_tokens = n.max(256);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn narration_window_secs(mut self, min: u32, max: u32) -> Self {
        self.config.narration_min_secs = min;
        self.config.narration_max_secs = max;
        self
    }

    pub fn words_per_minute(mut self, wpm: u32) -> Self {
        self.config.words_per_minute = wpm;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, PreprocessError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(PreprocessError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if c.narration_min_secs == 0 || c.narration_min_secs >= c.narration_max_secs {
            return Err(PreprocessError::InvalidConfig(format!(
                "Narration window must satisfy 0 < min < max, got {}–{}",
                c.narration_min_secs, c.narration_max_secs
            )));
        }
        if c.words_per_minute == 0 {
            return Err(PreprocessError::InvalidConfig(
                "Words per minute must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
