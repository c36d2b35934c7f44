//! The text-to-segments preprocessing entry point.
//!
//! Ties the pieces together for one request: guard the input, render the
//! prompt, make exactly one generation call, validate the result. Extraction
//! and preprocessing are deliberately independent operations — the caller
//! feeds extracted text into this function, which lets a user edit or trim
//! the text between the two steps.

use crate::config::PipelineConfig;
use crate::error::PreprocessError;
use crate::generate::TextGenerator;
use crate::prompts;
use crate::segment::{self, SegmentBatch};
use std::time::Instant;
use tracing::{debug, info};

/// Transform raw course text into an ordered batch of lecture segments.
///
/// # Errors
/// * [`PreprocessError::EmptyInput`] — `text` is empty or whitespace-only;
///   the generator is never invoked
/// * [`PreprocessError::GenerationUnavailable`] /
///   [`PreprocessError::GenerationTimeout`] — the generative-text call failed;
///   no automatic retry is attempted
/// * [`PreprocessError::MalformedGenerationOutput`] — the model's response
///   failed parsing or schema validation; no partial batch is returned
pub async fn preprocess(
    text: &str,
    generator: &dyn TextGenerator,
    config: &PipelineConfig,
) -> Result<SegmentBatch, PreprocessError> {
    if text.trim().is_empty() {
        return Err(PreprocessError::EmptyInput);
    }

    let start = Instant::now();
    info!("Preprocessing {} characters of source text", text.len());

    // ── Step 1: Render the prompt ────────────────────────────────────────
    let prompt = prompts::build_lecture_prompt(text, config);
    debug!("Prompt is {} bytes", prompt.len());

    // ── Step 2: One structured generation call ───────────────────────────
    let raw = generator.generate(&prompt, true).await?;

    // ── Step 3: Validate into an ordered batch ───────────────────────────
    let batch = segment::parse_segments(&raw, config)?;

    info!(
        "Generated {} segments ({}s narration) in {}ms",
        batch.len(),
        batch.total_duration_secs(),
        start.elapsed().as_millis()
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic generator returning a canned response and counting calls.
    struct StubGenerator {
        response: &'static str,
        calls: AtomicUsize,
    }

    impl StubGenerator {
        fn new(response: &'static str) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(
            &self,
            prompt: &str,
            structured_json: bool,
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(structured_json, "pipeline must request structured output");
            assert!(
                prompt.contains("SOURCE MATERIAL"),
                "prompt must carry the source text block"
            );
            Ok(self.response.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _: &str, _: bool) -> Result<String, GenerationError> {
            Err(GenerationError::Unavailable {
                detail: "quota exhausted".into(),
            })
        }
    }

    const GOOD: &str =
        r#"[{"title":"Limits","content":"A limit describes...","importance":"high","duration":240}]"#;

    #[tokio::test]
    async fn empty_input_short_circuits_before_generation() {
        let stub = StubGenerator::new(GOOD);
        let err = preprocess("   \n\t ", &stub, &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PreprocessError::EmptyInput));
        assert_eq!(stub.call_count(), 0, "generator must not be invoked");
    }

    #[tokio::test]
    async fn valid_generation_yields_ordered_batch() {
        let stub = StubGenerator::new(GOOD);
        let batch = preprocess("calculus notes", &stub, &PipelineConfig::default())
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.as_slice()[0].duration_secs, 240);
        assert_eq!(stub.call_count(), 1, "exactly one generation call");
    }

    #[tokio::test]
    async fn generation_failure_surfaces_as_unavailable() {
        let err = preprocess("notes", &FailingGenerator, &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::GenerationUnavailable { ref detail } if detail.contains("quota")
        ));
    }

    #[tokio::test]
    async fn malformed_generation_output_surfaces_without_partial_batch() {
        let stub = StubGenerator::new("I refuse to emit JSON");
        let err = preprocess("notes", &stub, &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::MalformedGenerationOutput { .. }
        ));
    }
}
