//! Lecture segment types and the generator-output validator.
//!
//! The model is asked for strictly one JSON array; this module is the
//! gatekeeper that decides whether what came back is usable. The policy is
//! whole-batch rejection: any structural violation in any element fails the
//! entire response with
//! [`PreprocessError::MalformedGenerationOutput`](crate::error::PreprocessError),
//! never a silently shortened lecture.
//!
//! The one repair permitted before parsing is stripping a Markdown code fence
//! — models wrap JSON in ```` ```json ```` fences often enough that refusing
//! to look inside would reject otherwise perfect output.

use crate::config::PipelineConfig;
use crate::error::PreprocessError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Importance tag of one lecture segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
}

/// One topic-scoped unit of the lecture: a title, spoken-style prose, an
/// importance tag, and an estimated read-aloud duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureSegment {
    /// Short topic title. Never empty.
    pub title: String,
    /// Spoken lecture prose. Never empty.
    pub content: String,
    /// Exam-relevance weighting.
    pub importance: Importance,
    /// Estimated seconds to read `content` aloud. Always positive.
    #[serde(rename = "duration")]
    pub duration_secs: u32,
}

/// An ordered lecture: insertion order is the order a teacher would cover
/// the topics. Serialises as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentBatch {
    segments: Vec<LectureSegment>,
}

impl SegmentBatch {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LectureSegment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[LectureSegment] {
        &self.segments
    }

    pub fn into_inner(self) -> Vec<LectureSegment> {
        self.segments
    }

    /// Sum of the per-segment duration estimates.
    pub fn total_duration_secs(&self) -> u64 {
        self.segments.iter().map(|s| s.duration_secs as u64).sum()
    }
}

impl IntoIterator for SegmentBatch {
    type Item = LectureSegment;
    type IntoIter = std::vec::IntoIter<LectureSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

/// Parse, schema-check, and normalise the generator's raw response.
///
/// On success the batch preserves the model's element order exactly. On any
/// parse or schema failure the whole response is rejected — the caller must
/// re-request; no partial batch is ever returned.
pub fn parse_segments(raw: &str, config: &PipelineConfig) -> Result<SegmentBatch, PreprocessError> {
    let body = strip_code_fence(raw);

    let raw_segments: Vec<RawSegment> =
        serde_json::from_str(body).map_err(|e| PreprocessError::MalformedGenerationOutput {
            detail: format!("not a JSON segment array: {e}"),
        })?;

    if raw_segments.is_empty() {
        return Err(PreprocessError::MalformedGenerationOutput {
            detail: "model returned an empty segment array".into(),
        });
    }

    let mut segments = Vec::with_capacity(raw_segments.len());
    for (index, raw_segment) in raw_segments.into_iter().enumerate() {
        segments.push(raw_segment.validate(index)?);
    }

    let batch = SegmentBatch { segments };
    debug!(
        "Validated {} segments, {}s total narration",
        batch.len(),
        batch.total_duration_secs()
    );

    // The 20–30 minute target is a prompt-level contract, not an invariant
    // the validator can guarantee. Log, don't reject.
    let total = batch.total_duration_secs();
    if total < config.narration_min_secs as u64 || total > config.narration_max_secs as u64 {
        warn!(
            "Narration total {}s is outside the {}–{}s target window",
            total, config.narration_min_secs, config.narration_max_secs
        );
    }

    Ok(batch)
}

/// A segment as the model wrote it, before schema validation.
///
/// `duration` is accepted as any JSON number — the contract says "positive
/// number" — and normalised to whole seconds.
#[derive(Debug, Deserialize)]
struct RawSegment {
    title: String,
    content: String,
    importance: Importance,
    duration: f64,
}

impl RawSegment {
    fn validate(self, index: usize) -> Result<LectureSegment, PreprocessError> {
        let malformed = |what: &str| PreprocessError::MalformedGenerationOutput {
            detail: format!("segment {index}: {what}"),
        };

        if self.title.trim().is_empty() {
            return Err(malformed("'title' is empty"));
        }
        if self.content.trim().is_empty() {
            return Err(malformed("'content' is empty"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(malformed("'duration' must be a positive number"));
        }

        Ok(LectureSegment {
            title: self.title,
            content: self.content,
            importance: self.importance,
            // Round to whole seconds; a positive sub-second estimate still
            // counts as one second rather than zero.
            duration_secs: (self.duration.round() as u32).max(1),
        })
    }
}

/// Strip one wrapping Markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(inner) = rest.strip_suffix("```") {
            return inner.trim();
        }
    }
    trimmed
}
