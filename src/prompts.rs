//! The instructional prompt sent to the generative-text model.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tightening a rule (e.g. the duration
//!    target or the JSON contract) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the rendered prompt directly
//!    without calling a live model, making prompt regressions easy to catch.

use crate::config::PipelineConfig;

/// Fixed instructional prompt for turning raw course text into lecture segments.
///
/// Placeholders `{min_minutes}`, `{max_minutes}`, and `{wpm}` are filled from
/// [`PipelineConfig`] by [`build_lecture_prompt`].
const LECTURE_PROMPT_TEMPLATE: &str = r#"You are an expert exam tutor preparing an audio lecture from course material.

Follow these rules precisely:

1. CONTENT SELECTION
   - Keep only exam-relevant content: core concepts, definitions, formulas, and high-yield facts
   - Discard filler, anecdotes, administrative notes, and redundant repetition

2. SPOKEN STYLE
   - Rewrite every surviving topic as flowing lecture prose a narrator can read aloud
   - Do NOT use bullet points, headings, or markdown inside the spoken content

3. DURATION TARGET
   - The full lecture should run {min_minutes} to {max_minutes} minutes when read aloud
   - Expand with worked examples and comparisons where needed to reach the target, staying exam-focused
   - Estimate duration at roughly {wpm} spoken words per 60 seconds

4. OUTPUT FORMAT
   - Output strictly one JSON array with nothing before or after it
   - Each element has exactly these keys:
       "title": short topic title
       "content": the spoken lecture prose
       "importance": "high" or "medium"
       "duration": estimated seconds to read the content aloud, a positive integer
   - Order the elements in the sequence a teacher would cover them"#;

/// Render the full prompt for one preprocessing request: the instructional
/// rules followed by the source text.
pub fn build_lecture_prompt(source_text: &str, config: &PipelineConfig) -> String {
    let (min_minutes, max_minutes) = config.narration_window_minutes();
    let rules = LECTURE_PROMPT_TEMPLATE
        .replace("{min_minutes}", &min_minutes.to_string())
        .replace("{max_minutes}", &max_minutes.to_string())
        .replace("{wpm}", &config.words_per_minute.to_string());

    format!("{rules}\n\nSOURCE MATERIAL:\n\"\"\"\n{source_text}\n\"\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_duration_window_and_source() {
        let config = PipelineConfig::default();
        let prompt = build_lecture_prompt("Kinetics of enzymes", &config);
        assert!(prompt.contains("20 to 30 minutes"));
        assert!(prompt.contains("120 spoken words per 60 seconds"));
        assert!(prompt.contains("Kinetics of enzymes"));
        // Source must come after the rules so the model reads instructions first.
        let rules_pos = prompt.find("OUTPUT FORMAT").unwrap();
        let source_pos = prompt.find("Kinetics").unwrap();
        assert!(rules_pos < source_pos);
    }

    #[test]
    fn prompt_demands_a_single_json_array() {
        let prompt = build_lecture_prompt("x", &PipelineConfig::default());
        assert!(prompt.contains("one JSON array"));
        assert!(prompt.contains("\"importance\": \"high\" or \"medium\""));
        assert!(prompt.contains("\"duration\""));
    }

    #[test]
    fn prompt_honours_custom_window() {
        let config = PipelineConfig::builder()
            .narration_window_secs(600, 900)
            .words_per_minute(150)
            .build()
            .unwrap();
        let prompt = build_lecture_prompt("x", &config);
        assert!(prompt.contains("10 to 15 minutes"));
        assert!(prompt.contains("150 spoken words"));
    }
}
