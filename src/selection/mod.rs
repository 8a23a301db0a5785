//! Clip selection: turning a transcript into validated, time-bounded clips.
//!
//! The flow is candidate-in, clip-out. Candidates come from the language
//! model (or the deterministic fallback) as untrusted data; the validator
//! is the only way to turn one into a [`Clip`].

mod fallback;
mod finder;
mod parse;
mod validate;

pub use fallback::select_fallback_clips;
pub use finder::ClipFinder;
pub use parse::ResponseParser;
pub use validate::{validate_candidate, CandidateError, DurationBand};

use serde::{Deserialize, Serialize};

/// Placeholder used when a candidate arrives without a reason.
pub const DEFAULT_REASON: &str = "Interesting moment";

/// Placeholder used when a candidate arrives without a caption.
pub const DEFAULT_CAPTION: &str = "Check out this moment!";

/// A clip boundary as it appears in model output: either a bare number of
/// seconds or `mm:ss` clock text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Seconds(f64),
    Clock(String),
}

/// An untrusted clip suggestion.
///
/// Produced by the language model or the fallback selector. Fields may be
/// missing, malformed, out of order, or out of transcript bounds; only the
/// validator decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipCandidate {
    #[serde(default)]
    pub start: Option<TimeValue>,
    #[serde(default)]
    pub end: Option<TimeValue>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub caption: String,
}

/// A validated, in-bounds clip ready for cutting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Start in seconds, `0 <= start < end`.
    pub start: f64,
    /// End in seconds, `end <= transcript.duration`.
    pub end: f64,
    /// Why this range was selected. Never empty.
    pub reason: String,
    /// Suggested caption text. Never empty.
    pub caption: String,
}

impl Clip {
    /// Duration of the clip in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_accepts_numeric_and_clock_times() {
        let json = r#"{"start": 12.5, "end": "01:30", "reason": "r", "caption": "c"}"#;
        let candidate: ClipCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.start, Some(TimeValue::Seconds(12.5)));
        assert_eq!(candidate.end, Some(TimeValue::Clock("01:30".to_string())));
    }

    #[test]
    fn test_candidate_tolerates_missing_fields() {
        let candidate: ClipCandidate = serde_json::from_str(r#"{"start": "00:10"}"#).unwrap();
        assert_eq!(candidate.start, Some(TimeValue::Clock("00:10".to_string())));
        assert!(candidate.end.is_none());
        assert!(candidate.reason.is_empty());
        assert!(candidate.caption.is_empty());
    }

    #[test]
    fn test_candidate_accepts_integer_seconds() {
        let candidate: ClipCandidate = serde_json::from_str(r#"{"start": 90, "end": 120}"#).unwrap();
        assert_eq!(candidate.start, Some(TimeValue::Seconds(90.0)));
        assert_eq!(candidate.end, Some(TimeValue::Seconds(120.0)));
    }
}
