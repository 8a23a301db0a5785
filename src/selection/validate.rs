//! Candidate validation and repair.
//!
//! Time bounds are checked strictly: a candidate with an unusable range is
//! dropped rather than clamped into a degenerate clip, because output files
//! are keyed by time range. Metadata is treated leniently: a missing caption
//! or reason only degrades naming, so placeholders are substituted instead.

use super::{Clip, ClipCandidate, TimeValue, DEFAULT_CAPTION, DEFAULT_REASON};
use crate::transcript::{parse_clock, Transcript};
use thiserror::Error;

/// Acceptable clip duration range in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationBand {
    pub min_seconds: f64,
    pub max_seconds: f64,
}

impl Default for DurationBand {
    fn default() -> Self {
        Self {
            min_seconds: 0.0,
            max_seconds: 60.0,
        }
    }
}

/// Why a candidate was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CandidateError {
    #[error("candidate is missing a start or end time")]
    MissingTime,

    #[error("unusable time value: {0}")]
    BadTime(String),

    #[error("end time is not after start time")]
    NonPositiveDuration,

    #[error("clip starts at or past the end of the transcript")]
    StartPastTranscript,

    #[error("clip duration {0:.1}s is outside the configured band")]
    DurationOutOfBand(f64),
}

/// Validate and repair one raw candidate against the transcript.
///
/// Repairs are limited to clamping an end time that overshoots the
/// transcript (downloaded media and model-estimated timestamps routinely
/// disagree by a few seconds near the tail) and substituting metadata
/// placeholders. Everything else is a rejection.
pub fn validate_candidate(
    raw: &ClipCandidate,
    transcript: &Transcript,
    band: &DurationBand,
) -> Result<Clip, CandidateError> {
    let start = resolve_seconds(raw.start.as_ref())?;
    let end = resolve_seconds(raw.end.as_ref())?;

    if start >= end {
        return Err(CandidateError::NonPositiveDuration);
    }

    let end = end.min(transcript.duration);

    if start >= transcript.duration {
        return Err(CandidateError::StartPastTranscript);
    }

    let duration = end - start;
    if duration < band.min_seconds || duration > band.max_seconds {
        return Err(CandidateError::DurationOutOfBand(duration));
    }

    let reason = match raw.reason.trim() {
        "" => DEFAULT_REASON.to_string(),
        r => r.to_string(),
    };
    let caption = match raw.caption.trim() {
        "" => DEFAULT_CAPTION.to_string(),
        c => c.to_string(),
    };

    Ok(Clip {
        start,
        end,
        reason,
        caption,
    })
}

/// Convert a raw time value into non-negative seconds.
fn resolve_seconds(value: Option<&TimeValue>) -> Result<f64, CandidateError> {
    match value {
        None => Err(CandidateError::MissingTime),
        Some(TimeValue::Seconds(s)) if s.is_finite() && *s >= 0.0 => Ok(*s),
        Some(TimeValue::Seconds(s)) => Err(CandidateError::BadTime(s.to_string())),
        Some(TimeValue::Clock(text)) => {
            parse_clock(text).map_err(|_| CandidateError::BadTime(text.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Segment;

    fn transcript_of(duration: f64) -> Transcript {
        Transcript::new(vec![Segment::new(0.0, duration, "talk", vec![])])
    }

    fn candidate(start: &str, end: &str) -> ClipCandidate {
        ClipCandidate {
            start: Some(TimeValue::Clock(start.to_string())),
            end: Some(TimeValue::Clock(end.to_string())),
            reason: "because".to_string(),
            caption: "look".to_string(),
        }
    }

    #[test]
    fn test_accepts_well_formed_candidate() {
        let clip = validate_candidate(
            &candidate("00:10", "00:40"),
            &transcript_of(100.0),
            &DurationBand::default(),
        )
        .unwrap();
        assert_eq!(clip.start, 10.0);
        assert_eq!(clip.end, 40.0);
        assert_eq!(clip.reason, "because");
        assert_eq!(clip.caption, "look");
    }

    #[test]
    fn test_rejects_end_before_start() {
        let result = validate_candidate(
            &candidate("05:00", "04:00"),
            &transcript_of(600.0),
            &DurationBand::default(),
        );
        assert_eq!(result, Err(CandidateError::NonPositiveDuration));
    }

    #[test]
    fn test_repairs_end_past_transcript() {
        let clip = validate_candidate(
            &candidate("00:10", "00:50"),
            &transcript_of(45.0),
            &DurationBand::default(),
        )
        .unwrap();
        assert_eq!(clip.start, 10.0);
        assert_eq!(clip.end, 45.0);
    }

    #[test]
    fn test_rejects_start_past_transcript() {
        let result = validate_candidate(
            &candidate("01:00", "01:30"),
            &transcript_of(45.0),
            &DurationBand::default(),
        );
        assert_eq!(result, Err(CandidateError::StartPastTranscript));
    }

    #[test]
    fn test_rejects_unparseable_time() {
        let result = validate_candidate(
            &candidate("soon", "00:30"),
            &transcript_of(100.0),
            &DurationBand::default(),
        );
        assert_eq!(result, Err(CandidateError::BadTime("soon".to_string())));
    }

    #[test]
    fn test_rejects_missing_time() {
        let raw = ClipCandidate {
            start: Some(TimeValue::Seconds(5.0)),
            ..Default::default()
        };
        let result = validate_candidate(&raw, &transcript_of(100.0), &DurationBand::default());
        assert_eq!(result, Err(CandidateError::MissingTime));
    }

    #[test]
    fn test_rejects_negative_numeric_start() {
        let raw = ClipCandidate {
            start: Some(TimeValue::Seconds(-3.0)),
            end: Some(TimeValue::Seconds(10.0)),
            ..Default::default()
        };
        let result = validate_candidate(&raw, &transcript_of(100.0), &DurationBand::default());
        assert!(matches!(result, Err(CandidateError::BadTime(_))));
    }

    #[test]
    fn test_rejects_duration_outside_band() {
        let result = validate_candidate(
            &candidate("00:00", "02:00"),
            &transcript_of(600.0),
            &DurationBand::default(),
        );
        assert!(matches!(result, Err(CandidateError::DurationOutOfBand(_))));
    }

    #[test]
    fn test_substitutes_metadata_placeholders() {
        let raw = ClipCandidate {
            start: Some(TimeValue::Seconds(0.0)),
            end: Some(TimeValue::Seconds(30.0)),
            reason: "  ".to_string(),
            caption: String::new(),
        };
        let clip =
            validate_candidate(&raw, &transcript_of(100.0), &DurationBand::default()).unwrap();
        assert_eq!(clip.reason, DEFAULT_REASON);
        assert_eq!(clip.caption, DEFAULT_CAPTION);
    }

    #[test]
    fn test_numeric_seconds_pass_through() {
        let raw = ClipCandidate {
            start: Some(TimeValue::Seconds(12.5)),
            end: Some(TimeValue::Seconds(47.25)),
            ..Default::default()
        };
        let clip =
            validate_candidate(&raw, &transcript_of(100.0), &DurationBand::default()).unwrap();
        assert_eq!(clip.start, 12.5);
        assert_eq!(clip.end, 47.25);
    }
}
