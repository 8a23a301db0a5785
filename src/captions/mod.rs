//! Word-level caption scheduling.
//!
//! For a chosen clip, the transcript's absolute word timings are re-based
//! onto the clip's own clock so a renderer can show one caption per word.
//! Only words fully inside the clip are scheduled.

use crate::selection::Clip;
use crate::transcript::Transcript;
use serde::{Deserialize, Serialize};

/// One word's on-screen display window, relative to its clip's start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionEvent {
    /// The word to display.
    pub text: String,
    /// Display start in seconds from the clip's start.
    pub start: f64,
    /// Display end in seconds from the clip's start.
    pub end: f64,
}

/// Derive the caption schedule for a clip.
///
/// Events come back in transcript order and always satisfy
/// `0 <= start <= end <= clip.duration()`.
pub fn synchronize(clip: &Clip, transcript: &Transcript) -> Vec<CaptionEvent> {
    transcript
        .words_within(clip.start, clip.end)
        .into_iter()
        .map(|word| CaptionEvent {
            text: word.text.clone(),
            start: word.start - clip.start,
            end: word.end - clip.start,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Segment, Word};

    fn clip(start: f64, end: f64) -> Clip {
        Clip {
            start,
            end,
            reason: "r".to_string(),
            caption: "c".to_string(),
        }
    }

    fn transcript() -> Transcript {
        Transcript::new(vec![Segment::new(
            9.0,
            21.0,
            "boundary words",
            vec![
                Word::new("before", 9.0, 11.0),
                Word::new("inside", 10.0, 15.0),
                Word::new("also", 15.0, 20.0),
                Word::new("after", 19.0, 21.0),
            ],
        )])
    }

    #[test]
    fn test_events_are_clip_relative() {
        let events = synchronize(&clip(10.0, 20.0), &transcript());
        assert_eq!(
            events,
            vec![
                CaptionEvent {
                    text: "inside".to_string(),
                    start: 0.0,
                    end: 5.0
                },
                CaptionEvent {
                    text: "also".to_string(),
                    start: 5.0,
                    end: 10.0
                },
            ]
        );
    }

    #[test]
    fn test_relative_time_invariant() {
        let clip = clip(10.0, 20.0);
        for event in synchronize(&clip, &transcript()) {
            assert!(event.start >= 0.0);
            assert!(event.start <= event.end);
            assert!(event.end <= clip.duration());
        }
    }

    #[test]
    fn test_clip_with_no_contained_words() {
        let events = synchronize(&clip(0.0, 5.0), &transcript());
        assert!(events.is_empty());
    }
}
