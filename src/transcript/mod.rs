//! Transcript data model and range queries.
//!
//! A [`Transcript`] is built once from the transcriber's output and treated
//! as read-only by every downstream stage. Upstream speech models do not
//! always keep word timings inside their segment bounds, so nothing here
//! assumes that invariant; queries work on the word timings alone.

pub mod timecode;

pub use timecode::{format_clock, parse_clock, TimecodeError};

use serde::{Deserialize, Serialize};

/// A single recognized word with absolute timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// The word text.
    pub text: String,
    /// Start time in seconds from the beginning of the media.
    pub start: f64,
    /// End time in seconds from the beginning of the media.
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// A contiguous span of recognized speech with its contained words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Transcribed text content.
    pub text: String,
    /// Words in chronological order. May be empty.
    pub words: Vec<Word>,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            words,
        }
    }

    /// Duration of this segment in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A complete transcript: ordered segments plus the derived total duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Segments in the order the transcriber produced them.
    pub segments: Vec<Segment>,
    /// Latest segment end, in seconds. Zero for an empty transcript.
    pub duration: f64,
}

impl Transcript {
    /// Build a transcript from transcriber output.
    ///
    /// Segments are kept exactly as given: no reordering, no dropping of
    /// word-free segments. The duration is the maximum segment end so that
    /// out-of-order input still yields a usable bound.
    pub fn new(segments: Vec<Segment>) -> Self {
        let duration = segments.iter().fold(0.0_f64, |acc, s| acc.max(s.end));
        Self { segments, duration }
    }

    /// Whether the transcript contains no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total number of words across all segments.
    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| s.words.len()).sum()
    }

    /// Iterate over all words with their owning segment, in transcript order.
    pub fn words(&self) -> impl Iterator<Item = (&Segment, &Word)> {
        self.segments
            .iter()
            .flat_map(|s| s.words.iter().map(move |w| (s, w)))
    }

    /// Every word whose time range lies fully inside `[start, end]`.
    ///
    /// This is a strict containment filter: a word that merely overlaps a
    /// boundary is excluded, so captions never show a fragment of a word
    /// spoken outside the clip it is burned into.
    pub fn words_within(&self, start: f64, end: f64) -> Vec<&Word> {
        self.words()
            .map(|(_, w)| w)
            .filter(|w| w.start >= start && w.end <= end)
            .collect()
    }

    /// Render the transcript as `[mm:ss - mm:ss] text` lines for prompting.
    pub fn format_with_timestamps(&self) -> String {
        self.segments
            .iter()
            .map(|s| {
                format!(
                    "[{} - {}] {}",
                    format_clock(s.start),
                    format_clock(s.end),
                    s.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64, end: f64) -> Word {
        Word::new(text, start, end)
    }

    #[test]
    fn test_duration_is_max_segment_end() {
        let transcript = Transcript::new(vec![
            Segment::new(0.0, 5.0, "first", vec![]),
            Segment::new(5.0, 12.0, "second", vec![]),
            // A straggler that ends before the previous segment.
            Segment::new(6.0, 9.0, "third", vec![]),
        ]);
        assert_eq!(transcript.duration, 12.0);
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::new(vec![]);
        assert!(transcript.is_empty());
        assert_eq!(transcript.duration, 0.0);
        assert_eq!(transcript.word_count(), 0);
        assert!(transcript.words_within(0.0, 100.0).is_empty());
        assert_eq!(transcript.format_with_timestamps(), "");
    }

    #[test]
    fn test_words_within_is_strict_containment() {
        let transcript = Transcript::new(vec![Segment::new(
            9.0,
            21.0,
            "boundary words",
            vec![
                word("before", 9.0, 11.0),
                word("inside", 10.0, 15.0),
                word("also", 15.0, 20.0),
                word("after", 19.0, 21.0),
            ],
        )]);

        let contained = transcript.words_within(10.0, 20.0);
        let texts: Vec<&str> = contained.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["inside", "also"]);
    }

    #[test]
    fn test_words_within_crosses_segments_in_order() {
        let transcript = Transcript::new(vec![
            Segment::new(0.0, 4.0, "one two", vec![word("one", 0.5, 1.0), word("two", 3.0, 4.0)]),
            Segment::new(4.0, 8.0, "three", vec![word("three", 4.5, 5.0)]),
        ]);

        let texts: Vec<&str> = transcript
            .words_within(0.0, 8.0)
            .iter()
            .map(|w| w.text.as_str())
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_tolerates_words_outside_segment_bounds() {
        // Some transcribers emit word timings that spill past the segment.
        let transcript = Transcript::new(vec![Segment::new(
            10.0,
            12.0,
            "spill",
            vec![word("spill", 9.5, 12.5)],
        )]);
        assert_eq!(transcript.words_within(9.0, 13.0).len(), 1);
        assert!(transcript.words_within(10.0, 12.0).is_empty());
    }

    #[test]
    fn test_format_with_timestamps() {
        let transcript = Transcript::new(vec![
            Segment::new(0.0, 65.5, "Hello world", vec![]),
            Segment::new(65.5, 70.0, "More talk", vec![]),
        ]);
        assert_eq!(
            transcript.format_with_timestamps(),
            "[00:00 - 01:05] Hello world\n[01:05 - 01:10] More talk"
        );
    }
}
