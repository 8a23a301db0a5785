//! Deterministic, transcript-only clip selection.
//!
//! Used when the language model is unavailable or fails outright. Picks
//! evenly spaced words across the transcript and centers a crude symmetric
//! window on each; no content awareness, no external calls, and the same
//! transcript always yields byte-identical candidates.

use super::{ClipCandidate, TimeValue};
use crate::transcript::{format_clock, Transcript};
use tracing::debug;

/// Upper bound on the number of fallback clips.
const MAX_CLIPS: usize = 5;

/// Half-width of the window centered on the chosen word, in seconds.
const WINDOW_HALF_SECONDS: f64 = 25.0;

/// Slack past the chosen word's end that the window may extend to.
const WINDOW_TAIL_SECONDS: f64 = 30.0;

/// Longest caption taken from the transcript before truncation.
const CAPTION_MAX_CHARS: usize = 100;

/// Select up to five evenly spaced clip candidates from the transcript.
///
/// With `n` words total, `min(5, n / 3)` clips are produced (at least one
/// when any words exist; an empty transcript yields no candidates). Times
/// are emitted as `mm:ss` text so fallback output flows through the same
/// validation path as model output.
pub fn select_fallback_clips(transcript: &Transcript) -> Vec<ClipCandidate> {
    let words: Vec<_> = transcript.words().collect();
    let n = words.len();
    if n == 0 {
        return Vec::new();
    }

    let k = (n / 3).clamp(1, MAX_CLIPS);
    debug!("Selecting {} fallback clips from {} words", k, n);

    let mut clips = Vec::with_capacity(k);
    for i in 0..k {
        let (segment, word) = words[i * n / k];

        let mid = (word.start + word.end) / 2.0;
        let start = (mid - WINDOW_HALF_SECONDS).max(0.0);
        let end = (mid + WINDOW_HALF_SECONDS).min(word.end + WINDOW_TAIL_SECONDS);

        let source_text = if segment.text.trim().is_empty() {
            word.text.as_str()
        } else {
            segment.text.as_str()
        };

        clips.push(ClipCandidate {
            start: Some(TimeValue::Clock(format_clock(start))),
            end: Some(TimeValue::Clock(format_clock(end))),
            reason: "Potentially interesting segment".to_string(),
            caption: truncate_caption(source_text, CAPTION_MAX_CHARS),
        });
    }

    clips
}

/// Truncate to `max_chars` characters with an ellipsis marker.
fn truncate_caption(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Segment, Word};

    /// A transcript with `n` one-second words in ten-word segments.
    fn transcript_with_words(n: usize) -> Transcript {
        let mut segments = Vec::new();
        for (chunk_idx, chunk) in (0..n).collect::<Vec<_>>().chunks(10).enumerate() {
            let words: Vec<Word> = chunk
                .iter()
                .map(|&i| Word::new(format!("w{}", i), i as f64, (i + 1) as f64))
                .collect();
            let start = chunk[0] as f64;
            let end = (chunk[chunk.len() - 1] + 1) as f64;
            segments.push(Segment::new(
                start,
                end,
                format!("segment {}", chunk_idx),
                words,
            ));
        }
        Transcript::new(segments)
    }

    #[test]
    fn test_empty_transcript_yields_no_clips() {
        assert!(select_fallback_clips(&Transcript::new(vec![])).is_empty());
    }

    #[test]
    fn test_wordless_segments_yield_no_clips() {
        let transcript = Transcript::new(vec![Segment::new(0.0, 5.0, "silence", vec![])]);
        assert!(select_fallback_clips(&transcript).is_empty());
    }

    #[test]
    fn test_clip_count_scales_with_word_count() {
        assert_eq!(select_fallback_clips(&transcript_with_words(2)).len(), 1);
        assert_eq!(select_fallback_clips(&transcript_with_words(6)).len(), 2);
        assert_eq!(select_fallback_clips(&transcript_with_words(30)).len(), 5);
        assert_eq!(select_fallback_clips(&transcript_with_words(200)).len(), 5);
    }

    #[test]
    fn test_deterministic_output() {
        let transcript = transcript_with_words(30);
        let first = select_fallback_clips(&transcript);
        let second = select_fallback_clips(&transcript);
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_window_is_clamped_at_zero() {
        let transcript = transcript_with_words(3);
        let clips = select_fallback_clips(&transcript);
        assert_eq!(clips.len(), 1);
        // First word sits near t=0, so the window start clamps to 00:00.
        assert_eq!(clips[0].start, Some(TimeValue::Clock("00:00".to_string())));
    }

    #[test]
    fn test_caption_comes_from_owning_segment() {
        let transcript = transcript_with_words(3);
        let clips = select_fallback_clips(&transcript);
        assert_eq!(clips[0].caption, "segment 0");
        assert_eq!(clips[0].reason, "Potentially interesting segment");
    }

    #[test]
    fn test_long_captions_are_truncated() {
        let long_text = "x".repeat(140);
        let transcript = Transcript::new(vec![Segment::new(
            0.0,
            2.0,
            long_text,
            vec![Word::new("x", 0.0, 2.0)],
        )]);
        let clips = select_fallback_clips(&transcript);
        assert_eq!(clips[0].caption.chars().count(), 103);
        assert!(clips[0].caption.ends_with("..."));
    }

    #[test]
    fn test_truncate_caption_is_char_safe() {
        let text = "ø".repeat(120);
        let truncated = truncate_caption(&text, 100);
        assert_eq!(truncated.chars().count(), 103);
    }
}
