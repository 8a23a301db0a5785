//! Parsing of model responses into clip candidates.
//!
//! Three strategies are tried in order, first non-empty result wins:
//!
//! 1. **Structured**: decode the `{...}` span of the response as the
//!    requested JSON shape.
//! 2. **Labeled fields**: scrape `start:`/`end:`/`reason:`/`caption:`
//!    labels out of free text. Starts and ends are paired by order of
//!    appearance, not by proximity; that pairing is part of this
//!    strategy's contract and is kept isolated here so a smarter
//!    per-block extraction could replace it without touching callers.
//! 3. **Deterministic fallback** on the transcript, discarding the
//!    response entirely.

use super::{fallback::select_fallback_clips, ClipCandidate, TimeValue, DEFAULT_CAPTION, DEFAULT_REASON};
use crate::transcript::Transcript;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

/// The JSON envelope the prompt asks the model to produce.
#[derive(Debug, Deserialize)]
struct ClipsEnvelope {
    clips: Vec<ClipCandidate>,
}

/// Parser for language-model clip responses.
pub struct ResponseParser {
    start_re: Regex,
    end_re: Regex,
    reason_re: Regex,
    caption_re: Regex,
    label_boundary_re: Regex,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            start_re: Regex::new(r"(?i)start(?:\s+time)?:\s*(\d+:\d+)").expect("Invalid regex"),
            end_re: Regex::new(r"(?i)end(?:\s+time)?:\s*(\d+:\d+)").expect("Invalid regex"),
            reason_re: Regex::new(r"(?i)reason:[ \t]*").expect("Invalid regex"),
            caption_re: Regex::new(r"(?i)caption:[ \t]*").expect("Invalid regex"),
            label_boundary_re: Regex::new(r"(?i)\n\s*(?:caption|reason|start|end|clip|\d+\.)")
                .expect("Invalid regex"),
        }
    }

    /// Parse a response into candidates, falling back to the deterministic
    /// selector when nothing usable can be extracted from the text.
    pub fn parse(&self, response: &str, transcript: &Transcript) -> Vec<ClipCandidate> {
        if let Some(clips) = self.extract_structured(response) {
            debug!("Parsed {} clips from structured response", clips.len());
            return clips;
        }

        if let Some(clips) = self.extract_labeled_fields(response) {
            debug!("Extracted {} clips from labeled fields", clips.len());
            return clips;
        }

        debug!("Response unusable, selecting fallback clips");
        select_fallback_clips(transcript)
    }

    /// Strategy 1: decode the first-`{`-to-last-`}` span as JSON.
    ///
    /// This is a bounded span grab, not a balanced-brace scan; a garbled or
    /// partial JSON body simply fails to decode and falls through.
    fn extract_structured(&self, response: &str) -> Option<Vec<ClipCandidate>> {
        let start = response.find('{')?;
        let end = response.rfind('}')?;
        if end <= start {
            return None;
        }

        let envelope: ClipsEnvelope = serde_json::from_str(&response[start..=end]).ok()?;
        if envelope.clips.is_empty() {
            None
        } else {
            Some(envelope.clips)
        }
    }

    /// Strategy 2: scrape labeled fields out of free text.
    ///
    /// The i-th start is paired with the i-th end by textual order.
    /// Reason/caption bodies run from their label to the next label line;
    /// when their counts don't line up with the time pairs, placeholders
    /// fill the gap.
    fn extract_labeled_fields(&self, response: &str) -> Option<Vec<ClipCandidate>> {
        let starts: Vec<String> = self
            .start_re
            .captures_iter(response)
            .map(|c| c[1].to_string())
            .collect();
        let ends: Vec<String> = self
            .end_re
            .captures_iter(response)
            .map(|c| c[1].to_string())
            .collect();

        let count = starts.len().min(ends.len());
        if count == 0 {
            return None;
        }

        let reasons = self.label_bodies(response, &self.reason_re);
        let captions = self.label_bodies(response, &self.caption_re);

        let clips = (0..count)
            .map(|i| ClipCandidate {
                start: Some(TimeValue::Clock(starts[i].clone())),
                end: Some(TimeValue::Clock(ends[i].clone())),
                reason: reasons
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_REASON.to_string()),
                caption: captions
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_CAPTION.to_string()),
            })
            .collect();

        Some(clips)
    }

    /// Collect the text following each `label:` up to the next label line.
    fn label_bodies(&self, response: &str, label_re: &Regex) -> Vec<String> {
        label_re
            .find_iter(response)
            .map(|m| {
                let body_start = m.end();
                let body_end = self
                    .label_boundary_re
                    .find_at(response, body_start)
                    .map(|b| b.start())
                    .unwrap_or(response.len());
                response[body_start..body_end].trim().to_string()
            })
            .filter(|body| !body.is_empty())
            .collect()
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Segment, Word};

    fn empty_transcript() -> Transcript {
        Transcript::new(vec![])
    }

    fn small_transcript() -> Transcript {
        let words: Vec<Word> = (0..12)
            .map(|i| Word::new(format!("w{}", i), i as f64 * 5.0, i as f64 * 5.0 + 4.0))
            .collect();
        Transcript::new(vec![Segment::new(0.0, 60.0, "all the talk", words)])
    }

    #[test]
    fn test_structured_response() {
        let parser = ResponseParser::new();
        let response = r#"Here are your clips:
{
  "clips": [
    {"start": "00:10", "end": "00:40", "reason": "good bit", "caption": "wow"},
    {"start": "01:00", "end": "01:30", "reason": "another", "caption": "neat"}
  ]
}
Enjoy!"#;

        let clips = parser.parse(response, &empty_transcript());
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0].caption, "wow");
        assert_eq!(clips[1].start, Some(TimeValue::Clock("01:00".to_string())));
    }

    #[test]
    fn test_structured_with_markdown_fences() {
        let parser = ResponseParser::new();
        let response = "```json\n{\"clips\": [{\"start\": \"00:05\", \"end\": \"00:25\", \"reason\": \"r\", \"caption\": \"c\"}]}\n```";
        let clips = parser.parse(response, &empty_transcript());
        assert_eq!(clips.len(), 1);
    }

    #[test]
    fn test_garbled_json_falls_through_to_labels() {
        let parser = ResponseParser::new();
        let response = "{\"clips\": [ oops\n\nStart: 00:10\nEnd: 00:30\nReason: recovered anyway\nCaption: still works\n";
        let clips = parser.parse(response, &empty_transcript());
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].reason, "recovered anyway");
        assert_eq!(clips[0].caption, "still works");
    }

    #[test]
    fn test_labeled_fields_pair_by_order() {
        let parser = ResponseParser::new();
        let response = "Clip 1:\nStart: 00:10\nEnd: 00:30\n\nClip 2:\nStart time: 02:00\nEnd time: 02:45\n";
        let clips = parser.extract_labeled_fields(response).unwrap();
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0].start, Some(TimeValue::Clock("00:10".to_string())));
        assert_eq!(clips[1].end, Some(TimeValue::Clock("02:45".to_string())));
        // No reasons or captions in the text: placeholders fill in.
        assert_eq!(clips[0].reason, DEFAULT_REASON);
        assert_eq!(clips[1].caption, DEFAULT_CAPTION);
    }

    #[test]
    fn test_labeled_fields_mismatched_counts() {
        let parser = ResponseParser::new();
        let response = "Start: 00:10\nEnd: 00:30\nStart: 01:00\n";
        let clips = parser.extract_labeled_fields(response).unwrap();
        // Only one complete start/end pair.
        assert_eq!(clips.len(), 1);
    }

    #[test]
    fn test_unusable_response_falls_back_deterministically() {
        let parser = ResponseParser::new();
        let transcript = small_transcript();
        let clips = parser.parse("I could not find anything noteworthy.", &transcript);
        assert_eq!(clips, select_fallback_clips(&transcript));
        assert!(!clips.is_empty());
    }

    #[test]
    fn test_unusable_response_with_empty_transcript() {
        let parser = ResponseParser::new();
        let clips = parser.parse("nothing here", &empty_transcript());
        assert!(clips.is_empty());
    }

    #[test]
    fn test_empty_clips_array_falls_through() {
        let parser = ResponseParser::new();
        let transcript = small_transcript();
        let clips = parser.parse(r#"{"clips": []}"#, &transcript);
        assert_eq!(clips, select_fallback_clips(&transcript));
    }
}
