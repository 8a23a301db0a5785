//! OpenAI Whisper transcription implementation.

use super::Transcriber;
use crate::error::{KlippError, Result};
use crate::media::split_audio;
use crate::openai::create_client;
use crate::transcript::{Segment, Transcript, Word};
use async_openai::types::{
    AudioResponseFormat, CreateTranscriptionRequestArgs, TimestampGranularity,
};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    chunk_duration_seconds: u32,
    max_concurrent_chunks: usize,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber with default settings.
    pub fn new(api_key: &str) -> Self {
        Self::with_config(api_key, "whisper-1", 120, 3)
    }

    /// Create a new Whisper transcriber with custom configuration.
    pub fn with_config(
        api_key: &str,
        model: &str,
        chunk_duration_seconds: u32,
        max_concurrent_chunks: usize,
    ) -> Self {
        Self {
            client: create_client(api_key),
            model: model.to_string(),
            chunk_duration_seconds,
            max_concurrent_chunks,
        }
    }

    /// Transcribe a single audio file (no splitting).
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_single(&self, audio_path: &Path) -> Result<Vec<Segment>> {
        debug!("Transcribing audio file");

        let file_bytes = tokio::fs::read(audio_path).await?;

        let request = CreateTranscriptionRequestArgs::default()
            .file(async_openai::types::AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::VerboseJson)
            .timestamp_granularities(vec![
                TimestampGranularity::Segment,
                TimestampGranularity::Word,
            ])
            .build()
            .map_err(|e| KlippError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe_verbose_json(request)
            .await
            .map_err(|e| KlippError::OpenAI(format!("Whisper API error: {}", e)))?;

        let spans: Vec<(f64, f64, String)> = response
            .segments
            .map(|segs| {
                segs.iter()
                    .map(|s| (s.start as f64, s.end as f64, s.text.trim().to_string()))
                    .collect()
            })
            .unwrap_or_else(|| {
                // Fallback: single span covering the full response
                vec![(
                    0.0,
                    response.duration as f64,
                    response.text.trim().to_string(),
                )]
            });

        let words: Vec<Word> = response
            .words
            .map(|ws| {
                ws.iter()
                    .map(|w| Word::new(w.word.trim(), w.start as f64, w.end as f64))
                    .collect()
            })
            .unwrap_or_else(|| {
                warn!("No word-level timestamps returned, approximating from segments");
                approximate_words(&spans)
            });

        let segments = assemble_segments(spans, words);
        debug!("Transcribed {} segments", segments.len());
        Ok(segments)
    }

    /// Transcribe an audio file, splitting if necessary.
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_with_splitting(&self, audio_path: &Path) -> Result<Transcript> {
        let temp_dir = tempfile::tempdir()?;
        let chunks = split_audio(audio_path, temp_dir.path(), self.chunk_duration_seconds).await?;

        if chunks.len() == 1 {
            let segments = self.transcribe_single(audio_path).await?;
            return Ok(Transcript::new(segments));
        }

        let chunk_count = chunks.len();
        info!("Processing {} audio chunks with {}", chunk_count, self.model);

        let pb = Arc::new(ProgressBar::new(chunk_count as u64));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} Whisper   [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap()
                .progress_chars("█▓░"),
        );

        // Process chunks in parallel with concurrency limit, fail fast on error
        let mut results: Vec<(usize, f64, Vec<Segment>)> = Vec::with_capacity(chunk_count);

        let mut stream = stream::iter(chunks.into_iter().enumerate())
            .map(|(idx, (chunk_path, time_offset))| async move {
                let result = self.transcribe_single(&chunk_path).await;
                (idx, time_offset, result)
            })
            .buffer_unordered(self.max_concurrent_chunks);

        while let Some((idx, time_offset, result)) = stream.next().await {
            pb.inc(1);
            match result {
                Ok(segments) => results.push((idx, time_offset, segments)),
                Err(e) => {
                    pb.finish_and_clear();
                    drop(temp_dir);
                    let err_msg = format!("Chunk {} at {:.0}s failed: {}", idx, time_offset, e);
                    return Err(KlippError::Transcription(err_msg));
                }
            }
        }

        pb.finish_and_clear();

        // Sort by chunk index and merge segments
        results.sort_by_key(|(idx, _, _)| *idx);

        let mut all_segments = Vec::new();
        for (_, time_offset, mut segments) in results {
            // Shift both segment and word timings by the chunk's offset
            for segment in &mut segments {
                segment.start += time_offset;
                segment.end += time_offset;
                for word in &mut segment.words {
                    word.start += time_offset;
                    word.end += time_offset;
                }
            }
            all_segments.extend(segments);
        }

        drop(temp_dir);

        Ok(Transcript::new(all_segments))
    }
}

/// Distribute a flat word list into segment spans by start time.
///
/// Whisper reports words globally, not nested per segment. A word belongs
/// to the first span whose end lies past the word's start; words past the
/// last span land in the final segment so none are lost.
fn assemble_segments(spans: Vec<(f64, f64, String)>, words: Vec<Word>) -> Vec<Segment> {
    if spans.is_empty() {
        if words.is_empty() {
            return Vec::new();
        }
        let start = words.first().map(|w| w.start).unwrap_or(0.0);
        let end = words.last().map(|w| w.end).unwrap_or(start);
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        return vec![Segment::new(start, end, text, words)];
    }

    let mut segments: Vec<Segment> = spans
        .into_iter()
        .map(|(start, end, text)| Segment::new(start, end, text, Vec::new()))
        .collect();

    let last = segments.len() - 1;
    let mut cursor = 0;
    for word in words {
        while cursor < last && word.start >= segments[cursor].end {
            cursor += 1;
        }
        segments[cursor].words.push(word);
    }

    segments
}

/// Approximate word timings by spacing words evenly across their segment.
fn approximate_words(spans: &[(f64, f64, String)]) -> Vec<Word> {
    spans
        .iter()
        .flat_map(|(start, end, text)| {
            let tokens: Vec<&str> = text.split_whitespace().collect();
            if tokens.is_empty() {
                return Vec::new();
            }
            let word_duration = (end - start) / tokens.len() as f64;
            tokens
                .into_iter()
                .enumerate()
                .map(|(i, token)| {
                    Word::new(
                        token,
                        start + i as f64 * word_duration,
                        start + (i + 1) as f64 * word_duration,
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        self.transcribe_with_splitting(audio_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_segments_distributes_words() {
        let spans = vec![
            (0.0, 2.0, "hello world".to_string()),
            (2.0, 4.0, "again".to_string()),
        ];
        let words = vec![
            Word::new("hello", 0.1, 0.9),
            Word::new("world", 1.0, 1.9),
            Word::new("again", 2.2, 3.0),
        ];

        let segments = assemble_segments(spans, words);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].words.len(), 2);
        assert_eq!(segments[1].words.len(), 1);
        assert_eq!(segments[1].words[0].text, "again");
    }

    #[test]
    fn test_assemble_segments_keeps_trailing_words() {
        let spans = vec![(0.0, 2.0, "short".to_string())];
        let words = vec![Word::new("short", 0.0, 1.0), Word::new("tail", 2.5, 3.0)];

        let segments = assemble_segments(spans, words);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].words.len(), 2);
    }

    #[test]
    fn test_assemble_segments_without_spans_wraps_words() {
        let words = vec![Word::new("only", 0.5, 1.0), Word::new("words", 1.0, 1.5)];
        let segments = assemble_segments(Vec::new(), words);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "only words");
        assert_eq!(segments[0].start, 0.5);
        assert_eq!(segments[0].end, 1.5);
    }

    #[test]
    fn test_approximate_words_spaces_evenly() {
        let spans = vec![(10.0, 14.0, "one two three four".to_string())];
        let words = approximate_words(&spans);
        assert_eq!(words.len(), 4);
        assert_eq!(words[0].start, 10.0);
        assert_eq!(words[0].end, 11.0);
        assert_eq!(words[3].end, 14.0);
    }

    #[test]
    fn test_approximate_words_empty_segment() {
        let spans = vec![(0.0, 5.0, "   ".to_string())];
        assert!(approximate_words(&spans).is_empty());
    }
}
