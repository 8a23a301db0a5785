//! Speech transcription for Klipp.
//!
//! Produces the [`Transcript`](crate::transcript::Transcript) that every
//! downstream stage reads. The default implementation calls the OpenAI
//! Whisper API with both segment- and word-level timestamps.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use crate::transcript::Transcript;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into timed segments and words.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}
