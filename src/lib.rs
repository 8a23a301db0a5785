//! Klipp - AI-powered video clipping
//!
//! A CLI tool that cuts captioned short clips out of videos.
//!
//! The name "Klipp" comes from the Norwegian/Scandinavian word for "cut."
//!
//! # Overview
//!
//! Klipp takes a YouTube URL or a local video file and:
//! - Transcribes the speech with word-level timestamps
//! - Asks an LLM to pick the most compelling moments (with a deterministic
//!   fallback when the model is unavailable)
//! - Cuts each selected range into a standalone clip
//! - Burns per-word captions synchronized to the speech
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `media_source` - Video source abstraction (YouTube, local files)
//! - `media` - yt-dlp downloads and ffmpeg processing
//! - `transcript` - Transcript data model and range queries
//! - `transcription` - Speech-to-text transcription
//! - `selection` - Clip candidate finding, parsing, and validation
//! - `captions` - Word-level caption scheduling
//! - `pipeline` - End-to-end coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use klipp::config::Settings;
//! use klipp::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::new(settings, Some("sk-...".to_string()))?;
//!
//!     let result = pipeline
//!         .run("dQw4w9WgXcQ", "the most surprising moments")
//!         .await?;
//!     println!("Produced {} clips", result.clips.len());
//!
//!     Ok(())
//! }
//! ```

pub mod captions;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod media_source;
pub mod openai;
pub mod pipeline;
pub mod selection;
pub mod transcript;
pub mod transcription;

pub use error::{KlippError, Result};
