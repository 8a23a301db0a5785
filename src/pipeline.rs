//! End-to-end clip pipeline.
//!
//! Coordinates the whole run: resolve the source, download the video,
//! extract audio, transcribe, select clip candidates, validate them, then
//! cut and caption each accepted clip. The transcript is built once and
//! read-only from there; each clip is produced independently, and a
//! failure while producing one clip never aborts the others.

use crate::captions::synchronize;
use crate::config::{Prompts, Settings};
use crate::error::{KlippError, Result};
use crate::media::{burn_captions, caption_slug, cut_clip, download_video, extract_audio, CaptionStyle};
use crate::media_source::{parse_input, MediaMetadata, SourceType};
use crate::selection::{validate_candidate, Clip, ClipFinder, DurationBand};
use crate::transcript::Transcript;
use crate::transcription::{Transcriber, WhisperTranscriber};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The main pipeline for turning one video into captioned clips.
pub struct Pipeline {
    settings: Settings,
    transcriber: Arc<dyn Transcriber>,
    finder: ClipFinder,
    work_dir: PathBuf,
    output_dir: PathBuf,
}

impl Pipeline {
    /// Create a pipeline from settings and an explicit API credential.
    ///
    /// The credential is required for transcription; clip selection will
    /// additionally survive without one by using the fallback selector.
    pub fn new(settings: Settings, api_key: Option<String>) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let key = api_key.ok_or_else(|| {
            KlippError::Config(
                "An OpenAI API key is required for transcription. \
                 Pass --api-key or set OPENAI_API_KEY."
                    .to_string(),
            )
        })?;

        let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperTranscriber::with_config(
            &key,
            &settings.transcription.model,
            settings.transcription.chunk_duration_seconds,
            settings.transcription.max_concurrent_chunks,
        ));

        let finder = ClipFinder::new(Some(key.as_str()), &settings.selection.model)
            .with_prompts(prompts)
            .with_duration_band(duration_band(&settings));

        Self::with_components(settings, transcriber, finder)
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        settings: Settings,
        transcriber: Arc<dyn Transcriber>,
        finder: ClipFinder,
    ) -> Result<Self> {
        let work_dir = settings.work_dir();
        let output_dir = settings.output_dir();
        std::fs::create_dir_all(&work_dir)?;

        Ok(Self {
            settings,
            transcriber,
            finder,
            work_dir,
            output_dir,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Process one video: download, transcribe, select, cut, caption.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn run(&self, input: &str, intent: &str) -> Result<RunResult> {
        let (source, media_id) = parse_input(input)
            .ok_or_else(|| KlippError::InvalidInput(format!("Could not parse input: {}", input)))?;

        info!("Fetching metadata for {}", media_id);
        eprintln!("  Fetching metadata...");
        let metadata = source.fetch_media(&media_id).await?;
        eprintln!("  Title: {}", metadata.title);

        if let Some(duration) = metadata.duration_seconds {
            let mins = duration / 60;
            let secs = duration % 60;
            eprintln!("  Duration: {}:{:02}", mins, secs);
            if duration > self.settings.download.max_duration_seconds {
                return Err(KlippError::InvalidInput(format!(
                    "Media duration ({} seconds) exceeds maximum ({} seconds)",
                    duration, self.settings.download.max_duration_seconds
                )));
            }
        }

        let video_path = self.obtain_video(&metadata).await?;

        info!("Extracting audio from {}", video_path.display());
        eprintln!("  Extracting audio...");
        let audio_path = extract_audio(&video_path, &self.work_dir).await?;

        info!("Transcribing audio...");
        eprintln!("  Transcribing...");
        let transcript = self.transcriber.transcribe(&audio_path).await?;
        eprintln!(
            "  Transcription complete ({} segments, {} words)",
            transcript.segments.len(),
            transcript.word_count()
        );

        eprintln!("  Selecting clips...");
        let candidates = self
            .finder
            .find_clips(
                intent,
                &transcript,
                self.settings.selection.min_clips,
                self.settings.selection.max_clips,
            )
            .await;

        let band = duration_band(&self.settings);
        let clips: Vec<Clip> = candidates
            .iter()
            .filter_map(|raw| match validate_candidate(raw, &transcript, &band) {
                Ok(clip) => Some(clip),
                Err(e) => {
                    warn!("Dropping clip candidate: {}", e);
                    None
                }
            })
            .collect();

        eprintln!(
            "  {} candidate(s), {} validated",
            candidates.len(),
            clips.len()
        );

        std::fs::create_dir_all(&self.output_dir)?;

        let mut outputs = Vec::new();
        let mut failures = Vec::new();

        for (idx, clip) in clips.iter().enumerate() {
            eprintln!(
                "  Producing clip {}/{} [{:.0}s - {:.0}s]...",
                idx + 1,
                clips.len(),
                clip.start,
                clip.end
            );
            match self.produce_clip(&video_path, idx, clip, &transcript).await {
                Ok(output) => outputs.push(output),
                Err(e) => {
                    warn!("Clip {} failed: {}", idx + 1, e);
                    failures.push(ClipFailure {
                        clip: clip.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        // Keep the downloaded video cached, drop the intermediate audio
        if let Err(e) = std::fs::remove_file(&audio_path) {
            warn!("Failed to clean up audio file: {}", e);
        }

        Ok(RunResult {
            media_id: metadata.id,
            title: metadata.title,
            clips: outputs,
            failures,
        })
    }

    /// Resolve the source video to a local file, downloading if remote.
    async fn obtain_video(&self, metadata: &MediaMetadata) -> Result<PathBuf> {
        match metadata.source_type {
            SourceType::Local => Ok(PathBuf::from(&metadata.source_url)),
            SourceType::YouTube => {
                info!("Downloading video: {}", metadata.title);
                eprintln!("  Downloading video...");
                download_video(
                    &metadata.source_url,
                    &metadata.id,
                    &self.settings.download.format,
                    &self.work_dir,
                )
                .await
            }
        }
    }

    /// Cut one clip and burn its captions.
    async fn produce_clip(
        &self,
        video_path: &PathBuf,
        idx: usize,
        clip: &Clip,
        transcript: &Transcript,
    ) -> Result<ClipOutput> {
        let slug = caption_slug(&clip.caption, 40);
        let file_name = format!(
            "{:02}_{}s-{}s_{}.mp4",
            idx + 1,
            clip.start.trunc() as u64,
            clip.end.trunc() as u64,
            slug
        );
        let final_path = self.output_dir.join(file_name);

        let cut_path = self.work_dir.join(format!("cut_{:02}.mp4", idx + 1));
        cut_clip(video_path, &cut_path, clip.start, clip.end).await?;

        let events = synchronize(clip, transcript);

        if events.is_empty() {
            // Nothing to burn: the cut is the final clip
            std::fs::rename(&cut_path, &final_path)?;
        } else {
            let style = CaptionStyle {
                font: self.settings.captions.font.clone(),
                font_size: self.settings.captions.font_size,
                outline: self.settings.captions.outline,
            };
            let burn_result = burn_captions(&cut_path, &events, &final_path, &style).await;
            let _ = std::fs::remove_file(&cut_path);
            burn_result?;
        }

        Ok(ClipOutput {
            clip: clip.clone(),
            path: final_path,
            caption_count: events.len(),
        })
    }
}

/// Duration band from settings.
fn duration_band(settings: &Settings) -> DurationBand {
    DurationBand {
        min_seconds: settings.selection.min_clip_seconds,
        max_seconds: settings.selection.max_clip_seconds,
    }
}

/// One successfully produced clip.
#[derive(Debug)]
pub struct ClipOutput {
    /// The validated clip this file was cut from.
    pub clip: Clip,
    /// Where the finished clip was written.
    pub path: PathBuf,
    /// Number of caption events burned in.
    pub caption_count: usize,
}

/// One clip that could not be produced.
#[derive(Debug)]
pub struct ClipFailure {
    pub clip: Clip,
    pub error: String,
}

/// Result of processing one video.
#[derive(Debug)]
pub struct RunResult {
    /// Media ID.
    pub media_id: String,
    /// Title.
    pub title: String,
    /// Clips written to the output directory.
    pub clips: Vec<ClipOutput>,
    /// Clips that failed during cutting or captioning.
    pub failures: Vec<ClipFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_band_reflects_settings() {
        let mut settings = Settings::default();
        settings.selection.max_clip_seconds = 45.0;
        let band = duration_band(&settings);
        assert_eq!(band.min_seconds, 0.0);
        assert_eq!(band.max_seconds, 45.0);
    }

    #[test]
    fn test_pipeline_requires_credential() {
        let result = Pipeline::new(Settings::default(), None);
        assert!(matches!(result, Err(KlippError::Config(_))));
    }
}
