//! Configuration settings for Klipp.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub download: DownloadSettings,
    pub transcription: TranscriptionSettings,
    pub selection: SelectionSettings,
    pub captions: CaptionSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for cached downloads and intermediate files.
    pub work_dir: String,
    /// Directory where finished clips are written.
    pub output_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            work_dir: "~/.klipp".to_string(),
            output_dir: "./clips".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Video download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// yt-dlp format selector.
    pub format: String,
    /// Maximum media duration to process (in seconds).
    pub max_duration_seconds: u32,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            format: "mp4/bestvideo+bestaudio/best".to_string(),
            max_duration_seconds: 7200, // 2 hours
        }
    }
}

/// Transcription service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whisper model to use.
    pub model: String,
    /// Duration in seconds for splitting long audio files.
    pub chunk_duration_seconds: u32,
    /// Maximum concurrent chunk processing.
    pub max_concurrent_chunks: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            chunk_duration_seconds: 120,
            max_concurrent_chunks: 3,
        }
    }
}

/// Clip selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// LLM model used to pick clips.
    pub model: String,
    /// Minimum number of clips to request from the model.
    pub min_clips: u32,
    /// Maximum number of clips to request from the model.
    pub max_clips: u32,
    /// Shortest acceptable clip duration in seconds.
    pub min_clip_seconds: f64,
    /// Longest acceptable clip duration in seconds.
    pub max_clip_seconds: f64,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            min_clips: 3,
            max_clips: 10,
            min_clip_seconds: 0.0,
            max_clip_seconds: 60.0,
        }
    }
}

/// Caption rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    /// Font family name passed to the subtitle renderer.
    pub font: String,
    /// Font size in subtitle script units.
    pub font_size: u32,
    /// Outline thickness.
    pub outline: u32,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            font_size: 96,
            outline: 3,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::KlippError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("klipp")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded working directory path.
    pub fn work_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.work_dir)
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.selection.min_clips, 3);
        assert_eq!(settings.selection.max_clips, 10);
        assert_eq!(settings.selection.max_clip_seconds, 60.0);
        assert_eq!(settings.transcription.model, "whisper-1");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [selection]
            max_clips = 4
            "#,
        )
        .unwrap();
        assert_eq!(settings.selection.max_clips, 4);
        assert_eq!(settings.selection.min_clips, 3);
        assert_eq!(settings.captions.font, "Arial");
    }

    #[test]
    fn test_round_trips_through_toml() {
        let settings = Settings::default();
        let rendered = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.selection.model, settings.selection.model);
    }
}
