//! Caption burn-in via generated ASS subtitles.
//!
//! Each caption event becomes one Dialogue line showing a single word,
//! centered in the frame. The generated script is handed to ffmpeg's
//! `ass` filter, which re-encodes the clip with the captions burned in.

use crate::captions::CaptionEvent;
use crate::error::{KlippError, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use super::ffmpeg::probe_dimensions;

/// Fallback play resolution when the source cannot be probed.
const DEFAULT_RESOLUTION: (u32, u32) = (1920, 1080);

/// Visual style for burned-in captions.
#[derive(Debug, Clone)]
pub struct CaptionStyle {
    /// Font family name.
    pub font: String,
    /// Font size in script units.
    pub font_size: u32,
    /// Outline thickness.
    pub outline: u32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            font_size: 96,
            outline: 3,
        }
    }
}

/// Render caption events into an ASS subtitle document.
///
/// One Dialogue line per event; alignment 5 (middle center) places each
/// word in the middle of the frame without positioning overrides.
pub fn build_ass_document(
    events: &[CaptionEvent],
    width: u32,
    height: u32,
    style: &CaptionStyle,
) -> String {
    let mut doc = format!(
        r#"[Script Info]
ScriptType: v4.00+
PlayResX: {width}
PlayResY: {height}
ScaledBorderAndShadow: yes

[V4+ Styles]
Format: Name,Fontname,Fontsize,PrimaryColour,SecondaryColour,OutlineColour,BackColour,Bold,Italic,Underline,StrikeOut,ScaleX,ScaleY,Spacing,Angle,BorderStyle,Outline,Shadow,Alignment,MarginL,MarginR,MarginV,Encoding
Style: Word,{font},{size},&H00FFFFFF,&H00FFFFFF,&H00000000,&H64000000,-1,0,0,0,100,100,0,0,1,{outline},0,5,60,60,0,1

[Events]
Format: Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text
"#,
        width = width,
        height = height,
        font = style.font,
        size = style.font_size,
        outline = style.outline,
    );

    for event in events {
        doc.push_str(&format!(
            "Dialogue: 0,{},{},Word,,0,0,0,,{}\n",
            format_ass_time(event.start),
            format_ass_time(event.end),
            escape_ass_text(&event.text),
        ));
    }

    doc
}

/// Burn caption events into a clip, producing a new video file.
#[instrument(skip_all, fields(input = %input.display(), events = events.len()))]
pub async fn burn_captions(
    input: &Path,
    events: &[CaptionEvent],
    output: &Path,
    style: &CaptionStyle,
) -> Result<()> {
    let (width, height) = match probe_dimensions(input).await {
        Ok(dims) => dims,
        Err(e) => {
            warn!("Could not probe clip dimensions, using default: {}", e);
            DEFAULT_RESOLUTION
        }
    };

    let temp_dir = tempfile::tempdir()?;
    let script_path = temp_dir.path().join("captions.ass");
    std::fs::write(
        &script_path,
        build_ass_document(events, width, height, style),
    )?;

    debug!("Burning {} caption events", events.len());

    let filter = format!("ass={}", script_path.display());

    let result = Command::new("ffmpeg")
        .arg("-i").arg(input)
        .arg("-vf").arg(&filter)
        .arg("-c:v").arg("libx264")
        .arg("-preset").arg("veryfast")
        .arg("-crf").arg("23")
        .arg("-c:a").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(output)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(KlippError::Media(format!("Caption burn-in failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KlippError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(KlippError::Media(format!("ffmpeg error: {e}"))),
    }
}

/// Format seconds as ASS time (`h:mm:ss.cs`).
fn format_ass_time(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    format!(
        "{}:{:02}:{:02}.{:02}",
        centis / 360_000,
        (centis / 6_000) % 60,
        (centis / 100) % 60,
        centis % 100
    )
}

/// Neutralize characters the ASS format treats specially.
fn escape_ass_text(text: &str) -> String {
    text.replace('{', "(")
        .replace('}', ")")
        .replace('\n', " ")
        .trim()
        .to_string()
}
