//! ffmpeg/ffprobe operations: audio extraction, audio splitting, probing,
//! and clip cutting.

use crate::error::{KlippError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Extracts the audio track of a video as MP3.
///
/// If the target file already exists it is returned without re-extracting.
#[instrument(skip_all, fields(video = %video_path.display()))]
pub async fn extract_audio(video_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let stem = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");
    let audio_path = output_dir.join(format!("{}.mp3", stem));

    if audio_path.exists() {
        info!("Using cached audio file");
        return Ok(audio_path);
    }

    debug!("Extracting audio to {}", audio_path.display());

    let result = Command::new("ffmpeg")
        .arg("-i").arg(video_path)
        .arg("-vn")
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(&audio_path)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(audio_path),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(KlippError::Media(format!("Audio extraction failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KlippError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(KlippError::Media(format!("ffmpeg error: {e}"))),
    }
}

/// Segments a long audio file into smaller chunks for processing.
///
/// Each chunk will be approximately `chunk_seconds` long. Returns tuples of
/// (chunk_path, offset_seconds) for each segment.
#[instrument(skip_all)]
pub async fn split_audio(
    source: &Path,
    output_dir: &Path,
    chunk_seconds: u32,
) -> Result<Vec<(PathBuf, f64)>> {
    std::fs::create_dir_all(output_dir)?;

    let total_duration = probe_duration(source).await?;
    info!("Total audio duration: {:.1}s", total_duration);

    let chunk_len = chunk_seconds as f64;

    // Short audio doesn't need splitting
    if total_duration <= chunk_len {
        return Ok(vec![(source.to_path_buf(), 0.0)]);
    }

    let base_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");

    let mut segments = Vec::new();
    let mut offset = 0.0;
    let mut idx = 0u32;

    while offset < total_duration {
        let segment_path = output_dir.join(format!("{}_{:04}.mp3", base_name, idx));
        let segment_len = chunk_len.min(total_duration - offset);

        extract_time_range(source, &segment_path, offset, segment_len).await?;

        debug!("Created segment {} at offset {:.1}s", idx, offset);
        segments.push((segment_path, offset));

        offset += chunk_len;
        idx += 1;
    }

    info!("Created {} audio segments", segments.len());
    Ok(segments)
}

/// Cuts the `[start, end]` range of a video into a standalone file.
///
/// Tries a stream copy first (fast, no quality loss) and falls back to
/// re-encoding when the container refuses to cut on a keyframe boundary.
#[instrument(skip_all, fields(start = start, end = end))]
pub async fn cut_clip(source: &Path, dest: &Path, start: f64, end: f64) -> Result<()> {
    let length = end - start;

    let copy_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("warning")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    if let Ok(status) = copy_result {
        if status.success() && dest.exists() {
            return Ok(());
        }
    }

    warn!("Stream copy failed, re-encoding clip");

    let encode_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-c:v").arg("libx264")
        .arg("-preset").arg("veryfast")
        .arg("-crf").arg("23")
        .arg("-c:a").arg("aac")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match encode_result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(KlippError::Media(format!("Clip cut failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KlippError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(KlippError::Media(format!("ffmpeg error: {e}"))),
    }
}

/// Extracts a time segment from an audio file.
async fn extract_time_range(source: &Path, dest: &Path, start: f64, length: f64) -> Result<()> {
    let result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(KlippError::Media(format!("Audio split failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KlippError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(KlippError::Media(format!("ffmpeg error: {e}"))),
    }
}

/// Queries the duration of a media file using ffprobe with JSON output.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let parsed = probe_json(path, &["-show_format"]).await?;

    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| KlippError::Media("Could not determine media duration".into()))
}

/// Queries the pixel dimensions of a video's first video stream.
pub async fn probe_dimensions(path: &Path) -> Result<(u32, u32)> {
    let parsed = probe_json(path, &["-show_streams", "-select_streams", "v:0"]).await?;

    let stream = parsed["streams"]
        .get(0)
        .ok_or_else(|| KlippError::Media("No video stream found".into()))?;

    match (stream["width"].as_u64(), stream["height"].as_u64()) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Ok((w as u32, h as u32)),
        _ => Err(KlippError::Media(
            "Could not determine video dimensions".into(),
        )),
    }
}

async fn probe_json(path: &Path, args: &[&str]) -> Result<serde_json::Value> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .args(args)
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(KlippError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(KlippError::Media(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(KlippError::Media("ffprobe returned error".into()));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&json_str)
        .map_err(|_| KlippError::Media("Invalid ffprobe output".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_missing_file_errors() {
        let result = probe_duration(Path::new("/no/such/file.mp4")).await;
        assert!(result.is_err());
    }
}
