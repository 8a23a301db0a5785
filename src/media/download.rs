//! Video download via yt-dlp.

use crate::error::{KlippError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

/// Downloads a video from a URL into the working directory.
///
/// Uses yt-dlp with the given format selector. If a file for this video ID
/// already exists, it is returned without re-downloading.
#[instrument(skip(output_dir, format), fields(video_id = %video_id))]
pub async fn download_video(
    url: &str,
    video_id: &str,
    format: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    if let Ok(existing) = find_video_file(output_dir, video_id) {
        info!("Using cached video file {}", existing.display());
        return Ok(existing);
    }

    info!("Downloading video from {}", url);

    let template = output_dir.join(format!("{}.%(ext)s", video_id));

    let result = Command::new("yt-dlp")
        .arg("--format").arg(format)
        .arg("--output").arg(template.to_str().unwrap_or_default())
        .arg("--no-playlist")
        .arg("--quiet")
        .arg("--no-warnings")
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(KlippError::ToolNotFound("yt-dlp".into()));
        }
        Err(e) => {
            return Err(KlippError::Download(format!("yt-dlp execution failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(KlippError::Download(format!("yt-dlp failed: {stderr}")));
    }

    find_video_file(output_dir, video_id)
}

/// Locates a downloaded video file by video ID.
fn find_video_file(dir: &Path, video_id: &str) -> Result<PathBuf> {
    // Common container formats that yt-dlp may produce
    for ext in &["mp4", "mkv", "webm", "mov"] {
        let candidate = dir.join(format!("{}.{}", video_id, ext));
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(KlippError::Download(
        "Video file not found after download".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_video_file_picks_known_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc123.webm");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(find_video_file(dir.path(), "abc123").unwrap(), path);
    }

    #[test]
    fn test_find_video_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_video_file(dir.path(), "nothing").is_err());
    }
}
