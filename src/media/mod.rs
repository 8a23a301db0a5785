//! External media tooling: yt-dlp downloads and ffmpeg processing.

mod captions;
mod download;
mod ffmpeg;

pub use captions::{build_ass_document, burn_captions, CaptionStyle};
pub use download::download_video;
pub use ffmpeg::{cut_clip, extract_audio, probe_dimensions, probe_duration, split_audio};

/// Reduce caption text to a filesystem-safe slug.
///
/// Keeps ASCII alphanumerics (lowercased), folds everything else into
/// underscores, and caps the length. Falls back to "clip" when nothing
/// survives.
pub fn caption_slug(caption: &str, max_chars: usize) -> String {
    let mut slug = String::with_capacity(max_chars);
    let mut last_was_separator = true;

    for c in caption.trim().chars() {
        if slug.len() >= max_chars {
            break;
        }
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator {
            slug.push('_');
            last_was_separator = true;
        }
    }

    let slug = slug.trim_matches('_').to_string();
    if slug.is_empty() {
        "clip".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_slug_basic() {
        assert_eq!(caption_slug("Check out this moment!", 40), "check_out_this_moment");
    }

    #[test]
    fn test_caption_slug_collapses_separators() {
        assert_eq!(caption_slug("wow -- really??  yes", 40), "wow_really_yes");
    }

    #[test]
    fn test_caption_slug_caps_length() {
        let slug = caption_slug(&"word ".repeat(30), 20);
        assert!(slug.len() <= 20);
    }

    #[test]
    fn test_caption_slug_empty_falls_back() {
        assert_eq!(caption_slug("!!!", 40), "clip");
        assert_eq!(caption_slug("", 40), "clip");
    }

    #[test]
    fn test_caption_slug_drops_non_ascii() {
        assert_eq!(caption_slug("héllo wörld", 40), "h_llo_w_rld");
    }
}
