//! `mm:ss` clock text conversion.
//!
//! Clip boundaries travel through prompts and model responses as `mm:ss`
//! strings. Parsing is strict (exactly two integer parts); formatting
//! truncates to whole seconds. The minutes field grows past two digits for
//! long videos rather than switching to an hours notation, so a formatted
//! value always parses back to its integer-second truncation.

use thiserror::Error;

/// Error for clock text that is not `mm:ss`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    #[error("malformed time '{0}': expected mm:ss")]
    Malformed(String),
}

/// Parse `mm:ss` clock text into seconds.
///
/// Requires exactly two colon-separated integer parts. Anything else
/// (wrong separator count, non-numeric parts, empty input) is rejected.
pub fn parse_clock(text: &str) -> Result<f64, TimecodeError> {
    let mut parts = text.split(':');

    let (minutes, seconds) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(s), None) => (m.trim(), s.trim()),
        _ => return Err(TimecodeError::Malformed(text.to_string())),
    };

    let minutes: u64 = minutes
        .parse()
        .map_err(|_| TimecodeError::Malformed(text.to_string()))?;
    let seconds: u64 = seconds
        .parse()
        .map_err(|_| TimecodeError::Malformed(text.to_string()))?;

    Ok((minutes * 60 + seconds) as f64)
}

/// Format seconds as zero-padded `mm:ss`, truncating sub-second precision.
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0).trunc() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("00:00").unwrap(), 0.0);
        assert_eq!(parse_clock("01:05").unwrap(), 65.0);
        assert_eq!(parse_clock("05:30").unwrap(), 330.0);
        assert_eq!(parse_clock("99:59").unwrap(), 5999.0);
        // Minutes beyond two digits are accepted.
        assert_eq!(parse_clock("100:00").unwrap(), 6000.0);
    }

    #[test]
    fn test_parse_clock_rejects_malformed() {
        for input in ["", "90", "1:2:3", "mm:ss", "01-05", "1.5:00", ":30"] {
            assert!(
                matches!(parse_clock(input), Err(TimecodeError::Malformed(_))),
                "expected rejection for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(65.0), "01:05");
        assert_eq!(format_clock(65.9), "01:05");
        assert_eq!(format_clock(3599.0), "59:59");
        // Long videos keep the mm:ss shape.
        assert_eq!(format_clock(6543.0), "109:03");
    }

    #[test]
    fn test_round_trip_recovers_truncated_seconds() {
        for s in [0.0, 1.0, 59.0, 60.0, 61.4, 3599.9, 5999.0, 6000.0, 12345.6] {
            assert_eq!(parse_clock(&format_clock(s)).unwrap(), s.trunc());
        }
    }
}
