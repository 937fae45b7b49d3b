//! Shared utility functions.

use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write as _};
use std::time::{Duration, Instant};

/// Formats a timestamp with a strftime pattern.
///
/// An invalid pattern yields an empty string rather than a panic.
pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(pattern)).is_err() {
        out.clear();
    }
    out
}

/// Shows the first `visible` characters of a secret followed by an ellipsis.
pub fn mask_secret(secret: &str, visible: usize) -> String {
    let prefix: String = secret.chars().take(visible).collect();
    format!("{prefix}...")
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Runs `fut` and returns its output together with the wall time it took.
pub async fn timed<F: std::future::Future>(fut: F) -> (F::Output, Duration) {
    let start = Instant::now();
    let output = fut.await;
    (output, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 14, 7, 35, 43).unwrap();
        assert_eq!(format_timestamp(&timestamp, "%H:%M %d.%m.%Y"), "07:35 14.05.2024");

        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 5, 14, 10, 0, 0).unwrap();
        assert_eq!(format_timestamp(&local, "%Y-%m-%d %H:%M"), "2024-05-14 10:00");
    }

    #[test]
    fn test_format_timestamp_invalid_pattern() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&timestamp, "%Q"), "");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("MTIzNDU2.abc.def", 5), "MTIzN...");
        assert_eq!(mask_secret("abc", 5), "abc...");
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv(" alice, bob ,,carol "), vec!["alice", "bob", "carol"]);
        assert!(split_csv("").is_empty());
        assert!(split_csv(" , ").is_empty());
    }

    #[tokio::test]
    async fn test_timed() {
        let (value, elapsed) = timed(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            7
        })
        .await;
        assert_eq!(value, 7);
        assert!(elapsed >= Duration::from_millis(10));
    }
}
