//! Timestamp tags and clock strings
//!
//! A tag is `[mm:ss.xx]` or `[mm:ss.xxx]` (and the `<...>` karaoke form when
//! embedded in text). Minutes take 1-2 digits, seconds 1-2 digits below 60,
//! and the fraction is hundredths with 2 digits or thousandths with 3.
//! Inline tags are removed with any 1-3 digit fraction, since they only mark
//! karaoke progress and never become cue points.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static LEADING_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([0-9]{1,2}):([0-9]{1,2})\.([0-9]{2,3})\]")
        .expect("Failed to compile LEADING_TAG")
});

static INLINE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[([0-9]{1,2}):([0-9]{1,2})\.[0-9]{1,3}\]|<([0-9]{1,2}):([0-9]{1,2})\.[0-9]{1,3}>",
    )
    .expect("Failed to compile INLINE_TAG")
});

/// Convert tag fields to seconds. `None` when seconds are out of range.
fn tag_seconds(minutes: &str, seconds: &str, fraction: &str) -> Option<f64> {
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    let scale: u64 = match fraction.len() {
        2 => 100,
        3 => 1000,
        _ => return None,
    };
    let fraction: u64 = fraction.parse().ok()?;

    // One division keeps `[00:12.34]` equal to the literal 12.34.
    let ticks = (minutes * 60 + seconds) * scale + fraction;
    Some(ticks as f64 / scale as f64)
}

/// An inline tag only needs seconds below 60 to be stripped.
fn is_inline_tag(caps: &Captures) -> bool {
    caps.get(2)
        .or_else(|| caps.get(4))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .is_some_and(|seconds| seconds < 60)
}

/// Split one valid timestamp tag off the start of `line`.
///
/// Returns the tag's time in seconds and the rest of the line.
pub fn take_leading_tag(line: &str) -> Option<(f64, &str)> {
    let caps = LEADING_TAG.captures(line)?;
    let time = tag_seconds(caps.get(1)?.as_str(), caps.get(2)?.as_str(), caps.get(3)?.as_str())?;
    let end = caps.get(0)?.end();
    Some((time, &line[end..]))
}

/// Remove every well-formed inline tag (bracket or angle form) from `text`.
///
/// Malformed tags stay as literal text. Runs until nothing changes, so
/// removing one tag can never leave another one behind.
pub fn strip_inline_tags(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let stripped = INLINE_TAG
            .replace_all(&current, |caps: &Captures| {
                if is_inline_tag(caps) {
                    String::new()
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned();
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

/// Render seconds as an LRC tag, using milliseconds only when needed.
pub fn format_tag(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let minutes = total_ms / 60_000;
    let secs = (total_ms / 1000) % 60;
    let ms = total_ms % 1000;
    if ms % 10 == 0 {
        format!("[{:02}:{:02}.{:02}]", minutes, secs, ms / 10)
    } else {
        format!("[{:02}:{:02}.{:03}]", minutes, secs, ms)
    }
}

/// Format seconds as `m:ss` for display
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let rem = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, rem)
}

/// Parse `m:ss` or `m:ss.fff` into seconds
pub fn parse_clock(s: &str) -> Option<f64> {
    let (minutes, seconds) = s.trim().split_once(':')?;
    if seconds.contains(':') {
        return None;
    }
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(minutes as f64 * 60.0 + seconds)
}
