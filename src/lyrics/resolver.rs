//! Mapping a playback position onto the lyric timeline.
//!
//! Everything here is called on every clock tick, so it stays allocation-free
//! and takes the timeline as a parameter instead of holding it.

use super::model::LyricLine;

/// How far ahead of the clock a line becomes active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookahead {
    /// Seconds added to the clock once past `grace_period`.
    pub tolerance: f64,
    /// Seconds from track start during which no lookahead applies, so the
    /// first line is never skipped.
    pub grace_period: f64,
}

impl Default for Lookahead {
    fn default() -> Self {
        Self {
            tolerance: 0.25,
            grace_period: 1.0,
        }
    }
}

impl Lookahead {
    pub const NONE: Lookahead = Lookahead {
        tolerance: 0.0,
        grace_period: 0.0,
    };

    /// The time actually compared against line timestamps
    pub fn effective_time(&self, current_time: f64) -> f64 {
        if current_time < self.grace_period {
            current_time
        } else {
            current_time + self.tolerance.max(0.0)
        }
    }
}

/// Index of the last line starting at or before `current_time` (plus lookahead).
///
/// `None` before the first line, for an empty timeline, for untimed lines and
/// for a NaN clock.
pub fn find_active_index(
    lines: &[LyricLine],
    current_time: f64,
    lookahead: &Lookahead,
) -> Option<usize> {
    if !lines.first().is_some_and(LyricLine::is_timed) {
        return None;
    }

    let target = lookahead.effective_time(current_time);
    let count = lines.partition_point(|line| line.time <= target);
    count.checked_sub(1)
}

/// Whether the timeline carries any timing a highlight can rely on
pub fn has_timed_lines(lines: &[LyricLine]) -> bool {
    lines.iter().any(LyricLine::is_timed)
}

/// First line that will start within `window` seconds of `current_time`.
///
/// Lets a view start scrolling slightly before the line is highlighted.
pub fn scroll_target(lines: &[LyricLine], current_time: f64, window: f64) -> Option<usize> {
    if !has_timed_lines(lines) {
        return None;
    }

    let horizon = current_time + window.max(0.0);
    let start = lines.partition_point(|line| line.time <= current_time);
    lines
        .get(start)
        .filter(|line| line.time <= horizon)
        .map(|_| start)
}
