//! Following a playback clock across the lyric timeline
//!
//! The clock stands in for the audio engine's time updates. The follower keeps
//! the last active index so consumers only hear about changes, and the
//! timeline can be swapped at any time through a watch channel.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};

use crate::lyrics::{Lookahead, LyricLine, find_active_index, has_timed_lines, scroll_target};

/// Track position derived from wall time
#[derive(Debug, Clone, Copy)]
pub struct PlaybackClock {
    origin: Instant,
    start: f64,
    rate: f64,
}

impl PlaybackClock {
    /// Start counting from `position` seconds, advancing `rate` track seconds per second.
    pub fn start_at(position: f64, rate: f64) -> Self {
        Self {
            origin: Instant::now(),
            start: position.max(0.0),
            rate: rate.max(0.0),
        }
    }

    pub fn position(&self) -> f64 {
        self.position_at(Instant::now())
    }

    pub fn position_at(&self, now: Instant) -> f64 {
        self.start + now.saturating_duration_since(self.origin).as_secs_f64() * self.rate
    }
}

/// The active line moved
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
    /// Clock position that caused the change
    pub time: f64,
}

#[derive(Debug, Clone)]
pub struct LyricFollower {
    lines: Arc<[LyricLine]>,
    lookahead: Lookahead,
    scroll_window: f64,
    active: Option<usize>,
}

impl LyricFollower {
    pub fn new(lines: Arc<[LyricLine]>, lookahead: Lookahead, scroll_window: f64) -> Self {
        Self {
            lines,
            lookahead,
            scroll_window,
            active: None,
        }
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Swap in a new timeline (new track loaded) and forget the old position.
    pub fn replace(&mut self, lines: Arc<[LyricLine]>) {
        self.lines = lines;
        self.active = None;
    }

    /// Resolve the clock and report a change of active line, if any.
    pub fn tick(&mut self, now: f64) -> Option<ActiveChange> {
        let current = find_active_index(&self.lines, now, &self.lookahead);
        if current == self.active {
            return None;
        }

        let change = ActiveChange {
            previous: self.active,
            current,
            time: now,
        };
        self.active = current;
        Some(change)
    }

    /// Line a view should start scrolling to before it becomes active
    pub fn pending_scroll(&self, now: f64) -> Option<usize> {
        scroll_target(&self.lines, now, self.scroll_window).filter(|&i| Some(i) != self.active)
    }

    /// The last line has been reached; nothing more can change.
    pub fn is_finished(&self) -> bool {
        match self.active {
            Some(i) => i + 1 == self.lines.len(),
            None => !has_timed_lines(&self.lines),
        }
    }
}

/// Drive `follower` from `clock` until the last line is reached.
///
/// New timelines sent on `updates` replace the current one. A closed channel
/// only stops replacements; following continues.
pub async fn run_follow<F>(
    mut follower: LyricFollower,
    clock: PlaybackClock,
    tick: Duration,
    mut updates: watch::Receiver<Arc<[LyricLine]>>,
    mut on_change: F,
) where
    F: FnMut(&[LyricLine], &ActiveChange),
{
    let mut interval = time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut updates_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = clock.position();
                if let Some(change) = follower.tick(now) {
                    on_change(follower.lines(), &change);
                }
                if let Some(next) = follower.pending_scroll(now) {
                    tracing::trace!(next, now, "scroll ahead");
                }
                if follower.is_finished() {
                    tracing::debug!(now, "reached end of lyrics");
                    break;
                }
            }
            changed = updates.changed(), if updates_open => {
                if changed.is_err() {
                    updates_open = false;
                    continue;
                }
                let lines = updates.borrow_and_update().clone();
                tracing::info!(lines = lines.len(), "timeline replaced");
                follower.replace(lines);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(entries: &[(f64, &str)]) -> Arc<[LyricLine]> {
        entries
            .iter()
            .enumerate()
            .map(|(i, &(t, text))| LyricLine::timed(i, t, text.to_string(), String::new()))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_tick_reports_only_changes() {
        let mut follower = LyricFollower::new(
            timeline(&[(10.0, "a"), (20.0, "b")]),
            Lookahead::NONE,
            0.25,
        );
        assert_eq!(follower.tick(5.0), None);
        assert_eq!(
            follower.tick(10.0),
            Some(ActiveChange {
                previous: None,
                current: Some(0),
                time: 10.0,
            })
        );
        assert_eq!(follower.tick(15.0), None);
        assert_eq!(follower.tick(21.0).map(|c| c.current), Some(Some(1)));
        assert!(follower.is_finished());
    }

    #[test]
    fn test_seek_backwards_reports_change() {
        let mut follower = LyricFollower::new(
            timeline(&[(10.0, "a"), (20.0, "b")]),
            Lookahead::NONE,
            0.25,
        );
        follower.tick(25.0);
        let change = follower.tick(1.0).unwrap();
        assert_eq!(change.previous, Some(1));
        assert_eq!(change.current, None);
    }

    #[test]
    fn test_replace_resets_position() {
        let mut follower = LyricFollower::new(timeline(&[(0.0, "old")]), Lookahead::NONE, 0.25);
        follower.tick(3.0);
        assert_eq!(follower.active(), Some(0));

        follower.replace(timeline(&[(1.0, "new"), (2.0, "newer")]));
        assert_eq!(follower.active(), None);
        assert_eq!(follower.tick(3.0).map(|c| c.current), Some(Some(1)));
        assert_eq!(follower.lines()[1].raw_content, "newer");
    }

    #[test]
    fn test_pending_scroll() {
        let mut follower = LyricFollower::new(
            timeline(&[(10.0, "a"), (20.0, "b")]),
            Lookahead::NONE,
            0.25,
        );
        follower.tick(19.8);
        assert_eq!(follower.pending_scroll(19.8), Some(1));
        assert_eq!(follower.pending_scroll(15.0), None);
    }

    #[test]
    fn test_untimed_is_finished() {
        let lines: Arc<[LyricLine]> = vec![
            LyricLine::untimed("a".to_string()),
            LyricLine::untimed("b".to_string()),
        ]
        .into();
        let follower = LyricFollower::new(lines, Lookahead::default(), 0.25);
        assert!(follower.is_finished());
    }

    #[test]
    fn test_clock_position() {
        let clock = PlaybackClock::start_at(30.0, 2.0);
        let later = clock.origin + Duration::from_millis(1500);
        assert_eq!(clock.position_at(clock.origin), 30.0);
        assert_eq!(clock.position_at(later), 33.0);
    }

    #[tokio::test]
    async fn test_run_follow_reaches_end() {
        let lines = timeline(&[(0.0, "a"), (0.03, "b"), (0.06, "c")]);
        let follower = LyricFollower::new(lines.clone(), Lookahead::NONE, 0.0);
        let (_tx, rx) = watch::channel(lines);

        let mut seen = Vec::new();
        run_follow(
            follower,
            PlaybackClock::start_at(0.0, 1.0),
            Duration::from_millis(5),
            rx,
            |_, change| seen.push(change.current),
        )
        .await;

        assert_eq!(seen.first(), Some(&Some(0)));
        assert_eq!(seen.last(), Some(&Some(2)));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_run_follow_with_closed_updates() {
        let lines = timeline(&[(0.0, "a"), (0.02, "b")]);
        let follower = LyricFollower::new(lines.clone(), Lookahead::NONE, 0.0);
        let (_, rx) = watch::channel(lines);

        let mut seen = Vec::new();
        run_follow(
            follower,
            PlaybackClock::start_at(0.0, 1.0),
            Duration::from_millis(5),
            rx,
            |_, change| seen.push(change.current),
        )
        .await;

        assert_eq!(seen.last(), Some(&Some(1)));
    }

    #[tokio::test]
    async fn test_run_follow_switches_timeline() {
        let old = timeline(&[(0.0, "old"), (60.0, "old end")]);
        let follower = LyricFollower::new(old.clone(), Lookahead::NONE, 0.0);
        let (tx, rx) = watch::channel(old);
        tx.send(timeline(&[(0.0, "new")])).unwrap();

        let mut seen = Vec::new();
        run_follow(
            follower,
            PlaybackClock::start_at(0.0, 1.0),
            Duration::from_millis(5),
            rx,
            |lines, change| {
                if let Some(i) = change.current {
                    seen.push(lines[i].raw_content.clone());
                }
            },
        )
        .await;

        assert_eq!(seen.last().map(String::as_str), Some("new"));
    }
}
