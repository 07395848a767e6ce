//! The heartbeat-gap state machine.
//!
//! For one service's ordered, duplicate-free timeline this walks a virtual
//! "expected heartbeat clock" forward one interval at a time, matches it
//! against observed beats within the tolerance window, counts consecutive
//! misses, and finally extrapolates past the last real beat up to `now`.

use chrono::{DateTime, Utc};

use crate::config::MonitorConfig;
use crate::data::{Event, ServiceTimeline};

/// Walk one service's timeline and return the instants at which a run of
/// consecutive misses crossed the configured threshold, ascending.
///
/// `now` is the caller-injected wall-clock reading. It is consulted only
/// by the trailing extrapolation and deliberately not re-read during the
/// projection loop, so a single run is internally consistent. Because of
/// that trailing phase the same historical timeline can produce different
/// alerts depending on when detection runs.
pub fn detect_missed_heartbeats(
    timeline: &ServiceTimeline,
    config: &MonitorConfig,
    now: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    let Some(first) = timeline.first() else {
        return Vec::new();
    };

    let detector = GapDetector {
        events: timeline.events(),
        config,
        now,
        current_expected: first.instant(),
        consecutive_misses: 0,
        cursor: 1,
        alerts: Vec::new(),
    };
    detector.run()
}

/// Transient per-run state. Created fresh for every invocation and
/// discarded after producing its alerts; nothing carries over between
/// runs.
struct GapDetector<'a> {
    events: &'a [Event],
    config: &'a MonitorConfig,
    now: DateTime<Utc>,
    current_expected: DateTime<Utc>,
    consecutive_misses: u32,
    cursor: usize,
    alerts: Vec<DateTime<Utc>>,
}

impl GapDetector<'_> {
    fn run(mut self) -> Vec<DateTime<Utc>> {
        while self.cursor <= self.events.len() {
            let next_expected = self.current_expected + self.config.interval();

            // Large-gap resynchronization. The gap computed here is always
            // exactly one interval, so with gap_limit >= 1 this never
            // fires; kept as shipped behavior until product intent on
            // resync is clarified.
            let gap = next_expected - self.current_expected;
            if gap > self.config.max_gap() && self.cursor < self.events.len() {
                self.current_expected = self.events[self.cursor].instant();
                self.consecutive_misses = 0;
                self.cursor += 1;
                continue;
            }

            self.current_expected = next_expected;
            let found = self.scan_slot();

            if !found {
                self.consecutive_misses += 1;
                if self.consecutive_misses >= self.config.allowed_misses() {
                    self.alerts.push(self.current_expected);
                    self.consecutive_misses = 0;
                }
            }

            if self.cursor >= self.events.len() {
                self.extrapolate_trailing();
                break;
            }
        }

        self.alerts
    }

    /// Scan forward for a beat matching the current expected slot.
    ///
    /// Returns true on a match, having re-anchored the expected clock to
    /// the observed instant (not the theoretical grid point) and consumed
    /// the event. An event still ahead of the slot is left unconsumed; it
    /// may match a later slot. Events behind the slot are skipped.
    fn scan_slot(&mut self) -> bool {
        let window = self.config.tolerance_window();

        while self.cursor < self.events.len() {
            let instant = self.events[self.cursor].instant();
            let delta = instant - self.current_expected;

            if delta.abs() <= window {
                self.consecutive_misses = 0;
                self.current_expected = instant;
                self.cursor += 1;
                return true;
            } else if delta > window {
                return false;
            } else {
                // Stale beat behind the expected clock
                self.cursor += 1;
            }
        }

        false
    }

    /// Project expected slots past the last real beat, up to `now`.
    ///
    /// Skipped entirely when the service has been silent for at least
    /// `interval * gap_limit` - a long-quiet service is treated as retired
    /// rather than freshly missing. Projection stops at the first slot
    /// whose deadline has not yet passed.
    fn extrapolate_trailing(&mut self) {
        let Some(last) = self.events.last() else {
            return;
        };
        if self.now - last.instant() >= self.config.max_gap() {
            return;
        }

        while self.consecutive_misses < self.config.allowed_misses() {
            self.current_expected += self.config.interval();

            if self.now - self.current_expected > self.config.tolerance_window() {
                self.consecutive_misses += 1;
                if self.consecutive_misses >= self.config.allowed_misses() {
                    self.alerts.push(self.current_expected);
                    self.consecutive_misses = 0;
                }
            } else {
                break;
            }
        }
    }
}
