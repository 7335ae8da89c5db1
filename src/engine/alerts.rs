use chrono::{DateTime, Utc};

use crate::config::AlertThreshold;

const ENABLE_LOGS: bool = true;
use crate::log_info;

/// Tracks a continuous unfocused excursion against the escalation
/// ladder. Each rung fires at most once per excursion; any focused
/// observation resets the ladder.
pub struct AlertTracker {
    thresholds: Vec<AlertThreshold>,
    unfocused_since: Option<DateTime<Utc>>,
    fired: usize,
}

impl AlertTracker {
    pub fn new(thresholds: Vec<AlertThreshold>) -> Self {
        Self {
            thresholds,
            unfocused_since: None,
            fired: 0,
        }
    }

    /// Feeds one resolved observation into the tracker. Returns the
    /// alert to raise, if the current excursion just crossed the next
    /// rung.
    pub fn observe(&mut self, unfocused: bool, now: DateTime<Utc>) -> Option<(usize, AlertThreshold)> {
        if !unfocused {
            if self.unfocused_since.is_some() {
                log_info!("refocussed, resetting alert tracking");
            }
            self.unfocused_since = None;
            self.fired = 0;
            return None;
        }

        let since = *self.unfocused_since.get_or_insert(now);
        let elapsed = (now - since).num_milliseconds() as f64 / 1000.0;

        let next = self.thresholds.get(self.fired)?;
        if elapsed >= next.after_seconds as f64 {
            let level = self.fired;
            let threshold = next.clone();
            self.fired += 1;
            return Some((level, threshold));
        }
        None
    }

    /// Clears excursion state, e.g. when a session pauses.
    pub fn reset(&mut self) {
        self.unfocused_since = None;
        self.fired = 0;
    }
}
