//! Gapless activity timeline.
//!
//! Append-only sequence of (state, start, end) intervals with exact-duration
//! accounting: consecutive events share a boundary, durations are strictly
//! positive, and the sum of closed durations plus the open interval always
//! equals elapsed time. Accounting bugs degrade to a discarded event and a
//! warning, never a panic; the detection loops must keep running.

const ENABLE_LOGS: bool = true;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::log_warn;
use crate::models::activity::ActivityState;

/// One closed interval of a single activity state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub state: ActivityState,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: f64,
}

/// Gapless event log for one session.
#[derive(Debug, Clone)]
pub struct EventTimeline {
    events: Vec<TimelineEvent>,
    open_state: Option<ActivityState>,
    open_since: Option<DateTime<Utc>>,
    finalized: bool,
}

impl EventTimeline {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            open_state: None,
            open_since: None,
            finalized: false,
        }
    }

    /// Record that the resolved state is `new_state` as of `at`.
    ///
    /// Re-logging the open state is a no-op, so repeated identical detections
    /// never fragment the timeline. A different state closes the open
    /// interval at `at` and opens the new one at the same instant, keeping
    /// events contiguous. Closed intervals with non-positive duration (clock
    /// skew, re-entrant calls) are discarded with a warning.
    pub fn log_transition(&mut self, new_state: ActivityState, at: DateTime<Utc>) {
        if self.finalized {
            log_warn!("log_transition({}) on finalized timeline ignored", new_state.as_str());
            return;
        }

        match (self.open_state, self.open_since) {
            (Some(open), _) if open == new_state => {}
            (Some(open), Some(since)) => {
                self.close_open(open, since, at);
                self.open_state = Some(new_state);
                self.open_since = Some(at);
            }
            _ => {
                self.open_state = Some(new_state);
                self.open_since = Some(at);
            }
        }
    }

    /// Force-close the open interval. Idempotent: once finalized, further
    /// transitions and finalize calls are ignored.
    pub fn finalize(&mut self, at: DateTime<Utc>) {
        if self.finalized {
            return;
        }
        if let (Some(open), Some(since)) = (self.open_state, self.open_since) {
            self.close_open(open, since, at);
        }
        self.open_state = None;
        self.open_since = None;
        self.finalized = true;
    }

    fn close_open(&mut self, state: ActivityState, since: DateTime<Utc>, end: DateTime<Utc>) {
        let duration = (end - since).num_milliseconds() as f64 / 1000.0;
        if duration <= 0.0 {
            log_warn!(
                "discarding {} interval with non-positive duration ({:.3}s, start {}, end {})",
                state.as_str(),
                duration,
                since,
                end
            );
            return;
        }
        self.events.push(TimelineEvent {
            state,
            start: since,
            end,
            duration_seconds: duration,
        });
    }

    /// Sum of all closed durations. After finalize this equals session length
    /// minus paused time.
    pub fn total_duration(&self) -> f64 {
        self.events.iter().map(|e| e.duration_seconds).sum()
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn current_state(&self) -> Option<ActivityState> {
        self.open_state
    }

    pub fn open_since(&self) -> Option<DateTime<Utc>> {
        self.open_since
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.open_state.is_none()
    }

    /// Post-finalize consistency check: warns when the recorded durations
    /// drift more than a second from the expected elapsed total. Diagnostic
    /// only; the stored events are left untouched.
    pub fn validate_gapless(&self, expected_total_seconds: f64) {
        let recorded = self.total_duration();
        let drift = (expected_total_seconds - recorded).abs();
        if drift > 1.0 {
            log_warn!(
                "timeline accounting drift: recorded {:.1}s vs elapsed {:.1}s ({:.1}s apart)",
                recorded,
                expected_total_seconds,
                drift
            );
        }
    }
}

impl Default for EventTimeline {
    fn default() -> Self {
        Self::new()
    }
}
