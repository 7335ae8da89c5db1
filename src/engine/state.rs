use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::AlertThreshold;
use crate::engine::alerts::AlertTracker;
use crate::models::activity::{ActivityState, MonitoringMode};
use crate::tracking::timeline::EventTimeline;

/// Engine lifecycle phase. `locked` is tracked separately because a
/// budget lock outlives any one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Running,
    Paused,
}

/// Mutable engine state behind the controller's lock.
pub struct EngineState {
    pub phase: EnginePhase,
    pub locked: bool,
    pub monitoring_mode: MonitoringMode,
    pub session: Option<ActiveSession>,
    pub status_kind: String,
    pub status_label: String,
}

impl EngineState {
    pub fn new(monitoring_mode: MonitoringMode) -> Self {
        Self {
            phase: EnginePhase::Idle,
            locked: false,
            monitoring_mode,
            session: None,
            status_kind: "idle".to_string(),
            status_label: "Ready to Start".to_string(),
        }
    }

    pub fn set_status(&mut self, kind: &str, label: &str) {
        self.status_kind = kind.to_string();
        self.status_label = label.to_string();
    }
}

/// Per-session bookkeeping: the timeline, the pause ledger, and the
/// detection counters. Created fresh on every start.
pub struct ActiveSession {
    pub id: String,
    pub monitoring_mode: MonitoringMode,
    /// When `start_session` was called. The logical clock starts later,
    /// at the first successful sample.
    pub created_at: DateTime<Utc>,
    pub started: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub timeline: EventTimeline,
    pub total_paused_seconds: f64,
    pub pause_started_at: Option<DateTime<Utc>>,
    /// Elapsed active seconds frozen at the instant of pause, so the
    /// status display does not creep while paused. Whole seconds,
    /// floor-truncated.
    pub frozen_active_seconds: i64,
    pub gadget_detections: u32,
    pub screen_detections: u32,
    pub alerts: AlertTracker,
}

impl ActiveSession {
    pub fn new(
        monitoring_mode: MonitoringMode,
        created_at: DateTime<Utc>,
        alert_thresholds: Vec<AlertThreshold>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            monitoring_mode,
            created_at,
            started: false,
            start_time: None,
            timeline: EventTimeline::new(),
            total_paused_seconds: 0.0,
            pause_started_at: None,
            frozen_active_seconds: 0,
            gadget_detections: 0,
            screen_detections: 0,
            alerts: AlertTracker::new(alert_thresholds),
        }
    }

    /// Marks the logical clock as started. Idempotent; only the first
    /// call sets the start time.
    pub fn on_first_sample(&mut self, at: DateTime<Utc>) {
        if !self.started {
            self.started = true;
            self.start_time = Some(at);
        }
    }

    /// Logs a resolved activity state, counting entries into the gadget
    /// and screen-distraction states.
    pub fn record_state(&mut self, state: ActivityState, at: DateTime<Utc>) {
        if self.timeline.current_state() != Some(state) {
            match state {
                ActivityState::GadgetSuspected => self.gadget_detections += 1,
                ActivityState::ScreenDistraction => self.screen_detections += 1,
                _ => {}
            }
        }
        self.timeline.log_transition(state, at);
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.pause_started_at = Some(now);
        if let Some(start) = self.start_time {
            let elapsed = seconds_between(start, now);
            self.frozen_active_seconds = (elapsed - self.total_paused_seconds) as i64;
        }
        if self.started {
            self.timeline.log_transition(ActivityState::Paused, now);
        }
        // A pause closes any unfocused excursion; alerts restart from
        // the first rung after resume.
        self.alerts.reset();
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        self.close_pause(now);
        self.frozen_active_seconds = 0;
        if self.started {
            self.timeline.log_transition(ActivityState::Present, now);
        }
    }

    /// Folds an open pause interval into the pause total without
    /// logging a resume. Used both by `resume` and by stop-while-paused.
    pub fn close_pause(&mut self, now: DateTime<Utc>) {
        if let Some(paused_at) = self.pause_started_at.take() {
            self.total_paused_seconds += seconds_between(paused_at, now);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started_at.is_some()
    }

    /// Whole elapsed active seconds for status displays. Frozen while
    /// paused; zero until the clock starts.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        if self.pause_started_at.is_some() {
            return self.frozen_active_seconds;
        }
        match self.start_time {
            Some(start) => (seconds_between(start, now) - self.total_paused_seconds) as i64,
            None => 0,
        }
    }

    /// Fractional active seconds for final accounting. Assumes any open
    /// pause has been closed first.
    pub fn active_seconds(&self, end: DateTime<Utc>) -> f64 {
        match self.start_time {
            Some(start) => seconds_between(start, end) - self.total_paused_seconds,
            None => 0.0,
        }
    }
}

fn seconds_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (b - a).num_milliseconds() as f64 / 1000.0
}
