use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::activity::{ActivityState, MonitoringMode};

/// Lifecycle status of a session history row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Running,
    Completed,
    Interrupted,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "Running",
            SessionStatus::Completed => "Completed",
            SessionStatus::Interrupted => "Interrupted",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Running" => Some(SessionStatus::Running),
            "Completed" => Some(SessionStatus::Completed),
            "Interrupted" => Some(SessionStatus::Interrupted),
            _ => None,
        }
    }
}

/// A session history row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub monitoring_mode: MonitoringMode,
    pub active_seconds: f64,
    pub paused_seconds: f64,
    pub gadget_detections: u32,
    pub screen_detections: u32,
}

/// A merged timeline entry for reports: consecutive same-state events
/// collapsed into one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedEvent {
    pub state: ActivityState,
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: f64,
}

/// Per-state duration totals for one session. Float seconds throughout;
/// truncation to whole units happens only at display time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_seconds: f64,
    pub present_seconds: f64,
    pub away_seconds: f64,
    pub gadget_seconds: f64,
    pub screen_distraction_seconds: f64,
    pub paused_seconds: f64,
    /// present + away + gadget + screen (screen distraction is active time:
    /// the user is at the desk, just distracted).
    pub active_seconds: f64,
    /// away + gadget + screen.
    pub distracted_seconds: f64,
    pub events: Vec<ConsolidatedEvent>,
}

/// Everything the report generator and `on_session_ended` receive at stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub monitoring_mode: MonitoringMode,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub active_seconds: f64,
    pub paused_seconds: f64,
    pub gadget_detections: u32,
    pub screen_detections: u32,
    pub stats: SessionStats,
}

/// Return value of `stop_session`.
#[derive(Debug, Clone)]
pub struct StopOutcome {
    pub report_path: Option<PathBuf>,
    pub summary: SessionSummary,
}

/// Cheap poll-friendly status snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub is_running: bool,
    pub is_paused: bool,
    pub status_kind: String,
    pub status_label: String,
    pub elapsed_seconds: i64,
    pub monitoring_mode: MonitoringMode,
    pub is_locked: bool,
}
