use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::activity::GadgetKind;

/// One camera classification result. Immutable once published; the published
/// copy carries the post-hysteresis gadget verdict in `gadget_visible`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSample {
    pub person_present: bool,
    pub at_desk: bool,
    pub gadget_visible: bool,
    pub gadget_confidence: f64,
    pub distraction_type: GadgetKind,
    pub sampled_at: DateTime<Utc>,
}

impl DetectionSample {
    /// Conservative substitute when the classifier fails: the user is treated
    /// as present and focused so a flaky API never produces false alarms.
    pub fn safe_default(at: DateTime<Utc>) -> Self {
        Self {
            person_present: true,
            at_desk: true,
            gadget_visible: false,
            gadget_confidence: 0.0,
            distraction_type: GadgetKind::None,
            sampled_at: at,
        }
    }

    /// Absent from the camera's point of view: not in frame or not at desk.
    pub fn is_away(&self) -> bool {
        !self.person_present || !self.at_desk
    }
}

/// One blocklist check result. Immutable once published.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSample {
    pub is_distracted: bool,
    pub distraction_source: Option<String>,
    pub sampled_at: DateTime<Utc>,
}

impl ScreenSample {
    pub fn safe_default(at: DateTime<Utc>) -> Self {
        Self {
            is_distracted: false,
            distraction_source: None,
            sampled_at: at,
        }
    }
}

/// Active-window metadata from the window inspector. `url` is only populated
/// for browsers the inspector knows how to query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    pub app_name: String,
    pub window_title: String,
    pub url: Option<String>,
}
