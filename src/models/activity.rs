use serde::{Deserialize, Serialize};

/// The single resolved label describing what the user is doing right now.
///
/// Exactly one is current at any instant while a session runs. Stored in the
/// timeline and in session history rows via `as_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    Present,
    Away,
    GadgetSuspected,
    ScreenDistraction,
    Paused,
}

impl ActivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityState::Present => "present",
            ActivityState::Away => "away",
            ActivityState::GadgetSuspected => "gadget_suspected",
            ActivityState::ScreenDistraction => "screen_distraction",
            ActivityState::Paused => "paused",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "present" => Some(ActivityState::Present),
            "away" => Some(ActivityState::Away),
            "gadget_suspected" => Some(ActivityState::GadgetSuspected),
            "screen_distraction" => Some(ActivityState::ScreenDistraction),
            "paused" => Some(ActivityState::Paused),
            _ => None,
        }
    }

    /// Human-readable label for timelines and reports.
    pub fn display_label(&self) -> &'static str {
        match self {
            ActivityState::Present => "Focused",
            ActivityState::Away => "Away from desk",
            ActivityState::GadgetSuspected => "Gadget suspected",
            ActivityState::ScreenDistraction => "Screen distraction",
            ActivityState::Paused => "Paused",
        }
    }

    /// States that count toward the unfocused-alert ladder.
    pub fn is_unfocused(&self) -> bool {
        matches!(
            self,
            ActivityState::Away | ActivityState::GadgetSuspected | ActivityState::ScreenDistraction
        )
    }
}

/// Which detection sources a session runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringMode {
    CameraOnly,
    ScreenOnly,
    Both,
}

impl MonitoringMode {
    pub fn uses_camera(&self) -> bool {
        matches!(self, MonitoringMode::CameraOnly | MonitoringMode::Both)
    }

    pub fn uses_screen(&self) -> bool {
        matches!(self, MonitoringMode::ScreenOnly | MonitoringMode::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MonitoringMode::CameraOnly => "camera_only",
            MonitoringMode::ScreenOnly => "screen_only",
            MonitoringMode::Both => "both",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "camera_only" => Some(MonitoringMode::CameraOnly),
            "screen_only" => Some(MonitoringMode::ScreenOnly),
            "both" => Some(MonitoringMode::Both),
            _ => None,
        }
    }
}

impl Default for MonitoringMode {
    fn default() -> Self {
        MonitoringMode::Both
    }
}

/// Gadget categories the classifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GadgetKind {
    None,
    Phone,
    Tablet,
    Controller,
    Tv,
    Wearable,
}

impl GadgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GadgetKind::None => "none",
            GadgetKind::Phone => "phone",
            GadgetKind::Tablet => "tablet",
            GadgetKind::Controller => "controller",
            GadgetKind::Tv => "tv",
            GadgetKind::Wearable => "wearable",
        }
    }
}

impl Default for GadgetKind {
    fn default() -> Self {
        GadgetKind::None
    }
}
