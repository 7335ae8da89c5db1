//! Engine configuration: cadences, detection tuning, alert schedule, budget
//! grant, and file locations. Everything here is a tunable, not an invariant.

use std::path::PathBuf;
use std::time::Duration;

use crate::sensing::classifier::VisionProvider;

/// Gadget hysteresis tuning.
#[derive(Debug, Clone)]
pub struct GadgetFilterConfig {
    /// Above this confidence a detection passes through immediately.
    pub high_confidence: f64,

    /// Consecutive borderline samples required before a detection passes.
    pub debounce_samples: u32,
}

impl Default for GadgetFilterConfig {
    fn default() -> Self {
        Self {
            high_confidence: 0.75,
            debounce_samples: 2,
        }
    }
}

/// Bounded exponential backoff for transient classifier failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

/// One rung of the unfocused-alert ladder.
#[derive(Debug, Clone)]
pub struct AlertThreshold {
    /// Continuous unfocused seconds before this alert fires.
    pub after_seconds: u64,
    /// Short badge text shown by the host UI.
    pub badge: String,
    /// Full alert message.
    pub message: String,
}

/// Full engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Camera sampling rate in frames per second.
    pub detection_fps: f64,

    /// Interval between active-window checks.
    pub screen_check_interval: Duration,

    /// Hard timeout on a single classifier round trip.
    pub classify_timeout: Duration,

    /// Hard timeout on a single frame grab or window inspection.
    pub capture_timeout: Duration,

    /// How long stop waits for each detection loop to join.
    pub stop_join_timeout: Duration,

    pub gadget_filter: GadgetFilterConfig,
    pub retry: RetryPolicy,

    /// Ordered escalation ladder; must be sorted by `after_seconds`.
    pub alert_thresholds: Vec<AlertThreshold>,

    /// Seconds granted to a fresh install before any remote sync.
    pub initial_grant_seconds: i64,

    pub vision_provider: VisionProvider,

    /// Directory holding the budget record, settings, and daily stats files.
    pub data_dir: PathBuf,
}

impl EngineConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            detection_fps: 1.0,
            screen_check_interval: Duration::from_secs(3),
            classify_timeout: Duration::from_secs(30),
            capture_timeout: Duration::from_secs(10),
            stop_join_timeout: Duration::from_secs(2),
            gadget_filter: GadgetFilterConfig::default(),
            retry: RetryPolicy::default(),
            alert_thresholds: default_alert_thresholds(),
            initial_grant_seconds: 7200,
            vision_provider: VisionProvider::OpenAi,
            data_dir,
        }
    }

    /// Camera loop tick interval derived from `detection_fps`.
    ///
    /// A non-positive fps is clamped to one frame per second rather than
    /// dividing by zero.
    pub fn camera_interval(&self) -> Duration {
        if self.detection_fps > 0.0 {
            Duration::from_secs_f64(1.0 / self.detection_fps)
        } else {
            Duration::from_secs(1)
        }
    }

    pub fn usage_file(&self) -> PathBuf {
        self.data_dir.join("usage.json")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    pub fn daily_stats_file(&self) -> PathBuf {
        self.data_dir.join("daily_stats.json")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join("reports")
    }

    pub fn history_db_file(&self) -> PathBuf {
        self.data_dir.join("history.db")
    }
}

fn default_alert_thresholds() -> Vec<AlertThreshold> {
    vec![
        AlertThreshold {
            after_seconds: 20,
            badge: "Focus paused".into(),
            message: "We noticed you stepped away!".into(),
        },
        AlertThreshold {
            after_seconds: 60,
            badge: "Quick check-in".into(),
            message: "We are waiting for you :)".into(),
        },
        AlertThreshold {
            after_seconds: 120,
            badge: "Reminder".into(),
            message: "Don't forget to come back ;)".into(),
        },
    ]
}
