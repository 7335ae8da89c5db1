//! Focus-session engine for desktop focus trackers.
//!
//! The engine owns the session lifecycle (idle, running, paused), runs up to
//! two detection loops (webcam vision classification and active-window
//! blocklist checks), arbitrates their latest samples into a single activity
//! state, and keeps a gapless timeline of the result. Sessions draw from a
//! tamper-evident usage budget and end with per-state statistics, a history
//! row, and an optional report file.
//!
//! Everything that touches an OS or network boundary is a trait the host
//! implements: [`CameraFeed`], [`VisionClassifier`], [`WindowInspector`],
//! [`PermissionGate`], [`CredentialStore`], [`RemoteLedger`] and
//! [`ReportGenerator`]. The engine stays fully testable with fakes.

pub mod blocklist;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod sensing;
pub mod settings;
pub mod tracking;
pub mod utils;

pub use blocklist::Blocklist;
pub use config::{AlertThreshold, EngineConfig, GadgetFilterConfig, RetryPolicy};
pub use engine::callbacks::EngineCallbacks;
pub use engine::controller::{EngineDeps, SessionEngine};
pub use engine::{CredentialStore, PermissionGate, PermissionState};
pub use error::{ClassifyError, ControlError, StartError, UsageError};
pub use models::activity::{ActivityState, GadgetKind, MonitoringMode};
pub use models::sample::{DetectionSample, ScreenSample, WindowSnapshot};
pub use models::session::{
    EngineStatus, SessionRecord, SessionStats, SessionStatus, SessionSummary, StopOutcome,
};
pub use report::{JsonReportWriter, ReportGenerator};
pub use sensing::classifier::{CameraFeed, CameraFrame, VisionClassifier, VisionProvider};
pub use sensing::screen::WindowInspector;
pub use tracking::daily::DailyRecord;
pub use tracking::timeline::{EventTimeline, TimelineEvent};
pub use tracking::usage::{RemoteBalance, RemoteLedger};
