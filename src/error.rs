//! Typed errors for the engine surface and the detection loops.

use thiserror::Error;

/// Rejections from `SessionEngine::start_session`.
///
/// Each variant carries a stable snake_case code so host applications can key
/// remediation UI off `kind()` without string-matching display text.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("A session is already running")]
    AlreadyRunning,

    #[error("No focus hours remaining")]
    TimeExhausted,

    #[error("No API credential configured for {0}")]
    MissingCredential(String),

    #[error("Camera access denied. Enable camera permission in system settings and restart the app.")]
    CameraPermissionDenied,

    #[error("Camera access is restricted on this device and cannot be enabled.")]
    CameraPermissionRestricted,

    #[error("Screen monitoring permission denied. {0}")]
    ScreenPermissionDenied(String),
}

impl StartError {
    /// Stable error code for host UIs.
    pub fn kind(&self) -> &'static str {
        match self {
            StartError::AlreadyRunning => "already_running",
            StartError::TimeExhausted => "time_exhausted",
            StartError::MissingCredential(_) => "no_credential",
            StartError::CameraPermissionDenied => "camera_permission_denied",
            StartError::CameraPermissionRestricted => "camera_permission_restricted",
            StartError::ScreenPermissionDenied(_) => "screen_permission_denied",
        }
    }
}

/// Errors from `SessionEngine` control calls outside of start.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("No active session")]
    NotRunning,
}

/// Classifier adapter failures, split by retry eligibility.
///
/// The camera loop retries `Transient` with backoff and falls back to the
/// safe default; `Fatal` is never retried.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Transient classifier failure: {0}")]
    Transient(String),

    #[error("Fatal classifier failure: {0}")]
    Fatal(String),
}

impl ClassifyError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ClassifyError::Transient(_))
    }
}

/// Errors from `UsageBudget` mutation calls.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Invalid usage amount: {0} (must be >= 0)")]
    InvalidArgument(i64),

    #[error("Failed to persist usage record: {0}")]
    Persist(String),
}
