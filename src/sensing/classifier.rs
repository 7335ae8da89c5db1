//! Collaborator seams for the camera pipeline: frame acquisition and the
//! vision classifier, plus the retry backoff used when the classifier hits
//! transient trouble.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RetryPolicy;
use crate::error::ClassifyError;
use crate::models::sample::DetectionSample;

/// Which vision backend credentials are configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisionProvider {
    OpenAi,
    Gemini,
}

impl VisionProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisionProvider::OpenAi => "openai",
            VisionProvider::Gemini => "gemini",
        }
    }
}

/// One captured webcam frame, opaque to the engine.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub data: Vec<u8>,
    pub captured_at: DateTime<Utc>,
}

/// Frame source. Implementations talk to the actual camera; calls run under
/// `spawn_blocking` with a timeout, so blocking here is fine.
pub trait CameraFeed: Send + Sync {
    fn grab_frame(&self) -> Result<CameraFrame>;
}

/// Remote vision classifier. `Transient` failures are retried with backoff;
/// `Fatal` failures (bad credential, revoked permission) are not.
pub trait VisionClassifier: Send + Sync {
    fn classify(&self, frame: CameraFrame) -> Result<DetectionSample, ClassifyError>;
}

/// Delay before retry `attempt` (zero-based): base doubled per attempt,
/// capped, plus up to 25% jitter so synchronized clients spread out.
pub(crate) fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    let exp = policy
        .base_delay
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(policy.max_delay);
    let jitter_cap = (exp.as_millis() as u64 / 4).max(1);
    let jitter = rand::thread_rng().gen_range(0..=jitter_cap);
    exp + Duration::from_millis(jitter)
}
