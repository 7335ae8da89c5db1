//! Shared publish point for the detection loops.
//!
//! Each loop writes only its own slot; readers clone a consistent snapshot
//! out from under the mutex, so a half-written sample is unobservable by
//! construction.

use std::sync::Mutex;

use crate::models::sample::{DetectionSample, ScreenSample};

/// Latest sample from each source, if any has been published yet.
#[derive(Debug, Clone, Default)]
pub struct DetectionSnapshot {
    pub camera: Option<DetectionSample>,
    pub screen: Option<ScreenSample>,
}

/// Mutex-guarded cell the loops publish into. One per engine, shared via
/// `Arc` with both loops and the coordinator.
#[derive(Debug, Default)]
pub struct DetectionCell {
    inner: Mutex<DetectionSnapshot>,
}

impl DetectionCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish_camera(&self, sample: DetectionSample) {
        self.inner.lock().unwrap().camera = Some(sample);
    }

    pub fn publish_screen(&self, sample: ScreenSample) {
        self.inner.lock().unwrap().screen = Some(sample);
    }

    pub fn snapshot(&self) -> DetectionSnapshot {
        self.inner.lock().unwrap().clone()
    }

    /// Drop both samples. Called at session start so a new session never
    /// resolves against the previous session's last published state.
    pub fn clear(&self) {
        let mut guard = self.inner.lock().unwrap();
        guard.camera = None;
        guard.screen = None;
    }
}
