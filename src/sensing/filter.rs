//! Gadget detection hysteresis.
//!
//! A single borderline frame must never flip the user's status; two
//! consecutive borderline frames (spaced by the camera cadence) count as
//! corroboration. High-confidence detections pass through immediately.

use crate::config::GadgetFilterConfig;

/// Per-session debounce state. Constructed fresh when a session starts;
/// nothing persists across sessions.
#[derive(Debug)]
pub struct GadgetFilter {
    config: GadgetFilterConfig,
    consecutive_borderline: u32,
}

impl GadgetFilter {
    pub fn new(config: GadgetFilterConfig) -> Self {
        Self {
            config,
            consecutive_borderline: 0,
        }
    }

    /// Debounce one raw sample into the stabilized gadget verdict.
    pub fn apply(&mut self, gadget_suspected: bool, confidence: f64) -> bool {
        if !gadget_suspected {
            self.consecutive_borderline = 0;
            return false;
        }

        if confidence > self.config.high_confidence {
            self.consecutive_borderline = 0;
            return true;
        }

        // Borderline: require corroboration across consecutive samples.
        self.consecutive_borderline += 1;
        self.consecutive_borderline >= self.config.debounce_samples
    }
}
