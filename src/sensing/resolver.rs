//! Priority arbitration between detection sources.
//!
//! Pure function of the latest published samples plus the pause flag.
//! Precedence: Paused, then camera absence, then screen distraction, then
//! gadget suspicion, then Present. Physical absence and a confirmed
//! blocklist hit are more certain signals than the gadget-visual heuristic,
//! so they preempt it. A source with no sample never triggers its steps.

use crate::models::activity::ActivityState;
use crate::models::sample::{DetectionSample, ScreenSample};

pub fn resolve_activity(
    paused: bool,
    camera: Option<&DetectionSample>,
    screen: Option<&ScreenSample>,
) -> ActivityState {
    if paused {
        return ActivityState::Paused;
    }

    if let Some(cam) = camera {
        if cam.is_away() {
            return ActivityState::Away;
        }
    }

    if let Some(scr) = screen {
        if scr.is_distracted {
            return ActivityState::ScreenDistraction;
        }
    }

    if let Some(cam) = camera {
        if cam.gadget_visible {
            return ActivityState::GadgetSuspected;
        }
    }

    ActivityState::Present
}
