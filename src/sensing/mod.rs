//! Detection sources: independent polling loops that publish samples into a
//! shared cell, plus the arbitration pieces (hysteresis filter, priority
//! resolver) the coordination path runs over them.

pub mod camera;
pub mod classifier;
pub mod controller;
pub mod filter;
pub mod resolver;
pub mod screen;
pub mod state;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Which polling loop produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Camera,
    Screen,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Camera => "camera",
            SourceKind::Screen => "screen",
        }
    }
}

/// Message from the driver loop to the engine's coordinator task: a new
/// sample is published and ready to be folded into the timeline.
#[derive(Debug, Clone, Copy)]
pub struct CoordinationTick {
    pub source: SourceKind,
    /// True on the driver's first successful sample; starts the session clock.
    pub first_sample: bool,
    pub at: DateTime<Utc>,
}

pub type TickSender = mpsc::Sender<CoordinationTick>;
pub type TickReceiver = mpsc::Receiver<CoordinationTick>;

/// Channel capacity between the loops and the coordinator. The coordinator
/// tick is cheap, so this never fills in practice; backpressure just slows
/// the producing loop by one tick.
pub const TICK_CHANNEL_CAPACITY: usize = 64;
