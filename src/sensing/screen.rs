use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::blocklist::Blocklist;
use crate::models::sample::{ScreenSample, WindowSnapshot};
use crate::sensing::state::DetectionCell;
use crate::sensing::{CoordinationTick, SourceKind, TickSender};

const ENABLE_LOGS: bool = true;
use crate::{log_info, log_warn};

/// Host hook for reading the currently focused window. Implementations
/// talk to the OS and may block; the loop always calls this on a
/// blocking thread with a timeout.
pub trait WindowInspector: Send + Sync {
    /// Returns `None` when no window has focus (e.g. the desktop).
    fn active_window(&self) -> anyhow::Result<Option<WindowSnapshot>>;
}

pub struct ScreenLoopContext {
    pub inspector: Arc<dyn WindowInspector>,
    pub blocklist: Arc<RwLock<Blocklist>>,
    pub cell: Arc<DetectionCell>,
    pub ticks: TickSender,
    pub cancel: CancellationToken,
    pub paused: watch::Receiver<bool>,
    pub interval: Duration,
    pub inspect_timeout: Duration,
    /// True only in screen-only mode; with the camera running, the
    /// camera loop is the coordination driver and this loop just
    /// publishes samples.
    pub drives_coordination: bool,
}

/// Screen monitoring loop. Reads the active window, checks it against
/// the blocklist, and publishes a screen sample. Purely local pattern
/// matching, no network calls.
pub async fn screen_loop(ctx: ScreenLoopContext) {
    log_info!(
        "screen loop starting (interval: {:?}, driver: {})",
        ctx.interval,
        ctx.drives_coordination
    );

    let mut ticker = tokio::time::interval(ctx.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut clock_started = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if *ctx.paused.borrow() {
                    continue;
                }

                match inspect(&ctx).await {
                    Some(window) => {
                        let sample = evaluate_window(&ctx.blocklist, window);
                        ctx.cell.publish_screen(sample);

                        let first_sample = !clock_started;
                        clock_started = true;
                        if ctx.drives_coordination && !send_tick(&ctx.ticks, first_sample).await {
                            break;
                        }
                    }
                    None => {
                        if !clock_started {
                            continue;
                        }
                        ctx.cell.publish_screen(ScreenSample::safe_default(Utc::now()));
                        if ctx.drives_coordination && !send_tick(&ctx.ticks, false).await {
                            break;
                        }
                    }
                }
            }
            _ = ctx.cancel.cancelled() => {
                log_info!("screen loop shutting down");
                break;
            }
        }
    }
}

/// One window inspection with a timeout. Returns `None` on failure so
/// the caller can fall back to a safe sample.
async fn inspect(ctx: &ScreenLoopContext) -> Option<Option<WindowSnapshot>> {
    match tokio::time::timeout(ctx.inspect_timeout, fetch_window(ctx.inspector.clone())).await {
        Ok(Ok(window)) => Some(window),
        Ok(Err(e)) => {
            log_warn!("window inspection failed: {}", e);
            None
        }
        Err(_) => {
            log_warn!("window inspection timed out after {:?}", ctx.inspect_timeout);
            None
        }
    }
}

async fn fetch_window(inspector: Arc<dyn WindowInspector>) -> anyhow::Result<Option<WindowSnapshot>> {
    tokio::task::spawn_blocking(move || inspector.active_window())
        .await
        .map_err(|e| anyhow::anyhow!("window inspection task failed: {}", e))?
}

fn evaluate_window(blocklist: &RwLock<Blocklist>, window: Option<WindowSnapshot>) -> ScreenSample {
    let sampled_at = Utc::now();
    match window {
        Some(win) => {
            // Write lock: matching may self-clean blank custom patterns.
            let (is_distracted, distraction_source) = {
                let mut blocklist = blocklist.write().unwrap();
                blocklist.check_distraction(
                    win.url.as_deref(),
                    Some(&win.window_title),
                    Some(&win.app_name),
                    None,
                )
            };
            if is_distracted {
                log_info!("screen distraction: {:?}", distraction_source);
            }
            ScreenSample {
                is_distracted,
                distraction_source,
                sampled_at,
            }
        }
        None => ScreenSample::safe_default(sampled_at),
    }
}

async fn send_tick(ticks: &TickSender, first_sample: bool) -> bool {
    let tick = CoordinationTick {
        source: SourceKind::Screen,
        first_sample,
        at: Utc::now(),
    };
    if ticks.send(tick).await.is_err() {
        log_warn!("coordination channel closed, stopping screen loop");
        return false;
    }
    true
}
