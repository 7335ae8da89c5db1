use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::sensing::camera::{camera_loop, CameraLoopContext};
use crate::sensing::screen::{screen_loop, ScreenLoopContext};

const ENABLE_LOGS: bool = true;
use crate::{log_info, log_warn};

/// Owns the detection loops of one session: the shared cancellation
/// token, the pause flag, and the task handles. Dropped (after `stop`)
/// when the session ends; the next session gets a fresh controller, so
/// no loop state can leak across sessions.
pub struct SensingController {
    cancel: CancellationToken,
    pause_tx: watch::Sender<bool>,
    pause_rx: watch::Receiver<bool>,
    handles: Vec<(&'static str, JoinHandle<()>)>,
    join_timeout: Duration,
}

impl SensingController {
    pub fn new(join_timeout: Duration) -> Self {
        let (pause_tx, pause_rx) = watch::channel(false);
        Self {
            cancel: CancellationToken::new(),
            pause_tx,
            pause_rx,
            handles: Vec::new(),
            join_timeout,
        }
    }

    /// Token to hand to loop contexts. Cancelled once by `stop`.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Pause flag receiver for loop contexts.
    pub fn pause_receiver(&self) -> watch::Receiver<bool> {
        self.pause_rx.clone()
    }

    pub fn spawn_camera(&mut self, ctx: CameraLoopContext) {
        self.spawn("camera", tokio::spawn(camera_loop(ctx)));
    }

    pub fn spawn_screen(&mut self, ctx: ScreenLoopContext) {
        self.spawn("screen", tokio::spawn(screen_loop(ctx)));
    }

    fn spawn(&mut self, name: &'static str, handle: JoinHandle<()>) {
        self.handles.push((name, handle));
    }

    /// Flips the pause flag; loops keep ticking but skip their external
    /// calls while it is set.
    pub fn set_paused(&self, paused: bool) {
        self.pause_tx.send_replace(paused);
    }

    /// Cancels every loop and waits for each to finish, bounded by the
    /// join timeout. A loop that fails to stop in time is abandoned
    /// with a warning rather than blocking teardown.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        for (name, handle) in self.handles.drain(..) {
            match tokio::time::timeout(self.join_timeout, handle).await {
                Ok(Ok(())) => log_info!("{} loop stopped", name),
                Ok(Err(e)) => log_warn!("{} loop task failed: {}", name, e),
                Err(_) => log_warn!(
                    "{} loop did not stop within {:?}, abandoning",
                    name,
                    self.join_timeout
                ),
            }
        }
    }
}
