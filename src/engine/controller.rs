//! The session engine: lifecycle state machine, coordination path, and the
//! public control surface.
//!
//! All collaborator seams (camera, classifier, window inspector, permission
//! gate, credential store, remote ledger, report generator) are trait objects
//! injected at construction, so the engine itself never touches an OS API or
//! the network directly.
//!
//! Lock order is engine state, then budget. The sensing and coordinator
//! slots are locked on their own, never while holding the state lock.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::blocklist::Blocklist;
use crate::config::{AlertThreshold, EngineConfig};
use crate::db::HistoryDb;
use crate::engine::callbacks::{distraction_label, EngineCallbacks};
use crate::engine::state::{ActiveSession, EnginePhase, EngineState};
use crate::engine::{CredentialStore, PermissionGate, PermissionState};
use crate::error::{ControlError, StartError, UsageError};
use crate::models::activity::{ActivityState, MonitoringMode};
use crate::models::session::{
    EngineStatus, SessionRecord, SessionStatus, SessionSummary, StopOutcome,
};
use crate::report::{self, ReportGenerator};
use crate::sensing::camera::CameraLoopContext;
use crate::sensing::classifier::{CameraFeed, VisionClassifier};
use crate::sensing::controller::SensingController;
use crate::sensing::resolver::resolve_activity;
use crate::sensing::screen::{ScreenLoopContext, WindowInspector};
use crate::sensing::state::DetectionCell;
use crate::sensing::{CoordinationTick, TickReceiver, TICK_CHANNEL_CAPACITY};
use crate::settings::SettingsStore;
use crate::tracking::analytics::compute_statistics;
use crate::tracking::daily::{DailyRecord, DailyStatsTracker};
use crate::tracking::timeline::TimelineEvent;
use crate::tracking::usage::{RemoteLedger, UsageBudget};

const ENABLE_LOGS: bool = true;
use crate::{log_error, log_info, log_warn};

/// Host-provided collaborators, injected once at construction.
pub struct EngineDeps {
    pub camera: Arc<dyn CameraFeed>,
    pub classifier: Arc<dyn VisionClassifier>,
    pub windows: Arc<dyn WindowInspector>,
    pub permissions: Arc<dyn PermissionGate>,
    pub credentials: Arc<dyn CredentialStore>,
    pub remote: Option<Arc<dyn RemoteLedger>>,
    pub reports: Option<Arc<dyn ReportGenerator>>,
}

/// Focus-session engine. Cheap to clone; clones share one engine.
#[derive(Clone)]
pub struct SessionEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: EngineConfig,
    deps: EngineDeps,
    callbacks: EngineCallbacks,
    state: Mutex<EngineState>,
    budget: Mutex<UsageBudget>,
    daily: Mutex<DailyStatsTracker>,
    settings: SettingsStore,
    blocklist: Arc<RwLock<Blocklist>>,
    cell: Arc<DetectionCell>,
    db: HistoryDb,
    sensing: Mutex<Option<SensingController>>,
    coordinator: Mutex<Option<JoinHandle<()>>>,
}

/// What one processed coordination tick asks the coordinator task to do
/// outside the state lock.
struct TickEffects {
    /// `(kind, label)` when the resolved status changed.
    status: Option<(String, String)>,
    /// Session row to insert; set only on the tick that starts the clock.
    record_start: Option<SessionRecord>,
    alert: Option<(usize, AlertThreshold)>,
    /// Budget crossed zero; the coordinator must spawn a stop and bail.
    exhausted: bool,
}

impl SessionEngine {
    /// Builds the engine: creates the data directory, loads the settings,
    /// budget and daily-stats stores, and opens the history database.
    /// No session is running afterwards.
    pub fn new(
        config: EngineConfig,
        deps: EngineDeps,
        callbacks: EngineCallbacks,
    ) -> anyhow::Result<Self> {
        use anyhow::Context;
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data directory {}", config.data_dir.display())
        })?;

        let settings = SettingsStore::new(config.settings_file())?;
        let budget = UsageBudget::load(config.usage_file(), config.initial_grant_seconds);
        let daily = DailyStatsTracker::load(config.daily_stats_file());
        let db = HistoryDb::open(config.history_db_file())?;
        let blocklist = Arc::new(RwLock::new(settings.blocklist()));
        let monitoring_mode = settings.monitoring_mode();

        Ok(Self {
            inner: Arc::new(EngineInner {
                config,
                deps,
                callbacks,
                state: Mutex::new(EngineState::new(monitoring_mode)),
                budget: Mutex::new(budget),
                daily: Mutex::new(daily),
                settings,
                blocklist,
                cell: Arc::new(DetectionCell::new()),
                db,
                sensing: Mutex::new(None),
                coordinator: Mutex::new(None),
            }),
        })
    }

    /// Marks sessions left `Running` by a crash as interrupted. Call once
    /// at host startup, before the first `start_session`.
    pub async fn recover_interrupted_sessions(&self) -> anyhow::Result<usize> {
        let recovered = self.inner.db.mark_stale_sessions_interrupted().await?;
        if recovered > 0 {
            log_info!("marked {} stale sessions as interrupted", recovered);
        }
        Ok(recovered)
    }

    /// Starts a focus session in the configured monitoring mode.
    ///
    /// Preconditions are checked in order: not already running, budget not
    /// exhausted (after a best-effort remote refresh), a credential present
    /// for camera modes, and the OS permissions for every source the mode
    /// uses. The logical session clock starts later, at the first
    /// successful detection sample.
    pub async fn start_session(&self) -> Result<(), StartError> {
        let inner = &self.inner;

        {
            let state = inner.state.lock().unwrap();
            if state.phase != EnginePhase::Idle {
                return Err(StartError::AlreadyRunning);
            }
        }

        // Best-effort remote refresh; offline means the local cache stands.
        if let Some(remote) = inner.deps.remote.clone() {
            match tokio::task::spawn_blocking(move || remote.fetch_balance()).await {
                Ok(Ok(balance)) => {
                    let mut budget = inner.budget.lock().unwrap();
                    if let Err(err) = budget.apply_remote_balance(balance) {
                        log_warn!("failed to persist remote balance: {}", err);
                    }
                }
                Ok(Err(err)) => log_warn!("remote balance fetch failed: {}", err),
                Err(err) => log_warn!("remote balance task failed: {}", err),
            }
        }

        let exhausted = {
            let mut state = inner.state.lock().unwrap();
            let budget = inner.budget.lock().unwrap();
            let exhausted = budget.remaining_seconds() <= 0;
            state.locked = exhausted;
            if exhausted {
                state.set_status("locked", "No Hours Remaining");
            }
            exhausted
        };
        if exhausted {
            inner.callbacks.emit_status("locked", "No Hours Remaining");
            return Err(StartError::TimeExhausted);
        }

        let mode = inner.settings.monitoring_mode();

        if mode.uses_camera() {
            if !inner.deps.credentials.has_credential(inner.config.vision_provider) {
                return Err(StartError::MissingCredential(
                    inner.config.vision_provider.as_str().to_string(),
                ));
            }
            match inner.deps.permissions.camera_permission() {
                PermissionState::Granted => {}
                PermissionState::Denied => return Err(StartError::CameraPermissionDenied),
                PermissionState::Restricted => return Err(StartError::CameraPermissionRestricted),
            }
        }
        if mode.uses_screen() {
            match inner.deps.permissions.screen_permission() {
                PermissionState::Granted => {}
                PermissionState::Denied => {
                    return Err(StartError::ScreenPermissionDenied(
                        "Enable screen recording permission in system settings and restart the app."
                            .to_string(),
                    ))
                }
                PermissionState::Restricted => {
                    return Err(StartError::ScreenPermissionDenied(
                        "Screen monitoring is restricted on this device.".to_string(),
                    ))
                }
            }
        }

        // Commit point. The phase is re-checked under the lock so two
        // concurrent starts cannot both pass the early gate.
        {
            let mut state = inner.state.lock().unwrap();
            if state.phase != EnginePhase::Idle {
                return Err(StartError::AlreadyRunning);
            }
            state.phase = EnginePhase::Running;
            state.monitoring_mode = mode;
            state.session = Some(ActiveSession::new(
                mode,
                Utc::now(),
                inner.config.alert_thresholds.clone(),
            ));
            state.set_status("booting", "Booting Up...");
        }

        // A new session must never resolve against the previous session's
        // last published samples.
        inner.cell.clear();

        // Emitted before the loops spawn so a fast first tick cannot
        // overtake it.
        inner.callbacks.emit_status("booting", "Booting Up...");

        let mut sensing = SensingController::new(inner.config.stop_join_timeout);
        let (tick_tx, tick_rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);

        if mode.uses_camera() {
            sensing.spawn_camera(CameraLoopContext {
                feed: inner.deps.camera.clone(),
                classifier: inner.deps.classifier.clone(),
                cell: inner.cell.clone(),
                ticks: tick_tx.clone(),
                cancel: sensing.cancel_token(),
                paused: sensing.pause_receiver(),
                callbacks: inner.callbacks.clone(),
                interval: inner.config.camera_interval(),
                capture_timeout: inner.config.capture_timeout,
                classify_timeout: inner.config.classify_timeout,
                retry: inner.config.retry.clone(),
                filter_config: inner.config.gadget_filter.clone(),
            });
        }
        if mode.uses_screen() {
            sensing.spawn_screen(ScreenLoopContext {
                inspector: inner.deps.windows.clone(),
                blocklist: inner.blocklist.clone(),
                cell: inner.cell.clone(),
                ticks: tick_tx.clone(),
                cancel: sensing.cancel_token(),
                paused: sensing.pause_receiver(),
                interval: inner.config.screen_check_interval,
                inspect_timeout: inner.config.capture_timeout,
                drives_coordination: mode == MonitoringMode::ScreenOnly,
            });
        }
        // Only the loops hold senders now; the channel closes when the
        // last loop exits, which ends the coordinator.
        drop(tick_tx);

        *inner.sensing.lock().unwrap() = Some(sensing);
        *inner.coordinator.lock().unwrap() = Some(tokio::spawn(coordinate(self.clone(), tick_rx)));

        log_info!("session started ({})", mode.as_str());
        Ok(())
    }

    /// Pauses the running session. Returns false (and does nothing) unless
    /// a session is running and not already paused.
    pub fn pause_session(&self) -> bool {
        let inner = &self.inner;
        {
            let mut state = inner.state.lock().unwrap();
            if state.phase != EnginePhase::Running {
                return false;
            }
            let Some(session) = state.session.as_mut() else {
                return false;
            };
            session.pause(Utc::now());
            state.phase = EnginePhase::Paused;
            state.set_status("paused", "Paused");
        }
        if let Some(sensing) = inner.sensing.lock().unwrap().as_ref() {
            sensing.set_paused(true);
        }
        inner.callbacks.emit_status("paused", "Paused");
        log_info!("session paused");
        true
    }

    /// Resumes a paused session. Returns false unless paused. The status is
    /// optimistically set to focused; the next tick re-evaluates.
    pub fn resume_session(&self) -> bool {
        let inner = &self.inner;
        {
            let mut state = inner.state.lock().unwrap();
            if state.phase != EnginePhase::Paused {
                return false;
            }
            let Some(session) = state.session.as_mut() else {
                return false;
            };
            session.resume(Utc::now());
            state.phase = EnginePhase::Running;
            state.set_status("focused", "Focussed");
        }
        if let Some(sensing) = inner.sensing.lock().unwrap().as_ref() {
            sensing.set_paused(false);
        }
        inner.callbacks.emit_status("focused", "Focussed");
        log_info!("session resumed");
        true
    }

    /// Stops the session: tears down the loops and the coordinator, closes
    /// the accounting, persists history, runs the report generator, and
    /// emits the final status plus `on_session_ended`.
    pub async fn stop_session(&self) -> Result<StopOutcome, ControlError> {
        let inner = &self.inner;

        let mut session = {
            let mut state = inner.state.lock().unwrap();
            let session = state.session.take().ok_or(ControlError::NotRunning)?;
            state.phase = EnginePhase::Idle;
            session
        };

        let end_time = Utc::now();
        session.close_pause(end_time);
        if session.started {
            session.timeline.finalize(end_time);
            if let Some(start) = session.start_time {
                let wall_seconds = (end_time - start).num_milliseconds() as f64 / 1000.0;
                session.timeline.validate_gapless(wall_seconds);
            }
        }

        // Loops first: once they exit the tick channel closes and the
        // coordinator drains out on its own.
        let sensing = inner.sensing.lock().unwrap().take();
        if let Some(sensing) = sensing {
            sensing.stop().await;
        }
        let coordinator = inner.coordinator.lock().unwrap().take();
        if let Some(mut handle) = coordinator {
            match tokio::time::timeout(inner.config.stop_join_timeout, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => log_warn!("coordinator task failed: {}", err),
                Err(_) => {
                    log_warn!(
                        "coordinator did not stop within {:?}, aborting",
                        inner.config.stop_join_timeout
                    );
                    handle.abort();
                }
            }
        }

        let active_seconds = session.active_seconds(end_time).max(0.0);
        // A started session always costs at least one second of budget.
        let usage_seconds = if session.started {
            (active_seconds as i64).max(1)
        } else {
            0
        };

        {
            let mut budget = inner.budget.lock().unwrap();
            if usage_seconds > 0 {
                if let Err(err) = budget.record_usage(usage_seconds) {
                    log_error!("failed to record usage: {}", err);
                }
            }
            if let Err(err) = budget.mark_session_end() {
                log_warn!("failed to mark session end: {}", err);
            }
        }

        if usage_seconds > 0 {
            if let Some(remote) = inner.deps.remote.clone() {
                match tokio::task::spawn_blocking(move || remote.record(usage_seconds)).await {
                    Ok(Ok(true)) => {}
                    Ok(Ok(false)) => log_warn!("remote ledger rejected the usage record"),
                    Ok(Err(err)) => log_warn!("remote usage record failed: {}", err),
                    Err(err) => log_warn!("remote usage task failed: {}", err),
                }
            }
        }

        let stats = compute_statistics(session.timeline.events());

        if session.started {
            let mut daily = inner.daily.lock().unwrap();
            if let Err(err) = daily.add_session_stats(
                stats.present_seconds,
                stats.away_seconds,
                stats.gadget_seconds,
                stats.screen_distraction_seconds,
            ) {
                log_warn!("failed to update daily stats: {}", err);
            }
        }

        let summary = SessionSummary {
            session_id: session.id.clone(),
            monitoring_mode: session.monitoring_mode,
            start_time: session.start_time,
            end_time,
            duration_seconds: session
                .start_time
                .map(|start| (end_time - start).num_milliseconds() as f64 / 1000.0)
                .unwrap_or(0.0),
            active_seconds,
            paused_seconds: session.total_paused_seconds,
            gadget_detections: session.gadget_detections,
            screen_detections: session.screen_detections,
            stats,
        };

        // The history row exists only for sessions whose clock started.
        if session.started {
            if let Err(err) = inner
                .db
                .finalize_session(
                    &session.id,
                    SessionStatus::Completed,
                    end_time,
                    active_seconds,
                    session.total_paused_seconds,
                    session.gadget_detections,
                    session.screen_detections,
                )
                .await
            {
                log_warn!("failed to finalize session row: {}", err);
            }
            if !session.timeline.events().is_empty() {
                if let Err(err) = inner
                    .db
                    .insert_timeline_events(&session.id, session.timeline.events())
                    .await
                {
                    log_warn!("failed to store session timeline: {}", err);
                }
            }
        }

        let mut report_path = None;
        if session.started {
            if let Some(reports) = inner.deps.reports.clone() {
                let for_report = summary.clone();
                match tokio::task::spawn_blocking(move || reports.generate(&for_report)).await {
                    Ok(Ok(path)) => {
                        if let Err(err) = inner.settings.set_last_report_path(Some(path.clone())) {
                            log_warn!("failed to remember report path: {}", err);
                        }
                        report_path = Some(path);
                    }
                    Ok(Err(err)) => {
                        log_error!("report generation failed: {}", err);
                        inner.callbacks.emit_error("report_error", &format!("{}", err));
                    }
                    Err(err) => {
                        log_error!("report task failed: {}", err);
                        inner.callbacks.emit_error("report_error", &format!("{}", err));
                    }
                }
            }
        }

        let (kind, label) = {
            let mut state = inner.state.lock().unwrap();
            let (kind, label) = if state.locked {
                ("locked", "No Hours Remaining")
            } else {
                ("idle", "Ready to Start")
            };
            state.set_status(kind, label);
            (kind, label)
        };
        inner.callbacks.emit_status(kind, label);
        inner.callbacks.emit_session_ended(&summary);

        log_info!(
            "session {} stopped ({:.0}s active, {:.0}s paused)",
            summary.session_id,
            summary.active_seconds,
            summary.paused_seconds
        );
        Ok(StopOutcome {
            report_path,
            summary,
        })
    }

    /// Cheap consistent status snapshot; `elapsed_seconds` is frozen while
    /// paused and zero before the clock starts.
    pub fn get_status(&self) -> EngineStatus {
        let state = self.inner.state.lock().unwrap();
        let now = Utc::now();
        let (is_running, is_paused, elapsed) = match (state.phase, state.session.as_ref()) {
            (EnginePhase::Idle, _) | (_, None) => (false, false, 0),
            (phase, Some(session)) => (
                true,
                phase == EnginePhase::Paused,
                session.elapsed_seconds(now),
            ),
        };
        EngineStatus {
            is_running,
            is_paused,
            status_kind: state.status_kind.clone(),
            status_label: state.status_label.clone(),
            elapsed_seconds: elapsed,
            monitoring_mode: state.monitoring_mode,
            is_locked: state.locked,
        }
    }

    /// Changes the monitoring mode for future sessions. Rejected (returns
    /// false) while a session is active.
    pub fn set_monitoring_mode(&self, mode: MonitoringMode) -> bool {
        {
            let mut state = self.inner.state.lock().unwrap();
            if state.phase != EnginePhase::Idle {
                return false;
            }
            state.monitoring_mode = mode;
        }
        if let Err(err) = self.inner.settings.set_monitoring_mode(mode) {
            log_warn!("failed to persist monitoring mode: {}", err);
        }
        true
    }

    /// Current blocklist selections.
    pub fn blocklist(&self) -> Blocklist {
        self.inner.blocklist.read().unwrap().clone()
    }

    /// Mutates the live blocklist and persists the result. A running screen
    /// loop sees the change on its next check.
    pub fn update_blocklist(&self, mutate: impl FnOnce(&mut Blocklist)) {
        let snapshot = {
            let mut blocklist = self.inner.blocklist.write().unwrap();
            mutate(&mut blocklist);
            blocklist.clone()
        };
        if let Err(err) = self.inner.settings.set_blocklist(snapshot) {
            log_warn!("failed to persist blocklist: {}", err);
        }
    }

    /// Remaining budget minus the live session's elapsed time, floored at
    /// zero.
    pub fn remaining_budget_seconds(&self) -> i64 {
        let state = self.inner.state.lock().unwrap();
        let budget = self.inner.budget.lock().unwrap();
        let live = state
            .session
            .as_ref()
            .map_or(0, |session| session.elapsed_seconds(Utc::now()));
        (budget.remaining_seconds() - live).max(0)
    }

    /// Grants extra budget time and clears the locked flag. Returns the new
    /// remaining total.
    pub fn grant_extension(&self, seconds: i64) -> Result<i64, UsageError> {
        let (remaining, unlocked) = {
            let mut state = self.inner.state.lock().unwrap();
            let mut budget = self.inner.budget.lock().unwrap();
            budget.grant_extension(seconds)?;
            let unlocked = state.locked;
            state.locked = false;
            if unlocked && state.phase == EnginePhase::Idle {
                state.set_status("idle", "Ready to Start");
            }
            (budget.remaining_seconds(), unlocked)
        };
        if unlocked {
            self.inner.callbacks.emit_status("idle", "Ready to Start");
        }
        log_info!("extension granted: {}s ({}s remaining)", seconds, remaining);
        Ok(remaining)
    }

    pub async fn recent_sessions(&self, limit: u32) -> anyhow::Result<Vec<SessionRecord>> {
        self.inner.db.list_recent_sessions(limit).await
    }

    pub async fn session_record(&self, session_id: &str) -> anyhow::Result<Option<SessionRecord>> {
        self.inner.db.get_session(session_id).await
    }

    pub async fn session_events(&self, session_id: &str) -> anyhow::Result<Vec<TimelineEvent>> {
        self.inner.db.get_timeline_events(session_id).await
    }

    /// Today's accumulated focus totals across sessions.
    pub fn today_stats(&self) -> DailyRecord {
        self.inner.daily.lock().unwrap().today()
    }

    /// Path of the most recent report, if the file still exists.
    pub fn last_report_path(&self) -> Option<PathBuf> {
        report::existing_report(self.inner.settings.last_report_path())
    }
}

/// Coordinator task: folds ticks from the driver loop into the session
/// state and performs the resulting IO and callbacks outside the lock.
async fn coordinate(engine: SessionEngine, mut ticks: TickReceiver) {
    log_info!("coordinator running");
    while let Some(tick) = ticks.recv().await {
        let Some(effects) = engine.inner.apply_tick(tick) else {
            continue;
        };

        if let Some(record) = &effects.record_start {
            if let Err(err) = engine.inner.db.insert_session(record).await {
                log_warn!("failed to record session start: {}", err);
            }
        }
        if let Some((kind, label)) = &effects.status {
            engine.inner.callbacks.emit_status(kind, label);
        }
        if let Some((level, threshold)) = &effects.alert {
            engine
                .inner
                .callbacks
                .emit_alert(*level, &threshold.badge, &threshold.message);
        }
        if effects.exhausted {
            // Stop joins this very task, so it has to run elsewhere.
            let engine = engine.clone();
            tokio::spawn(async move {
                if let Err(err) = engine.stop_session().await {
                    log_warn!("auto-stop after exhaustion failed: {}", err);
                }
            });
            break;
        }
    }
    log_info!("coordinator finished");
}

impl EngineInner {
    /// One coordination step under the state lock: start the clock if this
    /// is the driver's first sample, resolve the snapshot, log the
    /// transition, advance alert escalation, and project budget exhaustion.
    ///
    /// Returns `None` when the tick does not apply (not running, or the
    /// clock has not started yet).
    fn apply_tick(&self, tick: CoordinationTick) -> Option<TickEffects> {
        let mut state = self.state.lock().unwrap();
        if state.phase != EnginePhase::Running {
            return None;
        }
        let session = state.session.as_mut()?;

        let mut record_start = None;
        if tick.first_sample && !session.started {
            session.on_first_sample(tick.at);
            log_info!("session clock started by the {} source", tick.source.as_str());
            record_start = Some(SessionRecord {
                id: session.id.clone(),
                started_at: tick.at,
                ended_at: None,
                status: SessionStatus::Running,
                monitoring_mode: session.monitoring_mode,
                active_seconds: 0.0,
                paused_seconds: 0.0,
                gadget_detections: 0,
                screen_detections: 0,
            });
        }
        if !session.started {
            return None;
        }

        let snapshot = self.cell.snapshot();
        let resolved = resolve_activity(false, snapshot.camera.as_ref(), snapshot.screen.as_ref());
        session.record_state(resolved, tick.at);

        let alert = session.alerts.observe(resolved.is_unfocused(), tick.at);
        let elapsed = session.elapsed_seconds(tick.at);

        let exhausted = {
            let budget = self.budget.lock().unwrap();
            budget.remaining_seconds() - elapsed <= 0
        };
        if exhausted {
            state.locked = true;
            let changed = state.status_kind != "locked";
            state.set_status("locked", "No Hours Remaining");
            return Some(TickEffects {
                status: changed.then(|| ("locked".to_string(), "No Hours Remaining".to_string())),
                record_start,
                alert: None,
                exhausted: true,
            });
        }

        let screen_source = snapshot
            .screen
            .as_ref()
            .and_then(|sample| sample.distraction_source.as_deref());
        let (kind, label) = status_for(resolved, screen_source);
        let changed = state.status_kind != kind || state.status_label != label;
        state.set_status(&kind, &label);

        Some(TickEffects {
            status: changed.then_some((kind, label)),
            record_start,
            alert,
            exhausted: false,
        })
    }
}

/// Maps a resolved activity state to the `(status_kind, label)` pair shown
/// to the host.
fn status_for(state: ActivityState, screen_source: Option<&str>) -> (String, String) {
    match state {
        ActivityState::Present => ("focused".to_string(), "Focussed".to_string()),
        ActivityState::Away => ("away".to_string(), "Away from Desk".to_string()),
        ActivityState::GadgetSuspected => ("gadget".to_string(), "On another gadget".to_string()),
        ActivityState::ScreenDistraction => {
            ("screen".to_string(), distraction_label(screen_source))
        }
        ActivityState::Paused => ("paused".to_string(), "Paused".to_string()),
    }
}
