//! End-to-end engine tests with fake collaborators: scripted camera scenes,
//! a scriptable active window, an in-memory remote ledger, and recording
//! callbacks. Everything runs against a temporary data directory.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tempfile::TempDir;

use deskwatch::db::HistoryDb;
use deskwatch::{
    CameraFeed, CameraFrame, ClassifyError, CredentialStore, DetectionSample, EngineCallbacks,
    EngineConfig, EngineDeps, GadgetKind, JsonReportWriter, MonitoringMode, PermissionGate,
    PermissionState, RemoteBalance, RemoteLedger, SessionEngine, SessionRecord, SessionStatus,
    SessionSummary, VisionClassifier, VisionProvider, WindowInspector, WindowSnapshot,
};

struct TestCamera;

impl CameraFeed for TestCamera {
    fn grab_frame(&self) -> anyhow::Result<CameraFrame> {
        Ok(CameraFrame {
            data: vec![0u8; 16],
            captured_at: Utc::now(),
        })
    }
}

/// Classifier that reports whatever scene the test has staged.
#[derive(Clone)]
struct SceneClassifier {
    scene: Arc<Mutex<DetectionSample>>,
    calls: Arc<AtomicUsize>,
}

impl SceneClassifier {
    fn focused() -> Self {
        Self {
            scene: Arc::new(Mutex::new(DetectionSample::safe_default(Utc::now()))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn set_gadget(&self, visible: bool) {
        let mut scene = self.scene.lock().unwrap();
        scene.gadget_visible = visible;
        scene.gadget_confidence = if visible { 0.95 } else { 0.0 };
        scene.distraction_type = if visible {
            GadgetKind::Phone
        } else {
            GadgetKind::None
        };
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VisionClassifier for SceneClassifier {
    fn classify(&self, _frame: CameraFrame) -> Result<DetectionSample, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut sample = self.scene.lock().unwrap().clone();
        sample.sampled_at = Utc::now();
        Ok(sample)
    }
}

/// Active-window source the test can flip between apps.
#[derive(Clone, Default)]
struct Desktop {
    window: Arc<Mutex<Option<WindowSnapshot>>>,
}

impl Desktop {
    fn show(&self, app: &str, title: &str, url: Option<&str>) {
        *self.window.lock().unwrap() = Some(WindowSnapshot {
            app_name: app.to_string(),
            window_title: title.to_string(),
            url: url.map(str::to_string),
        });
    }

    fn clear(&self) {
        *self.window.lock().unwrap() = None;
    }
}

impl WindowInspector for Desktop {
    fn active_window(&self) -> anyhow::Result<Option<WindowSnapshot>> {
        Ok(self.window.lock().unwrap().clone())
    }
}

struct Granted;

impl PermissionGate for Granted {
    fn camera_permission(&self) -> PermissionState {
        PermissionState::Granted
    }
    fn screen_permission(&self) -> PermissionState {
        PermissionState::Granted
    }
}

struct Keyed;

impl CredentialStore for Keyed {
    fn has_credential(&self, _provider: VisionProvider) -> bool {
        true
    }
}

struct MemoryLedger {
    granted: i64,
    used: i64,
    recorded: Arc<Mutex<Vec<i64>>>,
}

impl RemoteLedger for MemoryLedger {
    fn fetch_balance(&self) -> anyhow::Result<RemoteBalance> {
        Ok(RemoteBalance {
            granted_seconds: self.granted,
            used_seconds: self.used,
        })
    }

    fn record(&self, seconds: i64) -> anyhow::Result<bool> {
        self.recorded.lock().unwrap().push(seconds);
        Ok(true)
    }
}

/// Collects every callback the engine fires.
#[derive(Clone, Default)]
struct Recorder {
    statuses: Arc<Mutex<Vec<(String, String)>>>,
    alerts: Arc<Mutex<Vec<(usize, String)>>>,
    errors: Arc<Mutex<Vec<(String, String)>>>,
    ended: Arc<Mutex<Vec<SessionSummary>>>,
}

impl Recorder {
    fn callbacks(&self) -> EngineCallbacks {
        let statuses = self.statuses.clone();
        let alerts = self.alerts.clone();
        let errors = self.errors.clone();
        let ended = self.ended.clone();
        EngineCallbacks {
            on_status_change: Some(Arc::new(move |kind, label| {
                statuses
                    .lock()
                    .unwrap()
                    .push((kind.to_string(), label.to_string()));
            })),
            on_session_ended: Some(Arc::new(move |summary| {
                ended.lock().unwrap().push(summary.clone());
            })),
            on_error: Some(Arc::new(move |kind, message| {
                errors
                    .lock()
                    .unwrap()
                    .push((kind.to_string(), message.to_string()));
            })),
            on_alert: Some(Arc::new(move |level, badge, _message| {
                alerts.lock().unwrap().push((level, badge.to_string()));
            })),
        }
    }

    fn kinds(&self) -> Vec<String> {
        self.statuses
            .lock()
            .unwrap()
            .iter()
            .map(|(kind, _)| kind.clone())
            .collect()
    }
}

struct Harness {
    engine: SessionEngine,
    classifier: SceneClassifier,
    desktop: Desktop,
    recorder: Recorder,
    recorded_usage: Arc<Mutex<Vec<i64>>>,
    _dir: TempDir,
}

fn harness(tweak: impl FnOnce(&mut EngineConfig)) -> Harness {
    deskwatch::utils::logging::init();
    let dir = tempfile::tempdir().unwrap();
    let mut config = EngineConfig::new(dir.path().to_path_buf());
    config.detection_fps = 50.0;
    config.screen_check_interval = Duration::from_millis(20);
    config.capture_timeout = Duration::from_millis(500);
    config.classify_timeout = Duration::from_millis(500);
    config.stop_join_timeout = Duration::from_secs(1);
    tweak(&mut config);

    let classifier = SceneClassifier::focused();
    let desktop = Desktop::default();
    let recorder = Recorder::default();
    let recorded_usage = Arc::new(Mutex::new(Vec::new()));
    let reports_dir = config.reports_dir();

    let deps = EngineDeps {
        camera: Arc::new(TestCamera),
        classifier: Arc::new(classifier.clone()),
        windows: Arc::new(desktop.clone()),
        permissions: Arc::new(Granted),
        credentials: Arc::new(Keyed),
        remote: Some(Arc::new(MemoryLedger {
            granted: 3600,
            used: 0,
            recorded: recorded_usage.clone(),
        })),
        reports: Some(Arc::new(JsonReportWriter::new(reports_dir))),
    };
    let engine = SessionEngine::new(config, deps, recorder.callbacks()).unwrap();

    Harness {
        engine,
        classifier,
        desktop,
        recorder,
        recorded_usage,
        _dir: dir,
    }
}

async fn wait_for_kind(engine: &SessionEngine, kind: &str) {
    for _ in 0..200 {
        if engine.get_status().status_kind == kind {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "engine never reached status '{}' (still '{}')",
        kind,
        engine.get_status().status_kind
    );
}

async fn wait_until(what: &str, mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for {}", what);
}

#[tokio::test]
async fn full_session_lifecycle_with_detections() {
    let h = harness(|_| {});

    h.engine.start_session().await.unwrap();
    wait_for_kind(&h.engine, "focused").await;
    assert!(h.engine.get_status().is_running);

    // Phone comes out: the camera flags a gadget.
    h.classifier.set_gadget(true);
    wait_for_kind(&h.engine, "gadget").await;

    // A blocked site outranks the gadget.
    h.desktop
        .show("Google Chrome", "Home - Netflix", Some("https://www.netflix.com/browse"));
    wait_for_kind(&h.engine, "screen").await;
    let status = h.engine.get_status();
    assert_eq!(status.status_label, "Website: netflix.com");

    // Back to work.
    h.classifier.set_gadget(false);
    h.desktop.clear();
    wait_for_kind(&h.engine, "focused").await;

    // Pause stops the classifier from being called.
    assert!(h.engine.pause_session());
    assert_eq!(h.engine.get_status().status_kind, "paused");
    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = h.classifier.calls();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(h.classifier.calls(), settled);

    assert!(h.engine.resume_session());
    wait_until("classifier calls to resume", || h.classifier.calls() > settled).await;

    let outcome = h.engine.stop_session().await.unwrap();
    let summary = &outcome.summary;
    assert!(summary.active_seconds > 0.0);
    assert!(summary.paused_seconds >= 0.1);
    assert!(summary.gadget_detections >= 1);
    assert!(summary.screen_detections >= 1);
    assert!(summary.stats.total_seconds > 0.0);

    // Report written and remembered.
    let report = outcome.report_path.clone().expect("report should exist");
    assert!(report.exists());
    assert_eq!(h.engine.last_report_path(), Some(report));

    // History row and timeline persisted.
    let rows = h.engine.recent_sessions(10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, SessionStatus::Completed);
    assert_eq!(rows[0].id, summary.session_id);
    let events = h.engine.session_events(&summary.session_id).await.unwrap();
    assert!(events.len() >= 3);

    // Usage reported to the remote ledger.
    let recorded = h.recorded_usage.lock().unwrap().clone();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0] >= 1);

    // Callback trail: booting first, idle last, exactly one session end,
    // no errors.
    let kinds = h.recorder.kinds();
    assert_eq!(kinds.first().map(String::as_str), Some("booting"));
    assert_eq!(kinds.last().map(String::as_str), Some("idle"));
    assert!(kinds.contains(&"gadget".to_string()));
    assert!(kinds.contains(&"screen".to_string()));
    assert_eq!(h.recorder.ended.lock().unwrap().len(), 1);
    assert!(h.recorder.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn screen_only_mode_never_touches_the_camera() {
    let h = harness(|_| {});
    assert!(h.engine.set_monitoring_mode(MonitoringMode::ScreenOnly));
    h.desktop
        .show("Google Chrome", "trending - YouTube", Some("https://youtube.com/feed"));

    h.engine.start_session().await.unwrap();
    wait_for_kind(&h.engine, "screen").await;
    assert_eq!(h.engine.get_status().status_label, "Website: youtube.com");

    h.desktop.clear();
    wait_for_kind(&h.engine, "focused").await;

    let outcome = h.engine.stop_session().await.unwrap();
    assert!(outcome.summary.screen_detections >= 1);
    assert_eq!(outcome.summary.gadget_detections, 0);
    assert_eq!(h.classifier.calls(), 0);
}

#[tokio::test]
async fn pause_time_is_excluded_from_active_seconds() {
    let h = harness(|_| {});
    h.engine.start_session().await.unwrap();
    wait_for_kind(&h.engine, "focused").await;

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(h.engine.pause_session());
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(h.engine.resume_session());
    tokio::time::sleep(Duration::from_millis(200)).await;

    let outcome = h.engine.stop_session().await.unwrap();
    let summary = &outcome.summary;
    assert!(summary.paused_seconds >= 0.2);
    assert!(summary.active_seconds > 0.0);
    // Wall duration splits exactly into active and paused time.
    let drift = summary.duration_seconds - summary.active_seconds - summary.paused_seconds;
    assert!(drift.abs() < 0.05, "accounting drift of {drift}s");

    let events = h.engine.session_events(&summary.session_id).await.unwrap();
    let paused_total: f64 = events
        .iter()
        .filter(|event| event.state.as_str() == "paused")
        .map(|event| event.duration_seconds)
        .sum();
    assert!(paused_total >= 0.2);
}

#[tokio::test]
async fn budget_exhaustion_stops_the_session_and_locks_the_engine() {
    // Built by hand rather than through `harness`: no remote ledger, so the
    // one-second local grant stands.
    let dir = tempfile::tempdir().unwrap();
    let mut config = EngineConfig::new(dir.path().to_path_buf());
    config.detection_fps = 50.0;
    config.screen_check_interval = Duration::from_millis(20);
    config.stop_join_timeout = Duration::from_secs(1);
    config.initial_grant_seconds = 1;
    let recorder = Recorder::default();
    let deps = EngineDeps {
        camera: Arc::new(TestCamera),
        classifier: Arc::new(SceneClassifier::focused()),
        windows: Arc::new(Desktop::default()),
        permissions: Arc::new(Granted),
        credentials: Arc::new(Keyed),
        remote: None,
        reports: None,
    };
    let engine = SessionEngine::new(config, deps, recorder.callbacks()).unwrap();

    engine.start_session().await.unwrap();
    wait_until("auto-stop on exhaustion", || !engine.get_status().is_running).await;

    let status = engine.get_status();
    assert!(status.is_locked);
    assert_eq!(status.status_kind, "locked");
    assert_eq!(engine.remaining_budget_seconds(), 0);
    assert!(recorder.kinds().contains(&"locked".to_string()));
    assert_eq!(recorder.ended.lock().unwrap().len(), 1);

    // The partial session still made it into history.
    let rows = engine.recent_sessions(10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, SessionStatus::Completed);

    // Restarting is rejected until more time is granted.
    let err = engine.start_session().await.unwrap_err();
    assert_eq!(err.kind(), "time_exhausted");
    engine.grant_extension(600).unwrap();
    engine.start_session().await.unwrap();
    engine.stop_session().await.unwrap();
}

#[tokio::test]
async fn interrupted_sessions_are_recovered_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path()).unwrap();
    let db_path = dir.path().join("history.db");

    // Simulate a crash: a session row left in Running state.
    {
        let db = HistoryDb::open(db_path).unwrap();
        db.insert_session(&SessionRecord {
            id: "crashed-session".to_string(),
            started_at: Utc::now(),
            ended_at: None,
            status: SessionStatus::Running,
            monitoring_mode: MonitoringMode::Both,
            active_seconds: 0.0,
            paused_seconds: 0.0,
            gadget_detections: 0,
            screen_detections: 0,
        })
        .await
        .unwrap();
    }

    let config = EngineConfig::new(dir.path().to_path_buf());
    let deps = EngineDeps {
        camera: Arc::new(TestCamera),
        classifier: Arc::new(SceneClassifier::focused()),
        windows: Arc::new(Desktop::default()),
        permissions: Arc::new(Granted),
        credentials: Arc::new(Keyed),
        remote: None,
        reports: None,
    };
    let engine = SessionEngine::new(config, deps, EngineCallbacks::default()).unwrap();

    assert_eq!(engine.recover_interrupted_sessions().await.unwrap(), 1);
    let rows = engine.recent_sessions(10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, SessionStatus::Interrupted);

    // Idempotent: nothing left to recover.
    assert_eq!(engine.recover_interrupted_sessions().await.unwrap(), 0);
}
