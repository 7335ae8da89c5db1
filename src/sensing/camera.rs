use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::{GadgetFilterConfig, RetryPolicy};
use crate::engine::callbacks::EngineCallbacks;
use crate::models::sample::DetectionSample;
use crate::sensing::classifier::{backoff_delay, CameraFeed, CameraFrame, VisionClassifier};
use crate::sensing::filter::GadgetFilter;
use crate::sensing::state::DetectionCell;
use crate::sensing::{CoordinationTick, SourceKind, TickSender};

const ENABLE_LOGS: bool = true;
use crate::{log_error, log_info, log_warn};

/// Everything the camera loop needs, handed over at spawn time.
///
/// The loop owns its gadget filter: filter state never outlives the
/// session the loop was spawned for.
pub struct CameraLoopContext {
    pub feed: Arc<dyn CameraFeed>,
    pub classifier: Arc<dyn VisionClassifier>,
    pub cell: Arc<DetectionCell>,
    pub ticks: TickSender,
    pub cancel: CancellationToken,
    pub paused: watch::Receiver<bool>,
    pub callbacks: EngineCallbacks,
    pub interval: Duration,
    pub capture_timeout: Duration,
    pub classify_timeout: Duration,
    pub retry: RetryPolicy,
    pub filter_config: GadgetFilterConfig,
}

enum SampleOutcome {
    Sample(DetectionSample),
    Failed,
    Cancelled,
}

/// Camera sampling loop. Grabs a frame, classifies it, runs the gadget
/// verdict through the temporal filter, publishes the result, and sends
/// a coordination tick. The camera is always the coordination driver in
/// the modes that spawn it.
///
/// Until the first successful classification nothing is published and
/// no tick is sent, so the session clock stays unstarted while the
/// camera warms up or the classifier is unreachable.
pub async fn camera_loop(mut ctx: CameraLoopContext) {
    log_info!("camera loop starting (interval: {:?})", ctx.interval);

    let mut ticker = tokio::time::interval(ctx.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut filter = GadgetFilter::new(ctx.filter_config.clone());
    let mut clock_started = false;
    let mut fatal_reported = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if *ctx.paused.borrow() {
                    continue;
                }

                match acquire_sample(&mut ctx, &mut fatal_reported).await {
                    SampleOutcome::Sample(raw) => {
                        let gadget_visible = filter.apply(raw.gadget_visible, raw.gadget_confidence);
                        let sample = DetectionSample { gadget_visible, ..raw };
                        ctx.cell.publish_camera(sample);

                        let first_sample = !clock_started;
                        clock_started = true;
                        if !send_tick(&ctx.ticks, first_sample).await {
                            break;
                        }
                    }
                    SampleOutcome::Failed => {
                        if !clock_started {
                            // Session clock has not started: suppress the
                            // sample entirely rather than publish a default.
                            continue;
                        }
                        filter.apply(false, 0.0);
                        ctx.cell.publish_camera(DetectionSample::safe_default(Utc::now()));
                        if !send_tick(&ctx.ticks, false).await {
                            break;
                        }
                    }
                    SampleOutcome::Cancelled => break,
                }
            }
            _ = ctx.cancel.cancelled() => {
                log_info!("camera loop shutting down");
                break;
            }
        }
    }
}

async fn send_tick(ticks: &TickSender, first_sample: bool) -> bool {
    let tick = CoordinationTick {
        source: SourceKind::Camera,
        first_sample,
        at: Utc::now(),
    };
    if ticks.send(tick).await.is_err() {
        log_warn!("coordination channel closed, stopping camera loop");
        return false;
    }
    true
}

/// One capture-and-classify cycle, with bounded retries for transient
/// classifier failures. Fatal classifier errors are surfaced through
/// `on_error` once per session and then degrade to safe defaults.
async fn acquire_sample(ctx: &mut CameraLoopContext, fatal_reported: &mut bool) -> SampleOutcome {
    let frame = match tokio::time::timeout(ctx.capture_timeout, grab_frame(ctx.feed.clone())).await
    {
        Ok(Ok(frame)) => frame,
        Ok(Err(e)) => {
            log_warn!("camera capture failed: {}", e);
            return SampleOutcome::Failed;
        }
        Err(_) => {
            log_warn!("camera capture timed out after {:?}", ctx.capture_timeout);
            return SampleOutcome::Failed;
        }
    };

    let mut attempt: u32 = 0;
    loop {
        let classify = classify_frame(ctx.classifier.clone(), frame.clone());
        let failure = match tokio::time::timeout(ctx.classify_timeout, classify).await {
            Ok(Ok(sample)) => return SampleOutcome::Sample(sample),
            Ok(Err(err)) if err.is_transient() => format!("{}", err),
            Ok(Err(err)) => {
                log_error!("classifier reported a fatal error: {}", err);
                if !*fatal_reported {
                    *fatal_reported = true;
                    ctx.callbacks.emit_error("detection_error", &format!("{}", err));
                }
                return SampleOutcome::Failed;
            }
            Err(_) => format!("timed out after {:?}", ctx.classify_timeout),
        };

        attempt += 1;
        if attempt >= ctx.retry.max_attempts {
            log_warn!(
                "classification failed after {} attempts: {}",
                attempt,
                failure
            );
            return SampleOutcome::Failed;
        }

        let delay = backoff_delay(&ctx.retry, attempt - 1);
        log_warn!(
            "classification attempt {}/{} failed ({}), retrying in {:?}",
            attempt,
            ctx.retry.max_attempts,
            failure,
            delay
        );
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = ctx.cancel.cancelled() => return SampleOutcome::Cancelled,
        }
    }
}

async fn grab_frame(feed: Arc<dyn CameraFeed>) -> anyhow::Result<CameraFrame> {
    tokio::task::spawn_blocking(move || feed.grab_frame())
        .await
        .map_err(|e| anyhow::anyhow!("camera task failed: {}", e))?
}

async fn classify_frame(
    classifier: Arc<dyn VisionClassifier>,
    frame: CameraFrame,
) -> Result<DetectionSample, crate::error::ClassifyError> {
    match tokio::task::spawn_blocking(move || classifier.classify(frame)).await {
        Ok(result) => result,
        Err(e) => Err(crate::error::ClassifyError::Fatal(format!(
            "classifier task failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifyError;
    use crate::sensing::TICK_CHANNEL_CAPACITY;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    struct StaticFeed;

    impl CameraFeed for StaticFeed {
        fn grab_frame(&self) -> anyhow::Result<CameraFrame> {
            Ok(CameraFrame {
                data: vec![0u8; 4],
                captured_at: Utc::now(),
            })
        }
    }

    struct FailingFeed;

    impl CameraFeed for FailingFeed {
        fn grab_frame(&self) -> anyhow::Result<CameraFrame> {
            anyhow::bail!("device busy")
        }
    }

    /// Plays back a scripted sequence of classifier results.
    struct ScriptedClassifier {
        script: Mutex<Vec<Result<DetectionSample, ClassifyError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedClassifier {
        fn new(script: Vec<Result<DetectionSample, ClassifyError>>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl VisionClassifier for ScriptedClassifier {
        fn classify(&self, _frame: CameraFrame) -> Result<DetectionSample, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Ok(DetectionSample::safe_default(Utc::now()))
            } else {
                script.remove(0)
            }
        }
    }

    fn present_sample() -> DetectionSample {
        DetectionSample {
            person_present: true,
            at_desk: true,
            gadget_visible: false,
            gadget_confidence: 0.0,
            distraction_type: crate::models::activity::GadgetKind::None,
            sampled_at: Utc::now(),
        }
    }

    fn test_context(
        feed: Arc<dyn CameraFeed>,
        classifier: Arc<dyn VisionClassifier>,
        ticks: TickSender,
        paused: watch::Receiver<bool>,
        cancel: CancellationToken,
    ) -> CameraLoopContext {
        CameraLoopContext {
            feed,
            classifier,
            cell: Arc::new(DetectionCell::default()),
            ticks,
            cancel,
            paused,
            callbacks: EngineCallbacks::default(),
            interval: Duration::from_millis(10),
            capture_timeout: Duration::from_millis(500),
            classify_timeout: Duration::from_millis(500),
            retry: RetryPolicy {
                max_attempts: 2,
                base_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(5),
            },
            filter_config: GadgetFilterConfig::default(),
        }
    }

    #[tokio::test]
    async fn first_successful_sample_sends_first_tick() {
        let (tick_tx, mut tick_rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);
        let (_pause_tx, pause_rx) = watch::channel(false);
        let cancel = CancellationToken::new();
        let classifier = Arc::new(ScriptedClassifier::new(vec![Ok(present_sample())]));
        let ctx = test_context(
            Arc::new(StaticFeed),
            classifier,
            tick_tx,
            pause_rx,
            cancel.clone(),
        );
        let cell = ctx.cell.clone();

        let handle = tokio::spawn(camera_loop(ctx));

        let first = tick_rx.recv().await.unwrap();
        assert!(first.first_sample);
        assert_eq!(first.source, SourceKind::Camera);
        assert!(cell.snapshot().camera.is_some());

        let second = tick_rx.recv().await.unwrap();
        assert!(!second.first_sample);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn capture_failure_before_first_sample_stays_silent() {
        let (tick_tx, mut tick_rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);
        let (_pause_tx, pause_rx) = watch::channel(false);
        let cancel = CancellationToken::new();
        let classifier = Arc::new(ScriptedClassifier::new(vec![]));
        let ctx = test_context(
            Arc::new(FailingFeed),
            classifier,
            tick_tx,
            pause_rx,
            cancel.clone(),
        );
        let cell = ctx.cell.clone();

        let handle = tokio::spawn(camera_loop(ctx));
        tokio::time::sleep(Duration::from_millis(80)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert!(tick_rx.try_recv().is_err());
        assert!(cell.snapshot().camera.is_none());
    }

    #[tokio::test]
    async fn transient_failure_after_start_publishes_safe_default() {
        let (tick_tx, mut tick_rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);
        let (_pause_tx, pause_rx) = watch::channel(false);
        let cancel = CancellationToken::new();
        // One good sample, then every classification attempt fails.
        let mut script = vec![Ok(present_sample())];
        for _ in 0..8 {
            script.push(Err(ClassifyError::Transient("rate limited".into())));
        }
        let classifier = Arc::new(ScriptedClassifier::new(script));
        let ctx = test_context(
            Arc::new(StaticFeed),
            classifier,
            tick_tx,
            pause_rx,
            cancel.clone(),
        );
        let cell = ctx.cell.clone();

        let handle = tokio::spawn(camera_loop(ctx));

        let first = tick_rx.recv().await.unwrap();
        assert!(first.first_sample);
        let second = tick_rx.recv().await.unwrap();
        assert!(!second.first_sample);

        cancel.cancel();
        handle.await.unwrap();

        let snapshot = cell.snapshot().camera.unwrap();
        assert!(snapshot.person_present);
        assert!(!snapshot.gadget_visible);
    }

    #[tokio::test]
    async fn fatal_error_is_reported_once() {
        let (tick_tx, _tick_rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);
        let (_pause_tx, pause_rx) = watch::channel(false);
        let cancel = CancellationToken::new();
        let script = vec![
            Err(ClassifyError::Fatal("invalid api key".into())),
            Err(ClassifyError::Fatal("invalid api key".into())),
            Err(ClassifyError::Fatal("invalid api key".into())),
        ];
        let classifier = Arc::new(ScriptedClassifier::new(script));
        let errors = Arc::new(AtomicUsize::new(0));
        let errors_clone = errors.clone();

        let mut ctx = test_context(
            Arc::new(StaticFeed),
            classifier.clone(),
            tick_tx,
            pause_rx,
            cancel.clone(),
        );
        ctx.callbacks.on_error = Some(Arc::new(move |kind, _msg| {
            assert_eq!(kind, "detection_error");
            errors_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let handle = tokio::spawn(camera_loop(ctx));
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert!(classifier.calls() >= 3);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn paused_loop_skips_classifier_calls() {
        let (tick_tx, mut tick_rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);
        let (pause_tx, pause_rx) = watch::channel(false);
        let cancel = CancellationToken::new();
        let classifier = Arc::new(ScriptedClassifier::new(vec![]));
        let ctx = test_context(
            Arc::new(StaticFeed),
            classifier.clone(),
            tick_tx,
            pause_rx,
            cancel.clone(),
        );

        let handle = tokio::spawn(camera_loop(ctx));
        let _ = tick_rx.recv().await.unwrap();

        pause_tx.send(true).unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let paused_calls = classifier.calls();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(classifier.calls(), paused_calls);

        pause_tx.send(false).unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(classifier.calls() > paused_calls);

        cancel.cancel();
        handle.await.unwrap();
    }
}
