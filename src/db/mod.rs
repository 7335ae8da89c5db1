use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::{error, info};
use rusqlite::{params, Connection};
use tokio::sync::oneshot;

mod migrations;

use crate::models::activity::{ActivityState, MonitoringMode};
use crate::models::session::{SessionRecord, SessionStatus};
use crate::tracking::timeline::TimelineEvent;
use migrations::run_migrations;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct HistoryDbInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for HistoryDbInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to DB thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join DB thread: {join_err:?}");
            }
        }
    }
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| anyhow!("invalid datetime '{value}': {err}"))
}

fn status_from_str(value: &str) -> Result<SessionStatus> {
    SessionStatus::from_str(value).ok_or_else(|| anyhow!("unknown session status '{value}'"))
}

fn mode_from_str(value: &str) -> Result<MonitoringMode> {
    MonitoringMode::from_str(value).ok_or_else(|| anyhow!("unknown monitoring mode '{value}'"))
}

fn state_from_str(value: &str) -> Result<ActivityState> {
    ActivityState::from_str(value).ok_or_else(|| anyhow!("unknown activity state '{value}'"))
}

/// Session history store. All SQLite access happens on one dedicated
/// worker thread; async callers post closures and await the reply on a
/// oneshot channel.
#[derive(Clone)]
pub struct HistoryDb {
    inner: Arc<HistoryDbInner>,
    db_path: Arc<PathBuf>,
}

impl HistoryDb {
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("deskwatch-db".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(
                            Err(anyhow::Error::new(err).context("failed to open SQLite database")),
                        );
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }
                if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
                    error!("Failed to enable foreign keys: {err}");
                }

                let init_result =
                    run_migrations(&mut conn).context("failed to run database migrations");
                if ready_tx.send(init_result).is_err() {
                    error!("DB initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => {
                            task(&mut conn);
                        }
                        DbCommand::Shutdown => break,
                    }
                }

                info!("Database thread shutting down");
            })
            .with_context(|| "failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before signaling readiness")??;

        info!("Session history database initialized at {}", db_path.as_path().display());

        Ok(Self {
            inner: Arc::new(HistoryDbInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("DB caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to DB thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database thread terminated unexpectedly"))?
    }

    /// Inserts the row for a session that just started. The session is
    /// finalized with its totals on stop.
    pub async fn insert_session(&self, record: &SessionRecord) -> Result<()> {
        let record = record.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, started_at, ended_at, status, monitoring_mode,
                                       active_seconds, paused_seconds, gadget_detections, screen_detections)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id,
                    record.started_at.to_rfc3339(),
                    record.ended_at.as_ref().map(|dt| dt.to_rfc3339()),
                    record.status.as_str(),
                    record.monitoring_mode.as_str(),
                    record.active_seconds,
                    record.paused_seconds,
                    record.gadget_detections,
                    record.screen_detections,
                ],
            )
            .with_context(|| "failed to insert session")?;
            Ok(())
        })
        .await
    }

    pub async fn finalize_session(
        &self,
        session_id: &str,
        status: SessionStatus,
        ended_at: DateTime<Utc>,
        active_seconds: f64,
        paused_seconds: f64,
        gadget_detections: u32,
        screen_detections: u32,
    ) -> Result<()> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "UPDATE sessions
                 SET status = ?1,
                     ended_at = ?2,
                     active_seconds = ?3,
                     paused_seconds = ?4,
                     gadget_detections = ?5,
                     screen_detections = ?6
                 WHERE id = ?7",
                params![
                    status.as_str(),
                    ended_at.to_rfc3339(),
                    active_seconds,
                    paused_seconds,
                    gadget_detections,
                    screen_detections,
                    session_id,
                ],
            )
            .with_context(|| "failed to finalize session")?;
            Ok(())
        })
        .await
    }

    /// Batch-inserts the finalized timeline of a session in one
    /// transaction.
    pub async fn insert_timeline_events(
        &self,
        session_id: &str,
        events: &[TimelineEvent],
    ) -> Result<()> {
        let session_id = session_id.to_string();
        let events = events.to_vec();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO timeline_events (session_id, state, started_at, ended_at, duration_seconds)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for event in &events {
                    stmt.execute(params![
                        session_id,
                        event.state.as_str(),
                        event.start.to_rfc3339(),
                        event.end.to_rfc3339(),
                        event.duration_seconds,
                    ])?;
                }
            }
            tx.commit().with_context(|| "failed to commit timeline events")?;
            Ok(())
        })
        .await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, started_at, ended_at, status, monitoring_mode,
                        active_seconds, paused_seconds, gadget_detections, screen_detections
                 FROM sessions
                 WHERE id = ?1",
            )?;

            let mut rows = stmt.query(params![session_id])?;
            if let Some(row) = rows.next()? {
                Ok(Some(session_from_row(row)?))
            } else {
                Ok(None)
            }
        })
        .await
    }

    pub async fn list_recent_sessions(&self, limit: u32) -> Result<Vec<SessionRecord>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, started_at, ended_at, status, monitoring_mode,
                        active_seconds, paused_seconds, gadget_detections, screen_detections
                 FROM sessions
                 ORDER BY started_at DESC
                 LIMIT ?1",
            )?;

            let mut rows = stmt.query(params![limit])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(session_from_row(row)?);
            }
            Ok(sessions)
        })
        .await
    }

    pub async fn get_timeline_events(&self, session_id: &str) -> Result<Vec<TimelineEvent>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT state, started_at, ended_at, duration_seconds
                 FROM timeline_events
                 WHERE session_id = ?1
                 ORDER BY started_at ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![session_id])?;
            let mut events = Vec::new();
            while let Some(row) = rows.next()? {
                events.push(TimelineEvent {
                    state: state_from_str(&row.get::<_, String>(0)?)?,
                    start: parse_datetime(&row.get::<_, String>(1)?)?,
                    end: parse_datetime(&row.get::<_, String>(2)?)?,
                    duration_seconds: row.get(3)?,
                });
            }
            Ok(events)
        })
        .await
    }

    /// Marks sessions left in `Running` state (a crash, a kill) as
    /// interrupted. Called once when the store opens.
    pub async fn mark_stale_sessions_interrupted(&self) -> Result<usize> {
        self.execute(|conn| {
            let updated = conn.execute(
                "UPDATE sessions SET status = ?1 WHERE status = ?2",
                params![
                    SessionStatus::Interrupted.as_str(),
                    SessionStatus::Running.as_str(),
                ],
            )?;
            Ok(updated)
        })
        .await
    }
}

fn session_from_row(row: &rusqlite::Row<'_>) -> Result<SessionRecord> {
    Ok(SessionRecord {
        id: row.get(0)?,
        started_at: parse_datetime(&row.get::<_, String>(1)?)?,
        ended_at: row
            .get::<_, Option<String>>(2)?
            .map(|s| parse_datetime(&s))
            .transpose()?,
        status: status_from_str(&row.get::<_, String>(3)?)?,
        monitoring_mode: mode_from_str(&row.get::<_, String>(4)?)?,
        active_seconds: row.get(5)?,
        paused_seconds: row.get(6)?,
        gadget_detections: row.get(7)?,
        screen_detections: row.get(8)?,
    })
}
