use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::session::SessionSummary;

/// Renders a finished session into a file the user can keep. Called
/// best-effort at session stop: a failed report never fails the stop.
pub trait ReportGenerator: Send + Sync {
    fn generate(&self, summary: &SessionSummary) -> Result<PathBuf>;
}

/// Built-in generator that writes the session summary as pretty JSON
/// under a reports directory, named by session id.
pub struct JsonReportWriter {
    dir: PathBuf,
}

impl JsonReportWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ReportGenerator for JsonReportWriter {
    fn generate(&self, summary: &SessionSummary) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create reports directory {}", self.dir.display()))?;
        let path = self.dir.join(format!("session_{}.json", summary.session_id));
        let serialized = serde_json::to_string_pretty(summary)?;
        fs::write(&path, serialized)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(path)
    }
}

/// A stored last-report path is only useful while the file exists;
/// filters out reports the user has since deleted.
pub fn existing_report(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| Path::new(p).exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::MonitoringMode;
    use crate::models::session::SessionStats;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn summary() -> SessionSummary {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        SessionSummary {
            session_id: "abc123".to_string(),
            monitoring_mode: MonitoringMode::Both,
            start_time: Some(start),
            end_time: start + chrono::Duration::seconds(600),
            duration_seconds: 600.0,
            active_seconds: 570.0,
            paused_seconds: 30.0,
            gadget_detections: 1,
            screen_detections: 0,
            stats: SessionStats::default(),
        }
    }

    #[test]
    fn writes_report_named_by_session_id() {
        let dir = tempdir().unwrap();
        let writer = JsonReportWriter::new(dir.path().join("reports"));
        let path = writer.generate(&summary()).unwrap();

        assert_eq!(path.file_name().unwrap(), "session_abc123.json");
        let contents = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["sessionId"], "abc123");
        assert_eq!(parsed["gadgetDetections"], 1);
    }

    #[test]
    fn existing_report_drops_deleted_files() {
        let dir = tempdir().unwrap();
        let writer = JsonReportWriter::new(dir.path().to_path_buf());
        let path = writer.generate(&summary()).unwrap();

        assert_eq!(existing_report(Some(path.clone())), Some(path.clone()));
        fs::remove_file(&path).unwrap();
        assert_eq!(existing_report(Some(path)), None);
        assert_eq!(existing_report(None), None);
    }
}
