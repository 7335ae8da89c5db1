use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::blocklist::Blocklist;
use crate::models::activity::MonitoringMode;

/// User-facing engine settings persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub monitoring_mode: MonitoringMode,
    pub blocklist: Blocklist,
    pub last_report_path: Option<PathBuf>,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineSettings>,
}

impl SettingsStore {
    /// Loads settings from disk, falling back to defaults for a missing
    /// or unreadable file. The blocklist is normalized so blanked-out
    /// selection sets regain their defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            EngineSettings::default()
        };
        data.blocklist.normalize();

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn monitoring_mode(&self) -> MonitoringMode {
        self.data.read().unwrap().monitoring_mode
    }

    pub fn set_monitoring_mode(&self, mode: MonitoringMode) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.monitoring_mode = mode;
        self.persist(&guard)
    }

    pub fn blocklist(&self) -> Blocklist {
        self.data.read().unwrap().blocklist.clone()
    }

    pub fn set_blocklist(&self, blocklist: Blocklist) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.blocklist = blocklist;
        self.persist(&guard)
    }

    pub fn last_report_path(&self) -> Option<PathBuf> {
        self.data.read().unwrap().last_report_path.clone()
    }

    pub fn set_last_report_path(&self, path: Option<PathBuf>) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.last_report_path = path;
        self.persist(&guard)
    }

    fn persist(&self, data: &EngineSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.monitoring_mode(), MonitoringMode::Both);
        assert!(store.last_report_path().is_none());
        assert!(store.blocklist().enabled_categories.contains("social_media"));
    }

    #[test]
    fn settings_persist_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        store.set_monitoring_mode(MonitoringMode::ScreenOnly).unwrap();
        let mut blocklist = store.blocklist();
        blocklist.disable_quick_site("reddit");
        blocklist.add_custom_app("Solitaire");
        store.set_blocklist(blocklist).unwrap();
        store
            .set_last_report_path(Some(PathBuf::from("/tmp/report.html")))
            .unwrap();

        let restored = SettingsStore::new(path).unwrap();
        assert_eq!(restored.monitoring_mode(), MonitoringMode::ScreenOnly);
        let blocklist = restored.blocklist();
        assert!(!blocklist.enabled_quick_sites.contains("reddit"));
        assert_eq!(blocklist.custom_apps, vec!["Solitaire".to_string()]);
        assert_eq!(
            restored.last_report_path(),
            Some(PathBuf::from("/tmp/report.html"))
        );
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.monitoring_mode(), MonitoringMode::Both);
        assert!(!store.blocklist().enabled_quick_sites.is_empty());
    }
}
