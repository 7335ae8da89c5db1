//! Per-day focus/distraction totals with midnight rollover.
//!
//! Float seconds throughout; truncation to whole units belongs to display
//! code. Writes are atomic (temp file + rename) so a crash mid-save cannot
//! corrupt the record.

const ENABLE_LOGS: bool = true;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{log_info, log_warn};

/// One calendar day of accumulated totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub focus_seconds: f64,
    pub away_seconds: f64,
    pub gadget_seconds: f64,
    pub screen_distraction_seconds: f64,
    /// away + gadget + screen; paused time never counts as distraction.
    pub distraction_seconds: f64,
}

impl DailyRecord {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            focus_seconds: 0.0,
            away_seconds: 0.0,
            gadget_seconds: 0.0,
            screen_distraction_seconds: 0.0,
            distraction_seconds: 0.0,
        }
    }
}

/// JSON-backed tracker for the current day. One instance per engine.
#[derive(Debug)]
pub struct DailyStatsTracker {
    path: PathBuf,
    record: DailyRecord,
}

impl DailyStatsTracker {
    pub fn load(path: PathBuf) -> Self {
        let today = Local::now().date_naive();
        let record = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<DailyRecord>(&contents) {
                Ok(record) => record,
                Err(err) => {
                    log_warn!("daily stats unreadable ({}), starting fresh", err);
                    DailyRecord::empty(today)
                }
            },
            Err(_) => DailyRecord::empty(today),
        };

        let mut tracker = Self { path, record };
        tracker.reset_if_new_day(today);
        tracker
    }

    /// Fold a finished session into today's totals. Rejects negative inputs
    /// and leaves the record untouched in that case.
    pub fn add_session_stats(
        &mut self,
        focus_seconds: f64,
        away_seconds: f64,
        gadget_seconds: f64,
        screen_distraction_seconds: f64,
    ) -> Result<()> {
        if focus_seconds < 0.0
            || away_seconds < 0.0
            || gadget_seconds < 0.0
            || screen_distraction_seconds < 0.0
        {
            bail!("daily stats amounts must be non-negative");
        }

        // An app left open overnight rolls over on the next write.
        self.reset_if_new_day(Local::now().date_naive());

        self.record.focus_seconds += focus_seconds;
        self.record.away_seconds += away_seconds;
        self.record.gadget_seconds += gadget_seconds;
        self.record.screen_distraction_seconds += screen_distraction_seconds;
        self.record.distraction_seconds = self.record.away_seconds
            + self.record.gadget_seconds
            + self.record.screen_distraction_seconds;

        self.save()?;
        log_info!(
            "daily totals updated: focus {:.1}s, distraction {:.1}s",
            self.record.focus_seconds,
            self.record.distraction_seconds
        );
        Ok(())
    }

    /// Current totals, rolled over first if the date changed.
    pub fn today(&mut self) -> DailyRecord {
        self.reset_if_new_day(Local::now().date_naive());
        self.record.clone()
    }

    fn reset_if_new_day(&mut self, today: NaiveDate) {
        if self.record.date != today {
            log_info!("new day ({} -> {}), resetting daily stats", self.record.date, today);
            self.record = DailyRecord::empty(today);
            if let Err(err) = self.save() {
                log_warn!("failed to persist daily stats reset: {}", err);
            }
        }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(&self.record)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serialized)
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("renaming into {}", self.path.display()))?;
        Ok(())
    }
}
