//! Tamper-evident usage budget.
//!
//! Tracks cumulative active seconds consumed against a granted allotment,
//! persisted as JSON with a salted integrity hash over the accounting fields.
//! A record that fails verification is treated as fully consumed rather than
//! trusted or rejected: the budget fails closed.

const ENABLE_LOGS: bool = true;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UsageError;
use crate::{log_info, log_warn};

/// Salt mixed into the integrity hash so a hand-edited file cannot simply
/// recompute its own hash from the visible fields.
const INTEGRITY_SALT: &[u8] = b"deskwatch_v1_\x7f\x3a\x9c\x42";

/// Persisted budget accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageBudgetRecord {
    pub total_used_seconds: i64,
    pub total_granted_seconds: i64,
    pub extensions_granted: u32,
    pub first_use: Option<DateTime<Utc>>,
    pub last_session_end: Option<DateTime<Utc>>,
    #[serde(rename = "_integrity", default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

impl UsageBudgetRecord {
    fn fresh(granted: i64) -> Self {
        Self {
            total_used_seconds: 0,
            total_granted_seconds: granted,
            extensions_granted: 0,
            first_use: None,
            last_session_end: None,
            integrity: None,
        }
    }
}

/// Balance held by the remote ledger; replaces local accounting wholesale on
/// a successful sync (remote is the source of truth).
#[derive(Debug, Clone, Copy)]
pub struct RemoteBalance {
    pub granted_seconds: i64,
    pub used_seconds: i64,
}

/// Best-effort remote accounting. Implementations bound their own latency;
/// every call is optional and failure-tolerant.
pub trait RemoteLedger: Send + Sync {
    fn fetch_balance(&self) -> Result<RemoteBalance>;
    fn record(&self, seconds: i64) -> Result<bool>;
}

/// Local budget store. One instance per engine, injected at construction.
#[derive(Debug)]
pub struct UsageBudget {
    path: PathBuf,
    record: UsageBudgetRecord,
    tampered: bool,
}

impl UsageBudget {
    /// Load the budget from `path`, granting `initial_grant_seconds` to a
    /// fresh install. An unreadable or integrity-failed file marks the
    /// budget tampered.
    pub fn load(path: PathBuf, initial_grant_seconds: i64) -> Self {
        if !path.exists() {
            return Self {
                path,
                record: UsageBudgetRecord::fresh(initial_grant_seconds),
                tampered: false,
            };
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<UsageBudgetRecord>(&contents) {
                Ok(record) => {
                    let tampered = !verify_integrity(&record);
                    if tampered {
                        log_warn!("usage record integrity check failed, treating budget as exhausted");
                    }
                    Self { path, record, tampered }
                }
                Err(err) => {
                    log_warn!("usage record unreadable ({}), treating budget as exhausted", err);
                    Self {
                        path,
                        record: UsageBudgetRecord::fresh(initial_grant_seconds),
                        tampered: true,
                    }
                }
            },
            Err(err) => {
                log_warn!("usage record unreadable ({}), treating budget as exhausted", err);
                Self {
                    path,
                    record: UsageBudgetRecord::fresh(initial_grant_seconds),
                    tampered: true,
                }
            }
        }
    }

    /// Seconds left to consume. Zero for a tampered record regardless of the
    /// stored values.
    pub fn remaining_seconds(&self) -> i64 {
        if self.tampered {
            return 0;
        }
        (self.record.total_granted_seconds - self.record.total_used_seconds).max(0)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_seconds() <= 0
    }

    pub fn was_tampered(&self) -> bool {
        self.tampered
    }

    pub fn granted_seconds(&self) -> i64 {
        self.record.total_granted_seconds
    }

    pub fn used_seconds(&self) -> i64 {
        self.record.total_used_seconds
    }

    pub fn extensions_granted(&self) -> u32 {
        self.record.extensions_granted
    }

    /// Add consumed seconds and persist. Rejects negative amounts; the first
    /// successful call stamps `first_use`.
    pub fn record_usage(&mut self, seconds: i64) -> Result<(), UsageError> {
        if seconds < 0 {
            return Err(UsageError::InvalidArgument(seconds));
        }
        if self.record.first_use.is_none() {
            self.record.first_use = Some(Utc::now());
        }
        self.record.total_used_seconds += seconds;
        self.save()
    }

    /// Stamp the end of a session.
    pub fn mark_session_end(&mut self) -> Result<(), UsageError> {
        self.record.last_session_end = Some(Utc::now());
        self.save()
    }

    /// Replace local accounting with the remote balance. Clears the tampered
    /// flag: the remote ledger is authoritative.
    pub fn apply_remote_balance(&mut self, balance: RemoteBalance) -> Result<(), UsageError> {
        log_info!(
            "remote balance applied: granted {}s, used {}s (local was {}s/{}s)",
            balance.granted_seconds,
            balance.used_seconds,
            self.record.total_granted_seconds,
            self.record.total_used_seconds
        );
        self.record.total_granted_seconds = balance.granted_seconds;
        self.record.total_used_seconds = balance.used_seconds;
        self.tampered = false;
        self.save()
    }

    /// Fetch the remote balance and apply it. Best-effort: failure keeps the
    /// local cache and returns false.
    pub fn sync_with_remote(&mut self, ledger: &dyn RemoteLedger) -> bool {
        match ledger.fetch_balance() {
            Ok(balance) => self.apply_remote_balance(balance).is_ok(),
            Err(err) => {
                log_info!("remote balance unavailable, using local cache ({})", err);
                false
            }
        }
    }

    /// Grant additional seconds. A legitimate re-grant also restores a
    /// tampered record to good standing.
    pub fn grant_extension(&mut self, seconds: i64) -> Result<(), UsageError> {
        if self.tampered {
            log_info!("clearing tampered state on extension grant");
            self.tampered = false;
        }
        self.record.total_granted_seconds += seconds.max(0);
        self.record.extensions_granted += 1;
        self.save()
    }

    fn save(&mut self) -> Result<(), UsageError> {
        self.record.integrity = Some(integrity_hash(&self.record));
        write_atomic(&self.path, &self.record).map_err(|e| UsageError::Persist(e.to_string()))
    }
}

/// Serialize then write-temp-and-rename so a crash mid-write can never leave
/// a half-written record behind.
fn write_atomic(path: &Path, record: &UsageBudgetRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = serde_json::to_string_pretty(record)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serialized)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Canonical form hashed for integrity: the four accounting fields in fixed
/// order. `last_session_end` is informational and deliberately excluded.
#[derive(Serialize)]
struct CanonicalFields<'a> {
    extensions_granted: u32,
    first_use: Option<&'a DateTime<Utc>>,
    total_granted_seconds: i64,
    total_used_seconds: i64,
}

fn integrity_hash(record: &UsageBudgetRecord) -> String {
    let canonical = CanonicalFields {
        extensions_granted: record.extensions_granted,
        first_use: record.first_use.as_ref(),
        total_granted_seconds: record.total_granted_seconds,
        total_used_seconds: record.total_used_seconds,
    };
    // Struct-field order is stable in serde_json, so this string is canonical.
    let json = serde_json::to_string(&canonical).unwrap_or_default();
    let mut input = Vec::with_capacity(INTEGRITY_SALT.len() + json.len());
    input.extend_from_slice(INTEGRITY_SALT);
    input.extend_from_slice(json.as_bytes());
    format!("{:016x}", fnv1a64(&input))
}

fn verify_integrity(record: &UsageBudgetRecord) -> bool {
    match &record.integrity {
        // Pre-integrity files are allowed through and gain a hash on the
        // next save.
        None => true,
        Some(stored) => *stored == integrity_hash(record),
    }
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut h = OFFSET;
    for &b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(PRIME);
    }
    h
}
