use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::models::session::SessionSummary;

const ENABLE_LOGS: bool = true;
use crate::log_error;

type StatusFn = dyn Fn(&str, &str) + Send + Sync;
type SessionEndedFn = dyn Fn(&SessionSummary) + Send + Sync;
type ErrorFn = dyn Fn(&str, &str) + Send + Sync;
type AlertFn = dyn Fn(usize, &str, &str) + Send + Sync;

/// Host-facing notification hooks. Every emit is fire-and-forget: a
/// panicking callback is caught and logged, never propagated into the
/// engine or the detection loops.
#[derive(Clone, Default)]
pub struct EngineCallbacks {
    /// `(status_kind, display_label)`, e.g. `("gadget", "On another gadget")`.
    pub on_status_change: Option<Arc<StatusFn>>,
    /// Fired exactly once per session, after teardown completes.
    pub on_session_ended: Option<Arc<SessionEndedFn>>,
    /// `(error_kind, message)`, e.g. `("detection_error", ...)`.
    pub on_error: Option<Arc<ErrorFn>>,
    /// `(alert_level, badge, message)` for the escalating unfocused alerts.
    pub on_alert: Option<Arc<AlertFn>>,
}

impl EngineCallbacks {
    pub fn emit_status(&self, kind: &str, label: &str) {
        if let Some(cb) = &self.on_status_change {
            guarded("on_status_change", || cb(kind, label));
        }
    }

    pub fn emit_session_ended(&self, summary: &SessionSummary) {
        if let Some(cb) = &self.on_session_ended {
            guarded("on_session_ended", || cb(summary));
        }
    }

    pub fn emit_error(&self, kind: &str, message: &str) {
        if let Some(cb) = &self.on_error {
            guarded("on_error", || cb(kind, message));
        }
    }

    pub fn emit_alert(&self, level: usize, badge: &str, message: &str) {
        if let Some(cb) = &self.on_alert {
            guarded("on_alert", || cb(level, badge, message));
        }
    }
}

fn guarded(name: &str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        log_error!("{} callback panicked, ignoring", name);
    }
}

const WEBSITE_INDICATORS: [&str; 16] = [
    ".com", ".org", ".net", ".edu", ".gov", ".io", ".co", ".tv", ".gg", ".app", ".dev", ".me",
    ".info", ".biz", ".xyz", "://",
];

const LABEL_MAX_CHARS: usize = 18;

/// Formats a blocklist pattern for the status label, e.g.
/// `"Website: netflix.com"` or `"App: Steam"`. App names are
/// title-cased and long labels are truncated with an ellipsis.
pub fn distraction_label(source: Option<&str>) -> String {
    let source = match source {
        Some(s) if !s.is_empty() => s,
        _ => "Unknown",
    };
    let lower = source.to_lowercase();
    let is_website = WEBSITE_INDICATORS.iter().any(|ind| lower.contains(ind));
    let prefix = if is_website { "Website" } else { "App" };
    let display = if is_website {
        source.to_string()
    } else {
        title_case(source)
    };

    if display.chars().count() > LABEL_MAX_CHARS {
        let truncated: String = display.chars().take(LABEL_MAX_CHARS).collect();
        format!("{}: {}...", prefix, truncated)
    } else {
        format!("{}: {}", prefix, display)
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn website_sources_keep_their_casing() {
        assert_eq!(
            distraction_label(Some("netflix.com")),
            "Website: netflix.com"
        );
        assert_eq!(distraction_label(Some("://x.com")), "Website: ://x.com");
    }

    #[test]
    fn app_sources_are_title_cased() {
        assert_eq!(distraction_label(Some("steam")), "App: Steam");
        assert_eq!(
            distraction_label(Some("league of legends")),
            "App: League Of Legends"
        );
    }

    #[test]
    fn long_labels_are_truncated() {
        let label = distraction_label(Some("some.extremely.long.domain.example.com"));
        assert_eq!(label, "Website: some.extremely.lon...");
    }

    #[test]
    fn missing_source_falls_back_to_unknown() {
        assert_eq!(distraction_label(None), "App: Unknown");
        assert_eq!(distraction_label(Some("")), "App: Unknown");
    }

    #[test]
    fn panicking_callback_is_contained() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        let callbacks = EngineCallbacks {
            on_status_change: Some(Arc::new(move |_, _| {
                fired_clone.fetch_add(1, Ordering::SeqCst);
                panic!("host bug");
            })),
            ..Default::default()
        };

        callbacks.emit_status("focused", "Focussed");
        callbacks.emit_status("away", "Away from Desk");
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn absent_callbacks_are_a_no_op() {
        let callbacks = EngineCallbacks::default();
        callbacks.emit_status("focused", "Focussed");
        callbacks.emit_error("detection_error", "boom");
        callbacks.emit_alert(0, "Focus paused", "We noticed you stepped away!");
    }
}
