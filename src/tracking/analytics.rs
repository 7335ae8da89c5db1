//! Session statistics: per-state totals, timeline consolidation, and display
//! formatting. All math stays in float seconds; truncation to whole units
//! happens only when formatting for display.

use crate::models::activity::ActivityState;
use crate::models::session::{ConsolidatedEvent, SessionStats};
use crate::tracking::timeline::TimelineEvent;

/// Sum a finalized event list into per-state totals.
///
/// Screen distraction counts as active time (the user is at the desk, just
/// distracted); paused time sits outside the active total.
pub fn compute_statistics(events: &[TimelineEvent]) -> SessionStats {
    let mut present = 0.0;
    let mut away = 0.0;
    let mut gadget = 0.0;
    let mut screen = 0.0;
    let mut paused = 0.0;

    for event in events {
        match event.state {
            ActivityState::Present => present += event.duration_seconds,
            ActivityState::Away => away += event.duration_seconds,
            ActivityState::GadgetSuspected => gadget += event.duration_seconds,
            ActivityState::ScreenDistraction => screen += event.duration_seconds,
            ActivityState::Paused => paused += event.duration_seconds,
        }
    }

    let active = present + away + gadget + screen;
    let distracted = away + gadget + screen;

    SessionStats {
        total_seconds: active + paused,
        present_seconds: present,
        away_seconds: away,
        gadget_seconds: gadget,
        screen_distraction_seconds: screen,
        paused_seconds: paused,
        active_seconds: active,
        distracted_seconds: distracted,
        events: consolidate_events(events),
    }
}

/// Merge consecutive same-state events into single rows for the report
/// timeline. Reduces flicker noise without changing totals.
pub fn consolidate_events(events: &[TimelineEvent]) -> Vec<ConsolidatedEvent> {
    let mut merged: Vec<ConsolidatedEvent> = Vec::new();

    for event in events {
        match merged.last_mut() {
            Some(last) if last.state == event.state => {
                last.end = event.end;
                last.duration_seconds += event.duration_seconds;
            }
            _ => merged.push(ConsolidatedEvent {
                state: event.state,
                label: event.state.display_label().to_string(),
                start: event.start,
                end: event.end,
                duration_seconds: event.duration_seconds,
            }),
        }
    }

    merged
}

/// Render seconds as `"1 hr 2 mins"` style text.
///
/// Compact by default: seconds are omitted once hours appear. With
/// `full_precision` every component down to seconds is shown, including
/// zeros, for report tables that need exact values.
pub fn format_duration(seconds: f64, full_precision: bool) -> String {
    let total = if seconds >= 0.0 { seconds as u64 } else { 0 };

    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    let mut parts: Vec<String> = Vec::new();

    if hours > 0 {
        parts.push(format!("{} {}", hours, if hours == 1 { "hr" } else { "hrs" }));
    }
    if mins > 0 || (full_precision && hours > 0) {
        parts.push(format!("{} {}", mins, if mins == 1 { "min" } else { "mins" }));
    }
    if (secs > 0 || full_precision) && (hours == 0 || full_precision) {
        parts.push(format!("{} {}", secs, if secs == 1 { "sec" } else { "secs" }));
    }

    if parts.is_empty() {
        "0 sec".to_string()
    } else {
        parts.join(" ")
    }
}

/// Present time as a share of active time, in percent. Paused time is
/// excluded from both sides, so the result always lands in [0, 100].
pub fn focus_percentage(stats: &SessionStats) -> f64 {
    if stats.active_seconds <= 0.0 {
        return 0.0;
    }
    let pct = stats.present_seconds / stats.active_seconds * 100.0;
    pct.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn event(state: ActivityState, start: i64, end: i64) -> TimelineEvent {
        TimelineEvent {
            state,
            start: t(start),
            end: t(end),
            duration_seconds: (end - start) as f64,
        }
    }

    #[test]
    fn statistics_sum_by_state() {
        let events = vec![
            event(ActivityState::Present, 0, 60),
            event(ActivityState::Away, 60, 90),
            event(ActivityState::Paused, 90, 120),
            event(ActivityState::Present, 120, 150),
            event(ActivityState::ScreenDistraction, 150, 170),
            event(ActivityState::GadgetSuspected, 170, 180),
        ];
        let stats = compute_statistics(&events);

        assert_eq!(stats.present_seconds, 90.0);
        assert_eq!(stats.away_seconds, 30.0);
        assert_eq!(stats.paused_seconds, 30.0);
        assert_eq!(stats.screen_distraction_seconds, 20.0);
        assert_eq!(stats.gadget_seconds, 10.0);
        assert_eq!(stats.active_seconds, 150.0);
        assert_eq!(stats.distracted_seconds, 60.0);
        assert_eq!(stats.total_seconds, 180.0);
    }

    #[test]
    fn empty_event_list_yields_zeroes() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats.total_seconds, 0.0);
        assert!(stats.events.is_empty());
        assert_eq!(focus_percentage(&stats), 0.0);
    }

    #[test]
    fn consolidation_merges_consecutive_runs() {
        let events = vec![
            event(ActivityState::Present, 0, 10),
            event(ActivityState::Present, 10, 25),
            event(ActivityState::Away, 25, 30),
            event(ActivityState::Present, 30, 40),
        ];
        let merged = consolidate_events(&events);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].state, ActivityState::Present);
        assert_eq!(merged[0].start, t(0));
        assert_eq!(merged[0].end, t(25));
        assert_eq!(merged[0].duration_seconds, 25.0);
        assert_eq!(merged[1].state, ActivityState::Away);
        assert_eq!(merged[2].start, t(30));
        assert_eq!(merged[2].label, "Focused");
    }

    #[test]
    fn duration_formatting_compact() {
        assert_eq!(format_duration(0.0, false), "0 sec");
        assert_eq!(format_duration(1.0, false), "1 sec");
        assert_eq!(format_duration(45.0, false), "45 secs");
        assert_eq!(format_duration(90.0, false), "1 min 30 secs");
        assert_eq!(format_duration(3725.0, false), "1 hr 2 mins");
        assert_eq!(format_duration(7200.0, false), "2 hrs");
        assert_eq!(format_duration(-5.0, false), "0 sec");
    }

    #[test]
    fn duration_formatting_full_precision() {
        assert_eq!(format_duration(3725.0, true), "1 hr 2 mins 5 secs");
        assert_eq!(format_duration(7200.0, true), "2 hrs 0 mins 0 secs");
        assert_eq!(format_duration(59.9, true), "59 secs");
    }

    #[test]
    fn focus_percentage_excludes_pauses_and_clamps() {
        let events = vec![
            event(ActivityState::Present, 0, 75),
            event(ActivityState::Away, 75, 100),
            event(ActivityState::Paused, 100, 400),
        ];
        let stats = compute_statistics(&events);
        assert_eq!(focus_percentage(&stats), 75.0);

        let all_present = compute_statistics(&[event(ActivityState::Present, 0, 50)]);
        assert_eq!(focus_percentage(&all_present), 100.0);
    }
}
