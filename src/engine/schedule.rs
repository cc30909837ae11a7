//! engine::schedule
//!
//! Working-hours notice.

use crate::core::config::WorkHours;
use crate::core::types::QueueTimestamp;

use super::events::{Event, EventSink};

/// Emit [`Event::OutsideWorkHours`] if `now` is outside `window`.
///
/// Advisory only: returns whether the notice was emitted and never stops
/// the caller.
pub fn check_work_hours(window: WorkHours, now: QueueTimestamp, sink: &mut dyn EventSink) -> bool {
    if window.contains(now.as_naive().time()) {
        return false;
    }
    tracing::debug!(%window, %now, "outside work hours");
    sink.emit(Event::OutsideWorkHours { now, window });
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> QueueTimestamp {
        QueueTimestamp::parse(s).unwrap()
    }

    #[test]
    fn inside_window_is_silent() {
        let mut events = Vec::new();
        assert!(!check_work_hours(
            WorkHours::default(),
            at("2025-03-03 12:00:00"),
            &mut events
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn late_night_emits_notice() {
        let mut events = Vec::new();
        assert!(check_work_hours(
            WorkHours::default(),
            at("2025-03-03 23:30:00"),
            &mut events
        ));
        assert!(matches!(events[0], Event::OutsideWorkHours { .. }));
    }

    #[test]
    fn window_edges_are_inclusive() {
        let mut events = Vec::new();
        check_work_hours(WorkHours::default(), at("2025-03-03 08:00:00"), &mut events);
        check_work_hours(WorkHours::default(), at("2025-03-03 21:00:00"), &mut events);
        assert!(events.is_empty());
    }
}
