use chrono::NaiveDateTime;

use super::event::CalendarEvent;
use super::query::{events_in_week, events_on, next_event, week_bounds, WeekStart};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextEventSummary {
    Scheduled { start_time: String, title: String },
    None,
}

impl NextEventSummary {
    /// `(headline, caption)` as shown on the "Next Event" card.
    pub fn pair(&self) -> (&str, &str) {
        match self {
            NextEventSummary::Scheduled { start_time, title } => (start_time, title),
            NextEventSummary::None => ("--", "No upcoming events"),
        }
    }
}

/// Dashboard figures derived from one store snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub today_count: usize,
    pub week_count: usize,
    pub next_event: NextEventSummary,
}

impl Projection {
    pub fn compute(events: &[CalendarEvent], now: NaiveDateTime, week_start: WeekStart) -> Self {
        let today = now.date();
        let (start, end) = week_bounds(today, week_start);

        let next_event = match next_event(events, now) {
            Some(ev) => NextEventSummary::Scheduled {
                start_time: ev.start_time.format("%H:%M").to_string(),
                title: ev.title.clone(),
            },
            None => NextEventSummary::None,
        };

        Self {
            today_count: events_on(events, today).len(),
            week_count: events_in_week(events, start, end).len(),
            next_event,
        }
    }

    pub fn today_caption(&self) -> &'static str {
        if self.today_count == 0 {
            "No events today"
        } else {
            "Events scheduled"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::tests::{date, event, time};

    #[test]
    fn counts_today_week_and_next() {
        let events = vec![
            event("1", "2024-12-09", "09:00"),
            event("2", "2024-12-09", "14:00"),
            event("3", "2024-12-10", "11:00"),
            event("4", "2024-12-16", "12:00"),
        ];
        let now = date("2024-12-09").and_time(time("10:30"));
        let p = Projection::compute(&events, now, WeekStart::Sunday);
        assert_eq!(p.today_count, 2);
        assert_eq!(p.week_count, 3);
        assert_eq!(p.next_event.pair(), ("14:00", "Event 2"));
        assert_eq!(p.today_caption(), "Events scheduled");
    }

    #[test]
    fn week_count_follows_week_start() {
        // Sunday 2024-12-15 starts a new week only under the Sunday rule.
        let events = vec![event("1", "2024-12-15", "09:00"), event("2", "2024-12-10", "09:00")];
        let now = date("2024-12-15").and_time(time("08:00"));
        assert_eq!(Projection::compute(&events, now, WeekStart::Sunday).week_count, 1);
        assert_eq!(Projection::compute(&events, now, WeekStart::Monday).week_count, 2);
    }

    #[test]
    fn empty_store_uses_sentinel() {
        let now = date("2024-12-09").and_time(time("00:00"));
        let p = Projection::compute(&[], now, WeekStart::Sunday);
        assert_eq!(p.today_count, 0);
        assert_eq!(p.week_count, 0);
        assert_eq!(p.next_event, NextEventSummary::None);
        assert_eq!(p.next_event.pair(), ("--", "No upcoming events"));
        assert_eq!(p.today_caption(), "No events today");
    }

    #[test]
    fn recompute_is_idempotent() {
        let events = vec![event("1", "2024-12-09", "09:00"), event("2", "2024-12-11", "09:00")];
        let snapshot = events.clone();
        let now = date("2024-12-09").and_time(time("08:00"));
        let a = Projection::compute(&events, now, WeekStart::Monday);
        let b = Projection::compute(&events, now, WeekStart::Monday);
        assert_eq!(a, b);
        assert_eq!(events, snapshot);
    }
}
