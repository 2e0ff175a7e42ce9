use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::Deserialize;

use super::event::CalendarEvent;

/// First day of the calendar week. Every week computation in the app goes
/// through the one configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Short day names in display order.
    pub fn day_names(&self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

pub fn events_on(events: &[CalendarEvent], date: NaiveDate) -> Vec<&CalendarEvent> {
    events.iter().filter(|e| e.date == date).collect()
}

/// Events dated within `[week_start, week_end]`, both ends inclusive.
pub fn events_in_week(
    events: &[CalendarEvent],
    week_start: NaiveDate,
    week_end: NaiveDate,
) -> Vec<&CalendarEvent> {
    events
        .iter()
        .filter(|e| e.date >= week_start && e.date <= week_end)
        .collect()
}

pub fn week_bounds(date: NaiveDate, start: WeekStart) -> (NaiveDate, NaiveDate) {
    let week = date.week(start.weekday());
    (week.first_day(), week.last_day())
}

/// Events starting at or after `now`, earliest first. Equal keys keep
/// insertion order.
pub fn upcoming(
    events: &[CalendarEvent],
    now: NaiveDateTime,
    limit: usize,
) -> Vec<&CalendarEvent> {
    let threshold = (now.date(), now.time());
    let mut found: Vec<&CalendarEvent> = events
        .iter()
        .filter(|e| e.sort_key() >= threshold)
        .collect();
    found.sort_by_key(|e| e.sort_key());
    found.truncate(limit);
    found
}

pub fn next_event(events: &[CalendarEvent], now: NaiveDateTime) -> Option<&CalendarEvent> {
    let threshold = (now.date(), now.time());
    events
        .iter()
        .filter(|e| e.sort_key() >= threshold)
        .fold(None, |best: Option<&CalendarEvent>, ev| match best {
            Some(b) if b.sort_key() <= ev.sort_key() => Some(b),
            _ => Some(ev),
        })
}

/// Whole weeks covering the month of `date`, padded with days from the
/// neighbouring months.
pub fn month_grid(date: NaiveDate, start: WeekStart) -> Vec<[NaiveDate; 7]> {
    let first = date.with_day(1).unwrap_or(date);
    let last = last_day_of_month(first);
    let (mut day, _) = week_bounds(first, start);
    let (_, grid_end) = week_bounds(last, start);

    let mut weeks = Vec::new();
    while day <= grid_end {
        let mut week = [day; 7];
        for (i, slot) in week.iter_mut().enumerate() {
            *slot = day + Duration::days(i as i64);
        }
        weeks.push(week);
        day += Duration::days(7);
    }
    weeks
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::tests::{date, event, time};

    fn at(day: &str, clock: &str) -> NaiveDateTime {
        date(day).and_time(time(clock))
    }

    fn scenario() -> Vec<CalendarEvent> {
        vec![
            event("1", "2024-12-09", "09:00"),
            event("2", "2024-12-09", "14:00"),
            event("3", "2024-12-10", "11:00"),
        ]
    }

    fn ids(events: &[&CalendarEvent]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn events_on_matches_exact_day_in_insertion_order() {
        let events = scenario();
        assert_eq!(ids(&events_on(&events, date("2024-12-09"))), vec!["1", "2"]);
        assert!(events_on(&events, date("2024-12-11")).is_empty());
    }

    #[test]
    fn next_event_at_midnight_is_first_of_day() {
        let events = scenario();
        let next = next_event(&events, at("2024-12-09", "00:00")).unwrap();
        assert_eq!(next.id, "1");
    }

    #[test]
    fn next_event_skips_started_events() {
        let events = scenario();
        assert_eq!(next_event(&events, at("2024-12-09", "09:01")).unwrap().id, "2");
        assert_eq!(next_event(&events, at("2024-12-09", "14:00")).unwrap().id, "2");
        assert!(next_event(&events, at("2024-12-10", "11:01")).is_none());
    }

    #[test]
    fn next_event_tie_goes_to_first_inserted() {
        let events = vec![
            event("late", "2024-12-12", "10:00"),
            event("a", "2024-12-11", "09:00"),
            event("b", "2024-12-11", "09:00"),
        ];
        assert_eq!(next_event(&events, at("2024-12-10", "00:00")).unwrap().id, "a");
    }

    #[test]
    fn upcoming_is_sorted_stable_and_limited() {
        let events = vec![
            event("c", "2024-12-10", "11:00"),
            event("old", "2024-12-01", "08:00"),
            event("a", "2024-12-09", "14:00"),
            event("b", "2024-12-09", "14:00"),
            event("first", "2024-12-09", "09:00"),
        ];
        let now = at("2024-12-09", "12:00");
        let all = upcoming(&events, now, 10);
        assert_eq!(ids(&all), vec!["a", "b", "c"]);
        assert!(all.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()));

        assert_eq!(ids(&upcoming(&events, now, 2)), vec!["a", "b"]);
        assert!(upcoming(&events, now, 0).is_empty());
    }

    #[test]
    fn next_event_matches_upcoming_head() {
        let events = scenario();
        let cases = [
            (at("2024-12-08", "00:00"), Some("1")),
            (at("2024-12-09", "00:00"), Some("1")),
            (at("2024-12-09", "12:00"), Some("2")),
            (at("2024-12-09", "14:30"), Some("3")),
            (at("2024-12-10", "11:00"), Some("3")),
            (at("2024-12-10", "23:59"), None),
        ];
        for (now, expected) in cases {
            let head = upcoming(&events, now, 1);
            let head = head.first().map(|e| e.id.as_str());
            assert_eq!(head, expected, "upcoming at {now}");
            assert_eq!(next_event(&events, now).map(|e| e.id.as_str()), head, "next at {now}");
        }
    }

    #[test]
    fn week_bounds_sunday_start() {
        // 2024-12-11 is a Wednesday.
        let (start, end) = week_bounds(date("2024-12-11"), WeekStart::Sunday);
        assert_eq!(start, date("2024-12-08"));
        assert_eq!(end, date("2024-12-14"));

        let (start, _) = week_bounds(date("2024-12-08"), WeekStart::Sunday);
        assert_eq!(start, date("2024-12-08"));
    }

    #[test]
    fn week_bounds_monday_start() {
        let (start, end) = week_bounds(date("2024-12-08"), WeekStart::Monday);
        assert_eq!(start, date("2024-12-02"));
        assert_eq!(end, date("2024-12-08"));
    }

    #[test]
    fn events_in_week_is_inclusive() {
        let events = vec![
            event("before", "2024-12-07", "09:00"),
            event("start", "2024-12-08", "00:00"),
            event("end", "2024-12-14", "23:59"),
            event("after", "2024-12-15", "00:00"),
        ];
        let (start, end) = week_bounds(date("2024-12-10"), WeekStart::Sunday);
        assert_eq!(ids(&events_in_week(&events, start, end)), vec!["start", "end"]);
    }

    #[test]
    fn month_grid_covers_whole_weeks() {
        let grid = month_grid(date("2024-12-15"), WeekStart::Sunday);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][0], date("2024-12-01"));
        assert_eq!(grid[4][6], date("2025-01-04"));

        let grid = month_grid(date("2024-12-15"), WeekStart::Monday);
        assert_eq!(grid[0][0], date("2024-11-25"));
        assert_eq!(grid.last().unwrap()[6], date("2025-01-05"));
    }

    #[test]
    fn last_day_handles_december_and_leap_years() {
        assert_eq!(last_day_of_month(date("2024-12-03")), date("2024-12-31"));
        assert_eq!(last_day_of_month(date("2024-02-10")), date("2024-02-29"));
    }
}
