use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Meeting,
    Call,
    Demo,
    Personal,
    Reminder,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Meeting,
        EventType::Call,
        EventType::Demo,
        EventType::Personal,
        EventType::Reminder,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventType::Meeting => "Meeting",
            EventType::Call => "Call",
            EventType::Demo => "Demo",
            EventType::Personal => "Personal",
            EventType::Reminder => "Reminder",
        }
    }

    /// Style token stored in `CalendarEvent::color`.
    pub fn color_token(&self) -> &'static str {
        match self {
            EventType::Meeting => "bg-blue-500",
            EventType::Call => "bg-green-500",
            EventType::Demo => "bg-purple-500",
            EventType::Personal => "bg-orange-500",
            EventType::Reminder => "bg-red-500",
        }
    }

    pub fn next(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    color: String,
}

impl CalendarEvent {
    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn duration_display(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }

    /// Ordering key shared by every chronological query.
    pub fn sort_key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.start_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Date is required")]
    MissingDate,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start time is required")]
    MissingStartTime,

    #[error("End time is required")]
    MissingEndTime,

    #[error("Invalid {field} '{value}', expected HH:MM")]
    InvalidTime { field: &'static str, value: String },

    #[error("Event type is required")]
    MissingType,
}

/// An event being filled in by the form. Nothing here is checked until
/// `build`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub event_type: Option<EventType>,
    pub location: Option<String>,
    pub attendees: Vec<String>,
}

impl EventDraft {
    /// Defaults for a freshly opened "new event" dialog.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            start_time: NaiveTime::from_hms_opt(9, 0, 0),
            end_time: NaiveTime::from_hms_opt(10, 0, 0),
            event_type: Some(EventType::Meeting),
            ..Self::default()
        }
    }

    pub fn from_event(event: &CalendarEvent) -> Self {
        Self {
            id: Some(event.id.clone()),
            title: Some(event.title.clone()),
            description: event.description.clone(),
            date: Some(event.date),
            start_time: Some(event.start_time),
            end_time: Some(event.end_time),
            event_type: Some(event.event_type),
            location: event.location.clone(),
            attendees: event.attendees.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Validate and freeze the draft. The color token is always derived from
    /// the type here. An absent id is left empty for the store to assign.
    pub fn build(self) -> Result<CalendarEvent, ValidationError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ValidationError::MissingTitle)?;
        let date = self.date.ok_or(ValidationError::MissingDate)?;
        let start_time = self.start_time.ok_or(ValidationError::MissingStartTime)?;
        let end_time = self.end_time.ok_or(ValidationError::MissingEndTime)?;
        let event_type = self.event_type.ok_or(ValidationError::MissingType)?;

        let attendees = self
            .attendees
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        Ok(CalendarEvent {
            id: self.id.unwrap_or_default(),
            title,
            description: non_blank(self.description),
            date,
            start_time,
            end_time,
            event_type,
            location: non_blank(self.location),
            attendees,
            color: event_type.color_token().to_string(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ValidationError::MissingDate);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

pub fn parse_time(field: &'static str, s: &str) -> Result<Option<NaiveTime>, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(s, "%H:%M")
        .map(Some)
        .map_err(|_| ValidationError::InvalidTime {
            field,
            value: s.to_string(),
        })
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub(crate) fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    /// A built event with the given id, date and start time.
    pub(crate) fn event(id: &str, day: &str, start: &str) -> CalendarEvent {
        EventDraft {
            id: Some(id.to_string()),
            title: Some(format!("Event {}", id)),
            date: Some(date(day)),
            start_time: Some(time(start)),
            end_time: Some(time(start)),
            event_type: Some(EventType::Meeting),
            ..EventDraft::default()
        }
        .build()
        .unwrap()
    }

    #[test]
    fn new_draft_has_dialog_defaults() {
        let draft = EventDraft::new(date("2024-12-09"));
        assert_eq!(draft.start_time, Some(time("09:00")));
        assert_eq!(draft.end_time, Some(time("10:00")));
        assert_eq!(draft.event_type, Some(EventType::Meeting));
        assert!(!draft.is_edit());
    }

    #[test]
    fn build_rejects_empty_and_blank_titles() {
        let mut draft = EventDraft::new(date("2024-12-09"));
        assert_eq!(draft.clone().build(), Err(ValidationError::MissingTitle));
        draft.title = Some("   ".to_string());
        assert_eq!(draft.build(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn build_requires_times_and_type() {
        let mut draft = EventDraft::new(date("2024-12-09"));
        draft.title = Some("Sync".to_string());

        let mut no_start = draft.clone();
        no_start.start_time = None;
        assert_eq!(no_start.build(), Err(ValidationError::MissingStartTime));

        let mut no_end = draft.clone();
        no_end.end_time = None;
        assert_eq!(no_end.build(), Err(ValidationError::MissingEndTime));

        let mut no_type = draft;
        no_type.event_type = None;
        assert_eq!(no_type.build(), Err(ValidationError::MissingType));
    }

    #[test]
    fn build_derives_color_from_type() {
        let mut draft = EventDraft::new(date("2024-12-09"));
        draft.title = Some("Demo".to_string());
        draft.event_type = Some(EventType::Demo);
        let ev = draft.build().unwrap();
        assert_eq!(ev.color(), "bg-purple-500");
    }

    #[test]
    fn build_accepts_end_before_start() {
        let mut draft = EventDraft::new(date("2024-12-09"));
        draft.title = Some("Late".to_string());
        draft.start_time = Some(time("18:00"));
        draft.end_time = Some(time("08:00"));
        assert!(draft.build().is_ok());
    }

    #[test]
    fn build_cleans_optional_fields() {
        let mut draft = EventDraft::new(date("2024-12-09"));
        draft.title = Some("  Team Meeting ".to_string());
        draft.description = Some("  ".to_string());
        draft.location = Some(" Room A ".to_string());
        draft.attendees = vec![" Jane ".into(), "".into(), "John".into()];
        let ev = draft.build().unwrap();
        assert_eq!(ev.title, "Team Meeting");
        assert_eq!(ev.description, None);
        assert_eq!(ev.location.as_deref(), Some("Room A"));
        assert_eq!(ev.attendees, vec!["Jane", "John"]);
        assert!(ev.id.is_empty());
    }

    #[test]
    fn from_event_preserves_id() {
        let ev = event("42", "2024-12-10", "11:00");
        let draft = EventDraft::from_event(&ev);
        assert!(draft.is_edit());
        assert_eq!(draft.build().unwrap(), ev);
    }

    #[test]
    fn serializes_plain_key_value_form() {
        let ev = event("1", "2024-12-09", "09:00");
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["date"], "2024-12-09");
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["endTime"], "09:00");
        assert_eq!(json["type"], "meeting");
        assert_eq!(json["color"], "bg-blue-500");
    }

    #[test]
    fn parse_helpers_report_bad_input() {
        assert_eq!(parse_date(""), Err(ValidationError::MissingDate));
        assert!(matches!(parse_date("2024-13-01"), Err(ValidationError::InvalidDate(_))));
        assert_eq!(parse_time("start time", ""), Ok(None));
        assert!(matches!(
            parse_time("start time", "25:00"),
            Err(ValidationError::InvalidTime { .. })
        ));
        assert_eq!(parse_time("end time", "14:30"), Ok(Some(time("14:30"))));
    }

    #[test]
    fn type_cycling_wraps() {
        assert_eq!(EventType::Reminder.next(), EventType::Meeting);
        assert_eq!(EventType::Meeting.prev(), EventType::Reminder);
    }
}
