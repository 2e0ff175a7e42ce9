use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};

use super::event::{CalendarEvent, EventDraft, EventType};

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed event file {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read the saved events. A missing file is an empty calendar. Records that
/// no longer validate are dropped.
pub fn load(path: &Path) -> Result<Vec<CalendarEvent>, PersistError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(PersistError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let records: Vec<serde_json::Value> =
        serde_json::from_str(&content).map_err(|source| PersistError::Format {
            path: path.to_path_buf(),
            source,
        })?;

    let mut events = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        let parsed = serde_json::from_value::<CalendarEvent>(record)
            .map_err(|e| e.to_string())
            .and_then(|ev| EventDraft::from_event(&ev).build().map_err(|e| e.to_string()));
        match parsed {
            Ok(ev) => events.push(ev),
            Err(reason) => warn!(index = idx, %reason, "skipping stored event"),
        }
    }

    debug!(path = %path.display(), count = events.len(), "events loaded");
    Ok(events)
}

pub fn save(path: &Path, events: &[CalendarEvent]) -> Result<(), PersistError> {
    let io_err = |source: std::io::Error| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(events).map_err(|source| PersistError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(source));
    }

    debug!(path = %path.display(), count = events.len(), "events saved");
    Ok(())
}

/// Sample schedule used to seed an empty calendar.
pub fn demo_events() -> Vec<CalendarEvent> {
    let samples = [
        (
            "1",
            "Team Meeting",
            "Weekly team sync and project updates",
            "2024-12-09",
            (9, 10),
            EventType::Meeting,
            Some("Conference Room A"),
            &["John Doe", "Jane Smith", "Mike Johnson"][..],
        ),
        (
            "2",
            "Client Call - TechCorp",
            "Quarterly business review with TechCorp",
            "2024-12-09",
            (14, 15),
            EventType::Call,
            Some("Zoom Meeting"),
            &["Sarah Wilson", "Client Team"][..],
        ),
        (
            "3",
            "Product Demo",
            "Demo new features to potential customers",
            "2024-12-10",
            (11, 12),
            EventType::Demo,
            Some("Demo Room"),
            &["Sales Team", "Prospects"][..],
        ),
        (
            "4",
            "Lunch Break",
            "Personal time",
            "2024-12-11",
            (12, 13),
            EventType::Personal,
            None,
            &[][..],
        ),
    ];

    samples
        .into_iter()
        .filter_map(
            |(id, title, description, date, (start, end), event_type, location, attendees)| {
                EventDraft {
                    id: Some(id.to_string()),
                    title: Some(title.to_string()),
                    description: Some(description.to_string()),
                    date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
                    start_time: NaiveTime::from_hms_opt(start, 0, 0),
                    end_time: NaiveTime::from_hms_opt(end, 0, 0),
                    event_type: Some(event_type),
                    location: location.map(str::to_string),
                    attendees: attendees.iter().map(|a| a.to_string()).collect(),
                }
                .build()
                .ok()
            },
        )
        .collect()
}
