use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{info, warn};
use uuid::Uuid;

use super::event::CalendarEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added(String),
    Updated(String),
    Removed(String),
}

/// The session's events, in insertion order.
#[derive(Default)]
pub struct EventStore {
    events: Vec<CalendarEvent>,
    observers: Vec<Sender<StoreChange>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        let mut store = Self::new();
        for ev in events {
            store.add(ev);
        }
        store
    }

    /// Every mutation after this call is delivered to the returned receiver.
    pub fn subscribe(&mut self) -> Receiver<StoreChange> {
        let (tx, rx) = mpsc::channel();
        self.observers.push(tx);
        rx
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Append an event and return its id. Empty or already-taken ids are
    /// replaced with a generated one.
    pub fn add(&mut self, mut event: CalendarEvent) -> String {
        if event.id.is_empty() {
            event.id = new_id();
        } else if self.contains(&event.id) {
            warn!(id = %event.id, "duplicate event id on add, assigning a new one");
            event.id = new_id();
        }

        let id = event.id.clone();
        info!(id = %id, title = %event.title, date = %event.date, "event added");
        self.events.push(event);
        self.broadcast(StoreChange::Added(id.clone()));
        id
    }

    /// Replace the event with the same id. Returns false (and changes
    /// nothing) when no such event exists.
    pub fn update(&mut self, event: CalendarEvent) -> bool {
        let Some(slot) = self.events.iter_mut().find(|e| e.id == event.id) else {
            info!(id = %event.id, "update for unknown event ignored");
            return false;
        };
        let id = event.id.clone();
        *slot = event;
        info!(id = %id, "event updated");
        self.broadcast(StoreChange::Updated(id));
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return false;
        }
        info!(id = %id, "event removed");
        self.broadcast(StoreChange::Removed(id.to_string()));
        true
    }

    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn broadcast(&mut self, change: StoreChange) {
        self.observers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::tests::{date, event};
    use crate::calendar::query::events_on;

    #[test]
    fn added_event_is_queryable_once() {
        let mut store = EventStore::new();
        let id = store.add(event("1", "2024-12-09", "09:00"));
        let found = events_on(store.events(), date("2024-12-09"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
    }

    #[test]
    fn add_assigns_id_when_absent() {
        let mut store = EventStore::new();
        let mut ev = event("x", "2024-12-09", "09:00");
        ev.id.clear();
        let id = store.add(ev.clone());
        assert!(!id.is_empty());
        let other = store.add(ev);
        assert_ne!(id, other);
    }

    #[test]
    fn add_keeps_ids_unique() {
        let mut store = EventStore::new();
        let first = store.add(event("1", "2024-12-09", "09:00"));
        let second = store.add(event("1", "2024-12-10", "09:00"));
        assert_eq!(first, "1");
        assert_ne!(second, "1");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut store = EventStore::new();
        store.add(event("1", "2024-12-09", "09:00"));
        store.add(event("2", "2024-12-09", "14:00"));

        let mut changed = event("1", "2024-12-11", "08:00");
        changed.title = "Moved".to_string();
        assert!(store.update(changed));

        assert_eq!(store.events()[0].id, "1");
        assert_eq!(store.events()[0].title, "Moved");
        assert_eq!(store.events()[0].date, date("2024-12-11"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_of_missing_id_is_noop() {
        let mut store = EventStore::new();
        let mut ev = event("missing", "2024-12-09", "09:00");
        ev.title = "X".to_string();
        assert!(!store.update(ev));
        assert_eq!(store.len(), 0);

        store.add(event("1", "2024-12-09", "09:00"));
        let before = store.events().to_vec();
        assert!(!store.update(event("missing", "2024-12-09", "10:00")));
        assert_eq!(store.events(), before.as_slice());
    }

    #[test]
    fn get_finds_by_id() {
        let mut store = EventStore::new();
        store.add(event("1", "2024-12-09", "09:00"));
        store.add(event("2", "2024-12-10", "14:00"));

        assert_eq!(store.get("2").map(|e| e.date), Some(date("2024-12-10")));
        assert!(store.get("3").is_none());

        store.remove("2");
        assert!(store.get("2").is_none());
        assert_eq!(store.get("1").map(|e| e.id.as_str()), Some("1"));
    }

    #[test]
    fn remove_twice_is_idempotent() {
        let mut store = EventStore::new();
        store.add(event("1", "2024-12-09", "09:00"));
        assert!(store.remove("1"));
        assert!(!store.remove("1"));
        assert!(store.is_empty());
    }

    #[test]
    fn observers_see_changes_in_order() {
        let mut store = EventStore::new();
        let rx = store.subscribe();
        store.add(event("1", "2024-12-09", "09:00"));
        store.update(event("1", "2024-12-09", "10:00"));
        store.update(event("nope", "2024-12-09", "10:00"));
        store.remove("1");
        store.remove("1");

        let changes: Vec<StoreChange> = rx.try_iter().collect();
        assert_eq!(
            changes,
            vec![
                StoreChange::Added("1".into()),
                StoreChange::Updated("1".into()),
                StoreChange::Removed("1".into()),
            ]
        );
    }

    #[test]
    fn dropped_observers_are_pruned() {
        let mut store = EventStore::new();
        let rx = store.subscribe();
        drop(rx);
        let live = store.subscribe();
        store.add(event("1", "2024-12-09", "09:00"));
        assert_eq!(store.observers.len(), 1);
        assert_eq!(live.try_iter().count(), 1);
    }
}
