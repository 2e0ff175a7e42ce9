use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use chrono::{Duration, Local, Months, NaiveDate, NaiveDateTime, Timelike};
use color_eyre::Result;
use tracing::{debug, info, warn};

use crate::calendar::query::{events_in_week, events_on, upcoming, week_bounds};
use crate::calendar::{
    persist, CalendarEvent, EventDraft, EventStore, Projection, StoreChange, WeekStart,
};
use crate::components::event_form::{EventFormState, FormField};
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Form,
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub selected_date: NaiveDate,
    pub now: NaiveDateTime,
    pub week_start: WeekStart,
    pub upcoming_limit: usize,
    pub projection: Projection,
    pub form_state: Option<EventFormState>,
    pub detail_open: bool,
    pub show_help: bool,
    pub selected_index: usize,
    pub status_message: Option<String>,
    store: EventStore,
    changes: Receiver<StoreChange>,
    data_path: PathBuf,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let data_path = config.data_path();
        let events = if data_path.exists() || !config.seed_demo_events {
            persist::load(&data_path)?
        } else {
            info!("no event file yet, seeding sample schedule");
            persist::demo_events()
        };
        info!(path = %data_path.display(), count = events.len(), "calendar opened");

        let now = Local::now().naive_local();
        Ok(Self::from_store(
            EventStore::with_events(events),
            config,
            data_path,
            now,
        ))
    }

    pub fn from_store(
        mut store: EventStore,
        config: &Config,
        data_path: PathBuf,
        now: NaiveDateTime,
    ) -> Self {
        let changes = store.subscribe();
        let projection = Projection::compute(store.events(), now, config.week_start);
        Self {
            running: true,
            view_mode: ViewMode::Month,
            input_mode: InputMode::Normal,
            selected_date: now.date(),
            now,
            week_start: config.week_start,
            upcoming_limit: config.upcoming_limit,
            projection,
            form_state: None,
            detail_open: false,
            show_help: false,
            selected_index: 0,
            status_message: None,
            store,
            changes,
            data_path,
        }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        self.store.events()
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Events on the selected day, earliest first.
    pub fn day_events(&self) -> Vec<&CalendarEvent> {
        let mut events = events_on(self.store.events(), self.selected_date);
        events.sort_by_key(|e| e.start_time);
        events
    }

    pub fn selected_week_start(&self) -> NaiveDate {
        week_bounds(self.selected_date, self.week_start).0
    }

    pub fn week_events(&self) -> Vec<&CalendarEvent> {
        let (start, end) = week_bounds(self.selected_date, self.week_start);
        events_in_week(self.store.events(), start, end)
    }

    pub fn upcoming_events(&self) -> Vec<&CalendarEvent> {
        upcoming(self.store.events(), self.now, self.upcoming_limit)
    }

    pub fn selected_event(&self) -> Option<&CalendarEvent> {
        self.day_events().get(self.selected_index).copied()
    }

    /// Advance the clock. The projection depends on "now", so it is rebuilt
    /// whenever the minute changes.
    pub fn tick(&mut self, now: NaiveDateTime) {
        let moved = now.date() != self.now.date()
            || now.hour() != self.now.hour()
            || now.minute() != self.now.minute();
        self.now = now;
        if moved {
            self.recompute();
        }
    }

    /// Drain store notifications; any change refreshes the projection and
    /// writes the calendar back to disk.
    pub fn sync(&mut self) {
        let changes: Vec<StoreChange> = self.changes.try_iter().collect();
        if changes.is_empty() {
            return;
        }
        debug!(?changes, count = self.store.len(), "store changed");
        self.recompute();
        self.clamp_selection();

        if let Err(err) = persist::save(&self.data_path, self.store.events()) {
            warn!(error = %err, "failed to save events");
            self.status_message = Some(format!("Save failed: {}", err));
        }
    }

    fn recompute(&mut self) {
        self.projection = Projection::compute(self.store.events(), self.now, self.week_start);
        debug!(
            today = self.projection.today_count,
            week = self.projection.week_count,
            "projection refreshed"
        );
    }

    // ── navigation ──

    pub fn next_day(&mut self) {
        self.set_date(self.selected_date.succ_opt().unwrap_or(self.selected_date));
    }

    pub fn prev_day(&mut self) {
        self.set_date(self.selected_date.pred_opt().unwrap_or(self.selected_date));
    }

    pub fn next_week(&mut self) {
        self.set_date(self.selected_date + Duration::weeks(1));
    }

    pub fn prev_week(&mut self) {
        self.set_date(self.selected_date - Duration::weeks(1));
    }

    pub fn next_month(&mut self) {
        let date = self
            .selected_date
            .checked_add_months(Months::new(1))
            .unwrap_or(self.selected_date);
        self.set_date(date);
    }

    pub fn prev_month(&mut self) {
        let date = self
            .selected_date
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.selected_date);
        self.set_date(date);
    }

    pub fn go_to_today(&mut self) {
        self.set_date(self.today());
    }

    fn set_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
        self.selected_index = 0;
    }

    pub fn select_next_event(&mut self) {
        let count = self.day_events().len();
        if self.selected_index + 1 < count {
            self.selected_index += 1;
        }
    }

    pub fn select_prev_event(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let count = self.day_events().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    // ── event dialog ──

    pub fn open_event_form(&mut self) {
        self.form_state = Some(EventFormState::new(self.selected_date));
        self.input_mode = InputMode::Form;
    }

    pub fn edit_selected_event(&mut self) {
        let Some(draft) = self.selected_event().map(EventDraft::from_event) else {
            self.status_message = Some("No event selected".to_string());
            return;
        };
        self.detail_open = false;
        self.form_state = Some(EventFormState::from_draft(&draft));
        self.input_mode = InputMode::Form;
    }

    pub fn close_event_form(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    /// Validate the form and hand the event to the store. On failure the
    /// form stays open and the store is not touched.
    pub fn submit_event_form(&mut self) {
        let Some(form) = self.form_state.as_ref() else {
            return;
        };
        let is_edit = form.is_edit();

        let event = match form.to_draft().and_then(EventDraft::build) {
            Ok(ev) => ev,
            Err(err) => {
                debug!(error = %err, "event form rejected");
                self.status_message = Some(format!("Please fill in all required fields: {}", err));
                return;
            }
        };

        let date = event.date;
        if is_edit {
            let Some(previous) = self.store.get(&event.id).map(|e| e.date) else {
                self.close_event_form();
                self.status_message = Some("Event no longer exists".to_string());
                return;
            };
            if previous != date {
                debug!(id = %event.id, from = %previous, to = %date, "event moved");
            }
            self.store.update(event);
            self.status_message = Some("Event updated successfully".to_string());
        } else {
            self.store.add(event);
            self.status_message = Some("Event created successfully".to_string());
        }

        self.close_event_form();
        self.set_date(date);
        self.sync();
    }

    pub fn delete_selected_event(&mut self) {
        let Some(id) = self.selected_event().map(|e| e.id.clone()) else {
            self.status_message = Some("No event selected".to_string());
            return;
        };
        self.store.remove(&id);
        self.detail_open = false;
        self.status_message = Some("Event deleted successfully".to_string());
        self.sync();
    }

    pub fn form_tab(&mut self) {
        if let Some(ref mut f) = self.form_state {
            f.active_field = f.active_field.next();
        }
    }

    pub fn form_backtab(&mut self) {
        if let Some(ref mut f) = self.form_state {
            f.active_field = f.active_field.prev();
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(ref mut f) = self.form_state {
            match (f.active_field, c) {
                (FormField::Type, ' ') => f.next_type(),
                _ => f.input_char(c),
            }
        }
    }

    pub fn form_cycle_type(&mut self, forward: bool) {
        if let Some(ref mut f) = self.form_state {
            if f.active_field == FormField::Type {
                if forward {
                    f.next_type();
                } else {
                    f.prev_type();
                }
            }
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(ref mut f) = self.form_state {
            f.backspace();
        }
    }

    // ── detail popup ──

    pub fn show_detail(&mut self) {
        if self.selected_event().is_some() {
            self.detail_open = true;
        }
    }

    pub fn close_detail(&mut self) {
        self.detail_open = false;
    }
}
