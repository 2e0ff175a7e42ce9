use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::calendar::event::{parse_date, parse_time};
use crate::calendar::{EventDraft, EventType, ValidationError};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Title,
    Description,
    Date,
    Type,
    StartTime,
    EndTime,
    Location,
    Attendees,
}

impl FormField {
    const ORDER: [FormField; 8] = [
        FormField::Title,
        FormField::Description,
        FormField::Date,
        FormField::Type,
        FormField::StartTime,
        FormField::EndTime,
        FormField::Location,
        FormField::Attendees,
    ];

    pub fn next(&self) -> Self {
        let idx = self.index();
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = self.index();
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }
}

/// Text buffers behind the event dialog.
#[derive(Debug, Clone)]
pub struct EventFormState {
    pub editing_id: Option<String>,
    pub title: String,
    pub description: String,
    pub date: String,
    pub event_type: EventType,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub attendees: String,
    pub active_field: FormField,
}

impl EventFormState {
    pub fn new(date: NaiveDate) -> Self {
        Self::from_draft(&EventDraft::new(date))
    }

    pub fn from_draft(draft: &EventDraft) -> Self {
        let fmt_time = |t: Option<chrono::NaiveTime>| {
            t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
        };
        Self {
            editing_id: draft.id.clone().filter(|id| !id.is_empty()),
            title: draft.title.clone().unwrap_or_default(),
            description: draft.description.clone().unwrap_or_default(),
            date: draft
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            event_type: draft.event_type.unwrap_or(EventType::Meeting),
            start_time: fmt_time(draft.start_time),
            end_time: fmt_time(draft.end_time),
            location: draft.location.clone().unwrap_or_default(),
            attendees: draft.attendees.join(", "),
            active_field: FormField::Title,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Parse the text fields. Unparseable dates and times are reported here;
    /// required-field checks happen in `EventDraft::build`.
    pub fn to_draft(&self) -> Result<EventDraft, ValidationError> {
        Ok(EventDraft {
            id: self.editing_id.clone(),
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            date: Some(parse_date(&self.date)?),
            start_time: parse_time("start time", &self.start_time)?,
            end_time: parse_time("end time", &self.end_time)?,
            event_type: Some(self.event_type),
            location: Some(self.location.clone()),
            attendees: self.attendees.split(',').map(str::to_string).collect(),
        })
    }

    fn active_buffer(&mut self) -> Option<&mut String> {
        match self.active_field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Date => Some(&mut self.date),
            FormField::StartTime => Some(&mut self.start_time),
            FormField::EndTime => Some(&mut self.end_time),
            FormField::Location => Some(&mut self.location),
            FormField::Attendees => Some(&mut self.attendees),
            FormField::Type => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(buf) = self.active_buffer() {
            buf.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.active_buffer() {
            buf.pop();
        }
    }

    pub fn next_type(&mut self) {
        self.event_type = self.event_type.next();
    }

    pub fn prev_type(&mut self) {
        self.event_type = self.event_type.prev();
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        let t = theme::current();

        // Center the form popup
        let form_w = area.width.min(60).max(34);
        let form_h = area.height.min(14).max(12);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h);

        // Clear background
        frame.render_widget(Clear, form_area);

        let title = if state.is_edit() {
            " Edit Event "
        } else {
            " Create New Event "
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(t.accent).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // description
            Constraint::Length(1), // date
            Constraint::Length(1), // type
            Constraint::Length(1), // start time
            Constraint::Length(1), // end time
            Constraint::Length(1), // location
            Constraint::Length(1), // attendees
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = state.active_field;
        render_field(frame, rows[0], "Title*", &state.title, active == FormField::Title);
        render_field(frame, rows[1], "Notes", &state.description, active == FormField::Description);
        render_field(frame, rows[2], "Date*", &state.date, active == FormField::Date);

        let type_val = format!("< {} >", state.event_type.label());
        render_swatch_field(frame, rows[3], &type_val, state.event_type, active == FormField::Type);

        render_field(frame, rows[4], "Start*", &state.start_time, active == FormField::StartTime);
        render_field(frame, rows[5], "End*", &state.end_time, active == FormField::EndTime);
        render_field(frame, rows[6], "Where", &state.location, active == FormField::Location);
        render_field(frame, rows[7], "With", &state.attendees, active == FormField::Attendees);

        let save_label = if state.is_edit() { ":Update " } else { ":Create " };
        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", t.dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(save_label, t.dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", t.dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[9]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };

    let style = if active {
        Style::default().fg(ratatui::style::Color::Cyan)
    } else {
        Style::default()
    };

    let spans = vec![
        Span::styled(format!("{:<8}", label), theme::current().dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_swatch_field(
    frame: &mut Frame,
    area: Rect,
    value: &str,
    event_type: EventType,
    active: bool,
) {
    let t = theme::current();
    let style = if active {
        Style::default().fg(ratatui::style::Color::Cyan)
    } else {
        Style::default()
    };

    let spans = vec![
        Span::styled(format!("{:<8}", "Type*"), t.dim),
        Span::styled("  ", Style::default().bg(t.type_color(event_type))),
        Span::styled(format!(" {}", value), style),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::tests::{date, event};

    #[test]
    fn new_form_round_trips_to_default_draft() {
        let form = EventFormState::new(date("2024-12-09"));
        assert_eq!(form.date, "2024-12-09");
        assert_eq!(form.start_time, "09:00");
        assert_eq!(form.end_time, "10:00");
        assert!(!form.is_edit());

        let draft = form.to_draft().unwrap();
        assert_eq!(draft.date, Some(date("2024-12-09")));
        assert_eq!(draft.build(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn typing_goes_to_active_field_only() {
        let mut form = EventFormState::new(date("2024-12-09"));
        for c in "Sync".chars() {
            form.input_char(c);
        }
        form.active_field = FormField::Type;
        form.input_char('x');
        form.active_field = FormField::Attendees;
        for c in "Ann, Bob".chars() {
            form.input_char(c);
        }
        form.backspace();

        assert_eq!(form.title, "Sync");
        assert_eq!(form.attendees, "Ann, Bo");

        let ev = form.to_draft().unwrap().build().unwrap();
        assert_eq!(ev.attendees, vec!["Ann", "Bo"]);
    }

    #[test]
    fn invalid_text_is_reported() {
        let mut form = EventFormState::new(date("2024-12-09"));
        form.title = "Call".to_string();
        form.start_time = "9".to_string();
        assert!(matches!(form.to_draft(), Err(ValidationError::InvalidTime { .. })));

        form.start_time.clear();
        assert_eq!(
            form.to_draft().unwrap().build(),
            Err(ValidationError::MissingStartTime)
        );
    }

    #[test]
    fn edit_form_keeps_event_id() {
        let ev = event("7", "2024-12-10", "11:00");
        let form = EventFormState::from_draft(&EventDraft::from_event(&ev));
        assert!(form.is_edit());
        assert_eq!(form.to_draft().unwrap().build().unwrap(), ev);
    }

    #[test]
    fn field_cycle_wraps() {
        assert_eq!(FormField::Attendees.next(), FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Attendees);
    }
}
