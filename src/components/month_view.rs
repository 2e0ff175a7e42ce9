use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::query::{events_on, month_grid};
use crate::calendar::{CalendarEvent, WeekStart};
use crate::theme;

const EVENTS_PER_CELL: usize = 2;

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        week_start: WeekStart,
        events: &[CalendarEvent],
    ) {
        let t = theme::current();
        let title = format!(" {} ", selected_date.format("%B %Y"));

        let block = Block::default()
            .title(title)
            .title_style(t.header)
            .borders(Borders::ALL)
            .border_style(t.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 14 || inner.height < 3 {
            return;
        }

        let weeks = month_grid(selected_date, week_start);
        let col_w = (inner.width / 7).max(2);

        let mut col_constraints = vec![Constraint::Length(col_w); 7];
        col_constraints.push(Constraint::Min(0));
        let cols = Layout::horizontal(col_constraints).split(inner);

        let cell_h = (inner.height.saturating_sub(1) / weeks.len().max(1) as u16).max(1);
        let mut row_constraints = vec![Constraint::Length(1)]; // day header
        for _ in &weeks {
            row_constraints.push(Constraint::Length(cell_h));
        }
        row_constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(row_constraints).split(inner);

        for (i, name) in week_start.day_names().iter().enumerate() {
            let label = Paragraph::new(Span::styled(
                format!("{:^width$}", name, width = col_w as usize),
                t.header,
            ));
            frame.render_widget(label, cols[i].intersection(rows[0]));
        }

        for (w, week) in weeks.iter().enumerate() {
            for (d, &date) in week.iter().enumerate() {
                let cell = cols[d].intersection(rows[w + 1]);
                if cell.width == 0 || cell.height == 0 {
                    continue;
                }
                let day_events = events_on(events, date);
                let lines = cell_lines(date, selected_date, today, &day_events, cell);
                frame.render_widget(Paragraph::new(lines), cell);
            }
        }
    }
}

fn cell_lines(
    date: NaiveDate,
    selected_date: NaiveDate,
    today: NaiveDate,
    day_events: &[&CalendarEvent],
    cell: Rect,
) -> Vec<Line<'static>> {
    let t = theme::current();
    let width = cell.width as usize;

    let day_style = if date == today && date == selected_date {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if date == selected_date {
        t.selected
    } else if date == today {
        t.today
    } else if date.month() != selected_date.month() {
        t.dim
    } else {
        Style::default()
    };

    let marker = if cell.height == 1 && !day_events.is_empty() {
        "*"
    } else {
        " "
    };
    let mut lines = vec![Line::from(Span::styled(
        format!("{:>2}{}", date.day(), marker),
        day_style,
    ))];

    let room = (cell.height as usize).saturating_sub(1);
    if room == 0 {
        return lines;
    }

    // Leave the last line for the overflow note when it is needed.
    let shown = if day_events.len() > room.min(EVENTS_PER_CELL) {
        room.saturating_sub(1).min(EVENTS_PER_CELL)
    } else {
        day_events.len()
    };

    for ev in day_events.iter().take(shown) {
        let title: String = ev.title.chars().take(width).collect();
        lines.push(Line::from(Span::styled(
            format!("{:<width$}", title, width = width),
            Style::default().fg(Color::White).bg(t.event_color(ev)),
        )));
    }

    let hidden = day_events.len() - shown;
    if hidden > 0 {
        lines.push(Line::from(Span::styled(format!("+{} more", hidden), t.dim)));
    }

    lines
}
