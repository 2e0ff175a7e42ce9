use chrono::{Duration, NaiveDate, Timelike};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::CalendarEvent;
use crate::theme;

const HOUR_START: u32 = 6;
const HOUR_END: u32 = 23;

pub struct WeekView;

impl WeekView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        week_start: NaiveDate,
        events: &[&CalendarEvent],
    ) {
        let t = theme::current();
        let block = Block::default()
            .title(format!(
                " Week of {} ({} events) ",
                week_start.format("%b %d, %Y"),
                events.len()
            ))
            .title_style(t.header)
            .borders(Borders::ALL)
            .border_style(t.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 10 || inner.height < 3 {
            return;
        }

        let inner_w = inner.width as usize;
        let inner_h = inner.height as usize;

        // Time label column width
        let time_col_w: u16 = if inner_w >= 70 { 6 } else { 4 };
        let day_cols_w = inner.width.saturating_sub(time_col_w);
        let col_w = (day_cols_w / 7).max(1);

        let mut col_constraints = vec![Constraint::Length(time_col_w)];
        for _ in 0..7 {
            col_constraints.push(Constraint::Length(col_w));
        }
        col_constraints.push(Constraint::Min(0)); // absorb remainder

        let cols = Layout::horizontal(col_constraints).split(inner);

        // Reserve 1 row for day headers
        let content_rows = inner_h.saturating_sub(1);
        let total_hours = (HOUR_END - HOUR_START) as usize;
        let rows_per_hour = (content_rows / total_hours).max(1);
        let visible_hours = (content_rows / rows_per_hour).min(total_hours);

        let mut row_constraints = vec![Constraint::Length(1)]; // day header
        for _ in 0..visible_hours {
            row_constraints.push(Constraint::Length(rows_per_hour as u16));
        }
        row_constraints.push(Constraint::Min(0));

        let rows = Layout::vertical(row_constraints).split(inner);

        for day_offset in 0..7u32 {
            let date = week_start + Duration::days(day_offset as i64);
            let col_idx = (day_offset + 1) as usize;

            let day_label = if col_w >= 10 {
                format!("{}", date.format("%a %d"))
            } else if col_w >= 5 {
                format!("{}", date.format("%a"))
            } else {
                format!("{}", date.format("%d"))
            };

            let style = if date == today && date == selected_date {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if date == selected_date {
                t.selected
            } else if date == today {
                t.today
            } else {
                t.header
            };

            let label = Paragraph::new(Line::from(Span::styled(
                format!("{:^width$}", day_label, width = col_w as usize),
                style,
            )));
            frame.render_widget(label, cols[col_idx].intersection(rows[0]));
        }

        for hour_idx in 0..visible_hours {
            let hour = HOUR_START + hour_idx as u32;
            let row_idx = hour_idx + 1;

            let time_label = if time_col_w >= 6 {
                format!("{:>2}:00 ", hour)
            } else {
                format!("{:>2} ", hour)
            };
            let time_para = Paragraph::new(Line::from(Span::styled(time_label, t.dim)));
            frame.render_widget(time_para, cols[0].intersection(rows[row_idx]));

            for day_offset in 0..7u32 {
                let date = week_start + Duration::days(day_offset as i64);
                let col_idx = (day_offset + 1) as usize;

                let cell_area = cols[col_idx].intersection(rows[row_idx]);
                if cell_area.width == 0 || cell_area.height == 0 {
                    continue;
                }

                let first = events
                    .iter()
                    .filter(|ev| ev.date == date && covers_hour(ev, hour))
                    .min_by_key(|ev| ev.start_time);

                if let Some(ev) = first {
                    let max_title_len = cell_area.width as usize;
                    let title: String = ev.title.chars().take(max_title_len).collect();
                    let display = format!("{:<width$}", title, width = max_title_len);

                    let style = Style::default().fg(Color::Black).bg(t.event_color(ev));
                    frame.render_widget(
                        Paragraph::new(Line::from(Span::styled(display, style))),
                        cell_area,
                    );
                }
            }
        }
    }
}

/// Whether the event occupies any part of `hour`. Events whose end is not
/// after their start only mark their starting hour.
fn covers_hour(ev: &CalendarEvent, hour: u32) -> bool {
    let start_hour = ev.start_time.hour();
    if ev.end_time <= ev.start_time {
        return hour == start_hour;
    }
    let end_hour = if ev.end_time.minute() > 0 {
        ev.end_time.hour()
    } else {
        ev.end_time.hour().saturating_sub(1)
    };
    hour >= start_hour && hour <= end_hour
}
