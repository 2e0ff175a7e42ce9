use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::calendar::CalendarEvent;
use crate::theme;

pub struct DayView;

impl DayView {
    /// Selected day's events on top, the upcoming list below.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        events: &[&CalendarEvent],
        selected: usize,
        upcoming: &[&CalendarEvent],
        today: NaiveDate,
    ) {
        let upcoming_h = (upcoming.len() as u16 + 2).max(3).min(area.height / 2);
        let parts =
            Layout::vertical([Constraint::Min(3), Constraint::Length(upcoming_h)]).split(area);

        render_day(frame, parts[0], date, events, selected);
        render_upcoming(frame, parts[1], upcoming, today);
    }
}

fn render_day(
    frame: &mut Frame,
    area: Rect,
    date: NaiveDate,
    events: &[&CalendarEvent],
    selected: usize,
) {
    let t = theme::current();
    let w = area.width as usize;

    let title = if w >= 30 {
        format!(" {} ", date.format("%A, %B %d, %Y"))
    } else if w >= 18 {
        format!(" {} ", date.format("%b %d, %Y"))
    } else {
        format!(" {} ", date.format("%m/%d"))
    };

    let count_str = match events.len() {
        0 => String::new(),
        1 => " 1 event ".to_string(),
        n => format!(" {} events ", n),
    };

    let block = Block::default()
        .title(title)
        .title_style(t.header)
        .title_bottom(Line::from(Span::styled(count_str, t.dim)))
        .borders(Borders::ALL)
        .border_style(t.border);

    if events.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let msg = Paragraph::new("No events scheduled for this day").style(t.dim);
        frame.render_widget(msg, inner);
        return;
    }

    let inner_w = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = events.iter().map(|ev| format_event(ev, inner_w)).collect();

    let list = List::new(items).block(block).highlight_style(t.highlight);
    let mut state = ListState::default().with_selected(Some(selected.min(events.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_upcoming(frame: &mut Frame, area: Rect, events: &[&CalendarEvent], today: NaiveDate) {
    let t = theme::current();
    let block = Block::default()
        .title(" Upcoming Events ")
        .title_style(t.header)
        .borders(Borders::ALL)
        .border_style(t.border);

    if events.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new("No upcoming events").style(t.dim), inner);
        return;
    }

    let items: Vec<ListItem> = events
        .iter()
        .map(|ev| {
            let day = if ev.date == today {
                "Today".to_string()
            } else {
                ev.date.format("%b %-d").to_string()
            };
            ListItem::new(Line::from(vec![
                Span::styled("  ", Style::default().bg(t.event_color(ev))),
                Span::styled(format!(" {:<6} {} ", day, ev.duration_display()), t.dim),
                Span::raw(ev.title.clone()),
                Span::styled(format!(" [{}]", ev.event_type.label()), t.dim),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn format_event(ev: &CalendarEvent, max_width: usize) -> ListItem<'static> {
    let t = theme::current();
    let type_indicator = Span::styled("  ", Style::default().bg(t.event_color(ev)));

    let time_str = format!(" {} ", ev.duration_display());
    let time_span = Span::styled(time_str.clone(), Style::default().add_modifier(Modifier::DIM));

    let title_span = Span::styled(ev.title.clone(), Style::default());

    let mut spans = vec![type_indicator, time_span, title_span];

    // Only show location if there's room
    let used = 2 + time_str.len() + ev.title.len();
    if let Some(ref loc) = ev.location {
        if used + 4 + loc.len() <= max_width {
            spans.push(Span::styled(format!(" @ {}", loc), t.dim));
        }
    }

    ListItem::new(Line::from(spans))
}

/// Render the event detail popup overlay.
pub fn render_detail_popup(frame: &mut Frame, area: Rect, ev: &CalendarEvent) {
    let t = theme::current();
    let popup_w = area.width.min(60).max(30);
    let popup_h = area.height.min(18).max(8);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let color = t.event_color(ev);
    let block = Block::default()
        .title(format!(" {} ", ev.title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("  ", Style::default().bg(color)),
        Span::styled(format!(" {}", ev.event_type.label()), Style::default()),
    ]));

    if let Some(ref description) = ev.description {
        lines.push(Line::from(""));
        for line in description.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Date: ", t.dim),
        Span::styled(ev.date.format("%A, %B %-d, %Y").to_string(), Style::default()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Time: ", t.dim),
        Span::styled(ev.duration_display(), Style::default()),
    ]));

    if let Some(ref loc) = ev.location {
        lines.push(Line::from(vec![
            Span::styled("Location: ", t.dim),
            Span::styled(loc.clone(), Style::default()),
        ]));
    }

    if !ev.attendees.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Attendees: ", t.dim),
            Span::styled(ev.attendees.join(", "), Style::default()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("e:Edit  d:Delete  Esc:Close", t.dim)));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
