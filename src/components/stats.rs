use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::Projection;
use crate::theme;

/// The three summary cards above the calendar.
pub struct StatsHeader;

impl StatsHeader {
    pub const HEIGHT: u16 = 4;

    pub fn render(frame: &mut Frame, area: Rect, projection: &Projection) {
        let cards = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

        let today = projection.today_count.to_string();
        let week = projection.week_count.to_string();
        let (next_time, next_title) = projection.next_event.pair();

        render_card(frame, cards[0], "Today's Events", &today, projection.today_caption());
        render_card(frame, cards[1], "This Week", &week, "Events this week");
        render_card(frame, cards[2], "Next Event", next_time, next_title);
    }
}

fn render_card(frame: &mut Frame, area: Rect, title: &str, value: &str, caption: &str) {
    let t = theme::current();
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(t.dim)
        .borders(Borders::ALL)
        .border_style(t.border);

    let lines = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(caption.to_string(), t.dim)),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
