use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{InputMode, ViewMode};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        mode: ViewMode,
        input: InputMode,
        message: Option<&str>,
    ) {
        let status = theme::current().status;
        let w = area.width as usize;

        let mode_str = match mode {
            ViewMode::Month => "[1]Month",
            ViewMode::Week => "[2]Week",
            ViewMode::Day => "[3]Day",
        };

        let focus_indicator = match input {
            InputMode::Form => " [Event]",
            InputMode::Normal => "",
        };

        // Show status message if present, otherwise show context-aware hints
        let right_text = match message {
            Some(msg) => format!(" {} ", msg),
            None => hints(mode, input, w).to_string(),
        };

        let left = format!(" {}{} ", mode_str, focus_indicator);
        let padding = " ".repeat(w.saturating_sub(left.len() + right_text.len()));

        let line = Line::from(vec![
            Span::styled(left, status),
            Span::styled(padding, status),
            Span::styled(right_text, status),
        ]);

        frame.render_widget(Paragraph::new(line).style(status), area);
    }
}

fn hints(mode: ViewMode, input: InputMode, w: usize) -> &'static str {
    if input == InputMode::Form {
        return " Tab:Next Enter:Save Esc:Cancel ";
    }
    match mode {
        ViewMode::Day | ViewMode::Month if w >= 80 => {
            " hl:Day jk:Select [/]:Mon t:Today Enter:Detail n:New e:Edit d:Del ?:Help q:Quit"
        }
        ViewMode::Day | ViewMode::Month if w >= 50 => " jk:Select Enter:Detail n:New q:Quit",
        ViewMode::Week if w >= 70 => " hl:Day jk:Week [/]:Mon t:Today n:New ?:Help q:Quit",
        ViewMode::Week if w >= 50 => " arrows:Nav n:New q:Quit",
        _ => " ?:Help q:Quit",
    }
}
