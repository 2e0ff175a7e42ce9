mod app;
mod calendar;
mod cli;
mod components;
mod config;
mod event;
mod logging;
mod theme;
mod tui;

use std::time::Duration;

use app::{App, InputMode, ViewMode};
use chrono::Local;
use color_eyre::Result;
use config::Config;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use tracing::{info, warn};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = cli::parse(std::env::args().skip(1).collect());
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(path) = args.data_file {
        config.data_file = Some(path);
    }

    let log_path = config.log_path();
    if let Err(err) = logging::init(&log_path) {
        eprintln!("Logging disabled ({}): {}", log_path.display(), err);
    }
    theme::init(&config.theme);

    let mut app = App::new(&config)?;
    info!(
        week_start = ?config.week_start,
        theme = %theme::current().name,
        "starting calendar"
    );

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    if let Err(ref err) = result {
        warn!(error = %err, "calendar exited with error");
    }
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.tick(Local::now().naive_local());
        app.sync();

        terminal.draw(|frame| {
            let area = frame.area();
            let w = area.width;

            // Stats cards, main view, status bar
            let layout = Layout::vertical([
                Constraint::Length(components::StatsHeader::HEIGHT),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

            components::StatsHeader::render(frame, layout[0], &app.projection);

            let content_area = layout[1];
            match app.view_mode {
                ViewMode::Month => render_month_layout(frame, content_area, app, w),
                ViewMode::Week => {
                    components::WeekView::render(
                        frame,
                        content_area,
                        app.selected_date,
                        app.today(),
                        app.selected_week_start(),
                        &app.week_events(),
                    );
                }
                ViewMode::Day => render_day(frame, content_area, app),
            }

            if let Some(ref form) = app.form_state {
                components::EventForm::render(frame, area, form);
            }

            if app.detail_open {
                if let Some(ev) = app.selected_event() {
                    components::day_view::render_detail_popup(frame, area, ev);
                }
            }

            if app.show_help {
                render_help(frame, area);
            }

            components::StatusBar::render(
                frame,
                layout[2],
                app.view_mode,
                app.input_mode,
                app.status_message.as_deref(),
            );
        })?;

        if let Some(key) = event::next_key_event(Duration::from_millis(250))? {
            // Clear status message on any key
            app.status_message = None;

            // Help overlay takes priority
            if app.show_help {
                if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                    app.show_help = false;
                }
                continue;
            }

            match app.input_mode {
                InputMode::Form => handle_form_input(app, key.code),
                InputMode::Normal if app.detail_open => handle_detail_input(app, key.code),
                InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
            }
        }
    }

    Ok(())
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('1'), _) => app.view_mode = ViewMode::Month,
        (KeyCode::Char('2'), _) => app.view_mode = ViewMode::Week,
        (KeyCode::Char('3'), _) => app.view_mode = ViewMode::Day,
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('n'), _) => app.open_event_form(),
        (KeyCode::Char('e'), _) => app.edit_selected_event(),
        (KeyCode::Char('d'), _) => app.delete_selected_event(),
        (KeyCode::Enter, _) => app.show_detail(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.prev_day(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.next_day(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
            if app.view_mode == ViewMode::Week {
                app.prev_week();
            } else {
                app.select_prev_event();
            }
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
            if app.view_mode == ViewMode::Week {
                app.next_week();
            } else {
                app.select_next_event();
            }
        }
        (KeyCode::Char('['), _) => app.prev_month(),
        (KeyCode::Char(']'), _) => app.next_month(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Enter => app.close_detail(),
        KeyCode::Char('e') => app.edit_selected_event(),
        KeyCode::Char('d') => app.delete_selected_event(),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_event_form(),
        KeyCode::Enter => app.submit_event_form(),
        KeyCode::Tab => app.form_tab(),
        KeyCode::BackTab => app.form_backtab(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Left => app.form_cycle_type(false),
        KeyCode::Right => app.form_cycle_type(true),
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

fn render_day(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    components::DayView::render(
        frame,
        area,
        app.selected_date,
        &app.day_events(),
        app.selected_index,
        &app.upcoming_events(),
        app.today(),
    );
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &App, total_width: u16) {
    if total_width < 80 {
        components::MonthView::render(
            frame,
            area,
            app.selected_date,
            app.today(),
            app.week_start,
            app.events(),
        );
    } else {
        let month_w = total_width * 3 / 5;
        let content = Layout::horizontal([
            Constraint::Length(month_w),
            Constraint::Min(20),
        ])
        .split(area);

        components::MonthView::render(
            frame,
            content[0],
            app.selected_date,
            app.today(),
            app.week_start,
            app.events(),
        );
        render_day(frame, content[1], app);
    }
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let t = theme::current();
    let popup_w = area.width.min(52).max(30);
    let popup_h = area.height.min(24).max(12);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(t.accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.accent));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let desc_style = Style::default();
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), key_style),
            Span::styled(desc, desc_style),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        entry("h/l", "Previous/next day"),
        entry("j/k", "Select event (week view: week)"),
        entry("[/]", "Previous/next month"),
        entry("t", "Jump to today"),
        Line::from(""),
        Line::from(Span::styled("Views", section_style)),
        entry("1/2/3", "Month / Week / Day view"),
        Line::from(""),
        Line::from(Span::styled("Events", section_style)),
        entry("Enter", "View event details"),
        entry("n", "Create new event"),
        entry("e", "Edit selected event"),
        entry("d", "Delete selected event"),
        entry("\u{2190}/\u{2192}", "Change type (in form)"),
        Line::from(""),
        entry("Esc", "Close popup or form"),
        entry("q", "Quit"),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
