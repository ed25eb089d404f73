//! Drawing for both layouts: a one-line menu bar on top, then either the
//! home split (scratch pane | separator | info pane) or the single options
//! pane, with a status line at the bottom.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout as Split, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::keymap::Keymap;
use super::markdown::render_markdown;
use super::state::{Action, Layout, Status, UiState};
use super::theme::Theme;

pub const PROMPT_LABEL: &str = "wikinote : > ";

pub struct View<'a> {
    pub state: &'a UiState,
    pub keymap: &'a Keymap,
    pub theme: &'a Theme,
    pub now: DateTime<Local>,
}

pub fn render(view: &View<'_>, frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(Paragraph::new("").style(view.theme.base), area);

    let rows = Split::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    render_menu_bar(view, frame, rows[0]);
    match view.state.layout {
        Layout::Home => render_home(view, frame, rows[1]),
        Layout::Options => render_options(view, frame, rows[1]),
    }
    render_status(view, frame, rows[2]);
}

pub fn menu_items(keymap: &Keymap) -> Vec<String> {
    [
        (Action::Quit, "Quit"),
        (Action::Help, "Help"),
        (Action::Options, "Options"),
        (Action::Notes, "Notes"),
    ]
    .iter()
    .map(|(action, name)| format!(" {}: {name} ", keymap.label(*action)))
    .collect()
}

pub fn clock_label(now: &DateTime<Local>) -> String {
    format!(" {} | {} ", now.format("%Y-%m-%d"), now.format("%H:%M"))
}

fn render_menu_bar(view: &View<'_>, frame: &mut Frame, area: Rect) {
    let clock = clock_label(&view.now);
    let clock_width = clock.chars().count() as u16;
    let cols = Split::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(clock_width)])
        .split(area);

    let mut spans: Vec<Span<'static>> = menu_items(view.keymap)
        .into_iter()
        .map(|item| Span::styled(item, view.theme.prompt))
        .collect();
    spans.push(Span::styled(PROMPT_LABEL, view.theme.prompt));
    frame.render_widget(Paragraph::new(Line::from(spans)).style(view.theme.title), cols[0]);
    frame.render_widget(
        Paragraph::new(clock).style(view.theme.prompt).alignment(Alignment::Right),
        cols[1],
    );
}

fn render_home(view: &View<'_>, frame: &mut Frame, area: Rect) {
    let cols = Split::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let scratch = Paragraph::new(view.state.scratch.as_str())
        .style(view.theme.pane)
        .wrap(Wrap { trim: false });
    frame.render_widget(scratch, cols[0]);

    let bar = vec![Line::raw("|"); cols[1].height as usize];
    frame.render_widget(Paragraph::new(bar).style(view.theme.separator), cols[1]);

    let info = format!("wikinote v{}", env!("CARGO_PKG_VERSION"));
    frame.render_widget(Paragraph::new(info).style(view.theme.pane), cols[2]);
}

fn render_options(view: &View<'_>, frame: &mut Frame, area: Rect) {
    let lines = render_markdown(&view.state.display_text, view.theme);
    let pane = Paragraph::new(lines)
        .style(view.theme.pane)
        .wrap(Wrap { trim: false });
    frame.render_widget(pane, area);
}

fn render_status(view: &View<'_>, frame: &mut Frame, area: Rect) {
    let line = match &view.state.status {
        Some(Status::Info(text)) => Line::styled(text.clone(), view.theme.base),
        Some(Status::Error(text)) => Line::styled(text.clone(), view.theme.error),
        None => Line::default(),
    };
    frame.render_widget(Paragraph::new(line).style(view.theme.base), area);
}
