//! Terminal setup/teardown and the event loop.
//!
//! The loop is single threaded: it waits up to a second for a key (so the
//! menu clock keeps ticking), handles it to completion, then redraws. The
//! picker and editor get the real terminal while the UI is suspended.

use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use chrono::Local;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::error::{Error, Result};
use crate::flows::{self, Tools};
use crate::picker::PickerOptions;
use crate::settings::Settings;

use super::keymap::Keymap;
use super::render::{View, render};
use super::state::{Effect, UiState};
use super::theme::Theme;

const TICK: Duration = Duration::from_secs(1);

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Picker flags for the notes key.
pub fn notes_options() -> PickerOptions {
    PickerOptions::new()
        .reverse(true)
        .multi_select(true)
        .cycle(true)
        .print_query(true)
}

/// Everything the loop reads but never changes.
pub struct Session<'a> {
    pub settings: &'a Settings,
    pub settings_file: &'a Path,
    pub tools: &'a Tools,
    pub keymap: Keymap,
    pub theme: Theme,
}

impl<'a> Session<'a> {
    pub fn new(settings: &'a Settings, settings_file: &'a Path, tools: &'a Tools) -> Self {
        Self {
            settings,
            settings_file,
            tools,
            keymap: Keymap::from_settings(&settings.keymap),
            theme: Theme::from_scheme(&settings.color_scheme),
        }
    }

    /// Feed one key event through the keymap and the state machine. Keys
    /// with no binding edit the scratch pane.
    pub fn handle_key(&self, state: &mut UiState, key: KeyEvent) -> Effect {
        if key.kind != KeyEventKind::Press {
            return Effect::Redraw;
        }
        if let Some(action) = self.keymap.action_for(key) {
            return state.apply(action, self.settings, self.settings_file, &self.keymap);
        }

        let plain = !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Char(c) if plain => state.type_char(c),
            KeyCode::Enter => state.type_char('\n'),
            KeyCode::Backspace => state.backspace(),
            _ => {}
        }
        Effect::Redraw
    }

    /// Run the notes flow and record the outcome. The caller must have
    /// released the terminal first.
    pub fn capture(&self, state: &mut UiState) -> Result<()> {
        let outcome = flows::capture(self.tools, self.settings, &notes_options());
        state.capture_finished(outcome)
    }
}

/// Entry point: set up the terminal, run the loop, restore the terminal
/// even when the loop fails.
pub fn run(session: &Session<'_>) -> Result<()> {
    let mut terminal = enter().map_err(tty_err)?;
    let result = run_loop(session, &mut terminal);
    let restored = leave(&mut terminal).map_err(tty_err);
    result.and(restored)
}

fn run_loop(session: &Session<'_>, terminal: &mut Term) -> Result<()> {
    let mut state = UiState::new();
    terminal.clear().map_err(tty_err)?;

    while state.running {
        draw(session, &state, terminal)?;
        if !event::poll(TICK).map_err(tty_err)? {
            continue;
        }
        match event::read().map_err(tty_err)? {
            Event::Key(key) => {
                if session.handle_key(&mut state, key) == Effect::CaptureNote {
                    leave(terminal).map_err(tty_err)?;
                    let captured = session.capture(&mut state);
                    let resumed = resume(terminal).map_err(tty_err);
                    captured.and(resumed)?;
                }
            }
            Event::Resize(_, _) => terminal.autoresize().map_err(tty_err)?,
            _ => {}
        }
    }
    info!("ui closed");
    Ok(())
}

fn draw(session: &Session<'_>, state: &UiState, terminal: &mut Term) -> Result<()> {
    let view = View {
        state,
        keymap: &session.keymap,
        theme: &session.theme,
        now: Local::now(),
    };
    terminal.draw(|frame| render(&view, frame)).map_err(tty_err)?;
    Ok(())
}

fn enter() -> io::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn leave(terminal: &mut Term) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn resume(terminal: &mut Term) -> io::Result<()> {
    enable_raw_mode()?;
    terminal.backend_mut().execute(EnterAlternateScreen)?;
    terminal.clear()
}

fn tty_err(source: io::Error) -> Error {
    Error::Io { path: "/dev/tty".into(), source }
}
