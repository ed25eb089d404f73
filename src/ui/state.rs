//! UI state and the transitions key actions drive.
//!
//! Nothing in here touches the terminal; actions that need the outside
//! world (running the picker and editor) come back as an [`Effect`] for the
//! runner to carry out.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::note::Note;
use crate::settings::Settings;

use super::keymap::Keymap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Home,
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Notes,
    Help,
    Options,
    Home,
}

/// Work the runner has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Redraw,
    /// Hand the terminal to the picker and editor, then redraw.
    CaptureNote,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug)]
pub struct UiState {
    pub running: bool,
    pub layout: Layout,
    /// Markdown shown in the secondary pane of the options layout.
    pub display_text: String,
    /// Free text typed into the home layout's scratch pane.
    pub scratch: String,
    pub status: Option<Status>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            running: true,
            layout: Layout::Home,
            display_text: String::new(),
            scratch: String::new(),
            status: None,
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(
        &mut self,
        action: Action,
        settings: &Settings,
        settings_file: &Path,
        keymap: &Keymap,
    ) -> Effect {
        debug!(?action, layout = ?self.layout, "ui action");
        match action {
            Action::Quit => {
                self.running = false;
                Effect::Exit
            }
            Action::Notes => Effect::CaptureNote,
            Action::Help => {
                self.layout = Layout::Options;
                self.display_text = help_text(keymap);
                Effect::Redraw
            }
            Action::Options => {
                self.layout = Layout::Options;
                self.display_text = options_text(settings, settings_file);
                Effect::Redraw
            }
            Action::Home => {
                self.layout = Layout::Home;
                self.status = None;
                Effect::Redraw
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        self.scratch.push(c);
    }

    pub fn backspace(&mut self) {
        self.scratch.pop();
    }

    /// Record how a capture ended. Fatal errors are handed back so the
    /// loop can stop.
    pub fn capture_finished(&mut self, outcome: Result<Note>) -> Result<()> {
        match outcome {
            Ok(note) => {
                self.status = Some(Status::Info(format!(
                    "Edited \"{}\" ({})",
                    note.title,
                    note.path.display()
                )));
                Ok(())
            }
            Err(Error::NoSelection) => {
                self.status = Some(Status::Info("No note selected.".to_string()));
                Ok(())
            }
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "capture failed");
                self.status = Some(Status::Error(err.to_string()));
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

fn help_text(keymap: &Keymap) -> String {
    format!(
        "\
# Help

## Keys

- **{quit}** quit
- **{notes}** open a notebook note, or type a title to start one
- **{help}** this page
- **{options}** current settings
- **{home}** back to the home layout

## Notes

New notes are named `YYYYMMDDHHMM-<title>.wiki` and start from a template.
",
        quit = keymap.label(Action::Quit),
        notes = keymap.label(Action::Notes),
        help = keymap.label(Action::Help),
        options = keymap.label(Action::Options),
        home = keymap.label(Action::Home),
    )
}

fn options_text(settings: &Settings, settings_file: &Path) -> String {
    let mut text = format!(
        "\
# Options

- **editor** `{}`
- **wiki_dir** `{}`
- **notebook_dir** `{}`

Settings file: `{}`

## Colors

",
        settings.editor,
        settings.wiki_dir,
        settings.notebook_dir,
        settings_file.display()
    );
    for (role, style) in &settings.color_scheme {
        text.push_str(&format!("- {role}: `{style}`\n"));
    }
    text
}
