//! Full-screen UI: a menu bar, a home layout with a scratch pane, and an
//! options layout that shows help and settings as markdown.

pub mod keymap;
pub mod markdown;
pub mod render;
pub mod runner;
pub mod state;
pub mod theme;

use std::path::Path;

use crate::error::Result;
use crate::flows::Tools;
use crate::settings::Settings;

pub use runner::Session;
pub use state::{Action, Layout, UiState};

/// Take over the terminal until the quit key is pressed.
pub fn run(settings: &Settings, settings_file: &Path, tools: &Tools) -> Result<()> {
    runner::run(&Session::new(settings, settings_file, tools))
}
