//! Terminal helper for a vimwiki notebook: pick any file under a directory
//! and open it, capture into the notebook through fzf, or run a small
//! full-screen UI.

pub mod args;
pub mod error;
pub mod flows;
pub mod formatting;
pub mod lister;
pub mod note;
pub mod picker;
pub mod process;
pub mod settings;
pub mod ui;

use std::env;

use tracing::{Level, debug};

use crate::args::{ArgParser, Invocation};
use crate::error::{Error, Result};
use crate::flows::Tools;
use crate::formatting::FormatContext;
use crate::settings::SettingsStore;

pub const LOG_ENV: &str = "WIKINOTE_LOG";

pub fn entry() -> Result<()> {
    let invocation = ArgParser::new(env::args().skip(1).collect()).parse()?;
    if invocation.help {
        print!("{}", args::usage());
        return Ok(());
    }
    if invocation.version {
        println!("wikinote {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    init_logging();
    run(&invocation)
}

fn run(invocation: &Invocation) -> Result<()> {
    let store = SettingsStore::open(invocation.config_dir.as_deref())?;
    let settings = store.load()?;
    debug!(dir = %store.dir().display(), editor = %settings.editor, "settings loaded");

    let tools = Tools::locate(&settings)?;
    let fmt = FormatContext::from_env();

    if let Some(directory) = &invocation.directory {
        match flows::dir_search(&tools, directory)? {
            Some(path) => debug!(path = %path.display(), "opened"),
            None => println!("{}", fmt.notice("No file selected.")),
        }
    }
    if invocation.notes {
        let options = flows::capture_options(&settings);
        match flows::capture(&tools, &settings, &options) {
            Ok(note) => println!("{}", fmt.path(&note.path.display().to_string())),
            Err(Error::NoSelection) => println!("{}", fmt.notice("No note selected.")),
            Err(err) => return Err(err),
        }
    }
    if invocation.wants_ui() {
        ui::run(&settings, store.file(), &tools)?;
    }
    Ok(())
}

/// Logging stays off unless `WIKINOTE_LOG` is set; an unknown level means
/// debug. Output goes to stderr so it never mixes with the UI or pickers.
fn init_logging() {
    let Ok(value) = env::var(LOG_ENV) else {
        return;
    };
    let level = parse_level(&value).unwrap_or(Level::DEBUG);
    // Only one global subscriber can exist; if one is already set, keep it.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn parse_level(value: &str) -> Option<Level> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels_parse_case_insensitively() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level(" WARN "), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }
}
