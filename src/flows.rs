//! The two user-facing flows: open a file picked from a directory, and
//! capture into the notebook (open a picked note or start a new one).

use std::path::PathBuf;

use tracing::info;

use crate::error::{Error, Result};
use crate::lister::{entry_base, list_paths};
use crate::note::{self, Note, Selection};
use crate::picker::{Picker, PickerOptions};
use crate::process::{self, Editor};
use crate::settings::{Settings, expand_tilde};

/// External tools a flow drives.
pub struct Tools {
    pub picker: Box<dyn Picker>,
    pub editor: Editor,
}

impl Tools {
    /// Locate fzf and the configured editor, failing before anything is
    /// shown to the user.
    pub fn locate(settings: &Settings) -> Result<Self> {
        let picker = crate::picker::Fzf::locate()?;
        let editor = Editor::from_command(&settings.editor)?;
        Ok(Self { picker: Box::new(picker), editor })
    }
}

/// Pick any file below `directory` and open it. Returns `None` when the user
/// picked nothing.
pub fn dir_search(tools: &Tools, directory: &str) -> Result<Option<PathBuf>> {
    let mut root = expand_tilde(directory);
    if root.file_name().is_none() {
        // `.` or `..`: entries are named after the real directory.
        root = root.canonicalize().map_err(|e| Error::from_io(&root, e))?;
    }
    let candidates = list_paths(&root)?;
    let options = PickerOptions::new().print_query(true);
    let selection = Selection::from_lines(tools.picker.prompt(&candidates, &options)?);

    let Some(choice) = selection.choice() else {
        return Ok(None);
    };
    let target = entry_base(&root).join(choice);
    tools.editor.open(&target)?;
    Ok(Some(target))
}

/// fzf options for the capture prompt: preview through `bat` when it is
/// installed, and skip the border inside tmux.
pub fn capture_options(settings: &Settings) -> PickerOptions {
    let wiki = shell_quote(settings.wiki_dir.trim_end_matches('/'));
    let preview = if process::on_path("bat") {
        format!("bat --style=plain --color=always {wiki}/{{}}")
    } else {
        format!("cat {wiki}/{{}}")
    };
    let in_tmux = std::env::var_os("TMUX").is_some();
    PickerOptions::capture(preview, !in_tmux)
}

/// Single-quote `text` for `sh`. A leading `~/` stays outside the quotes so
/// the shell still expands it.
fn shell_quote(text: &str) -> String {
    if text == "~" {
        return text.to_string();
    }
    let (home, rest) = match text.strip_prefix("~/") {
        Some(rest) => ("~/", rest),
        None => ("", text),
    };
    format!("{home}'{}'", rest.replace('\'', r"'\''"))
}

/// Pick a note from the notebook or type a title for a new one, then open
/// the result in the editor.
pub fn capture(
    tools: &Tools,
    settings: &Settings,
    options: &PickerOptions,
) -> Result<Note> {
    let notebook = settings.notebook_root();
    let candidates = list_paths(&notebook)?;
    let selection = Selection::from_lines(tools.picker.prompt(&candidates, options)?);
    if selection == Selection::Empty {
        return Err(Error::NoSelection);
    }

    let path = note::resolve(&selection, &notebook, &settings.wiki_root())?;
    tools.editor.open(&path)?;
    // Quitting the editor without saving leaves nothing on disk.
    let opened = match Note::load(&path) {
        Err(Error::NotFound { .. }) => Note::unsaved(&path),
        other => other?,
    };
    info!(title = %opened.title, "capture finished");
    Ok(opened)
}
