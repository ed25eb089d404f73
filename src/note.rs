use chrono::{Local, NaiveDateTime};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const NOTE_EXT: &str = "wiki";
pub const FILE_TS_FMT: &str = "%Y%m%d%H%M";
pub const CREATED_FMT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub path: PathBuf,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl Note {
    /// Read an existing note. The title comes from a `= Title =` first line,
    /// falling back to the file stem.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
        let title = content
            .lines()
            .next()
            .and_then(heading_title)
            .map(str::to_string)
            .unwrap_or_else(|| stem_title(path));
        Ok(Self { path: path.to_path_buf(), title, content, tags: Vec::new() })
    }

    /// A note whose file is not on disk, titled after the file stem.
    pub fn unsaved(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            title: stem_title(path),
            content: String::new(),
            tags: Vec::new(),
        }
    }

    /// Build a fresh note titled `title` inside `notebook_root`, stamped
    /// with `now`. Nothing is written yet.
    pub fn synthesize(title: &str, notebook_root: &Path, now: NaiveDateTime) -> Self {
        let file_name =
            format!("{}-{}.{NOTE_EXT}", now.format(FILE_TS_FMT), file_safe(title));
        Self {
            path: notebook_root.join(file_name),
            title: title.to_string(),
            content: render_template(title, now),
            tags: Vec::new(),
        }
    }

    /// Write the note to its path. An existing file is left as it is.
    pub fn persist(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        }
        let file = OpenOptions::new().write(true).create_new(true).open(&self.path);
        let mut file = match file {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %self.path.display(), "note already exists, keeping it");
                return Ok(());
            }
            Err(e) => return Err(io_err(&self.path, e)),
        };
        file.write_all(self.content.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| io_err(&self.path, e))?;
        info!(path = %self.path.display(), "created note");
        Ok(())
    }
}

/// Write failures are reported as plain io errors, whatever their kind.
fn io_err(path: &Path, source: io::Error) -> Error {
    Error::Io { path: path.to_path_buf(), source }
}

fn stem_title(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string()
}

fn heading_title(line: &str) -> Option<&str> {
    let inner = line.trim().strip_prefix('=')?.strip_suffix('=')?;
    let inner = inner.trim_matches('=').trim();
    (!inner.is_empty()).then_some(inner)
}

/// Keep titles to a single path component.
fn file_safe(title: &str) -> String {
    title.replace(['/', std::path::MAIN_SEPARATOR], "-")
}

pub fn render_template(title: &str, now: NaiveDateTime) -> String {
    format!(
        "\
= {title} =
*Created:* {created}
== Summary ==
Provide a brief overview of the note here.

== Main Content ==
Write the main content here, using *bold*, _italic_, and [[wiki links|custom descriptions]].

=== Subsection Example ===
Expand on specific topics with additional details.

* Bullet list item
* Another item
    - Nested bullet list item

1. Numbered list item
2. Second numbered item

== Tasks ==
* [] Todo item 1
* [] Todo item 2

== Resources ==
- [[resource link]]
- [[reference|Optional description]]

== Additional Notes ==
Add any extra details or reminders here.
",
        created = now.format(CREATED_FMT)
    )
}

/// What the picker handed back, with its arity made explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Nothing typed, nothing picked.
    Empty,
    /// Only a typed query; asks for a new note with that title.
    Query(String),
    /// An existing candidate was picked. Further picks from a
    /// multi-select are dropped.
    Pick { query: String, choice: String },
}

impl Selection {
    /// Interpret lines from a picker run with print-query enabled.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut lines = lines.into_iter();
        let query = lines.next();
        let choice = lines.next();
        match (query, choice) {
            (Some(query), Some(choice)) => Selection::Pick { query, choice },
            (Some(query), None) if !query.trim().is_empty() => {
                Selection::Query(query)
            }
            _ => Selection::Empty,
        }
    }

    pub fn choice(&self) -> Option<&str> {
        match self {
            Selection::Pick { choice, .. } => Some(choice),
            _ => None,
        }
    }
}

/// Map a selection to the file to open, creating a templated note when
/// only a query was given.
pub fn resolve(
    selection: &Selection,
    notebook_root: &Path,
    wiki_root: &Path,
) -> Result<PathBuf> {
    resolve_at(selection, notebook_root, wiki_root, Local::now().naive_local())
}

pub fn resolve_at(
    selection: &Selection,
    notebook_root: &Path,
    wiki_root: &Path,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    match selection {
        Selection::Empty => Err(Error::NoSelection),
        Selection::Pick { choice, .. } => Ok(wiki_root.join(choice)),
        Selection::Query(title) => {
            let note = Note::synthesize(title.trim(), notebook_root, now);
            note.persist()?;
            Ok(note.path)
        }
    }
}
