//! Candidate listing for the picker.
//!
//! Every regular file below a root is reported as a `/`-joined path that
//! starts with the root's own name, e.g. listing `~/wiki/notes` yields
//! `notes/todo.wiki` and `notes/work/standup.wiki`. Entries come out in
//! whatever order the filesystem hands them over.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

pub fn list_paths(root: &Path) -> Result<Vec<String>> {
    let meta = fs::metadata(root).map_err(|e| Error::from_io(root, e))?;
    if !meta.is_dir() {
        return Err(Error::NotFound { path: root.to_path_buf() });
    }

    let prefix = root_label(root);
    let mut files = Vec::new();
    let mut pending: Vec<(PathBuf, String)> = vec![(root.to_path_buf(), prefix)];

    while let Some((dir, label)) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| Error::from_io(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::from_io(&dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let rel = join_label(&label, &name);
            let path = entry.path();
            let file_type =
                entry.file_type().map_err(|e| Error::from_io(&path, e))?;

            if file_type.is_dir() {
                pending.push((path, rel));
            } else if file_type.is_file() {
                files.push(rel);
            } else if file_type.is_symlink() {
                // Links to files count; linked directories are not descended.
                if fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
                    files.push(rel);
                }
            }
        }
    }

    debug!(root = %root.display(), count = files.len(), "listed candidates");
    Ok(files)
}

/// Directory the listed entries are relative to: the root's parent, or the
/// root itself when it has no name to prefix entries with (`/`).
pub fn entry_base(root: &Path) -> PathBuf {
    match root.parent() {
        Some(parent) if !root_label(root).is_empty() => parent.to_path_buf(),
        _ => root.to_path_buf(),
    }
}

/// Name used to prefix entries: the root's final component, resolving
/// `.`/`..` through the filesystem when the path itself has none.
fn root_label(root: &Path) -> String {
    if let Some(name) = root.file_name() {
        return name.to_string_lossy().into_owned();
    }
    fs::canonicalize(root)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default()
}

fn join_label(label: &str, name: &str) -> String {
    if label.is_empty() { name.to_string() } else { format!("{label}/{name}") }
}
