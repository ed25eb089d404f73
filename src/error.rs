use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied reading {}", path.display())]
    Permission { path: PathBuf },

    #[error("cannot find '{program}' on PATH; install it from {hint}")]
    MissingDependency { program: String, hint: String },

    #[error("unknown settings key: {0}")]
    KeyNotFound(String),

    #[error("nothing selected")]
    NoSelection,

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize settings to {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{program} exited with status {}", code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    Process { program: String, code: Option<i32> },

    #[error("{0}")]
    Usage(String),
}

impl Error {
    /// Classify an io error raised while touching `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Error::NotFound { path: path.to_path_buf() },
            io::ErrorKind::PermissionDenied => {
                Error::Permission { path: path.to_path_buf() }
            }
            _ => Error::Io { path: path.to_path_buf(), source },
        }
    }

    /// Errors the UI reports in its status line instead of exiting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NoSelection | Error::Process { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_io_maps_kinds() {
        let path = Path::new("/tmp/whatever");
        let err = Error::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, Error::NotFound { .. }));

        let err = Error::from_io(
            path,
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, Error::Permission { .. }));

        let err = Error::from_io(path, io::Error::other("boom"));
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn missing_dependency_names_program_and_hint() {
        let err = Error::MissingDependency {
            program: "fzf".into(),
            hint: "https://github.com/junegunn/fzf".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'fzf'"));
        assert!(msg.contains("junegunn/fzf"));
    }
}
