//! External process plumbing shared by the picker and the editor launcher.
//!
//! Every launch is described by a [`CommandSpec`] and executed through a
//! [`CommandRunner`], so tests can swap in a stub that never spawns.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// A single blocking invocation of an external program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// File redirected to the child's standard input.
    pub stdin: Option<PathBuf>,
    /// File the child's standard output is written to.
    pub stdout: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), ..Default::default() }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin_from(mut self, path: &Path) -> Self {
        self.stdin = Some(path.to_path_buf());
        self
    }

    pub fn stdout_to(mut self, path: &Path) -> Self {
        self.stdout = Some(path.to_path_buf());
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

/// Exit information of a finished child. `code` is `None` when the child
/// was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn with_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<ExitOutcome>;
}

/// Runs commands for real, inheriting whatever stdio is not redirected.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<ExitOutcome> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        match &spec.stdin {
            Some(path) => {
                let file = File::open(path).map_err(|e| Error::from_io(path, e))?;
                cmd.stdin(Stdio::from(file));
            }
            None => {
                cmd.stdin(Stdio::inherit());
            }
        }
        match &spec.stdout {
            Some(path) => {
                let file =
                    File::create(path).map_err(|e| Error::from_io(path, e))?;
                cmd.stdout(Stdio::from(file));
            }
            None => {
                cmd.stdout(Stdio::inherit());
            }
        }
        cmd.stderr(Stdio::inherit());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        debug!(program = %spec.program.display(), args = ?spec.args, "spawning");
        let status = cmd.status().map_err(|e| Error::from_io(&spec.program, e))?;
        Ok(ExitOutcome { code: status.code() })
    }
}

/// Resolve `program` to an executable, either an explicit path or a name
/// looked up on `PATH`.
pub fn locate(program: &str, hint: &str) -> Result<PathBuf> {
    let missing = || Error::MissingDependency {
        program: program.to_string(),
        hint: hint.to_string(),
    };
    if program.contains(std::path::MAIN_SEPARATOR) {
        let path = PathBuf::from(program);
        return if path.is_file() { Ok(path) } else { Err(missing()) };
    }
    which::which(program).map_err(|_| missing())
}

/// Whether `program` can be found on `PATH`.
pub fn on_path(program: &str) -> bool {
    which::which(program).is_ok()
}

const EDITOR_HINT: &str = "your package manager, or set \"editor\" in settings.json";

/// Opens files in the configured editor.
pub struct Editor {
    program: PathBuf,
    args: Vec<String>,
    runner: Box<dyn CommandRunner>,
}

impl Editor {
    /// Split `command` on whitespace into program and leading arguments and
    /// make sure the program exists.
    pub fn from_command(command: &str) -> Result<Self> {
        Self::with_runner(command, Box::new(SystemRunner))
    }

    pub fn with_runner(
        command: &str,
        runner: Box<dyn CommandRunner>,
    ) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            Error::Usage("the \"editor\" setting is empty".to_string())
        })?;
        let program = locate(program, EDITOR_HINT)?;
        Ok(Self { program, args: parts.map(String::from).collect(), runner })
    }

    /// Launch the editor on the file's base name from inside its parent
    /// directory. Blocks until the editor exits.
    pub fn open(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .ok_or_else(|| Error::NotFound { path: path.to_path_buf() })?;
        let mut spec = CommandSpec::new(&self.program)
            .args(self.args.iter().cloned())
            .args([name.to_string_lossy().into_owned()]);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            spec = spec.current_dir(parent);
        }

        info!(file = %path.display(), editor = %self.program.display(), "opening editor");
        let outcome = self.runner.run(&spec)?;
        if !outcome.is_success() {
            return Err(Error::Process {
                program: spec.program_name(),
                code: outcome.code,
            });
        }
        Ok(())
    }
}
