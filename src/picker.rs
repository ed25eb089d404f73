use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::process::{self, CommandRunner, CommandSpec, SystemRunner};

pub const FZF_HINT: &str = "https://github.com/junegunn/fzf";

/// Exit codes fzf uses for "picked", "no match" and "aborted".
const NORMAL_EXITS: [i32; 3] = [0, 1, 130];

/// Something that lets the user choose among candidate lines.
///
/// The returned lines depend on the options: with `print_query` the first
/// line is whatever was typed, followed by the picked entries.
pub trait Picker {
    fn prompt(
        &self,
        candidates: &[String],
        options: &PickerOptions,
    ) -> Result<Vec<String>>;
}

/// Flags appended to the picker command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerOptions {
    print_query: bool,
    multi_select: bool,
    cycle: bool,
    border: bool,
    reverse: bool,
    preview_command: Option<String>,
    preview_window: Option<String>,
    extra: Vec<String>,
}

impl PickerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the note capture prompt: preview the hovered note from
    /// the wiki root and echo the typed query.
    pub fn capture(preview_command: String, border: bool) -> Self {
        Self::new()
            .preview(preview_command)
            .preview_window("up,20")
            .border(border)
            .print_query(true)
    }

    pub fn print_query(mut self, enabled: bool) -> Self {
        self.print_query = enabled;
        self
    }

    pub fn multi_select(mut self, enabled: bool) -> Self {
        self.multi_select = enabled;
        self
    }

    pub fn cycle(mut self, enabled: bool) -> Self {
        self.cycle = enabled;
        self
    }

    pub fn border(mut self, enabled: bool) -> Self {
        self.border = enabled;
        self
    }

    pub fn reverse(mut self, enabled: bool) -> Self {
        self.reverse = enabled;
        self
    }

    pub fn preview(mut self, command: impl Into<String>) -> Self {
        self.preview_command = Some(command.into());
        self
    }

    pub fn preview_window(mut self, spec: &str) -> Self {
        self.preview_window = Some(spec.to_string());
        self
    }

    pub fn arg(mut self, raw: impl Into<String>) -> Self {
        self.extra.push(raw.into());
        self
    }

    pub fn prints_query(&self) -> bool {
        self.print_query
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.reverse {
            args.push("--reverse".to_string());
        }
        if self.multi_select {
            args.push("--multi".to_string());
        }
        if self.cycle {
            args.push("--cycle".to_string());
        }
        if let Some(ref window) = self.preview_window {
            args.push(format!("--preview-window={window}"));
        }
        if self.border {
            args.push("--border".to_string());
        }
        if let Some(ref preview) = self.preview_command {
            args.push(format!("--preview={preview}"));
        }
        if self.print_query {
            args.push("--print-query".to_string());
        }
        args.extend(self.extra.iter().cloned());
        args
    }
}

/// fzf driven through temporary files: candidates go in through a file on
/// stdin, the selection comes back through a file on stdout. Both files are
/// removed when the call returns, whatever the outcome.
pub struct Fzf {
    program: PathBuf,
    runner: Box<dyn CommandRunner>,
}

impl Fzf {
    /// Find `fzf` on `PATH`.
    pub fn locate() -> Result<Self> {
        Self::at("fzf", Box::new(SystemRunner))
    }

    /// Use `program` (a name on `PATH` or an explicit path).
    pub fn at(program: &str, runner: Box<dyn CommandRunner>) -> Result<Self> {
        let program = process::locate(program, FZF_HINT)?;
        Ok(Self { program, runner })
    }

    fn handoff(&self, candidates: &[String]) -> Result<(NamedTempFile, NamedTempFile)> {
        let tmp_err = |e| Error::from_io(&std::env::temp_dir(), e);
        let mut input = NamedTempFile::new().map_err(tmp_err)?;
        let output = NamedTempFile::new().map_err(tmp_err)?;
        input
            .write_all(candidates.join("\n").as_bytes())
            .and_then(|_| input.flush())
            .map_err(|e| Error::from_io(input.path(), e))?;
        Ok((input, output))
    }
}

impl Picker for Fzf {
    fn prompt(
        &self,
        candidates: &[String],
        options: &PickerOptions,
    ) -> Result<Vec<String>> {
        let (input, output) = self.handoff(candidates)?;
        let spec = CommandSpec::new(&self.program)
            .args(options.to_args())
            .stdin_from(input.path())
            .stdout_to(output.path());

        let outcome = self.runner.run(&spec)?;
        debug!(code = ?outcome.code, candidates = candidates.len(), "picker finished");
        match outcome.code {
            Some(code) if NORMAL_EXITS.contains(&code) => {}
            code => {
                warn!(?code, "picker failed");
                return Err(Error::Process { program: spec.program_name(), code });
            }
        }

        let raw = fs::read_to_string(output.path())
            .map_err(|e| Error::from_io(output.path(), e))?;
        Ok(raw.lines().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ExitOutcome;
    use crate::process::testing::StubRunner;
    use std::path::Path;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fzf(stub: &StubRunner) -> Fzf {
        // `sh` stands in for the binary; the stub never runs it.
        Fzf::at("sh", Box::new(stub.clone())).unwrap()
    }

    fn temp_paths(stub: &StubRunner) -> (PathBuf, PathBuf) {
        let calls = stub.calls.borrow();
        let spec = calls.last().unwrap();
        (spec.stdin.clone().unwrap(), spec.stdout.clone().unwrap())
    }

    #[test]
    fn echoes_back_picked_line_and_cleans_up() {
        let stub = StubRunner::new(|spec| {
            let input = fs::read_to_string(spec.stdin.as_ref().unwrap()).unwrap();
            assert_eq!(input, "a\nb\nc");
            let first = input.lines().next().unwrap();
            fs::write(spec.stdout.as_ref().unwrap(), format!("{first}\n")).unwrap();
            Ok(ExitOutcome::success())
        });
        let picker = fzf(&stub);

        let got = picker
            .prompt(&strings(&["a", "b", "c"]), &PickerOptions::new())
            .unwrap();
        assert_eq!(got, strings(&["a"]));

        let (input, output) = temp_paths(&stub);
        assert!(!input.exists());
        assert!(!output.exists());
    }

    #[test]
    fn runner_failure_still_removes_temp_files() {
        let stub = StubRunner::new(|spec| {
            Err(Error::from_io(&spec.program, std::io::Error::other("spawn failed")))
        });
        let picker = fzf(&stub);

        let err = picker
            .prompt(&strings(&["a", "b"]), &PickerOptions::new())
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));

        let (input, output) = temp_paths(&stub);
        assert!(!input.exists());
        assert!(!output.exists());
    }

    #[test]
    fn aborted_picker_returns_typed_query_only() {
        let stub = StubRunner::new(|spec| {
            fs::write(spec.stdout.as_ref().unwrap(), "My Idea\n").unwrap();
            Ok(ExitOutcome::with_code(1))
        });
        let got = fzf(&stub)
            .prompt(&strings(&["x"]), &PickerOptions::new().print_query(true))
            .unwrap();
        assert_eq!(got, strings(&["My Idea"]));
    }

    #[test]
    fn unexpected_exit_code_is_an_error() {
        let stub = StubRunner::new(|_| Ok(ExitOutcome::with_code(2)));
        let err = fzf(&stub)
            .prompt(&strings(&["x"]), &PickerOptions::new())
            .unwrap_err();
        assert!(matches!(err, Error::Process { code: Some(2), .. }));
        let (input, output) = temp_paths(&stub);
        assert!(!input.exists() && !output.exists());
    }

    #[test]
    fn empty_output_is_empty_selection() {
        let stub = StubRunner::new(|_| Ok(ExitOutcome::with_code(130)));
        let got = fzf(&stub).prompt(&[], &PickerOptions::new()).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn options_render_in_order() {
        let opts = PickerOptions::new()
            .reverse(true)
            .multi_select(true)
            .cycle(true)
            .print_query(true);
        assert_eq!(
            opts.to_args(),
            strings(&["--reverse", "--multi", "--cycle", "--print-query"])
        );
    }

    #[test]
    fn capture_options_carry_preview_and_query() {
        let opts = PickerOptions::capture("cat ~/wiki/{}".into(), false);
        assert!(opts.prints_query());
        let args = opts.to_args();
        assert!(args.contains(&"--preview-window=up,20".to_string()));
        assert!(args.contains(&"--preview=cat ~/wiki/{}".to_string()));
        assert!(!args.contains(&"--border".to_string()));
    }

    #[test]
    fn options_are_passed_to_the_program() {
        let stub = StubRunner::new(|_| Ok(ExitOutcome::success()));
        fzf(&stub)
            .prompt(&strings(&["x"]), &PickerOptions::new().cycle(true).arg("--exact"))
            .unwrap();
        let calls = stub.calls.borrow();
        assert_eq!(calls[0].args, strings(&["--cycle", "--exact"]));
        assert!(Path::new(&calls[0].program).is_absolute());
    }

    #[test]
    fn missing_program_fails_at_construction() {
        let err = Fzf::at("no-such-fzf-9c1d", Box::new(StubRunner::succeeding()))
            .err()
            .unwrap();
        assert!(matches!(err, Error::MissingDependency { .. }));
    }
}
