use std::path::PathBuf;

use crate::error::{Error, Result};

pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
}

impl ArgParser {
    pub fn new(args: Vec<String>) -> Self {
        Self { iter: args.into_iter() }
    }

    /// Extract a string value for a flag
    pub fn extract_value(&mut self, flag: &str) -> Result<String> {
        match self.iter.next() {
            Some(v) if !v.starts_with('-') || v == "-" => Ok(v),
            _ => Err(Error::Usage(format!("Provide a value after {flag}"))),
        }
    }

    /// Get next argument
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }

    pub fn parse(mut self) -> Result<Invocation> {
        let mut inv = Invocation::default();
        while let Some(arg) = self.next() {
            // Accept --flag=value as well as --flag value.
            let (flag, inline) = match arg.split_once('=') {
                Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
                _ => (arg, None),
            };
            let value = |parser: &mut Self| match inline.clone() {
                Some(v) => Ok(v),
                None => parser.extract_value(&flag),
            };
            match flag.as_str() {
                "-d" | "--directory" => inv.directory = Some(value(&mut self)?),
                "-n" | "--notes" => inv.notes = true,
                "-c" | "--config-dir" => {
                    inv.config_dir = Some(PathBuf::from(value(&mut self)?))
                }
                "-h" | "--help" => inv.help = true,
                "-V" | "--version" => inv.version = true,
                other => {
                    return Err(Error::Usage(format!("Unknown argument: {other}")));
                }
            }
        }
        Ok(inv)
    }
}

/// What the user asked for on the command line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    pub directory: Option<String>,
    pub notes: bool,
    pub config_dir: Option<PathBuf>,
    pub help: bool,
    pub version: bool,
}

impl Invocation {
    /// No flow was requested, so the full-screen UI runs.
    pub fn wants_ui(&self) -> bool {
        self.directory.is_none() && !self.notes
    }
}

pub fn usage() -> String {
    format!(
        "\
wikinote {}
Usage:
  wikinote                         Launch the full-screen UI
  wikinote -d, --directory <path>  Pick a file below <path> and open it in the editor
  wikinote -n, --notes             Open a notebook note, or type a title to start a new one
  wikinote -c, --config-dir <dir>  Read settings.json from <dir>
  wikinote -h, --help              Show this message
  wikinote -V, --version           Show the version

Environment:
  WIKINOTE_CONFIG_DIR              Settings directory (default: <config dir>/wikinote)
  WIKINOTE_LOG                     Log level written to stderr (error|warn|info|debug|trace)
  NO_COLOR                         Disable colored output
",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation> {
        ArgParser::new(args.iter().map(|s| s.to_string()).collect()).parse()
    }

    #[test]
    fn no_args_means_ui() {
        let inv = parse(&[]).unwrap();
        assert!(inv.wants_ui());
    }

    #[test]
    fn directory_short_and_long() {
        assert_eq!(parse(&["-d", "~/src"]).unwrap().directory.as_deref(), Some("~/src"));
        assert_eq!(
            parse(&["--directory", "/tmp"]).unwrap().directory.as_deref(),
            Some("/tmp")
        );
        assert_eq!(
            parse(&["--directory=/tmp"]).unwrap().directory.as_deref(),
            Some("/tmp")
        );
    }

    #[test]
    fn notes_and_config_dir() {
        let inv = parse(&["-n", "-c", "/etc/wn"]).unwrap();
        assert!(inv.notes);
        assert!(!inv.wants_ui());
        assert_eq!(inv.config_dir, Some(PathBuf::from("/etc/wn")));
    }

    #[test]
    fn missing_value_is_usage_error() {
        assert!(matches!(parse(&["-d"]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["-d", "-n"]), Err(Error::Usage(_))));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = parse(&["--frobnicate"]).unwrap_err();
        assert!(err.to_string().contains("--frobnicate"));
    }
}
