//! User settings stored as a small JSON object.
//!
//! Lookup order for the directory: explicit override, `WIKINOTE_CONFIG_DIR`,
//! then `<config dir>/wikinote`. A missing or unparseable file is replaced
//! with the defaults; keys missing from an otherwise valid file take their
//! default value and unknown keys are carried through untouched.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub const CONFIG_DIR_ENV: &str = "WIKINOTE_CONFIG_DIR";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub editor: String,
    pub wiki_dir: String,
    pub notebook_dir: String,
    pub color_scheme: BTreeMap<String, String>,
    pub keymap: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        let color_scheme = [
            ("background", "#1a1b26"),
            ("text", "#c0caf5"),
            ("title", "bg:#16161e fg:#1a1b26"),
            ("bg1", "#24283b"),
            ("fg1", "#a9b1d6"),
            ("p1", "fg:#3d59a1"),
            ("cursor", "#ff9e64"),
            ("hl", "#7aa2f7"),
            ("hl1", "#2ac3de"),
            ("hl2", "#bb9af7"),
            ("border", "#3d59a1"),
            ("border1", "#565f89"),
            ("border2", "#414868"),
            ("flash", "#f7768e"),
        ];
        let keymap = [
            ("quit", "ctrl+q"),
            ("notes", "ctrl+n"),
            ("help", "f1"),
            ("options", "f2"),
            ("home", "esc"),
        ];
        Self {
            editor: "nvim".to_string(),
            wiki_dir: "~/wiki".to_string(),
            notebook_dir: "~/wiki/notes".to_string(),
            color_scheme: owned_map(&color_scheme),
            keymap: owned_map(&keymap),
            extra: BTreeMap::new(),
        }
    }
}

fn owned_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

impl Settings {
    /// Look a key up by its exact name.
    pub fn get(&self, key: &str) -> Result<Value> {
        let map = |m: &BTreeMap<String, String>| {
            Value::Object(
                m.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect(),
            )
        };
        match key {
            "editor" => Ok(Value::String(self.editor.clone())),
            "wiki_dir" => Ok(Value::String(self.wiki_dir.clone())),
            "notebook_dir" => Ok(Value::String(self.notebook_dir.clone())),
            "color_scheme" => Ok(map(&self.color_scheme)),
            "keymap" => Ok(map(&self.keymap)),
            other => self
                .extra
                .get(other)
                .cloned()
                .ok_or_else(|| Error::KeyNotFound(other.to_string())),
        }
    }

    pub fn wiki_root(&self) -> PathBuf {
        expand_tilde(&self.wiki_dir)
    }

    pub fn notebook_root(&self) -> PathBuf {
        expand_tilde(&self.notebook_dir)
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
    file: PathBuf,
}

impl SettingsStore {
    /// Resolve the settings directory, create it, and seed the defaults
    /// when no settings file exists yet.
    pub fn open(dir_override: Option<&Path>) -> Result<Self> {
        let dir = match dir_override {
            Some(dir) => dir.to_path_buf(),
            None => default_dir()?,
        };
        fs::create_dir_all(&dir).map_err(|e| Error::from_io(&dir, e))?;
        let store = Self { file: dir.join(SETTINGS_FILE), dir };
        if !store.file.exists() {
            debug!(file = %store.file.display(), "seeding default settings");
            store.save(&Settings::default())?;
        }
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Read the settings file. A missing or unparseable file is overwritten
    /// with the defaults, which are returned.
    pub fn load(&self) -> Result<Settings> {
        let raw = match fs::read_to_string(&self.file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return self.reset();
            }
            Err(e) => return Err(Error::from_io(&self.file, e)),
        };
        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(file = %self.file.display(), error = %e, "settings unreadable, restoring defaults");
                self.reset()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|source| Error::Settings { path: self.file.clone(), source })?;
        fs::write(&self.file, json + "\n").map_err(|e| Error::from_io(&self.file, e))
    }

    fn reset(&self) -> Result<Settings> {
        let defaults = Settings::default();
        self.save(&defaults)?;
        Ok(defaults)
    }
}

fn default_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join("wikinote")).ok_or_else(|| {
        Error::Usage(format!(
            "no config directory for this user; set {CONFIG_DIR_ENV} or pass --config-dir"
        ))
    })
}
