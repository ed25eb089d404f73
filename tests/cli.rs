#![allow(deprecated)]
#![cfg(unix)]

#[allow(unused_imports)]
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FZF_STUB: &str = "#!/bin/sh\nprintf '%b' \"$FZF_REPLY\"\nexit \"${FZF_EXIT:-0}\"\n";
const EDITOR_STUB: &str = "#!/bin/sh\necho \"$PWD/$1\" >> \"$EDITOR_LOG\"\n";

/// Scratch world: a config dir, a wiki, and a bin dir that is the whole
/// `PATH`, holding stand-ins for fzf and the editor.
struct World {
    temp: TempDir,
}

impl World {
    fn new() -> Self {
        let world = Self { temp: TempDir::new().unwrap() };
        fs::create_dir_all(world.bin()).unwrap();
        fs::create_dir_all(world.config()).unwrap();
        fs::create_dir_all(world.notebook()).unwrap();
        world.script("fzf", FZF_STUB);
        world.script("edit-stub", EDITOR_STUB);
        world.write_settings();
        world
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn bin(&self) -> PathBuf {
        self.root().join("bin")
    }

    fn config(&self) -> PathBuf {
        self.root().join("config")
    }

    fn wiki(&self) -> PathBuf {
        self.root().join("wiki")
    }

    fn notebook(&self) -> PathBuf {
        self.wiki().join("notes")
    }

    fn editor_log(&self) -> PathBuf {
        self.root().join("editor.log")
    }

    fn script(&self, name: &str, body: &str) {
        let path = self.bin().join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn write_settings(&self) {
        let settings = format!(
            "{{\n  \"editor\": \"edit-stub\",\n  \"wiki_dir\": \"{}\",\n  \"notebook_dir\": \"{}\"\n}}\n",
            self.wiki().display(),
            self.notebook().display()
        );
        fs::write(self.config().join("settings.json"), settings).unwrap();
    }

    fn opened(&self) -> String {
        fs::read_to_string(self.editor_log()).unwrap_or_default()
    }

    fn cmd(&self, bin: &str) -> assert_cmd::Command {
        let mut c = assert_cmd::Command::cargo_bin(bin).unwrap();
        c.env_clear()
            .env("PATH", self.bin())
            .env("HOME", self.root())
            .env("WIKINOTE_CONFIG_DIR", self.config())
            .env("NO_COLOR", "1")
            .env("EDITOR_LOG", self.editor_log());
        c
    }
}

#[test]
fn help_and_version() {
    let world = World::new();
    world
        .cmd("wikinote")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--directory"))
        .stdout(predicate::str::contains("--notes"));

    world
        .cmd("wn")
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_argument_fails() {
    let world = World::new();
    world
        .cmd("wikinote")
        .arg("--bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: Unknown argument: --bogus"));
}

#[test]
fn directory_search_opens_pick_in_its_folder() {
    let world = World::new();
    let proj = world.root().join("proj");
    fs::create_dir_all(proj.join("src")).unwrap();
    fs::write(proj.join("src/main.rs"), "fn main() {}\n").unwrap();

    world
        .cmd("wikinote")
        .args(["-d", proj.to_str().unwrap()])
        .env("FZF_REPLY", "\\nproj/src/main.rs\\n")
        .assert()
        .success();

    let opened = world.opened();
    assert!(opened.trim_end().ends_with("proj/src/main.rs"), "{opened}");
}

#[test]
fn directory_search_without_pick() {
    let world = World::new();
    world
        .cmd("wikinote")
        .args(["--directory", world.wiki().to_str().unwrap()])
        .env("FZF_REPLY", "")
        .env("FZF_EXIT", "130")
        .assert()
        .success()
        .stdout(predicate::str::contains("No file selected."));
    assert!(world.opened().is_empty());
}

#[test]
fn directory_search_missing_root_fails() {
    let world = World::new();
    world
        .cmd("wikinote")
        .args(["-d", world.root().join("nope").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn notes_creates_templated_note_from_query() {
    let world = World::new();
    world
        .cmd("wn")
        .arg("-n")
        .env("FZF_REPLY", "Standup\\n")
        .env("FZF_EXIT", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("-Standup.wiki"));

    let notes: Vec<_> = fs::read_dir(world.notebook())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(notes.len(), 1);
    let body = fs::read_to_string(&notes[0]).unwrap();
    assert!(body.starts_with("= Standup ="), "{body}");
    assert!(world.opened().contains("-Standup.wiki"));
}

#[test]
fn notes_opens_existing_pick_from_wiki_root() {
    let world = World::new();
    fs::write(world.notebook().join("old.wiki"), "= Old =\n").unwrap();
    world
        .cmd("wikinote")
        .arg("--notes")
        .env("FZF_REPLY", "ol\\nnotes/old.wiki\\n")
        .assert()
        .success();

    assert_eq!(fs::read_dir(world.notebook()).unwrap().count(), 1);
    assert!(world.opened().trim_end().ends_with("notes/old.wiki"));
}

#[test]
fn notes_without_anything_typed() {
    let world = World::new();
    world
        .cmd("wikinote")
        .arg("-n")
        .env("FZF_REPLY", "")
        .env("FZF_EXIT", "130")
        .assert()
        .success()
        .stdout(predicate::str::contains("No note selected."));
    assert_eq!(fs::read_dir(world.notebook()).unwrap().count(), 0);
}

#[test]
fn picker_failure_is_reported() {
    let world = World::new();
    world
        .cmd("wikinote")
        .arg("-n")
        .env("FZF_EXIT", "2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exited with status 2"));
}

#[test]
fn missing_fzf_fails_before_anything_runs() {
    let world = World::new();
    fs::remove_file(world.bin().join("fzf")).unwrap();
    world
        .cmd("wikinote")
        .arg("-n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'fzf'"))
        .stderr(predicate::str::contains("github.com/junegunn/fzf"));
    assert!(world.opened().is_empty());
}

#[test]
fn corrupt_settings_are_replaced_with_defaults() {
    let world = World::new();
    let file = world.config().join("settings.json");
    fs::write(&file, "{ not json").unwrap();

    // The default editor is not on the stub PATH, so the run stops there.
    world
        .cmd("wikinote")
        .args(["-d", world.wiki().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'nvim'"));

    let restored = fs::read_to_string(&file).unwrap();
    assert!(restored.contains("\"editor\": \"nvim\""), "{restored}");
    assert!(restored.contains("\"keymap\""));
}

#[test]
fn config_dir_flag_seeds_settings() {
    let world = World::new();
    let other = world.root().join("other-config");
    world
        .cmd("wikinote")
        .args(["-c", other.to_str().unwrap(), "-d", world.wiki().to_str().unwrap()])
        .assert()
        .failure();
    assert!(other.join("settings.json").is_file());
}
