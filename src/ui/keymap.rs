//! Key chord parsing and matching.
//!
//! Chords are written like "ctrl+n" or "f2" in the `keymap` settings table
//! and matched against crossterm key events at runtime.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use super::state::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

pub fn parse_key_chord(input: &str) -> Option<KeyChord> {
    let trimmed = input.trim().to_lowercase();
    let parts: Vec<&str> = trimmed
        .split('+')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }

    let mut chord =
        KeyChord { key: KeyCode::Null, ctrl: false, alt: false, shift: false };
    for part in parts {
        match part {
            "ctrl" | "control" => chord.ctrl = true,
            "alt" | "option" | "meta" => chord.alt = true,
            "shift" => chord.shift = true,
            key => {
                if chord.key != KeyCode::Null {
                    return None;
                }
                chord.key = parse_key(key)?;
            }
        }
    }

    (chord.key != KeyCode::Null).then_some(chord)
}

fn parse_key(key: &str) -> Option<KeyCode> {
    match key {
        "esc" | "escape" => Some(KeyCode::Esc),
        "enter" | "return" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => {
            if let Some(n) = key.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                return (1..=12).contains(&n).then_some(KeyCode::F(n));
            }
            let mut chars = key.chars();
            let first = chars.next()?;
            chars.next().is_none().then_some(KeyCode::Char(first))
        }
    }
}

pub fn matches_chord(event: KeyEvent, chord: &KeyChord) -> bool {
    let code = match event.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    if code != chord.key {
        return false;
    }
    let modifiers = event.modifiers;
    modifiers.contains(KeyModifiers::CONTROL) == chord.ctrl
        && modifiers.contains(KeyModifiers::ALT) == chord.alt
        && (modifiers.contains(KeyModifiers::SHIFT) == chord.shift
            || matches!(event.code, KeyCode::Char(c) if c.is_ascii_uppercase()))
}

/// The bindings the UI dispatches on, with a printable label per chord for
/// the menu bar.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(Action, KeyChord, String)>,
}

const ACTIONS: [(&str, Action, &str); 5] = [
    ("quit", Action::Quit, "ctrl+q"),
    ("help", Action::Help, "f1"),
    ("options", Action::Options, "f2"),
    ("notes", Action::Notes, "ctrl+n"),
    ("home", Action::Home, "esc"),
];

impl Keymap {
    /// Build from the `keymap` settings table. Unparseable or missing
    /// entries fall back to the built-in chord.
    pub fn from_settings(table: &BTreeMap<String, String>) -> Self {
        let bindings = ACTIONS
            .iter()
            .map(|(name, action, default)| {
                let configured = table.get(*name).map(String::as_str);
                let chord = configured.and_then(parse_key_chord);
                if chord.is_none() && configured.is_some() {
                    warn!(action = *name, value = ?configured, "bad key chord, using default");
                }
                let (chord, text) = match (chord, configured) {
                    (Some(c), Some(text)) => (c, text.to_string()),
                    _ => (
                        parse_key_chord(default).unwrap_or(KeyChord {
                            key: KeyCode::Null,
                            ctrl: false,
                            alt: false,
                            shift: false,
                        }),
                        default.to_string(),
                    ),
                };
                (*action, chord, short_label(&text))
            })
            .collect();
        Self { bindings }
    }

    pub fn action_for(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, chord, _)| matches_chord(event, chord))
            .map(|(action, _, _)| *action)
    }

    pub fn label(&self, action: Action) -> &str {
        self.bindings
            .iter()
            .find(|(a, _, _)| *a == action)
            .map(|(_, _, label)| label.as_str())
            .unwrap_or("?")
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_settings(&BTreeMap::new())
    }
}

/// "ctrl+q" -> "C-q", "f2" -> "F2".
fn short_label(chord: &str) -> String {
    chord
        .split('+')
        .map(|part| match part.trim().to_lowercase().as_str() {
            "ctrl" | "control" => "C".to_string(),
            "alt" | "option" | "meta" => "M".to_string(),
            "shift" => "S".to_string(),
            "esc" | "escape" => "Esc".to_string(),
            key if key.starts_with('f') && key.len() > 1 => key.to_uppercase(),
            key => key.to_string(),
        })
        .collect::<Vec<_>>()
        .join("-")
}
