//! Maps the `color_scheme` settings table onto ratatui styles.
//!
//! Values use the small style language of the settings file: `#rrggbb`
//! (foreground), `fg:#rrggbb`, `bg:#rrggbb`, and the words `bold`,
//! `italic`, `underline`, separated by spaces.

use std::collections::BTreeMap;

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub base: Style,
    pub title: Style,
    pub pane: Style,
    pub prompt: Style,
    pub separator: Style,
    pub heading: Style,
    pub emphasis: Style,
    pub code: Style,
    pub bullet: Style,
    pub error: Style,
}

impl Theme {
    pub fn from_scheme(scheme: &BTreeMap<String, String>) -> Self {
        let role = |name: &str| scheme.get(name).map(|s| parse_style(s)).unwrap_or_default();
        let fg_only = |name: &str| {
            let style = role(name);
            Style { bg: None, ..style }
        };

        let base = role("text").patch(bg_from(&role("background")));
        let pane = base.patch(bg_from(&role("bg1"))).patch(fg_from(&role("fg1")));
        Self {
            base,
            title: role("title"),
            pane,
            prompt: role("title").patch(fg_only("p1")),
            separator: pane.patch(fg_only("border")),
            heading: fg_only("hl").add_modifier(Modifier::BOLD),
            emphasis: fg_only("hl2"),
            code: fg_only("hl1"),
            bullet: fg_only("cursor"),
            error: fg_only("flash").add_modifier(Modifier::BOLD),
        }
    }
}

/// A bare `#rrggbb` on a background role means the background color.
fn bg_from(style: &Style) -> Style {
    match (style.bg, style.fg) {
        (Some(bg), _) => Style::default().bg(bg),
        (None, Some(fg)) => Style::default().bg(fg),
        (None, None) => Style::default(),
    }
}

fn fg_from(style: &Style) -> Style {
    style.fg.map(|fg| Style::default().fg(fg)).unwrap_or_default()
}

pub fn parse_style(spec: &str) -> Style {
    let mut style = Style::default();
    for token in spec.split_whitespace() {
        if let Some(hex) = token.strip_prefix("bg:") {
            if let Some(color) = parse_hex(hex) {
                style = style.bg(color);
            }
        } else if let Some(hex) = token.strip_prefix("fg:") {
            if let Some(color) = parse_hex(hex) {
                style = style.fg(color);
            }
        } else if let Some(color) = parse_hex(token) {
            style = style.fg(color);
        } else {
            match token {
                "bold" => style = style.add_modifier(Modifier::BOLD),
                "italic" => style = style.add_modifier(Modifier::ITALIC),
                "underline" => style = style.add_modifier(Modifier::UNDERLINED),
                _ => {}
            }
        }
    }
    style
}

fn parse_hex(token: &str) -> Option<Color> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(Color::Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8))
}
