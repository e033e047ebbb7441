//! Dark and light palettes
//! The selected mode is the one preference persisted in the config file.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Icon for the toggle hint (shows what you switch to)
    pub fn toggle_icon(self) -> &'static str {
        match self {
            ThemeMode::Dark => "☀",
            ThemeMode::Light => "☾",
        }
    }
}

/// Theme colors for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub accent: Color,       // Focused borders, buttons
    pub accent_bright: Color,
    pub danger: Color,       // Validation and request errors
    pub success: Color,      // Valid fields, success notices
    pub warning: Color,      // Character counter near the limit
    pub text: Color,
    pub text_dim: Color,
    pub bg: Color,
    pub bg_selected: Color,
    pub inactive: Color,     // Unfocused borders
    pub header: Color,       // Section titles
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            accent: Color::Rgb(129, 140, 248),
            accent_bright: Color::Rgb(165, 180, 252),
            danger: Color::Rgb(248, 113, 113),
            success: Color::Rgb(52, 211, 153),
            warning: Color::Rgb(251, 191, 36),
            text: Color::Rgb(226, 232, 240),
            text_dim: Color::Rgb(148, 163, 184),
            bg: Color::Rgb(15, 23, 42),
            bg_selected: Color::Rgb(51, 65, 85),
            inactive: Color::Rgb(71, 85, 105),
            header: Color::Rgb(165, 180, 252),
        }
    }

    pub fn light() -> Self {
        Self {
            accent: Color::Rgb(79, 70, 229),
            accent_bright: Color::Rgb(99, 102, 241),
            danger: Color::Rgb(220, 38, 38),
            success: Color::Rgb(5, 150, 105),
            warning: Color::Rgb(217, 119, 6),
            text: Color::Rgb(15, 23, 42),
            text_dim: Color::Rgb(100, 116, 139),
            bg: Color::Rgb(248, 250, 252),
            bg_selected: Color::Rgb(226, 232, 240),
            inactive: Color::Rgb(203, 213, 225),
            header: Color::Rgb(67, 56, 202),
        }
    }

    /// Palette for `mode`, with an optional `#RRGGBB` accent override
    pub fn for_mode(mode: ThemeMode, accent: Option<&str>) -> Self {
        let mut theme = match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        };
        if let Some(color) = accent.and_then(parse_hex_color) {
            theme.accent = color;
        }
        theme
    }
}

/// Parse a hex color string (#RRGGBB or #RGB)
fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');

    if !s.is_ascii() {
        return None;
    }
    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
        let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
        let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}
