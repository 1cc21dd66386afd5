//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::board::PlayerId;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Player colours and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Orb colours per player (index 0..=3): red, blue, green, yellow.
    pub players: [Color; 4],
    /// Board background.
    pub bg: Color,
    /// Grid lines / borders.
    pub div_line: Color,
    /// Text (counters, controls).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Dimmed text: critical mass hints on empty cells.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

/// `0xRRGGBB` → `Color::Rgb`.
const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Theme {
    /// One Dark defaults (values from onedark.theme).
    pub fn onedark_default() -> Self {
        Self {
            players: [
                rgb(0xE06C75), // cpu_end / red
                rgb(0x61AFEF), // cpu_box / blue
                rgb(0x98C379), // mem_box / green
                rgb(0xE5C07B), // title / yellow
            ],
            bg: rgb(0x31353F),
            div_line: rgb(0x3F444F),
            main_fg: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
            inactive_fg: rgb(0x5C6370),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file is missing.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    pub(crate) fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override player colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.players = [rgb(0xFF0000), rgb(0x0088FF), rgb(0x00FF00), rgb(0xFFFF00)];
            }
            crate::Palette::Colorblind => {
                // Okabe-Ito style: no red/green pair
                self.players = [rgb(0xEE7733), rgb(0x0077BB), rgb(0x009988), rgb(0xEE3377)];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
        };
        let d = Self::onedark_default();
        Self {
            players: [
                get("cpu_end").or_else(|| get("temp_end")).unwrap_or(d.players[0]),
                get("cpu_box").unwrap_or(d.players[1]),
                get("mem_box").or_else(|| get("cpu_start")).unwrap_or(d.players[2]),
                get("title").or_else(|| get("cpu_mid")).unwrap_or(d.players[3]),
            ],
            bg: get("meter_bg").unwrap_or(d.bg),
            div_line: get("div_line").unwrap_or(d.div_line),
            main_fg: get("main_fg").unwrap_or(d.main_fg),
            title: get("title").unwrap_or(d.title),
            inactive_fg: get("inactive_fg").unwrap_or(d.inactive_fg),
        }
    }

    #[inline]
    pub fn player_color(&self, player: PlayerId) -> Color {
        self.players[player % self.players.len()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}

/// Blend `color` towards `target` by `t` (0.0 = color, 1.0 = target). Non-RGB colours pass through.
pub fn mix(color: Color, target: Color, t: f32) -> Color {
    match (color, target) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let t = t.clamp(0.0, 1.0);
            let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb(lerp(r1, r2), lerp(g1, g2), lerp(b1, b2))
        }
        _ => color,
    }
}
