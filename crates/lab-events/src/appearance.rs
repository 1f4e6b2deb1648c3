//! Display metadata carried by every placeable kind.
//!
//! The engine stores these values but never interprets them.

use serde::{Deserialize, Serialize};

/// Terminal palette color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Black,
    Blue,
    Cyan,
    Green,
    Magenta,
    Red,
    White,
    Yellow,
}

/// Brightness of a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    #[default]
    Normal,
    Bright,
}

/// How a tile, block or agent should be drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    /// One or two characters; single characters are doubled by renderers
    pub glyph: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub intensity: Intensity,
}

impl Appearance {
    pub fn new(glyph: impl Into<String>, color: Color, intensity: Intensity) -> Self {
        Self {
            glyph: glyph.into(),
            color,
            intensity,
        }
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self::new("?", Color::White, Intensity::Normal)
    }
}
