//! The color domain: a closed enumeration plus the append-only log entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of colors the demo can display.
///
/// Input parsing is case-insensitive; anything outside this set is a
/// validation error, never a new variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
    Black,
    White,
}

impl Color {
    /// All colors, in declaration order.
    pub const ALL: [Color; 8] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
        Color::Black,
        Color::White,
    ];

    /// Parses a color name case-insensitively.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "RED" => Some(Color::Red),
            "GREEN" => Some(Color::Green),
            "BLUE" => Some(Color::Blue),
            "YELLOW" => Some(Color::Yellow),
            "PURPLE" => Some(Color::Purple),
            "ORANGE" => Some(Color::Orange),
            "BLACK" => Some(Color::Black),
            "WHITE" => Some(Color::White),
            _ => None,
        }
    }

    /// The canonical uppercase name, as serialized on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Green => "GREEN",
            Color::Blue => "BLUE",
            Color::Yellow => "YELLOW",
            Color::Purple => "PURPLE",
            Color::Orange => "ORANGE",
            Color::Black => "BLACK",
            Color::White => "WHITE",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable entry in the color log.
///
/// The `id` is a store-assigned surrogate key; it doubles as the tie
/// breaker when two entries carry the same timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorChange {
    /// Store-assigned surrogate key.
    pub id: i64,
    /// The color that was set.
    pub color: Color,
    /// When the change happened (wall clock at append time).
    pub timestamp: DateTime<Utc>,
    /// Who set it, e.g. `"manual"`, `"default"`, or `"event:<source>"`.
    pub source: String,
}
