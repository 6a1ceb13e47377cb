//! Theme and styling configuration.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Display color for selected tag chips.
///
/// Purely cosmetic: the color never influences tag input behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    #[default]
    Blue,
    Red,
    Green,
    Yellow,
    Purple,
}

impl TagColor {
    /// All colors in picker order.
    pub const ALL: [TagColor; 5] = [
        TagColor::Blue,
        TagColor::Red,
        TagColor::Green,
        TagColor::Yellow,
        TagColor::Purple,
    ];

    /// Get the terminal color for chip backgrounds.
    pub fn color(&self) -> Color {
        match self {
            TagColor::Blue => Color::Blue,
            TagColor::Red => Color::Red,
            TagColor::Green => Color::Green,
            TagColor::Yellow => Color::Yellow,
            TagColor::Purple => Color::Magenta,
        }
    }

    /// Get the foreground color that stays readable on the chip background.
    pub fn text_color(&self) -> Color {
        match self {
            TagColor::Yellow => Color::Black,
            _ => Color::White,
        }
    }

    /// Get the label shown in the color picker.
    pub fn label(&self) -> &'static str {
        match self {
            TagColor::Blue => "Blue",
            TagColor::Red => "Red",
            TagColor::Green => "Green",
            TagColor::Yellow => "Yellow",
            TagColor::Purple => "Purple",
        }
    }

    /// Get the next color in picker order, wrapping around.
    pub fn next(&self) -> TagColor {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TagColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown tag color '{}' (expected one of: blue, red, green, yellow, purple)",
                    s
                )
            })
    }
}
