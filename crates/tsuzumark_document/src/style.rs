//! Highlight colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named highlight color, as offered by word processors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightColor {
    Yellow,
    BrightGreen,
    /// Designated color for lint annotations.
    #[default]
    Turquoise,
    Pink,
    Blue,
    Red,
    DarkBlue,
    Teal,
    Green,
    Violet,
    DarkRed,
    DarkYellow,
    Gray25,
    Gray50,
    Black,
}

impl HighlightColor {
    /// All colors, in declaration order.
    pub const ALL: [HighlightColor; 15] = [
        Self::Yellow,
        Self::BrightGreen,
        Self::Turquoise,
        Self::Pink,
        Self::Blue,
        Self::Red,
        Self::DarkBlue,
        Self::Teal,
        Self::Green,
        Self::Violet,
        Self::DarkRed,
        Self::DarkYellow,
        Self::Gray25,
        Self::Gray50,
        Self::Black,
    ];

    /// Returns the kebab-case name of the color.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::BrightGreen => "bright-green",
            Self::Turquoise => "turquoise",
            Self::Pink => "pink",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::DarkBlue => "dark-blue",
            Self::Teal => "teal",
            Self::Green => "green",
            Self::Violet => "violet",
            Self::DarkRed => "dark-red",
            Self::DarkYellow => "dark-yellow",
            Self::Gray25 => "gray25",
            Self::Gray50 => "gray50",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HighlightColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == normalized)
            .ok_or_else(|| format!("Unknown highlight color: {}", s))
    }
}
