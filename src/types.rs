//! Type-safe configuration enums
//!
//! Values that come from the command line or the config file are parsed
//! into these enums once, instead of being matched as strings later.

use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Target distribution, which selects the logo and default accent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Distro {
    #[default]
    Void,
    Arch,
    Linux,
}

impl Distro {
    /// Default accent colour for this distribution's branding
    pub const fn accent(self) -> Accent {
        match self {
            Self::Void => Accent::Green,
            Self::Arch => Accent::Blue,
            Self::Linux => Accent::Yellow,
        }
    }
}

/// The single accent colour used for the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Accent {
    #[default]
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    Red,
    White,
}

impl Accent {
    pub const fn color(self) -> Color {
        match self {
            Self::Green => Color::Green,
            Self::Blue => Color::Blue,
            Self::Yellow => Color::Yellow,
            Self::Cyan => Color::Cyan,
            Self::Magenta => Color::Magenta,
            Self::Red => Color::Red,
            Self::White => Color::White,
        }
    }
}
