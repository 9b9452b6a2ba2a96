use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scale::PaletteKind;

/// Whether classified counties are drawn with their data-driven stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineState {
    #[default]
    Visible,
    Hidden,
}

impl OutlineState {
    pub fn toggled(self) -> Self {
        match self {
            OutlineState::Visible => OutlineState::Hidden,
            OutlineState::Hidden => OutlineState::Visible,
        }
    }

    pub fn is_visible(self) -> bool {
        self == OutlineState::Visible
    }
}

impl fmt::Display for OutlineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutlineState::Visible => "visible",
            OutlineState::Hidden => "hidden",
        })
    }
}

impl FromStr for OutlineState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visible" | "on" => Ok(OutlineState::Visible),
            "hidden" | "off" => Ok(OutlineState::Hidden),
            other => Err(format!("unknown outline state: {other}")),
        }
    }
}

/// Everything the user can change. Starts as `(OrRd, Visible)` and lives
/// only as long as the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderState {
    pub palette: PaletteKind,
    pub outlines: OutlineState,
}
