use std::fmt;

use serde::{Deserialize, Serialize};

/// 8-bit sRGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
    pub const LIGHT_GRAY: Rgb = Rgb(0xd3, 0xd3, 0xd3);

    /// Parse `#rrggbb` or `rrggbb` (case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// Fill or stroke of a drawn shape. `None` paints nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    #[default]
    None,
    Color(Rgb),
}

impl Paint {
    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }

}

impl From<Rgb> for Paint {
    fn from(value: Rgb) -> Self {
        Paint::Color(value)
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::None => f.write_str("none"),
            Paint::Color(rgb) => rgb.fmt(f),
        }
    }
}

/// How counties outside the target state are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeutralStyle {
    #[default]
    NoPaint,
    LightGray,
}

impl NeutralStyle {
    pub fn paint(self) -> Paint {
        match self {
            NeutralStyle::NoPaint => Paint::None,
            NeutralStyle::LightGray => Paint::Color(Rgb::LIGHT_GRAY),
        }
    }
}

/// Paints that are not driven by the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub neutral: NeutralStyle,
    /// Stroke of classified counties while outlines are hidden.
    pub hidden_outline: Paint,
    pub state_mesh_stroke: Paint,
    pub state_mesh_width: f64,
    pub county_stroke_width: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            neutral: NeutralStyle::NoPaint,
            hidden_outline: Paint::None,
            state_mesh_stroke: Paint::Color(Rgb::WHITE),
            state_mesh_width: 1.0,
            county_stroke_width: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#fc8d59"), Some(Rgb(0xfc, 0x8d, 0x59)));
        assert_eq!(Rgb::from_hex("D3D3D3"), Some(Rgb::LIGHT_GRAY));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
        assert_eq!(Rgb::from_hex("#ééé"), None);
    }

    #[test]
    fn hex_formatting_is_lowercase_and_padded() {
        assert_eq!(Rgb(0, 10, 255).to_hex(), "#000aff");
        assert_eq!(Rgb::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn paint_display_values() {
        assert_eq!(Paint::None.to_string(), "none");
        assert_eq!(Paint::Color(Rgb::BLACK).to_string(), "#000000");
        assert!(Paint::default().is_none());
        assert_eq!(Paint::from(Rgb::WHITE), Paint::Color(Rgb::WHITE));
    }

    #[test]
    fn neutral_style_variants() {
        assert_eq!(NeutralStyle::default().paint(), Paint::None);
        assert_eq!(
            NeutralStyle::LightGray.paint(),
            Paint::Color(Rgb(0xd3, 0xd3, 0xd3))
        );
    }

    #[test]
    fn style_config_deserializes_partial_documents() {
        let style: StyleConfig =
            serde_json::from_str(r##"{"neutral":"light_gray","hidden_outline":{"color":"#000000"}}"##)
                .unwrap();
        assert_eq!(style.neutral, NeutralStyle::LightGray);
        assert_eq!(style.hidden_outline, Paint::Color(Rgb::BLACK));
        assert_eq!(style.state_mesh_stroke, Paint::Color(Rgb::WHITE));
    }
}
