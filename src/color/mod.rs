//! Color values and color space arithmetic
//!
//! [`Color`] is the engine's currency: an 8-bit sRGB triple. HSV views and
//! offsets live in [`hsv`], ordered color sequences in [`list`], and
//! brightness/warmth/contrast tweaks in [`adjust`].

pub mod adjust;
pub mod hsv;
pub mod list;

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::{PaletteError, Result};

pub use adjust::Temperature;
pub use hsv::{Hsv, HsvOffset, apply_offset, hue_delta, to_hsv, to_rgb, wrap_hue};
pub use list::Palette;

/// An 8-bit sRGB color.
///
/// Serializes as a `#RRGGBB` string so rule blobs stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from wide integer channels, rejecting anything outside
    /// [0, 255].
    pub fn from_channels(r: i32, g: i32, b: i32) -> Result<Self> {
        let channel = |name: &str, value: i32| {
            u8::try_from(value).map_err(|_| {
                PaletteError::invalid_color(
                    format!("({r}, {g}, {b})"),
                    format!("{name} channel {value} outside [0, 255]"),
                )
            })
        };
        Ok(Self::new(channel("red", r)?, channel("green", g)?, channel("blue", b)?))
    }

    /// Parse `#RRGGBB`, `RRGGBB` or the `#RGB` shorthand (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            n => {
                return Err(PaletteError::invalid_color(
                    hex,
                    format!("expected 3 or 6 hex digits, got {n}"),
                ));
            }
        };
        if !expanded.is_ascii() {
            return Err(PaletteError::invalid_color(hex, "non-ASCII hex digits"));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16)
                .map_err(|e| PaletteError::invalid_color(hex, e.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Uppercase `#RRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Perceived brightness in [0, 255] (Rec. 601 weights).
    pub fn luminance(&self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }

    pub fn to_hsv(&self) -> Hsv {
        to_hsv(*self)
    }

    /// Shift this color in HSV space; see [`apply_offset`].
    pub fn offset(&self, offset: HsvOffset) -> Color {
        apply_offset(*self, offset.hue, offset.saturation, offset.value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = PaletteError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.red, c.green, c.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(c: Color) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#FF8000").unwrap(), Color::new(255, 128, 0));
        assert_eq!(Color::from_hex("ff8000").unwrap(), Color::new(255, 128, 0));
        assert_eq!(Color::from_hex("#f80").unwrap(), Color::new(255, 136, 0));
        assert_eq!(" #00ff00 ".parse::<Color>().unwrap(), Color::new(0, 255, 0));
    }

    #[test]
    fn test_hex_rejects_malformed_input() {
        for bad in ["", "#12345", "#GG0000", "#1234567", "#ÿÿ"] {
            match Color::from_hex(bad) {
                Err(PaletteError::InvalidColor { .. }) => {}
                other => panic!("{bad:?} should be InvalidColor, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_hex_formatting_is_uppercase() {
        assert_eq!(Color::new(10, 171, 255).to_hex(), "#0AABFF");
        assert_eq!(Color::new(10, 171, 255).to_string(), "#0AABFF");
    }

    #[test]
    fn test_from_channels_range_check() {
        assert_eq!(Color::from_channels(0, 128, 255).unwrap(), Color::new(0, 128, 255));
        assert!(matches!(
            Color::from_channels(256, 0, 0),
            Err(PaletteError::InvalidColor { .. })
        ));
        assert!(matches!(
            Color::from_channels(0, -1, 0),
            Err(PaletteError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_luminance_ordering() {
        assert!(Color::WHITE.luminance() > Color::new(255, 0, 0).luminance());
        assert_eq!(Color::BLACK.luminance(), 0.0);
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color::new(255, 0, 16)).unwrap();
        assert_eq!(json, "\"#FF0010\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::new(255, 0, 16));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
