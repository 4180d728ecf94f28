//! Whole-color adjustments: HSV nudges, warmth, contrast, and a coarse
//! warm/cool classification.
//!
//! HSV deltas are in the same units as [`Hsv`](super::Hsv): degrees for hue,
//! percentage points for saturation and value. Warmth and contrast work on
//! the RGB channels directly and round to the nearest integer.

use serde::{Deserialize, Serialize};

use super::{Color, Palette, apply_offset};

/// Red/blue channel gap beyond which a color reads as warm or cool
const TEMPERATURE_MARGIN: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Warm,
    Neutral,
    Cool,
}

fn channel(x: f32) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}

impl Color {
    /// Add `delta` percentage points to HSV value, clamped to [0, 100].
    pub fn adjust_brightness(&self, delta: f32) -> Color {
        apply_offset(*self, 0.0, 0.0, delta)
    }

    /// Add `delta` percentage points to HSV saturation, clamped to [0, 100].
    pub fn adjust_saturation(&self, delta: f32) -> Color {
        apply_offset(*self, 0.0, delta, 0.0)
    }

    /// Rotate the hue by `degrees`, wrapping around the color wheel.
    pub fn adjust_hue(&self, degrees: f32) -> Color {
        apply_offset(*self, degrees, 0.0, 0.0)
    }

    /// Shift toward red/yellow (`warmth > 0`) or blue (`warmth < 0`).
    ///
    /// The dominant channel moves by `2 × |warmth|`, the other two by half
    /// of `|warmth|`.
    pub fn with_warmth(&self, warmth: f32) -> Color {
        let (r, g, b) = (self.r as f32, self.g as f32, self.b as f32);
        if warmth > 0.0 {
            Color::new(
                channel(r + warmth * 2.0),
                channel(g + warmth * 0.5),
                channel(b - warmth * 0.5),
            )
        } else {
            Color::new(
                channel(r + warmth * 0.5),
                channel(g + warmth * 0.5),
                channel(b - warmth * 2.0),
            )
        }
    }

    /// Scale each channel's distance from mid-gray (128) by `1 + contrast`.
    ///
    /// `contrast = -1` collapses everything to mid-gray; lower values are
    /// treated as `-1` rather than inverting the color.
    pub fn with_contrast(&self, contrast: f32) -> Color {
        let factor = (1.0 + contrast).max(0.0);
        let stretch = |c: u8| channel(128.0 + (c as f32 - 128.0) * factor);
        Color::new(stretch(self.r), stretch(self.g), stretch(self.b))
    }

    pub fn temperature(&self) -> Temperature {
        let (r, b) = (self.r as i32, self.b as i32);
        if r > b + TEMPERATURE_MARGIN {
            Temperature::Warm
        } else if b > r + TEMPERATURE_MARGIN {
            Temperature::Cool
        } else {
            Temperature::Neutral
        }
    }
}

impl Palette {
    /// Copy of this palette with `f` applied to every color, order kept.
    pub fn map(&self, f: impl Fn(Color) -> Color) -> Palette {
        self.iter().map(|&c| f(c)).collect()
    }

    pub fn adjust_brightness(&self, delta: f32) -> Palette {
        self.map(|c| c.adjust_brightness(delta))
    }

    pub fn adjust_saturation(&self, delta: f32) -> Palette {
        self.map(|c| c.adjust_saturation(delta))
    }

    pub fn adjust_hue(&self, degrees: f32) -> Palette {
        self.map(|c| c.adjust_hue(degrees))
    }

    pub fn with_warmth(&self, warmth: f32) -> Palette {
        self.map(|c| c.with_warmth(warmth))
    }

    pub fn with_contrast(&self, contrast: f32) -> Palette {
        self.map(|c| c.with_contrast(contrast))
    }
}
