//! RGB <-> HSV conversion and offset arithmetic
//!
//! Hue is expressed in degrees `[0, 360)`, saturation and value in percent
//! `[0, 100]`. The heavy lifting is delegated to `palette`; this module pins
//! down the normalization rules the harmony code relies on:
//!
//! - the hue of an achromatic color is `0`, never undefined,
//! - hue arithmetic wraps modulo 360,
//! - saturation and value clamp to `[0, 100]`,
//! - channels round to the nearest integer on the way back to RGB.

use palette::{FromColor, Srgb};
use serde::{Deserialize, Serialize};

use super::Color;

/// A color in HSV coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    /// Hue in degrees, `[0, 360)`
    pub h: f32,
    /// Saturation in percent, `[0, 100]`
    pub s: f32,
    /// Value in percent, `[0, 100]`
    pub v: f32,
}

impl Hsv {
    /// Normalizing constructor: wraps the hue and clamps saturation/value.
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Self {
            h: wrap_hue(h),
            s: clamp_percent(s),
            v: clamp_percent(v),
        }
    }

    pub fn to_rgb(&self) -> Color {
        to_rgb(*self)
    }
}

/// A relative HSV adjustment.
///
/// Saturation and value deltas are clamped to `[-100, 100]` on construction;
/// the hue delta is free and wraps when applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HsvOffset {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl HsvOffset {
    pub fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation: saturation.clamp(-100.0, 100.0),
            value: value.clamp(-100.0, 100.0),
        }
    }

    pub const fn hue(hue: f32) -> Self {
        Self {
            hue,
            saturation: 0.0,
            value: 0.0,
        }
    }

    /// Offset that takes `from` to `to`, with the hue delta on the shorter
    /// arc, i.e. in `(-180, 180]`.
    pub fn between(from: Hsv, to: Hsv) -> Self {
        Self::new(hue_delta(from.h, to.h), to.s - from.s, to.v - from.v)
    }
}

/// Wrap a hue in degrees into `[0, 360)`.
pub fn wrap_hue(h: f32) -> f32 {
    if !h.is_finite() {
        return 0.0;
    }
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed rotation from hue `from` to hue `to`, normalized to `(-180, 180]`.
pub fn hue_delta(from: f32, to: f32) -> f32 {
    let delta = wrap_hue(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

fn clamp_percent(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 100.0) }
}

fn to_channel(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert an sRGB color to HSV.
pub fn to_hsv(color: Color) -> Hsv {
    let rgb: Srgb<f32> = Srgb::<u8>::from(color).into_format();
    let hsv: palette::Hsv = palette::Hsv::from_color(rgb);

    let s = hsv.saturation * 100.0;
    let h = if s <= f32::EPSILON {
        0.0
    } else {
        hsv.hue.into_positive_degrees()
    };
    Hsv::new(h, s, hsv.value * 100.0)
}

/// Convert HSV back to sRGB, normalizing out-of-range input first.
pub fn to_rgb(hsv: Hsv) -> Color {
    let hsv = Hsv::new(hsv.h, hsv.s, hsv.v);
    let converted: palette::Hsv = palette::Hsv::new(hsv.h, hsv.s / 100.0, hsv.v / 100.0);
    let rgb: Srgb<f32> = Srgb::from_color(converted);
    Color::new(to_channel(rgb.red), to_channel(rgb.green), to_channel(rgb.blue))
}

/// Shift `base` by `(dh, ds, dv)` in HSV space.
///
/// `dh` wraps modulo 360. `ds` and `dv` are clamped to `[-100, 100]`, then
/// the resulting saturation and value are clamped to `[0, 100]`.
pub fn apply_offset(base: Color, dh: f32, ds: f32, dv: f32) -> Color {
    let hsv = to_hsv(base);
    let ds = ds.clamp(-100.0, 100.0);
    let dv = dv.clamp(-100.0, 100.0);
    to_rgb(Hsv::new(hsv.h + dh, hsv.s + ds, hsv.v + dv))
}
