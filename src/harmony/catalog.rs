//! Built-in harmony schemes
//!
//! Every scheme is a fixed list of HSV offsets applied to the base color,
//! plus the [`FillPolicy`] used when a caller asks for more colors than the
//! scheme produces:
//!
//! | Scheme               | Steps (ΔH, ΔS, ΔV)                               | Fill        |
//! |----------------------|--------------------------------------------------|-------------|
//! | Complementary        | (180,0,0)                                        | value       |
//! | Analogous            | (-30,0,0) (30,0,0)                               | value       |
//! | Wide-Analogous       | (-60,0,0) (-30,0,0) (30,0,0) (60,0,0)            | value       |
//! | Triadic              | (120,0,0) (240,0,0)                              | value       |
//! | Split-Complementary  | (150,0,0) (210,0,0)                              | value       |
//! | Square               | (120,0,0) (180,0,0) (240,0,0)                    | value       |
//! | Tetradic             | (60,0,0) (180,0,0) (240,0,0)                     | value       |
//! | Double-Complementary | (30,0,0) (180,0,0) (210,0,0)                     | value       |
//! | Monochromatic        | (0,0,-30) (0,0,30)                               | saturation  |
//! | Shades               | (0,0,-15) (0,0,-30) (0,0,-45)                    | saturation  |
//! | Complementary-Shades | (180,0,30) (180,0,15) (180,0,0) (180,0,-15)      | saturation  |
//! | Triadic-Shades       | (120,0,0) (120,0,-30) (240,0,0) (240,0,-30)      | saturation  |
//!
//! Fewer requested colors than `1 + steps` truncates from the end; more
//! cycles the steps with growing jitter (see [`fill`](super::fill)).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::HarmonyStep;
use super::fill::{FillPolicy, fill_to};
use crate::color::{Color, HsvOffset, Palette};
use crate::config::HarmonyConfig;
use crate::{PaletteError, Result};

const fn off(hue: f32, saturation: f32, value: f32) -> HsvOffset {
    HsvOffset {
        hue,
        saturation,
        value,
    }
}

const COMPLEMENTARY: &[HsvOffset] = &[off(180.0, 0.0, 0.0)];
const ANALOGOUS: &[HsvOffset] = &[off(-30.0, 0.0, 0.0), off(30.0, 0.0, 0.0)];
const WIDE_ANALOGOUS: &[HsvOffset] = &[
    off(-60.0, 0.0, 0.0),
    off(-30.0, 0.0, 0.0),
    off(30.0, 0.0, 0.0),
    off(60.0, 0.0, 0.0),
];
const TRIADIC: &[HsvOffset] = &[off(120.0, 0.0, 0.0), off(240.0, 0.0, 0.0)];
const SPLIT_COMPLEMENTARY: &[HsvOffset] = &[off(150.0, 0.0, 0.0), off(210.0, 0.0, 0.0)];
const SQUARE: &[HsvOffset] = &[off(120.0, 0.0, 0.0), off(180.0, 0.0, 0.0), off(240.0, 0.0, 0.0)];
const TETRADIC: &[HsvOffset] = &[off(60.0, 0.0, 0.0), off(180.0, 0.0, 0.0), off(240.0, 0.0, 0.0)];
const DOUBLE_COMPLEMENTARY: &[HsvOffset] =
    &[off(30.0, 0.0, 0.0), off(180.0, 0.0, 0.0), off(210.0, 0.0, 0.0)];
const MONOCHROMATIC: &[HsvOffset] = &[off(0.0, 0.0, -30.0), off(0.0, 0.0, 30.0)];
const SHADES: &[HsvOffset] = &[off(0.0, 0.0, -15.0), off(0.0, 0.0, -30.0), off(0.0, 0.0, -45.0)];
const COMPLEMENTARY_SHADES: &[HsvOffset] = &[
    off(180.0, 0.0, 30.0),
    off(180.0, 0.0, 15.0),
    off(180.0, 0.0, 0.0),
    off(180.0, 0.0, -15.0),
];
const TRIADIC_SHADES: &[HsvOffset] = &[
    off(120.0, 0.0, 0.0),
    off(120.0, 0.0, -30.0),
    off(240.0, 0.0, 0.0),
    off(240.0, 0.0, -30.0),
];

/// A named built-in harmony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmonyScheme {
    Complementary,
    Analogous,
    WideAnalogous,
    Triadic,
    SplitComplementary,
    Square,
    Tetradic,
    DoubleComplementary,
    Monochromatic,
    Shades,
    ComplementaryShades,
    TriadicShades,
}

impl HarmonyScheme {
    pub const ALL: [HarmonyScheme; 12] = [
        Self::Complementary,
        Self::Analogous,
        Self::WideAnalogous,
        Self::Triadic,
        Self::SplitComplementary,
        Self::Square,
        Self::Tetradic,
        Self::DoubleComplementary,
        Self::Monochromatic,
        Self::Shades,
        Self::ComplementaryShades,
        Self::TriadicShades,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Complementary => "Complementary",
            Self::Analogous => "Analogous",
            Self::WideAnalogous => "Wide-Analogous",
            Self::Triadic => "Triadic",
            Self::SplitComplementary => "Split-Complementary",
            Self::Square => "Square",
            Self::Tetradic => "Tetradic",
            Self::DoubleComplementary => "Double-Complementary",
            Self::Monochromatic => "Monochromatic",
            Self::Shades => "Shades",
            Self::ComplementaryShades => "Complementary-Shades",
            Self::TriadicShades => "Triadic-Shades",
        }
    }

    /// HSV offsets from the base, in palette order.
    pub fn offsets(&self) -> &'static [HsvOffset] {
        match self {
            Self::Complementary => COMPLEMENTARY,
            Self::Analogous => ANALOGOUS,
            Self::WideAnalogous => WIDE_ANALOGOUS,
            Self::Triadic => TRIADIC,
            Self::SplitComplementary => SPLIT_COMPLEMENTARY,
            Self::Square => SQUARE,
            Self::Tetradic => TETRADIC,
            Self::DoubleComplementary => DOUBLE_COMPLEMENTARY,
            Self::Monochromatic => MONOCHROMATIC,
            Self::Shades => SHADES,
            Self::ComplementaryShades => COMPLEMENTARY_SHADES,
            Self::TriadicShades => TRIADIC_SHADES,
        }
    }

    pub fn steps(&self) -> Vec<HarmonyStep> {
        self.offsets().iter().copied().map(HarmonyStep::Offset).collect()
    }

    /// Colors produced without padding, base included.
    pub fn natural_len(&self) -> usize {
        1 + self.offsets().len()
    }

    pub fn fill_policy(&self) -> FillPolicy {
        match self {
            Self::Monochromatic
            | Self::Shades
            | Self::ComplementaryShades
            | Self::TriadicShades => FillPolicy::SaturationJitter,
            _ => FillPolicy::ValueJitter,
        }
    }
}

impl fmt::Display for HarmonyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for HarmonyScheme {
    type Err = PaletteError;

    /// Case-insensitive; spaces, `-` and `_` are ignored, so
    /// `"split complementary"` and `"SPLIT_COMPLEMENTARY"` both match.
    fn from_str(name: &str) -> Result<Self> {
        let wanted = normalize_name(name);
        Self::ALL
            .into_iter()
            .find(|scheme| normalize_name(scheme.name()) == wanted)
            .ok_or_else(|| PaletteError::UnknownScheme {
                name: name.to_string(),
            })
    }
}

/// Generator for the built-in schemes.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonyCatalog {
    fill_jitter: f32,
}

impl Default for HarmonyCatalog {
    fn default() -> Self {
        Self::new(&HarmonyConfig::default())
    }
}

impl HarmonyCatalog {
    pub fn new(config: &HarmonyConfig) -> Self {
        Self {
            fill_jitter: config.fill_jitter,
        }
    }

    pub fn schemes(&self) -> &'static [HarmonyScheme] {
        &HarmonyScheme::ALL
    }

    /// Generate `desired_count` colors for the scheme called `scheme_name`.
    pub fn generate(&self, scheme_name: &str, base: Color, desired_count: usize) -> Result<Palette> {
        let scheme: HarmonyScheme = scheme_name.parse()?;
        self.generate_scheme(scheme, base, desired_count)
    }

    pub fn generate_scheme(
        &self,
        scheme: HarmonyScheme,
        base: Color,
        desired_count: usize,
    ) -> Result<Palette> {
        if desired_count == 0 {
            return Err(PaletteError::InvalidCount {
                count: desired_count,
            });
        }
        let natural = self.natural(scheme, base);
        let sources = natural.colors()[1..].to_vec();
        Ok(fill_to(
            natural,
            &sources,
            desired_count,
            scheme.fill_policy(),
            self.fill_jitter,
        ))
    }

    /// Base plus one color per step, unpadded.
    pub fn natural(&self, scheme: HarmonyScheme, base: Color) -> Palette {
        std::iter::once(base)
            .chain(scheme.offsets().iter().map(|offset| base.offset(*offset)))
            .collect()
    }

    /// Every scheme's natural palette for `base`, in catalog order.
    pub fn all(&self, base: Color) -> Vec<(HarmonyScheme, Palette)> {
        HarmonyScheme::ALL
            .into_iter()
            .map(|scheme| (scheme, self.natural(scheme, base)))
            .collect()
    }
}
