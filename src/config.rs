//! Tunable parameters for extraction and harmony padding.
//!
//! Configuration is plain data: build it in code or load it from JSON. Every
//! section is `#[serde(default)]`, so a file only needs the keys it changes:
//!
//! ```
//! use chroma_palette::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "extraction": { "seed": 7 } }"#)?;
//! assert_eq!(config.extraction.seed, 7);
//! assert_eq!(config.extraction.max_iterations, 32);
//! # Ok::<(), chroma_palette::PaletteError>(())
//! ```
//!
//! The engine itself performs no file I/O; reading the JSON from disk is the
//! host's job.

use serde::{Deserialize, Serialize};

use crate::{PaletteError, Result};

/// Pixel budget for stride sampling before clustering
pub const DEFAULT_SAMPLE_BUDGET: usize = 20_000;

/// Hard cap on k-means iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 32;

/// Centroid movement (Lab distance) below which k-means stops
pub const DEFAULT_CONVERGENCE: f32 = 1e-3;

/// HSV value (percent) at or above which a pixel counts as near-white
pub const DEFAULT_WHITE_THRESHOLD: f32 = 94.0;

/// HSV value (percent) at or below which a pixel counts as near-black
pub const DEFAULT_BLACK_THRESHOLD: f32 = 6.0;

/// Secondary jitter (percent) added per padding round
pub const DEFAULT_FILL_JITTER: f32 = 12.0;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub extraction: ExtractionConfig,
    pub harmony: HarmonyConfig,
}

/// Dominant-color extraction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of pixels fed to k-means
    pub sample_budget: usize,

    /// Maximum k-means iterations; always enforced
    pub max_iterations: usize,

    /// Convergence epsilon on total centroid movement
    pub convergence: f32,

    /// Background filter: near-white value threshold (0-100)
    pub white_threshold: f32,

    /// Background filter: near-black value threshold (0-100)
    pub black_threshold: f32,

    /// Background filter: drop pixels below this saturation (0-100, 0 disables)
    pub min_saturation: f32,

    /// Seed for k-means++ initialization
    pub seed: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sample_budget: DEFAULT_SAMPLE_BUDGET,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence: DEFAULT_CONVERGENCE,
            white_threshold: DEFAULT_WHITE_THRESHOLD,
            black_threshold: DEFAULT_BLACK_THRESHOLD,
            min_saturation: 0.0,
            seed: 0,
        }
    }
}

/// Harmony padding parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonyConfig {
    /// Jitter (percent of the jittered channel) added per padding round
    pub fill_jitter: f32,
}

impl Default for HarmonyConfig {
    fn default() -> Self {
        Self {
            fill_jitter: DEFAULT_FILL_JITTER,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.extraction.validate()?;
        self.harmony.validate()
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_budget == 0 {
            return Err(PaletteError::invalid_parameter("sample_budget", self.sample_budget));
        }
        if self.max_iterations == 0 {
            return Err(PaletteError::invalid_parameter("max_iterations", self.max_iterations));
        }
        if !(self.convergence.is_finite() && self.convergence >= 0.0) {
            return Err(PaletteError::invalid_parameter("convergence", self.convergence));
        }
        for (name, value) in [
            ("white_threshold", self.white_threshold),
            ("black_threshold", self.black_threshold),
            ("min_saturation", self.min_saturation),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(PaletteError::invalid_parameter(name, value));
            }
        }
        if self.black_threshold >= self.white_threshold {
            return Err(PaletteError::invalid_parameter(
                "black_threshold",
                format!("{} (must be below white_threshold {})", self.black_threshold, self.white_threshold),
            ));
        }
        Ok(())
    }
}

impl HarmonyConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.fill_jitter) {
            return Err(PaletteError::invalid_parameter("fill_jitter", self.fill_jitter));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "harmony": { "fill_jitter": 20.0 } }"#).unwrap();
        assert_eq!(config.harmony.fill_jitter, 20.0);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = EngineConfig::default();
        config.extraction.seed = 99;
        config.extraction.min_saturation = 15.0;
        let json = config.to_json_pretty().unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let err = EngineConfig::from_json_str(
            r#"{ "extraction": { "white_threshold": 10.0, "black_threshold": 50.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PaletteError::InvalidParameter { ref parameter, .. } if parameter == "black_threshold"));
    }

    #[test]
    fn test_rejects_zero_iteration_cap() {
        let config = ExtractionConfig {
            max_iterations: 0,
            ..ExtractionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(PaletteError::Serialization(_))
        ));
    }
}
