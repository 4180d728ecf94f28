//! Error types for the chroma_palette engine

use thiserror::Error;

/// Result type alias for palette engine operations
pub type Result<T> = std::result::Result<T, PaletteError>;

/// Errors surfaced by palette generation, extraction and rule editing.
///
/// Every variant describes a local, recoverable condition. A palette that is
/// shorter than requested is not an error; see
/// [`AssembledPalette::shortfall`](crate::AssembledPalette::shortfall).
#[derive(Error, Debug)]
pub enum PaletteError {
    /// Malformed hex code or channel value outside [0, 255]
    #[error("Invalid color {value:?}: {reason}")]
    InvalidColor { value: String, reason: String },

    /// Harmony scheme name not present in the catalog
    #[error("Unknown harmony scheme: {name}")]
    UnknownScheme { name: String },

    /// Step index outside the rule's step list
    #[error("Index {index} out of range for {len} step(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// No pixels left to cluster after transparency and background filtering
    #[error("Image has no pixels left after filtering")]
    EmptyImage,

    /// Cluster count outside [1, MAX_CLUSTERS]
    #[error("Invalid cluster count k = {k} (expected 1..={max})")]
    InvalidK { k: usize, max: usize },

    /// Deriving a harmony needs a base color plus at least one other color
    #[error("Need at least {required} colors, found {found}")]
    InsufficientColors { found: usize, required: usize },

    /// Requested palette size of zero
    #[error("Invalid palette size: {count}")]
    InvalidCount { count: usize },

    /// Pixel data length does not match the declared dimensions
    #[error("Pixel data of {len} bytes does not fit a {width}x{height} image with {channels} channel(s)")]
    InvalidDimensions {
        width: u32,
        height: u32,
        channels: usize,
        len: usize,
    },

    /// Color count does not match the declared dimensions
    #[error("{len} pixel(s) do not fill a {width}x{height} image")]
    InvalidPixelCount { width: u32, height: u32, len: usize },

    /// Configuration value rejected by validation
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// A rule with this name already exists in the library
    #[error("Harmony rule {name:?} already exists")]
    DuplicateRuleName { name: String },

    /// No rule with this name in the library
    #[error("Unknown harmony rule: {name}")]
    UnknownRule { name: String },

    /// Extraction stopped by its cancellation flag
    #[error("Color extraction cancelled after {iterations} iteration(s)")]
    Cancelled { iterations: usize },

    /// Rule or configuration blob could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PaletteError {
    pub(crate) fn invalid_color(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// True when the caller supplied bad input, as opposed to the input
    /// image simply not yielding usable pixels or the run being cancelled.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            PaletteError::EmptyImage
                | PaletteError::InsufficientColors { .. }
                | PaletteError::Cancelled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = PaletteError::UnknownScheme {
            name: "Pentadic".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown harmony scheme: Pentadic");

        let err = PaletteError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "Index 4 out of range for 2 step(s)");

        let err = PaletteError::InvalidPixelCount {
            width: 2,
            height: 3,
            len: 5,
        };
        assert_eq!(err.to_string(), "5 pixel(s) do not fill a 2x3 image");
    }

    #[test]
    fn test_input_error_classification() {
        assert!(PaletteError::invalid_color("#GG0000", "not hex").is_input_error());
        assert!(PaletteError::InvalidK { k: 0, max: 256 }.is_input_error());
        assert!(!PaletteError::EmptyImage.is_input_error());
        assert!(!PaletteError::Cancelled { iterations: 3 }.is_input_error());
    }
}
