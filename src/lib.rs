//! Palette generation engine.
//!
//! Builds color palettes from three kinds of input:
//!
//! - a base color run through a built-in harmony scheme ([`HarmonyCatalog`])
//!   or a user-defined [`CustomHarmonyRule`],
//! - explicit hex codes,
//! - the dominant colors of an image, found by seeded k-means in CIE Lab
//!   ([`ImageColorExtractor`]), optionally turned into a reusable rule with
//!   [`derive_rule`].
//!
//! [`PaletteAssembler`] is the single entry point that takes any of these
//! sources and pads or truncates to the requested size. A finished palette
//! can be tuned with the [`Color`]/[`Palette`] adjusters and applied back to
//! an image with [`recolor`]:
//!
//! ```
//! use chroma_palette::{Color, PaletteAssembler, PaletteSource};
//!
//! let assembler = PaletteAssembler::default();
//! let source = PaletteSource::Scheme {
//!     base: Color::new(255, 0, 0),
//!     scheme: "complementary".to_string(),
//! };
//! let out = assembler.assemble(&source, 2)?;
//! assert_eq!(out.palette.to_hex_strings(), ["#FF0000", "#00FFFF"]);
//! # Ok::<(), chroma_palette::PaletteError>(())
//! ```
//!
//! Everything is deterministic: extraction takes its seed from
//! [`ExtractionConfig`], and no operation touches global state or the file
//! system.

pub mod assemble;
pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod harmony;
pub mod recolor;
pub mod wasm;

pub use assemble::{AssembledPalette, PaletteAssembler, PaletteSource};
pub use color::{Color, Hsv, HsvOffset, Palette, Temperature, apply_offset, to_hsv, to_rgb};
pub use config::{EngineConfig, ExtractionConfig, HarmonyConfig};
pub use error::{PaletteError, Result};
pub use extract::{CancelFlag, Cluster, ClusterResult, ImageColorExtractor, MAX_CLUSTERS, PixelBuffer};
pub use harmony::{
    CustomHarmonyRule, DerivedHarmony, FillPolicy, HarmonyCatalog, HarmonyScheme, HarmonyStep,
    RuleLibrary, derive_rule, derive_rule_from_colors,
};
pub use recolor::{recolor, recolor_image};
