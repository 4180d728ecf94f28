//! Top-level palette assembly
//!
//! [`PaletteAssembler`] turns any [`PaletteSource`] into exactly the number
//! of colors the caller asked for, or fewer with an explicit shortfall when
//! the source cannot honestly produce more.

use serde::Serialize;
use tracing::debug;

use crate::color::{Color, Palette};
use crate::config::{EngineConfig, HarmonyConfig};
use crate::extract::{CancelFlag, ClusterResult, ImageColorExtractor, PixelBuffer};
use crate::harmony::fill::fill_to;
use crate::harmony::{CustomHarmonyRule, FillPolicy, HarmonyCatalog};
use crate::{PaletteError, Result};

/// Where palette colors come from.
#[derive(Debug, Clone)]
pub enum PaletteSource<'a> {
    /// Explicit hex codes, e.g. from an external recommender
    HexList(Vec<String>),
    /// A built-in harmony scheme, by name
    Scheme { base: Color, scheme: String },
    /// A user-defined rule
    Rule { rule: &'a CustomHarmonyRule, base: Color },
    /// Dominant colors of an image
    Image {
        pixels: &'a PixelBuffer,
        k: usize,
        filter_background: bool,
    },
    /// Colors of an extraction the caller already ran
    Clusters(&'a ClusterResult),
}

impl PaletteSource<'_> {
    fn kind(&self) -> &'static str {
        match self {
            PaletteSource::HexList(_) => "hex_list",
            PaletteSource::Scheme { .. } => "scheme",
            PaletteSource::Rule { .. } => "rule",
            PaletteSource::Image { .. } => "image",
            PaletteSource::Clusters(_) => "clusters",
        }
    }
}

/// Assembler output: the colors plus the count that was asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledPalette {
    pub palette: Palette,
    pub requested: usize,
}

impl AssembledPalette {
    /// Requested count minus produced count, when positive.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.palette.len())
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall() == 0
    }
}

/// Most dominant `count` colors; extracted palettes are never padded.
fn top_colors(clusters: &ClusterResult, count: usize) -> Palette {
    let mut palette = clusters.palette();
    palette.truncate(count);
    palette
}

#[derive(Debug, Clone)]
pub struct PaletteAssembler {
    catalog: HarmonyCatalog,
    extractor: ImageColorExtractor,
    fill_jitter: f32,
}

impl Default for PaletteAssembler {
    fn default() -> Self {
        let config = HarmonyConfig::default();
        Self {
            catalog: HarmonyCatalog::new(&config),
            extractor: ImageColorExtractor::default(),
            fill_jitter: config.fill_jitter,
        }
    }
}

impl PaletteAssembler {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog: HarmonyCatalog::new(&config.harmony),
            extractor: ImageColorExtractor::new(config.extraction.clone())?,
            fill_jitter: config.harmony.fill_jitter,
        })
    }

    pub fn catalog(&self) -> &HarmonyCatalog {
        &self.catalog
    }

    pub fn extractor(&self) -> &ImageColorExtractor {
        &self.extractor
    }

    pub fn assemble(&self, source: &PaletteSource<'_>, desired_count: usize) -> Result<AssembledPalette> {
        self.assemble_inner(source, desired_count, None)
    }

    /// Like [`assemble`](Self::assemble), but image sources stop with
    /// [`PaletteError::Cancelled`] once `cancel` is raised.
    pub fn assemble_with_cancel(
        &self,
        source: &PaletteSource<'_>,
        desired_count: usize,
        cancel: &CancelFlag,
    ) -> Result<AssembledPalette> {
        self.assemble_inner(source, desired_count, Some(cancel))
    }

    fn assemble_inner(
        &self,
        source: &PaletteSource<'_>,
        desired_count: usize,
        cancel: Option<&CancelFlag>,
    ) -> Result<AssembledPalette> {
        if desired_count == 0 {
            return Err(PaletteError::InvalidCount {
                count: desired_count,
            });
        }

        let palette = match source {
            PaletteSource::HexList(hexes) => {
                let parsed = Palette::from_hex_list(hexes)?;
                let sources = parsed.colors().to_vec();
                fill_to(parsed, &sources, desired_count, FillPolicy::ValueJitter, self.fill_jitter)
            }
            PaletteSource::Scheme { base, scheme } => self.catalog.generate(scheme, *base, desired_count)?,
            PaletteSource::Rule { rule, base } => {
                let natural = rule.evaluate(*base);
                // A rule without steps can only repeat its base.
                let sources = if natural.len() > 1 {
                    natural.colors()[1..].to_vec()
                } else {
                    natural.colors().to_vec()
                };
                fill_to(natural, &sources, desired_count, FillPolicy::ValueJitter, self.fill_jitter)
            }
            PaletteSource::Image {
                pixels,
                k,
                filter_background,
            } => {
                let clusters = match cancel {
                    Some(flag) => self.extractor.extract_with_cancel(pixels, *k, *filter_background, flag)?,
                    None => self.extractor.extract(pixels, *k, *filter_background)?,
                };
                top_colors(&clusters, desired_count)
            }
            PaletteSource::Clusters(clusters) => top_colors(clusters, desired_count),
        };

        let assembled = AssembledPalette {
            palette,
            requested: desired_count,
        };
        debug!(
            source = source.kind(),
            requested = desired_count,
            produced = assembled.palette.len(),
            shortfall = assembled.shortfall(),
            "Assembled palette"
        );
        Ok(assembled)
    }
}
