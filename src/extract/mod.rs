//! Dominant-color extraction
//!
//! Pixels go through three stages: optional background filtering, uniform
//! stride sampling, then seeded k-means in CIE Lab. Centroids are converted
//! back to 8-bit sRGB and ranked by how many filtered pixels they own.

mod kmeans;
mod sampling;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::DynamicImage;
use kmeans_colors::Calculate;
use palette::{IntoColor, Lab, LinSrgb, Srgb};
use serde::Serialize;
use tracing::{debug, warn};

use crate::color::{Color, Palette};
use crate::config::ExtractionConfig;
use crate::{PaletteError, Result};

use kmeans::KmeansParams;

/// Largest supported cluster count; cluster indices are stored as `u8`.
pub const MAX_CLUSTERS: usize = 256;

// ------------------------------------------------------------
// Cancellation
// ------------------------------------------------------------

/// Cooperative cancellation shared between a caller and a running extraction.
///
/// Clones share the same flag. The extractor polls it between k-means
/// iterations.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ------------------------------------------------------------
// Pixel input
// ------------------------------------------------------------

/// Decoded RGB pixels in row-major order.
///
/// Transparent pixels are removed at construction, so `pixels().len()` may be
/// smaller than `width * height`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

fn check_len(width: u32, height: u32, channels: usize, len: usize) -> Result<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels));
    if expected == Some(len) {
        Ok(())
    } else {
        Err(PaletteError::InvalidDimensions {
            width,
            height,
            channels,
            len,
        })
    }
}

impl PixelBuffer {
    /// Wrap packed RGB bytes (`width * height * 3` long).
    pub fn from_rgb8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        check_len(width, height, 3, data.len())?;
        let pixels = data
            .chunks_exact(3)
            .map(|px| Color::new(px[0], px[1], px[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap packed RGBA bytes, dropping fully transparent pixels.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        check_len(width, height, 4, data.len())?;
        let pixels = data
            .chunks_exact(4)
            .filter(|px| px[3] != 0)
            .map(|px| Color::new(px[0], px[1], px[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_colors(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        if (width as usize).checked_mul(height as usize) != Some(pixels.len()) {
            return Err(PaletteError::InvalidPixelCount {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Convert a decoded `image` buffer, honoring its alpha channel.
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.as_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Same dimensions, every pixel passed through `f`.
    pub fn map_pixels(&self, f: impl Fn(Color) -> Color) -> PixelBuffer {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&c| f(c)).collect(),
        }
    }
}

// ------------------------------------------------------------
// Results
// ------------------------------------------------------------

/// One extracted color and the number of pixels assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cluster {
    pub color: Color,
    pub count: usize,
}

/// Clusters ranked by dominance (descending pixel count).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterResult {
    clusters: Vec<Cluster>,
    requested: usize,
    sampled_pixels: usize,
    iterations: usize,
}

impl ClusterResult {
    /// Rank `clusters` by count. The sort is stable, so ties keep their
    /// incoming order.
    pub fn from_clusters(mut clusters: Vec<Cluster>, requested: usize) -> Self {
        clusters.sort_by(|a, b| b.count.cmp(&a.count));
        Self {
            clusters,
            requested,
            sampled_pixels: 0,
            iterations: 0,
        }
    }

    fn with_stats(mut self, sampled_pixels: usize, iterations: usize) -> Self {
        self.sampled_pixels = sampled_pixels;
        self.iterations = iterations;
        self
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn colors(&self) -> Vec<Color> {
        self.clusters.iter().map(|c| c.color).collect()
    }

    pub fn palette(&self) -> Palette {
        self.clusters.iter().map(|c| c.color).collect()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    /// How many of the requested clusters could not be produced.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.clusters.len())
    }

    pub fn dominant(&self) -> Option<Color> {
        self.clusters.first().map(|c| c.color)
    }

    /// Pixels fed to k-means (0 when clustering was skipped)
    pub fn sampled_pixels(&self) -> usize {
        self.sampled_pixels
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

// ------------------------------------------------------------
// Lab helpers
// ------------------------------------------------------------

fn color_to_lab(color: Color) -> Lab {
    Srgb::<u8>::from(color).into_linear::<f32>().into_color()
}

fn lab_to_color(lab: Lab) -> Color {
    let linear: LinSrgb = lab.into_color();
    let rgb: Srgb = Srgb::from_linear(linear);
    Color::from(rgb.into_format::<u8>())
}

// ------------------------------------------------------------
// Extractor
// ------------------------------------------------------------

/// Finds the `k` dominant colors of a [`PixelBuffer`].
#[derive(Debug, Clone, Default)]
pub struct ImageColorExtractor {
    config: ExtractionConfig,
}

impl ImageColorExtractor {
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Same extractor with a different k-means seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn extract(&self, image: &PixelBuffer, k: usize, filter_background: bool) -> Result<ClusterResult> {
        self.run(image, k, filter_background, None)
    }

    pub fn extract_with_cancel(
        &self,
        image: &PixelBuffer,
        k: usize,
        filter_background: bool,
        cancel: &CancelFlag,
    ) -> Result<ClusterResult> {
        self.run(image, k, filter_background, Some(cancel))
    }

    fn run(
        &self,
        image: &PixelBuffer,
        k: usize,
        filter_background: bool,
        cancel: Option<&CancelFlag>,
    ) -> Result<ClusterResult> {
        if k == 0 || k > MAX_CLUSTERS {
            return Err(PaletteError::InvalidK { k, max: MAX_CLUSTERS });
        }

        let filtered: Vec<Color> = if filter_background {
            sampling::filter_background(image.pixels(), &self.config)
        } else {
            image.pixels().to_vec()
        };
        if filtered.is_empty() {
            return Err(PaletteError::EmptyImage);
        }

        // Few enough distinct colors: they are the answer.
        let distinct = sampling::distinct_counts(&filtered);
        if distinct.len() <= k {
            if distinct.len() < k {
                warn!(
                    distinct = distinct.len(),
                    requested = k,
                    "Image has fewer distinct colors than requested clusters"
                );
            }
            let clusters = distinct
                .into_iter()
                .map(|(color, count)| Cluster { color, count })
                .collect();
            return Ok(ClusterResult::from_clusters(clusters, k));
        }

        let sample = sampling::stride_sample(&filtered, self.config.sample_budget);
        let lab_sample: Vec<Lab> = sample.iter().map(|&c| color_to_lab(c)).collect();
        debug!(
            filtered = filtered.len(),
            sampled = lab_sample.len(),
            k,
            seed = self.config.seed,
            "Running k-means"
        );

        let outcome = kmeans::run(
            &lab_sample,
            KmeansParams {
                k,
                max_iterations: self.config.max_iterations,
                convergence: self.config.convergence,
                seed: self.config.seed,
            },
            cancel,
        )?;

        // Rank over every filtered pixel, not just the sample.
        let mut counts = vec![0usize; outcome.centroids.len()];
        if lab_sample.len() == filtered.len() {
            for &i in &outcome.indices {
                counts[i as usize] += 1;
            }
        } else {
            let lab_all: Vec<Lab> = filtered.iter().map(|&c| color_to_lab(c)).collect();
            let mut indices = Vec::with_capacity(lab_all.len());
            Lab::get_closest_centroid(&lab_all, &outcome.centroids, &mut indices);
            for i in indices {
                counts[i as usize] += 1;
            }
        }

        // Merge centroids that land on the same 8-bit color.
        let mut clusters: Vec<Cluster> = Vec::with_capacity(counts.len());
        for (centroid, count) in outcome.centroids.iter().zip(counts) {
            if count == 0 {
                continue;
            }
            let color = lab_to_color(*centroid);
            match clusters.iter_mut().find(|c| c.color == color) {
                Some(existing) => existing.count += count,
                None => clusters.push(Cluster { color, count }),
            }
        }

        let result = ClusterResult::from_clusters(clusters, k).with_stats(lab_sample.len(), outcome.iterations);
        if result.shortfall() > 0 {
            warn!(
                found = result.len(),
                requested = k,
                "Extraction produced fewer clusters than requested"
            );
        }
        Ok(result)
    }
}
