//! Pixel selection ahead of clustering: background filtering and stride
//! sampling. Both are deterministic; no randomness is involved here.

use std::collections::HashMap;

use crate::color::Color;
use crate::config::ExtractionConfig;

/// True when `color` sits in the near-white or near-black band, or below
/// the minimum saturation when that check is enabled.
pub(crate) fn is_background(color: Color, config: &ExtractionConfig) -> bool {
    let hsv = color.to_hsv();
    hsv.v >= config.white_threshold
        || hsv.v <= config.black_threshold
        || (config.min_saturation > 0.0 && hsv.s < config.min_saturation)
}

pub(crate) fn filter_background(pixels: &[Color], config: &ExtractionConfig) -> Vec<Color> {
    pixels
        .iter()
        .copied()
        .filter(|&c| !is_background(c, config))
        .collect()
}

/// Take at most `budget` pixels at a uniform stride.
///
/// The stride is fractional so the sample spans the whole buffer instead of
/// stopping at `budget * floor(len / budget)`.
pub(crate) fn stride_sample(pixels: &[Color], budget: usize) -> Vec<Color> {
    if pixels.len() <= budget {
        return pixels.to_vec();
    }
    let stride = pixels.len() as f64 / budget as f64;
    (0..budget)
        .map(|i| pixels[((i as f64 * stride) as usize).min(pixels.len() - 1)])
        .collect()
}

/// Distinct colors with their counts, in order of first appearance.
pub(crate) fn distinct_counts(pixels: &[Color]) -> Vec<(Color, usize)> {
    let mut order: Vec<(Color, usize)> = Vec::new();
    let mut index: HashMap<Color, usize> = HashMap::new();
    for &color in pixels {
        match index.get(&color) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(color, order.len());
                order.push((color, 1));
            }
        }
    }
    order
}
