//! Palette transfer by brightness zones
//!
//! The luminance range actually present in the source is cut into as many
//! equal zones as the palette has colors. Each pixel takes the palette color
//! of its zone, darkest zone to darkest palette color, so the image keeps its
//! light/shadow structure while adopting the palette.

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::color::{Color, Palette};
use crate::extract::PixelBuffer;

/// Palette ramp plus the luminance range it is stretched over.
struct ZoneMap {
    ramp: Vec<Color>,
    min: f32,
    span: f32,
}

fn gray_level(color: Color) -> f32 {
    color.luminance().round()
}

impl ZoneMap {
    /// `None` when there is nothing to map to or nothing to measure.
    fn new(palette: &Palette, levels: impl Iterator<Item = f32>) -> Option<Self> {
        if palette.is_empty() {
            return None;
        }
        let (min, max) = levels.fold(None, |range: Option<(f32, f32)>, g| match range {
            None => Some((g, g)),
            Some((lo, hi)) => Some((lo.min(g), hi.max(g))),
        })?;

        let mut ramp = palette.sorted_by_luminance().into_vec();
        ramp.reverse();
        let span = if max > min { max - min } else { 1.0 };
        Some(Self { ramp, min, span })
    }

    fn zone(&self, color: Color) -> usize {
        let n = self.ramp.len();
        let scaled = (gray_level(color) - self.min) / self.span * n as f32;
        (scaled.max(0.0) as usize).min(n - 1)
    }

    fn map(&self, color: Color) -> Color {
        self.ramp[self.zone(color)]
    }
}

/// Recolor `pixels` with `palette`, one brightness zone per palette color.
///
/// An empty palette or an empty buffer returns an unchanged copy.
pub fn recolor(pixels: &PixelBuffer, palette: &Palette) -> PixelBuffer {
    let Some(zones) = ZoneMap::new(palette, pixels.pixels().iter().map(|&c| gray_level(c))) else {
        return pixels.clone();
    };
    debug!(
        zones = zones.ramp.len(),
        min = zones.min,
        span = zones.span,
        "recoloring pixel buffer"
    );
    pixels.map_pixels(|c| zones.map(c))
}

/// Recolor a decoded image, keeping its alpha channel.
///
/// Fully transparent pixels neither count toward the luminance range nor
/// change color.
pub fn recolor_image(image: &DynamicImage, palette: &Palette) -> RgbaImage {
    let mut rgba = image.to_rgba8();
    let visible = |px: &&Rgba<u8>| px.0[3] != 0;
    let levels = rgba
        .pixels()
        .filter(visible)
        .map(|px| gray_level(Color::new(px.0[0], px.0[1], px.0[2])));

    let Some(zones) = ZoneMap::new(palette, levels) else {
        return rgba;
    };
    for px in rgba.pixels_mut() {
        let [r, g, b, a] = px.0;
        if a == 0 {
            continue;
        }
        let mapped = zones.map(Color::new(r, g, b));
        *px = Rgba([mapped.r, mapped.g, mapped.b, a]);
    }
    rgba
}
