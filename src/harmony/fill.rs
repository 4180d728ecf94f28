//! Padding a harmony result up to a requested color count
//!
//! When a caller asks for more colors than a generator naturally produces,
//! the generator's own outputs are cycled. Each extra color reuses source
//! `i mod n` in round `r = i / n + 1` and walks one HSV channel by
//! `r * jitter` percent. The walk starts toward the middle of the range
//! (down when the channel is at or above 50, up otherwise) and reflects off
//! 0 and 100 instead of clamping, so later rounds keep moving. A candidate
//! that already appears in the palette is nudged further along the walk in
//! half-percent steps until it is new.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::{Color, Hsv, Palette};

/// Nudges tried per padded slot before accepting a repeated color
const MAX_ATTEMPTS: usize = 64;

/// Extra walk distance (percent) per nudge
const NUDGE: f32 = 0.5;

/// Which HSV channel absorbs the padding jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillPolicy {
    /// Jitter the value channel. Used by hue-rotation schemes, where value
    /// is otherwise constant across the palette.
    ValueJitter,
    /// Jitter the saturation channel. Used by value ramps, whose steps
    /// already spread along value. Achromatic sources fall back to value
    /// jitter, since adding saturation to a gray would invent a hue.
    SaturationJitter,
}

impl FillPolicy {
    /// Jittered copy of `color` for padding round `round` (1-based).
    pub fn jittered(&self, color: Color, round: usize, jitter: f32) -> Color {
        self.walked(color, jitter * round as f32)
    }

    fn walked(&self, color: Color, amount: f32) -> Color {
        let hsv = color.to_hsv();
        let shifted = match self {
            FillPolicy::SaturationJitter if hsv.s > 0.0 => {
                Hsv::new(hsv.h, walk(hsv.s, amount), hsv.v)
            }
            _ => Hsv::new(hsv.h, hsv.s, walk(hsv.v, amount)),
        };
        shifted.to_rgb()
    }
}

/// Move `channel` by `amount` toward the middle, bouncing off 0 and 100.
fn walk(channel: f32, amount: f32) -> f32 {
    let raw = if channel >= 50.0 {
        channel - amount
    } else {
        channel + amount
    };
    let folded = raw.rem_euclid(200.0);
    if folded > 100.0 { 200.0 - folded } else { folded }
}

/// Truncate `palette` to `desired` colors, or pad it by cycling `sources`.
///
/// With no sources nothing can be generated and the palette stays short.
pub(crate) fn fill_to(
    mut palette: Palette,
    sources: &[Color],
    desired: usize,
    policy: FillPolicy,
    jitter: f32,
) -> Palette {
    if palette.len() >= desired {
        palette.truncate(desired);
        return palette;
    }
    if sources.is_empty() {
        return palette;
    }

    let missing = desired - palette.len();
    for i in 0..missing {
        let source = sources[i % sources.len()];
        let round = i / sources.len() + 1;
        let amount = jitter * round as f32;

        let mut candidate = policy.walked(source, amount);
        let mut attempt = 1;
        while palette.colors().contains(&candidate) && attempt < MAX_ATTEMPTS {
            candidate = policy.walked(source, amount + attempt as f32 * NUDGE);
            attempt += 1;
        }
        if palette.colors().contains(&candidate) {
            warn!(color = %candidate, "Padding could not avoid a repeated color");
        }
        palette.push(candidate);
    }
    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_trailing_colors() {
        let palette = Palette::new(vec![Color::BLACK, Color::WHITE, Color::new(255, 0, 0)]);
        let filled = fill_to(palette, &[Color::WHITE], 1, FillPolicy::ValueJitter, 12.0);
        assert_eq!(filled.colors(), &[Color::BLACK]);
    }

    #[test]
    fn test_pads_by_cycling_with_growing_jitter() {
        let cyan = Color::new(0, 255, 255);
        let palette = Palette::new(vec![Color::new(255, 0, 0), cyan]);
        let filled = fill_to(palette, &[cyan], 4, FillPolicy::ValueJitter, 20.0);

        assert_eq!(filled.len(), 4);
        // Value 100 is above the midpoint, so each round darkens by 20%.
        assert_eq!(filled.colors()[2], Color::new(0, 204, 204));
        assert_eq!(filled.colors()[3], Color::new(0, 153, 153));
    }

    #[test]
    fn test_dark_sources_are_lightened() {
        let dark = Color::new(0, 0, 51); // value 20
        let padded = FillPolicy::ValueJitter.jittered(dark, 1, 20.0);
        assert_eq!(padded, Color::new(0, 0, 102));
    }

    #[test]
    fn test_saturation_jitter_keeps_value() {
        let color = Color::new(255, 0, 0);
        let padded = FillPolicy::SaturationJitter.jittered(color, 1, 20.0);
        let hsv = padded.to_hsv();
        assert!((hsv.s - 80.0).abs() < 0.5);
        assert!((hsv.v - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_saturation_jitter_on_gray_moves_value() {
        let gray = Color::new(200, 200, 200);
        let padded = FillPolicy::SaturationJitter.jittered(gray, 1, 10.0);
        assert_eq!(padded.r, padded.g);
        assert_eq!(padded.g, padded.b);
        assert!(padded.r < 200);
    }

    #[test]
    fn test_walk_reflects_off_the_range_ends() {
        assert_eq!(walk(100.0, 30.0), 70.0);
        assert_eq!(walk(20.0, 30.0), 50.0);
        assert_eq!(walk(60.0, 80.0), 20.0);
        assert_eq!(walk(60.0, 70.0), 10.0);
        assert_eq!(walk(60.0, 120.0), 60.0);
        assert_eq!(walk(40.0, 90.0), 70.0);
    }

    #[test]
    fn test_long_padding_stays_distinct() {
        let red = Color::new(255, 0, 0);
        let cyan = Color::new(0, 255, 255);
        for policy in [FillPolicy::ValueJitter, FillPolicy::SaturationJitter] {
            let filled = fill_to(Palette::new(vec![red, cyan]), &[cyan], 40, policy, 12.0);
            assert_eq!(filled.len(), 40);
            for (i, color) in filled.iter().enumerate() {
                assert!(
                    !filled.colors()[..i].contains(color),
                    "{policy:?}: {color} repeated at position {i}"
                );
            }
        }
    }

    #[test]
    fn test_zero_jitter_still_avoids_repeats() {
        let cyan = Color::new(0, 255, 255);
        let filled = fill_to(Palette::new(vec![cyan]), &[cyan], 3, FillPolicy::ValueJitter, 0.0);
        assert_eq!(filled.len(), 3);
        assert_ne!(filled.colors()[1], cyan);
        assert_ne!(filled.colors()[2], filled.colors()[1]);
    }

    #[test]
    fn test_no_sources_leaves_palette_short() {
        let filled = fill_to(Palette::default(), &[], 3, FillPolicy::ValueJitter, 12.0);
        assert!(filled.is_empty());
    }
}
