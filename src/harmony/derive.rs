//! Harmony rules learned from an image's dominant colors.

use crate::color::{Color, HsvOffset, Palette};
use crate::extract::ClusterResult;
use crate::{PaletteError, Result};

use super::{CustomHarmonyRule, HarmonyStep};

/// A rule derived from extracted colors, together with the base color it was
/// measured against. Evaluating `rule` on `base` reproduces the colors up to
/// HSV round-trip rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedHarmony {
    pub base: Color,
    pub rule: CustomHarmonyRule,
}

impl DerivedHarmony {
    pub fn palette(&self) -> Palette {
        self.rule.evaluate(self.base)
    }
}

/// Derive a rule from ranked clusters. See [`derive_rule_from_colors`].
pub fn derive_rule(clusters: &ClusterResult, name: impl Into<String>) -> Result<DerivedHarmony> {
    derive_rule_from_colors(&clusters.colors(), name)
}

/// Derive a rule from colors given in dominance order.
///
/// The base is the brightest color (highest HSV value, then higher
/// luminance, then earlier position). Every other color becomes an offset
/// step relative to the base, in the order given.
pub fn derive_rule_from_colors(colors: &[Color], name: impl Into<String>) -> Result<DerivedHarmony> {
    if colors.len() < 2 {
        return Err(PaletteError::InsufficientColors {
            found: colors.len(),
            required: 2,
        });
    }

    let hsvs: Vec<_> = colors.iter().map(Color::to_hsv).collect();

    let mut base_index = 0;
    for i in 1..colors.len() {
        let (best, candidate) = (&hsvs[base_index], &hsvs[i]);
        let brighter = candidate.v > best.v
            || (candidate.v == best.v && colors[i].luminance() > colors[base_index].luminance());
        if brighter {
            base_index = i;
        }
    }

    let base_hsv = hsvs[base_index];
    let steps = hsvs
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != base_index)
        .map(|(_, &hsv)| HarmonyStep::Offset(HsvOffset::between(base_hsv, hsv)))
        .collect();

    Ok(DerivedHarmony {
        base: colors[base_index],
        rule: CustomHarmonyRule::new(name, steps),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Cluster;

    fn channel_close(a: Color, b: Color) -> bool {
        (a.r as i32 - b.r as i32).abs() <= 1
            && (a.g as i32 - b.g as i32).abs() <= 1
            && (a.b as i32 - b.b as i32).abs() <= 1
    }

    #[test]
    fn test_brightest_color_is_base() {
        let colors = [
            Color::new(10, 10, 10),
            Color::new(240, 240, 240),
            Color::new(100, 150, 200),
        ];
        let derived = derive_rule_from_colors(&colors, "photo").unwrap();
        assert_eq!(derived.base, Color::new(240, 240, 240));
        assert_eq!(derived.rule.len(), 2);
        assert_eq!(derived.rule.name(), "photo");
    }

    #[test]
    fn test_value_tie_broken_by_luminance() {
        // Both have V = 100%; yellow is perceptually brighter than blue.
        let colors = [Color::new(0, 0, 255), Color::new(255, 255, 0)];
        let derived = derive_rule_from_colors(&colors, "tie").unwrap();
        assert_eq!(derived.base, Color::new(255, 255, 0));
    }

    #[test]
    fn test_steps_reproduce_colors_in_order() {
        let colors = [
            Color::new(200, 60, 40),
            Color::new(250, 220, 120),
            Color::new(40, 90, 160),
        ];
        let derived = derive_rule_from_colors(&colors, "roundtrip").unwrap();
        let palette = derived.palette();
        assert_eq!(palette.colors()[0], colors[1]);
        assert!(channel_close(palette.colors()[1], colors[0]));
        assert!(channel_close(palette.colors()[2], colors[2]));

        for step in derived.rule.steps() {
            let HarmonyStep::Offset(offset) = step else {
                panic!("derived steps are offsets");
            };
            assert!(offset.hue > -180.0 && offset.hue <= 180.0);
        }
    }

    #[test]
    fn test_from_cluster_result() {
        let result = ClusterResult::from_clusters(
            vec![
                Cluster { color: Color::new(30, 30, 120), count: 50 },
                Cluster { color: Color::new(230, 200, 60), count: 10 },
            ],
            2,
        );
        let derived = derive_rule(&result, "clusters").unwrap();
        assert_eq!(derived.base, Color::new(230, 200, 60));
        assert_eq!(derived.rule.len(), 1);
    }

    #[test]
    fn test_needs_two_colors() {
        assert!(matches!(
            derive_rule_from_colors(&[Color::WHITE], "one"),
            Err(PaletteError::InsufficientColors { found: 1, required: 2 })
        ));
        assert!(matches!(
            derive_rule_from_colors(&[], "none"),
            Err(PaletteError::InsufficientColors { found: 0, .. })
        ));
    }
}
