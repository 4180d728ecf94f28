//! Ordered color sequences

use serde::{Deserialize, Serialize};

use super::Color;
use crate::Result;

/// An ordered sequence of colors.
///
/// Order is significant and duplicates are allowed. A `Palette` is owned by
/// the caller; the engine never persists it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// Parse a list of hex codes, failing on the first malformed entry.
    pub fn from_hex_list<S: AsRef<str>>(hexes: &[S]) -> Result<Self> {
        hexes
            .iter()
            .map(|h| Color::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn first(&self) -> Option<Color> {
        self.colors.first().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.colors.iter()
    }

    pub fn into_vec(self) -> Vec<Color> {
        self.colors
    }

    /// `#RRGGBB` strings in palette order, for export collaborators.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.colors.iter().map(Color::to_hex).collect()
    }

    /// Copy of this palette ordered from brightest to darkest.
    ///
    /// The sort is stable, so equally bright colors keep their order.
    pub fn sorted_by_luminance(&self) -> Palette {
        let mut colors = self.colors.clone();
        colors.sort_by(|a, b| b.luminance().total_cmp(&a.luminance()));
        Self::new(colors)
    }

    pub(crate) fn push(&mut self, color: Color) {
        self.colors.push(color);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.colors.truncate(len);
    }
}

impl From<Vec<Color>> for Palette {
    fn from(colors: Vec<Color>) -> Self {
        Self::new(colors)
    }
}

impl FromIterator<Color> for Palette {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Palette {
    type Item = Color;
    type IntoIter = std::vec::IntoIter<Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}
