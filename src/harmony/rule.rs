//! User-defined harmony rules
//!
//! A [`CustomHarmonyRule`] is an immutable value. Editing methods validate
//! their indices and return a new rule, leaving the original untouched, so a
//! rule that has been evaluated once always evaluates the same way.

use serde::{Deserialize, Serialize};

use super::HarmonyStep;
use crate::color::{Color, Palette};
use crate::{PaletteError, Result};

/// A named, ordered sequence of harmony steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomHarmonyRule {
    name: String,
    steps: Vec<HarmonyStep>,
}

impl CustomHarmonyRule {
    pub fn new(name: impl Into<String>, steps: Vec<HarmonyStep>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[HarmonyStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Evaluate against `base`: the base itself, then one color per step.
    pub fn evaluate(&self, base: Color) -> Palette {
        std::iter::once(base)
            .chain(self.steps.iter().map(|step| step.apply(base)))
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.steps.len() {
            Ok(())
        } else {
            Err(PaletteError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            })
        }
    }

    /// New rule with `step` appended.
    pub fn with_step(&self, step: impl Into<HarmonyStep>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step.into());
        Self::new(self.name.clone(), steps)
    }

    /// New rule with `step` inserted before `index` (`index == len` appends).
    pub fn with_step_at(&self, index: usize, step: impl Into<HarmonyStep>) -> Result<Self> {
        if index > self.steps.len() {
            return Err(PaletteError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        let mut steps = self.steps.clone();
        steps.insert(index, step.into());
        Ok(Self::new(self.name.clone(), steps))
    }

    /// New rule without the step at `index`.
    pub fn without_step(&self, index: usize) -> Result<Self> {
        self.check_index(index)?;
        let mut steps = self.steps.clone();
        steps.remove(index);
        Ok(Self::new(self.name.clone(), steps))
    }

    /// New rule with the step at `from` moved to position `to`.
    pub fn reordered(&self, from: usize, to: usize) -> Result<Self> {
        self.check_index(from)?;
        self.check_index(to)?;
        let mut steps = self.steps.clone();
        let step = steps.remove(from);
        steps.insert(to, step);
        Ok(Self::new(self.name.clone(), steps))
    }

    /// New rule with the step at `index` replaced.
    pub fn with_updated_step(&self, index: usize, step: impl Into<HarmonyStep>) -> Result<Self> {
        self.check_index(index)?;
        let mut steps = self.steps.clone();
        steps[index] = step.into();
        Ok(Self::new(self.name.clone(), steps))
    }

    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.steps.clone())
    }

    /// Opaque blob for the rule storage collaborator.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
