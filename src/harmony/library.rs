//! In-memory collection of named harmony rules
//!
//! The library keeps rules in insertion order and enforces unique names.
//! Persistence stays with the caller: [`RuleLibrary::to_bytes`] and
//! [`RuleLibrary::from_bytes`] hand over an opaque blob, and whatever stores
//! it (encrypted file, settings database, ...) is outside the engine.

use serde::{Deserialize, Serialize};

use super::CustomHarmonyRule;
use crate::color::{Color, Palette};
use crate::{PaletteError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleLibrary {
    rules: Vec<CustomHarmonyRule>,
}

impl RuleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CustomHarmonyRule> {
        self.rules.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CustomHarmonyRule> {
        self.rules.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&CustomHarmonyRule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.name() == name)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.rules.len() {
            Ok(())
        } else {
            Err(PaletteError::IndexOutOfRange {
                index,
                len: self.rules.len(),
            })
        }
    }

    /// Append a rule; its name must not already be taken.
    pub fn insert(&mut self, rule: CustomHarmonyRule) -> Result<()> {
        if self.find(rule.name()).is_some() {
            return Err(PaletteError::DuplicateRuleName {
                name: rule.name().to_string(),
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Replace the rule at `index`, returning the old one. The new name may
    /// equal the replaced rule's name but not any other rule's.
    pub fn replace(&mut self, index: usize, rule: CustomHarmonyRule) -> Result<CustomHarmonyRule> {
        self.check_index(index)?;
        if let Some(existing) = self.position(rule.name()) {
            if existing != index {
                return Err(PaletteError::DuplicateRuleName {
                    name: rule.name().to_string(),
                });
            }
        }
        Ok(std::mem::replace(&mut self.rules[index], rule))
    }

    pub fn remove(&mut self, index: usize) -> Result<CustomHarmonyRule> {
        self.check_index(index)?;
        Ok(self.rules.remove(index))
    }

    pub fn remove_named(&mut self, name: &str) -> Result<CustomHarmonyRule> {
        let index = self.position(name).ok_or_else(|| PaletteError::UnknownRule {
            name: name.to_string(),
        })?;
        Ok(self.rules.remove(index))
    }

    /// Evaluate the rule called `name` against `base`.
    pub fn apply(&self, name: &str, base: Color) -> Result<Palette> {
        self.find(name)
            .map(|rule| rule.evaluate(base))
            .ok_or_else(|| PaletteError::UnknownRule {
                name: name.to_string(),
            })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Rebuild a library from a blob, rejecting duplicate names.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let rules: Vec<CustomHarmonyRule> = serde_json::from_slice(bytes)?;
        let mut library = Self::new();
        for rule in rules {
            library.insert(rule)?;
        }
        Ok(library)
    }
}

impl<'a> IntoIterator for &'a RuleLibrary {
    type Item = &'a CustomHarmonyRule;
    type IntoIter = std::slice::Iter<'a, CustomHarmonyRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
