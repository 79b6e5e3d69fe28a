use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-field substring patterns, combined with AND. Empty patterns impose no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec {
    patterns: BTreeMap<String, String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`FilterSpec::set`].
    #[must_use]
    pub fn with(mut self, field: &str, pattern: &str) -> Self {
        self.set(field, pattern);
        self
    }

    /// Set the pattern for `field`; an empty pattern clears it.
    pub fn set(&mut self, field: &str, pattern: &str) {
        if pattern.is_empty() {
            self.patterns.remove(field);
        } else {
            self.patterns.insert(field.to_string(), pattern.to_string());
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.patterns.get(field).map(String::as_str)
    }

    /// Fields with a non-empty pattern.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.patterns
            .iter()
            .filter(|(_, p)| !p.is_empty())
            .map(|(f, p)| (f.as_str(), p.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
    }
}
