use serde::{Deserialize, Serialize};

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One `(field, direction)` entry of a [`SortSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    /// A key without direction has no ordering effect
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

impl SortKey {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Some(SortDirection::Asc),
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Some(SortDirection::Desc),
        }
    }
}

/// Ordered sort keys; earlier keys take priority, later keys break ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Current direction of `field`, if it is part of the spec.
    pub fn direction_of(&self, field: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.field == field)
            .and_then(|k| k.direction)
    }

    /// Cycle `field` through ASC → DESC → removed and return its new
    /// direction. A field switching to DESC moves to the lowest priority.
    pub fn toggle(&mut self, field: &str) -> Option<SortDirection> {
        let Some(pos) = self.keys.iter().position(|k| k.field == field) else {
            self.keys.push(SortKey::asc(field));
            return Some(SortDirection::Asc);
        };
        let old = self.keys.remove(pos);
        if old.direction == Some(SortDirection::Asc) {
            self.keys.push(SortKey::desc(field));
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}
