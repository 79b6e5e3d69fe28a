//! Size model: the effective length of any row or column index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::ColumnWidth;

/// Which axis a length belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Column,
}

/// Explicit lengths keyed by row or column index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeOverrides {
    entries: BTreeMap<usize, f32>,
}

impl SizeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.entries.get(&index).copied()
    }

    pub fn set(&mut self, index: usize, length: f32) {
        self.entries.insert(index, length);
    }

    pub fn remove(&mut self, index: usize) -> Option<f32> {
        self.entries.remove(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.entries.iter().map(|(&i, &len)| (i, len))
    }
}

impl FromIterator<(usize, f32)> for SizeOverrides {
    fn from_iter<I: IntoIterator<Item = (usize, f32)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// `Σ overrides + (count - overridden) * default`, counting only overrides
/// that address one of the `count` indices.
#[allow(clippy::cast_precision_loss)]
pub fn total_length(count: usize, overrides: &SizeOverrides, default_length: f32) -> f32 {
    let (sum, overridden) = overrides
        .iter()
        .filter(|&(i, _)| i < count)
        .fold((0.0_f32, 0_usize), |(sum, n), (_, len)| (sum + len, n + 1));
    sum + (count - overridden) as f32 * default_length
}

/// Lengths along one axis: a default, a base layer resolved from declared
/// column widths, and user overrides on top.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeModel {
    default_length: f32,
    base: SizeOverrides,
    overrides: SizeOverrides,
}

impl SizeModel {
    pub fn new(default_length: f32) -> Self {
        Self {
            default_length,
            base: SizeOverrides::new(),
            overrides: SizeOverrides::new(),
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: SizeOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_base(mut self, base: SizeOverrides) -> Self {
        self.base = base;
        self
    }

    pub fn default_length(&self) -> f32 {
        self.default_length
    }

    pub fn set_default_length(&mut self, length: f32) {
        self.default_length = length;
    }

    pub fn base(&self) -> &SizeOverrides {
        &self.base
    }

    pub fn set_base(&mut self, base: SizeOverrides) {
        self.base = base;
    }

    pub fn overrides(&self) -> &SizeOverrides {
        &self.overrides
    }

    pub fn set_overrides(&mut self, overrides: SizeOverrides) {
        self.overrides = overrides;
    }

    pub fn set_override(&mut self, index: usize, length: f32) {
        self.overrides.set(index, length);
    }

    pub fn remove_override(&mut self, index: usize) -> Option<f32> {
        self.overrides.remove(index)
    }

    /// Effective length of `index`: override, else base, else default.
    pub fn length(&self, index: usize) -> f32 {
        self.overrides
            .get(index)
            .or_else(|| self.base.get(index))
            .unwrap_or(self.default_length)
    }

    /// Cumulative length of indices `0..index`, in O(entries).
    #[allow(clippy::cast_precision_loss)]
    pub fn offset_of(&self, index: usize) -> f32 {
        let adjust: f32 = self
            .entries()
            .filter(|&(i, _)| i < index)
            .map(|(_, len)| len - self.default_length)
            .sum();
        index as f32 * self.default_length + adjust
    }

    /// Total length of `count` indices.
    pub fn total_length(&self, count: usize) -> f32 {
        self.offset_of(count)
    }

    /// Sum of the lengths of `start..end`.
    pub fn range_length(&self, start: usize, end: usize) -> f32 {
        if end <= start {
            return 0.0;
        }
        self.offset_of(end) - self.offset_of(start)
    }

    /// Base and override entries merged, overrides winning.
    fn entries(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.base
            .iter()
            .filter(|&(i, _)| self.overrides.get(i).is_none())
            .chain(self.overrides.iter())
    }
}

/// Resolve declared column widths against the viewport width.
///
/// Fixed widths are taken as-is. Percentage columns share what remains of the
/// viewport after fixed columns, in proportion to their percentages; when
/// nothing remains they are left out so they read the default width.
/// Columns without a declared width are left out as well.
pub fn resolve_column_widths(widths: &[Option<ColumnWidth>], viewport_width: f32) -> SizeOverrides {
    let mut resolved = SizeOverrides::new();
    let mut fixed_total = 0.0_f32;
    let mut pct_total = 0.0_f32;

    for (index, width) in widths.iter().enumerate() {
        match width {
            Some(ColumnWidth::Fixed(w)) => {
                fixed_total += w;
                resolved.set(index, *w);
            }
            Some(ColumnWidth::Percent(p)) => pct_total += p,
            None => {}
        }
    }

    if pct_total <= 0.0 {
        return resolved;
    }

    let remaining = viewport_width - fixed_total;
    if remaining <= 0.0 {
        log::debug!(
            target: "vsheet::sizes",
            "no width left for percentage columns (viewport {viewport_width}, fixed {fixed_total}); using default width"
        );
        return resolved;
    }

    for (index, width) in widths.iter().enumerate() {
        if let Some(ColumnWidth::Percent(p)) = width {
            resolved.set(index, (p / pct_total) * remaining);
        }
    }
    resolved
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_total_length_formula() {
        let overrides: SizeOverrides = [(1, 50.0), (3, 10.0)].into_iter().collect();
        assert_eq!(total_length(5, &overrides, 20.0), 50.0 + 10.0 + 3.0 * 20.0);
        // entries past the end are ignored
        assert_eq!(total_length(2, &overrides, 20.0), 20.0 + 50.0);
        assert_eq!(total_length(0, &overrides, 20.0), 0.0);
    }

    #[test]
    fn test_override_round_trip() {
        let mut sizes = SizeModel::new(30.0);
        assert_eq!(sizes.length(7), 30.0);
        sizes.set_override(7, 42.5);
        assert_eq!(sizes.length(7), 42.5);
    }

    #[test]
    fn test_overrides_win_over_base() {
        let base: SizeOverrides = [(0, 80.0), (1, 120.0)].into_iter().collect();
        let mut sizes = SizeModel::new(100.0).with_base(base);
        sizes.set_override(1, 60.0);
        assert_eq!(sizes.length(0), 80.0);
        assert_eq!(sizes.length(1), 60.0);
        assert_eq!(sizes.length(2), 100.0);
        assert_eq!(sizes.total_length(3), 80.0 + 60.0 + 100.0);
    }

    #[test]
    fn test_offsets() {
        let mut sizes = SizeModel::new(10.0);
        sizes.set_override(2, 30.0);
        assert_eq!(sizes.offset_of(0), 0.0);
        assert_eq!(sizes.offset_of(2), 20.0);
        assert_eq!(sizes.offset_of(3), 50.0);
        assert_eq!(sizes.range_length(1, 4), 10.0 + 30.0 + 10.0);
        assert_eq!(sizes.range_length(4, 1), 0.0);
    }

    #[test]
    fn test_percentages_share_remaining_width() {
        let widths = [
            Some(ColumnWidth::Fixed(100.0)),
            Some(ColumnWidth::Percent(25.0)),
            Some(ColumnWidth::Percent(75.0)),
            None,
        ];
        let resolved = resolve_column_widths(&widths, 500.0);
        assert_eq!(resolved.get(0), Some(100.0));
        assert_eq!(resolved.get(1), Some(100.0));
        assert_eq!(resolved.get(2), Some(300.0));
        assert_eq!(resolved.get(3), None);
    }

    #[test]
    fn test_percentages_fall_back_without_room() {
        let widths = [Some(ColumnWidth::Fixed(600.0)), Some(ColumnWidth::Percent(50.0))];
        let resolved = resolve_column_widths(&widths, 500.0);
        assert_eq!(resolved.get(1), None);
        let resolved = resolve_column_widths(&widths, 0.0);
        assert_eq!(resolved.get(1), None);
    }
}
