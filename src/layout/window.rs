//! Windowing: which indices of an axis intersect the viewport.
//!
//! Each axis is scanned in two phases. The before-viewport scan walks from
//! index 0 until the running length passes the scroll offset; the
//! inside-viewport scan continues from there until the viewport end is
//! passed, including the index that crosses it (edge cells are rendered and
//! clipped by the container). Both scans touch only the indices up to the
//! viewport end, never the whole axis.

use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;

use super::SizeModel;

/// Result of the before-viewport scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeforeViewport {
    /// First index that is at least partially visible (`count` when the
    /// offset is past the end)
    pub index: usize,
    /// Cumulative length of all indices before `index`
    pub total_length: f32,
}

/// Result of the inside-viewport scan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InsideViewport {
    /// Last visited index (`None` when nothing is visible)
    pub last_index: Option<usize>,
    /// Sum of the visited lengths
    pub total_length: f32,
    /// Visited index → length, in index order
    pub lengths: BTreeMap<usize, f32>,
}

/// Phase 1: find the first visible index and the length before it.
pub fn scan_before_viewport(count: usize, sizes: &SizeModel, scroll: f32) -> BeforeViewport {
    let scroll = scroll.max(0.0);
    let mut acc = BeforeViewport {
        index: 0,
        total_length: 0.0,
    };
    while acc.index < count {
        let next = acc.total_length + sizes.length(acc.index);
        if next > scroll {
            break;
        }
        acc.index += 1;
        acc.total_length = next;
    }
    acc
}

/// Phase 2: collect lengths from the first visible index until the
/// viewport end is crossed (inclusive of the crossing index).
pub fn scan_inside_viewport(
    count: usize,
    sizes: &SizeModel,
    before: &BeforeViewport,
    scroll: f32,
    viewport_length: f32,
) -> InsideViewport {
    let limit = scroll.max(0.0) + viewport_length.max(0.0);
    let mut inside = InsideViewport::default();
    for index in before.index..count {
        let length = sizes.length(index);
        inside.total_length += length;
        inside.lengths.insert(index, length);
        inside.last_index = Some(index);
        if before.total_length + inside.total_length > limit {
            break;
        }
    }
    inside
}

/// Visible slice of one axis: a contiguous index range with its lengths and
/// the cumulative length in front of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisWindow {
    /// First visible index
    pub first: usize,
    /// Cumulative length before `first`
    pub offset: f32,
    /// Lengths of `first..first + lengths.len()`
    pub lengths: Vec<f32>,
}

impl AxisWindow {
    /// Combine the results of both scans.
    pub fn from_scans(before: &BeforeViewport, inside: &InsideViewport) -> Self {
        Self {
            first: before.index,
            offset: before.total_length,
            lengths: inside.lengths.values().copied().collect(),
        }
    }

    /// One past the last visible index.
    pub fn end(&self) -> usize {
        self.first + self.lengths.len()
    }

    pub fn range(&self) -> Range<usize> {
        self.first..self.end()
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    /// Last visible index.
    pub fn last(&self) -> Option<usize> {
        self.end().checked_sub(1).filter(|_| !self.is_empty())
    }

    /// Length of `index` if it is inside the window.
    pub fn length(&self, index: usize) -> Option<f32> {
        index
            .checked_sub(self.first)
            .and_then(|i| self.lengths.get(i))
            .copied()
    }

    /// Sum of the window lengths of `start..start + count`; indices outside
    /// the window count as 0.
    pub fn span_length(&self, start: usize, count: usize) -> f32 {
        (start..start.saturating_add(count).min(self.end()))
            .map(|i| self.length(i).unwrap_or(0.0))
            .sum()
    }

    /// Cumulative length of the window itself.
    pub fn extent(&self) -> f32 {
        self.lengths.iter().sum()
    }

    /// Leading edge of every window index, in order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, f32, f32)> + '_ {
        self.lengths
            .iter()
            .scan(self.offset, |pos, &len| {
                let start = *pos;
                *pos += len;
                Some((start, len))
            })
            .enumerate()
            .map(|(i, (start, len))| (self.first + i, start, len))
    }
}

/// Run both scans for one axis.
pub fn compute_window(count: usize, sizes: &SizeModel, scroll: f32, viewport_length: f32) -> AxisWindow {
    let before = scan_before_viewport(count, sizes, scroll);
    let inside = scan_inside_viewport(count, sizes, &before, scroll, viewport_length);
    log::trace!(
        target: "vsheet::window",
        "scroll {scroll} len {viewport_length}: first {} offset {} visible {}",
        before.index,
        before.total_length,
        inside.lengths.len()
    );
    AxisWindow::from_scans(&before, &inside)
}
