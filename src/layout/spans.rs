//! Merged cell resolution inside the current window.
//!
//! Cells are visited in row-major order. A cell already covered by an
//! earlier span is not asked for its own span. A cell requesting a span
//! covers the rectangle it spans (clipped to the window) and is remembered
//! as an origin; after the scan, origins are removed from the covered set so
//! a cell that is both a span target and an origin still renders.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::AxisWindow;
use crate::types::{Column, Record, SpanContext, SpanResult};

/// Outcome of span resolution for one window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanMap {
    covered: HashSet<(usize, usize)>,
    origins: HashMap<(usize, usize), SpanResult>,
}

impl SpanMap {
    /// Resolve spans for every cell of `rows × cols` using `span_of`.
    pub fn resolve<F>(rows: &AxisWindow, cols: &AxisWindow, mut span_of: F) -> Self
    where
        F: FnMut(usize, usize) -> SpanResult,
    {
        let mut map = Self::default();
        let (row_end, col_end) = (rows.end(), cols.end());

        for row in rows.range() {
            for col in cols.range() {
                if map.covered.contains(&(row, col)) {
                    continue;
                }
                let span = span_of(row, col).normalized();
                if !span.is_merge() {
                    continue;
                }
                map.origins.insert((row, col), span);
                let row_stop = row.saturating_add(span.row_span);
                let col_stop = col.saturating_add(span.col_span);
                let last_row = row_stop.min(row_end);
                let last_col = col_stop.min(col_end);
                if last_row < row_stop || last_col < col_stop {
                    log::trace!(
                        target: "vsheet::spans",
                        "span at ({row},{col}) {span:?} clipped to window"
                    );
                }
                for r in row..last_row {
                    for c in col..last_col {
                        map.covered.insert((r, c));
                    }
                }
            }
        }

        for origin in map.origins.keys() {
            map.covered.remove(origin);
        }
        map
    }

    /// True if the cell is merged into another cell and must not render.
    pub fn is_suppressed(&self, row: usize, col: usize) -> bool {
        self.covered.contains(&(row, col))
    }

    /// Span of the cell (`1×1` unless it is an origin).
    pub fn span_at(&self, row: usize, col: usize) -> SpanResult {
        self.origins.get(&(row, col)).copied().unwrap_or_default()
    }

    /// Origin cells and their spans.
    pub fn origins(&self) -> impl Iterator<Item = ((usize, usize), SpanResult)> + '_ {
        self.origins.iter().map(|(&pos, &span)| (pos, span))
    }

    /// Number of suppressed cells.
    pub fn suppressed_count(&self) -> usize {
        self.covered.len()
    }
}

/// Resolve spans through each column's span function.
pub fn resolve_spans(
    data: &[Rc<Record>],
    columns: &[Column],
    rows: &AxisWindow,
    cols: &AxisWindow,
) -> SpanMap {
    resolve_spans_hiding(data, columns, rows, cols, None)
}

/// Like [`resolve_spans`], but columns up to and including `hide_through`
/// are never origins, so a merge starting in a hidden column cannot cover
/// visible cells.
pub fn resolve_spans_hiding(
    data: &[Rc<Record>],
    columns: &[Column],
    rows: &AxisWindow,
    cols: &AxisWindow,
    hide_through: Option<usize>,
) -> SpanMap {
    if columns.iter().all(|c| c.span_fn.is_none()) {
        return SpanMap::default();
    }
    SpanMap::resolve(rows, cols, |row_index, col_index| {
        if hide_through.is_some_and(|p| col_index <= p) {
            return SpanResult::default();
        }
        let (Some(column), Some(row)) = (columns.get(col_index), data.get(row_index)) else {
            return SpanResult::default();
        };
        let Some(span_fn) = &column.span_fn else {
            return SpanResult::default();
        };
        span_fn(&SpanContext {
            row_index,
            col_index,
            row,
            data,
            columns,
            rows: rows.range(),
            cols: cols.range(),
        })
    })
}
