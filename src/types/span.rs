use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::rc::Rc;

use super::{CellValue, Column, Record, SpanFn};

/// Merged extent requested by a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpanResult {
    pub row_span: usize,
    pub col_span: usize,
}

impl Default for SpanResult {
    fn default() -> Self {
        Self {
            row_span: 1,
            col_span: 1,
        }
    }
}

impl SpanResult {
    pub fn new(row_span: usize, col_span: usize) -> Self {
        Self { row_span, col_span }.normalized()
    }

    pub fn rows(row_span: usize) -> Self {
        Self::new(row_span, 1)
    }

    pub fn cols(col_span: usize) -> Self {
        Self::new(1, col_span)
    }

    /// Spans of 0 are read as 1.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            row_span: self.row_span.max(1),
            col_span: self.col_span.max(1),
        }
    }

    /// True when the cell covers more than itself.
    pub fn is_merge(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}

/// Context handed to a column's span function.
pub struct SpanContext<'a> {
    pub row_index: usize,
    pub col_index: usize,
    pub row: &'a Record,
    pub data: &'a [Rc<Record>],
    pub columns: &'a [Column],
    /// Row indices of the computed window
    pub rows: Range<usize>,
    /// Column indices of the computed window
    pub cols: Range<usize>,
}

impl SpanContext<'_> {
    /// Extracted value of any cell, through that column's value extractor.
    pub fn value_at(&self, row_index: usize, col_index: usize) -> CellValue {
        self.columns
            .get(col_index)
            .map(|column| column.value_at(self.data, row_index, col_index))
            .unwrap_or_default()
    }
}

/// Span function merging a cell with the following rows that hold an equal
/// value in the same column. The run stops at the end of the row window.
pub fn merge_equal_rows() -> SpanFn {
    Rc::new(|ctx: &SpanContext<'_>| {
        let value = ctx.value_at(ctx.row_index, ctx.col_index);
        if value.is_empty() {
            return SpanResult::default();
        }
        let mut span = 1;
        while ctx.row_index + span < ctx.rows.end
            && ctx.value_at(ctx.row_index + span, ctx.col_index) == value
        {
            span += 1;
        }
        SpanResult::rows(span)
    })
}
