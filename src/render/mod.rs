//! Positioned cell output.
//!
//! Rendering turns the windows of both axes, the resolved spans and the row
//! data into absolutely positioned cell descriptors. Positions are in
//! content coordinates: the host applies the scroll offset.

pub mod header;
pub mod pinned;

pub use header::{header_frame, row_handles, HeaderFrame, PositionedHeader, RowHandle};
pub use pinned::{composite, PinnedFrame, PinnedInput, SubGrid};

use serde::Serialize;
use std::rc::Rc;

use crate::config::CellTheme;
use crate::layout::{compute_window, resolve_spans, AxisWindow, SizeModel, SpanMap, Viewport};
use crate::types::{default_cell_style, CellStyle, Column, Record, StyleContext, ValueContext};

/// One cell ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedCell {
    pub row_index: usize,
    pub col_index: usize,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub row_span: usize,
    pub col_span: usize,
    pub value: String,
    pub style: CellStyle,
    pub focused: bool,
}

/// Everything needed to materialize the cells of one sub-grid.
pub struct CellInput<'a> {
    pub data: &'a [Rc<Record>],
    pub columns: &'a [Column],
    pub rows: &'a AxisWindow,
    pub cols: &'a AxisWindow,
    pub spans: &'a SpanMap,
    pub theme: &'a CellTheme,
    /// Whether a row is the focused row
    pub is_focused: &'a dyn Fn(&Rc<Record>) -> bool,
}

fn never_focused(_: &Rc<Record>) -> bool {
    false
}

/// Emit every window cell that is not merged into another cell.
///
/// Columns up to and including `hide_through` are skipped; they still take
/// part in span resolution and keep their horizontal position.
pub fn render_cells(input: &CellInput<'_>, hide_through: Option<usize>) -> Vec<PositionedCell> {
    let mut cells = Vec::with_capacity(input.rows.len() * input.cols.len());
    for (row_index, top, _) in input.rows.positions() {
        let Some(row) = input.data.get(row_index) else {
            continue;
        };
        let focused = (input.is_focused)(row);
        for (col_index, left, _) in input.cols.positions() {
            if hide_through.is_some_and(|p| col_index <= p) || input.spans.is_suppressed(row_index, col_index) {
                continue;
            }
            let Some(column) = input.columns.get(col_index) else {
                continue;
            };
            let span = input.spans.span_at(row_index, col_index);
            let value = column.value(&ValueContext {
                row,
                column,
                row_index,
                col_index,
                data: input.data,
            });
            let style_ctx = StyleContext {
                row_index,
                col_index,
                row,
                column,
                value: &value,
                focused,
                theme: input.theme,
            };
            let style = match &column.style_fn {
                Some(f) => f(&style_ctx),
                None => default_cell_style(&style_ctx),
            };
            cells.push(PositionedCell {
                row_index,
                col_index,
                top,
                left,
                width: input.cols.span_length(col_index, span.col_span),
                height: input.rows.span_length(row_index, span.row_span),
                row_span: span.row_span,
                col_span: span.col_span,
                value: value.to_string(),
                style,
                focused,
            });
        }
    }
    cells
}

/// Stateless render of the visible cells for a viewport.
pub fn render(
    data: &[Rc<Record>],
    columns: &[Column],
    viewport: &Viewport,
    row_sizes: &SizeModel,
    col_sizes: &SizeModel,
) -> Vec<PositionedCell> {
    let rows = compute_window(data.len(), row_sizes, viewport.scroll_top, viewport.height);
    let cols = compute_window(columns.len(), col_sizes, viewport.scroll_left, viewport.width);
    let spans = resolve_spans(data, columns, &rows, &cols);
    let theme = CellTheme::default();
    render_cells(
        &CellInput {
            data,
            columns,
            rows: &rows,
            cols: &cols,
            spans: &spans,
            theme: &theme,
            is_focused: &never_focused,
        },
        None,
    )
}
