//! Column header strip and row handle strip.
//!
//! Header cells follow the scrollable column window and horizontal scroll;
//! cells of pinned columns are emitted separately and never scroll. Row
//! handles follow the shared row window and are the hit targets for row
//! resize gestures.

use serde::Serialize;

use crate::layout::{AxisWindow, SizeModel};
use crate::types::{FilterSpec, HeaderCell, SortDirection, SortSpec};

/// A header matrix cell with its geometry and column state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedHeader {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Offset of the column resize handle (leaf cells only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_handle: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFrame {
    pub cells: Vec<PositionedHeader>,
    pub pinned: Vec<PositionedHeader>,
    /// Height of the whole header strip
    pub height: f32,
    pub scroll_left: f32,
}

pub struct HeaderInput<'a> {
    pub header: &'a [HeaderCell],
    pub header_rows: usize,
    pub row_height: f32,
    pub col_sizes: &'a SizeModel,
    /// Window of the scrollable body
    pub cols: &'a AxisWindow,
    pub scroll_left: f32,
    pub pinned_index: Option<usize>,
    pub pinned_width: f32,
    pub sort: &'a SortSpec,
    pub filter: &'a FilterSpec,
    pub half_handle: f32,
}

/// Position the header matrix.
#[allow(clippy::cast_precision_loss)]
pub fn header_frame(input: &HeaderInput<'_>) -> HeaderFrame {
    let mut frame = HeaderFrame {
        height: input.header_rows as f32 * input.row_height,
        scroll_left: input.scroll_left,
        ..HeaderFrame::default()
    };

    for cell in input.header {
        let end = cell.col + cell.col_span;
        let pinned = input.pinned_index.is_some_and(|p| cell.col <= p);
        if !pinned && !overlaps(input.cols, cell.col, end) {
            continue;
        }
        let left = input.col_sizes.offset_of(cell.col);
        let mut width = input.col_sizes.range_length(cell.col, end);
        if pinned {
            // groups reaching into the scrollable part are cut at the pin
            width = width.min(input.pinned_width - left);
        }
        let positioned = PositionedHeader {
            title: cell.title.clone(),
            field: cell.field.clone(),
            row: cell.row,
            col: cell.col,
            row_span: cell.row_span,
            col_span: cell.col_span,
            top: cell.row as f32 * input.row_height,
            left,
            width,
            height: cell.row_span as f32 * input.row_height,
            sort: cell.field.as_deref().and_then(|f| input.sort.direction_of(f)),
            filter: cell
                .field
                .as_deref()
                .and_then(|f| input.filter.get(f))
                .map(str::to_string),
            resize_handle: cell.field.as_ref().map(|_| width - input.half_handle),
        };
        if pinned {
            frame.pinned.push(positioned);
        } else {
            frame.cells.push(positioned);
        }
    }
    frame
}

fn overlaps(window: &AxisWindow, start: usize, end: usize) -> bool {
    !window.is_empty() && start < window.end() && end > window.first
}

/// One row handle of the left strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowHandle {
    pub row_index: usize,
    pub top: f32,
    pub height: f32,
    /// Offset of the row resize handle from the top of the row
    pub resize_handle: f32,
}

/// Row handles for every row in the window.
pub fn row_handles(rows: &AxisWindow, half_handle: f32) -> Vec<RowHandle> {
    rows.positions()
        .map(|(row_index, top, height)| RowHandle {
            row_index,
            top,
            height,
            resize_handle: height - half_handle,
        })
        .collect()
}
