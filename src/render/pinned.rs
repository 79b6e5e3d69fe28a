//! Pinned (frozen) leading columns.
//!
//! With a pin index `p`, columns `0..=p` are drawn by a pinned sub-grid that
//! never scrolls horizontally, layered above a scrollable sub-grid that
//! windows the full column set but skips the pinned columns. Both sub-grids
//! share the same row window, so vertical scroll stays in sync.
//!
//! Spans are resolved per sub-grid. A pinned cell whose column span reaches
//! past the pin is clipped at the pin and never hides scrollable cells.

use serde::Serialize;
use std::rc::Rc;

use super::{render_cells, CellInput, PositionedCell};
use crate::config::CellTheme;
use crate::layout::{compute_window, resolve_spans, resolve_spans_hiding, AxisWindow, SizeModel, Viewport};
use crate::types::{Column, Record};

/// Stacking order of the pinned sub-grid over the scrollable one.
pub const PINNED_Z_INDEX: i32 = 1;

/// Inputs shared by both sub-grids.
pub struct PinnedInput<'a> {
    pub data: &'a [Rc<Record>],
    pub columns: &'a [Column],
    /// Row window shared by both sub-grids
    pub rows: &'a AxisWindow,
    pub col_sizes: &'a SizeModel,
    pub viewport: &'a Viewport,
    pub pinned_index: Option<usize>,
    pub theme: &'a CellTheme,
    pub is_focused: &'a dyn Fn(&Rc<Record>) -> bool,
}

/// Cells and horizontal geometry of one sub-grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubGrid {
    pub cols: AxisWindow,
    pub cells: Vec<PositionedCell>,
    /// Full content width of the sub-grid
    pub width: f32,
    pub scroll_left: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedFrame {
    /// Index of the last pinned column after clamping
    pub pinned_index: Option<usize>,
    pub pinned: Option<SubGrid>,
    pub scrollable: SubGrid,
    /// Width of the pinned overlay (0 without pinning)
    pub pinned_width: f32,
    pub pinned_z_index: i32,
}

/// Clamp a pin index to the last column. No columns, no pin.
pub fn clamp_pin(pinned_index: Option<usize>, column_count: usize) -> Option<usize> {
    let last = column_count.checked_sub(1)?;
    pinned_index.map(|p| p.min(last))
}

/// Build both sub-grids.
pub fn composite(input: &PinnedInput<'_>) -> PinnedFrame {
    let count = input.columns.len();
    let pin = clamp_pin(input.pinned_index, count);

    let scroll_left = input.viewport.scroll_left;
    let cols = compute_window(count, input.col_sizes, scroll_left, input.viewport.width);
    let spans = resolve_spans_hiding(input.data, input.columns, input.rows, &cols, pin);
    let cells = render_cells(
        &CellInput {
            data: input.data,
            columns: input.columns,
            rows: input.rows,
            cols: &cols,
            spans: &spans,
            theme: input.theme,
            is_focused: input.is_focused,
        },
        pin,
    );
    let scrollable = SubGrid {
        cols,
        cells,
        width: input.col_sizes.total_length(count),
        scroll_left,
    };

    let Some(p) = pin else {
        return PinnedFrame {
            scrollable,
            pinned_z_index: PINNED_Z_INDEX,
            ..PinnedFrame::default()
        };
    };

    let pinned_columns = input.columns.get(..=p).unwrap_or(input.columns);
    let pinned_count = pinned_columns.len();
    let pinned_width = input.col_sizes.range_length(0, pinned_count);
    let pinned_cols = compute_window(pinned_count, input.col_sizes, 0.0, pinned_width);
    let pinned_spans = resolve_spans(input.data, pinned_columns, input.rows, &pinned_cols);
    let pinned_cells = render_cells(
        &CellInput {
            data: input.data,
            columns: pinned_columns,
            rows: input.rows,
            cols: &pinned_cols,
            spans: &pinned_spans,
            theme: input.theme,
            is_focused: input.is_focused,
        },
        None,
    );
    log::trace!(
        target: "vsheet::pinned",
        "pinned 0..={p} width {pinned_width}, scrollable cols {:?}",
        scrollable.cols.range()
    );

    PinnedFrame {
        pinned_index: Some(p),
        pinned: Some(SubGrid {
            cols: pinned_cols,
            cells: pinned_cells,
            width: pinned_width,
            scroll_left: 0.0,
        }),
        scrollable,
        pinned_width,
        pinned_z_index: PINNED_Z_INDEX,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::SpanResult;

    fn setup() -> (Vec<Rc<Record>>, Vec<Column>) {
        let columns: Vec<Column> = (0..6).map(|c| Column::new(&format!("c{c}"))).collect();
        let data = (0..20)
            .map(|r| {
                columns
                    .iter()
                    .fold(Record::new(), |rec, col| rec.with(&col.field, format!("{r}:{}", col.field)))
            })
            .map(Rc::new)
            .collect();
        (data, columns)
    }

    fn run(pin: Option<usize>, scroll_left: f32, col_sizes: &SizeModel) -> PinnedFrame {
        let (data, columns) = setup();
        let mut viewport = Viewport::new(250.0, 90.0);
        viewport.scroll_left = scroll_left;
        let rows = compute_window(data.len(), &SizeModel::new(30.0), 0.0, viewport.height);
        let theme = CellTheme::default();
        composite(&PinnedInput {
            data: &data,
            columns: &columns,
            rows: &rows,
            col_sizes,
            viewport: &viewport,
            pinned_index: pin,
            theme: &theme,
            is_focused: &|_: &Rc<Record>| false,
        })
    }

    #[test]
    fn test_pinned_width_ignores_horizontal_scroll() {
        let mut sizes = SizeModel::new(100.0);
        sizes.set_override(0, 120.0);
        for scroll in [0.0, 75.0, 300.0] {
            let frame = run(Some(1), scroll, &sizes);
            assert_eq!(frame.pinned_width, 220.0);
            let pinned = frame.pinned.unwrap();
            assert_eq!(pinned.scroll_left, 0.0);
            assert_eq!(pinned.cols.range(), 0..2);
            assert_eq!(frame.scrollable.scroll_left, scroll);
        }
    }

    #[test]
    fn test_scrollable_skips_pinned_columns() {
        let frame = run(Some(1), 0.0, &SizeModel::new(100.0));
        assert!(frame.scrollable.cells.iter().all(|c| c.col_index > 1));
        let pinned = frame.pinned.unwrap();
        assert!(pinned.cells.iter().all(|c| c.col_index <= 1));
        // rows 0..=3 are in the shared window
        assert_eq!(pinned.cells.len(), 4 * 2);
        assert_eq!(pinned.cells[0].value, "0:c0");
    }

    #[test]
    fn test_pin_clamped_to_last_column() {
        assert_eq!(clamp_pin(Some(10), 6), Some(5));
        assert_eq!(clamp_pin(Some(0), 0), None);
        assert_eq!(clamp_pin(None, 6), None);
        let frame = run(Some(10), 0.0, &SizeModel::new(100.0));
        assert_eq!(frame.pinned_width, 600.0);
        assert!(frame.scrollable.cells.is_empty());
    }

    #[test]
    fn test_pinned_col_span_stops_at_pin() {
        let (data, mut columns) = setup();
        columns[0] = Column::new("c0").span_fn(|ctx| {
            if ctx.row_index == 1 {
                SpanResult::cols(3)
            } else {
                SpanResult::default()
            }
        });
        let viewport = Viewport::new(600.0, 90.0);
        let rows = compute_window(data.len(), &SizeModel::new(30.0), 0.0, viewport.height);
        let theme = CellTheme::default();
        let frame = composite(&PinnedInput {
            data: &data,
            columns: &columns,
            rows: &rows,
            col_sizes: &SizeModel::new(100.0),
            viewport: &viewport,
            pinned_index: Some(0),
            theme: &theme,
            is_focused: &|_: &Rc<Record>| false,
        });

        let pinned = frame.pinned.unwrap();
        let origin = pinned.cells.iter().find(|c| c.row_index == 1 && c.col_index == 0).unwrap();
        assert_eq!(origin.width, 100.0);
        for col in [1, 2] {
            assert!(frame.scrollable.cells.iter().any(|c| c.row_index == 1 && c.col_index == col));
        }
    }

    #[test]
    fn test_no_pin() {
        let frame = run(None, 0.0, &SizeModel::new(100.0));
        assert!(frame.pinned.is_none());
        assert_eq!(frame.pinned_width, 0.0);
        assert_eq!(frame.scrollable.width, 600.0);
    }
}
