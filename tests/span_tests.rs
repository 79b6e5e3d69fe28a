//! Span tests
//!
//! Merged cells resolved inside the window: origins carry the combined
//! size, covered cells are not emitted, and merges stop at the window edge.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::rc::Rc;
use vsheet::layout::{compute_window, resolve_spans, SizeModel};
use vsheet::{merge_equal_rows, Axis, Column, PositionedCell, Record, SpanContext, SpanResult};

fn cell(cells: &[PositionedCell], row: usize, col: usize) -> Option<&PositionedCell> {
    cells.iter().find(|c| c.row_index == row && c.col_index == col)
}

fn span_at_two_one() -> vsheet::SpanFn {
    Rc::new(|ctx: &SpanContext<'_>| {
        if ctx.row_index == 2 {
            SpanResult::rows(3)
        } else {
            SpanResult::default()
        }
    })
}

#[test]
fn test_row_span_sums_heights_and_hides_covered_cells() {
    let mut grid = common::uniform_grid(20, 3, 1000.0, 600.0);
    grid.on_size_override_committed(Axis::Row, 3, 50.0);
    assert!(grid.set_span_fn("c1", Some(span_at_two_one())));

    let frame = grid.frame();
    let cells = &frame.body.scrollable.cells;
    let origin = cell(cells, 2, 1).unwrap();
    assert_eq!(origin.row_span, 3);
    assert_eq!(origin.height, 30.0 + 50.0 + 30.0);
    assert_eq!(origin.top, 60.0);
    assert!(cell(cells, 3, 1).is_none());
    assert!(cell(cells, 4, 1).is_none());
    // neighbours are unaffected
    assert!(cell(cells, 3, 0).is_some());
    assert!(cell(cells, 5, 1).is_some());
}

#[test]
fn test_col_span_widens_origin() {
    let data = common::uniform_data(5, 4);
    let columns = vec![
        Column::new("c0").span_fn(|ctx| {
            if ctx.row_index == 0 {
                SpanResult::cols(3)
            } else {
                SpanResult::default()
            }
        }),
        Column::new("c1"),
        Column::new("c2").width(40.0),
        Column::new("c3"),
    ];
    let rows = compute_window(data.len(), &SizeModel::new(30.0), 0.0, 500.0);
    let col_sizes = SizeModel::new(100.0).with_base([(2, 40.0)].into_iter().collect());
    let cols = compute_window(columns.len(), &col_sizes, 0.0, 1000.0);

    let spans = resolve_spans(&data, &columns, &rows, &cols);
    assert_eq!(spans.span_at(0, 0), SpanResult::cols(3));
    assert!(spans.is_suppressed(0, 1));
    assert!(spans.is_suppressed(0, 2));
    assert!(!spans.is_suppressed(0, 3));
    assert!(!spans.is_suppressed(1, 1));
    assert_eq!(cols.span_length(0, 3), 240.0);
}

#[test]
fn test_span_is_truncated_at_window_end() {
    let mut grid = common::uniform_grid(100, 2, 500.0, 90.0);
    grid.set_span_fn(
        "c0",
        Some(Rc::new(|ctx: &SpanContext<'_>| {
            if ctx.row_index == 2 {
                SpanResult::rows(10)
            } else {
                SpanResult::default()
            }
        })),
    );
    let frame = grid.frame();
    // window holds rows 0..4 (the fourth crosses the 90px viewport end)
    assert_eq!(frame.rows.range(), 0..4);
    let origin = cell(&frame.body.scrollable.cells, 2, 0).unwrap();
    assert_eq!(origin.height, 60.0);
}

#[test]
fn test_unbounded_span_is_clipped_to_window() {
    let data = common::uniform_data(100, 2);
    let columns = vec![
        Column::new("c0").span_fn(|ctx| {
            if ctx.row_index == 2 {
                SpanResult::rows(usize::MAX)
            } else {
                SpanResult::default()
            }
        }),
        Column::new("c1").span_fn(|ctx| {
            if ctx.row_index == 0 {
                SpanResult::cols(usize::MAX)
            } else {
                SpanResult::default()
            }
        }),
    ];
    let viewport = vsheet::Viewport::new(500.0, 90.0);
    let cells = vsheet::render(&data, &columns, &viewport, &SizeModel::new(30.0), &SizeModel::new(100.0));

    let origin = cell(&cells, 2, 0).unwrap();
    assert_eq!(origin.row_span, usize::MAX);
    assert_eq!(origin.height, 60.0);
    assert!(cell(&cells, 3, 0).is_none());
    let wide = cell(&cells, 0, 1).unwrap();
    assert_eq!(wide.width, 100.0);
}

#[test]
fn test_origin_outside_window_is_not_discovered() {
    let mut grid = common::uniform_grid(100, 2, 500.0, 90.0);
    grid.set_span_fn(
        "c0",
        Some(Rc::new(|ctx: &SpanContext<'_>| {
            if ctx.row_index == 0 {
                SpanResult::rows(5)
            } else {
                SpanResult::default()
            }
        })),
    );
    grid.on_scroll(0.0, 60.0);
    let frame = grid.frame();
    assert_eq!(frame.rows.first, 2);
    // row 2 would be covered by the merge at row 0, which is scrolled away
    assert!(cell(&frame.body.scrollable.cells, 2, 0).is_some());
}

#[test]
fn test_zero_span_is_treated_as_one() {
    let mut grid = common::uniform_grid(5, 2, 500.0, 500.0);
    grid.set_span_fn("c0", Some(Rc::new(|_: &SpanContext<'_>| SpanResult::new(0, 0))));
    let frame = grid.frame();
    assert_eq!(frame.cell_count(), 10);
    assert!(frame
        .body
        .scrollable
        .cells
        .iter()
        .all(|c| c.row_span == 1 && c.col_span == 1));
}

#[test]
fn test_merge_equal_rows_runs() {
    let records = ["a", "a", "a", "b", "b", "c"]
        .iter()
        .map(|v| Rc::new(Record::new().with("k", *v)))
        .collect::<Vec<_>>();
    let mut column = Column::new("k");
    column.span_fn = Some(merge_equal_rows());
    let columns = vec![column];
    let rows = compute_window(records.len(), &SizeModel::new(30.0), 0.0, 1000.0);
    let cols = compute_window(1, &SizeModel::new(100.0), 0.0, 1000.0);

    let spans = resolve_spans(&records, &columns, &rows, &cols);
    assert_eq!(spans.span_at(0, 0), SpanResult::rows(3));
    assert_eq!(spans.span_at(3, 0), SpanResult::rows(2));
    assert_eq!(spans.span_at(5, 0), SpanResult::default());
    assert_eq!(spans.suppressed_count(), 3);
}

#[test]
fn test_merge_equal_rows_from_json_scene() {
    let json = r#"{
        "columns": [{"field": "team", "mergeEqualRows": true}, {"field": "name"}],
        "data": [
            {"team": "red", "name": "a"},
            {"team": "red", "name": "b"},
            {"team": "blue", "name": "c"}
        ],
        "viewport": {"width": 800, "height": 600}
    }"#;
    let mut grid = vsheet::Scene::from_json(json).unwrap().into_grid().unwrap();
    let frame = grid.frame();
    let cells = &frame.body.scrollable.cells;
    assert_eq!(cell(cells, 0, 0).unwrap().row_span, 2);
    assert!(cell(cells, 1, 0).is_none());
    assert_eq!(cell(cells, 2, 0).unwrap().value, "blue");
    assert_eq!(frame.cell_count(), 5);
}
