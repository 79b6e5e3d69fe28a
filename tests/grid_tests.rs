//! Grid integration tests
//!
//! End-to-end flows through [`vsheet::Grid`]: batching, scroll sharing,
//! column trees, declared widths, focus and the serialized frame.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::Cell;
use std::rc::Rc;
use vsheet::demo::{demo_columns, generate_rows};
use vsheet::{Axis, Column, ColumnNode, Grid, GridConfig, Record, Scene, SortKey, SortSpec};

#[test]
fn test_many_changes_in_one_batch_cost_one_pass() {
    let mut grid = Grid::default();
    let before = grid.pass_count();
    grid.batch(|g| {
        g.set_column_list(common::uniform_columns(5)).unwrap();
        g.set_data(common::uniform_data(1000, 5));
        g.on_viewport_resize(400.0, 300.0);
        g.set_sort(SortSpec::new(vec![SortKey::desc("c0")]));
        g.on_filter_change("c1", "c1");
        g.on_size_override_committed(Axis::Row, 0, 60.0);
        g.on_scroll(50.0, 500.0);
    });
    assert_eq!(grid.pass_count(), before + 1);
    let frame = grid.frame();
    assert_eq!(frame.pass, before + 1);
    assert_eq!(frame.scroll_top, 500.0);
    assert_eq!(frame.row_count, 1000);
}

#[test]
fn test_nested_batches_flush_once() {
    let mut grid = common::uniform_grid(50, 3, 300.0, 300.0);
    let before = grid.pass_count();
    grid.batch(|g| {
        g.on_scroll(0.0, 30.0);
        g.batch(|inner| inner.on_scroll(0.0, 60.0));
        g.on_sort_toggle("c2");
    });
    assert_eq!(grid.pass_count(), before + 1);
    assert_eq!(grid.frame().rows.first, 2);
}

#[test]
fn test_unchanged_input_does_not_recompute() {
    let mut grid = common::uniform_grid(50, 3, 300.0, 300.0);
    let before = grid.pass_count();
    grid.on_viewport_resize(300.0, 300.0);
    grid.set_sort(SortSpec::default());
    let _ = grid.frame();
    assert_eq!(grid.pass_count(), before);
}

#[test]
fn test_host_scroll_write_reaches_every_part() {
    let mut grid = common::uniform_grid(1000, 20, 500.0, 600.0);
    let top = grid.scroll_top_handle();
    let left = grid.scroll_left_handle();
    top.set(3000.0);
    left.set(450.0);

    let frame = grid.frame();
    assert_eq!(frame.rows.first, 100);
    assert_eq!(frame.row_handles.first().unwrap().row_index, 100);
    assert_eq!(frame.header.scroll_left, 450.0);
    assert_eq!(frame.body.scrollable.cols.first, 4);
}

#[test]
fn test_scroll_past_content_is_clamped_and_written_back() {
    let mut grid = common::uniform_grid(100, 3, 200.0, 300.0);
    let seen = Rc::new(Cell::new(0.0_f32));
    let sink = Rc::clone(&seen);
    let handle = grid.scroll_top_handle();
    handle.subscribe(move |v| sink.set(*v));

    grid.on_scroll(0.0, 99_999.0);
    assert_eq!(grid.frame().scroll_top, 3000.0 - 300.0);
    assert_eq!(handle.get(), 2700.0);
    assert_eq!(seen.get(), 2700.0);
}

#[test]
fn test_shrinking_data_pulls_scroll_back() {
    let mut grid = common::uniform_grid(1000, 2, 200.0, 300.0);
    grid.on_scroll(0.0, 20_000.0);
    grid.set_data(common::uniform_data(20, 2));
    let frame = grid.frame();
    assert_eq!(frame.scroll_top, 300.0);
    assert_eq!(frame.rows.range(), 10..20);
}

#[test]
fn test_grouped_columns_build_header_rows() {
    let mut grid = Grid::default();
    grid.batch(|g| {
        g.set_column_nodes(vec![
            Column::new("id").into(),
            ColumnNode::group(
                "Person",
                vec![Column::new("first").into(), Column::new("last").into()],
            ),
        ])
        .unwrap();
        g.on_viewport_resize(800.0, 400.0);
    });
    let header = &grid.frame().header;
    assert_eq!(header.height, 2.0 * 50.0);
    let group = header.cells.iter().find(|h| h.title == "Person").unwrap();
    assert_eq!((group.row, group.col, group.col_span), (0, 1, 2));
    assert_eq!(group.width, 200.0);
    assert!(group.resize_handle.is_none());
    let id = header.cells.iter().find(|h| h.field.as_deref() == Some("id")).unwrap();
    assert_eq!(id.row_span, 2);
    assert_eq!(id.resize_handle, Some(100.0 - 4.0));
}

#[test]
fn test_duplicate_fields_are_rejected() {
    let mut grid = Grid::default();
    let err = grid.set_column_list(vec![Column::new("a"), Column::new("a")]);
    assert!(err.is_err());
    assert_eq!(grid.columns().len(), 0);
}

#[test]
fn test_percent_widths_follow_viewport() {
    let mut grid = Grid::default();
    grid.batch(|g| {
        g.set_column_list(vec![
            Column::new("fixed").width(200.0),
            Column::new("a").percent(25.0),
            Column::new("b").percent(75.0),
        ])
        .unwrap();
        g.on_viewport_resize(600.0, 300.0);
    });
    assert_eq!(grid.length(Axis::Column, 1), 100.0);
    assert_eq!(grid.length(Axis::Column, 2), 300.0);

    grid.on_viewport_resize(1000.0, 300.0);
    assert_eq!(grid.length(Axis::Column, 2), 600.0);

    // no room left: percentage columns read the default width
    grid.on_viewport_resize(150.0, 300.0);
    assert_eq!(grid.length(Axis::Column, 1), 100.0);
}

#[test]
fn test_user_override_beats_declared_width() {
    let mut grid = Grid::default();
    grid.set_column_list(vec![Column::new("a").width(80.0), Column::new("b")]).unwrap();
    grid.on_size_override_committed(Axis::Column, 0, 150.0);
    assert_eq!(grid.length(Axis::Column, 0), 150.0);
    grid.clear_size_overrides(Axis::Column);
    assert_eq!(grid.length(Axis::Column, 0), 80.0);
}

#[test]
fn test_column_override_survives_reorder() {
    let mut grid = common::uniform_grid(5, 3, 800.0, 300.0);
    grid.on_size_override_committed(Axis::Column, 2, 40.0);
    let mut reordered = common::uniform_columns(3);
    reordered.reverse();
    grid.set_column_list(reordered).unwrap();
    assert_eq!(grid.length(Axis::Column, 0), 40.0);
    assert_eq!(grid.length(Axis::Column, 2), 100.0);
}

#[test]
fn test_focus_highlights_row_wherever_it_moves() {
    let mut grid = Grid::default();
    grid.batch(|g| {
        g.set_column_list(common::people_columns()).unwrap();
        g.set_records(common::people());
        g.on_viewport_resize(800.0, 600.0);
    });
    grid.click_cell(1, 0);
    assert_eq!(grid.focused().unwrap().get("name").unwrap().to_string(), "Bob");

    grid.on_sort_toggle("age");
    let frame = grid.frame();
    let focused: Vec<_> = frame
        .body
        .scrollable
        .cells
        .iter()
        .filter(|c| c.focused)
        .map(|c| c.row_index)
        .collect();
    // Bob is the youngest, first after sorting
    assert_eq!(focused, [0, 0]);
}

#[test]
fn test_focus_by_key_survives_data_refresh() {
    let mut grid = Grid::default();
    grid.batch(|g| {
        g.set_column_list(common::people_columns()).unwrap();
        g.set_records(common::people());
        g.on_viewport_resize(800.0, 600.0);
    });
    grid.set_focus_comparator(|a, b| a.get("name") == b.get("name"));
    grid.click_cell(2, 0);

    // fresh records, same names
    grid.set_records(common::people());
    let frame = grid.frame();
    let focused = frame.body.scrollable.cells.iter().find(|c| c.focused).unwrap();
    assert_eq!(focused.row_index, 2);
}

#[test]
fn test_controlled_focus_reports_without_moving() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut grid = common::uniform_grid(5, 2, 300.0, 300.0);
    grid.set_on_focus_change(move |new, old| {
        assert!(new.is_some());
        assert!(old.is_none());
        counter.set(counter.get() + 1);
    });
    grid.click_cell(3, 1);
    assert_eq!(calls.get(), 1);
    assert!(grid.focused().is_none());
}

#[test]
fn test_frame_serializes_camel_case() {
    let mut grid = common::uniform_grid(3, 2, 300.0, 300.0);
    let json = serde_json::to_value(grid.frame()).unwrap();
    assert_eq!(json["rowCount"], 3);
    assert_eq!(json["body"]["scrollable"]["cells"][0]["rowIndex"], 0);
    assert!(json["body"]["pinned"].is_null());
    assert!(json["header"]["cells"].is_array());
}

#[test]
fn test_demo_dataset_windows_a_small_slice() {
    let mut grid = Grid::default();
    grid.batch(|g| {
        g.set_column_list(demo_columns(50)).unwrap();
        g.set_records(generate_rows(200, 50));
        g.on_viewport_resize(1280.0, 720.0);
    });
    let frame = grid.frame();
    assert_eq!(frame.row_count, 200);
    assert_eq!(frame.rows.len(), 25);
    assert_eq!(frame.body.scrollable.cols.len(), 13);
    assert_eq!(frame.cell_count(), 25 * 13);
    let first = &frame.body.scrollable.cells[0];
    assert_eq!(first.value, "r:000|c:000");
}

#[test]
fn test_scene_round_trip_from_json() {
    let json = r#"{
        "config": { "pinnedLeftColumnIndex": 0 },
        "columns": [ { "field": "id", "width": 60 }, { "field": "name" } ],
        "data": [ { "id": 2, "name": "Bea" }, { "id": 1, "name": "Al" } ],
        "viewport": { "width": 400, "height": 200 },
        "sort": [ { "field": "id", "direction": "ASC" } ],
        "columnOverrides": { "name": 150 },
        "focusedRow": 0
    }"#;
    let mut grid = Scene::from_json(json).unwrap().into_grid().unwrap();
    assert_eq!(grid.length(Axis::Column, 1), 150.0);
    let frame = grid.frame();
    assert_eq!(frame.body.pinned_width, 60.0);
    let pinned = frame.body.pinned.as_ref().unwrap();
    assert_eq!(pinned.cells[0].value, "1");
    assert!(pinned.cells[0].focused);
}

#[test]
fn test_config_change_reflows() {
    let mut grid = common::uniform_grid(100, 2, 300.0, 300.0);
    grid.set_config(GridConfig {
        default_row_height: 20.0,
        ..GridConfig::default()
    })
    .unwrap();
    assert_eq!(grid.content_height(), 2000.0);
    assert!(grid
        .set_config(GridConfig {
            default_row_height: -1.0,
            ..GridConfig::default()
        })
        .is_err());
}

#[test]
fn test_rows_share_source_records() {
    let records: Vec<Rc<Record>> = common::uniform_data(3, 1);
    let mut grid = Grid::default();
    grid.set_column_list(common::uniform_columns(1)).unwrap();
    grid.set_data(records.clone());
    assert!(Rc::ptr_eq(&grid.rows()[0], &records[0]));
}
