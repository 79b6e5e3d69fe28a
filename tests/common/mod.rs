//! Shared fixtures for integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::rc::Rc;
use vsheet::{Column, Grid, Record};

/// `rows` records with fields `c0..c{cols}` holding `"r{row}c{col}"`.
pub fn uniform_data(rows: usize, cols: usize) -> Vec<Rc<Record>> {
    (0..rows)
        .map(|r| {
            Rc::new(
                (0..cols)
                    .map(|c| (format!("c{c}"), format!("r{r}c{c}").into()))
                    .collect(),
            )
        })
        .collect()
}

pub fn uniform_columns(cols: usize) -> Vec<Column> {
    (0..cols).map(|c| Column::new(&format!("c{c}"))).collect()
}

/// Grid with default sizes (rows 30, columns 100) over uniform data.
pub fn uniform_grid(rows: usize, cols: usize, width: f32, height: f32) -> Grid {
    let mut grid = Grid::default();
    grid.batch(|g| {
        g.set_column_list(uniform_columns(cols)).unwrap();
        g.set_data(uniform_data(rows, cols));
        g.on_viewport_resize(width, height);
    });
    grid
}

pub fn people() -> Vec<Record> {
    vec![
        Record::new().with("name", "Anna").with("age", 30_i64),
        Record::new().with("name", "Bob").with("age", 10_i64),
        Record::new().with("name", "Annette").with("age", 20_i64),
    ]
}

pub fn people_columns() -> Vec<Column> {
    vec![Column::new("name"), Column::new("age")]
}

pub fn field_values(rows: &[Rc<Record>], field: &str) -> Vec<String> {
    rows.iter()
        .map(|r| r.get(field).map(ToString::to_string).unwrap_or_default())
        .collect()
}
