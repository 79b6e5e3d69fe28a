//! Sample dataset for the CLI, benches and demos.

use crate::types::{Column, Record};

/// Field name of demo column `col`: `"000"`, `"001"`, ...
pub fn field_name(col: usize) -> String {
    format!("{col:03}")
}

/// `cols` fixed-width columns titled `00000000`, `00000001`, ...
pub fn demo_columns(cols: usize) -> Vec<Column> {
    (0..cols)
        .map(|c| Column::new(&field_name(c)).title(&format!("{c:08}")).width(100.0))
        .collect()
}

/// `rows` records with an `id` field and one text value per demo column,
/// e.g. `r:007|c:012`.
pub fn generate_rows(rows: usize, cols: usize) -> Vec<Record> {
    let fields: Vec<String> = (0..cols).map(field_name).collect();
    (0..rows)
        .map(|r| {
            let id = format!("{r:03}");
            let record = fields
                .iter()
                .fold(Record::new(), |rec, f| rec.with(f, format!("r:{id}|c:{f}")));
            record.with("id", id)
        })
        .collect()
}
