//! JSON scene: a complete grid setup in one document.
//!
//! ```json
//! {
//!   "config": { "pinnedLeftColumnIndex": 0 },
//!   "columns": [ { "field": "id", "width": 60 },
//!                { "title": "Person", "columns": [ { "field": "name", "width": "50%" } ] } ],
//!   "data": [ { "id": 1, "name": "Anna" } ],
//!   "viewport": { "width": 800, "height": 600, "scrollTop": 0 },
//!   "sort": [ { "field": "name", "direction": "ASC" } ],
//!   "filter": { "name": "an" },
//!   "rowOverrides": { "0": 48 },
//!   "columnOverrides": { "id": 80 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::GridConfig;
use crate::error::Result;
use crate::layout::{Axis, SizeOverrides, Viewport};
use crate::types::{ColumnNodeDef, ColumnSet, FilterSpec, Record, SortSpec};
use crate::Grid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scene {
    pub config: GridConfig,
    pub columns: Vec<ColumnNodeDef>,
    pub data: Vec<Record>,
    pub viewport: Viewport,
    pub sort: SortSpec,
    pub filter: FilterSpec,
    /// Row lengths by position in the derived row list
    pub row_overrides: SizeOverrides,
    /// Column lengths by field
    pub column_overrides: BTreeMap<String, f32>,
    /// Position of the focused row in the derived row list
    pub focused_row: Option<usize>,
}

impl Scene {
    pub fn from_json(json: &str) -> Result<Self> {
        let scene: Self = serde_json::from_str(json)?;
        scene.config.validate()?;
        Ok(scene)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build a grid holding this scene.
    pub fn into_grid(self) -> Result<Grid> {
        let columns = ColumnSet::from_defs(self.columns)?;
        let mut grid = Grid::new(self.config)?;
        let viewport = self.viewport;
        grid.batch(|g| {
            g.set_columns(columns);
            g.set_records(self.data);
            g.on_viewport_resize(viewport.width, viewport.height);
            g.set_sort(self.sort);
            g.set_filter(self.filter);
            for (index, length) in self.row_overrides.iter() {
                g.on_size_override_committed(Axis::Row, index, length);
            }
            for (field, length) in &self.column_overrides {
                match g.columns().index_of(field) {
                    Some(index) => g.on_size_override_committed(Axis::Column, index, *length),
                    None => log::warn!(target: "vsheet::scene", "override for unknown column {field:?} ignored"),
                }
            }
            g.on_scroll(viewport.scroll_left, viewport.scroll_top);
        });
        if let Some(index) = self.focused_row {
            let row = grid.rows().get(index).cloned();
            grid.set_focused(row);
        }
        Ok(grid)
    }
}
