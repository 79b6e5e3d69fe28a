//! vsheet - virtualized sheet layout engine
//!
//! Lays out only the part of a large table that is visible in a scrollable
//! viewport:
//! - Row heights and column widths with defaults, percentages and overrides
//! - Two-phase windowing of both axes
//! - Merged cells through per-column span functions
//! - Multi-key sort and per-column substring filter
//! - Drag-to-resize of rows and columns
//! - Pinned leading columns sharing vertical scroll with the body
//!
//! # Usage
//!
//! ```
//! use vsheet::{Column, Grid, Record};
//!
//! let mut grid = Grid::default();
//! grid.batch(|g| {
//!     g.set_column_list(vec![Column::new("name"), Column::new("age").width(60.0)])?;
//!     g.set_records(vec![Record::new().with("name", "Anna").with("age", 30_i64)]);
//!     g.on_viewport_resize(800.0, 600.0);
//!     Ok::<_, vsheet::VsheetError>(())
//! })?;
//! assert_eq!(grid.frame().cell_count(), 2);
//! # Ok::<_, vsheet::VsheetError>(())
//! ```

pub mod config;
pub mod demo;
pub mod error;
pub mod filter;
pub mod layout;
pub mod reactive;
pub mod render;
pub mod resize;
pub mod scene;
pub mod sort;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::{CellTheme, GridConfig};
pub use error::{Result, VsheetError};
pub use layout::{Axis, AxisWindow, SizeModel, SizeOverrides, Viewport};
pub use render::{render, PositionedCell};
pub use resize::{ResizeCommit, ResizeController};
pub use scene::Scene;
pub use types::*;
pub use viewer::{Frame, Grid};

#[cfg(target_arch = "wasm32")]
pub use viewer::GridView;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
