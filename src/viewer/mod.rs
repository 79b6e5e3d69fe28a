//! Grid state owner.
//!
//! [`Grid`] owns every input of the layout pass (data, columns, viewport,
//! scroll, size overrides, sort, filter, focus) and the resize gesture.
//! Entry points mutate one input, mark it dirty and flush; inside
//! [`Grid::batch`] flushing is deferred until the batch closes, so a batch
//! costs exactly one pass.

mod events;
mod scroll;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::GridView;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::config::GridConfig;
use crate::error::Result;
use crate::filter::filter_rows;
use crate::layout::{compute_window, resolve_column_widths, Axis, AxisWindow, SizeModel, SizeOverrides, Viewport};
use crate::reactive::{Dirty, Observable, RecomputeBus, SubscriptionId};
use crate::render::header::HeaderInput;
use crate::render::{composite, header_frame, row_handles, HeaderFrame, PinnedFrame, PinnedInput, RowHandle};
use crate::resize::ResizeController;
use crate::sort::sort_rows;
use crate::types::{Column, ColumnNode, ColumnSet, FilterSpec, Record, SortSpec, SpanFn};

/// Decides whether two rows are the same item for focus highlighting.
pub type FocusComparator = Rc<dyn Fn(&Rc<Record>, &Rc<Record>) -> bool>;
/// Receives `(new, old)` focus in controlled mode.
pub type FocusHandler = Box<dyn FnMut(Option<Rc<Record>>, Option<Rc<Record>>)>;
/// Receives the committed filter when filtering is delegated.
pub type FilterHandler = Box<dyn FnMut(&FilterSpec)>;

/// Output of one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub body: PinnedFrame,
    pub header: HeaderFrame,
    pub row_handles: Vec<RowHandle>,
    /// Row window shared by the body, the pinned columns and the row handles
    pub rows: AxisWindow,
    pub content_width: f32,
    pub content_height: f32,
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub row_count: usize,
    pub column_count: usize,
    /// Sequence number of the pass that produced this frame
    pub pass: u64,
}

impl Frame {
    /// Total number of body cells, pinned included.
    pub fn cell_count(&self) -> usize {
        self.body.scrollable.cells.len() + self.body.pinned.as_ref().map_or(0, |p| p.cells.len())
    }
}

/// Virtualized grid.
pub struct Grid {
    config: GridConfig,
    source: Vec<Rc<Record>>,
    rows: Vec<Rc<Record>>,
    columns: ColumnSet,
    viewport: Viewport,
    scroll_left: Observable<f32>,
    scroll_top: Observable<f32>,
    scroll_subscriptions: [SubscriptionId; 2],
    row_sizes: SizeModel,
    col_sizes: SizeModel,
    /// Column overrides by field, projected onto `col_sizes` on column changes
    col_overrides: BTreeMap<String, f32>,
    sort: SortSpec,
    filter: FilterSpec,
    pending_filter: FilterSpec,
    focused: Option<Rc<Record>>,
    focus_comparator: FocusComparator,
    on_focus_change: Option<FocusHandler>,
    on_filter_commit: Option<FilterHandler>,
    resize: ResizeController,
    bus: RecomputeBus,
    frame: Frame,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows.len())
            .field("source", &self.source.len())
            .field("columns", &self.columns.len())
            .field("viewport", &self.viewport)
            .field("sort", &self.sort)
            .field("filter", &self.filter)
            .field("resize", self.resize.state())
            .field("pass", &self.bus.passes())
            .finish_non_exhaustive()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::with_config(GridConfig::default())
    }
}

impl Grid {
    /// Create an empty grid after validating `config`.
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: GridConfig) -> Self {
        let bus = RecomputeBus::new();
        let scroll_left = Observable::new(0.0_f32);
        let scroll_top = Observable::new(0.0_f32);
        let marker = bus.marker();
        let left_sub = scroll_left.subscribe(move |_| marker.mark(Dirty::SCROLL));
        let marker = bus.marker();
        let top_sub = scroll_top.subscribe(move |_| marker.mark(Dirty::SCROLL));
        bus.mark(Dirty::all());

        let mut grid = Self {
            row_sizes: SizeModel::new(config.default_row_height),
            col_sizes: SizeModel::new(config.default_col_width),
            resize: ResizeController::from_config(&config),
            config,
            source: Vec::new(),
            rows: Vec::new(),
            columns: ColumnSet::default(),
            viewport: Viewport::default(),
            scroll_left,
            scroll_top,
            scroll_subscriptions: [left_sub, top_sub],
            col_overrides: BTreeMap::new(),
            sort: SortSpec::default(),
            filter: FilterSpec::default(),
            pending_filter: FilterSpec::default(),
            focused: None,
            focus_comparator: Rc::new(Rc::ptr_eq),
            on_focus_change: None,
            on_filter_commit: None,
            bus,
            frame: Frame::default(),
        };
        grid.flush();
        grid
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replace the configuration. Size defaults and the pin index take
    /// effect on the next pass; existing overrides are kept.
    pub fn set_config(&mut self, config: GridConfig) -> Result<()> {
        config.validate()?;
        self.row_sizes.set_default_length(config.default_row_height);
        self.col_sizes.set_default_length(config.default_col_width);
        self.resize = ResizeController::from_config(&config);
        self.config = config;
        self.bus.mark(Dirty::CONFIG | Dirty::SIZES);
        self.flush();
        Ok(())
    }

    /// Replace the source rows. Row size overrides stay keyed by position.
    pub fn set_data(&mut self, data: Vec<Rc<Record>>) {
        self.cancel_resize();
        self.source = data;
        self.bus.mark(Dirty::DATA);
        self.flush();
    }

    /// [`Grid::set_data`] for owned records.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.set_data(records.into_iter().map(Rc::new).collect());
    }

    pub fn set_columns(&mut self, columns: ColumnSet) {
        self.cancel_resize();
        self.columns = columns;
        self.bus.mark(Dirty::COLUMNS);
        self.flush();
    }

    /// Replace the columns with a (possibly grouped) column tree.
    pub fn set_column_nodes(&mut self, nodes: Vec<ColumnNode>) -> Result<()> {
        self.set_columns(ColumnSet::from_nodes(nodes)?);
        Ok(())
    }

    /// Replace the columns with a flat list of leaf columns.
    pub fn set_column_list(&mut self, columns: Vec<Column>) -> Result<()> {
        self.set_columns(ColumnSet::new(columns)?);
        Ok(())
    }

    /// Install (or clear) the span function of column `field`. Returns false
    /// when there is no such column.
    pub fn set_span_fn(&mut self, field: &str, span_fn: Option<SpanFn>) -> bool {
        let Some(column) = self.columns.column_mut(field) else {
            return false;
        };
        column.span_fn = span_fn;
        self.bus.mark(Dirty::COLUMNS);
        self.flush();
        true
    }

    /// Store a committed length for a row or column.
    pub fn on_size_override_committed(&mut self, axis: Axis, index: usize, length: f32) {
        let length = if length.is_finite() {
            length.max(self.config.min_length)
        } else {
            self.config.min_length
        };
        match axis {
            Axis::Row => self.row_sizes.set_override(index, length),
            Axis::Column => {
                let Some(column) = self.columns.get(index) else {
                    log::warn!(target: "vsheet::grid", "column override for missing column {index} ignored");
                    return;
                };
                self.col_overrides.insert(column.field.clone(), length);
                self.col_sizes.set_override(index, length);
            }
        }
        log::debug!(target: "vsheet::grid", "{axis:?} {index} length set to {length}");
        self.bus.mark(Dirty::SIZES);
        self.flush();
    }

    /// Drop every size override on `axis`.
    pub fn clear_size_overrides(&mut self, axis: Axis) {
        match axis {
            Axis::Row => self.row_sizes.set_overrides(SizeOverrides::new()),
            Axis::Column => {
                self.col_overrides.clear();
                self.col_sizes.set_overrides(SizeOverrides::new());
            }
        }
        self.bus.mark(Dirty::SIZES);
        self.flush();
    }

    /// Effective length of a row or column.
    pub fn length(&self, axis: Axis, index: usize) -> f32 {
        match axis {
            Axis::Row => self.row_sizes.length(index),
            Axis::Column => self.col_sizes.length(index),
        }
    }

    /// Run `f` as one batch: all changes made inside cost a single pass.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.bus.begin_batch();
        let result = f(self);
        if self.bus.end_batch() {
            self.flush();
        }
        result
    }

    /// The current frame, bringing it up to date first (scroll observables
    /// may have been written by the host).
    pub fn frame(&mut self) -> &Frame {
        self.flush();
        &self.frame
    }

    /// Number of layout passes run so far.
    pub fn pass_count(&self) -> u64 {
        self.bus.passes()
    }

    /// Rows after filtering and sorting.
    pub fn rows(&self) -> &[Rc<Record>] {
        &self.rows
    }

    pub fn source(&self) -> &[Rc<Record>] {
        &self.source
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            scroll_left: self.scroll_left.get(),
            scroll_top: self.scroll_top.get(),
            ..self.viewport
        }
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// The filter currently applied to the rows.
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// The filter being edited (equals [`Grid::filter`] unless edits are
    /// held until commit or delegated).
    pub fn pending_filter(&self) -> &FilterSpec {
        &self.pending_filter
    }

    pub fn content_width(&self) -> f32 {
        self.col_sizes.total_length(self.columns.len())
    }

    pub fn content_height(&self) -> f32 {
        self.row_sizes.total_length(self.rows.len())
    }

    fn flush(&mut self) {
        if let Some(dirty) = self.bus.take() {
            self.recompute(dirty);
        }
    }

    fn recompute(&mut self, dirty: Dirty) {
        if dirty.intersects(Dirty::ROWS | Dirty::COLUMNS) {
            let leaves = self.columns.leaves();
            let filtered = filter_rows(&self.source, &self.filter, leaves);
            self.rows = sort_rows(&filtered, &self.sort, leaves);
        }
        if dirty.intersects(Dirty::COLUMNS | Dirty::VIEWPORT | Dirty::CONFIG) {
            let widths: Vec<_> = self.columns.leaves().iter().map(|c| c.width).collect();
            self.col_sizes
                .set_base(resolve_column_widths(&widths, self.viewport.width));
        }
        if dirty.contains(Dirty::COLUMNS) {
            self.project_column_overrides();
        }

        let (content_width, content_height) = (self.content_width(), self.content_height());
        let mut viewport = self.viewport();
        viewport.clamp_scroll(content_width, content_height);
        // clamping writes back through the observables; that write belongs to this pass
        self.scroll_left.set(viewport.scroll_left);
        self.scroll_top.set(viewport.scroll_top);
        self.bus.settle(Dirty::SCROLL);

        let rows = compute_window(self.rows.len(), &self.row_sizes, viewport.scroll_top, viewport.height);
        let focused = self.focused.clone();
        let comparator = Rc::clone(&self.focus_comparator);
        let is_focused = move |row: &Rc<Record>| focused.as_ref().is_some_and(|f| comparator(f, row));
        let body = composite(&PinnedInput {
            data: &self.rows,
            columns: self.columns.leaves(),
            rows: &rows,
            col_sizes: &self.col_sizes,
            viewport: &viewport,
            pinned_index: self.config.pinned_left_column_index,
            theme: &self.config.theme,
            is_focused: &is_focused,
        });
        let header = header_frame(&HeaderInput {
            header: self.columns.header(),
            header_rows: self.columns.header_rows(),
            row_height: self.config.header_row_height,
            col_sizes: &self.col_sizes,
            cols: &body.scrollable.cols,
            scroll_left: viewport.scroll_left,
            pinned_index: body.pinned_index,
            pinned_width: body.pinned_width,
            sort: &self.sort,
            filter: &self.pending_filter,
            half_handle: self.config.half_handle(),
        });

        self.frame = Frame {
            row_handles: row_handles(&rows, self.config.half_handle()),
            body,
            header,
            rows,
            content_width,
            content_height,
            scroll_left: viewport.scroll_left,
            scroll_top: viewport.scroll_top,
            row_count: self.rows.len(),
            column_count: self.columns.len(),
            pass: self.bus.passes(),
        };
        log::debug!(
            target: "vsheet::grid",
            "pass {} {:?}: rows {:?} cols {:?} cells {}",
            self.frame.pass,
            dirty,
            self.frame.rows.range(),
            self.frame.body.scrollable.cols.range(),
            self.frame.cell_count()
        );
    }

    /// Rebuild index-keyed column overrides from the field-keyed map.
    fn project_column_overrides(&mut self) {
        let mut overrides = SizeOverrides::new();
        for (field, &length) in &self.col_overrides {
            if let Some(index) = self.columns.index_of(field) {
                overrides.set(index, length);
            }
        }
        self.col_sizes.set_overrides(overrides);
    }
}

impl Drop for Grid {
    fn drop(&mut self) {
        self.resize.cancel();
        let [left, top] = self.scroll_subscriptions;
        self.scroll_left.unsubscribe(left);
        self.scroll_top.unsubscribe(top);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        let mut g = Grid::default();
        g.batch(|g| {
            g.set_column_list(vec![Column::new("name"), Column::new("age").width(60.0)])
                .unwrap();
            g.set_records(
                (0..50)
                    .map(|i| Record::new().with("name", format!("n{i}")).with("age", i64::from(i)))
                    .collect(),
            );
            g.on_viewport_resize(300.0, 200.0);
        });
        g
    }

    #[test]
    fn test_batch_runs_one_pass() {
        let mut g = Grid::default();
        let before = g.pass_count();
        g.batch(|g| {
            g.set_column_list(vec![Column::new("a")]).unwrap();
            g.set_records(vec![Record::new().with("a", 1_i64)]);
            g.on_size_override_committed(Axis::Row, 0, 44.0);
            g.on_viewport_resize(100.0, 100.0);
        });
        assert_eq!(g.pass_count(), before + 1);
        assert_eq!(g.frame().body.scrollable.cells[0].height, 44.0);
    }

    #[test]
    fn test_column_override_follows_field() {
        let mut g = grid();
        g.on_size_override_committed(Axis::Column, 1, 150.0);
        assert_eq!(g.length(Axis::Column, 1), 150.0);
        g.set_column_list(vec![Column::new("age"), Column::new("name")]).unwrap();
        assert_eq!(g.length(Axis::Column, 0), 150.0);
        assert_eq!(g.length(Axis::Column, 1), 100.0);
    }

    #[test]
    fn test_scroll_clamped_to_content() {
        let mut g = grid();
        g.on_scroll(10_000.0, 10_000.0);
        let f = g.frame();
        assert_eq!(f.content_height, 50.0 * 30.0);
        assert_eq!(f.scroll_top, 1500.0 - 200.0);
        assert_eq!(f.scroll_left, 0.0);
    }

    #[test]
    fn test_external_scroll_write_is_picked_up() {
        let mut g = grid();
        let top = g.scroll_top_handle();
        top.set(300.0);
        assert_eq!(g.frame().rows.first, 10);
    }

    #[test]
    fn test_drop_cancels_and_unsubscribes() {
        let g = grid();
        let handle = g.scroll_top_handle();
        assert_eq!(handle.subscriber_count(), 1);
        drop(g);
        assert_eq!(handle.subscriber_count(), 0);
    }
}
