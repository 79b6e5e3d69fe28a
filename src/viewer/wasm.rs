//! JavaScript façade over [`Grid`].

use js_sys::Function;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

use super::Grid;
use crate::config::GridConfig;
use crate::layout::Axis;
use crate::types::{ColumnNodeDef, ColumnSet, FilterSpec, Record, SortSpec, SpanContext, SpanFn, SpanResult};

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_logging() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Warn);
    }
}

fn axis_from_str(axis: &str) -> Result<Axis, JsValue> {
    match axis {
        "row" => Ok(Axis::Row),
        "column" => Ok(Axis::Column),
        other => Err(JsValue::from_str(&format!("unknown axis {other:?}"))),
    }
}

fn to_js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Grid handle exported to JavaScript. Inputs are JS values shaped like the
/// JSON scene format; `frame()` returns the positioned output.
#[wasm_bindgen]
pub struct GridView {
    grid: Grid,
}

#[wasm_bindgen]
impl GridView {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<GridView, JsValue> {
        console_error_panic_hook::set_once();
        init_logging();
        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_err)?
        };
        Ok(GridView {
            grid: Grid::new(config)?,
        })
    }

    /// Raise console logging to `"debug"`, `"trace"`, ...
    #[wasm_bindgen(js_name = setLogLevel)]
    pub fn set_log_level(level: &str) {
        if let Ok(filter) = level.parse::<log::LevelFilter>() {
            log::set_max_level(filter);
        }
    }

    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&mut self, data: JsValue) -> Result<(), JsValue> {
        let records: Vec<Record> = serde_wasm_bindgen::from_value(data).map_err(to_js_err)?;
        self.grid.set_records(records);
        Ok(())
    }

    #[wasm_bindgen(js_name = setColumns)]
    pub fn set_columns(&mut self, columns: JsValue) -> Result<(), JsValue> {
        let defs: Vec<ColumnNodeDef> = serde_wasm_bindgen::from_value(columns).map_err(to_js_err)?;
        self.grid.set_columns(ColumnSet::from_defs(defs)?);
        Ok(())
    }

    /// Use a JS function `(rowIndex, colIndex, row) => {rowSpan, colSpan}` as
    /// the span function of column `field`.
    #[wasm_bindgen(js_name = setSpanCallback)]
    pub fn set_span_callback(&mut self, field: &str, callback: Function) -> Result<(), JsValue> {
        let span_fn: SpanFn = Rc::new(move |ctx: &SpanContext<'_>| {
            let row = serde_wasm_bindgen::to_value(ctx.row).unwrap_or(JsValue::NULL);
            callback
                .call3(
                    &JsValue::NULL,
                    &JsValue::from(ctx.row_index as f64),
                    &JsValue::from(ctx.col_index as f64),
                    &row,
                )
                .ok()
                .and_then(|v| serde_wasm_bindgen::from_value::<SpanResult>(v).ok())
                .unwrap_or_default()
        });
        if self.grid.set_span_fn(field, Some(span_fn)) {
            Ok(())
        } else {
            Err(JsValue::from_str(&format!("unknown column {field:?}")))
        }
    }

    #[wasm_bindgen(js_name = onScroll)]
    pub fn on_scroll(&mut self, scroll_left: f32, scroll_top: f32) {
        self.grid.on_scroll(scroll_left, scroll_top);
    }

    #[wasm_bindgen(js_name = onViewportResize)]
    pub fn on_viewport_resize(&mut self, width: f32, height: f32) {
        self.grid.on_viewport_resize(width, height);
    }

    /// Returns the new direction (`"ASC"`, `"DESC"`) or `undefined`.
    #[wasm_bindgen(js_name = toggleSort)]
    pub fn toggle_sort(&mut self, field: &str) -> Result<JsValue, JsValue> {
        let direction = self.grid.on_sort_toggle(field);
        serde_wasm_bindgen::to_value(&direction).map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = setSort)]
    pub fn set_sort(&mut self, sort: JsValue) -> Result<(), JsValue> {
        let sort: SortSpec = serde_wasm_bindgen::from_value(sort).map_err(to_js_err)?;
        self.grid.set_sort(sort);
        Ok(())
    }

    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&mut self, field: &str, pattern: &str) {
        self.grid.on_filter_change(field, pattern);
    }

    #[wasm_bindgen(js_name = commitFilter)]
    pub fn commit_filter(&mut self) {
        self.grid.commit_filter();
    }

    /// Hand committed filters to `callback` instead of filtering locally.
    #[wasm_bindgen(js_name = onFilterCommit)]
    pub fn on_filter_commit(&mut self, callback: Function) {
        self.grid.set_on_filter_commit(move |filter: &FilterSpec| {
            if let Ok(value) = serde_wasm_bindgen::to_value(filter) {
                if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                    log::warn!(target: "vsheet::wasm", "filter commit callback threw: {e:?}");
                }
            }
        });
    }

    #[wasm_bindgen(js_name = setSizeOverride)]
    pub fn set_size_override(&mut self, axis: &str, index: usize, length: f32) -> Result<(), JsValue> {
        self.grid.on_size_override_committed(axis_from_str(axis)?, index, length);
        Ok(())
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, axis: &str, index: usize, pointer: f32, container_start: f32) -> Result<(), JsValue> {
        self.grid.pointer_down(axis_from_str(axis)?, index, pointer, container_start);
        Ok(())
    }

    /// Returns the handle offset to draw, or `undefined` when ignored.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, pointer: f32) -> Option<f32> {
        self.grid.pointer_move(pointer)
    }

    /// Returns the committed `{axis, index, length}` or `undefined`.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> Result<JsValue, JsValue> {
        let commit = self.grid.pointer_up();
        serde_wasm_bindgen::to_value(&commit).map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = cancelResize)]
    pub fn cancel_resize(&mut self) -> bool {
        self.grid.cancel_resize()
    }

    #[wasm_bindgen(js_name = clickCell)]
    pub fn click_cell(&mut self, row_index: usize, col_index: usize) {
        self.grid.click_cell(row_index, col_index);
    }

    /// Controlled focus: `callback(newRow, oldRow)` receives row objects
    /// (`undefined` when none) and the grid no longer moves focus itself.
    #[wasm_bindgen(js_name = onFocusChange)]
    pub fn on_focus_change(&mut self, callback: Function) {
        self.grid.set_on_focus_change(move |new, old| {
            let to_js = |row: Option<Rc<Record>>| {
                row.and_then(|r| serde_wasm_bindgen::to_value(&*r).ok())
                    .unwrap_or(JsValue::UNDEFINED)
            };
            if let Err(e) = callback.call2(&JsValue::NULL, &to_js(new), &to_js(old)) {
                log::warn!(target: "vsheet::wasm", "focus change callback threw: {e:?}");
            }
        });
    }

    /// Current frame as a JS object.
    pub fn frame(&mut self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.grid.frame()).map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = passCount)]
    pub fn pass_count(&self) -> f64 {
        self.grid.pass_count() as f64
    }
}
