//! Layout engine for the virtualized sheet.
//!
//! This module handles:
//! - Resolving row heights and column widths (defaults, percentages, overrides)
//! - Windowing: mapping a scroll offset to the visible index range of an axis
//! - Merged cell (span) resolution inside the current window
//! - Viewport state (size and scroll position)

mod sizes;
mod spans;
mod viewport;
mod window;

pub use sizes::{resolve_column_widths, total_length, Axis, SizeModel, SizeOverrides};
pub use spans::{resolve_spans, resolve_spans_hiding, SpanMap};
pub use viewport::Viewport;
pub use window::{
    compute_window, scan_before_viewport, scan_inside_viewport, AxisWindow, BeforeViewport,
    InsideViewport,
};
