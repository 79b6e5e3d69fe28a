//! Scroll and viewport entry points for [`Grid`].

use super::Grid;
use crate::layout::Viewport;
use crate::reactive::{Dirty, Observable};

impl Grid {
    /// Scroll the body to an absolute position, clamped to the content.
    ///
    /// Inside a batch the content size is not known yet, so the position is
    /// stored as given and clamped by the pass.
    pub fn on_scroll(&mut self, scroll_left: f32, scroll_top: f32) {
        let mut viewport = self.viewport();
        if self.bus.in_batch() {
            viewport.set_scroll(scroll_left, scroll_top, f32::INFINITY, f32::INFINITY);
        } else {
            viewport.set_scroll(scroll_left, scroll_top, self.content_width(), self.content_height());
        }
        self.apply_scroll(&viewport);
    }

    /// Scroll by a delta. Returns the applied delta.
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32) -> (f32, f32) {
        let mut viewport = self.viewport();
        let applied = viewport.scroll_by(delta_x, delta_y, self.content_width(), self.content_height());
        self.apply_scroll(&viewport);
        applied
    }

    /// Scroll vertically so that `row` starts at the top of the viewport
    /// (as far as the content allows).
    pub fn scroll_to_row(&mut self, row: usize) {
        let top = self.row_sizes.offset_of(row.min(self.rows.len()));
        let left = self.scroll_left.get();
        self.on_scroll(left, top);
    }

    pub fn on_viewport_resize(&mut self, width: f32, height: f32) {
        let mut viewport = self.viewport;
        viewport.resize(width, height);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.bus.mark(Dirty::VIEWPORT);
        }
        self.flush();
    }

    /// Shared horizontal scroll position. Owned by the scrollable body; the
    /// header follows it.
    pub fn scroll_left_handle(&self) -> Observable<f32> {
        self.scroll_left.clone()
    }

    /// Shared vertical scroll position, read by the pinned columns and the
    /// row handles.
    pub fn scroll_top_handle(&self) -> Observable<f32> {
        self.scroll_top.clone()
    }

    /// Cell under a point given in viewport coordinates of the body, using
    /// the current frame. Pinned columns are hit first.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let frame = &self.frame;
        let row = frame
            .rows
            .positions()
            .find(|&(_, top, len)| y + frame.scroll_top >= top && y + frame.scroll_top < top + len)?
            .0;
        if let Some(pinned) = frame.body.pinned.as_ref().filter(|_| x < frame.body.pinned_width) {
            return pinned
                .cols
                .positions()
                .find(|&(_, left, len)| x >= left && x < left + len)
                .map(|(col, _, _)| (row, col));
        }
        let content_x = x + frame.scroll_left;
        frame
            .body
            .scrollable
            .cols
            .positions()
            .find(|&(_, left, len)| content_x >= left && content_x < left + len)
            .map(|(col, _, _)| (row, col))
    }

    fn apply_scroll(&mut self, viewport: &Viewport) {
        self.scroll_left.set(viewport.scroll_left);
        self.scroll_top.set(viewport.scroll_top);
        self.flush();
    }
}
