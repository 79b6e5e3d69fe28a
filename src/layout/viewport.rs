//! Viewport state: size of the visible area and its scroll position.

use serde::{Deserialize, Serialize};

/// Visible rectangle over the virtual content area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewport {
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
    /// Horizontal scroll position in content coordinates
    pub scroll_left: f32,
    /// Vertical scroll position in content coordinates
    pub scroll_top: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Viewport {
    /// Create a viewport scrolled to the origin.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_left: 0.0,
            scroll_top: 0.0,
        }
    }

    /// Largest horizontal scroll that still shows content.
    pub fn max_scroll_left(&self, content_width: f32) -> f32 {
        (content_width - self.width).max(0.0)
    }

    /// Largest vertical scroll that still shows content.
    pub fn max_scroll_top(&self, content_height: f32) -> f32 {
        (content_height - self.height).max(0.0)
    }

    /// Clamp scroll position to `0 ..= content - viewport` on both axes.
    pub fn clamp_scroll(&mut self, content_width: f32, content_height: f32) {
        let max_x = self.max_scroll_left(content_width);
        let max_y = self.max_scroll_top(content_height);
        self.scroll_left = sanitize(self.scroll_left).clamp(0.0, max_x);
        self.scroll_top = sanitize(self.scroll_top).clamp(0.0, max_y);
    }

    /// Scroll by delta amounts. Returns the applied deltas.
    pub fn scroll_by(
        &mut self,
        delta_x: f32,
        delta_y: f32,
        content_width: f32,
        content_height: f32,
    ) -> (f32, f32) {
        let (old_x, old_y) = (self.scroll_left, self.scroll_top);
        self.scroll_left += delta_x;
        self.scroll_top += delta_y;
        self.clamp_scroll(content_width, content_height);
        (self.scroll_left - old_x, self.scroll_top - old_y)
    }

    /// Set absolute scroll position. Returns true if it moved.
    pub fn set_scroll(&mut self, x: f32, y: f32, content_width: f32, content_height: f32) -> bool {
        let (old_x, old_y) = (self.scroll_left, self.scroll_top);
        self.scroll_left = x;
        self.scroll_top = y;
        self.clamp_scroll(content_width, content_height);
        (self.scroll_left - old_x).abs() > f32::EPSILON || (self.scroll_top - old_y).abs() > f32::EPSILON
    }

    /// Resize the viewport. Negative or NaN sizes collapse to 0.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = sanitize(width);
        self.height = sanitize(height);
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll_to_content() {
        let mut vp = Viewport::new(200.0, 100.0);
        vp.set_scroll(1000.0, -5.0, 500.0, 300.0);
        assert_eq!(vp.scroll_left, 300.0);
        assert_eq!(vp.scroll_top, 0.0);
    }

    #[test]
    fn test_content_smaller_than_viewport_pins_origin() {
        let mut vp = Viewport::new(200.0, 100.0);
        let (dx, dy) = vp.scroll_by(50.0, 50.0, 150.0, 80.0);
        assert_eq!((dx, dy), (0.0, 0.0));
    }

    #[test]
    fn test_resize_sanitizes() {
        let mut vp = Viewport::default();
        vp.resize(-10.0, f32::NAN);
        assert_eq!((vp.width, vp.height), (0.0, 0.0));
        vp.resize(640.0, 480.0);
        assert_eq!((vp.width, vp.height), (640.0, 480.0));
    }
}
