//! Interaction entry points for [`Grid`]: sort toggles, filter edits,
//! resize gestures and focus.

use std::rc::Rc;

use super::{FilterHandler, FocusHandler, Grid};
use crate::layout::Axis;
use crate::reactive::Dirty;
use crate::resize::ResizeCommit;
use crate::types::{FilterSpec, Record, SortDirection, SortSpec};

impl Grid {
    /// Cycle the sort of `field` through ASC → DESC → unsorted.
    pub fn on_sort_toggle(&mut self, field: &str) -> Option<SortDirection> {
        let direction = self.sort.toggle(field);
        log::debug!(target: "vsheet::grid", "sort {field} -> {direction:?}");
        self.bus.mark(Dirty::SORT);
        self.flush();
        direction
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        if sort != self.sort {
            self.sort = sort;
            self.bus.mark(Dirty::SORT);
        }
        self.flush();
    }

    /// Edit the filter pattern of `field`; an empty pattern removes it.
    /// Applied at once unless the grid holds edits until commit.
    pub fn on_filter_change(&mut self, field: &str, pattern: &str) {
        self.pending_filter.set(field, pattern);
        // the header shows the pending pattern
        self.bus.mark(Dirty::FILTER);
        if self.config.apply_filter_on_commit {
            self.flush();
        } else {
            self.commit_filter();
        }
    }

    /// Apply the pending filter, or hand it to the filter handler when
    /// filtering is delegated.
    pub fn commit_filter(&mut self) {
        if let Some(handler) = self.on_filter_commit.as_mut() {
            handler(&self.pending_filter);
        } else if self.filter != self.pending_filter {
            self.filter = self.pending_filter.clone();
            log::debug!(target: "vsheet::grid", "filter committed: {:?}", self.filter);
            self.bus.mark(Dirty::FILTER);
        }
        self.flush();
    }

    /// Replace both the pending and the applied filter.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.pending_filter = filter.clone();
        self.filter = filter;
        self.bus.mark(Dirty::FILTER);
        self.flush();
    }

    /// Delegate filtering to `handler`: committed filters are passed to it
    /// and rows are no longer filtered locally.
    pub fn set_on_filter_commit(&mut self, handler: impl FnMut(&FilterSpec) + 'static) {
        self.on_filter_commit = Some(Box::new(handler) as FilterHandler);
        if !self.filter.is_empty() {
            self.filter = FilterSpec::new();
            self.bus.mark(Dirty::FILTER);
        }
        self.flush();
    }

    /// Start a resize gesture on the handle of `index`. `container_start` is
    /// the leading edge of the cell in pointer coordinates.
    pub fn pointer_down(&mut self, axis: Axis, index: usize, pointer: f32, container_start: f32) {
        let current = self.length(axis, index);
        self.resize.pointer_down(axis, index, pointer, container_start, current);
    }

    /// Move the pointer of the active gesture; returns the handle offset to
    /// draw. Layout is not recomputed until the gesture commits.
    pub fn pointer_move(&mut self, pointer: f32) -> Option<f32> {
        self.resize.pointer_move(pointer)
    }

    /// Finish the active gesture and commit its length.
    pub fn pointer_up(&mut self) -> Option<ResizeCommit> {
        let commit = self.resize.pointer_up()?;
        self.on_size_override_committed(commit.axis, commit.index, commit.length);
        Some(commit)
    }

    /// Abandon the active gesture (pointer lost, view hidden).
    pub fn cancel_resize(&mut self) -> bool {
        self.resize.cancel()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_dragging()
    }

    /// Focus the row of a clicked cell. In controlled mode only the focus
    /// handler is called.
    pub fn click_cell(&mut self, row_index: usize, _col_index: usize) {
        let Some(row) = self.rows.get(row_index).map(Rc::clone) else {
            return;
        };
        if let Some(handler) = self.on_focus_change.as_mut() {
            handler(Some(row), self.focused.clone());
            return;
        }
        self.set_focused(Some(row));
    }

    /// Set the focused row directly.
    pub fn set_focused(&mut self, row: Option<Rc<Record>>) {
        let same = match (&self.focused, &row) {
            (Some(a), Some(b)) => (self.focus_comparator)(a, b),
            (None, None) => true,
            _ => false,
        };
        self.focused = row;
        if !same {
            self.bus.mark(Dirty::FOCUS);
        }
        self.flush();
    }

    pub fn focused(&self) -> Option<&Rc<Record>> {
        self.focused.as_ref()
    }

    /// Replace the identity test used to find the focused row.
    pub fn set_focus_comparator(&mut self, comparator: impl Fn(&Rc<Record>, &Rc<Record>) -> bool + 'static) {
        self.focus_comparator = Rc::new(comparator);
        self.bus.mark(Dirty::FOCUS);
        self.flush();
    }

    /// Switch to controlled focus.
    pub fn set_on_focus_change(
        &mut self,
        handler: impl FnMut(Option<Rc<Record>>, Option<Rc<Record>>) + 'static,
    ) {
        self.on_focus_change = Some(Box::new(handler) as FocusHandler);
    }
}
