//! Drag-to-resize state machine.
//!
//! A gesture starts on the resize handle of a row or column and moves the
//! handle by the pointer delta. The handle is centred on the cell's trailing
//! edge, so the candidate length is the handle position plus half the handle.
//! Releasing the pointer commits the candidate; cancelling discards it.

use serde::Serialize;

use crate::config::GridConfig;
use crate::layout::Axis;

/// A length committed by a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeCommit {
    pub axis: Axis,
    pub index: usize,
    pub length: f32,
}

/// An in-flight drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub axis: Axis,
    pub index: usize,
    /// Last accepted pointer coordinate along `axis`
    pub pointer: f32,
    /// Leading edge of the resized cell, in pointer coordinates
    pub container_start: f32,
    /// Handle offset from the cell's leading edge
    pub handle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Dragging(DragGesture),
}

/// Owns the resize state for one grid.
#[derive(Debug, Clone)]
pub struct ResizeController {
    state: ResizeState,
    half_handle: f32,
    min_length: f32,
}

impl Default for ResizeController {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

impl ResizeController {
    pub fn new(handle_length: f32, min_length: f32) -> Self {
        Self {
            state: ResizeState::Idle,
            half_handle: (handle_length * 0.5).ceil(),
            min_length,
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.resize_handle_length, config.min_length)
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ResizeState::Dragging(_))
    }

    /// Start a gesture on `index`. A gesture already in flight is dropped.
    pub fn pointer_down(
        &mut self,
        axis: Axis,
        index: usize,
        pointer: f32,
        container_start: f32,
        current_length: f32,
    ) {
        if let ResizeState::Dragging(old) = self.state {
            log::debug!(target: "vsheet::resize", "replacing unfinished {:?} drag on {}", old.axis, old.index);
        }
        self.state = ResizeState::Dragging(DragGesture {
            axis,
            index,
            pointer,
            container_start,
            handle: current_length - self.half_handle,
        });
        log::debug!(target: "vsheet::resize", "drag start {axis:?} {index} at {pointer}");
    }

    /// Move the pointer. Returns the new handle offset, or `None` when idle
    /// or when the pointer is at or before the cell's leading edge.
    pub fn pointer_move(&mut self, pointer: f32) -> Option<f32> {
        let ResizeState::Dragging(gesture) = &mut self.state else {
            return None;
        };
        if pointer <= gesture.container_start || !pointer.is_finite() {
            return None;
        }
        let delta = gesture.pointer - pointer;
        gesture.pointer = pointer;
        gesture.handle -= delta;
        Some(gesture.handle)
    }

    /// Length that releasing the pointer now would commit.
    pub fn candidate(&self) -> Option<f32> {
        match &self.state {
            ResizeState::Dragging(g) => Some(self.length_for(g)),
            ResizeState::Idle => None,
        }
    }

    /// Release the pointer, committing the candidate length.
    pub fn pointer_up(&mut self) -> Option<ResizeCommit> {
        let ResizeState::Dragging(gesture) = std::mem::take(&mut self.state) else {
            return None;
        };
        let commit = ResizeCommit {
            axis: gesture.axis,
            index: gesture.index,
            length: self.length_for(&gesture),
        };
        log::debug!(
            target: "vsheet::resize",
            "commit {:?} {} = {}",
            commit.axis,
            commit.index,
            commit.length
        );
        Some(commit)
    }

    /// Abandon the gesture without committing. Returns true if one was active.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            log::debug!(target: "vsheet::resize", "drag cancelled");
        }
        self.state = ResizeState::Idle;
        was_dragging
    }

    /// Start a gesture whose lifetime is bound to the returned guard.
    pub fn begin(
        &mut self,
        axis: Axis,
        index: usize,
        pointer: f32,
        container_start: f32,
        current_length: f32,
    ) -> DragGuard<'_> {
        self.pointer_down(axis, index, pointer, container_start, current_length);
        DragGuard {
            controller: self,
            finished: false,
        }
    }

    fn length_for(&self, gesture: &DragGesture) -> f32 {
        (gesture.handle + self.half_handle).max(self.min_length)
    }
}

/// Scoped gesture: dropping it without [`DragGuard::finish`] cancels.
#[derive(Debug)]
pub struct DragGuard<'a> {
    controller: &'a mut ResizeController,
    finished: bool,
}

impl DragGuard<'_> {
    pub fn move_to(&mut self, pointer: f32) -> Option<f32> {
        self.controller.pointer_move(pointer)
    }

    pub fn candidate(&self) -> Option<f32> {
        self.controller.candidate()
    }

    pub fn finish(mut self) -> Option<ResizeCommit> {
        self.finished = true;
        self.controller.pointer_up()
    }
}

impl Drop for DragGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.controller.cancel();
        }
    }
}
