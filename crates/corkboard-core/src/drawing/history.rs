//! Undo/redo history for the drawing surface.
//!
//! Each entry is a raster snapshot of the surface taken immediately
//! before a stroke committed. Linear history: recording after undos
//! discards the redo tail.

use super::surface::SurfaceSnapshot;

/// Maximum number of undo snapshots to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Snapshot stacks with a single cursor.
#[derive(Debug, Clone, Default)]
pub struct StrokeHistory {
    undo_stack: Vec<SurfaceSnapshot>,
    redo_stack: Vec<SurfaceSnapshot>,
}

impl StrokeHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-stroke surface state after a stroke commits.
    /// Clears the redo tail; the oldest entry drops past the cap.
    pub fn record(&mut self, pre_stroke: SurfaceSnapshot) {
        self.undo_stack.push(pre_stroke);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo: pop the most recent entry, saving `current` for redo.
    /// Returns the snapshot to restore, or `None` when empty.
    pub fn undo(&mut self, current: SurfaceSnapshot) -> Option<SurfaceSnapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Redo: symmetric to [`undo`](Self::undo).
    pub fn redo(&mut self, current: SurfaceSnapshot) -> Option<SurfaceSnapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
