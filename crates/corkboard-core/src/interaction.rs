//! Drag/resize session state machine for note manipulation.
//!
//! One note is manipulated at a time, and drag and resize are mutually
//! exclusive: the single session slot is the lock. Sessions live from
//! pointer-down to pointer-up/cancel and hold no external resources.

use crate::geometry::MIN_NOTE_SIZE;
use crate::note::NoteId;
use kurbo::{Point, Size, Vec2};

/// A geometry update produced by an active session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionUpdate {
    /// The note moved to a new top-left position.
    Moved { id: NoteId, position: Point },
    /// The note's display size changed.
    Resized { id: NoteId, size: Size },
}

/// Active drag state: where on the note the pointer grabbed it.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    id: NoteId,
    grab_offset: Vec2,
}

/// Active resize state: starting pointer and geometry.
#[derive(Debug, Clone, Copy)]
struct ResizeSession {
    id: NoteId,
    start_pointer: Point,
    start_size: Size,
    /// Width/height ratio to preserve, if locked.
    aspect_ratio: Option<f64>,
    min_size: f64,
}

#[derive(Debug, Clone, Copy)]
enum Session {
    Drag(DragSession),
    Resize(ResizeSession),
}

/// Translates pointer movement into note geometry updates.
#[derive(Debug, Default)]
pub struct InteractionController {
    session: Option<Session>,
}

impl InteractionController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging a note. Returns false (and does nothing) while
    /// any session is already active; drag may not start over a live
    /// resize and vice versa.
    pub fn begin_drag(&mut self, id: NoteId, pointer: Point, note_position: Point) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(Session::Drag(DragSession {
            id,
            grab_offset: pointer - note_position,
        }));
        true
    }

    /// Begin resizing a note from its current size. `aspect_ratio`
    /// locks height to width (used for image notes).
    pub fn begin_resize(
        &mut self,
        id: NoteId,
        pointer: Point,
        start_size: Size,
        aspect_ratio: Option<f64>,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(Session::Resize(ResizeSession {
            id,
            start_pointer: pointer,
            start_size,
            aspect_ratio,
            min_size: MIN_NOTE_SIZE,
        }));
        true
    }

    /// Feed a pointer position. Returns the geometry update to apply,
    /// or `None` when no session is active (the steady state after
    /// [`end`](Self::end); late move events are ignored, never an
    /// error).
    pub fn pointer_move(&mut self, pointer: Point) -> Option<InteractionUpdate> {
        match self.session? {
            Session::Drag(drag) => Some(InteractionUpdate::Moved {
                id: drag.id,
                position: pointer - drag.grab_offset,
            }),
            Session::Resize(resize) => {
                let delta = pointer - resize.start_pointer;
                Some(InteractionUpdate::Resized {
                    id: resize.id,
                    size: resize.apply(delta),
                })
            }
        }
    }

    /// End the active session. Idempotent: calling with no session is a
    /// no-op.
    pub fn end(&mut self) {
        self.session = None;
    }

    /// Cancel the active session (Escape / pointer-cancel). Geometry
    /// already applied stands; only the session itself is discarded.
    pub fn cancel(&mut self) {
        self.end();
    }

    /// Check if a drag or resize is in progress.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The note being manipulated, if any.
    pub fn active_note(&self) -> Option<NoteId> {
        match self.session? {
            Session::Drag(d) => Some(d.id),
            Session::Resize(r) => Some(r.id),
        }
    }
}

impl ResizeSession {
    /// Compute the new size for a pointer delta, enforcing the minimum
    /// floor on whichever dimension binds first.
    fn apply(&self, delta: Vec2) -> Size {
        let mut width = (self.start_size.width + delta.x).max(self.min_size);
        let height = match self.aspect_ratio {
            Some(ratio) => {
                let mut height = width / ratio;
                if height < self.min_size {
                    height = self.min_size;
                    width = height * ratio;
                }
                height
            }
            None => (self.start_size.height + delta.y).max(self.min_size),
        };
        Size::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_drag_preserves_grab_offset() {
        let mut ctl = InteractionController::new();
        let id = Uuid::new_v4();

        // Note at (0,0), grabbed at (50,50)
        assert!(ctl.begin_drag(id, Point::new(50.0, 50.0), Point::new(0.0, 0.0)));

        let update = ctl.pointer_move(Point::new(70.0, 80.0)).unwrap();
        assert_eq!(
            update,
            InteractionUpdate::Moved {
                id,
                position: Point::new(20.0, 30.0),
            }
        );
    }

    #[test]
    fn test_drag_never_clamps() {
        let mut ctl = InteractionController::new();
        let id = Uuid::new_v4();
        ctl.begin_drag(id, Point::new(10.0, 10.0), Point::new(0.0, 0.0));

        let update = ctl.pointer_move(Point::new(-500.0, -500.0)).unwrap();
        assert_eq!(
            update,
            InteractionUpdate::Moved {
                id,
                position: Point::new(-510.0, -510.0),
            }
        );
    }

    #[test]
    fn test_resize_floor() {
        let mut ctl = InteractionController::new();
        let id = Uuid::new_v4();
        ctl.begin_resize(id, Point::new(200.0, 200.0), Size::new(200.0, 200.0), None);

        let update = ctl.pointer_move(Point::new(-300.0, -300.0)).unwrap();
        assert_eq!(
            update,
            InteractionUpdate::Resized {
                id,
                size: Size::new(100.0, 100.0),
            }
        );
    }

    #[test]
    fn test_resize_free_axes_independent() {
        let mut ctl = InteractionController::new();
        let id = Uuid::new_v4();
        ctl.begin_resize(id, Point::new(0.0, 0.0), Size::new(200.0, 200.0), None);

        let update = ctl.pointer_move(Point::new(50.0, -30.0)).unwrap();
        assert_eq!(
            update,
            InteractionUpdate::Resized {
                id,
                size: Size::new(250.0, 170.0),
            }
        );
    }

    #[test]
    fn test_aspect_locked_resize() {
        let mut ctl = InteractionController::new();
        let id = Uuid::new_v4();
        // 2:1 image, 300x150
        ctl.begin_resize(
            id,
            Point::new(0.0, 0.0),
            Size::new(300.0, 150.0),
            Some(2.0),
        );

        // Height always follows width through the ratio
        for dx in [-50.0, 25.0, 140.0] {
            match ctl.pointer_move(Point::new(dx, 999.0)).unwrap() {
                InteractionUpdate::Resized { size, .. } => {
                    assert!((size.width / size.height - 2.0).abs() < 1e-9);
                }
                other => panic!("unexpected update {other:?}"),
            }
        }
    }

    #[test]
    fn test_aspect_floor_backsolves_width() {
        let mut ctl = InteractionController::new();
        let id = Uuid::new_v4();
        ctl.begin_resize(
            id,
            Point::new(0.0, 0.0),
            Size::new(300.0, 150.0),
            Some(2.0),
        );

        // Shrink far past the floor: height pins at 100, width follows
        match ctl.pointer_move(Point::new(-280.0, 0.0)).unwrap() {
            InteractionUpdate::Resized { size, .. } => {
                assert!((size.height - 100.0).abs() < 1e-9);
                assert!((size.width - 200.0).abs() < 1e-9);
            }
            other => panic!("unexpected update {other:?}"),
        }
    }

    #[test]
    fn test_sessions_mutually_exclusive() {
        let mut ctl = InteractionController::new();
        let id = Uuid::new_v4();

        assert!(ctl.begin_drag(id, Point::ZERO, Point::ZERO));
        assert!(!ctl.begin_resize(id, Point::ZERO, Size::new(200.0, 200.0), None));
        assert!(!ctl.begin_drag(id, Point::ZERO, Point::ZERO));

        ctl.end();
        assert!(ctl.begin_resize(id, Point::ZERO, Size::new(200.0, 200.0), None));
    }

    #[test]
    fn test_end_idempotent_and_moves_ignored() {
        let mut ctl = InteractionController::new();
        let id = Uuid::new_v4();
        ctl.begin_drag(id, Point::ZERO, Point::ZERO);

        ctl.end();
        ctl.end();
        assert!(!ctl.is_active());
        assert!(ctl.pointer_move(Point::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_active_note() {
        let mut ctl = InteractionController::new();
        let id = Uuid::new_v4();
        assert!(ctl.active_note().is_none());
        ctl.begin_drag(id, Point::ZERO, Point::ZERO);
        assert_eq!(ctl.active_note(), Some(id));
    }
}
