//! Unified pointer input for mouse, touch and stylus events.
//!
//! Every device funnels into one [`PointerInput`] shape so the rest of
//! the engine never branches on event source.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Stable identifier for one pointer (mouse, finger, or pen tip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointerId(pub u64);

/// The device class a pointer event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// A single pointer sample: identity, position and pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub id: PointerId,
    pub kind: PointerKind,
    /// Position in screen coordinates.
    pub position: Point,
    /// Normalized pressure in [0, 1]; mice report 1.0 while pressed.
    pub pressure: f64,
}

impl PointerInput {
    /// Convenience constructor for a mouse pointer sample.
    pub fn mouse(position: Point) -> Self {
        Self {
            id: PointerId(0),
            kind: PointerKind::Mouse,
            position,
            pressure: 1.0,
        }
    }

    /// Convenience constructor for a touch pointer sample.
    pub fn touch(id: u64, position: Point) -> Self {
        Self {
            id: PointerId(id),
            kind: PointerKind::Touch,
            position,
            pressure: 1.0,
        }
    }
}

/// Pointer event type for unified mouse/touch/pen handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(PointerInput),
    Move(PointerInput),
    Up(PointerInput),
    /// The platform lost the pointer (window blur, palm rejection).
    Cancel(PointerId),
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS: the shortcut modifier.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// True when no modifier is held.
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt || self.meta)
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks live pointers and keyboard state across frames.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Pointers currently down, keyed by id.
    active: HashMap<PointerId, PointerInput>,
    /// Last known position of the primary pointer.
    pub pointer_position: Point,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
    /// Last click time for double-click detection.
    last_click_time: Option<Instant>,
    /// Last click position for double-click detection.
    last_click_position: Option<Point>,
    /// Whether a double-click was detected this frame.
    double_click_detected: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            active: HashMap::new(),
            pointer_position: Point::ZERO,
            modifiers: Modifiers::default(),
            last_click_time: None,
            last_click_position: None,
            double_click_detected: false,
        }
    }
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.double_click_detected = false;
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Down(input) => {
                self.pointer_position = input.position;
                self.active.insert(input.id, *input);
                if input.kind != PointerKind::Touch || self.active.len() == 1 {
                    self.detect_double_click(input.position);
                }
            }
            PointerEvent::Move(input) => {
                self.pointer_position = input.position;
                if let Some(tracked) = self.active.get_mut(&input.id) {
                    *tracked = *input;
                }
            }
            PointerEvent::Up(input) => {
                self.pointer_position = input.position;
                self.active.remove(&input.id);
            }
            PointerEvent::Cancel(id) => {
                self.active.remove(id);
            }
        }
    }

    fn detect_double_click(&mut self, position: Point) {
        self.double_click_detected = false;
        let now = Instant::now();
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position)
        {
            let elapsed = now.duration_since(last_time).as_millis();
            let distance = last_pos.distance(position);

            if elapsed < DOUBLE_CLICK_TIME_MS && distance < DOUBLE_CLICK_DISTANCE {
                self.double_click_detected = true;
                // Reset so a triple-click is not another double-click
                self.last_click_time = None;
                self.last_click_position = None;
                return;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
    }

    /// Update the modifier keys state. Key interpretation itself
    /// belongs to the board controller.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Number of pointers currently down.
    pub fn pointer_count(&self) -> usize {
        self.active.len()
    }

    /// Check if a specific pointer is down.
    pub fn is_down(&self, id: PointerId) -> bool {
        self.active.contains_key(&id)
    }

    /// Positions of all live touch pointers, ordered by pointer id so
    /// the gesture recognizer sees a stable pairing.
    pub fn active_touches(&self) -> Vec<PointerInput> {
        let mut touches: Vec<PointerInput> = self
            .active
            .values()
            .filter(|p| p.kind == PointerKind::Touch)
            .copied()
            .collect();
        touches.sort_by_key(|p| p.id);
        touches
    }

    /// Check if a double-click was detected this frame.
    pub fn is_double_click(&self) -> bool {
        self.double_click_detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_down_up() {
        let mut input = InputState::new();

        input.handle_pointer_event(&PointerEvent::Down(PointerInput::mouse(Point::new(
            100.0, 100.0,
        ))));
        assert_eq!(input.pointer_count(), 1);
        assert!(input.is_down(PointerId(0)));

        input.handle_pointer_event(&PointerEvent::Up(PointerInput::mouse(Point::new(
            100.0, 100.0,
        ))));
        assert_eq!(input.pointer_count(), 0);
    }

    #[test]
    fn test_cancel_releases_pointer() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::Down(PointerInput::touch(
            7,
            Point::new(10.0, 10.0),
        )));
        assert_eq!(input.pointer_count(), 1);

        input.handle_pointer_event(&PointerEvent::Cancel(PointerId(7)));
        assert_eq!(input.pointer_count(), 0);
    }

    #[test]
    fn test_move_updates_tracked_position() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::Down(PointerInput::touch(
            1,
            Point::new(10.0, 10.0),
        )));
        input.handle_pointer_event(&PointerEvent::Move(PointerInput::touch(
            1,
            Point::new(40.0, 50.0),
        )));

        let touches = input.active_touches();
        assert_eq!(touches.len(), 1);
        assert_eq!(touches[0].position, Point::new(40.0, 50.0));
    }

    #[test]
    fn test_active_touches_ordered_and_filtered() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::Down(PointerInput::touch(
            2,
            Point::new(2.0, 2.0),
        )));
        input.handle_pointer_event(&PointerEvent::Down(PointerInput::mouse(Point::new(
            99.0, 99.0,
        ))));
        input.handle_pointer_event(&PointerEvent::Down(PointerInput::touch(
            1,
            Point::new(1.0, 1.0),
        )));

        let touches = input.active_touches();
        assert_eq!(touches.len(), 2);
        assert_eq!(touches[0].id, PointerId(1));
        assert_eq!(touches[1].id, PointerId(2));
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        let pos = Point::new(100.0, 100.0);

        input.handle_pointer_event(&PointerEvent::Down(PointerInput::mouse(pos)));
        assert!(!input.is_double_click());
        input.handle_pointer_event(&PointerEvent::Up(PointerInput::mouse(pos)));
        input.begin_frame();

        input.handle_pointer_event(&PointerEvent::Down(PointerInput::mouse(pos)));
        assert!(input.is_double_click());

        input.begin_frame();
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::new();

        input.handle_pointer_event(&PointerEvent::Down(PointerInput::mouse(Point::new(
            100.0, 100.0,
        ))));
        input.handle_pointer_event(&PointerEvent::Up(PointerInput::mouse(Point::new(
            100.0, 100.0,
        ))));
        input.begin_frame();

        input.handle_pointer_event(&PointerEvent::Down(PointerInput::mouse(Point::new(
            200.0, 200.0,
        ))));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_command_modifier() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        let meta = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert!(ctrl.command());
        assert!(meta.command());
        assert!(!Modifiers::default().command());
        assert!(Modifiers::default().is_empty());
    }
}
