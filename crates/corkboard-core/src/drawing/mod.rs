//! Freehand drawing engine for the overlay above the note canvas.
//!
//! Owns the raster surface, brush state, stroke history and the
//! two-touch gesture transform. State machine per overlay instance:
//! Idle (inactive, click-through) / Active-Ready / Drawing / Gesture.

mod brush;
mod gesture;
mod history;
mod surface;

pub use brush::{BlendMode, BrushStyle, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE, StrokePattern};
pub use gesture::{GestureDelta, GestureState};
pub use history::{MAX_UNDO_HISTORY, StrokeHistory};
pub use surface::{Surface, SurfaceSnapshot};

use crate::camera::Camera;
use crate::input::{PointerId, PointerInput};
use crate::snap::{self, SnapMode};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One continuous pointer-down-to-pointer-up drawing gesture.
///
/// Points are overlay-local (post camera transform, post snapping); the
/// brush is snapshotted at stroke start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub brush: BrushStyle,
}

/// In-flight stroke bookkeeping.
#[derive(Debug)]
struct ActiveStroke {
    pointer: PointerId,
    stroke: Stroke,
    last_point: Point,
    dash_phase: f64,
    /// Surface state captured at stroke start; pushed to history on
    /// commit, restored on cancel.
    pre_stroke: SurfaceSnapshot,
}

/// In-flight gesture bookkeeping.
#[derive(Debug)]
struct ActiveGesture {
    ids: (PointerId, PointerId),
    recognizer: GestureState,
    start_camera: Camera,
    /// World point under the gesture start midpoint; stays pinned to
    /// the moving midpoint.
    anchor_world: Point,
}

#[derive(Debug, Default)]
enum EngineState {
    #[default]
    Ready,
    Drawing(ActiveStroke),
    Gesture(ActiveGesture),
}

/// The drawing overlay engine.
#[derive(Debug)]
pub struct DrawingEngine {
    /// Inactive engines ignore all pointer input (overlay is
    /// click-through; the note canvas beneath stays interactive).
    active: bool,
    state: EngineState,
    brush: BrushStyle,
    /// The raster surface; `None` after context loss until the next
    /// [`ensure_surface`](Self::ensure_surface).
    surface: Option<Surface>,
    history: StrokeHistory,
    /// Overlay view transform driven by the two-touch gesture.
    pub camera: Camera,
    snap_mode: SnapMode,
    grid_size: f64,
    guides_x: Vec<f64>,
    guides_y: Vec<f64>,
    snap_threshold: f64,
    /// Screen positions of pointers currently down on the overlay.
    touches: HashMap<PointerId, Point>,
}

impl Default for DrawingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingEngine {
    /// Create an inactive engine with no surface yet.
    pub fn new() -> Self {
        Self {
            active: false,
            state: EngineState::Ready,
            brush: BrushStyle::default(),
            surface: None,
            history: StrokeHistory::new(),
            camera: Camera::new(),
            snap_mode: SnapMode::default(),
            grid_size: snap::GRID_SIZE,
            guides_x: Vec::new(),
            guides_y: Vec::new(),
            snap_threshold: snap::SNAP_THRESHOLD,
            touches: HashMap::new(),
        }
    }

    /// Enable or disable the overlay. Disabling cancels any in-flight
    /// stroke or gesture.
    pub fn set_active(&mut self, active: bool) {
        if !active {
            self.cancel();
            self.touches.clear();
        }
        self.active = active;
    }

    /// Whether the overlay consumes pointer input.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current brush settings.
    pub fn brush(&self) -> &BrushStyle {
        &self.brush
    }

    /// Mutable brush settings. Changes apply to the next stroke; an
    /// in-flight stroke keeps its snapshot.
    pub fn brush_mut(&mut self) -> &mut BrushStyle {
        &mut self.brush
    }

    /// Current snap mode.
    pub fn snap_mode(&self) -> SnapMode {
        self.snap_mode
    }

    pub fn set_snap_mode(&mut self, mode: SnapMode) {
        self.snap_mode = mode;
    }

    /// Replace the guide coordinate lists used for guide snapping.
    pub fn set_guides(&mut self, guides_x: Vec<f64>, guides_y: Vec<f64>) {
        self.guides_x = guides_x;
        self.guides_y = guides_y;
    }

    /// Create the surface if missing (first paint, or recovery after
    /// context loss).
    pub fn ensure_surface(&mut self, width: u32, height: u32) {
        if self.surface.is_none() {
            log::debug!("drawing surface (re)created at {width}x{height}");
            self.surface = Some(Surface::new(width, height));
        }
    }

    /// Drop the surface (context loss). Subsequent drawing input is
    /// silently ignored until [`ensure_surface`](Self::ensure_surface).
    pub fn surface_lost(&mut self) {
        log::warn!("drawing surface lost");
        self.surface = None;
        if let EngineState::Drawing(_) = self.state {
            self.state = EngineState::Ready;
        }
    }

    /// Track a viewport resize, preserving committed raster content.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        match self.surface.as_mut() {
            Some(surface) => surface.resize(width, height),
            None => self.ensure_surface(width, height),
        }
    }

    /// Read access for rendering/tests.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Pointer pressed on the overlay.
    pub fn pointer_down(&mut self, input: &PointerInput) {
        if !self.active {
            return;
        }
        self.touches.insert(input.id, input.position);

        match self.touches.len() {
            1 => self.begin_stroke(input),
            2 => self.begin_gesture(),
            _ => {}
        }
    }

    /// Pointer moved while down.
    pub fn pointer_move(&mut self, input: &PointerInput) {
        if !self.active {
            return;
        }
        if let Some(tracked) = self.touches.get_mut(&input.id) {
            *tracked = input.position;
        }

        match &mut self.state {
            EngineState::Drawing(active) if active.pointer == input.id => {
                let point = self.camera.screen_to_world(input.position);
                let point = snap::snap_point(
                    point,
                    self.snap_mode,
                    self.grid_size,
                    &self.guides_x,
                    &self.guides_y,
                    self.snap_threshold,
                )
                .point;

                if let Some(surface) = self.surface.as_mut() {
                    active.dash_phase = surface.stroke_segment(
                        active.last_point,
                        point,
                        &active.stroke.brush,
                        active.dash_phase,
                    );
                }
                active.stroke.points.push(point);
                active.last_point = point;
            }
            EngineState::Gesture(active) => {
                let (Some(&a), Some(&b)) = (
                    self.touches.get(&active.ids.0),
                    self.touches.get(&active.ids.1),
                ) else {
                    return;
                };
                let delta = active.recognizer.update(a, b);

                let mut camera = active.start_camera.clone();
                camera.zoom =
                    (active.start_camera.zoom * delta.scale).clamp(camera.min_zoom, camera.max_zoom);
                camera.rotation = active.start_camera.rotation + delta.rotation;
                // Keep the anchor world point under the moving midpoint
                let screen = camera.world_to_screen(active.anchor_world);
                camera.offset += delta.midpoint - screen;
                self.camera = camera;
            }
            _ => {}
        }
    }

    /// Pointer released. Returns the committed stroke, if this release
    /// finalized one.
    pub fn pointer_up(&mut self, input: &PointerInput) -> Option<Stroke> {
        if !self.active {
            return None;
        }
        self.touches.remove(&input.id);

        match std::mem::take(&mut self.state) {
            EngineState::Drawing(active) if active.pointer == input.id => {
                self.history.record(active.pre_stroke);
                Some(active.stroke)
            }
            EngineState::Drawing(active) => {
                self.state = EngineState::Drawing(active);
                None
            }
            EngineState::Gesture(active) => {
                if self.touches.len() >= 2 {
                    self.state = EngineState::Gesture(active);
                }
                None
            }
            EngineState::Ready => None,
        }
    }

    /// The platform lost a pointer; equivalent to cancel for a stroke.
    pub fn pointer_cancel(&mut self, id: PointerId) {
        if !self.active {
            return;
        }
        self.touches.remove(&id);

        let stroke_lost =
            matches!(&self.state, EngineState::Drawing(active) if active.pointer == id);
        if stroke_lost {
            self.cancel();
        } else if matches!(self.state, EngineState::Gesture(_)) && self.touches.len() < 2 {
            self.state = EngineState::Ready;
        }
    }

    /// Cancel the in-flight stroke or gesture (Escape). An escaped
    /// stroke is erased from the surface and never enters history.
    pub fn cancel(&mut self) {
        match std::mem::take(&mut self.state) {
            EngineState::Drawing(active) => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.restore(&active.pre_stroke);
                }
            }
            EngineState::Gesture(_) | EngineState::Ready => {}
        }
    }

    /// Undo the most recent committed stroke. Returns true if a
    /// snapshot was restored.
    pub fn undo(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        match self.history.undo(surface.snapshot()) {
            Some(snapshot) => {
                surface.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone stroke.
    pub fn redo(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        match self.history.redo(surface.snapshot()) {
            Some(snapshot) => {
                surface.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Export the surface as PNG bytes. `None` when the surface is
    /// unavailable or encoding fails (logged, never fatal).
    pub fn export_png(&self) -> Option<Vec<u8>> {
        let surface = self.surface.as_ref()?;
        match surface.to_png() {
            Ok(data) => Some(data),
            Err(err) => {
                log::error!("PNG export failed: {err}");
                None
            }
        }
    }

    fn begin_stroke(&mut self, input: &PointerInput) {
        let Some(surface) = self.surface.as_ref() else {
            log::debug!("stroke ignored: no drawing surface");
            return;
        };
        if !matches!(self.state, EngineState::Ready) {
            return;
        }

        let point = self.camera.screen_to_world(input.position);
        let point = snap::snap_point(
            point,
            self.snap_mode,
            self.grid_size,
            &self.guides_x,
            &self.guides_y,
            self.snap_threshold,
        )
        .point;

        self.state = EngineState::Drawing(ActiveStroke {
            pointer: input.id,
            stroke: Stroke {
                points: vec![point],
                brush: self.brush,
            },
            last_point: point,
            dash_phase: 0.0,
            pre_stroke: surface.snapshot(),
        });
    }

    fn begin_gesture(&mut self) {
        // A second touch interrupts drawing: the half-stroke is
        // discarded exactly like Escape.
        if matches!(self.state, EngineState::Drawing(_)) {
            self.cancel();
        }

        let mut ids: Vec<PointerId> = self.touches.keys().copied().collect();
        ids.sort();
        let (Some(&first), Some(&second)) = (ids.first(), ids.get(1)) else {
            return;
        };
        let (a, b) = (self.touches[&first], self.touches[&second]);

        let midpoint = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        self.state = EngineState::Gesture(ActiveGesture {
            ids: (first, second),
            recognizer: GestureState::begin(a, b),
            start_camera: self.camera.clone(),
            anchor_world: self.camera.screen_to_world(midpoint),
        });
    }
}
