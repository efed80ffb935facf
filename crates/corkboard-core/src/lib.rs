//! Corkboard Core Library
//!
//! Platform-agnostic data structures and interaction logic for the
//! Corkboard collaborative note board: the note entity store, the
//! drag/resize pointer controller and the freehand drawing engine.

pub mod camera;
pub mod drawing;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod note;
pub mod snap;
pub mod storage;
pub mod store;

pub use camera::Camera;
pub use drawing::{BlendMode, BrushStyle, DrawingEngine, Stroke, StrokePattern, Surface};
pub use geometry::MIN_NOTE_SIZE;
pub use input::{InputState, Modifiers, PointerEvent, PointerId, PointerInput, PointerKind};
pub use interaction::{InteractionController, InteractionUpdate};
pub use note::{ImageNote, Note, NoteId, Rgba, ShapeKind, ShapeNote, TextNote};
pub use snap::{GRID_SIZE, SnapMode, SnapResult, snap_point, snap_to_grid};
pub use store::{NotePatch, NoteStore, SubscriptionId};
