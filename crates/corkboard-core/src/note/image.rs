//! Image note variant.

use super::NoteId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image note displaying a pasted or linked raster image.
///
/// The `url` (a data URI or remote URL) is fixed at creation; only
/// position and display dimensions change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageNote {
    pub id: NoteId,
    /// Top-left corner position.
    pub position: Point,
    /// Stacking order among notes.
    pub z_index: i64,
    /// Image source: data URI or remote URL.
    pub url: String,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
}

impl ImageNote {
    /// Create a new image note. Callers pre-fit `size` to the paste
    /// bound; the note stores whatever it is given.
    pub fn new(position: Point, url: String, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            z_index: 0,
            url,
            width: size.width,
            height: size.height,
        }
    }

    /// Bounding box in board coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}
