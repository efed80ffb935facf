//! Text note variant.

use super::NoteId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default width for newly created text notes.
pub const DEFAULT_TEXT_WIDTH: f64 = 200.0;

/// Line height used to estimate intrinsic text height.
const LINE_HEIGHT: f64 = 24.0;

/// A sticky text note. Width is resizable; height follows the content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextNote {
    pub id: NoteId,
    /// Top-left corner position.
    pub position: Point,
    /// Stacking order among notes.
    pub z_index: i64,
    /// The note text.
    pub content: String,
    /// Display width; height is intrinsic.
    pub width: f64,
}

impl TextNote {
    /// Create a new text note at the given position.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            z_index: 0,
            content,
            width: DEFAULT_TEXT_WIDTH,
        }
    }

    /// Intrinsic height derived from the content's line count.
    pub fn height(&self) -> f64 {
        let lines = self.content.lines().count().max(1);
        lines as f64 * LINE_HEIGHT
    }

    /// Bounding box in board coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height(),
        )
    }
}
