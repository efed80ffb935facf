//! Shape note variant.

use super::{NoteId, Rgba};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The geometric kind of a shape note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Square,
    Circle,
    Triangle,
}

/// A filled geometric shape placed on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeNote {
    pub id: NoteId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    /// Stacking order among notes.
    pub z_index: i64,
    pub kind: ShapeKind,
    pub width: f64,
    pub height: f64,
    pub color: Rgba,
}

impl ShapeNote {
    /// Create a new shape note.
    pub fn new(position: Point, kind: ShapeKind, size: Size, color: Rgba) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            z_index: 0,
            kind,
            width: size.width,
            height: size.height,
            color,
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

    /// Check if a board-space point is inside the shape itself (not just
    /// the bounding box).
    pub fn hit_test(&self, point: Point) -> bool {
        let bounds = self.bounds();
        if !bounds.contains(point) {
            return false;
        }
        match self.kind {
            ShapeKind::Square => true,
            ShapeKind::Circle => {
                let center = bounds.center();
                let rx = self.width / 2.0;
                let ry = self.height / 2.0;
                let nx = (point.x - center.x) / rx;
                let ny = (point.y - center.y) / ry;
                nx * nx + ny * ny <= 1.0
            }
            ShapeKind::Triangle => {
                let apex = Point::new(bounds.x0 + self.width / 2.0, bounds.y0);
                let left = Point::new(bounds.x0, bounds.y1);
                let right = Point::new(bounds.x1, bounds.y1);
                point_in_triangle(point, apex, left, right)
            }
        }
    }
}

/// Sign-based point-in-triangle test.
fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let sign = |p1: Point, p2: Point, p3: Point| -> f64 {
        (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
    };
    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
