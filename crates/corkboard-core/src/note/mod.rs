//! Note definitions for the board.

mod image;
mod shape;
mod text;

pub use image::ImageNote;
pub use shape::{ShapeKind, ShapeNote};
pub use text::TextNote;

use kurbo::{Point, Rect, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for notes.
pub type NoteId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a hex color string (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    /// Anything unparseable falls back to black.
    pub fn from_hex(color: &str) -> Self {
        let Some(hex) = color.strip_prefix('#') else {
            return Self::black();
        };
        let hex = hex.trim();
        if !hex.is_ascii() {
            return Self::black();
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).unwrap_or(0) * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).unwrap_or(0) * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).unwrap_or(0) * 17;
                Self::new(r, g, b, 255)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                Self::new(r, g, b, 255)
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);
                Self::new(r, g, b, a)
            }
            _ => Self::black(),
        }
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Enum wrapper over all note variants (the persistence wire format).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Note {
    Text(TextNote),
    Image(ImageNote),
    Shape(ShapeNote),
}

impl Note {
    pub fn id(&self) -> NoteId {
        match self {
            Note::Text(n) => n.id,
            Note::Image(n) => n.id,
            Note::Shape(n) => n.id,
        }
    }

    /// Top-left corner in board coordinates.
    pub fn position(&self) -> Point {
        match self {
            Note::Text(n) => n.position,
            Note::Image(n) => n.position,
            Note::Shape(n) => n.position,
        }
    }

    pub fn set_position(&mut self, position: Point) {
        match self {
            Note::Text(n) => n.position = position,
            Note::Image(n) => n.position = position,
            Note::Shape(n) => n.position = position,
        }
    }

    pub fn z_index(&self) -> i64 {
        match self {
            Note::Text(n) => n.z_index,
            Note::Image(n) => n.z_index,
            Note::Shape(n) => n.z_index,
        }
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        match self {
            Note::Text(n) => n.z_index = z_index,
            Note::Image(n) => n.z_index = z_index,
            Note::Shape(n) => n.z_index = z_index,
        }
    }

    /// Current display size.
    pub fn size(&self) -> Size {
        match self {
            Note::Text(n) => Size::new(n.width, n.height()),
            Note::Image(n) => Size::new(n.width, n.height),
            Note::Shape(n) => Size::new(n.width, n.height),
        }
    }

    /// Bounding box in board coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Note::Text(n) => n.bounds(),
            Note::Image(n) => n.bounds(),
            Note::Shape(n) => n.bounds(),
        }
    }

    /// Check if a board-space point hits this note.
    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            Note::Text(n) => n.bounds().contains(point),
            Note::Image(n) => n.bounds().contains(point),
            Note::Shape(n) => n.hit_test(point),
        }
    }

    /// Aspect ratio to lock during resize, if this variant locks one.
    /// Only image notes preserve their ratio.
    pub fn locked_aspect_ratio(&self) -> Option<f64> {
        match self {
            Note::Image(n) => Some(n.width / n.height),
            Note::Text(_) | Note::Shape(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgba::from_hex("#000000"), Rgba::black());
        assert_eq!(Rgba::from_hex("#ffffff"), Rgba::white());
        assert_eq!(Rgba::from_hex("#f00"), Rgba::new(255, 0, 0, 255));
        assert_eq!(Rgba::from_hex("#00ff0080"), Rgba::new(0, 255, 0, 128));
        // Unparseable input falls back to black
        assert_eq!(Rgba::from_hex("red"), Rgba::black());
    }

    #[test]
    fn test_peniko_roundtrip() {
        let rgba = Rgba::new(12, 34, 56, 78);
        let color: Color = rgba.into();
        let back: Rgba = color.into();
        assert_eq!(rgba, back);
    }

    #[test]
    fn test_note_dispatch() {
        let mut note = Note::Text(TextNote::new(Point::new(10.0, 20.0), "hi".to_string()));
        assert_eq!(note.position(), Point::new(10.0, 20.0));
        assert_eq!(note.z_index(), 0);

        note.set_position(Point::new(30.0, 40.0));
        note.set_z_index(5);
        assert_eq!(note.position(), Point::new(30.0, 40.0));
        assert_eq!(note.z_index(), 5);
    }

    #[test]
    fn test_wire_format_roundtrip() {
        let note = Note::Shape(ShapeNote::new(
            Point::new(1.0, 2.0),
            ShapeKind::Circle,
            Size::new(120.0, 120.0),
            Rgba::from_hex("#ff0000"),
        ));
        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("\"type\":\"shape\""));
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), note.id());
        assert_eq!(back.position(), note.position());
    }

    #[test]
    fn test_only_images_lock_aspect() {
        let image = Note::Image(ImageNote::new(
            Point::ZERO,
            "data:image/png;base64,".to_string(),
            Size::new(300.0, 200.0),
        ));
        let text = Note::Text(TextNote::new(Point::ZERO, "x".to_string()));
        assert!((image.locked_aspect_ratio().unwrap() - 1.5).abs() < 1e-9);
        assert!(text.locked_aspect_ratio().is_none());
    }
}
