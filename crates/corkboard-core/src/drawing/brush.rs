//! Brush styling for freehand strokes.

use crate::note::Rgba;
use serde::{Deserialize, Serialize};

/// Smallest accepted brush size.
pub const MIN_BRUSH_SIZE: f64 = 0.5;
/// Largest accepted brush size.
pub const MAX_BRUSH_SIZE: f64 = 200.0;

/// Dash pattern applied along a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokePattern {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokePattern {
    /// Cycle to the next pattern.
    pub fn next(self) -> Self {
        match self {
            StrokePattern::Solid => StrokePattern::Dashed,
            StrokePattern::Dashed => StrokePattern::Dotted,
            StrokePattern::Dotted => StrokePattern::Solid,
        }
    }

    /// Whether ink is laid down at `phase` pixels along the stroke, for
    /// a brush of the given size.
    pub fn is_on(self, phase: f64, size: f64) -> bool {
        match self {
            StrokePattern::Solid => true,
            StrokePattern::Dashed => {
                let period = size * 4.0;
                phase.rem_euclid(period) < period * 0.5
            }
            StrokePattern::Dotted => {
                let period = size * 2.5;
                phase.rem_euclid(period) < size
            }
        }
    }
}

/// Compositing operation for stamped ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Normal alpha compositing.
    #[default]
    SourceOver,
    /// Darkening multiply blend.
    Multiply,
    /// Lightening screen blend.
    Screen,
    /// Removes ink (destination-out), the eraser mode.
    Erase,
}

/// Brush style applied to strokes.
///
/// A stroke snapshots the style at pointer-down, so changing the brush
/// mid-stroke never alters ink already being laid down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushStyle {
    pub color: Rgba,
    /// Diameter in surface pixels.
    pub size: f64,
    /// Global alpha in [0, 1].
    pub opacity: f64,
    pub pattern: StrokePattern,
    pub blend: BlendMode,
}

impl Default for BrushStyle {
    fn default() -> Self {
        Self {
            color: Rgba::black(),
            size: 2.0,
            opacity: 1.0,
            pattern: StrokePattern::default(),
            blend: BlendMode::default(),
        }
    }
}

impl BrushStyle {
    /// Set the brush size, clamped to the accepted range. Invalid input
    /// is clamped, never an error.
    pub fn set_size(&mut self, size: f64) {
        self.size = if size.is_finite() {
            size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
        } else {
            MIN_BRUSH_SIZE
        };
    }

    /// Set the opacity, clamped to [0, 1].
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    /// Effective source alpha in [0, 255].
    pub fn source_alpha(&self) -> u8 {
        (self.color.a as f64 * self.opacity).round() as u8
    }
}
