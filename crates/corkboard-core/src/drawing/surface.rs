//! Raster surface backing the drawing overlay.
//!
//! RGBA8 pixel buffer with round-dab stroke stamping. The surface is
//! exclusively owned by the drawing engine; the only external read is
//! the PNG export.

use super::brush::{BlendMode, BrushStyle};
use kurbo::Point;

/// A full-pixel copy of the surface, used for undo/redo and for
/// restoring content across resizes.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSnapshot {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// The drawing overlay's raster surface.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    /// RGBA8, row-major.
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read one pixel as (r, g, b, a). Out-of-bounds reads are
    /// transparent.
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        if x >= self.width || y >= self.height {
            return (0, 0, 0, 0);
        }
        let i = ((y * self.width + x) * 4) as usize;
        (
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    /// Fully transparent surface check.
    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Clear all pixels to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Capture the current pixel state.
    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }

    /// Restore a snapshot. A snapshot taken at different dimensions
    /// restores the overlapping region and leaves the rest transparent.
    pub fn restore(&mut self, snapshot: &SurfaceSnapshot) {
        if snapshot.width == self.width && snapshot.height == self.height {
            self.pixels.copy_from_slice(&snapshot.pixels);
            return;
        }
        self.pixels.fill(0);
        let w = self.width.min(snapshot.width) as usize;
        let h = self.height.min(snapshot.height) as usize;
        for row in 0..h {
            let src = row * snapshot.width as usize * 4;
            let dst = row * self.width as usize * 4;
            self.pixels[dst..dst + w * 4].copy_from_slice(&snapshot.pixels[src..src + w * 4]);
        }
    }

    /// Resize the surface, preserving committed content by copying the
    /// overlapping pixel region (no stroke replay).
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        let old = self.snapshot();
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width * height * 4) as usize];
        self.restore(&old);
    }

    /// Stamp a stroke segment from `a` to `b` with round dabs.
    ///
    /// `dash_phase` is the arc length already travelled along the
    /// stroke; the updated phase is returned so dash patterns continue
    /// seamlessly across segments.
    pub fn stroke_segment(
        &mut self,
        a: Point,
        b: Point,
        brush: &BrushStyle,
        dash_phase: f64,
    ) -> f64 {
        let length = a.distance(b);
        let radius = brush.size / 2.0;
        if length < f64::EPSILON {
            if brush.pattern.is_on(dash_phase, brush.size) {
                self.stamp_dab(a, radius, brush);
            }
            return dash_phase;
        }

        // Dab spacing of a quarter radius keeps round brushes solid
        let step = (radius * 0.25).max(0.5);
        let steps = (length / step).ceil() as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let phase = dash_phase + length * t;
            if brush.pattern.is_on(phase, brush.size) {
                self.stamp_dab(a.lerp(b, t), radius, brush);
            }
        }
        dash_phase + length
    }

    /// Stamp one filled disc. Out-of-bounds pixels clip.
    fn stamp_dab(&mut self, center: Point, radius: f64, brush: &BrushStyle) {
        let alpha = brush.source_alpha();
        if alpha == 0 && brush.blend != BlendMode::Erase {
            return;
        }
        let r = radius.max(0.5);
        let x0 = (center.x - r).floor().max(0.0) as u32;
        let y0 = (center.y - r).floor().max(0.0) as u32;
        let x1 = ((center.x + r).ceil() as i64).clamp(0, self.width as i64) as u32;
        let y1 = ((center.y + r).ceil() as i64).clamp(0, self.height as i64) as u32;

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                if dx * dx + dy * dy <= r * r {
                    let i = ((y * self.width + x) * 4) as usize;
                    blend_pixel(&mut self.pixels[i..i + 4], brush, alpha);
                }
            }
        }
    }

    /// Encode the surface as a PNG image.
    pub fn to_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
        }
        Ok(out)
    }
}

/// Composite one source dab pixel onto a destination RGBA slice.
fn blend_pixel(dst: &mut [u8], brush: &BrushStyle, src_alpha: u8) {
    let sa = src_alpha as f64 / 255.0;
    let da = dst[3] as f64 / 255.0;

    if brush.blend == BlendMode::Erase {
        // Destination-out: the dab removes ink
        dst[3] = (da * (1.0 - sa) * 255.0).round() as u8;
        if dst[3] == 0 {
            dst[0] = 0;
            dst[1] = 0;
            dst[2] = 0;
        }
        return;
    }

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        dst.fill(0);
        return;
    }

    let src = [
        brush.color.r as f64,
        brush.color.g as f64,
        brush.color.b as f64,
    ];
    for ch in 0..3 {
        let s = src[ch];
        let d = dst[ch] as f64;
        // Separable blend result; over uncovered destination the source
        // color passes through unblended.
        let blended = match brush.blend {
            BlendMode::SourceOver => s,
            BlendMode::Multiply => (s * d) / 255.0,
            BlendMode::Screen => 255.0 - ((255.0 - s) * (255.0 - d)) / 255.0,
            BlendMode::Erase => unreachable!(),
        };
        let mixed = blended * da + s * (1.0 - da);
        dst[ch] = ((mixed * sa + d * da * (1.0 - sa)) / out_a).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}
