//! Snap functionality for aligning points to the grid and to guides.

use kurbo::Point;

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Default distance within which a guide attracts a point.
pub const SNAP_THRESHOLD: f64 = 8.0;

/// Snap mode for aligning drawn points and note corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapMode {
    /// No snapping.
    #[default]
    None,
    /// Snap to grid intersections.
    Grid,
    /// Snap to guide coordinates.
    Guides,
    /// Snap to both grid and guides.
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Guides,
            SnapMode::Guides => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    /// Check if grid snapping is enabled.
    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid | SnapMode::All)
    }

    /// Check if guide snapping is enabled.
    pub fn snaps_to_guides(self) -> bool {
        matches!(self, SnapMode::Guides | SnapMode::All)
    }

    /// Check if any snapping is enabled.
    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Quantize a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Find the nearest guide coordinate within `threshold`, if any.
fn nearest_guide(value: f64, guides: &[f64], threshold: f64) -> Option<f64> {
    guides
        .iter()
        .copied()
        .map(|g| (g, (g - value).abs()))
        .filter(|&(_, d)| d <= threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(g, _)| g)
}

/// Snap a point per the active mode. A guide within `threshold` wins
/// over the grid on its axis; grid quantization is unconditional when
/// enabled (the nearest line is at most half a cell away).
pub fn snap_point(
    point: Point,
    mode: SnapMode,
    grid_size: f64,
    guides_x: &[f64],
    guides_y: &[f64],
    threshold: f64,
) -> SnapResult {
    if !mode.is_enabled() {
        return SnapResult::none(point);
    }

    let mut result = SnapResult::none(point);

    if mode.snaps_to_guides() {
        if let Some(gx) = nearest_guide(point.x, guides_x, threshold) {
            result.point.x = gx;
            result.snapped_x = true;
        }
        if let Some(gy) = nearest_guide(point.y, guides_y, threshold) {
            result.point.y = gy;
            result.snapped_y = true;
        }
    }

    if mode.snaps_to_grid() {
        let grid = snap_to_grid(point, grid_size);
        if !result.snapped_x {
            result.point.x = grid.x;
            result.snapped_x = true;
        }
        if !result.snapped_y {
            result.point.y = grid.y;
            result.snapped_y = true;
        }
    }

    result
}
