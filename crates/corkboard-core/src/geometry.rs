//! Pure coordinate math shared by the board and the drawing overlay.

use kurbo::{Point, Size};

/// Minimum width/height any resize operation may produce.
pub const MIN_NOTE_SIZE: f64 = 100.0;

/// Convert a pointer position from screen space to board space, given the
/// board container's origin in screen space.
pub fn relative_position(pointer: Point, container_origin: Point) -> Point {
    Point::new(pointer.x - container_origin.x, pointer.y - container_origin.y)
}

/// Clamp a position so an element of the given size stays fully inside a
/// container. Dragging itself never clamps; this is an opt-in policy for
/// callers that want bounded placement.
pub fn clamp_position(position: Point, container: Size, element: Size) -> Point {
    Point::new(
        position.x.clamp(0.0, (container.width - element.width).max(0.0)),
        position.y.clamp(0.0, (container.height - element.height).max(0.0)),
    )
}

/// Proportionally scale a size down so neither side exceeds `max_side`.
/// Sizes already within the bound are returned unchanged.
pub fn fit_dimensions(size: Size, max_side: f64) -> Size {
    if size.width <= max_side && size.height <= max_side {
        return size;
    }
    let ratio = (max_side / size.width).min(max_side / size.height);
    Size::new(size.width * ratio, size.height * ratio)
}

/// Width-over-height aspect ratio.
pub fn aspect_ratio(size: Size) -> f64 {
    size.width / size.height
}
