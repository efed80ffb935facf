//! Two-touch gesture recognition (pan/zoom/rotate).

use kurbo::{Point, Vec2};

/// Minimum touch separation for a meaningful scale/rotation reading.
const MIN_TOUCH_DISTANCE: f64 = 1.0;

/// Captured start conditions of a two-touch gesture.
#[derive(Debug, Clone, Copy)]
pub struct GestureState {
    start_distance: f64,
    start_angle: f64,
    start_midpoint: Point,
}

/// Transform delta relative to gesture start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDelta {
    /// Distance ratio (1.0 = unchanged).
    pub scale: f64,
    /// Angle change in radians, wrapped to (-pi, pi].
    pub rotation: f64,
    /// Midpoint movement in screen coordinates.
    pub translation: Vec2,
    /// Current touch midpoint (anchor for scale/rotation).
    pub midpoint: Point,
}

impl GestureState {
    /// Capture the gesture start from two touch points.
    pub fn begin(a: Point, b: Point) -> Self {
        Self {
            start_distance: a.distance(b),
            start_angle: angle_between(a, b),
            start_midpoint: midpoint(a, b),
        }
    }

    /// Compute the delta for the current touch positions.
    pub fn update(&self, a: Point, b: Point) -> GestureDelta {
        let distance = a.distance(b);
        let scale = if self.start_distance < MIN_TOUCH_DISTANCE || distance < MIN_TOUCH_DISTANCE {
            1.0
        } else {
            distance / self.start_distance
        };

        let rotation = wrap_angle(angle_between(a, b) - self.start_angle);
        let mid = midpoint(a, b);

        GestureDelta {
            scale,
            rotation,
            translation: mid - self.start_midpoint,
            midpoint: mid,
        }
    }
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn angle_between(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Wrap an angle to (-pi, pi].
fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::PI;
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}
