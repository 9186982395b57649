#![forbid(unsafe_code)]

//! Geometric primitives and the pure point transforms used by the ROI and
//! gesture code.
//!
//! Coordinates follow the screen convention: origin at top-left, `y` grows
//! downward. Angles are in degrees; a positive angle rotates clockwise on
//! screen.

/// A point in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(f64::from(x), f64::from(y))
    }
}

/// An axis-aligned rectangle in integer screen space.
///
/// Used both for an entity's untransformed base rectangle and for the
/// invalidation square handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub const fn right(&self) -> i32 {
        self.left.saturating_add(self.width)
    }

    /// Bottom edge.
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height)
    }

    /// Check if the rectangle has zero or negative area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Geometric centre.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            f64::from(self.left) + f64::from(self.width) / 2.0,
            f64::from(self.top) + f64::from(self.height) / 2.0,
        )
    }

    /// Closed containment test: points on any edge are inside.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Rotate `p` by `degrees` about `pivot`.
///
/// A zero angle returns `p` untouched so that identity transforms stay exact.
#[must_use]
pub fn rotate_about(p: Point, pivot: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return p;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    Point::new(
        pivot.x + (cos * dx - sin * dy),
        pivot.y + (sin * dx + cos * dy),
    )
}

/// Scale `p` away from `pivot` by independent factors on each axis.
#[must_use]
pub fn scale_about(p: Point, pivot: Point, sx: f64, sy: f64) -> Point {
    Point::new(
        pivot.x + (p.x - pivot.x) * sx,
        pivot.y + (p.y - pivot.y) * sy,
    )
}

/// Signed orientation of `p` relative to the directed line `origin -> end`.
///
/// Computes `(y - y0)(x1 - x0) - (x - x0)(y1 - y0)`. Zero means `p` lies on
/// the line; in y-down screen space a non-negative value means `p` is on the
/// inner side of a clockwise-wound polygon edge.
#[inline]
#[must_use]
pub fn orientation(origin: Point, end: Point, p: Point) -> f64 {
    (p.y - origin.y) * (end.x - origin.x) - (p.x - origin.x) * (end.y - origin.y)
}

/// Euclidean distance between two points.
#[inline]
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Inclination in degrees of the segment `a -> b`.
///
/// Vertical segments are exactly 90°. Everything else is `atan(dy / dx)`,
/// so the result lies in (-90°, 90°) and is periodic over 180°.
#[must_use]
pub fn inclination(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    if dx == 0.0 {
        return 90.0;
    }
    ((b.y - a.y) / dx).atan().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn rect_edges_and_center() {
        let rect = Rect::new(100, 100, 200, 50);
        assert_eq!(rect.right(), 300);
        assert_eq!(rect.bottom(), 150);
        assert_eq!(rect.center(), Point::new(200.0, 125.0));
        assert!(!rect.is_empty());
        assert!(Rect::new(0, 0, 0, 10).is_empty());
    }

    #[test]
    fn rect_contains_is_closed() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(6, 8));
        assert!(!rect.contains(7, 3));
        assert!(!rect.contains(2, 9));
        assert!(!rect.contains(1, 4));
    }

    #[test]
    fn rotate_quarter_turn_is_clockwise_on_screen() {
        let pivot = Point::new(0.0, 0.0);
        // +x axis rotated 90° lands on +y, which points down the screen.
        assert_close(
            rotate_about(Point::new(10.0, 0.0), pivot, 90.0),
            Point::new(0.0, 10.0),
        );
    }

    #[test]
    fn rotate_zero_is_exact() {
        let p = Point::new(3.25, -7.5);
        assert_eq!(rotate_about(p, Point::new(100.0, 100.0), 0.0), p);
    }

    #[test]
    fn rotate_round_trip() {
        let pivot = Point::new(50.0, 75.0);
        let p = Point::new(13.0, 200.0);
        let there = rotate_about(p, pivot, 37.5);
        assert_close(rotate_about(there, pivot, -37.5), p);
    }

    #[test]
    fn scale_about_pivot() {
        let pivot = Point::new(10.0, 10.0);
        assert_close(
            scale_about(Point::new(20.0, 0.0), pivot, 2.0, 0.5),
            Point::new(30.0, 5.0),
        );
        assert_eq!(scale_about(pivot, pivot, 3.0, 3.0), pivot);
    }

    #[test]
    fn orientation_sign() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        // Below the line (y-down) is the inner side of a clockwise edge.
        assert!(orientation(a, b, Point::new(5.0, 5.0)) > 0.0);
        assert!(orientation(a, b, Point::new(5.0, -5.0)) < 0.0);
        assert_eq!(orientation(a, b, Point::new(5.0, 0.0)), 0.0);
    }

    #[test]
    fn distance_and_inclination() {
        let a = Point::new(100.0, 150.0);
        assert_eq!(distance(a, Point::new(300.0, 150.0)), 200.0);
        assert_eq!(inclination(a, Point::new(300.0, 150.0)), 0.0);
        assert_eq!(inclination(a, Point::new(100.0, 400.0)), 90.0);
        assert_eq!(inclination(a, Point::new(100.0, -400.0)), 90.0);
        assert!((inclination(a, Point::new(200.0, 250.0)) - 45.0).abs() < EPS);
        assert!((inclination(a, Point::new(0.0, 250.0)) + 45.0).abs() < EPS);
    }
}
