#![forbid(unsafe_code)]

//! Region of interest: the quadrilateral an entity actually occupies on
//! screen once its rotation, scale and translation are applied.
//!
//! The ROI is derived, never stored. [`Roi::from_transform`] is a pure
//! function of the base rectangle and affine state, so callers that
//! recompute it after each mutation can never observe a stale region.

use crate::entity::AffineState;
use crate::geometry::{Point, Rect, distance, orientation, rotate_about, scale_about};

/// The four transformed corners of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roi {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
}

impl Roi {
    /// Derive the ROI of `base` under `state`.
    ///
    /// The base rectangle is first translated by `(tx, ty)`. Each corner is
    /// then rotated about the translated centre and afterwards scaled about
    /// that same pivot.
    #[must_use]
    pub fn from_transform(base: Rect, state: &AffineState) -> Self {
        let left = f64::from(base.left) + state.tx;
        let top = f64::from(base.top) + state.ty;
        let right = left + f64::from(base.width);
        let bottom = top + f64::from(base.height);
        let pivot = Point::new(
            left + f64::from(base.width) / 2.0,
            top + f64::from(base.height) / 2.0,
        );

        let corner = |x: f64, y: f64| {
            let rotated = rotate_about(Point::new(x, y), pivot, state.angle);
            scale_about(rotated, pivot, state.sx, state.sy)
        };

        Self {
            top_left: corner(left, top),
            top_right: corner(right, top),
            bottom_left: corner(left, bottom),
            bottom_right: corner(right, bottom),
        }
    }

    /// Corners in traversal order: top-left, top-right, bottom-right,
    /// bottom-left.
    #[inline]
    #[must_use]
    pub const fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Closed point-in-quad test.
    ///
    /// Walks the edges TL → TR → BR → BL → TL and requires `p` to be on the
    /// inner side of (or on) every one of them.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let p = Point::new(x, y);
        let corners = self.corners();
        (0..corners.len()).all(|i| {
            let origin = corners[i];
            let end = corners[(i + 1) % corners.len()];
            orientation(origin, end, p) >= 0.0
        })
    }

    /// Centre of the quad (mean of the corners).
    #[must_use]
    pub fn centroid(&self) -> Point {
        let corners = self.corners();
        let (sx, sy) = corners
            .iter()
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
        Point::new(sx / 4.0, sy / 4.0)
    }

    /// Square that contains the drawing at any rotation.
    ///
    /// Centred on the quad, with a half-side equal to the length of the left
    /// edge (bottom-left minus top-left).
    #[must_use]
    pub fn invalidation_bounds(&self) -> Rect {
        let half = distance(self.top_left, self.bottom_left) as i32;
        let center = self.centroid();
        let cx = center.x as i32;
        let cy = center.y as i32;
        Rect::new(
            cx.saturating_sub(half),
            cy.saturating_sub(half),
            half.saturating_mul(2),
            half.saturating_mul(2),
        )
    }
}
