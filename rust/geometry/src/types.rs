// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types: points and bounded segments

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::config::EPSILON;

/// A 2D point with an incidental elevation.
///
/// Points have no `PartialEq`; compare them with [`Point2D::almost_eq`]
/// and a tolerance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
    /// Elevation bookkeeping; ignored by every 2D predicate
    #[serde(default)]
    pub z: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        self.vector_to(other).norm()
    }

    /// True if the points are within `tolerance` of each other in XY
    pub fn almost_eq(&self, other: &Point2D, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }

    /// Vector from `self` to `other`
    pub fn vector_to(&self, other: &Point2D) -> Vector2<f64> {
        Vector2::new(other.x - self.x, other.y - self.y)
    }

    /// Translate in XY, keeping the elevation
    pub fn offset(&self, v: Vector2<f64>) -> Self {
        Self::with_z(self.x + v.x, self.y + v.y, self.z)
    }

    pub fn lerp(&self, other: &Point2D, t: f64) -> Self {
        Self::with_z(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

/// A bounded straight segment from `start` to `end`.
///
/// Segments are values: every stage produces new segments instead of editing
/// the ones it was given.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(Point2D::new(x0, y0), Point2D::new(x1, y1))
    }

    /// `end - start`
    pub fn direction(&self) -> Vector2<f64> {
        self.start.vector_to(&self.end)
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    pub fn unit_direction(&self) -> Option<Vector2<f64>> {
        let d = self.direction();
        let len = d.norm();
        if len <= EPSILON {
            None
        } else {
            Some(d / len)
        }
    }

    /// Unit normal pointing to the left of the direction of travel
    pub fn normal(&self) -> Option<Vector2<f64>> {
        self.unit_direction().map(|d| Vector2::new(-d.y, d.x))
    }

    /// Direction angle in radians, in (-PI, PI]
    pub fn angle(&self) -> f64 {
        let d = self.direction();
        d.y.atan2(d.x)
    }

    pub fn midpoint(&self) -> Point2D {
        self.start.lerp(&self.end, 0.5)
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    pub fn point_at(&self, t: f64) -> Point2D {
        self.start.lerp(&self.end, t)
    }

    /// Parameter of the orthogonal projection of `point` onto the supporting
    /// line (0 at `start`, 1 at `end`, unclamped).
    pub fn project(&self, point: &Point2D) -> f64 {
        let d = self.direction();
        let len_sq = d.norm_squared();
        if len_sq <= EPSILON * EPSILON {
            return 0.0;
        }
        self.start.vector_to(point).dot(&d) / len_sq
    }

    /// Distance from `point` to the closest point of the bounded segment
    pub fn distance_to_point(&self, point: &Point2D) -> f64 {
        let t = self.project(point).clamp(0.0, 1.0);
        self.point_at(t).distance_to(point)
    }

    /// Signed perpendicular distance from `point` to the supporting line,
    /// positive on the left.
    pub fn signed_line_distance(&self, point: &Point2D) -> f64 {
        match self.normal() {
            Some(n) => self.start.vector_to(point).dot(&n),
            None => self.start.distance_to(point),
        }
    }

    /// Perpendicular distance from `point` to the supporting (unbounded) line
    pub fn line_distance(&self, point: &Point2D) -> f64 {
        self.signed_line_distance(point).abs()
    }

    pub fn is_degenerate(&self, min_length: f64) -> bool {
        self.length() <= min_length
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let v = Vector2::new(dx, dy);
        Self::new(self.start.offset(v), self.end.offset(v))
    }

    /// Same endpoints within `tolerance`, in either order
    pub fn almost_eq(&self, other: &Segment, tolerance: f64) -> bool {
        (self.start.almost_eq(&other.start, tolerance) && self.end.almost_eq(&other.end, tolerance))
            || (self.start.almost_eq(&other.end, tolerance)
                && self.end.almost_eq(&other.start, tolerance))
    }
}
