// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimum-area oriented bounding boxes for segment clusters.
//!
//! Candidate orientations come from the directions of the straight pieces
//! in the cluster, folded into a quarter turn. Arcs contribute their
//! endpoints to the extent but never an orientation, so a cluster made only
//! of arcs has no box.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use crate::config::Tolerances;
use crate::curve::Curve;
use crate::types::{Point2D, Segment};

/// Angles closer than this are the same candidate orientation
const ANGLE_EPSILON: f64 = 1e-9;

/// An oriented rectangle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrientedBox {
    pub center: Point2D,
    /// Extent along `angle`
    pub width: f64,
    /// Extent perpendicular to `angle`
    pub depth: f64,
    /// Orientation in radians, in [0, PI/2)
    pub angle: f64,
}

impl OrientedBox {
    pub fn area(&self) -> f64 {
        self.width * self.depth
    }

    /// Corners in counter-clockwise order, starting at the minimum corner of
    /// the rotated frame.
    pub fn corners(&self) -> [Point2D; 4] {
        let rotation = Rotation2::new(self.angle);
        let hw = self.width / 2.0;
        let hd = self.depth / 2.0;
        [(-hw, -hd), (hw, -hd), (hw, hd), (-hw, hd)].map(|(u, v)| {
            let world = rotation * Vector2::new(u, v);
            self.center.offset(world)
        })
    }

    /// The four sides as a closed counter-clockwise loop
    pub fn edges(&self) -> [Segment; 4] {
        let c = self.corners();
        [
            Segment::new(c[0], c[1]),
            Segment::new(c[1], c[2]),
            Segment::new(c[2], c[3]),
            Segment::new(c[3], c[0]),
        ]
    }

    /// Centerline along the longer side
    pub fn axis(&self) -> Segment {
        let rotation = Rotation2::new(self.angle);
        let half = if self.width >= self.depth {
            rotation * Vector2::new(self.width / 2.0, 0.0)
        } else {
            rotation * Vector2::new(0.0, self.depth / 2.0)
        };
        Segment::new(self.center.offset(-half), self.center.offset(half))
    }
}

/// Minimum-area bounding box of a cluster of straight segments.
///
/// Returns `None` for fewer than two segments or when the best box is
/// thinner than `tolerances.min_box_extent` in either direction.
pub fn minimum_area_bounding_box(segments: &[Segment], tolerances: &Tolerances) -> Option<OrientedBox> {
    if segments.len() < 2 {
        return None;
    }
    let points: Vec<Point2D> = segments.iter().flat_map(|s| [s.start, s.end]).collect();
    let angles: Vec<f64> = segments.iter().map(Segment::angle).collect();
    fit_box(&points, &angles, tolerances)
}

/// Minimum-area bounding box of a cluster of curves, taking orientations
/// only from straight pieces.
pub fn minimum_area_bounding_box_curves(curves: &[Curve], tolerances: &Tolerances) -> Option<OrientedBox> {
    if curves.len() < 2 {
        return None;
    }
    let points: Vec<Point2D> = curves.iter().flat_map(Curve::endpoints).collect();
    let angles: Vec<f64> = curves
        .iter()
        .filter(|c| c.is_straight())
        .flat_map(Curve::to_segments)
        .map(|s| s.angle())
        .collect();
    fit_box(&points, &angles, tolerances)
}

fn fit_box(points: &[Point2D], angles: &[f64], tolerances: &Tolerances) -> Option<OrientedBox> {
    let points = distinct_points(points, tolerances.vertex_merge);
    if points.len() < 2 {
        return None;
    }

    let mut best: Option<OrientedBox> = None;
    for angle in candidate_angles(angles) {
        let candidate = box_at_angle(&points, angle);
        if best.map_or(true, |b| candidate.area() < b.area()) {
            best = Some(candidate);
        }
    }

    let best = best?;
    if best.width < tolerances.min_box_extent || best.depth < tolerances.min_box_extent {
        tracing::trace!(width = best.width, depth = best.depth, "Rejected degenerate bounding box");
        return None;
    }
    Some(best)
}

fn distinct_points(points: &[Point2D], tolerance: f64) -> Vec<Point2D> {
    let mut distinct: Vec<Point2D> = Vec::with_capacity(points.len());
    for p in points {
        if !distinct.iter().any(|q| q.almost_eq(p, tolerance)) {
            distinct.push(*p);
        }
    }
    distinct
}

/// Fold each direction into [0, PI/2) and drop duplicates
fn candidate_angles(angles: &[f64]) -> Vec<f64> {
    let mut folded: Vec<f64> = Vec::new();
    for angle in angles {
        let mut a = angle.rem_euclid(FRAC_PI_2);
        if FRAC_PI_2 - a < ANGLE_EPSILON {
            a = 0.0;
        }
        if !folded.iter().any(|f| (f - a).abs() < ANGLE_EPSILON) {
            folded.push(a);
        }
    }
    folded
}

fn box_at_angle(points: &[Point2D], angle: f64) -> OrientedBox {
    let to_local = Rotation2::new(-angle);
    let mut min = Vector2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        let local = to_local * Vector2::new(p.x, p.y);
        min = min.inf(&local);
        max = max.sup(&local);
    }
    let center_local = (min + max) / 2.0;
    let center = Rotation2::new(angle) * center_local;
    OrientedBox {
        center: Point2D::new(center.x, center.y),
        width: max.x - min.x,
        depth: max.y - min.y,
        angle,
    }
}
