// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment predicates: parallelism, intersection classification,
//! projected overlap ("shadowing"), spacing and wall axes.

use serde::{Deserialize, Serialize};

use crate::config::EPSILON;
use crate::types::{Point2D, Segment};

/// How two bounded segments relate to each other.
///
/// Everything except [`SegmentRelation::Disjoint`] counts as intersecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentRelation {
    /// No common point
    Disjoint,
    /// A single common point: a crossing, a T-junction or two segments that
    /// touch end to end
    PointOverlap,
    /// Collinear with a partial overlap of positive length
    CollinearOverlap,
    /// The first segment contains the second
    Contains,
    /// The first segment is contained by the second
    ContainedBy,
    /// Same endpoints (in either order)
    Equal,
}

impl SegmentRelation {
    pub fn is_intersecting(self) -> bool {
        self != SegmentRelation::Disjoint
    }
}

/// True if the directions of `a` and `b` are equal or opposite within
/// `angle_tolerance` radians. Degenerate segments are never parallel.
pub fn are_parallel(a: &Segment, b: &Segment, angle_tolerance: f64) -> bool {
    match (a.unit_direction(), b.unit_direction()) {
        (Some(da), Some(db)) => da.perp(&db).abs() <= angle_tolerance.sin(),
        _ => false,
    }
}

/// True if `a` and `b` lie on a common line: each endpoint of either is
/// within `tolerance` of the other's supporting line.
pub fn are_collinear(a: &Segment, b: &Segment, tolerance: f64) -> bool {
    if a.is_degenerate(EPSILON) || b.is_degenerate(EPSILON) {
        return false;
    }
    a.line_distance(&b.start) <= tolerance
        && a.line_distance(&b.end) <= tolerance
        && b.line_distance(&a.start) <= tolerance
        && b.line_distance(&a.end) <= tolerance
}

/// Position of `b`'s endpoints along `a`, in length units from `a.start`,
/// sorted ascending.
pub(crate) fn projected_interval(a: &Segment, b: &Segment) -> (f64, f64) {
    let len = a.length();
    let s0 = a.project(&b.start) * len;
    let s1 = a.project(&b.end) * len;
    (s0.min(s1), s0.max(s1))
}

/// Classify the relationship between two segments.
///
/// `tolerance` is a length: endpoints closer than it to the other segment
/// count as touching, and collinear overlaps shorter than it count as a
/// single shared point.
pub fn intersect(a: &Segment, b: &Segment, tolerance: f64) -> SegmentRelation {
    let la = a.length();
    let lb = b.length();
    if la <= EPSILON || lb <= EPSILON {
        return SegmentRelation::Disjoint;
    }

    if are_collinear(a, b, tolerance) {
        return classify_collinear(a, b, la, tolerance);
    }

    match line_parameters(a, b) {
        Some((t, u)) => {
            let ta = tolerance / la;
            let tb = tolerance / lb;
            if t >= -ta && t <= 1.0 + ta && u >= -tb && u <= 1.0 + tb {
                SegmentRelation::PointOverlap
            } else {
                SegmentRelation::Disjoint
            }
        }
        // Parallel and apart
        None => SegmentRelation::Disjoint,
    }
}

fn classify_collinear(a: &Segment, b: &Segment, la: f64, tolerance: f64) -> SegmentRelation {
    let (bmin, bmax) = projected_interval(a, b);
    let overlap = la.min(bmax) - bmin.max(0.0);

    if overlap < -tolerance {
        return SegmentRelation::Disjoint;
    }
    if overlap <= tolerance {
        return SegmentRelation::PointOverlap;
    }

    let same_start = bmin.abs() <= tolerance;
    let same_end = (bmax - la).abs() <= tolerance;
    if same_start && same_end {
        SegmentRelation::Equal
    } else if bmin >= -tolerance && bmax <= la + tolerance {
        SegmentRelation::Contains
    } else if bmin <= tolerance && bmax >= la - tolerance {
        SegmentRelation::ContainedBy
    } else {
        SegmentRelation::CollinearOverlap
    }
}

/// Parameters `(t, u)` where the supporting lines of `a` and `b` cross:
/// `a.point_at(t) == b.point_at(u)`. `None` for parallel lines.
pub fn line_parameters(a: &Segment, b: &Segment) -> Option<(f64, f64)> {
    let da = a.direction();
    let db = b.direction();
    let denom = da.perp(&db);
    if denom.abs() <= EPSILON * da.norm() * db.norm() {
        return None;
    }
    let w = a.start.vector_to(&b.start);
    Some((w.perp(&db) / denom, w.perp(&da) / denom))
}

/// Point where the supporting lines of `a` and `b` cross
pub fn line_intersection(a: &Segment, b: &Segment) -> Option<Point2D> {
    line_parameters(a, b).map(|(t, _)| a.point_at(t))
}

/// True if the point lies on the bounded segment within `tolerance`
pub fn point_on_segment(point: &Point2D, segment: &Segment, tolerance: f64) -> bool {
    segment.distance_to_point(point) <= tolerance
}

/// True if the orthogonal projection of the shorter segment onto the longer
/// segment's supporting line overlaps the longer segment by more than
/// `tolerance`.
///
/// Two parallel shadowing segments are candidates for the opposite faces of
/// one wall.
pub fn is_shadowing(a: &Segment, b: &Segment, tolerance: f64) -> bool {
    let (longer, shorter) = if a.length() >= b.length() { (a, b) } else { (b, a) };
    let len = longer.length();
    if len <= EPSILON || shorter.length() <= EPSILON {
        return false;
    }
    let (smin, smax) = projected_interval(longer, shorter);
    len.min(smax) - smin.max(0.0) > tolerance
}

/// Perpendicular distance from the midpoint of `b` to the supporting line of `a`
pub fn spacing(a: &Segment, b: &Segment) -> f64 {
    a.line_distance(&b.midpoint())
}

/// Midline between two parallel wall-face segments.
///
/// The longer segment is shifted towards the other by half their
/// perpendicular spacing, so the axis spans the full wall even when one face
/// is interrupted by openings. Returns `None` if the spacing is within
/// `tolerance` of zero (coincident faces). The inputs are assumed parallel.
pub fn generate_axis(a: &Segment, b: &Segment, tolerance: f64) -> Option<Segment> {
    let (base, other) = if a.length() >= b.length() { (a, b) } else { (b, a) };
    let normal = base.normal()?;
    let offset = base.signed_line_distance(&other.midpoint());
    if offset.abs() <= tolerance {
        return None;
    }
    let shift = normal * (offset / 2.0);
    Some(Segment::new(base.start.offset(shift), base.end.offset(shift)))
}
