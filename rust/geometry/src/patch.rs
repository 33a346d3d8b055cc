// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gap closing: fuse broken collinear runs and patch corners and
//! T-junctions whose segments stop just short of each other.
//!
//! Corner patching is a heuristic. When several candidates compete for the
//! same endpoint (three or more walls meeting near one corner), the closest
//! pairing wins and each endpoint is moved at most once; the result is not
//! guaranteed to be a valid topology for every junction.

use std::cmp::Ordering;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::cluster::cluster_by_proximity;
use crate::config::{check_tolerance, Tolerances, EPSILON, LINEAR_EPSILON};
use crate::error::Result;
use crate::predicates::{are_parallel, intersect, line_parameters};
use crate::types::{Point2D, Segment};

/// One end of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum End {
    Start,
    End,
}

impl End {
    fn of(self, segment: &Segment) -> Point2D {
        match self {
            End::Start => segment.start,
            End::End => segment.end,
        }
    }

    fn set(self, segment: &mut Segment, point: Point2D) {
        match self {
            End::Start => segment.start = point,
            End::End => segment.end = point,
        }
    }
}

/// A proposed endpoint move
#[derive(Debug, Clone, Copy)]
enum Patch {
    /// Two endpoints that both fall short of the crossing of their lines
    Corner {
        first: (usize, End),
        second: (usize, End),
        target: Point2D,
    },
    /// An endpoint that falls short of (or overshoots) the body of another segment
    Tee { end: (usize, End), target: Point2D },
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    pair: (usize, usize),
    patch: Patch,
}

/// Order points by X, treating X values within `tolerance` as equal and
/// falling back to Y.
fn compare_xy(a: &Point2D, b: &Point2D, tolerance: f64) -> Ordering {
    if (a.x - b.x).abs() <= tolerance {
        a.y.total_cmp(&b.y)
    } else {
        a.x.total_cmp(&b.x)
    }
}

/// Fuse a group of collinear segments into the segment spanning its extreme
/// endpoints (lowest and highest in X-then-Y order).
pub fn fuse_collinear(group: &[Segment], tolerance: f64) -> Option<Segment> {
    let points = group.iter().flat_map(|s| [s.start, s.end]);
    let first = points.clone().min_by(|a, b| compare_xy(a, b, tolerance))?;
    let last = points.max_by(|a, b| compare_xy(a, b, tolerance))?;
    Some(Segment::new(first, last))
}

/// Fuse collinear segments separated by breaks of at most `gap`.
///
/// Each proximity cluster with more than one member is replaced by a single
/// segment spanning its extreme points; singletons pass through unchanged.
pub fn close_gap_at_breakpoint(
    segments: &[Segment],
    gap: f64,
    angle_tolerance: f64,
) -> Result<Vec<Segment>> {
    let groups = cluster_by_proximity(segments, gap, angle_tolerance)?;
    let mut fused = 0usize;
    let out: Vec<Segment> = groups
        .iter()
        .filter_map(|group| {
            if group.len() == 1 {
                Some(group[0])
            } else {
                fused += group.len();
                fuse_collinear(group, gap)
            }
        })
        .collect();

    tracing::debug!(
        input = segments.len(),
        output = out.len(),
        fused,
        "Closed gaps at breakpoints"
    );
    Ok(out)
}

/// Extend segments that stop within `corner` of meeting another segment.
///
/// Two kinds of near-miss are repaired:
/// * a corner, where both segments stop short of the crossing of their
///   lines: both are extended (or trimmed) to the crossing;
/// * a T-junction, where one segment's end stops short of the other's body:
///   that end is moved onto the other segment.
///
/// Segments that already intersect and parallel pairs are left alone.
pub fn close_gap_at_corner(
    segments: &[Segment],
    corner: f64,
    angle_tolerance: f64,
) -> Result<Vec<Segment>> {
    check_tolerance("corner", corner)?;
    check_tolerance("parallel_angle", angle_tolerance)?;

    let mut candidates = Vec::new();
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            collect_candidates(segments, i, j, corner, angle_tolerance, &mut candidates);
        }
    }

    // Minimum-distance pairing: closest candidates claim their endpoints first
    candidates.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.pair.cmp(&b.pair))
    });
    log_ambiguous_endpoints(&candidates);

    let mut result = segments.to_vec();
    let mut claimed: FxHashSet<(usize, End)> = FxHashSet::default();
    let mut applied = 0usize;

    for candidate in &candidates {
        match candidate.patch {
            Patch::Corner {
                first,
                second,
                target,
            } => {
                if claimed.contains(&first) || claimed.contains(&second) {
                    continue;
                }
                first.1.set(&mut result[first.0], target);
                second.1.set(&mut result[second.0], target);
                claimed.insert(first);
                claimed.insert(second);
            }
            Patch::Tee { end, target } => {
                if !claimed.insert(end) {
                    continue;
                }
                end.1.set(&mut result[end.0], target);
            }
        }
        applied += 1;
    }

    result.retain(|s| !s.is_degenerate(EPSILON));
    tracing::debug!(candidates = candidates.len(), applied, "Closed gaps at corners");
    Ok(result)
}

fn collect_candidates(
    segments: &[Segment],
    i: usize,
    j: usize,
    corner: f64,
    angle_tolerance: f64,
    out: &mut Vec<Candidate>,
) {
    let a = &segments[i];
    let b = &segments[j];
    if are_parallel(a, b, angle_tolerance) || intersect(a, b, LINEAR_EPSILON).is_intersecting() {
        return;
    }
    let Some((t, u)) = line_parameters(a, b) else {
        return;
    };
    let target = a.point_at(t);

    let near = |segment: &Segment, end: End| end.of(segment).distance_to(&target) <= corner;
    let a_end = if t < 0.5 { End::Start } else { End::End };
    let b_end = if u < 0.5 { End::Start } else { End::End };
    let a_short = near(a, a_end);
    let b_short = near(b, b_end);

    if a_short && b_short {
        out.push(Candidate {
            distance: a_end.of(a).distance_to(&b_end.of(b)),
            pair: (i, j),
            patch: Patch::Corner {
                first: (i, a_end),
                second: (j, b_end),
                target,
            },
        });
        return;
    }

    // The crossing lies on the body of the other segment, away from its ends
    let on_body = |segment: &Segment, param: f64| {
        param > 0.0
            && param < 1.0
            && segment.start.distance_to(&target) > corner
            && segment.end.distance_to(&target) > corner
    };
    if a_short && on_body(b, u) {
        out.push(Candidate {
            distance: a_end.of(a).distance_to(&target),
            pair: (i, j),
            patch: Patch::Tee {
                end: (i, a_end),
                target,
            },
        });
    } else if b_short && on_body(a, t) {
        out.push(Candidate {
            distance: b_end.of(b).distance_to(&target),
            pair: (i, j),
            patch: Patch::Tee {
                end: (j, b_end),
                target,
            },
        });
    }
}

fn log_ambiguous_endpoints(candidates: &[Candidate]) {
    let mut counts: FxHashMap<(usize, End), usize> = FxHashMap::default();
    for candidate in candidates {
        match candidate.patch {
            Patch::Corner { first, second, .. } => {
                *counts.entry(first).or_default() += 1;
                *counts.entry(second).or_default() += 1;
            }
            Patch::Tee { end, .. } => *counts.entry(end).or_default() += 1,
        }
    }
    for ((segment, end), count) in counts {
        if count > 1 {
            tracing::debug!(segment, ?end, count, "Ambiguous corner, using closest pairing");
        }
    }
}

/// Breakpoint fusion followed by corner patching.
pub fn close_gaps(segments: &[Segment], tolerances: &Tolerances) -> Result<Vec<Segment>> {
    let fused = close_gap_at_breakpoint(segments, tolerances.gap, tolerances.parallel_angle)?;
    close_gap_at_corner(&fused, tolerances.corner, tolerances.parallel_angle)
}
