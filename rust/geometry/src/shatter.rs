// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curve shattering: split every segment at each point where another
//! segment of the same set crosses or touches it.
//!
//! The result is a set of sub-segments that meet only at shared endpoints.
//! Shattering an already shattered set changes nothing.

use smallvec::SmallVec;

use crate::config::{check_tolerance, EPSILON};
use crate::error::Result;
use crate::predicates::{are_collinear, line_parameters, projected_interval};
use crate::types::Segment;

/// Split parameters collected for one segment; most segments are cut a
/// handful of times at most.
type SplitParams = SmallVec<[f64; 8]>;

/// Split every segment at its intersections with every other segment.
///
/// `tolerance` is the distance below which two cut points (or a cut point and
/// an endpoint) are merged, so no fragment is shorter than it. Segments that
/// are already shorter than `tolerance` are dropped. Duplicate fragments
/// produced by overlapping input are emitted once.
pub fn shatter(segments: &[Segment], tolerance: f64) -> Result<Vec<Segment>> {
    check_tolerance("shatter tolerance", tolerance)?;

    let live: Vec<&Segment> = segments
        .iter()
        .filter(|s| !s.is_degenerate(tolerance.max(EPSILON)))
        .collect();
    if live.len() < segments.len() {
        tracing::debug!(
            dropped = segments.len() - live.len(),
            "Dropped degenerate segments before shattering"
        );
    }

    let mut fragments: Vec<Segment> = Vec::with_capacity(live.len() * 2);

    for (i, segment) in live.iter().enumerate() {
        let mut params: SplitParams = SmallVec::new();
        for (j, other) in live.iter().enumerate() {
            if i != j {
                collect_split_params(segment, other, tolerance, &mut params);
            }
        }

        let cuts = normalize_params(params, segment.length(), tolerance);
        for pair in cuts.windows(2) {
            let fragment = Segment::new(segment.point_at(pair[0]), segment.point_at(pair[1]));
            if !fragments.iter().any(|f| f.almost_eq(&fragment, tolerance)) {
                fragments.push(fragment);
            }
        }
    }

    tracing::debug!(
        input = segments.len(),
        output = fragments.len(),
        "Shattered segments"
    );
    Ok(fragments)
}

/// Parameters on `segment` at which `other` crosses, touches or starts/ends
/// an overlap.
fn collect_split_params(segment: &Segment, other: &Segment, tolerance: f64, out: &mut SplitParams) {
    let len = segment.length();
    let slack = tolerance / len;

    if are_collinear(segment, other, tolerance) {
        // Cut where the other segment's endpoints fall inside this one
        let (omin, omax) = projected_interval(segment, other);
        for s in [omin, omax] {
            if s > tolerance && s < len - tolerance {
                out.push(s / len);
            }
        }
        return;
    }

    if let Some((t, u)) = line_parameters(segment, other) {
        let other_slack = tolerance / other.length();
        if t >= -slack && t <= 1.0 + slack && u >= -other_slack && u <= 1.0 + other_slack {
            out.push(t.clamp(0.0, 1.0));
        }
    }
}

/// Sort the cut parameters, add both endpoints and drop cuts closer than
/// `tolerance` (in length units) to their predecessor or to the end.
fn normalize_params(mut params: SplitParams, length: f64, tolerance: f64) -> SplitParams {
    params.sort_by(|a, b| a.total_cmp(b));

    let mut cuts: SplitParams = SmallVec::new();
    cuts.push(0.0);
    for t in params {
        let last = cuts[cuts.len() - 1];
        if (t - last) * length > tolerance && (1.0 - t) * length > tolerance {
            cuts.push(t);
        }
    }
    cuts.push(1.0);
    cuts
}
