// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment clustering: connected components under a join relation.
//!
//! All three clustering flavours (intersection, overlap, proximity) are the
//! same partition over a different predicate. The partition is the
//! transitive closure of the predicate: two segments end up in the same
//! cluster if a chain of joined segments connects them, so no segment in one
//! cluster satisfies the predicate with a segment of another.

use rustc_hash::FxHashMap;

use crate::config::{check_tolerance, LINEAR_EPSILON};
use crate::error::Result;
use crate::predicates::{are_collinear, are_parallel, intersect, projected_interval};
use crate::types::Segment;

/// Disjoint-set forest with path compression and union by rank
struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) -> bool {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return false;
        }
        if self.rank[rx] < self.rank[ry] {
            self.parent[rx] = ry;
        } else if self.rank[rx] > self.rank[ry] {
            self.parent[ry] = rx;
        } else {
            self.parent[ry] = rx;
            self.rank[rx] += 1;
        }
        true
    }
}

/// Partition `segments` into connected components of the `join` relation.
///
/// `join` must be symmetric. Clusters are ordered by their first member in
/// the input, and members keep their input order.
pub fn partition_by<F>(segments: &[Segment], join: F) -> Vec<Vec<Segment>>
where
    F: FnMut(&Segment, &Segment) -> bool,
{
    partition_indices_by(segments, join)
        .into_iter()
        .map(|members| members.into_iter().map(|i| segments[i]).collect())
        .collect()
}

/// Same partition as [`partition_by`], as indices into `segments`.
pub fn partition_indices_by<F>(segments: &[Segment], mut join: F) -> Vec<Vec<usize>>
where
    F: FnMut(&Segment, &Segment) -> bool,
{
    let n = segments.len();
    let mut sets = DisjointSets::new(n);

    for i in 0..n {
        for j in (i + 1)..n {
            if sets.find(i) == sets.find(j) {
                continue;
            }
            if join(&segments[i], &segments[j]) {
                sets.union(i, j);
            }
        }
    }

    let mut slot_of_root: FxHashMap<usize, usize> = FxHashMap::default();
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = sets.find(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            clusters.push(Vec::new());
            clusters.len() - 1
        });
        clusters[slot].push(i);
    }
    clusters
}

/// True if `a` and `b` intersect directly or after nudging `a` by `jitter`
/// along the axes and diagonals.
///
/// The offset set is symmetric, so the relation is commutative.
pub fn intersects_with_jitter(a: &Segment, b: &Segment, jitter: f64) -> bool {
    if intersect(a, b, LINEAR_EPSILON).is_intersecting() {
        return true;
    }
    if jitter <= 0.0 {
        return false;
    }
    const OFFSETS: [(f64, f64); 8] = [
        (1.0, 0.0),
        (-1.0, 0.0),
        (0.0, 1.0),
        (0.0, -1.0),
        (1.0, 1.0),
        (1.0, -1.0),
        (-1.0, 1.0),
        (-1.0, -1.0),
    ];
    OFFSETS.iter().any(|&(dx, dy)| {
        let nudged = a.translated(dx * jitter, dy * jitter);
        intersect(&nudged, b, LINEAR_EPSILON).is_intersecting()
    })
}

/// Group segments that cross or touch, bridging near-misses up to `jitter`.
pub fn cluster_by_intersection(segments: &[Segment], jitter: f64) -> Result<Vec<Vec<Segment>>> {
    check_tolerance("jitter", jitter)?;
    let clusters = partition_by(segments, |a, b| intersects_with_jitter(a, b, jitter));
    tracing::debug!(
        segments = segments.len(),
        clusters = clusters.len(),
        "Clustered by intersection"
    );
    Ok(clusters)
}

/// Group parallel segments that overlap or touch along a common line.
///
/// Used to merge collinear axis fragments into single wall centerlines.
pub fn cluster_by_overlap(
    segments: &[Segment],
    angle_tolerance: f64,
    tolerance: f64,
) -> Result<Vec<Vec<Segment>>> {
    check_tolerance("parallel_angle", angle_tolerance)?;
    check_tolerance("overlap tolerance", tolerance)?;
    Ok(partition_by(segments, |a, b| {
        overlaps_along_line(a, b, angle_tolerance, tolerance)
    }))
}

/// True if `a` and `b` are parallel and share at least a point of a common
/// line.
pub fn overlaps_along_line(a: &Segment, b: &Segment, angle_tolerance: f64, tolerance: f64) -> bool {
    are_parallel(a, b, angle_tolerance) && intersect(a, b, tolerance).is_intersecting()
}

/// True if `a` and `b` are collinear within `gap` and the break between
/// them along the common line is at most `gap`.
pub fn is_near_collinear(a: &Segment, b: &Segment, gap: f64, angle_tolerance: f64) -> bool {
    if !are_parallel(a, b, angle_tolerance) || !are_collinear(a, b, gap) {
        return false;
    }
    let (bmin, bmax) = projected_interval(a, b);
    let separation = (bmin - a.length()).max(-bmax);
    separation <= gap
}

/// Group collinear segments whose endpoints lie within `gap` of each other,
/// even when they do not touch.
pub fn cluster_by_proximity(
    segments: &[Segment],
    gap: f64,
    angle_tolerance: f64,
) -> Result<Vec<Vec<Segment>>> {
    check_tolerance("gap", gap)?;
    check_tolerance("parallel_angle", angle_tolerance)?;
    Ok(partition_by(segments, |a, b| {
        is_near_collinear(a, b, gap, angle_tolerance)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::from_coords(x0, y0, x1, y1)
    }

    #[test]
    fn partition_is_transitive_closure() {
        // a touches b, b touches c, a and c are apart
        let segments = vec![
            seg(0.0, 0.0, 1.0, 0.0),
            seg(1.0, 0.0, 1.0, 1.0),
            seg(1.0, 1.0, 2.0, 1.0),
            seg(5.0, 5.0, 6.0, 5.0),
        ];
        let clusters = cluster_by_intersection(&segments, 0.0).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 3);
        assert_eq!(clusters[1].len(), 1);
    }

    #[test]
    fn jitter_bridges_near_miss() {
        let segments = vec![seg(0.0, 0.0, 1.0, 0.0), seg(1.0005, 0.0, 1.0005, 1.0)];
        assert_eq!(cluster_by_intersection(&segments, 0.0).unwrap().len(), 2);
        assert_eq!(cluster_by_intersection(&segments, 0.001).unwrap().len(), 1);
    }

    #[test]
    fn jitter_relation_is_commutative() {
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(1.0005, 0.0005, 1.0005, 1.0);
        assert_eq!(
            intersects_with_jitter(&a, &b, 0.001),
            intersects_with_jitter(&b, &a, 0.001)
        );
    }

    #[test]
    fn overlap_clusters_only_parallel_segments() {
        let segments = vec![
            seg(0.0, 0.0, 5.0, 0.0),
            seg(4.0, 0.0, 9.0, 0.0),
            seg(3.0, -1.0, 3.0, 1.0),
        ];
        let clusters = cluster_by_overlap(&segments, 1e-3, 1e-9).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
    }

    #[test]
    fn proximity_joins_collinear_gaps_only() {
        let segments = vec![
            seg(0.0, 0.0, 5.0, 0.0),
            seg(5.001, 0.0, 9.0, 0.0),
            seg(9.5, 0.0, 12.0, 0.0),
            seg(0.0, 0.005, 5.0, 0.005),
        ];
        let clusters = cluster_by_proximity(&segments, 0.002, 1e-3).unwrap();
        // The offset parallel copy is 5mm away, beyond the 2mm gap
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].len(), 2);
    }

    #[test]
    fn clusters_keep_input_order() {
        let segments = vec![
            seg(10.0, 10.0, 11.0, 10.0),
            seg(0.0, 0.0, 1.0, 0.0),
            seg(11.0, 10.0, 11.0, 11.0),
        ];
        let clusters = partition_by(&segments, |a, b| {
            intersect(a, b, LINEAR_EPSILON).is_intersecting()
        });
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0][0].start.x, 10.0);
        assert_eq!(clusters[0][1].start.x, 11.0);
        assert_eq!(clusters[1][0].start.x, 0.0);
    }

    #[test]
    fn empty_input_gives_no_clusters() {
        assert!(cluster_by_intersection(&[], 0.01).unwrap().is_empty());
    }
}
