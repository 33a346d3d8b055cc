// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pruning, next-edge linking and face tracing.
//!
//! These three passes run in order on a freshly built arena:
//!
//! 1. [`HalfEdgeArena::prune_dangling`] kills edges that end at a vertex with
//!    a single live half-edge.
//! 2. [`HalfEdgeArena::link_next_edges`] gives every live half-edge its
//!    successor: at the end vertex, the live outgoing edge with the smallest
//!    clockwise turn from the way back. Bounded faces come out
//!    counter-clockwise and the unbounded face clockwise.
//! 3. [`HalfEdgeArena::trace_faces`] follows `next` pointers from every
//!    unvisited half-edge and keeps the walks that return to their start.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::arena::{FaceData, HalfEdgeArena};
use crate::config::PruneMode;
use crate::keys::{HalfEdgeKey, VertexKey};

/// Turns closer than this are the same direction
const ANGLE_EPSILON: f64 = 1e-12;

/// What dangling-edge pruning removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneSummary {
    /// Rounds that killed at least one edge
    pub rounds: usize,
    /// Half-edges killed
    pub killed: usize,
}

/// How the face walks ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub closed: usize,
    /// Walks that hit a dead end or ran into another walk
    pub open: usize,
    /// Walks stopped by the iteration cap
    pub capped: usize,
}

enum Walk {
    Closed(Vec<HalfEdgeKey>),
    Open(usize),
    Capped,
}

impl HalfEdgeArena {
    /// Kill every half-edge leaving a vertex of live out-degree one, along
    /// with its opposite.
    pub fn prune_dangling(&mut self, mode: PruneMode) -> PruneSummary {
        let mut summary = PruneSummary::default();
        loop {
            let dead_ends: Vec<HalfEdgeKey> = self
                .vertices
                .keys()
                .filter_map(|v| self.sole_live_outgoing(v))
                .collect();
            if dead_ends.is_empty() {
                break;
            }
            summary.rounds += 1;
            for h in dead_ends {
                summary.killed += self.kill_pair(h);
            }
            if mode == PruneMode::SinglePass {
                break;
            }
        }

        if mode == PruneMode::SinglePass {
            let remaining = self
                .vertices
                .keys()
                .filter(|&v| self.live_degree(v) == 1)
                .count();
            if remaining > 0 {
                tracing::debug!(remaining, "Dead ends left after single pruning pass");
            }
        }
        tracing::trace!(rounds = summary.rounds, killed = summary.killed, "Pruned dangling edges");
        summary
    }

    /// Assign `next` for every half-edge. Killed half-edges and those with
    /// no eligible successor get `None`.
    pub fn link_next_edges(&mut self) {
        let keys: Vec<HalfEdgeKey> = self.half_edges.keys().collect();
        for key in keys {
            let next = self.choose_next(key);
            if let Some(he) = self.half_edges.get_mut(key) {
                he.next = next;
            }
        }
    }

    /// Walk every live, unvisited half-edge and record the closed faces.
    ///
    /// A walk is capped at the total half-edge count; anything longer can
    /// only be a corrupt `next` chain and is discarded.
    pub fn trace_faces(&mut self) -> TraceSummary {
        let cap = self.half_edges.len();
        let starts: Vec<HalfEdgeKey> = self.half_edges.keys().collect();
        let mut summary = TraceSummary::default();

        for start in starts {
            let fresh = self
                .half_edges
                .get(start)
                .is_some_and(|h| !h.killed && !h.visited);
            if !fresh {
                continue;
            }
            match self.walk(start, cap) {
                Walk::Closed(path) => {
                    self.insert_face(path);
                    summary.closed += 1;
                }
                Walk::Open(length) => {
                    tracing::trace!(start = ?start, length, "Discarded open face");
                    summary.open += 1;
                }
                Walk::Capped => {
                    tracing::warn!(start = ?start, cap, "Face walk hit the iteration cap, discarded");
                    summary.capped += 1;
                }
            }
        }
        summary
    }

    fn sole_live_outgoing(&self, vertex: VertexKey) -> Option<HalfEdgeKey> {
        let v = self.vertices.get(vertex)?;
        let mut live = v
            .outgoing
            .iter()
            .copied()
            .filter(|&h| self.half_edges.get(h).is_some_and(|e| !e.killed));
        match (live.next(), live.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// Returns how many half-edges were newly killed
    fn kill_pair(&mut self, key: HalfEdgeKey) -> usize {
        let Some(opposite) = self.half_edges.get(key).map(|h| h.opposite) else {
            return 0;
        };
        let mut killed = 0;
        for k in [key, opposite] {
            if let Some(he) = self.half_edges.get_mut(k) {
                if !he.killed {
                    he.killed = true;
                    killed += 1;
                }
            }
        }
        killed
    }

    fn choose_next(&self, key: HalfEdgeKey) -> Option<HalfEdgeKey> {
        let he = self.half_edges.get(key)?;
        if he.killed {
            return None;
        }
        let pivot = self.vertices.get(he.target)?;
        let back = pivot.position.vector_to(&self.vertex_position(he.origin)?);
        let back_angle = back.y.atan2(back.x);

        let mut best: Option<(f64, HalfEdgeKey)> = None;
        for &candidate in &pivot.outgoing {
            if candidate == he.opposite {
                continue;
            }
            let Some(c) = self.half_edges.get(candidate) else {
                continue;
            };
            if c.killed {
                continue;
            }
            let Some(to) = self.vertex_position(c.target) else {
                continue;
            };
            let out = pivot.position.vector_to(&to);
            let mut turn = (back_angle - out.y.atan2(out.x)).rem_euclid(TAU);
            if turn <= ANGLE_EPSILON || turn >= TAU - ANGLE_EPSILON {
                turn = TAU;
            }
            // Earlier outgoing edges win exact ties
            if best.map_or(true, |(b, _)| turn < b - ANGLE_EPSILON) {
                best = Some((turn, candidate));
            }
        }
        best.map(|(_, k)| k)
    }

    fn walk(&mut self, start: HalfEdgeKey, cap: usize) -> Walk {
        let mut path = Vec::new();
        let mut cursor = start;
        loop {
            if path.len() >= cap {
                return Walk::Capped;
            }
            let Some(he) = self.half_edges.get_mut(cursor) else {
                return Walk::Open(path.len());
            };
            if he.visited || he.killed {
                return Walk::Open(path.len());
            }
            he.visited = true;
            path.push(cursor);
            match he.next {
                None => return Walk::Open(path.len()),
                Some(next) if next == start => return Walk::Closed(path),
                Some(next) => cursor = next,
            }
        }
    }

    fn insert_face(&mut self, path: Vec<HalfEdgeKey>) {
        let signed_area = path
            .iter()
            .filter_map(|&h| self.half_edge_segment(h))
            .map(|s| s.start.x * s.end.y - s.end.x * s.start.y)
            .sum::<f64>()
            / 2.0;
        let face = self.faces.insert(FaceData {
            half_edges: Vec::new(),
            signed_area,
        });
        for &h in &path {
            if let Some(he) = self.half_edges.get_mut(h) {
                he.face = Some(face);
            }
        }
        if let Some(f) = self.faces.get_mut(face) {
            f.half_edges = path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cad2bim_geometry::Segment;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::from_coords(x0, y0, x1, y1)
    }

    fn square() -> Vec<Segment> {
        vec![
            seg(0.0, 0.0, 10.0, 0.0),
            seg(10.0, 0.0, 10.0, 10.0),
            seg(10.0, 10.0, 0.0, 10.0),
            seg(0.0, 10.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn square_traces_two_faces_of_opposite_orientation() {
        let mut arena = HalfEdgeArena::from_segments(&square(), 1e-6);
        arena.link_next_edges();
        let summary = arena.trace_faces();
        assert_eq!(summary.closed, 2);
        assert_eq!(summary.open, 0);

        let mut areas: Vec<f64> = arena
            .face_keys()
            .filter_map(|k| arena.face(k))
            .map(|f| f.signed_area)
            .collect();
        areas.sort_by(f64::total_cmp);
        assert_eq!(areas, vec![-100.0, 100.0]);
    }

    #[test]
    fn next_turns_into_the_nearest_clockwise_edge() {
        // Bottom edge split at x=5 by a partition going up
        let mut arena = HalfEdgeArena::from_segments(
            &[
                seg(0.0, 0.0, 5.0, 0.0),
                seg(5.0, 0.0, 10.0, 0.0),
                seg(5.0, 0.0, 5.0, 10.0),
            ],
            1e-6,
        );
        arena.link_next_edges();

        let v0 = arena.add_vertex(cad2bim_geometry::Point2D::new(0.0, 0.0));
        let v5 = arena.add_vertex(cad2bim_geometry::Point2D::new(5.0, 0.0));
        let up = arena.add_vertex(cad2bim_geometry::Point2D::new(5.0, 10.0));
        let incoming = arena.find_half_edge(v0, v5).unwrap();
        let expected = arena.find_half_edge(v5, up).unwrap();
        assert_eq!(arena.half_edge(incoming).unwrap().next, Some(expected));
    }

    #[test]
    fn fixed_point_pruning_removes_whole_chain() {
        let mut segments = square();
        segments.push(seg(10.0, 10.0, 12.0, 10.0));
        segments.push(seg(12.0, 10.0, 14.0, 10.0));

        let mut arena = HalfEdgeArena::from_segments(&segments, 1e-6);
        let summary = arena.prune_dangling(PruneMode::FixedPoint);
        assert_eq!(summary.killed, 4);
        assert_eq!(summary.rounds, 2);

        let mut single = HalfEdgeArena::from_segments(&segments, 1e-6);
        let summary = single.prune_dangling(PruneMode::SinglePass);
        assert_eq!(summary.killed, 2);
        assert_eq!(summary.rounds, 1);
    }

    /// Square with linked half-edges, keys in trace order
    fn linked_square() -> (HalfEdgeArena, Vec<HalfEdgeKey>) {
        let mut arena = HalfEdgeArena::from_segments(&square(), 1e-6);
        arena.link_next_edges();
        let keys: Vec<HalfEdgeKey> = arena.half_edge_keys().collect();
        (arena, keys)
    }

    fn set_next(arena: &mut HalfEdgeArena, from: HalfEdgeKey, to: HalfEdgeKey) {
        if let Some(he) = arena.half_edges.get_mut(from) {
            he.next = Some(to);
        }
    }

    #[test]
    fn walk_into_a_loop_missing_its_start_is_discarded() {
        let (mut arena, h) = linked_square();
        set_next(&mut arena, h[0], h[2]);
        set_next(&mut arena, h[2], h[4]);
        set_next(&mut arena, h[4], h[2]);

        let summary = arena.trace_faces();
        assert!(summary.open >= 1);
        assert_eq!(summary.capped, 0);
        assert!(arena.half_edge(h[0]).unwrap().face.is_none());
        assert!(arena
            .face_keys()
            .all(|f| !arena.face(f).unwrap().half_edges.contains(&h[0])));
    }

    #[test]
    fn chain_longer_than_the_arena_is_capped() {
        let (mut arena, h) = linked_square();
        assert_eq!(h.len(), 8);
        for pair in h.windows(2) {
            set_next(&mut arena, pair[0], pair[1]);
        }
        set_next(&mut arena, h[7], h[3]);

        let summary = arena.trace_faces();
        assert_eq!(
            summary,
            TraceSummary {
                closed: 0,
                open: 0,
                capped: 1
            }
        );
        assert_eq!(arena.face_count(), 0);
    }

    #[test]
    fn dead_end_has_no_next() {
        let mut arena = HalfEdgeArena::from_segments(&[seg(0.0, 0.0, 1.0, 0.0)], 1e-6);
        arena.link_next_edges();
        let summary = arena.trace_faces();
        assert_eq!(summary.closed, 0);
        assert!(arena.half_edge_keys().all(|k| arena.half_edge(k).unwrap().next.is_none()));
    }
}
