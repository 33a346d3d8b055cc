// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building the half-edge arena from segments.
//!
//! Endpoints are merged through the vertex index, and every segment then
//! becomes a pair of half-edges whose `opposite` fields are set to each
//! other when they are inserted.

use cad2bim_geometry::{Point2D, Segment};

use crate::arena::{HalfEdgeArena, HalfEdgeData, VertexData};
use crate::keys::{HalfEdgeKey, VertexKey};

impl HalfEdgeArena {
    /// Builds an arena holding one half-edge pair per usable segment.
    pub fn from_segments(segments: &[Segment], tolerance: f64) -> Self {
        let mut arena = Self::new(tolerance);
        for (i, segment) in segments.iter().enumerate() {
            arena.add_segment(i, segment);
        }
        arena
    }

    /// Returns the vertex within tolerance of `position`, inserting a new
    /// one if there is none.
    pub fn add_vertex(&mut self, position: Point2D) -> VertexKey {
        if let Some(existing) = self.index.find_near(&self.vertices, &position, self.tolerance) {
            return existing;
        }
        let key = self.vertices.insert(VertexData {
            position,
            outgoing: Vec::new(),
        });
        self.index.insert(key, &position);
        key
    }

    /// Adds the two half-edges of a segment.
    ///
    /// Returns `None` without touching the edge set when both endpoints
    /// merge into one vertex or when the vertex pair is already joined.
    pub fn add_segment(
        &mut self,
        index: usize,
        segment: &Segment,
    ) -> Option<(HalfEdgeKey, HalfEdgeKey)> {
        let origin = self.add_vertex(segment.start);
        let target = self.add_vertex(segment.end);
        if origin == target {
            tracing::trace!(segment = index, "Skipped segment collapsing to one vertex");
            return None;
        }
        if self.find_half_edge(origin, target).is_some() {
            tracing::trace!(segment = index, "Skipped duplicate segment");
            return None;
        }

        let forward = self.half_edges.insert(HalfEdgeData {
            origin,
            target,
            opposite: HalfEdgeKey::default(),
            next: None,
            face: None,
            killed: false,
            visited: false,
            segment: index,
        });
        let reverse = self.half_edges.insert(HalfEdgeData {
            origin: target,
            target: origin,
            opposite: forward,
            next: None,
            face: None,
            killed: false,
            visited: false,
            segment: index,
        });
        if let Some(he) = self.half_edges.get_mut(forward) {
            he.opposite = reverse;
        }
        if let Some(v) = self.vertices.get_mut(origin) {
            v.outgoing.push(forward);
        }
        if let Some(v) = self.vertices.get_mut(target) {
            v.outgoing.push(reverse);
        }
        Some((forward, reverse))
    }

    /// The half-edge running from `origin` to `target`, if any.
    pub fn find_half_edge(&self, origin: VertexKey, target: VertexKey) -> Option<HalfEdgeKey> {
        self.vertices.get(origin)?.outgoing.iter().copied().find(|&h| {
            self.half_edges
                .get(h)
                .is_some_and(|he| he.target == target)
        })
    }
}
