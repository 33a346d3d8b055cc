// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for the half-edge structure of a planar arrangement.
//!
//! The [`HalfEdgeArena`] owns every vertex, half-edge and face of one
//! detection run. Each segment contributes a pair of half-edges that point
//! at each other through `opposite`; each vertex keeps the half-edges that
//! leave it, in insertion order.
//!
//! The arena is scratch state: it is built, pruned, linked and traced inside
//! a single call and never shared between threads.

use cad2bim_geometry::{Loop, Point2D, Segment};
use rustc_hash::FxHashMap;
use slotmap::{SecondaryMap, SlotMap};

use crate::keys::{FaceKey, HalfEdgeKey, VertexKey};
use crate::spatial::VertexIndex;

/// A deduplicated endpoint.
#[derive(Debug, Clone)]
pub struct VertexData {
    pub position: Point2D,
    /// Half-edges whose origin is this vertex
    pub outgoing: Vec<HalfEdgeKey>,
}

/// One directed side of a segment.
#[derive(Debug, Clone)]
pub struct HalfEdgeData {
    pub origin: VertexKey,
    pub target: VertexKey,
    /// The same segment travelled the other way
    pub opposite: HalfEdgeKey,
    /// Following half-edge around the face; `None` at a dead end
    pub next: Option<HalfEdgeKey>,
    pub face: Option<FaceKey>,
    /// Removed by dangling-edge pruning
    pub killed: bool,
    pub visited: bool,
    /// Index of the source segment in the arena's input
    pub segment: usize,
}

/// A closed cycle of half-edges.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub half_edges: Vec<HalfEdgeKey>,
    /// Shoelace area, positive for counter-clockwise faces
    pub signed_area: f64,
}

impl FaceData {
    pub fn edge_count(&self) -> usize {
        self.half_edges.len()
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area < 0.0
    }
}

/// Owner of all half-edge data for one detection run.
#[derive(Debug)]
pub struct HalfEdgeArena {
    pub(crate) vertices: SlotMap<VertexKey, VertexData>,
    pub(crate) half_edges: SlotMap<HalfEdgeKey, HalfEdgeData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,
    pub(crate) index: VertexIndex,
    pub(crate) tolerance: f64,
}

impl HalfEdgeArena {
    /// Creates an empty arena that merges vertices within `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self {
            vertices: SlotMap::with_key(),
            half_edges: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            index: VertexIndex::new(tolerance),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    // --- Vertices ---

    pub fn vertex(&self, key: VertexKey) -> Option<&VertexData> {
        self.vertices.get(key)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex_position(&self, key: VertexKey) -> Option<Point2D> {
        self.vertices.get(key).map(|v| v.position)
    }

    /// Number of live half-edges leaving a vertex
    pub fn live_degree(&self, key: VertexKey) -> usize {
        self.vertices.get(key).map_or(0, |v| {
            v.outgoing
                .iter()
                .filter(|&&h| self.half_edges.get(h).is_some_and(|e| !e.killed))
                .count()
        })
    }

    // --- Half-edges ---

    pub fn half_edge(&self, key: HalfEdgeKey) -> Option<&HalfEdgeData> {
        self.half_edges.get(key)
    }

    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    pub fn half_edge_keys(&self) -> impl Iterator<Item = HalfEdgeKey> + '_ {
        self.half_edges.keys()
    }

    pub fn killed_count(&self) -> usize {
        self.half_edges.values().filter(|h| h.killed).count()
    }

    /// Segment from the origin to the target of a half-edge.
    pub fn half_edge_segment(&self, key: HalfEdgeKey) -> Option<Segment> {
        let he = self.half_edges.get(key)?;
        Some(Segment::new(
            self.vertex_position(he.origin)?,
            self.vertex_position(he.target)?,
        ))
    }

    // --- Faces ---

    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn face_keys(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.faces.keys()
    }

    /// The face as an ordered closed loop of segments.
    pub fn face_loop(&self, key: FaceKey) -> Option<Loop> {
        let face = self.faces.get(key)?;
        let segments = face
            .half_edges
            .iter()
            .map(|&h| self.half_edge_segment(h))
            .collect::<Option<Vec<_>>>()?;
        Some(Loop::new(segments))
    }

    /// Closed faces grouped by the connected piece of live linework they
    /// run along. Groups are ordered by their first face.
    pub fn face_components(&self) -> Vec<Vec<FaceKey>> {
        let mut label: SecondaryMap<VertexKey, usize> = SecondaryMap::new();
        let mut count = 0;
        for seed in self.vertices.keys() {
            if label.contains_key(seed) {
                continue;
            }
            label.insert(seed, count);
            let mut stack = vec![seed];
            while let Some(v) = stack.pop() {
                let Some(vertex) = self.vertices.get(v) else {
                    continue;
                };
                for &h in &vertex.outgoing {
                    let Some(he) = self.half_edges.get(h) else {
                        continue;
                    };
                    if !he.killed && !label.contains_key(he.target) {
                        label.insert(he.target, count);
                        stack.push(he.target);
                    }
                }
            }
            count += 1;
        }

        let mut slot_of: FxHashMap<usize, usize> = FxHashMap::default();
        let mut groups: Vec<Vec<FaceKey>> = Vec::new();
        for (key, face) in &self.faces {
            let component = face
                .half_edges
                .first()
                .and_then(|&h| self.half_edges.get(h))
                .and_then(|he| label.get(he.origin))
                .copied();
            let Some(component) = component else {
                continue;
            };
            let slot = *slot_of.entry(component).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(key);
        }
        groups
    }

    /// `true` if `other` runs over exactly the half-edges opposite to
    /// those of `face`.
    pub fn is_mirror(&self, face: FaceKey, other: FaceKey) -> bool {
        let (Some(a), Some(b)) = (self.faces.get(face), self.faces.get(other)) else {
            return false;
        };
        if a.edge_count() != b.edge_count() {
            return false;
        }
        b.half_edges.iter().all(|&h| {
            self.half_edges
                .get(h)
                .and_then(|e| self.half_edges.get(e.opposite))
                .and_then(|opp| opp.face)
                == Some(face)
        })
    }
}
