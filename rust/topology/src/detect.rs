// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar region detection.
//!
//! [`detect_regions`] turns an unordered set of wall-face segments into the
//! closed regions they enclose:
//!
//! 1. Drop degenerate segments and shatter the rest at mutual crossings
//! 2. Build the half-edge arena, merging endpoints within tolerance
//! 3. Prune dangling edges
//! 4. Link every half-edge to its successor and trace faces
//! 5. Separate the outer perimeter from the enclosed regions
//!
//! Every connected piece of linework gives up one perimeter. Under
//! [`PerimeterRule::MaxEdgeCount`] it is the piece's face with the most
//! edges, and the face running over the same edges the other way is dropped
//! with it, so a lone loop encloses nothing. Regions are counter-clockwise
//! whenever each piece's outer boundary has the most edges; a region wound
//! by more edges than its outer boundary is taken for the perimeter
//! instead. [`PerimeterRule::Orientation`] always returns the
//! counter-clockwise faces.

use cad2bim_geometry::{filter_degenerate, shatter, Loop, Segment, EPSILON};
use serde::{Deserialize, Serialize};

use crate::arena::{FaceData, HalfEdgeArena};
use crate::config::{PerimeterRule, RegionConfig};
use crate::error::Result;
use crate::keys::FaceKey;

/// Counters describing one detection run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionStats {
    /// Segments after shattering
    pub segments: usize,
    pub vertices: usize,
    pub half_edges: usize,
    /// Half-edges removed by pruning
    pub killed: usize,
    pub prune_rounds: usize,
    pub closed_faces: usize,
    pub open_faces: usize,
    pub capped_faces: usize,
}

/// Result of region detection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionSet {
    /// Highest ranked outer boundary, `None` when no closed face was found
    pub perimeter: Option<Loop>,
    /// One outer boundary per connected piece of linework
    pub perimeters: Vec<Loop>,
    /// Enclosed regions, each an ordered closed loop
    pub regions: Vec<Loop>,
    pub stats: DetectionStats,
}

impl RegionSet {
    /// `true` when nothing is enclosed
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Faces of an arena sorted into boundaries and regions
#[derive(Debug, Clone, Default)]
pub struct FaceClassification {
    pub perimeter: Option<FaceKey>,
    /// Outer boundary of each connected piece
    pub perimeters: Vec<FaceKey>,
    /// The perimeter plus every other face treated as outside
    pub outer: Vec<FaceKey>,
    pub regions: Vec<FaceKey>,
}

/// Find the closed regions enclosed by `segments`.
///
/// Only an invalid configuration is an error. Input without closed loops
/// gives an empty [`RegionSet`].
pub fn detect_regions(segments: &[Segment], config: &RegionConfig) -> Result<RegionSet> {
    config.validate()?;

    let usable = filter_degenerate(segments, config.min_segment_length);
    let shattered = shatter(&usable, config.vertex_tolerance)?;

    let mut arena = HalfEdgeArena::from_segments(&shattered, config.vertex_tolerance);
    let pruned = arena.prune_dangling(config.pruning);
    arena.link_next_edges();
    let traced = arena.trace_faces();

    let classification = classify_faces(&arena, config.perimeter_rule);
    let perimeter = classification.perimeter.and_then(|k| arena.face_loop(k));
    let perimeters: Vec<Loop> = classification
        .perimeters
        .iter()
        .filter_map(|&k| arena.face_loop(k))
        .collect();
    let regions: Vec<Loop> = classification
        .regions
        .iter()
        .filter_map(|&k| arena.face_loop(k))
        .collect();

    let stats = DetectionStats {
        segments: shattered.len(),
        vertices: arena.vertex_count(),
        half_edges: arena.half_edge_count(),
        killed: pruned.killed,
        prune_rounds: pruned.rounds,
        closed_faces: traced.closed,
        open_faces: traced.open,
        capped_faces: traced.capped,
    };
    tracing::debug!(
        input = segments.len(),
        segments = stats.segments,
        vertices = stats.vertices,
        killed = stats.killed,
        closed = stats.closed_faces,
        open = stats.open_faces,
        regions = regions.len(),
        "Detected regions"
    );

    Ok(RegionSet {
        perimeter,
        perimeters,
        regions,
        stats,
    })
}

/// Sort the closed faces of a traced arena into outer boundaries and
/// enclosed regions.
pub fn classify_faces(arena: &HalfEdgeArena, rule: PerimeterRule) -> FaceClassification {
    match rule {
        PerimeterRule::MaxEdgeCount => classify_by_edge_count(arena),
        PerimeterRule::Orientation => classify_by_orientation(arena),
    }
}

fn classify_by_edge_count(arena: &HalfEdgeArena) -> FaceClassification {
    let mut classification = FaceClassification::default();
    let mut best: Option<&FaceData> = None;

    for component in arena.face_components() {
        let mut perimeter: Option<(FaceKey, &FaceData)> = None;
        for &key in &component {
            let Some(face) = arena.face(key) else {
                continue;
            };
            if perimeter.map_or(true, |(_, top)| outranks(face, top)) {
                perimeter = Some((key, face));
            }
        }
        let Some((perimeter, face)) = perimeter else {
            continue;
        };

        classification.perimeters.push(perimeter);
        classification.outer.push(perimeter);
        if best.map_or(true, |top| outranks(face, top)) {
            best = Some(face);
            classification.perimeter = Some(perimeter);
        }
        for &key in component.iter().filter(|&&k| k != perimeter) {
            if arena.is_mirror(perimeter, key) {
                classification.outer.push(key);
            } else {
                classification.regions.push(key);
            }
        }
    }
    classification
}

/// More edges first, then clockwise, then larger area
fn outranks(face: &FaceData, best: &FaceData) -> bool {
    if face.edge_count() != best.edge_count() {
        return face.edge_count() > best.edge_count();
    }
    if face.is_clockwise() != best.is_clockwise() {
        return face.is_clockwise();
    }
    face.signed_area.abs() > best.signed_area.abs() + EPSILON
}

fn classify_by_orientation(arena: &HalfEdgeArena) -> FaceClassification {
    let mut classification = FaceClassification::default();
    let mut largest = 0.0;
    for key in arena.face_keys() {
        let Some(face) = arena.face(key) else {
            continue;
        };
        if face.is_clockwise() {
            classification.outer.push(key);
            classification.perimeters.push(key);
            if face.signed_area.abs() > largest {
                largest = face.signed_area.abs();
                classification.perimeter = Some(key);
            }
        } else {
            classification.regions.push(key);
        }
    }
    classification
}
