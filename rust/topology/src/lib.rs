// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CAD-to-BIM Topology
//!
//! Half-edge planar region detection for floor-plan linework.
//!
//! Segments are stored in an arena of slot maps: every segment becomes two
//! half-edges that reference each other through an explicit `opposite` key,
//! and every vertex keeps the half-edges leaving it. Faces are found by
//! following `next` pointers chosen with a smallest-clockwise-turn rule,
//! which yields every minimal face of the arrangement exactly once.
//!
//! The entry point is [`detect_regions`]. The arena passes are public so
//! callers can inspect intermediate state.

pub mod arena;
pub mod config;
pub mod construction;
pub mod detect;
pub mod error;
pub mod keys;
pub mod spatial;
pub mod traversal;

pub use arena::{FaceData, HalfEdgeArena, HalfEdgeData, VertexData};
pub use config::{PerimeterRule, PruneMode, RegionConfig};
pub use detect::{classify_faces, detect_regions, DetectionStats, FaceClassification, RegionSet};
pub use error::{Error, Result};
pub use keys::{FaceKey, HalfEdgeKey, VertexKey};
pub use traversal::{PruneSummary, TraceSummary};
