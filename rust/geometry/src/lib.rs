// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CAD-to-BIM Segment Geometry
//!
//! Primitives and batch operations over unordered 2D segments extracted from
//! imported drawings:
//!
//! 1. Predicates: parallelism, intersection classification, shadowing, axes
//! 2. Shattering at mutual intersections
//! 3. Clustering by intersection, overlap or proximity
//! 4. Gap and corner patching
//! 5. Minimum-area oriented bounding boxes
//! 6. Loop ordering and outline merging
//!
//! Every operation is a pure function over its inputs, so independent
//! calls can run concurrently on disjoint data.

pub mod bbox;
pub mod cluster;
pub mod config;
pub mod curve;
pub mod error;
pub mod loops;
pub mod patch;
pub mod predicates;
pub mod shatter;
pub mod types;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use bbox::{minimum_area_bounding_box, minimum_area_bounding_box_curves, OrientedBox};
pub use cluster::{
    cluster_by_intersection, cluster_by_overlap, cluster_by_proximity, overlaps_along_line,
    partition_by, partition_indices_by,
};
pub use config::{check_tolerance, Tolerances, EPSILON, LINEAR_EPSILON};
pub use curve::{filter_degenerate, ingest, Curve};
pub use error::{Error, Result};
pub use loops::{deduplicate_shared_edges, merge_outline, order_loop, Loop};
pub use patch::{close_gap_at_breakpoint, close_gap_at_corner, close_gaps, fuse_collinear};
pub use predicates::{
    are_collinear, are_parallel, generate_axis, intersect, is_shadowing, line_intersection,
    point_on_segment, spacing, SegmentRelation,
};
pub use shatter::shatter;
pub use types::{Point2D, Segment};
