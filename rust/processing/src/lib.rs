// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-plan processing pipeline.
//!
//! Composes the segment operations of `cad2bim-geometry` and the region
//! detector of `cad2bim-topology` into one pass per plan:
//!
//! ```text
//! segments -> filter -> shatter -> cluster -> { close gaps, column check } per cluster
//!          -> pair wall faces -> axes + column axes + single lines
//!          -> join axis ends -> cluster -> { detect } per cluster
//!          -> rooms, outlines, wall axes, column footprints
//! ```
//!
//! Multi-level documents are processed level by level with
//! [`process_levels`].

pub mod columns;
pub mod config;
pub mod error;
pub mod levels;
pub mod pipeline;
pub mod walls;

pub use columns::{column_footprint, Footprint};
pub use config::{ColumnConfig, DetectionOptions, PipelineConfig, WallAxisConfig};
pub use error::{Error, Result};
pub use levels::{process_levels, Level, LevelLayout};
pub use pipeline::{process_cluster, process_plan, ClusterOutcome, PlanLayout, PlanStats, Room};
pub use walls::{derive_wall_axes, pair_wall_faces, WallAxis, WallPairing};
