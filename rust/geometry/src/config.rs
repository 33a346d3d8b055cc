// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar tolerances shared by every pipeline stage.
//!
//! Tolerances are plain values passed into each entry point. Lengths are in
//! drawing units (metres by default), angles in radians.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Floor for lengths and determinants that are treated as zero.
pub const EPSILON: f64 = 1e-12;

/// Tolerance used where two segments must touch "exactly" (intersection
/// noise only, no deliberate gap bridging).
pub const LINEAR_EPSILON: f64 = 1e-9;

/// Tolerances for segment processing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Segments shorter than this are dropped before shattering
    pub min_segment_length: f64,
    /// Radius within which two points are treated as the same vertex.
    ///
    /// Must stay below the smallest real gap between distinct vertices and
    /// above the noise produced by intersection arithmetic.
    pub vertex_merge: f64,
    /// Maximum break between collinear segments that is fused away
    pub gap: f64,
    /// Maximum distance from an endpoint to a corner it fails to reach
    pub corner: f64,
    /// Positional nudge used to bridge near-misses when clustering
    pub jitter: f64,
    /// Angle below which two directions count as parallel
    pub parallel_angle: f64,
    /// Bounding boxes thinner than this in either axis are rejected
    pub min_box_extent: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            min_segment_length: 1e-4,
            vertex_merge: 1e-6,
            gap: 0.01,
            corner: 0.01,
            jitter: 1e-3,
            parallel_angle: 1e-3,
            min_box_extent: 1e-3,
        }
    }
}

impl Tolerances {
    /// Check every field is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        check_tolerance("min_segment_length", self.min_segment_length)?;
        check_tolerance("vertex_merge", self.vertex_merge)?;
        check_tolerance("gap", self.gap)?;
        check_tolerance("corner", self.corner)?;
        check_tolerance("jitter", self.jitter)?;
        check_tolerance("parallel_angle", self.parallel_angle)?;
        check_tolerance("min_box_extent", self.min_box_extent)
    }
}

/// Reject negative, NaN and infinite tolerances.
pub fn check_tolerance(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidTolerance { name, value })
    }
}
