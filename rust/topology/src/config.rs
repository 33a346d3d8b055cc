// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Options for region detection.

use cad2bim_geometry::{check_tolerance, Tolerances};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How dangling edges are removed before faces are traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruneMode {
    /// Kill the edges at vertices of out-degree one, once.
    ///
    /// Chains longer than one hop keep their inner edges alive; faces that
    /// walk into them end open and are discarded.
    SinglePass,
    /// Repeat until no vertex of out-degree one is left.
    #[default]
    FixedPoint,
}

/// Which closed faces count as outer boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerimeterRule {
    /// The face with the most edges is the perimeter (ties go to the
    /// clockwise face, then the larger area). The face tracing the same
    /// edges the other way round is dropped with it.
    #[default]
    MaxEdgeCount,
    /// Every clockwise face is an outer boundary; counter-clockwise faces
    /// are regions.
    Orientation,
}

/// Region detection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Endpoints closer than this become one vertex
    pub vertex_tolerance: f64,
    /// Segments not longer than this are ignored
    pub min_segment_length: f64,
    pub pruning: PruneMode,
    pub perimeter_rule: PerimeterRule,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self::from_tolerances(&Tolerances::default())
    }
}

impl RegionConfig {
    /// Take vertex and length tolerances from the shared set, with default
    /// pruning and perimeter rule.
    pub fn from_tolerances(tolerances: &Tolerances) -> Self {
        Self {
            vertex_tolerance: tolerances.vertex_merge,
            min_segment_length: tolerances.min_segment_length,
            pruning: PruneMode::default(),
            perimeter_rule: PerimeterRule::default(),
        }
    }

    pub fn with_pruning(mut self, pruning: PruneMode) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn with_perimeter_rule(mut self, rule: PerimeterRule) -> Self {
        self.perimeter_rule = rule;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_tolerance("vertex_tolerance", self.vertex_tolerance)?;
        check_tolerance("min_segment_length", self.min_segment_length)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_shared_tolerances() {
        let config = RegionConfig::default();
        let tolerances = Tolerances::default();
        assert_eq!(config.vertex_tolerance, tolerances.vertex_merge);
        assert_eq!(config.pruning, PruneMode::FixedPoint);
        assert_eq!(config.perimeter_rule, PerimeterRule::MaxEdgeCount);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nan_tolerance_is_rejected() {
        let config = RegionConfig {
            vertex_tolerance: f64::NAN,
            ..RegionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn modes_deserialize_in_snake_case() {
        let config: RegionConfig =
            serde_json::from_str(r#"{"pruning": "single_pass", "perimeter_rule": "orientation"}"#)
                .unwrap();
        assert_eq!(config.pruning, PruneMode::SinglePass);
        assert_eq!(config.perimeter_rule, PerimeterRule::Orientation);
    }
}
