// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration.
//!
//! One [`PipelineConfig`] value is passed into every entry point; there is
//! no global state. All fields have defaults, so a partial JSON document is
//! a valid configuration.

use cad2bim_geometry::{check_tolerance, Tolerances};
use cad2bim_topology::{PerimeterRule, PruneMode, RegionConfig};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Region detection options not covered by [`Tolerances`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionOptions {
    pub pruning: PruneMode,
    pub perimeter_rule: PerimeterRule,
}

/// Which pairs of parallel faces make a wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallAxisConfig {
    pub min_thickness: f64,
    pub max_thickness: f64,
}

impl Default for WallAxisConfig {
    fn default() -> Self {
        Self {
            min_thickness: 0.05,
            max_thickness: 0.6,
        }
    }
}

impl WallAxisConfig {
    pub fn validate(&self) -> Result<()> {
        check_tolerance("min_thickness", self.min_thickness)?;
        check_tolerance("max_thickness", self.max_thickness)?;
        if self.min_thickness > self.max_thickness {
            return Err(Error::InvalidThicknessRange {
                min: self.min_thickness,
                max: self.max_thickness,
            });
        }
        Ok(())
    }
}

/// Closed clusters no larger than `max_size` in either direction are columns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub max_size: f64,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self { max_size: 1.0 }
    }
}

/// Everything the plan pipeline needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tolerances: Tolerances,
    pub detection: DetectionOptions,
    pub walls: WallAxisConfig,
    pub columns: ColumnConfig,
    /// Process clusters and levels on the rayon pool
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            detection: DetectionOptions::default(),
            walls: WallAxisConfig::default(),
            columns: ColumnConfig::default(),
            parallel: true,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.tolerances.validate()?;
        self.walls.validate()?;
        check_tolerance("column max_size", self.columns.max_size)?;
        Ok(())
    }

    /// Region detector settings derived from the shared tolerances
    pub fn region_config(&self) -> RegionConfig {
        RegionConfig::from_tolerances(&self.tolerances)
            .with_pruning(self.detection.pruning)
            .with_perimeter_rule(self.detection.perimeter_rule)
    }
}
