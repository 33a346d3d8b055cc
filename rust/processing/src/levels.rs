// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Multi-level documents: one plan per building level.

use cad2bim_geometry::{ingest, Curve};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::{process_plan, PlanLayout};

/// Imported linework of one building level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Height of the level, carried through to the output
    #[serde(default)]
    pub elevation: f64,
    pub curves: Vec<Curve>,
}

/// Processing result for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    pub elevation: f64,
    pub layout: PlanLayout,
}

/// Ingest and process every level. Levels are independent and run in
/// parallel when `config.parallel` is set; output keeps input order.
pub fn process_levels(levels: &[Level], config: &PipelineConfig) -> Result<Vec<LevelLayout>> {
    config.validate()?;
    let run = |level: &Level| -> Result<LevelLayout> {
        let segments = ingest(&level.curves, &config.tolerances);
        tracing::debug!(level = %level.name, segments = segments.len(), "Processing level");
        let layout = process_plan(&segments, config)?;
        Ok(LevelLayout {
            name: level.name.clone(),
            elevation: level.elevation,
            layout,
        })
    };

    if config.parallel {
        levels.par_iter().map(run).collect()
    } else {
        levels.iter().map(run).collect()
    }
}
