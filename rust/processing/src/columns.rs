// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Column footprints from small closed clusters.

use cad2bim_geometry::{minimum_area_bounding_box, OrientedBox, Point2D, Segment, Tolerances};
use serde::{Deserialize, Serialize};

use crate::config::ColumnConfig;

/// Oriented rectangle a column is placed on
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Footprint {
    pub center: Point2D,
    pub width: f64,
    pub depth: f64,
    /// Radians
    pub rotation: f64,
    /// Box sides, counter-clockwise
    pub outline: [Segment; 4],
}

impl Footprint {
    pub fn from_box(bounds: &OrientedBox) -> Self {
        Self {
            center: bounds.center,
            width: bounds.width,
            depth: bounds.depth,
            rotation: bounds.angle,
            outline: bounds.edges(),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.depth
    }

    /// Centerline along the longer side
    pub fn axis(&self) -> Segment {
        OrientedBox {
            center: self.center,
            width: self.width,
            depth: self.depth,
            angle: self.rotation,
        }
        .axis()
    }
}

/// Footprint of a cluster whose minimum bounding box fits within
/// `config.max_size` on both sides; `None` for anything larger or
/// degenerate.
pub fn column_footprint(
    cluster: &[Segment],
    tolerances: &Tolerances,
    config: &ColumnConfig,
) -> Option<Footprint> {
    let bounds = minimum_area_bounding_box(cluster, tolerances)?;
    if bounds.width.max(bounds.depth) > config.max_size {
        return None;
    }
    tracing::trace!(
        width = bounds.width,
        depth = bounds.depth,
        "Cluster fits a column footprint"
    );
    Some(Footprint::from_box(&bounds))
}
