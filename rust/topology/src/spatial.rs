// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grid hash for tolerance-based vertex lookup.
//!
//! The plane is divided into square cells of side `cell_size`; a lookup
//! checks the 3x3 block of cells around the query point, so any vertex
//! within `cell_size` of it is found.

use cad2bim_geometry::{Point2D, EPSILON};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::arena::VertexData;
use crate::keys::VertexKey;

#[derive(Debug)]
pub struct VertexIndex {
    cell_size: f64,
    grid: FxHashMap<(i64, i64), Vec<VertexKey>>,
}

impl VertexIndex {
    /// `cell_size` must be >= the tolerance used for queries. Zero is
    /// raised to [`EPSILON`] so exact matching still hashes.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(EPSILON),
            grid: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: VertexKey, position: &Point2D) {
        let cell = self.cell_coords(position);
        self.grid.entry(cell).or_default().push(key);
    }

    /// Closest vertex within `tolerance` of `position`.
    pub fn find_near(
        &self,
        vertices: &SlotMap<VertexKey, VertexData>,
        position: &Point2D,
        tolerance: f64,
    ) -> Option<VertexKey> {
        let (cx, cy) = self.cell_coords(position);
        let mut best: Option<(f64, VertexKey)> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(keys) = self.grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &vk in keys {
                    let Some(v) = vertices.get(vk) else {
                        continue;
                    };
                    let d = v.position.distance_to(position);
                    if d <= tolerance && best.map_or(true, |(bd, bk)| d < bd || (d == bd && vk < bk)) {
                        best = Some((d, vk));
                    }
                }
            }
        }

        best.map(|(_, key)| key)
    }

    fn cell_coords(&self, position: &Point2D) -> (i64, i64) {
        (
            (position.x / self.cell_size).floor() as i64,
            (position.y / self.cell_size).floor() as i64,
        )
    }
}
