// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The plan pipeline: shatter, cluster, patch, pair walls, detect.
//!
//! A plan is split into clusters of connected linework right after
//! shattering. Each cluster has its gaps closed on its own (on the rayon
//! pool when [`PipelineConfig::parallel`] is set), and small closed clusters
//! become column footprints.
//!
//! The remaining faces are paired into wall centerlines. Rooms are then
//! found on the centerlines, the column axes and every face that belongs to
//! no wall, so a plan drawn with double-line walls encloses its rooms
//! between wall axes. Axis ends stopping short of a crossing wall are
//! extended by up to [`WallAxisConfig::max_thickness`](crate::WallAxisConfig).

use std::time::Instant;

use cad2bim_geometry::{
    close_gap_at_corner, close_gaps, cluster_by_intersection, filter_degenerate, shatter, Loop,
    Point2D, Segment,
};
use cad2bim_topology::{detect_regions, RegionSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::columns::{column_footprint, Footprint};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::walls::{pair_wall_faces, WallAxis, WallPairing};

/// An enclosed region found between walls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub outline: Loop,
    pub area: f64,
    pub centroid: Option<Point2D>,
    /// Index of the room cluster the room was found in
    pub cluster: usize,
}

impl Room {
    fn new(outline: Loop, cluster: usize) -> Self {
        Self {
            area: outline.area(),
            centroid: outline.centroid(),
            outline,
            cluster,
        }
    }
}

/// Counters for one plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanStats {
    pub input_segments: usize,
    pub shattered_segments: usize,
    /// Clusters of input linework
    pub clusters: usize,
    /// Clusters of axes and single lines handed to region detection
    pub room_clusters: usize,
    pub rooms: usize,
    pub outlines: usize,
    pub walls: usize,
    pub columns: usize,
    /// Faces discarded as open or capped, over all room clusters
    pub discarded_faces: usize,
    pub elapsed_ms: u64,
}

/// Everything extracted from one plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanLayout {
    pub rooms: Vec<Room>,
    /// Outer perimeters of the room clusters
    pub outlines: Vec<Loop>,
    pub walls: Vec<WallAxis>,
    pub columns: Vec<Footprint>,
    pub stats: PlanStats,
}

/// Result of preparing one cluster of input linework
#[derive(Debug, Clone)]
pub struct ClusterOutcome {
    pub index: usize,
    /// Cluster segments after gap closing
    pub segments: Vec<Segment>,
    pub footprint: Option<Footprint>,
}

/// Run the full pipeline over one plan's segments.
pub fn process_plan(segments: &[Segment], config: &PipelineConfig) -> Result<PlanLayout> {
    let start = Instant::now();
    config.validate()?;
    let tolerances = &config.tolerances;

    let usable = filter_degenerate(segments, tolerances.min_segment_length);
    let shattered = shatter(&usable, tolerances.vertex_merge)?;
    let clusters = cluster_by_intersection(&shattered, tolerances.jitter)?;
    let outcomes = map_clusters(&clusters, config.parallel, |index, cluster| {
        process_cluster(index, cluster, config)
    })?;

    let mut layout = PlanLayout::default();
    let mut faces: Vec<Segment> = Vec::new();
    for outcome in outcomes {
        match outcome.footprint {
            Some(footprint) => layout.columns.push(footprint),
            None => faces.extend(outcome.segments),
        }
    }

    let WallPairing { walls, unpaired } = pair_wall_faces(&faces, tolerances, &config.walls)?;
    let mut linework: Vec<Segment> = walls.iter().map(|w| w.axis).collect();
    linework.extend(layout.columns.iter().map(Footprint::axis));
    linework.extend(unpaired);
    layout.walls = walls;

    let room_clusters = room_linework(&linework, config)?;
    let detections = map_clusters(&room_clusters, config.parallel, |_, cluster| {
        Ok(detect_regions(cluster, &config.region_config())?)
    })?;
    for (index, detection) in detections.into_iter().enumerate() {
        layout.stats.discarded_faces +=
            detection.stats.open_faces + detection.stats.capped_faces;
        let RegionSet {
            perimeters, regions, ..
        } = detection;
        layout.outlines.extend(perimeters);
        layout
            .rooms
            .extend(regions.into_iter().map(|r| Room::new(r, index)));
    }

    layout.stats.input_segments = segments.len();
    layout.stats.shattered_segments = shattered.len();
    layout.stats.clusters = clusters.len();
    layout.stats.room_clusters = room_clusters.len();
    layout.stats.rooms = layout.rooms.len();
    layout.stats.outlines = layout.outlines.len();
    layout.stats.walls = layout.walls.len();
    layout.stats.columns = layout.columns.len();
    layout.stats.elapsed_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        segments = segments.len(),
        clusters = clusters.len(),
        rooms = layout.stats.rooms,
        walls = layout.stats.walls,
        columns = layout.stats.columns,
        elapsed_ms = layout.stats.elapsed_ms,
        "Plan processing complete"
    );
    Ok(layout)
}

/// Close gaps in one cluster and check whether it is a column.
///
/// Only closed clusters can be columns; a lone short stroke has a box but
/// no perimeter.
pub fn process_cluster(
    index: usize,
    cluster: &[Segment],
    config: &PipelineConfig,
) -> Result<ClusterOutcome> {
    let patched = close_gaps(cluster, &config.tolerances)?;
    let footprint = match column_footprint(&patched, &config.tolerances, &config.columns) {
        Some(footprint) => detect_regions(&patched, &config.region_config())?
            .perimeter
            .map(|_| footprint),
        None => None,
    };
    tracing::trace!(
        cluster = index,
        segments = patched.len(),
        column = footprint.is_some(),
        "Processed cluster"
    );
    Ok(ClusterOutcome {
        index,
        segments: patched,
        footprint,
    })
}

/// Join axis ends to the walls they stop short of and regroup the result
/// for region detection.
fn room_linework(linework: &[Segment], config: &PipelineConfig) -> Result<Vec<Vec<Segment>>> {
    let tolerances = &config.tolerances;
    let joined = close_gap_at_corner(
        linework,
        config.walls.max_thickness,
        tolerances.parallel_angle,
    )?;
    let shattered = shatter(&joined, tolerances.vertex_merge)?;
    Ok(cluster_by_intersection(&shattered, tolerances.jitter)?)
}

fn map_clusters<T, F>(clusters: &[Vec<Segment>], parallel: bool, run: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize, &[Segment]) -> Result<T> + Sync,
{
    if parallel {
        clusters
            .par_iter()
            .enumerate()
            .map(|(index, cluster)| run(index, cluster))
            .collect()
    } else {
        clusters
            .iter()
            .enumerate()
            .map(|(index, cluster)| run(index, cluster))
            .collect()
    }
}
