// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall centerlines from pairs of parallel face segments.
//!
//! Every pair of parallel segments whose spacing falls in the configured
//! thickness range and whose projections overlap yields an axis fragment.
//! Fragments lying on a common line are then fused, so a wall interrupted
//! by openings or junctions still gets one centerline.

use cad2bim_geometry::{
    are_parallel, fuse_collinear, generate_axis, is_shadowing, overlaps_along_line,
    partition_indices_by, spacing, Segment, Tolerances, EPSILON,
};
use serde::{Deserialize, Serialize};

use crate::config::WallAxisConfig;
use crate::error::Result;

/// A wall centerline with the measured distance between its faces
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WallAxis {
    pub axis: Segment,
    pub thickness: f64,
}

/// Wall centerlines plus the faces that belong to no wall
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WallPairing {
    pub walls: Vec<WallAxis>,
    /// Single-line linework, in input order
    pub unpaired: Vec<Segment>,
}

/// Derive one centerline per wall from its face segments.
pub fn derive_wall_axes(
    segments: &[Segment],
    tolerances: &Tolerances,
    config: &WallAxisConfig,
) -> Result<Vec<WallAxis>> {
    Ok(pair_wall_faces(segments, tolerances, config)?.walls)
}

/// Pair wall faces into centerlines and keep the segments no pair claimed.
pub fn pair_wall_faces(
    segments: &[Segment],
    tolerances: &Tolerances,
    config: &WallAxisConfig,
) -> Result<WallPairing> {
    config.validate()?;

    let mut paired = vec![false; segments.len()];
    let mut fragments: Vec<WallAxis> = Vec::new();
    for (i, a) in segments.iter().enumerate() {
        for (j, b) in segments.iter().enumerate().skip(i + 1) {
            if let Some(fragment) = pair_axis(a, b, tolerances, config) {
                fragments.push(fragment);
                paired[i] = true;
                paired[j] = true;
            }
        }
    }

    let axes: Vec<Segment> = fragments.iter().map(|f| f.axis).collect();
    let groups = partition_indices_by(&axes, |a, b| {
        overlaps_along_line(a, b, tolerances.parallel_angle, tolerances.gap)
    });

    let walls: Vec<WallAxis> = groups
        .iter()
        .filter_map(|members| merge_fragments(&fragments, members, tolerances.gap))
        .collect();
    let unpaired: Vec<Segment> = segments
        .iter()
        .zip(&paired)
        .filter(|(_, p)| !**p)
        .map(|(s, _)| *s)
        .collect();

    tracing::debug!(
        segments = segments.len(),
        fragments = fragments.len(),
        walls = walls.len(),
        unpaired = unpaired.len(),
        "Derived wall axes"
    );
    Ok(WallPairing { walls, unpaired })
}

/// Axis between two faces, if they can be the two sides of one wall
fn pair_axis(
    a: &Segment,
    b: &Segment,
    tolerances: &Tolerances,
    config: &WallAxisConfig,
) -> Option<WallAxis> {
    if !are_parallel(a, b, tolerances.parallel_angle) {
        return None;
    }
    let thickness = spacing(a, b);
    if thickness < config.min_thickness || thickness > config.max_thickness {
        return None;
    }
    if !is_shadowing(a, b, tolerances.gap) {
        return None;
    }
    let axis = generate_axis(a, b, tolerances.vertex_merge)?;
    Some(WallAxis { axis, thickness })
}

/// Fuse a group of collinear fragments; thickness is the length-weighted mean
fn merge_fragments(fragments: &[WallAxis], members: &[usize], gap: f64) -> Option<WallAxis> {
    let group: Vec<Segment> = members.iter().map(|&i| fragments[i].axis).collect();
    let axis = fuse_collinear(&group, gap)?;

    let (weighted, total) = members.iter().fold((0.0, 0.0), |(w, t), &i| {
        let length = fragments[i].axis.length();
        (w + fragments[i].thickness * length, t + length)
    });
    let thickness = if total > EPSILON {
        weighted / total
    } else {
        fragments[members[0]].thickness
    };
    Some(WallAxis { axis, thickness })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::from_coords(x0, y0, x1, y1)
    }

    /// 10m long, 0.2m thick wall along X, faces and end caps
    fn straight_wall() -> Vec<Segment> {
        vec![
            seg(0.0, 0.0, 10.0, 0.0),
            seg(10.0, 0.0, 10.0, 0.2),
            seg(10.0, 0.2, 0.0, 0.2),
            seg(0.0, 0.2, 0.0, 0.0),
        ]
    }

    #[test]
    fn straight_wall_has_one_centerline() {
        let walls = derive_wall_axes(
            &straight_wall(),
            &Tolerances::default(),
            &WallAxisConfig::default(),
        )
        .unwrap();
        assert_eq!(walls.len(), 1);
        let wall = walls[0];
        assert_relative_eq!(wall.thickness, 0.2, epsilon = 1e-12);
        assert_relative_eq!(wall.axis.length(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(wall.axis.start.y, 0.1, epsilon = 1e-12);
        assert_relative_eq!(wall.axis.end.y, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn opening_does_not_split_the_axis() {
        // Bottom face interrupted by a door between x=4 and x=5
        let segments = vec![
            seg(0.0, 0.0, 4.0, 0.0),
            seg(5.0, 0.0, 10.0, 0.0),
            seg(10.0, 0.2, 0.0, 0.2),
        ];
        let walls =
            derive_wall_axes(&segments, &Tolerances::default(), &WallAxisConfig::default())
                .unwrap();
        assert_eq!(walls.len(), 1);
        assert_relative_eq!(walls[0].axis.length(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn faces_too_far_apart_are_not_a_wall() {
        let segments = vec![seg(0.0, 0.0, 10.0, 0.0), seg(0.0, 4.0, 10.0, 4.0)];
        let walls =
            derive_wall_axes(&segments, &Tolerances::default(), &WallAxisConfig::default())
                .unwrap();
        assert!(walls.is_empty());
    }

    #[test]
    fn offset_faces_must_shadow_each_other() {
        let segments = vec![seg(0.0, 0.0, 4.0, 0.0), seg(5.0, 0.2, 9.0, 0.2)];
        let walls =
            derive_wall_axes(&segments, &Tolerances::default(), &WallAxisConfig::default())
                .unwrap();
        assert!(walls.is_empty());
    }

    #[test]
    fn single_lines_are_left_unpaired() {
        let mut segments = straight_wall();
        segments.push(seg(4.0, 0.2, 4.0, 5.0));
        let pairing =
            pair_wall_faces(&segments, &Tolerances::default(), &WallAxisConfig::default())
                .unwrap();
        assert_eq!(pairing.walls.len(), 1);
        // Both end caps and the partition
        assert_eq!(pairing.unpaired.len(), 3);
        assert!(pairing
            .unpaired
            .iter()
            .any(|s| s.almost_eq(&seg(4.0, 0.2, 4.0, 5.0), 1e-12)));
    }

    #[test]
    fn l_shaped_wall_has_two_axes() {
        let segments = vec![
            seg(0.0, 0.0, 6.0, 0.0),
            seg(0.2, 0.2, 6.0, 0.2),
            seg(0.0, 0.0, 0.0, 6.0),
            seg(0.2, 0.2, 0.2, 6.0),
        ];
        let walls =
            derive_wall_axes(&segments, &Tolerances::default(), &WallAxisConfig::default())
                .unwrap();
        assert_eq!(walls.len(), 2);
        for wall in &walls {
            assert_relative_eq!(wall.thickness, 0.2, epsilon = 1e-12);
        }
    }
}
