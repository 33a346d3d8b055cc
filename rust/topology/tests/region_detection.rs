// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end region detection on small plans.

use approx::assert_relative_eq;
use cad2bim_geometry::{close_gaps, Loop, Point2D, Segment, Tolerances};
use cad2bim_topology::{detect_regions, PerimeterRule, PruneMode, RegionConfig};

fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
    Segment::from_coords(x0, y0, x1, y1)
}

fn square() -> Vec<Segment> {
    vec![
        seg(0.0, 0.0, 10.0, 0.0),
        seg(10.0, 0.0, 10.0, 10.0),
        seg(10.0, 10.0, 0.0, 10.0),
        seg(0.0, 10.0, 0.0, 0.0),
    ]
}

fn partitioned_square() -> Vec<Segment> {
    let mut segments = square();
    segments.push(seg(5.0, 0.0, 5.0, 10.0));
    segments
}

/// Loop vertices rounded and sorted, for order-independent comparison
fn vertex_set(l: &Loop) -> Vec<(i64, i64)> {
    let mut v: Vec<(i64, i64)> = l
        .vertices()
        .iter()
        .map(|p| ((p.x * 1e6).round() as i64, (p.y * 1e6).round() as i64))
        .collect();
    v.sort_unstable();
    v
}

fn scaled(points: &[(f64, f64)]) -> Vec<(i64, i64)> {
    let mut v: Vec<(i64, i64)> = points
        .iter()
        .map(|(x, y)| ((x * 1e6).round() as i64, (y * 1e6).round() as i64))
        .collect();
    v.sort_unstable();
    v
}

fn touches(l: &Loop, p: &Point2D) -> bool {
    l.vertices().iter().any(|v| v.almost_eq(p, 1e-6))
}

#[test]
fn unit_square_has_perimeter_and_no_regions() {
    let result = detect_regions(&square(), &RegionConfig::default()).unwrap();
    assert!(result.regions.is_empty());

    let perimeter = result.perimeter.unwrap();
    assert_eq!(perimeter.len(), 4);
    assert_relative_eq!(perimeter.area(), 100.0);
}

#[test]
fn partition_splits_square_into_two_rooms() {
    let result = detect_regions(&partitioned_square(), &RegionConfig::default()).unwrap();

    let perimeter = result.perimeter.unwrap();
    assert_eq!(perimeter.len(), 6);
    assert_relative_eq!(perimeter.area(), 100.0);

    assert_eq!(result.regions.len(), 2);
    let mut rooms: Vec<Vec<(i64, i64)>> = result.regions.iter().map(vertex_set).collect();
    rooms.sort();
    assert_eq!(
        rooms,
        vec![
            scaled(&[(0.0, 0.0), (5.0, 0.0), (5.0, 10.0), (0.0, 10.0)]),
            scaled(&[(5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (5.0, 10.0)]),
        ]
    );
    for room in &result.regions {
        assert_eq!(room.len(), 4);
        assert!(room.is_counter_clockwise());
        assert_relative_eq!(room.area(), 50.0);
    }
}

#[test]
fn regions_are_closed_head_to_tail() {
    let result = detect_regions(&partitioned_square(), &RegionConfig::default()).unwrap();
    for room in &result.regions {
        for pair in room.segments.windows(2) {
            assert!(pair[0].end.almost_eq(&pair[1].start, 1e-9));
        }
        let (first, last) = (room.segments[0], room.segments[room.len() - 1]);
        assert!(last.end.almost_eq(&first.start, 1e-9));
    }
}

#[test]
fn dangling_flag_is_excluded() {
    let flag_tip = Point2D::new(13.0, 13.0);
    let mut flagged = square();
    flagged.push(Segment::new(Point2D::new(10.0, 10.0), flag_tip));

    let plain = detect_regions(&square(), &RegionConfig::default()).unwrap();
    let with_flag = detect_regions(&flagged, &RegionConfig::default()).unwrap();

    assert_eq!(with_flag.regions.len(), plain.regions.len());
    let (a, b) = (plain.perimeter.unwrap(), with_flag.perimeter.unwrap());
    assert_eq!(vertex_set(&a), vertex_set(&b));
    assert!(!touches(&b, &flag_tip));
    assert!(with_flag.regions.iter().all(|r| !touches(r, &flag_tip)));
    assert_eq!(with_flag.stats.killed, 2);
}

#[test]
fn flag_inside_a_room_is_excluded() {
    let mut segments = partitioned_square();
    segments.push(seg(5.0, 5.0, 7.0, 5.0));
    let result = detect_regions(&segments, &RegionConfig::default()).unwrap();
    assert_eq!(result.regions.len(), 2);
    let tip = Point2D::new(7.0, 5.0);
    assert!(result.regions.iter().all(|r| !touches(r, &tip)));
}

/// Two-hop chain hanging off the outer corner of a partitioned square
fn square_with_long_tail() -> Vec<Segment> {
    let mut segments = partitioned_square();
    segments.push(seg(10.0, 10.0, 12.0, 10.0));
    segments.push(seg(12.0, 10.0, 14.0, 10.0));
    segments
}

#[test]
fn fixed_point_pruning_keeps_every_room() {
    let config = RegionConfig::default().with_pruning(PruneMode::FixedPoint);
    let result = detect_regions(&square_with_long_tail(), &config).unwrap();
    assert_eq!(result.regions.len(), 2);
    assert_eq!(result.perimeter.unwrap().len(), 6);
    assert_eq!(result.stats.prune_rounds, 2);
    assert_eq!(result.stats.open_faces, 0);
}

#[test]
fn single_pass_pruning_loses_the_outer_face() {
    let config = RegionConfig::default().with_pruning(PruneMode::SinglePass);
    let result = detect_regions(&square_with_long_tail(), &config).unwrap();

    // The outer walk runs into the half-pruned tail and is discarded, so
    // one of the rooms is taken for the perimeter.
    assert!(result.stats.open_faces > 0);
    assert_eq!(result.regions.len(), 1);
    assert_eq!(result.perimeter.unwrap().len(), 4);
}

#[test]
fn floating_point_noise_merges_into_one_vertex() {
    let mut segments = partitioned_square();
    segments[1] = seg(10.0, 0.0, 10.0 + 1e-9, 10.0 - 1e-9);

    let result = detect_regions(&segments, &RegionConfig::default()).unwrap();
    assert_eq!(result.regions.len(), 2);
    assert_eq!(result.stats.killed, 0);
}

#[test]
fn too_tight_vertex_tolerance_loses_a_room() {
    let mut segments = partitioned_square();
    segments[1] = seg(10.0, 0.0, 10.0 + 1e-9, 10.0 - 1e-9);

    let config = RegionConfig {
        vertex_tolerance: 1e-12,
        ..RegionConfig::default()
    };
    let result = detect_regions(&segments, &config).unwrap();
    assert!(result.regions.is_empty());
    assert!(result.stats.killed > 0);

    // What survives is the untouched left room
    let perimeter = result.perimeter.unwrap();
    assert_relative_eq!(perimeter.area(), 50.0, epsilon = 1e-6);
}

#[test]
fn corner_gap_needs_patching_before_detection() {
    let mut segments = partitioned_square();
    segments[1] = seg(10.0, 0.0, 10.0, 9.999);

    let raw = detect_regions(&segments, &RegionConfig::default()).unwrap();
    assert!(raw.regions.is_empty());

    let patched = close_gaps(&segments, &Tolerances::default()).unwrap();
    let result = detect_regions(&patched, &RegionConfig::default()).unwrap();
    assert_eq!(result.regions.len(), 2);
}

#[test]
fn no_closed_loop_gives_empty_result() {
    let segments = vec![
        seg(0.0, 0.0, 10.0, 0.0),
        seg(10.0, 0.0, 10.0, 10.0),
        seg(10.0, 10.0, 0.0, 10.0),
    ];
    let result = detect_regions(&segments, &RegionConfig::default()).unwrap();
    assert!(result.regions.is_empty());
    assert!(result.perimeter.is_none());
    assert_eq!(result.stats.closed_faces, 0);
}

#[test]
fn orientation_rule_counts_every_room() {
    let config = RegionConfig::default().with_perimeter_rule(PerimeterRule::Orientation);

    let lone = detect_regions(&square(), &config).unwrap();
    assert_eq!(lone.regions.len(), 1);

    let split = detect_regions(&partitioned_square(), &config).unwrap();
    assert_eq!(split.regions.len(), 2);
    assert_eq!(split.perimeter.unwrap().len(), 6);
}

#[test]
fn three_by_one_row_of_rooms() {
    let mut segments = vec![seg(0.0, 0.0, 12.0, 0.0), seg(0.0, 4.0, 12.0, 4.0)];
    for x in [0.0, 4.0, 8.0, 12.0] {
        segments.push(seg(x, 0.0, x, 4.0));
    }
    let result = detect_regions(&segments, &RegionConfig::default()).unwrap();
    assert_eq!(result.regions.len(), 3);
    assert_eq!(result.perimeter.unwrap().len(), 8);
    let total: f64 = result.regions.iter().map(Loop::area).sum();
    assert_relative_eq!(total, 48.0);
}
