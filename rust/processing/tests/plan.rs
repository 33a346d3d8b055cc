// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole-plan processing on small drawings.

use approx::assert_relative_eq;
use cad2bim_geometry::Segment;
use cad2bim_processing::{process_plan, DetectionOptions, PipelineConfig};
use cad2bim_topology::PerimeterRule;

fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
    Segment::from_coords(x0, y0, x1, y1)
}

fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Segment> {
    vec![
        seg(x0, y0, x1, y0),
        seg(x1, y0, x1, y1),
        seg(x1, y1, x0, y1),
        seg(x0, y1, x0, y0),
    ]
}

/// Single room enclosed by 0.2m walls drawn as two outlines
fn double_walled_room() -> Vec<Segment> {
    let mut segments = rectangle(0.0, 0.0, 10.0, 8.0);
    segments.extend(rectangle(0.2, 0.2, 9.8, 7.8));
    segments
}

#[test]
fn double_lines_give_four_wall_axes() {
    let layout = process_plan(&double_walled_room(), &PipelineConfig::default()).unwrap();
    assert_eq!(layout.stats.clusters, 2);
    assert_eq!(layout.walls.len(), 4);
    for wall in &layout.walls {
        assert_relative_eq!(wall.thickness, 0.2, epsilon = 1e-9);
    }
    let total: f64 = layout.walls.iter().map(|w| w.axis.length()).sum();
    assert_relative_eq!(total, 2.0 * 10.0 + 2.0 * 8.0, epsilon = 1e-9);
}

#[test]
fn double_walled_rooms_are_found_between_axes() {
    // Two rooms behind 0.2m walls, the shared wall drawn as two faces
    let mut segments = rectangle(0.0, 0.0, 10.2, 5.2);
    segments.extend(rectangle(0.2, 0.2, 5.0, 5.0));
    segments.extend(rectangle(5.2, 0.2, 10.0, 5.0));

    let layout = process_plan(&segments, &PipelineConfig::default()).unwrap();
    assert_eq!(layout.stats.clusters, 3);
    assert_eq!(layout.walls.len(), 5);
    assert_eq!(layout.rooms.len(), 2);
    assert_eq!(layout.outlines.len(), 1);
    for room in &layout.rooms {
        assert_relative_eq!(room.area, 25.0, epsilon = 1e-9);
        assert!(room.outline.is_counter_clockwise());
    }
    assert_relative_eq!(layout.outlines[0].area(), 50.0, epsilon = 1e-9);
}

#[test]
fn single_line_partition_meets_wall_axes() {
    let mut segments = double_walled_room();
    segments.push(seg(5.0, 0.2, 5.0, 7.8));

    let layout = process_plan(&segments, &PipelineConfig::default()).unwrap();
    assert_eq!(layout.walls.len(), 4);
    assert_eq!(layout.rooms.len(), 2);
    for room in &layout.rooms {
        assert_relative_eq!(room.area, 4.9 * 7.8, epsilon = 1e-9);
    }
}

#[test]
fn single_room_is_its_own_outline_by_edge_count() {
    let layout = process_plan(&double_walled_room(), &PipelineConfig::default()).unwrap();
    assert!(layout.rooms.is_empty());
    assert_eq!(layout.outlines.len(), 1);
    assert_relative_eq!(layout.outlines[0].area(), 9.8 * 7.8, epsilon = 1e-9);
}

#[test]
fn orientation_rule_reports_counter_clockwise_faces() {
    let config = PipelineConfig {
        detection: DetectionOptions {
            perimeter_rule: PerimeterRule::Orientation,
            ..DetectionOptions::default()
        },
        ..PipelineConfig::default()
    };
    let layout = process_plan(&double_walled_room(), &config).unwrap();
    assert_eq!(layout.rooms.len(), 1);
    assert_relative_eq!(layout.rooms[0].area, 9.8 * 7.8, epsilon = 1e-9);
}

#[test]
fn gaps_are_closed_before_detection() {
    // Two rooms; the partition stops 5mm short of the top wall
    let mut segments = rectangle(0.0, 0.0, 10.0, 6.0);
    segments.push(seg(5.0, 0.0, 5.0, 5.995));

    let layout = process_plan(&segments, &PipelineConfig::default()).unwrap();
    assert_eq!(layout.rooms.len(), 2);
    for room in &layout.rooms {
        assert_relative_eq!(room.area, 30.0, epsilon = 1e-9);
        assert!(room.centroid.is_some());
    }
}

#[test]
fn layout_serializes_to_json() {
    let mut segments = rectangle(0.0, 0.0, 10.0, 6.0);
    segments.push(seg(5.0, 0.0, 5.0, 6.0));
    segments.extend(rectangle(20.0, 0.0, 20.5, 0.5));

    let layout = process_plan(&segments, &PipelineConfig::default()).unwrap();
    let json = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["rooms"].as_array().unwrap().len(), 2);
    assert_eq!(json["columns"].as_array().unwrap().len(), 1);
    assert_eq!(json["stats"]["clusters"], 2);
}
