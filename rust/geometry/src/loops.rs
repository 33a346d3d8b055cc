// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed loops of segments: ordering, measurement and outline merging.

use serde::{Deserialize, Serialize};

use crate::config::{check_tolerance, EPSILON};
use crate::error::{Error, Result};
use crate::types::{Point2D, Segment};

/// An ordered closed loop: each segment ends where the next one starts, and
/// the last one ends at the first one's start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Loop {
    pub segments: Vec<Segment>,
}

impl Loop {
    /// Wrap segments that are already in head-to-tail order
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Start point of every segment, in travel order
    pub fn vertices(&self) -> Vec<Point2D> {
        self.segments.iter().map(|s| s.start).collect()
    }

    /// Shoelace area: positive for counter-clockwise loops
    pub fn signed_area(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.start.x * s.end.y - s.end.x * s.start.y)
            .sum::<f64>()
            / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Total edge length
    pub fn length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Area centroid; `None` for loops without area
    pub fn centroid(&self) -> Option<Point2D> {
        let area = self.signed_area();
        if area.abs() <= EPSILON {
            return None;
        }
        let (mut cx, mut cy) = (0.0, 0.0);
        for s in &self.segments {
            let cross = s.start.x * s.end.y - s.end.x * s.start.y;
            cx += (s.start.x + s.end.x) * cross;
            cy += (s.start.y + s.end.y) * cross;
        }
        Some(Point2D::new(cx / (6.0 * area), cy / (6.0 * area)))
    }

    /// Even-odd point containment
    pub fn contains_point(&self, point: &Point2D) -> bool {
        let mut inside = false;
        for s in &self.segments {
            let (a, b) = (s.start, s.end);
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Same loop travelled the other way round
    pub fn reversed(&self) -> Self {
        Self::new(self.segments.iter().rev().map(Segment::reversed).collect())
    }
}

/// Put an unordered bag of segments forming one closed loop into
/// head-to-tail travel order, reversing segments as needed.
///
/// Fails with [`Error::OpenLoop`] if the chain breaks before every segment
/// is used, and with [`Error::LoopNotClosed`] if the chain does not return to
/// its start. An empty input gives an empty loop.
pub fn order_loop(segments: &[Segment], tolerance: f64) -> Result<Loop> {
    check_tolerance("loop tolerance", tolerance)?;
    let Some((first, rest)) = segments.split_first() else {
        return Ok(Loop::default());
    };

    let mut ordered = vec![*first];
    let mut remaining: Vec<Segment> = rest.to_vec();
    let mut cursor = first.end;

    while !remaining.is_empty() {
        let forward = remaining
            .iter()
            .position(|s| s.start.almost_eq(&cursor, tolerance));
        let next = match forward {
            Some(idx) => remaining.remove(idx),
            None => {
                let backward = remaining
                    .iter()
                    .position(|s| s.end.almost_eq(&cursor, tolerance));
                match backward {
                    Some(idx) => remaining.remove(idx).reversed(),
                    None => {
                        return Err(Error::OpenLoop {
                            ordered: ordered.len(),
                            remaining: remaining.len(),
                        })
                    }
                }
            }
        };
        cursor = next.end;
        ordered.push(next);
    }

    let gap = cursor.distance_to(&first.start);
    if gap > tolerance {
        return Err(Error::LoopNotClosed { gap });
    }
    Ok(Loop::new(ordered))
}

/// Edges that belong to exactly one of the given loops.
///
/// An edge shared by two adjacent loops (same endpoints in either order) is
/// interior and dropped; what remains is the combined outline.
pub fn deduplicate_shared_edges(loops: &[Loop], tolerance: f64) -> Vec<Segment> {
    let all: Vec<&Segment> = loops.iter().flat_map(|l| l.segments.iter()).collect();
    all.iter()
        .enumerate()
        .filter(|(i, s)| {
            !all.iter()
                .enumerate()
                .any(|(j, other)| *i != j && s.almost_eq(other, tolerance))
        })
        .map(|(_, s)| **s)
        .collect()
}

/// Merge adjacent loops into their single combined outline
pub fn merge_outline(loops: &[Loop], tolerance: f64) -> Result<Loop> {
    let outline = deduplicate_shared_edges(loops, tolerance);
    order_loop(&outline, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-9;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::from_coords(x0, y0, x1, y1)
    }

    fn square(x: f64, y: f64, size: f64) -> Loop {
        Loop::new(vec![
            seg(x, y, x + size, y),
            seg(x + size, y, x + size, y + size),
            seg(x + size, y + size, x, y + size),
            seg(x, y + size, x, y),
        ])
    }

    #[test]
    fn orders_shuffled_and_reversed_segments() {
        let bag = vec![
            seg(10.0, 10.0, 10.0, 0.0),
            seg(0.0, 0.0, 10.0, 0.0),
            seg(0.0, 10.0, 0.0, 0.0),
            seg(10.0, 10.0, 0.0, 10.0),
        ];
        let ordered = order_loop(&bag, TOL).unwrap();
        assert_eq!(ordered.len(), 4);
        for pair in ordered.segments.windows(2) {
            assert!(pair[0].end.almost_eq(&pair[1].start, TOL));
        }
        assert!(ordered.segments[3].end.almost_eq(&ordered.segments[0].start, TOL));
        assert_relative_eq!(ordered.area(), 100.0);
    }

    #[test]
    fn open_chain_is_an_error() {
        let bag = vec![
            seg(0.0, 10.0, 0.0, 0.0),
            seg(0.0, 0.0, 10.0, 0.0),
            seg(10.0, 0.0, 10.0, 10.0),
        ];
        assert!(matches!(order_loop(&bag, TOL), Err(Error::LoopNotClosed { .. })));
    }

    #[test]
    fn broken_chain_is_an_error() {
        let bag = vec![
            seg(0.0, 0.0, 10.0, 0.0),
            seg(10.0, 0.0, 10.0, 10.0),
            seg(0.0, 10.0, 0.0, 0.0),
        ];
        assert!(matches!(order_loop(&bag, TOL), Err(Error::OpenLoop { .. })));
    }

    #[test]
    fn empty_bag_is_an_empty_loop() {
        assert!(order_loop(&[], TOL).unwrap().is_empty());
    }

    #[test]
    fn loop_measurements() {
        let l = square(0.0, 0.0, 2.0);
        assert_relative_eq!(l.signed_area(), 4.0);
        assert!(l.is_counter_clockwise());
        assert_relative_eq!(l.reversed().signed_area(), -4.0);
        assert_relative_eq!(l.length(), 8.0);
        let c = l.centroid().unwrap();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
        assert!(l.contains_point(&Point2D::new(1.0, 1.0)));
        assert!(!l.contains_point(&Point2D::new(3.0, 1.0)));
    }

    #[test]
    fn shared_edges_are_dropped() {
        let left = square(0.0, 0.0, 1.0);
        let right = square(1.0, 0.0, 1.0);
        let outline = deduplicate_shared_edges(&[left.clone(), right.clone()], TOL);
        assert_eq!(outline.len(), 6);

        let merged = merge_outline(&[left, right], TOL).unwrap();
        assert_eq!(merged.len(), 6);
        assert_relative_eq!(merged.area(), 2.0);
    }
}
