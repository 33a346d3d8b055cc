// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Imported drawing curves and their conversion to segments.
//!
//! Conversion happens once, at ingestion; every later stage works on
//! [`Segment`] only.

use serde::{Deserialize, Serialize};

use crate::config::Tolerances;
use crate::types::{Point2D, Segment};

/// A curve as delivered by a drawing importer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Curve {
    Segment(Segment),
    Polyline {
        points: Vec<Point2D>,
        /// Emit a closing edge from the last point back to the first
        #[serde(default)]
        closed: bool,
    },
    /// Counter-clockwise arc from `start_angle` to `end_angle` (radians)
    Arc {
        center: Point2D,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

impl Curve {
    /// Straight curves contribute orientations to bounding boxes
    pub fn is_straight(&self) -> bool {
        !matches!(self, Curve::Arc { .. })
    }

    /// Polylines become runs of segments; arcs are flattened to their chord.
    pub fn to_segments(&self) -> Vec<Segment> {
        match self {
            Curve::Segment(s) => vec![*s],
            Curve::Polyline { points, closed } => {
                let mut out: Vec<Segment> = points
                    .windows(2)
                    .map(|w| Segment::new(w[0], w[1]))
                    .collect();
                if *closed && points.len() > 2 {
                    out.push(Segment::new(points[points.len() - 1], points[0]));
                }
                out
            }
            Curve::Arc { .. } => match self.endpoints().as_slice() {
                [start, end] => vec![Segment::new(*start, *end)],
                _ => Vec::new(),
            },
        }
    }

    /// Start and end points (every vertex for polylines)
    pub fn endpoints(&self) -> Vec<Point2D> {
        match self {
            Curve::Segment(s) => vec![s.start, s.end],
            Curve::Polyline { points, .. } => points.clone(),
            Curve::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                if *radius <= 0.0 {
                    return Vec::new();
                }
                let at = |angle: f64| {
                    Point2D::with_z(
                        center.x + radius * angle.cos(),
                        center.y + radius * angle.sin(),
                        center.z,
                    )
                };
                vec![at(*start_angle), at(*end_angle)]
            }
        }
    }
}

/// Drop segments whose length does not exceed `min_length`
pub fn filter_degenerate(segments: &[Segment], min_length: f64) -> Vec<Segment> {
    segments
        .iter()
        .filter(|s| !s.is_degenerate(min_length))
        .copied()
        .collect()
}

/// Convert imported curves to segments, dropping degenerate pieces
pub fn ingest(curves: &[Curve], tolerances: &Tolerances) -> Vec<Segment> {
    let raw: Vec<Segment> = curves.iter().flat_map(Curve::to_segments).collect();
    let segments = filter_degenerate(&raw, tolerances.min_segment_length);
    tracing::debug!(
        curves = curves.len(),
        segments = segments.len(),
        dropped = raw.len() - segments.len(),
        "Ingested curves"
    );
    segments
}
