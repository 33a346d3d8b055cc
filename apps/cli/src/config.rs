// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration loaded from environment variables.
//!
//! Every variable is optional; unset or unparsable values keep the
//! pipeline default.

use cad2bim_processing::PipelineConfig;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub pipeline: PipelineConfig,
    /// Size of the rayon pool; `None` lets rayon decide.
    pub worker_threads: Option<usize>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str, default: f64| -> f64 {
            match lookup(key).map(|v| v.trim().parse::<f64>()) {
                Some(Ok(value)) => value,
                Some(Err(_)) => {
                    tracing::warn!(key, default, "Ignoring unparsable environment value");
                    default
                }
                None => default,
            }
        };

        let mut pipeline = PipelineConfig::default();
        let t = &mut pipeline.tolerances;
        t.gap = number("CAD2BIM_GAP", t.gap);
        t.corner = number("CAD2BIM_CORNER", t.corner);
        t.vertex_merge = number("CAD2BIM_VERTEX_TOLERANCE", t.vertex_merge);
        t.min_segment_length = number("CAD2BIM_MIN_SEGMENT_LENGTH", t.min_segment_length);
        t.jitter = number("CAD2BIM_JITTER", t.jitter);
        t.parallel_angle = number("CAD2BIM_PARALLEL_ANGLE", t.parallel_angle);

        let walls = &mut pipeline.walls;
        walls.min_thickness = number("CAD2BIM_MIN_WALL_THICKNESS", walls.min_thickness);
        walls.max_thickness = number("CAD2BIM_MAX_WALL_THICKNESS", walls.max_thickness);
        pipeline.columns.max_size = number("CAD2BIM_MAX_COLUMN_SIZE", pipeline.columns.max_size);

        let worker_threads = lookup("CAD2BIM_WORKER_THREADS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0);

        Self {
            pipeline,
            worker_threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.pipeline, PipelineConfig::default());
        assert_eq!(config.worker_threads, None);
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("CAD2BIM_GAP", "0.05"),
            ("CAD2BIM_VERTEX_TOLERANCE", " 1e-5 "),
            ("CAD2BIM_MAX_WALL_THICKNESS", "0.8"),
            ("CAD2BIM_WORKER_THREADS", "4"),
        ]));
        assert_eq!(config.pipeline.tolerances.gap, 0.05);
        assert_eq!(config.pipeline.tolerances.vertex_merge, 1e-5);
        assert_eq!(config.pipeline.walls.max_thickness, 0.8);
        assert_eq!(config.worker_threads, Some(4));
    }

    #[test]
    fn garbage_keeps_default() {
        let config = Config::from_lookup(lookup(&[
            ("CAD2BIM_CORNER", "wide"),
            ("CAD2BIM_WORKER_THREADS", "0"),
        ]));
        assert_eq!(
            config.pipeline.tolerances.corner,
            PipelineConfig::default().tolerances.corner
        );
        assert_eq!(config.worker_threads, None);
    }
}
