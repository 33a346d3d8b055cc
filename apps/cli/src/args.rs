// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command line arguments.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use cad2bim_processing::PipelineConfig;
use cad2bim_topology::{PerimeterRule, PruneMode};

pub const USAGE: &str = "\
Usage:
  cad2bim <input.json> [options]

Reads a JSON document of building levels with imported curves and writes
the detected rooms, outlines, wall axes and column footprints as JSON.

Options:
  --output <file>             Write results to a file instead of stdout
  --gap <m>                   Collinear gap closed between segments
  --corner <m>                Corner and T-junction patch distance
  --vertex-tolerance <m>      Distance within which endpoints merge
  --single-pass               Prune dangling edges once instead of to a fixed point
  --perimeter <edges|orientation>
                              Rule separating outer boundaries from rooms
  --sequential                Process clusters and levels on one thread
  --log-json                  Emit log events as JSON
  -h, --help                  Show this help

Environment:
  CAD2BIM_GAP, CAD2BIM_CORNER, CAD2BIM_VERTEX_TOLERANCE,
  CAD2BIM_MIN_SEGMENT_LENGTH, CAD2BIM_JITTER, CAD2BIM_PARALLEL_ANGLE,
  CAD2BIM_MIN_WALL_THICKNESS, CAD2BIM_MAX_WALL_THICKNESS,
  CAD2BIM_MAX_COLUMN_SIZE, CAD2BIM_WORKER_THREADS, RUST_LOG
";

/// Parsed command line. Flags override environment configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub gap: Option<f64>,
    pub corner: Option<f64>,
    pub vertex_tolerance: Option<f64>,
    pub single_pass: bool,
    pub perimeter: Option<PerimeterRule>,
    pub sequential: bool,
    pub log_json: bool,
}

/// What the command line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Args),
    Help,
}

impl Args {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Command>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut parsed = Args::default();
        let mut input: Option<PathBuf> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "--output" => parsed.output = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--gap" => parsed.gap = Some(number(&mut args, &arg)?),
                "--corner" => parsed.corner = Some(number(&mut args, &arg)?),
                "--vertex-tolerance" => parsed.vertex_tolerance = Some(number(&mut args, &arg)?),
                "--single-pass" => parsed.single_pass = true,
                "--perimeter" => {
                    parsed.perimeter = Some(match value(&mut args, &arg)?.as_str() {
                        "edges" => PerimeterRule::MaxEdgeCount,
                        "orientation" => PerimeterRule::Orientation,
                        other => bail!("Unknown perimeter rule: {other}"),
                    })
                }
                "--sequential" => parsed.sequential = true,
                "--log-json" => parsed.log_json = true,
                other if other.starts_with('-') => bail!("Unknown option: {other}"),
                path => {
                    if input.is_some() {
                        bail!("Unexpected extra argument: {path}");
                    }
                    input = Some(PathBuf::from(path));
                }
            }
        }

        parsed.input = input.ok_or_else(|| anyhow!("Missing input file"))?;
        Ok(Command::Run(parsed))
    }

    /// Apply flag overrides to a pipeline configuration
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(gap) = self.gap {
            config.tolerances.gap = gap;
        }
        if let Some(corner) = self.corner {
            config.tolerances.corner = corner;
        }
        if let Some(tolerance) = self.vertex_tolerance {
            config.tolerances.vertex_merge = tolerance;
        }
        if self.single_pass {
            config.detection.pruning = PruneMode::SinglePass;
        }
        if let Some(rule) = self.perimeter {
            config.detection.perimeter_rule = rule;
        }
        if self.sequential {
            config.parallel = false;
        }
    }
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("Missing value for {flag}"))
}

fn number<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<f64> {
    let raw = value(args, flag)?;
    raw.parse()
        .with_context(|| format!("Invalid value for {flag}: {raw}"))
}
