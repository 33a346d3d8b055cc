// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! cad2bim - detect rooms, wall axes and columns in imported floor plans.
//!
//! Input is a JSON document of levels, each a list of tagged curves
//! (`segment`, `polyline`, `arc`) in metres:
//!
//! ```json
//! { "levels": [ { "name": "ground", "curves": [ ... ] } ] }
//! ```
//!
//! Output is one layout per level, in input order.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cad2bim_processing::{process_levels, Level, LevelLayout};
use serde::{Deserialize, Serialize};

mod args;
mod config;

use args::{Args, Command, USAGE};
use config::Config;

/// Input document
#[derive(Debug, Deserialize)]
struct Document {
    levels: Vec<Level>,
}

/// Output document
#[derive(Debug, Serialize)]
struct Report<'a> {
    version: &'static str,
    levels: &'a [LevelLayout],
}

fn main() {
    let command = match Args::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e:#}");
            eprintln!();
            eprint!("{USAGE}");
            std::process::exit(2);
        }
    };
    let args = match command {
        Command::Help => {
            print!("{USAGE}");
            return;
        }
        Command::Run(args) => args,
    };

    init_logging(args.log_json);

    if let Err(e) = run(&args) {
        tracing::error!(error = %format!("{e:#}"), "cad2bim failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(json: bool) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cad2bim=debug".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = Config::from_env();
    args.apply(&mut config.pipeline);
    config
        .pipeline
        .validate()
        .context("Invalid pipeline configuration")?;

    if let Some(threads) = config.worker_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to initialize thread pool")?;
    }

    tracing::info!(
        input = %args.input.display(),
        gap = config.pipeline.tolerances.gap,
        vertex_tolerance = config.pipeline.tolerances.vertex_merge,
        parallel = config.pipeline.parallel,
        "Starting cad2bim"
    );

    let document = read_document(&args.input)?;
    let layouts = process_levels(&document.levels, &config.pipeline)
        .context("Plan processing failed")?;

    let report = Report {
        version: env!("CARGO_PKG_VERSION"),
        levels: &layouts,
    };
    match &args.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Cannot create output file {}", path.display()))?;
            serde_json::to_writer_pretty(io::BufWriter::new(file), &report)
                .context("Failed to write results")?;
            tracing::info!(output = %path.display(), levels = layouts.len(), "Results written");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &report).context("Failed to write results")?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

fn read_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read input file {}", path.display()))?;
    let document: Document = serde_json::from_str(&content)
        .with_context(|| format!("Invalid input document {}", path.display()))?;
    tracing::debug!(levels = document.levels.len(), "Loaded input document");
    Ok(document)
}
