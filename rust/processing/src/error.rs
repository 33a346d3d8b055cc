// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while processing a plan
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] cad2bim_geometry::Error),

    #[error(transparent)]
    Topology(#[from] cad2bim_topology::Error),

    #[error("Invalid wall thickness range: min {min} exceeds max {max}")]
    InvalidThicknessRange { min: f64, max: f64 },
}
