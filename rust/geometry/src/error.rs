// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during segment processing
///
/// Degenerate input (empty lists, zero-length segments) is never an error;
/// operations return empty results for it instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid tolerance `{name}`: {value} (must be finite and non-negative)")]
    InvalidTolerance { name: &'static str, value: f64 },

    #[error("Open loop: {ordered} segments chained, {remaining} left without a matching endpoint")]
    OpenLoop { ordered: usize, remaining: usize },

    #[error("Loop does not close: last end point is {gap} away from the first start point")]
    LoopNotClosed { gap: f64 },
}
