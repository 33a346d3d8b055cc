// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for region detection.

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during region detection.
///
/// Inputs without closed loops are not errors; they produce an empty
/// [`RegionSet`](crate::RegionSet).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A geometry stage (shatter, tolerance validation) rejected its input.
    #[error(transparent)]
    Geometry(#[from] cad2bim_geometry::Error),
}
