// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning ground areas into meshes
#[derive(Error, Debug)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Non-finite coordinate in {0}")]
    NonFinite(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Model error: {0}")]
    ModelError(#[from] ground3d_core::Error),
}
