// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::LevelId;
use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported when validating a building model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Non-finite coordinate in {0}")]
    NonFiniteCoordinate(String),

    #[error("Unknown level #{0} referenced by {1}")]
    UnknownLevel(u32, String),

    #[error("Duplicate level id #{0}")]
    DuplicateLevel(u32),

    #[error("Invalid ground bounds: {0}")]
    InvalidGroundBounds(String),

    #[error("Invalid level {0:?}: {1}")]
    InvalidLevel(LevelId, String),
}
