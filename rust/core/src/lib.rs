// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Ground3D Core
//!
//! Read-only building model consumed by the ground generator.
//!
//! ## Overview
//!
//! The types in this crate are owned and mutated by the editing application;
//! the ground engine only reads them:
//!
//! - **Levels**: elevation, height, floor thickness and visibility flags
//! - **Footprint sources**: rooms, walls and pieces of furniture with their
//!   2D polygons on the horizontal plane
//! - **Ground environment**: ground bounds, colour and optional texture
//! - **Changes**: [`ModelChange`] values sent to the single recomposition trigger
//!
//! ## Quick Start
//!
//! ```rust
//! use ground3d_core::{GroundBounds, HomeModel, Level, LevelId, Room};
//!
//! let mut home = HomeModel::new(GroundBounds::new(-1000.0, -1000.0, 2000.0, 2000.0));
//! home.levels.push(Level::new(LevelId(1), "Basement", -250.0, 250.0, 12.0));
//! home.rooms.push(
//!     Room::new(vec![[0.0, 0.0], [400.0, 0.0], [400.0, 300.0], [0.0, 300.0]])
//!         .with_level(LevelId(1)),
//! );
//! assert!(home.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the model types

pub mod environment;
pub mod error;
pub mod home;
pub mod items;
pub mod level;
pub mod model_bounds;

pub use environment::{GroundBounds, GroundEnvironment, GroundTexture, DEFAULT_GROUND_COLOR};
pub use error::{Error, Result};
pub use home::{HomeModel, ModelChange};
pub use items::{PieceOfFurniture, Room, Wall};
pub use level::{Level, LevelId, LevelKey};
pub use model_bounds::{footprint_bounds, Bounds2D};

/// A point on the horizontal plane, `[x, y]`
pub type Point = [f64; 2];
