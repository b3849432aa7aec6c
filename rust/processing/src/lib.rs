// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Ground3D Processing
//!
//! Keeps the ground geometry of a changing building model up to date.
//!
//! - [`RecomposeTrigger`]: one dirty flag for every footprint-owning change
//! - [`GroundScene`]: serialized, coalesced rebuilds publishing immutable
//!   [`GroundBatch`]es
//! - [`TextureSlot`]: asynchronous ground texture with blocking or
//!   placeholder publication
//! - [`GroundExport`]: JSON view of a published batch
//!
//! ```rust
//! use std::sync::Arc;
//! use ground3d_core::{GroundBounds, HomeModel, ModelChange};
//! use ground3d_processing::{GroundScene, ProcessingConfig, RecomposeTrigger};
//!
//! let scene = GroundScene::new(ProcessingConfig::defaults(), None).unwrap();
//! let trigger = RecomposeTrigger::new();
//! let home = Arc::new(HomeModel::new(GroundBounds::new(0.0, 0.0, 100.0, 100.0)));
//!
//! trigger.notify(ModelChange::Room);
//! scene.sync(&trigger, home).unwrap();
//! assert_eq!(scene.batch().geometry.faces.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod scene;
pub mod texture;
pub mod trigger;
pub mod types;

pub use config::ProcessingConfig;
pub use error::{Error, Result};
pub use scene::{GroundBatch, GroundScene, GroundSnapshot, RebuildFailure, RebuildOutcome};
pub use texture::{GroundAppearance, LoadCallback, LoadedTexture, TextureLoader, TextureSlot, TextureState};
pub use trigger::{RecomposeTrigger, SubscriptionId};
pub use types::{ElevationData, FaceData, GroundExport, MeshData, SkirtData};
