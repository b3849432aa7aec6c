// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground3D Geometry
//!
//! Synthesis of the ground surface around a multi-level building: polygon-set
//! algebra backed by i_overlay, excavation areas per underground level, flat
//! faces and vertical skirts, triangulated with earcutr.

pub mod area;
pub mod bool2d;
pub mod error;
pub mod footprint;
pub mod generator;
pub mod ground_mesh;
pub mod mesh;
pub mod profile;
pub mod settings;
pub mod skirt;
pub mod texture;
pub mod triangulation;
pub mod underground;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use area::{Area, Ring};
pub use error::{Error, Result};
pub use footprint::{FootprintCollector, Footprints};
pub use generator::{ElevationSummary, GroundGenerator, GroundGeometry};
pub use ground_mesh::{GroundFace, GroundMeshBuilder, GroundSplit};
pub use mesh::Mesh;
pub use profile::{Profile2D, Triangulation};
pub use settings::GroundSettings;
pub use skirt::{SkirtMeshBuilder, SkirtQuad};
pub use texture::TextureProjection;
pub use triangulation::triangulate_polygon;
pub use underground::{UndergroundAreaBuilder, UndergroundAreas, UndergroundLevel};
