// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground generation pass
//!
//! Runs footprint collection, underground area building, ground splitting
//! and face/skirt building into one immutable [`GroundGeometry`].

use crate::area::Area;
use crate::error::Result;
use crate::footprint::FootprintCollector;
use crate::ground_mesh::{GroundFace, GroundMeshBuilder};
use crate::mesh::Mesh;
use crate::settings::GroundSettings;
use crate::skirt::{SkirtMeshBuilder, SkirtQuad};
use crate::texture::TextureProjection;
use crate::underground::UndergroundAreaBuilder;
use ground3d_core::{HomeModel, LevelKey};
use nalgebra::{Point2, Point3, Vector3};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Geometry of the whole ground for one model state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundGeometry {
    /// Flat faces: the ground at elevation 0, then each underground level
    /// shallowest first followed by the ceilings it needs
    pub faces: Vec<GroundFace>,
    /// Vertical quads between consecutive elevations
    pub skirts: Vec<SkirtQuad>,
}

/// Faces found at one elevation
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationSummary {
    pub elevation: f64,
    pub faces: usize,
    pub area: f64,
}

impl GroundGeometry {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.skirts.is_empty()
    }

    /// Faces at `elevation`
    pub fn faces_at(&self, elevation: f64) -> impl Iterator<Item = &GroundFace> {
        let key = LevelKey::new(elevation);
        self.faces
            .iter()
            .filter(move |face| LevelKey::new(face.elevation) == key)
    }

    /// Region covered by the faces at `elevation`
    pub fn area_at(&self, elevation: f64) -> Area {
        let areas: Vec<Area> = self
            .faces_at(elevation)
            .map(|face| Area::from_profile(&face.profile))
            .collect();
        Area::union_all(&areas)
    }

    /// Face count and covered surface per elevation, highest first
    pub fn summary(&self) -> Vec<ElevationSummary> {
        let mut by_elevation: BTreeMap<LevelKey, (usize, f64)> = BTreeMap::new();
        for face in &self.faces {
            let entry = by_elevation.entry(LevelKey::new(face.elevation)).or_default();
            entry.0 += 1;
            entry.1 += face.measure();
        }
        by_elevation
            .into_iter()
            .rev()
            .map(|(key, (faces, area))| ElevationSummary {
                elevation: key.elevation(),
                faces,
                area,
            })
            .collect()
    }

    /// Triangulate faces and skirts into a single mesh.
    ///
    /// Faces are triangulated in parallel and merged in order. A face that
    /// fails to triangulate is skipped.
    pub fn to_mesh(&self) -> Mesh {
        let face_meshes: Vec<Option<Mesh>> = self
            .faces
            .par_iter()
            .map(|face| match face_mesh(face) {
                Ok(mesh) => Some(mesh),
                Err(e) => {
                    warn!(elevation = face.elevation, error = %e, "Ground face skipped");
                    None
                }
            })
            .collect();

        let mut mesh = Mesh::with_capacity(
            self.faces.iter().map(|f| f.profile.vertex_count()).sum::<usize>() + self.skirts.len() * 4,
            self.skirts.len() * 6,
        );
        for face_mesh in face_meshes.iter().flatten() {
            mesh.merge(face_mesh);
        }
        for quad in &self.skirts {
            mesh.merge(&skirt_mesh(quad));
        }
        mesh
    }
}

fn face_mesh(face: &GroundFace) -> Result<Mesh> {
    let triangulation = face.profile.triangulate()?;
    let mut mesh = Mesh::with_capacity(triangulation.points.len(), triangulation.indices.len());

    let normal = Vector3::z();
    for (i, point) in triangulation.points.iter().enumerate() {
        let uv = face.uvs.get(i).copied().unwrap_or_else(Point2::origin);
        mesh.add_vertex(Point3::new(point.x, point.y, face.elevation), normal, uv);
    }

    for triangle in triangulation.indices.chunks_exact(3) {
        let (a, b, c) = (triangle[0], triangle[1], triangle[2]);
        let (pa, pb, pc) = (
            triangulation.points[a],
            triangulation.points[b],
            triangulation.points[c],
        );
        // Keep triangles counter-clockwise seen from above
        let cross = (pb - pa).perp(&(pc - pa));
        if cross >= 0.0 {
            mesh.add_triangle(a as u32, b as u32, c as u32);
        } else {
            mesh.add_triangle(a as u32, c as u32, b as u32);
        }
    }
    Ok(mesh)
}

fn skirt_mesh(quad: &SkirtQuad) -> Mesh {
    let mut mesh = Mesh::with_capacity(4, 6);
    let normal = quad.normal();
    for (i, corner) in quad.corners().iter().enumerate() {
        let uv = quad.uvs.get(i).copied().unwrap_or_else(Point2::origin);
        mesh.add_vertex(*corner, normal, uv);
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    mesh
}

/// Generates [`GroundGeometry`] from a [`HomeModel`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundGenerator {
    settings: GroundSettings,
}

impl GroundGenerator {
    pub fn new(settings: GroundSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    #[inline]
    pub fn settings(&self) -> &GroundSettings {
        &self.settings
    }

    /// Compute the ground geometry of `home`.
    ///
    /// Items with degenerate footprints or unknown levels are skipped; only
    /// invalid ground bounds make the pass fail.
    pub fn generate(&self, home: &HomeModel) -> Result<GroundGeometry> {
        home.ground.validate()?;

        let projection = home.environment.texture.as_ref().map(|texture| {
            TextureProjection::new(&home.ground, texture, self.settings.default_texture_size)
        });
        let ground_builder = GroundMeshBuilder::new(projection, self.settings.detail_margin);
        let skirt_builder = SkirtMeshBuilder::new(projection);

        let footprints = FootprintCollector::new(home).collect();
        let underground = UndergroundAreaBuilder::new().build(footprints);

        let mut geometry = GroundGeometry::default();
        let split = ground_builder.split_ground(&home.ground, &underground.removed_from_ground);
        geometry.faces.extend(ground_builder.faces(&split.outside, 0.0));
        geometry.faces.extend(ground_builder.faces(&split.detail, 0.0));

        let mut previous_elevation = 0.0;
        for (key, level) in underground.shallowest_first() {
            let elevation = key.elevation();
            geometry.faces.extend(ground_builder.faces(&level.area, elevation));
            if previous_elevation - elevation > 0.0 {
                geometry
                    .skirts
                    .extend(skirt_builder.skirts(&level.side_area, elevation, previous_elevation));
                geometry
                    .faces
                    .extend(ground_builder.faces(&level.upper_level_area, previous_elevation));
            }
            previous_elevation = elevation;
        }

        debug!(
            faces = geometry.faces.len(),
            skirts = geometry.skirts.len(),
            levels = underground.levels.len(),
            textured = projection.is_some(),
            "Ground generated"
        );
        Ok(geometry)
    }
}
