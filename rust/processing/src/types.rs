// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serializable views of generated ground geometry.

use crate::error::Result;
use crate::scene::GroundSnapshot;
use crate::texture::GroundAppearance;
use ground3d_geometry::{GroundFace, GroundGeometry, Mesh, Point2, SkirtQuad};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// A flat ground face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceData {
    pub elevation: f64,
    /// Outer ring, counter-clockwise.
    pub outer: Vec<[f64; 2]>,
    /// Holes, clockwise.
    pub holes: Vec<Vec<[f64; 2]>>,
    /// Texture coordinates of the outer ring then the holes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uvs: Vec<[f64; 2]>,
    pub area: f64,
}

impl From<&GroundFace> for FaceData {
    fn from(face: &GroundFace) -> Self {
        Self {
            elevation: face.elevation,
            outer: points(&face.profile.outer),
            holes: face.profile.holes.iter().map(|hole| points(hole)).collect(),
            uvs: points(&face.uvs),
            area: face.measure(),
        }
    }
}

/// A vertical skirt quad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkirtData {
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub base: f64,
    pub top: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uvs: Vec<[f64; 2]>,
}

impl From<&SkirtQuad> for SkirtData {
    fn from(quad: &SkirtQuad) -> Self {
        Self {
            start: [quad.start.x, quad.start.y],
            end: [quad.end.x, quad.end.y],
            base: quad.base,
            top: quad.top,
            uvs: points(&quad.uvs),
        }
    }
}

/// Triangle mesh of the whole ground.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshData {
    /// Vertex positions (x, y, z triplets).
    pub positions: Vec<f32>,
    /// Vertex normals (x, y, z triplets).
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v pairs).
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
    /// RGBA color [r, g, b, a] in 0-1 range.
    pub color: [f32; 4],
}

impl MeshData {
    pub fn new(mesh: Mesh, color: u32) -> Self {
        Self {
            positions: mesh.positions,
            normals: mesh.normals,
            uvs: mesh.uvs,
            indices: mesh.indices,
            color: rgba(color),
        }
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Faces and surface at one elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationData {
    pub elevation: f64,
    pub faces: usize,
    pub area: f64,
}

/// Everything a renderer needs to draw the ground.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundExport {
    pub generation: u64,
    pub appearance: GroundAppearance,
    /// Highest elevation first.
    pub elevations: Vec<ElevationData>,
    pub faces: Vec<FaceData>,
    pub skirts: Vec<SkirtData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshData>,
}

impl GroundExport {
    pub fn new(generation: u64, geometry: &GroundGeometry, appearance: GroundAppearance, with_mesh: bool) -> Self {
        let mesh = with_mesh.then(|| MeshData::new(geometry.to_mesh(), appearance.color));
        Self {
            generation,
            elevations: geometry
                .summary()
                .into_iter()
                .map(|s| ElevationData {
                    elevation: s.elevation,
                    faces: s.faces,
                    area: s.area,
                })
                .collect(),
            faces: geometry.faces.iter().map(FaceData::from).collect(),
            skirts: geometry.skirts.iter().map(SkirtData::from).collect(),
            appearance,
            mesh,
        }
    }

    pub fn from_snapshot(snapshot: &GroundSnapshot, with_mesh: bool) -> Self {
        Self::new(
            snapshot.batch.generation,
            &snapshot.batch.geometry,
            snapshot.appearance.clone(),
            with_mesh,
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

fn points(points: &[Point2<f64>]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

fn rgba(color: u32) -> [f32; 4] {
    let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}
