// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertical skirts joining two elevations along the rings of an area

use crate::area::Area;
use crate::texture::TextureProjection;
use crate::triangulation::calculate_polygon_normal;
use nalgebra::{Point2, Point3, Vector3};
use smallvec::SmallVec;

/// Vertices of a skirt quad
pub type QuadCorners = [Point3<f64>; 4];

/// A vertical quad built on one ring edge
#[derive(Debug, Clone, PartialEq)]
pub struct SkirtQuad {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub base: f64,
    pub top: f64,
    /// Texture coordinates of [`SkirtQuad::corners`], empty when untextured
    pub uvs: SmallVec<[Point2<f64>; 4]>,
    /// The quad carries UVs; see [`crate::GroundFace::textured`]
    pub textured: bool,
}

impl SkirtQuad {
    /// Start bottom, start top, end top, end bottom
    pub fn corners(&self) -> QuadCorners {
        [
            Point3::new(self.start.x, self.start.y, self.base),
            Point3::new(self.start.x, self.start.y, self.top),
            Point3::new(self.end.x, self.end.y, self.top),
            Point3::new(self.end.x, self.end.y, self.base),
        ]
    }

    /// Horizontal normal on the left of the edge.
    ///
    /// Rings keep their area on the left, so a skirt faces the excavated
    /// area whether its ring bounds the excavation or an island of ground
    /// left standing inside it.
    pub fn normal(&self) -> Vector3<f64> {
        calculate_polygon_normal(&self.corners())
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.top - self.base
    }

    #[inline]
    pub fn width(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// Builds skirt quads
#[derive(Debug, Clone, Copy, Default)]
pub struct SkirtMeshBuilder {
    projection: Option<TextureProjection>,
}

impl SkirtMeshBuilder {
    pub fn new(projection: Option<TextureProjection>) -> Self {
        Self { projection }
    }

    /// Quads along every ring of `area`, outer and hole rings alike,
    /// from `base` up to `top`. Nothing is built unless `top > base`.
    pub fn skirts(&self, area: &Area, base: f64, top: f64) -> Vec<SkirtQuad> {
        if !(top > base) {
            return Vec::new();
        }
        let mut quads = Vec::new();
        for ring in area.decompose() {
            self.ring_skirts(&ring.points, base, top, &mut quads);
        }
        quads
    }

    fn ring_skirts(&self, ring: &[Point2<f64>], base: f64, top: f64, quads: &mut Vec<SkirtQuad>) {
        let n = ring.len();
        let mut distance = 0.0;
        for i in 0..n {
            let start = ring[i];
            let end = ring[(i + 1) % n];
            let next_distance = distance + (end - start).norm();
            let uvs = match &self.projection {
                Some(projection) => SmallVec::from_buf([
                    projection.skirt_uv(distance, base),
                    projection.skirt_uv(distance, top),
                    projection.skirt_uv(next_distance, top),
                    projection.skirt_uv(next_distance, base),
                ]),
                None => SmallVec::new(),
            };
            quads.push(SkirtQuad {
                start,
                end,
                base,
                top,
                uvs,
                textured: self.projection.is_some(),
            });
            distance = next_distance;
        }
    }
}
