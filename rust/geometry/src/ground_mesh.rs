// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat ground faces
//!
//! The ground at elevation 0 is split in two: a detailed rectangle around
//! the area removed from the ground, carrying the holes, and the plain rest
//! of the ground bounds. Every area is then turned into faces made of one
//! counter-clockwise outer ring and the clockwise rings of its holes.

use crate::area::Area;
use crate::profile::Profile2D;
use crate::texture::TextureProjection;
use ground3d_core::{Bounds2D, GroundBounds};
use nalgebra::Point2;
use tracing::trace;

/// A flat polygon of the ground surface
#[derive(Debug, Clone, PartialEq)]
pub struct GroundFace {
    pub elevation: f64,
    /// Outer ring and holes
    pub profile: Profile2D,
    /// Texture coordinates of `profile.points()`, empty when untextured
    pub uvs: Vec<Point2<f64>>,
    /// The face carries UVs. Whether the texture actually loaded is told by
    /// the published appearance, which falls back to the ground colour.
    pub textured: bool,
}

impl GroundFace {
    /// Surface covered by the face
    pub fn measure(&self) -> f64 {
        Area::from_profile(&self.profile).measure()
    }
}

/// The ground at elevation 0 once split
#[derive(Debug, Clone, Default)]
pub struct GroundSplit {
    /// Ground bounds outside the detailed rectangle, without holes
    pub outside: Area,
    /// Detailed rectangle minus the area removed from the ground
    pub detail: Area,
}

/// Builds flat ground faces
#[derive(Debug, Clone, Copy)]
pub struct GroundMeshBuilder {
    projection: Option<TextureProjection>,
    detail_margin: f64,
}

impl GroundMeshBuilder {
    pub fn new(projection: Option<TextureProjection>, detail_margin: f64) -> Self {
        Self {
            projection,
            detail_margin,
        }
    }

    /// Rectangle of the ground handled with full detail.
    ///
    /// The bounds of `removed` expanded by the detail margin, or a square of
    /// that margin around the origin when nothing is removed, clamped to the
    /// ground bounds. Invalid when it doesn't meet the ground.
    pub fn detail_bounds(&self, ground: &GroundBounds, removed: &Area) -> Bounds2D {
        let margin = self.detail_margin;
        let removed_bounds = removed.bounds();
        let (min_x, min_y, max_x, max_y) = if removed_bounds.is_valid() {
            (
                removed_bounds.min_x - margin,
                removed_bounds.min_y - margin,
                removed_bounds.max_x + margin,
                removed_bounds.max_y + margin,
            )
        } else {
            (-margin, -margin, margin, margin)
        };

        let min_x = min_x.max(ground.origin_x);
        let min_y = min_y.max(ground.origin_y);
        let max_x = max_x.min(ground.max_x());
        let max_y = max_y.min(ground.max_y());
        if min_x < max_x && min_y < max_y {
            Bounds2D::from_corners(min_x, min_y, max_x, max_y)
        } else {
            Bounds2D::new()
        }
    }

    /// Split the ground at elevation 0 and cut `removed` out of it
    pub fn split_ground(&self, ground: &GroundBounds, removed: &Area) -> GroundSplit {
        let ground_bounds = ground.to_bounds();
        let ground_area = Area::from_bounds(&ground_bounds);
        let detail_bounds = self.detail_bounds(ground, removed);

        if !detail_bounds.is_valid() {
            trace!("Removed area outside the ground, no detailed part");
            return GroundSplit {
                outside: ground_area,
                detail: Area::new(),
            };
        }
        if detail_bounds.same_extent(&ground_bounds, 0.0) {
            return GroundSplit {
                outside: Area::new(),
                detail: ground_area.subtract(removed),
            };
        }

        let detail_area = Area::from_bounds(&detail_bounds);
        GroundSplit {
            outside: ground_area.subtract(&detail_area),
            detail: detail_area.subtract(removed),
        }
    }

    /// One face per shape of `area`, at `elevation`
    pub fn faces(&self, area: &Area, elevation: f64) -> Vec<GroundFace> {
        area.shapes()
            .iter()
            .map(|shape| self.face(shape.clone(), elevation))
            .collect()
    }

    fn face(&self, profile: Profile2D, elevation: f64) -> GroundFace {
        let uvs = match &self.projection {
            Some(projection) => profile.points().map(|p| projection.flat_uv(p)).collect(),
            None => Vec::new(),
        };
        GroundFace {
            elevation,
            profile,
            uvs,
            textured: self.projection.is_some(),
        }
    }
}
