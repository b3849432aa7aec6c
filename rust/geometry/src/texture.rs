// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Texture coordinates of ground faces and skirts
//!
//! Flat faces are projected from the ground origin so that faces generated
//! separately tile the texture seamlessly. Skirts use the length run along
//! their ring horizontally and the absolute elevation vertically, so skirts
//! at different depths line up.

use ground3d_core::{GroundBounds, GroundTexture};
use nalgebra::Point2;

/// Linear projection of plan coordinates onto one texture tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureProjection {
    origin_x: f64,
    origin_y: f64,
    width: f64,
    height: f64,
}

impl TextureProjection {
    /// Projection anchored at the ground origin.
    ///
    /// A texture without a positive physical size is stretched over
    /// `default_size` in both directions.
    pub fn new(ground: &GroundBounds, texture: &GroundTexture, default_size: f64) -> Self {
        let (width, height) = texture.physical_size(default_size);
        Self {
            origin_x: ground.origin_x,
            origin_y: ground.origin_y,
            width,
            height,
        }
    }

    /// Tile size (width, height)
    #[inline]
    pub fn tile_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Coordinates of a point of a flat face
    #[inline]
    pub fn flat_uv(&self, point: &Point2<f64>) -> Point2<f64> {
        Point2::new(
            (point.x - self.origin_x) / self.width,
            (self.origin_y - point.y) / self.height,
        )
    }

    /// Coordinates of a skirt vertex, `distance` being the length already
    /// run along the skirt ring
    #[inline]
    pub fn skirt_uv(&self, distance: f64, elevation: f64) -> Point2<f64> {
        Point2::new(distance / self.width, elevation / self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ground() -> GroundBounds {
        GroundBounds::new(-1000.0, -500.0, 2000.0, 1000.0)
    }

    #[test]
    fn test_flat_uv_is_anchored_at_ground_origin() {
        let texture = GroundTexture::new("grass", "grass.png", 200.0, 100.0);
        let projection = TextureProjection::new(&ground(), &texture, 100.0);

        let uv = projection.flat_uv(&Point2::new(-1000.0, -500.0));
        assert_relative_eq!(uv.x, 0.0);
        assert_relative_eq!(uv.y, 0.0);

        let uv = projection.flat_uv(&Point2::new(-600.0, -300.0));
        assert_relative_eq!(uv.x, 2.0);
        assert_relative_eq!(uv.y, -2.0);
    }

    #[test]
    fn test_unknown_size_uses_default() {
        let texture = GroundTexture::new("dirt", "dirt.png", -1.0, -1.0);
        let projection = TextureProjection::new(&ground(), &texture, 50.0);
        assert_eq!(projection.tile_size(), (50.0, 50.0));

        let uv = projection.skirt_uv(125.0, -50.0);
        assert_relative_eq!(uv.x, 2.5);
        assert_relative_eq!(uv.y, -1.0);
    }
}
