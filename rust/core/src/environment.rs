// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground bounds, colour and texture

use crate::error::{Error, Result};
use crate::Bounds2D;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default ground colour (RGB) used when no texture is set
pub const DEFAULT_GROUND_COLOR: u32 = 0xA8_55_3A;

/// Rectangle of the plane covered by the ground
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroundBounds {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub depth: f64,
}

impl GroundBounds {
    pub fn new(origin_x: f64, origin_y: f64, width: f64, depth: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            depth,
        }
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.origin_x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.origin_y + self.depth
    }

    /// Finite origin and positive size
    pub fn validate(&self) -> Result<()> {
        if !(self.origin_x.is_finite()
            && self.origin_y.is_finite()
            && self.width.is_finite()
            && self.depth.is_finite())
        {
            return Err(Error::InvalidGroundBounds("non-finite value".to_string()));
        }
        if self.width <= 0.0 || self.depth <= 0.0 {
            return Err(Error::InvalidGroundBounds(format!(
                "width {} and depth {} must be positive",
                self.width, self.depth
            )));
        }
        Ok(())
    }

    pub fn to_bounds(&self) -> Bounds2D {
        Bounds2D::from_corners(self.origin_x, self.origin_y, self.max_x(), self.max_y())
    }
}

impl Default for GroundBounds {
    /// A 1 km square centred on the origin (lengths in centimetres)
    fn default() -> Self {
        Self::new(-50_000.0, -50_000.0, 100_000.0, 100_000.0)
    }
}

/// Texture applied to the ground
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroundTexture {
    pub name: String,
    /// Key of the image resolved by the texture loader
    pub image: String,
    /// Physical width covered by one image tile, or a non-positive value if unknown
    pub width: f64,
    /// Physical height covered by one image tile, or a non-positive value if unknown
    pub height: f64,
}

impl GroundTexture {
    pub fn new(name: impl Into<String>, image: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            width,
            height,
        }
    }

    /// Physical tile size, replacing unknown dimensions by `default_size`
    pub fn physical_size(&self, default_size: f64) -> (f64, f64) {
        if self.width > 0.0 && self.height > 0.0 {
            (self.width, self.height)
        } else {
            (default_size, default_size)
        }
    }
}

/// Appearance of the ground
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroundEnvironment {
    pub color: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub texture: Option<GroundTexture>,
}

impl Default for GroundEnvironment {
    fn default() -> Self {
        Self {
            color: DEFAULT_GROUND_COLOR,
            texture: None,
        }
    }
}
