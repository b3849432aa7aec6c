// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tunables of the ground generator

use crate::error::{Error, Result};

/// Buffer kept around removed areas in the detailed ground rectangle
pub const DEFAULT_DETAIL_MARGIN: f64 = 5000.0;

/// Tile size used for textures that report no physical size
pub const DEFAULT_TEXTURE_SIZE: f64 = 100.0;

/// Settings of one generation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSettings {
    /// Distance added around the bounds of the area removed from the ground
    /// to build the detailed ground rectangle
    pub detail_margin: f64,
    /// Physical texture width and height used when a texture size is not positive
    pub default_texture_size: f64,
    /// Wait for the ground texture before publishing geometry
    pub wait_for_texture: bool,
}

impl Default for GroundSettings {
    fn default() -> Self {
        Self {
            detail_margin: DEFAULT_DETAIL_MARGIN,
            default_texture_size: DEFAULT_TEXTURE_SIZE,
            wait_for_texture: false,
        }
    }
}

impl GroundSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.detail_margin.is_finite() || self.detail_margin < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "detail margin must be a non-negative length, got {}",
                self.detail_margin
            )));
        }
        if !self.default_texture_size.is_finite() || self.default_texture_size <= 0.0 {
            return Err(Error::InvalidSettings(format!(
                "default texture size must be positive, got {}",
                self.default_texture_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = GroundSettings::default();
        assert_eq!(settings.detail_margin, 5000.0);
        assert_eq!(settings.default_texture_size, 100.0);
        assert!(!settings.wait_for_texture);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let settings = GroundSettings {
            detail_margin: -1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = GroundSettings {
            default_texture_size: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = GroundSettings {
            detail_margin: f64::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
