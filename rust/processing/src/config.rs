// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration loaded from environment variables.

use crate::error::{Error, Result};
use ground3d_geometry::settings::{DEFAULT_DETAIL_MARGIN, DEFAULT_TEXTURE_SIZE};
use ground3d_geometry::GroundSettings;
use std::str::FromStr;
use std::time::Duration;

/// Detail margin around removed areas
pub const ENV_DETAIL_MARGIN: &str = "GROUND_DETAIL_MARGIN";
/// Tile size of textures without physical size
pub const ENV_DEFAULT_TEXTURE_SIZE: &str = "GROUND_DEFAULT_TEXTURE_SIZE";
/// `true` to wait for textures before publishing geometry
pub const ENV_WAIT_FOR_TEXTURE: &str = "GROUND_WAIT_FOR_TEXTURE";
/// Longest wait for a texture in blocking mode, in milliseconds
pub const ENV_TEXTURE_TIMEOUT_MS: &str = "GROUND_TEXTURE_TIMEOUT_MS";

const DEFAULT_TEXTURE_TIMEOUT_MS: u64 = 10_000;

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingConfig {
    /// Buffer kept around the area removed from the ground.
    pub detail_margin: f64,
    /// Texture tile size used when a texture reports none.
    pub default_texture_size: f64,
    /// Block rebuilds until the ground texture is loaded.
    pub wait_for_texture: bool,
    /// Longest wait for a texture in blocking mode.
    pub texture_timeout: Duration,
}

impl ProcessingConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from environment variables, reporting values
    /// that can't be parsed.
    pub fn try_from_env() -> Result<Self> {
        Self::try_from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ProcessingConfig::from_env`] with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::defaults();
        Self {
            detail_margin: lookup(ENV_DETAIL_MARGIN)
                .and_then(|v| v.trim().parse().ok())
                .filter(|v: &f64| v.is_finite() && *v >= 0.0)
                .unwrap_or(defaults.detail_margin),
            default_texture_size: lookup(ENV_DEFAULT_TEXTURE_SIZE)
                .and_then(|v| v.trim().parse().ok())
                .filter(|v: &f64| v.is_finite() && *v > 0.0)
                .unwrap_or(defaults.default_texture_size),
            wait_for_texture: lookup(ENV_WAIT_FOR_TEXTURE)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.wait_for_texture),
            texture_timeout: lookup(ENV_TEXTURE_TIMEOUT_MS)
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.texture_timeout),
        }
    }

    /// Same as [`ProcessingConfig::try_from_env`] with a custom variable source
    pub fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::defaults();
        let config = Self {
            detail_margin: parse_var(&lookup, ENV_DETAIL_MARGIN)?.unwrap_or(defaults.detail_margin),
            default_texture_size: parse_var(&lookup, ENV_DEFAULT_TEXTURE_SIZE)?
                .unwrap_or(defaults.default_texture_size),
            wait_for_texture: match lookup(ENV_WAIT_FOR_TEXTURE) {
                Some(value) => parse_flag(&value).ok_or_else(|| Error::Config {
                    key: ENV_WAIT_FOR_TEXTURE.to_string(),
                    value,
                })?,
                None => defaults.wait_for_texture,
            },
            texture_timeout: parse_var(&lookup, ENV_TEXTURE_TIMEOUT_MS)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.texture_timeout),
        };
        config.settings().validate()?;
        Ok(config)
    }

    /// Built-in defaults, ignoring the environment.
    pub fn defaults() -> Self {
        Self {
            detail_margin: DEFAULT_DETAIL_MARGIN,
            default_texture_size: DEFAULT_TEXTURE_SIZE,
            wait_for_texture: false,
            texture_timeout: Duration::from_millis(DEFAULT_TEXTURE_TIMEOUT_MS),
        }
    }

    /// Generator settings carried by this configuration
    pub fn settings(&self) -> GroundSettings {
        GroundSettings {
            detail_margin: self.detail_margin,
            default_texture_size: self.default_texture_size,
            wait_for_texture: self.wait_for_texture,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        Some(value) => value.trim().parse().map(Some).map_err(|_| Error::Config {
            key: key.to_string(),
            value,
        }),
        None => Ok(None),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: FxHashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = ProcessingConfig::from_lookup(vars(&[]));
        assert_eq!(config, ProcessingConfig::defaults());
        assert_eq!(config.settings(), GroundSettings::default());
    }

    #[test]
    fn test_reads_variables() {
        let config = ProcessingConfig::from_lookup(vars(&[
            (ENV_DETAIL_MARGIN, "2500"),
            (ENV_DEFAULT_TEXTURE_SIZE, " 80.5 "),
            (ENV_WAIT_FOR_TEXTURE, "yes"),
            (ENV_TEXTURE_TIMEOUT_MS, "250"),
        ]));
        assert_eq!(config.detail_margin, 2500.0);
        assert_eq!(config.default_texture_size, 80.5);
        assert!(config.wait_for_texture);
        assert_eq!(config.texture_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_lenient_parsing_falls_back() {
        let config = ProcessingConfig::from_lookup(vars(&[
            (ENV_DETAIL_MARGIN, "wide"),
            (ENV_DEFAULT_TEXTURE_SIZE, "-3"),
            (ENV_WAIT_FOR_TEXTURE, "maybe"),
        ]));
        assert_eq!(config, ProcessingConfig::defaults());
    }

    #[test]
    fn test_strict_parsing_reports_errors() {
        let err = ProcessingConfig::try_from_lookup(vars(&[(ENV_DETAIL_MARGIN, "wide")])).unwrap_err();
        assert!(matches!(err, Error::Config { ref key, .. } if key == ENV_DETAIL_MARGIN));

        let err = ProcessingConfig::try_from_lookup(vars(&[(ENV_WAIT_FOR_TEXTURE, "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        // Parses, but isn't a usable size
        let err = ProcessingConfig::try_from_lookup(vars(&[(ENV_DEFAULT_TEXTURE_SIZE, "0")])).unwrap_err();
        assert!(matches!(err, Error::Geometry(_)));

        assert!(ProcessingConfig::try_from_lookup(vars(&[(ENV_WAIT_FOR_TEXTURE, "off")])).is_ok());
    }
}
