// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building levels

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a level inside a [`crate::HomeModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelId(pub u32);

/// A horizontal story of the building
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    /// Elevation of the level floor, negative below ground
    pub elevation: f64,
    pub height: f64,
    pub floor_thickness: f64,
    /// Whether the level can be displayed at all
    pub viewable: bool,
    /// Whether the user currently shows the level
    pub visible: bool,
}

impl Level {
    /// Create a viewable and visible level
    pub fn new(id: LevelId, name: impl Into<String>, elevation: f64, height: f64, floor_thickness: f64) -> Self {
        Self {
            id,
            name: name.into(),
            elevation,
            height,
            floor_thickness,
            viewable: true,
            visible: true,
        }
    }

    #[inline]
    pub fn is_viewable(&self) -> bool {
        self.viewable
    }

    #[inline]
    pub fn is_viewable_and_visible(&self) -> bool {
        self.viewable && self.visible
    }

    /// Whether this level lies below the ground plane
    #[inline]
    pub fn is_underground(&self) -> bool {
        self.elevation < 0.0
    }

    /// Map key grouping this level with every level at the same elevation
    #[inline]
    pub fn key(&self) -> LevelKey {
        LevelKey::new(self.elevation)
    }
}

/// Elevation used as an ordered map key.
///
/// Levels at the same elevation share one key, so their footprints
/// accumulate into a single area. Keys sort by ascending elevation; iterate
/// in reverse for shallowest-first processing.
#[derive(Debug, Clone, Copy)]
pub struct LevelKey(f64);

impl LevelKey {
    /// Ground plane key
    pub const GROUND: LevelKey = LevelKey(0.0);

    pub fn new(elevation: f64) -> Self {
        // -0.0 and 0.0 must hash and compare equal
        if elevation == 0.0 {
            Self(0.0)
        } else {
            Self(elevation)
        }
    }

    #[inline]
    pub fn elevation(self) -> f64 {
        self.0
    }
}

impl PartialEq for LevelKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for LevelKey {}

impl PartialOrd for LevelKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LevelKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for LevelKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_level_flags() {
        let mut level = Level::new(LevelId(1), "Basement", -250.0, 250.0, 12.0);
        assert!(level.is_underground());
        assert!(level.is_viewable_and_visible());

        level.visible = false;
        assert!(level.is_viewable());
        assert!(!level.is_viewable_and_visible());
    }

    #[test]
    fn test_levels_at_same_elevation_share_key() {
        let a = Level::new(LevelId(1), "A", -100.0, 250.0, 12.0);
        let b = Level::new(LevelId(2), "B", -100.0, 300.0, 12.0);
        assert_eq!(a.key(), b.key());
        assert_eq!(LevelKey::new(-0.0), LevelKey::GROUND);
    }

    #[test]
    fn test_keys_sort_by_elevation() {
        let mut map = BTreeMap::new();
        map.insert(LevelKey::new(-30.0), "shallow");
        map.insert(LevelKey::new(-60.0), "deep");
        map.insert(LevelKey::GROUND, "ground");

        let shallowest_first: Vec<_> = map.values().rev().copied().collect();
        assert_eq!(shallowest_first, vec!["ground", "shallow", "deep"]);
    }
}
