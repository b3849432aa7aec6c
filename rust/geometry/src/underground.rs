// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Underground areas
//!
//! Combines the footprints of every underground elevation, shallowest first:
//!
//! 1. the solid rings of every deeper elevation are cut out of the level
//!    area and added to its side area, whose rings are skirted up to the
//!    next shallower elevation;
//! 2. hole rings left in the level area are enclosed voids and get a
//!    ceiling patch at the next shallower elevation, limited to the part of
//!    the hole the level's own footprint did not cover;
//! 3. solid rings are open pits and are removed from the ground;
//! 4. room floors drawn by the rooms themselves are finally cut out.

use crate::area::Area;
use crate::footprint::Footprints;
use ground3d_core::LevelKey;
use std::collections::BTreeMap;
use tracing::debug;

/// Areas computed for one underground elevation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndergroundLevel {
    /// Flat surface drawn at the level elevation
    pub area: Area,
    /// Rings skirted from the level elevation up to the next shallower one
    pub side_area: Area,
    /// Ceilings drawn at the next shallower elevation over enclosed voids
    pub upper_level_area: Area,
}

/// Result of [`UndergroundAreaBuilder::build`]
#[derive(Debug, Clone, Default)]
pub struct UndergroundAreas {
    /// Underground levels by elevation
    pub levels: BTreeMap<LevelKey, UndergroundLevel>,
    /// Everything missing from the ground at elevation 0
    pub removed_from_ground: Area,
}

impl UndergroundAreas {
    /// Levels from the shallowest to the deepest
    pub fn shallowest_first(&self) -> impl Iterator<Item = (&LevelKey, &UndergroundLevel)> {
        self.levels.iter().rev()
    }
}

/// Builds [`UndergroundAreas`] from collected footprints
#[derive(Debug, Default)]
pub struct UndergroundAreaBuilder;

impl UndergroundAreaBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, footprints: Footprints) -> UndergroundAreas {
        let Footprints {
            mut removed_from_ground,
            underground,
            room_floors,
        } = footprints;

        let mut levels = BTreeMap::new();
        if underground.is_empty() {
            return UndergroundAreas {
                levels,
                removed_from_ground,
            };
        }

        // Keys ascend with elevation: the levels deeper than one are the
        // ones before it
        let keys: Vec<LevelKey> = underground.keys().copied().collect();
        for (index, key) in keys.iter().enumerate().rev() {
            let area_at_start = &underground[key];

            let deeper_rings: Vec<Area> = keys[..index]
                .iter()
                .flat_map(|deeper| underground[deeper].outer_rings())
                .map(|ring| ring.to_area())
                .collect();
            let deeper = Area::union_all(&deeper_rings);

            let mut area = area_at_start.subtract(&deeper);
            let side_area = area_at_start.union(&deeper);

            let mut upper_level_area = Area::new();
            let mut pits = Vec::new();
            for ring in area.decompose() {
                if ring.is_hole() {
                    // Part of the enclosed void the level footprint didn't cover
                    let covered_hole = ring.to_area().xor(area_at_start).subtract(area_at_start);
                    upper_level_area.add(&covered_hole);
                } else {
                    pits.push(ring.to_area());
                }
            }
            removed_from_ground = Area::union_all(pits.iter().chain(Some(&removed_from_ground)));

            if let Some(floors) = room_floors.get(key) {
                area.remove(floors);
            }

            debug!(
                elevation = key.elevation(),
                area = area.measure(),
                side_rings = side_area.decompose().len(),
                ceiling = upper_level_area.measure(),
                "Underground level built"
            );

            levels.insert(
                *key,
                UndergroundLevel {
                    area,
                    side_area,
                    upper_level_area,
                },
            );
        }

        UndergroundAreas {
            levels,
            removed_from_ground,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x: f64, y: f64, size: f64) -> Area {
        Area::from_rect(x, y, x + size, y + size)
    }

    fn footprints(levels: &[(f64, Area)]) -> Footprints {
        Footprints {
            underground: levels
                .iter()
                .map(|(elevation, area)| (LevelKey::new(*elevation), area.clone()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_underground_keeps_removed_area() {
        let mut input = Footprints::default();
        input.removed_from_ground = square(0.0, 0.0, 10.0);
        let result = UndergroundAreaBuilder::new().build(input);
        assert!(result.levels.is_empty());
        assert_relative_eq!(result.removed_from_ground.measure(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_open_pit_is_removed_from_ground() {
        let pit = square(0.0, 0.0, 100.0);
        let result = UndergroundAreaBuilder::new().build(footprints(&[(-50.0, pit.clone())]));

        let level = &result.levels[&LevelKey::new(-50.0)];
        assert!(level.area.same_region(&pit, 1e-6));
        assert!(level.side_area.same_region(&pit, 1e-6));
        assert!(level.upper_level_area.is_empty());
        assert!(result.removed_from_ground.same_region(&pit, 1e-6));
    }

    #[test]
    fn test_enclosed_courtyard_gets_ceiling() {
        // Ring of underground rooms around a buried courtyard
        let ring = square(0.0, 0.0, 300.0).subtract(&square(100.0, 100.0, 100.0));
        let result = UndergroundAreaBuilder::new().build(footprints(&[(-50.0, ring.clone())]));

        let level = &result.levels[&LevelKey::new(-50.0)];
        assert!(level.upper_level_area.same_region(&square(100.0, 100.0, 100.0), 1e-6));
        // The outer boundary is an open pit, the courtyard stays covered
        assert!(result.removed_from_ground.same_region(&square(0.0, 0.0, 300.0), 1e-6));
    }

    #[test]
    fn test_deeper_level_is_cut_from_shallower() {
        let shallow = square(0.0, 0.0, 100.0);
        let deep = square(40.0, 40.0, 20.0);
        let result = UndergroundAreaBuilder::new()
            .build(footprints(&[(-30.0, shallow.clone()), (-60.0, deep.clone())]));

        let upper = &result.levels[&LevelKey::new(-30.0)];
        assert!(upper.area.same_region(&shallow.subtract(&deep), 1e-6));
        assert!(upper.side_area.same_region(&shallow, 1e-6));
        // The hole opens on the deeper level, no ceiling over it
        assert!(upper.upper_level_area.is_empty());

        let lower = &result.levels[&LevelKey::new(-60.0)];
        assert!(lower.area.same_region(&deep, 1e-6));
        assert!(result.removed_from_ground.same_region(&shallow, 1e-6));
    }

    #[test]
    fn test_room_floors_are_cut_after_classification() {
        let pit = square(0.0, 0.0, 100.0);
        let floor = square(0.0, 0.0, 50.0);
        let mut input = footprints(&[(-50.0, pit.clone())]);
        input.room_floors.insert(LevelKey::new(-50.0), floor.clone());

        let result = UndergroundAreaBuilder::new().build(input);
        let level = &result.levels[&LevelKey::new(-50.0)];
        assert!(level.area.same_region(&pit.subtract(&floor), 1e-6));
        assert!(level.side_area.same_region(&pit, 1e-6));
        assert!(result.removed_from_ground.same_region(&pit, 1e-6));
    }
}
