// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint collection
//!
//! Gathers the 2D polygons of rooms, walls and furniture that dig into the
//! ground. Underground areas are grouped by level elevation, so levels
//! sharing an elevation accumulate into a single area.

use crate::area::Area;
use ground3d_core::{HomeModel, Level, LevelId, LevelKey};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Footprints extracted from the building model
#[derive(Debug, Clone, Default)]
pub struct Footprints {
    /// Floors of rooms at or above the ground plane, removed from the
    /// ground at elevation 0
    pub removed_from_ground: Area,
    /// Union of the items digging each underground elevation
    pub underground: BTreeMap<LevelKey, Area>,
    /// Visible room floors of each underground elevation, drawn by the rooms
    /// themselves
    pub room_floors: BTreeMap<LevelKey, Area>,
}

impl Footprints {
    #[inline]
    pub fn has_underground(&self) -> bool {
        !self.underground.is_empty()
    }
}

/// Collects footprints of one [`HomeModel`]
pub struct FootprintCollector<'a> {
    home: &'a HomeModel,
    levels: FxHashMap<LevelId, &'a Level>,
}

/// Where an item lives once its level reference is resolved
enum Placement<'a> {
    /// No level: single-level home
    Ground,
    Level(&'a Level),
    /// Unknown level or a level that can't be displayed
    Skipped,
}

impl<'a> FootprintCollector<'a> {
    pub fn new(home: &'a HomeModel) -> Self {
        Self {
            home,
            levels: home.level_index(),
        }
    }

    fn placement(&self, level: Option<LevelId>) -> Placement<'a> {
        match level {
            None => Placement::Ground,
            Some(id) => match self.levels.get(&id) {
                Some(level) if level.is_viewable() && level.elevation.is_finite() => {
                    Placement::Level(level)
                }
                Some(_) => Placement::Skipped,
                None => {
                    trace!(level = id.0, "Unknown level, item skipped");
                    Placement::Skipped
                }
            },
        }
    }

    /// Collect the footprints of every room, wall and piece of furniture
    pub fn collect(&self) -> Footprints {
        let mut removed_from_ground: Vec<Area> = Vec::new();
        let mut underground: BTreeMap<LevelKey, Vec<Area>> = BTreeMap::new();
        let mut room_floors: BTreeMap<LevelKey, Vec<Area>> = BTreeMap::new();

        for (index, room) in self.home.rooms.iter().enumerate() {
            if !room.has_floor_polygon() {
                trace!(room = index, "Room with less than 3 points skipped");
                continue;
            }
            let level = match self.placement(room.level) {
                Placement::Ground => None,
                Placement::Level(level) => Some(level),
                Placement::Skipped => continue,
            };
            let area = Area::from_points(&room.points);
            if area.is_empty() {
                trace!(room = index, "Degenerate room skipped");
                continue;
            }

            let on_ground = level.map_or(true, |level| {
                level.elevation <= 0.0 && level.is_viewable_and_visible()
            });
            if room.floor_visible && on_ground {
                removed_from_ground.push(area.clone());
                if let Some(level) = level.filter(|level| level.is_underground()) {
                    room_floors.entry(level.key()).or_default().push(area.clone());
                }
            }
            if let Some(level) = level.filter(|level| level.is_underground()) {
                underground.entry(level.key()).or_default().push(area);
            }
        }

        for (index, piece) in self.home.furniture.iter().enumerate() {
            if !piece.is_below_ground() {
                continue;
            }
            let level = match self.placement(piece.level) {
                Placement::Level(level) if level.is_underground() => level,
                _ => continue,
            };
            let area = Area::from_points(piece.ground_footprint());
            if area.is_empty() {
                trace!(piece = index, "Degenerate furniture footprint skipped");
                continue;
            }
            underground.entry(level.key()).or_default().push(area);
        }

        // Walls closing a loop dig the ground enclosed by the loop
        let mut wall_areas: FxHashMap<LevelId, (LevelKey, Vec<Area>)> = FxHashMap::default();
        for (index, wall) in self.home.walls.iter().enumerate() {
            let level = match self.placement(wall.level) {
                Placement::Level(level) if level.is_underground() => level,
                _ => continue,
            };
            let area = Area::from_points(&wall.points);
            if area.is_empty() {
                trace!(wall = index, "Degenerate wall footprint skipped");
                continue;
            }
            wall_areas
                .entry(level.id)
                .or_insert_with(|| (level.key(), Vec::new()))
                .1
                .push(area);
        }
        for (key, walls) in wall_areas.into_values() {
            let walls = Area::union_all(&walls);
            for ring in walls.outer_rings() {
                underground.entry(key).or_default().push(ring.to_area());
            }
        }

        let underground: BTreeMap<LevelKey, Area> = underground
            .into_iter()
            .map(|(key, areas)| (key, Area::union_all(&areas)))
            .filter(|(_, area)| !area.is_empty())
            .collect();
        let room_floors: BTreeMap<LevelKey, Area> = room_floors
            .into_iter()
            .map(|(key, areas)| (key, Area::union_all(&areas)))
            .collect();
        let removed_from_ground = Area::union_all(&removed_from_ground);

        debug!(
            underground_levels = underground.len(),
            removed_from_ground = removed_from_ground.measure(),
            "Footprints collected"
        );

        Footprints {
            removed_from_ground,
            underground,
            room_floors,
        }
    }
}
