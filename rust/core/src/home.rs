// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The building model read by the ground generator

use crate::error::{Error, Result};
use crate::{GroundBounds, GroundEnvironment, Level, LevelId, PieceOfFurniture, Point, Room, Wall};
use rustc_hash::{FxHashMap, FxHashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of the building model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomeModel {
    #[cfg_attr(feature = "serde", serde(default))]
    pub levels: Vec<Level>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rooms: Vec<Room>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub walls: Vec<Wall>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub furniture: Vec<PieceOfFurniture>,
    pub ground: GroundBounds,
    #[cfg_attr(feature = "serde", serde(default))]
    pub environment: GroundEnvironment,
}

impl HomeModel {
    /// Create an empty model covering `ground`
    pub fn new(ground: GroundBounds) -> Self {
        Self {
            levels: Vec::new(),
            rooms: Vec::new(),
            walls: Vec::new(),
            furniture: Vec::new(),
            ground,
            environment: GroundEnvironment::default(),
        }
    }

    /// Find a level by id
    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Index levels by id for repeated lookups
    pub fn level_index(&self) -> FxHashMap<LevelId, &Level> {
        self.levels.iter().map(|level| (level.id, level)).collect()
    }

    /// Whether any viewable level lies below the ground plane
    pub fn has_underground_levels(&self) -> bool {
        self.levels.iter().any(|level| level.is_viewable() && level.is_underground())
    }

    /// Check the model for data the ground generator would have to skip.
    ///
    /// Returns the first problem found. The generator ignores offending
    /// entities and levels; only invalid ground bounds stop it.
    pub fn validate(&self) -> Result<()> {
        self.ground.validate()?;

        let mut seen: FxHashSet<LevelId> = FxHashSet::default();
        for level in &self.levels {
            if !seen.insert(level.id) {
                return Err(Error::DuplicateLevel(level.id.0));
            }
            if !level.elevation.is_finite() {
                return Err(Error::InvalidLevel(level.id, "non-finite elevation".to_string()));
            }
        }

        for (i, room) in self.rooms.iter().enumerate() {
            let what = format!("room {}", i);
            check_points(&room.points, &what)?;
            check_level(room.level, &seen, &what)?;
        }
        for (i, wall) in self.walls.iter().enumerate() {
            let what = format!("wall {}", i);
            check_points(&wall.points, &what)?;
            check_level(wall.level, &seen, &what)?;
        }
        for (i, piece) in self.furniture.iter().enumerate() {
            let what = format!("piece {}", i);
            check_points(piece.ground_footprint(), &what)?;
            check_level(piece.level, &seen, &what)?;
        }
        Ok(())
    }
}

fn check_points(points: &[Point], what: &str) -> Result<()> {
    if points.iter().all(|p| p[0].is_finite() && p[1].is_finite()) {
        Ok(())
    } else {
        Err(Error::NonFiniteCoordinate(what.to_string()))
    }
}

fn check_level(level: Option<LevelId>, known: &FxHashSet<LevelId>, what: &str) -> Result<()> {
    match level {
        Some(id) if !known.contains(&id) => Err(Error::UnknownLevel(id.0, what.to_string())),
        _ => Ok(()),
    }
}

/// A change notified by the model to the recomposition trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModelChange {
    /// A room was added, removed, reshaped or had its floor toggled
    Room,
    /// A wall was added, removed or reshaped
    Wall,
    /// A piece of furniture was added, removed, moved or resized
    Furniture,
    /// A level was added, removed, moved or had its visibility toggled
    Level,
    /// The ground bounds changed
    GroundBounds,
    /// The ground colour or texture changed
    GroundAppearance,
}

impl ModelChange {
    /// Whether the change requires regenerating ground geometry.
    ///
    /// Appearance changes only swap the texture or colour.
    #[inline]
    pub fn affects_geometry(self) -> bool {
        !matches!(self, ModelChange::GroundAppearance)
    }
}
