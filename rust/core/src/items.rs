// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint source entities: rooms, walls and furniture

use crate::{LevelId, Point};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A room and its floor polygon
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Room {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    pub points: Vec<Point>,
    /// Level of the room, `None` for single-level homes
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: Option<LevelId>,
    pub floor_visible: bool,
}

impl Room {
    /// Create a room with a visible floor and no level
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            name: None,
            points,
            level: None,
            floor_visible: true,
        }
    }

    pub fn with_level(mut self, level: LevelId) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_floor_visible(mut self, floor_visible: bool) -> Self {
        self.floor_visible = floor_visible;
        self
    }

    /// Rooms need at least three points to enclose a floor
    #[inline]
    pub fn has_floor_polygon(&self) -> bool {
        self.points.len() > 2
    }
}

/// A wall, described by the footprint polygon computed by the model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wall {
    pub points: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: Option<LevelId>,
}

impl Wall {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points, level: None }
    }

    pub fn with_level(mut self, level: LevelId) -> Self {
        self.level = Some(level);
        self
    }

    /// Axis-aligned straight wall between two points with the given thickness
    pub fn straight(start: Point, end: Point, thickness: f64) -> Self {
        let dx = end[0] - start[0];
        let dy = end[1] - start[1];
        let length = (dx * dx + dy * dy).sqrt();
        let (nx, ny) = if length > 0.0 {
            (-dy / length * thickness / 2.0, dx / length * thickness / 2.0)
        } else {
            (0.0, 0.0)
        };
        Self::new(vec![
            [start[0] + nx, start[1] + ny],
            [end[0] + nx, end[1] + ny],
            [end[0] - nx, end[1] - ny],
            [start[0] - nx, start[1] - ny],
        ])
    }
}

/// A piece of furniture that may dig into the ground
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceOfFurniture {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Footprint of the piece bounding box
    pub points: Vec<Point>,
    /// Cut-out shape of a staircase, used instead of `points` when present
    #[cfg_attr(feature = "serde", serde(default))]
    pub staircase_cutout: Option<Vec<Point>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: Option<LevelId>,
    /// Absolute elevation of the piece bottom, negative below ground
    pub ground_elevation: f64,
}

impl PieceOfFurniture {
    pub fn new(points: Vec<Point>, ground_elevation: f64) -> Self {
        Self {
            name: None,
            points,
            staircase_cutout: None,
            level: None,
            ground_elevation,
        }
    }

    pub fn with_level(mut self, level: LevelId) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_staircase_cutout(mut self, cutout: Vec<Point>) -> Self {
        self.staircase_cutout = Some(cutout);
        self
    }

    /// Polygon digging the ground: the staircase cut-out if any, else the footprint
    #[inline]
    pub fn ground_footprint(&self) -> &[Point] {
        self.staircase_cutout.as_deref().unwrap_or(&self.points)
    }

    #[inline]
    pub fn is_below_ground(&self) -> bool {
        self.ground_elevation < 0.0
    }
}
