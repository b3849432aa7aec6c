// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned 2D bounds in f64 precision
//!
//! Used to size the detailed part of the ground around removed areas and to
//! summarize model extents.

use crate::{HomeModel, Point};

/// 2D bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    /// Number of points sampled
    pub sample_count: usize,
}

impl Bounds2D {
    /// Create new bounds initialized to invalid state
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            min_y: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
            sample_count: 0,
        }
    }

    /// Bounds spanning two corners, in any order
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let mut bounds = Self::new();
        bounds.expand(x1, y1);
        bounds.expand(x2, y2);
        bounds
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bounds = Self::new();
        for p in points {
            if p[0].is_finite() && p[1].is_finite() {
                bounds.expand(p[0], p[1]);
            }
        }
        bounds
    }

    /// Check if bounds are valid (at least one point added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.sample_count += 1;
    }

    /// Expand bounds to include other bounds
    pub fn union(&mut self, other: &Bounds2D) {
        if other.is_valid() {
            self.expand(other.min_x, other.min_y);
            self.expand(other.max_x, other.max_y);
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        if self.is_valid() {
            self.max_x - self.min_x
        } else {
            0.0
        }
    }

    #[inline]
    pub fn height(&self) -> f64 {
        if self.is_valid() {
            self.max_y - self.min_y
        } else {
            0.0
        }
    }

    /// Get center of the bounding box
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        if !self.is_valid() {
            return (0.0, 0.0);
        }
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Same rectangle, within `epsilon`
    pub fn same_extent(&self, other: &Bounds2D, epsilon: f64) -> bool {
        self.is_valid()
            && other.is_valid()
            && (self.min_x - other.min_x).abs() <= epsilon
            && (self.min_y - other.min_y).abs() <= epsilon
            && (self.max_x - other.max_x).abs() <= epsilon
            && (self.max_y - other.max_y).abs() <= epsilon
    }
}

impl Default for Bounds2D {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds of every footprint of the model, regardless of level
pub fn footprint_bounds(home: &HomeModel) -> Bounds2D {
    let mut bounds = Bounds2D::new();
    for room in &home.rooms {
        bounds.union(&Bounds2D::from_points(&room.points));
    }
    for wall in &home.walls {
        bounds.union(&Bounds2D::from_points(&wall.points));
    }
    for piece in &home.furniture {
        bounds.union(&Bounds2D::from_points(piece.ground_footprint()));
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroundBounds, Room, Wall};

    #[test]
    fn test_empty_bounds_are_invalid() {
        let bounds = Bounds2D::new();
        assert!(!bounds.is_valid());
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.center(), (0.0, 0.0));
    }

    #[test]
    fn test_from_corners_any_order() {
        let bounds = Bounds2D::from_corners(10.0, 20.0, -10.0, 0.0);
        assert_eq!(bounds.min_x, -10.0);
        assert_eq!(bounds.max_y, 20.0);
        assert!(bounds.same_extent(&Bounds2D::from_corners(-10.0, 0.0, 10.0, 20.0), 1e-9));
    }

    #[test]
    fn test_footprint_bounds_skips_non_finite() {
        let mut home = HomeModel::new(GroundBounds::default());
        home.rooms.push(Room::new(vec![[0.0, 0.0], [10.0, 0.0], [10.0, f64::NAN]]));
        home.walls.push(Wall::straight([-20.0, 5.0], [0.0, 5.0], 2.0));

        let bounds = footprint_bounds(&home);
        assert_eq!(bounds.min_x, -20.0);
        assert_eq!(bounds.max_x, 10.0);
        assert_eq!(bounds.min_y, 0.0);
        assert_eq!(bounds.max_y, 6.0);
    }
}
