// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon-set algebra
//!
//! An [`Area`] is a region of the plane stored as simple shapes, each made of
//! one counter-clockwise outer ring and the clockwise rings of its holes.
//! Every operation returns a new normalized area; degenerate rings never
//! survive, so none of these operations can fail.

use crate::bool2d::{
    compute_signed_area, contour_bounds, contour_to_path, ensure_ccw, ensure_cw, is_clockwise,
    normalize_ring, overlay, path_to_contour, point_in_contour, resolve_polygon, Path, Shapes,
};
use crate::profile::Profile2D;
use ground3d_core::{Bounds2D, Point};
use i_overlay::core::overlay_rule::OverlayRule;
use nalgebra::Point2;

/// A ring of an area with its role
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub points: Vec<Point2<f64>>,
    /// Clockwise ring bounding an enclosed void
    pub hole: bool,
}

impl Ring {
    #[inline]
    pub fn is_hole(&self) -> bool {
        self.hole
    }

    #[inline]
    pub fn signed_area(&self) -> f64 {
        compute_signed_area(&self.points)
    }

    /// The region enclosed by this ring, whatever its winding
    pub fn to_area(&self) -> Area {
        Area::from_contour(&self.points)
    }
}

/// A region of the plane supporting boolean operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Area {
    shapes: Vec<Profile2D>,
}

impl Area {
    /// The empty area
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Area enclosed by a raw polygon.
    ///
    /// Duplicate points are collapsed and self-intersections resolved with
    /// the non-zero rule. Polygons with fewer than three distinct points
    /// give the empty area.
    pub fn from_points(points: &[Point]) -> Self {
        let contour: Vec<Point2<f64>> = points.iter().map(|p| Point2::new(p[0], p[1])).collect();
        Self::from_contour(&contour)
    }

    /// Same as [`Area::from_points`] for nalgebra points
    pub fn from_contour(contour: &[Point2<f64>]) -> Self {
        match normalize_ring(contour) {
            Some(ring) => Self::from_shapes(resolve_polygon(contour_to_path(&ring))),
            None => Self::new(),
        }
    }

    /// Axis-aligned rectangle
    pub fn from_rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        let contour = [
            Point2::new(min_x, min_y),
            Point2::new(max_x, min_y),
            Point2::new(max_x, max_y),
            Point2::new(min_x, max_y),
        ];
        match normalize_ring(&contour) {
            Some(ring) => Self {
                shapes: vec![Profile2D::new(ensure_ccw(&ring))],
            },
            None => Self::new(),
        }
    }

    pub fn from_bounds(bounds: &Bounds2D) -> Self {
        if bounds.is_valid() {
            Self::from_rect(bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y)
        } else {
            Self::new()
        }
    }

    /// Region covered by a profile: its outer ring minus its holes
    pub fn from_profile(profile: &Profile2D) -> Self {
        let mut paths = vec![contour_to_path(&ensure_ccw(&profile.outer))];
        paths.extend(profile.holes.iter().map(|hole| contour_to_path(&ensure_cw(hole))));
        Self::from_shapes(overlay(&paths, &[], OverlayRule::Subject))
    }

    /// Build an area from i_overlay output, normalizing windings and
    /// dropping degenerate rings
    pub(crate) fn from_shapes(shapes: Shapes) -> Self {
        let mut profiles = Vec::with_capacity(shapes.len());
        for shape in shapes {
            let mut contours = shape.into_iter();
            let outer = match contours.next().and_then(|c| normalize_ring(&path_to_contour(&c))) {
                Some(outer) => ensure_ccw(&outer),
                None => continue,
            };
            let mut profile = Profile2D::new(outer);
            for contour in contours {
                if let Some(hole) = normalize_ring(&path_to_contour(&contour)) {
                    profile.add_hole(ensure_cw(&hole));
                }
            }
            profiles.push(profile);
        }
        Self { shapes: profiles }
    }

    /// Contours in i_overlay format, outer rings CCW and holes CW
    fn paths(&self) -> Vec<Path> {
        let mut paths = Vec::new();
        for shape in &self.shapes {
            paths.push(contour_to_path(&shape.outer));
            for hole in &shape.holes {
                paths.push(contour_to_path(hole));
            }
        }
        paths
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes of the area, each an outer ring with its holes
    #[inline]
    pub fn shapes(&self) -> &[Profile2D] {
        &self.shapes
    }

    /// `self ∪ other`
    pub fn union(&self, other: &Area) -> Area {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Self::from_shapes(overlay(&self.paths(), &other.paths(), OverlayRule::Union))
    }

    /// `self − other`
    pub fn subtract(&self, other: &Area) -> Area {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        Self::from_shapes(overlay(&self.paths(), &other.paths(), OverlayRule::Difference))
    }

    /// `(self − other) ∪ (other − self)`
    pub fn xor(&self, other: &Area) -> Area {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Self::from_shapes(overlay(&self.paths(), &other.paths(), OverlayRule::Xor))
    }

    /// `self ∩ other`
    pub fn intersect(&self, other: &Area) -> Area {
        if self.is_empty() || other.is_empty() {
            return Area::new();
        }
        Self::from_shapes(overlay(&self.paths(), &other.paths(), OverlayRule::Intersect))
    }

    /// Union of many areas in a single sweep
    pub fn union_all<'a>(areas: impl IntoIterator<Item = &'a Area>) -> Area {
        let paths: Vec<Path> = areas.into_iter().flat_map(|area| area.paths()).collect();
        if paths.is_empty() {
            return Area::new();
        }
        // Outer rings wind +1 and holes -1, so every covered point has a
        // non-zero winding sum
        Self::from_shapes(overlay(&paths, &[], OverlayRule::Subject))
    }

    /// In-place union
    pub fn add(&mut self, other: &Area) {
        if !other.is_empty() {
            *self = self.union(other);
        }
    }

    /// In-place subtraction
    pub fn remove(&mut self, other: &Area) {
        if !self.is_empty() && !other.is_empty() {
            *self = self.subtract(other);
        }
    }

    /// Rings of the area in order: each outer ring followed by its holes
    pub fn decompose(&self) -> Vec<Ring> {
        let mut rings = Vec::new();
        for shape in &self.shapes {
            rings.push(Ring {
                points: shape.outer.clone(),
                hole: is_clockwise(&shape.outer),
            });
            for hole in &shape.holes {
                rings.push(Ring {
                    points: hole.clone(),
                    hole: is_clockwise(hole),
                });
            }
        }
        rings
    }

    /// Counter-clockwise rings only
    pub fn outer_rings(&self) -> impl Iterator<Item = Ring> + '_ {
        self.decompose().into_iter().filter(|ring| !ring.hole)
    }

    /// Surface of the area (outer rings minus holes)
    pub fn measure(&self) -> f64 {
        self.shapes
            .iter()
            .map(|shape| {
                compute_signed_area(&shape.outer).abs()
                    - shape
                        .holes
                        .iter()
                        .map(|h| compute_signed_area(h).abs())
                        .sum::<f64>()
            })
            .sum()
    }

    pub fn bounds(&self) -> Bounds2D {
        let mut bounds = Bounds2D::new();
        for shape in &self.shapes {
            bounds.union(&contour_bounds(&shape.outer));
        }
        bounds
    }

    /// Whether the point lies inside the area (not in one of its holes)
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        self.shapes.iter().any(|shape| {
            point_in_contour(point, &shape.outer)
                && !shape.holes.iter().any(|hole| point_in_contour(point, hole))
        })
    }

    /// Whether both areas cover the same region, within `tolerance` of surface
    pub fn same_region(&self, other: &Area, tolerance: f64) -> bool {
        self.xor(other).measure() <= tolerance
    }
}
