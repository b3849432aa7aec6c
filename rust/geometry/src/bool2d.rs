// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D ring helpers and the i_overlay glue behind [`crate::Area`]
//!
//! Rings are closed sequences of points without a repeated closing point.
//! Orientation follows the usual mathematical convention: a positive signed
//! area is counter-clockwise (solid ground), a negative one clockwise (an
//! enclosed hole).

use ground3d_core::Bounds2D;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Epsilon for floating point comparisons in 2D operations
pub const EPSILON_2D: f64 = 1e-9;

/// Minimum area threshold - rings smaller than this are considered degenerate
pub const MIN_AREA_THRESHOLD: f64 = 1e-8;

/// i_overlay contour format
pub(crate) type Path = Vec<[f64; 2]>;

/// i_overlay result format: shapes made of an outer contour followed by holes
pub(crate) type Shapes = Vec<Vec<Path>>;

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Whether a ring is wound clockwise, i.e. denotes an enclosed hole
#[inline]
pub fn is_clockwise(contour: &[Point2<f64>]) -> bool {
    compute_signed_area(contour) < 0.0
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    compute_signed_area(contour).abs() > MIN_AREA_THRESHOLD
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Clean up a raw ring.
///
/// Non-finite points are dropped, consecutive duplicates are collapsed
/// (including the closing point repeating the first one). Returns `None`
/// when fewer than three distinct points or no area remain.
pub fn normalize_ring(contour: &[Point2<f64>]) -> Option<Vec<Point2<f64>>> {
    let mut ring: Vec<Point2<f64>> = Vec::with_capacity(contour.len());
    for p in contour {
        if !(p.x.is_finite() && p.y.is_finite()) {
            continue;
        }
        if ring.last().map_or(true, |last| !same_point(last, p)) {
            ring.push(*p);
        }
    }
    while ring.len() > 1 && same_point(&ring[0], &ring[ring.len() - 1]) {
        ring.pop();
    }

    if is_valid_contour(&ring) {
        Some(ring)
    } else {
        None
    }
}

#[inline]
fn same_point(a: &Point2<f64>, b: &Point2<f64>) -> bool {
    (a.x - b.x).abs() <= EPSILON_2D && (a.y - b.y).abs() <= EPSILON_2D
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Compute bounding box of a contour
pub fn contour_bounds(contour: &[Point2<f64>]) -> Bounds2D {
    let mut bounds = Bounds2D::new();
    for p in contour {
        bounds.expand(p.x, p.y);
    }
    bounds
}

/// Perimeter of a closed ring
pub fn ring_perimeter(contour: &[Point2<f64>]) -> f64 {
    let n = contour.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| (contour[(i + 1) % n] - contour[i]).norm())
        .sum()
}

// ============================================================================
// i_overlay glue
// ============================================================================

/// Convert a Point2 contour to i_overlay path format
pub(crate) fn contour_to_path(contour: &[Point2<f64>]) -> Path {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

/// Convert an i_overlay path back to points
pub(crate) fn path_to_contour(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

/// Run one boolean operation between two sets of consistently wound contours.
///
/// Outer contours must be counter-clockwise and holes clockwise (or the
/// reverse, uniformly), so the non-zero fill rule yields the intended regions.
pub(crate) fn overlay(subject: &[Path], clip: &[Path], rule: OverlayRule) -> Shapes {
    let subject: Vec<Path> = subject.to_vec();
    let clip: Vec<Path> = clip.to_vec();
    subject.overlay(&clip, rule, FillRule::NonZero)
}

/// Resolve a raw, possibly self-intersecting polygon into simple shapes.
///
/// The polygon is filled with the non-zero rule, whatever its orientation.
pub(crate) fn resolve_polygon(path: Path) -> Shapes {
    let subject = vec![path];
    subject.overlay(&subject, OverlayRule::Union, FillRule::NonZero)
}
