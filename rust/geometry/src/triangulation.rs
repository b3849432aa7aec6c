// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangulation of ground faces
//!
//! Indices refer to the outer ring followed by each hole, in order.

use crate::bool2d::EPSILON_2D;
use crate::{Error, Point2, Point3, Result, Vector3};

/// Triangles of a ring without holes.
///
/// Rings turning one way only, like the ground rectangles, are fanned from
/// their first vertex. Other rings go through earcut.
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    check_ring_len(points.len())?;
    if turns_one_way(points) {
        return Ok((1..points.len() - 1).flat_map(|i| [0, i, i + 1]).collect());
    }
    earcut(points, &[])
}

/// Triangles of a ring with holes
pub fn triangulate_polygon_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<usize>> {
    check_ring_len(outer.len())?;
    for hole in holes {
        check_ring_len(hole.len())?;
    }
    if holes.is_empty() {
        triangulate_polygon(outer)
    } else {
        earcut(outer, holes)
    }
}

fn check_ring_len(len: usize) -> Result<()> {
    if len < 3 {
        return Err(Error::TriangulationError(format!(
            "ring of {} points can't be triangulated",
            len
        )));
    }
    Ok(())
}

/// Whether every non-flat corner of the ring turns the same way
fn turns_one_way(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    let mut turns = (0..n)
        .map(|i| {
            let (a, b, c) = (points[i], points[(i + 1) % n], points[(i + 2) % n]);
            (b - a).perp(&(c - b))
        })
        .filter(|cross| cross.abs() > EPSILON_2D);
    match turns.next() {
        Some(first) => turns.all(|cross| cross.signum() == first.signum()),
        None => false,
    }
}

fn earcut(outer: &[Point2<f64>], holes: &[Vec<Point2<f64>>]) -> Result<Vec<usize>> {
    let rings = std::iter::once(outer).chain(holes.iter().map(Vec::as_slice));
    let mut coords = Vec::new();
    let mut hole_starts = Vec::with_capacity(holes.len());
    for (i, ring) in rings.enumerate() {
        if i > 0 {
            hole_starts.push(coords.len() / 2);
        }
        coords.extend(ring.iter().flat_map(|p| [p.x, p.y]));
    }
    earcutr::earcut(&coords, &hole_starts, 2)
        .map_err(|e| Error::TriangulationError(format!("earcut failed: {:?}", e)))
}

/// Unit normal of a planar polygon by Newell's method; +Z when degenerate
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let normal = (0..n).fold(Vector3::zeros(), |acc: Vector3<f64>, i| {
        let (p, q) = (points[i], points[(i + 1) % n]);
        acc + Vector3::new(
            (p.y - q.y) * (p.z + q.z),
            (p.z - q.z) * (p.x + q.x),
            (p.x - q.x) * (p.y + q.y),
        )
    });
    normal.try_normalize(EPSILON_2D).unwrap_or_else(Vector3::z)
}
