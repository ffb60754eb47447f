// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! CityGML faces are planar 3D rings. They are projected onto their own
//! plane and triangulated in 2D with earcutr.

use crate::{Error, Point2, Point3, Result, Vector3};

/// Drop the closing vertex of a GML ring and consecutive duplicates
///
/// Returns the positions (into `points`) of the vertices that are kept.
pub fn distinct_ring_vertices(points: &[Point3<f64>]) -> Vec<usize> {
    const EPSILON: f64 = 1e-12;
    let mut kept: Vec<usize> = Vec::with_capacity(points.len());

    for (i, p) in points.iter().enumerate() {
        if let Some(&last) = kept.last() {
            if (points[last] - p).norm_squared() <= EPSILON {
                continue;
            }
        }
        kept.push(i);
    }

    while kept.len() > 1 {
        let (first, last) = (kept[0], kept[kept.len() - 1]);
        if (points[first] - points[last]).norm_squared() <= EPSILON {
            kept.pop();
        } else {
            break;
        }
    }

    kept
}

/// Check if a polygon is convex (all cross products have same sign)
fn is_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];
        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() > 1e-10 {
            let current = if cross > 0.0 { 1 } else { -1 };
            if sign == 0 {
                sign = current;
            } else if sign != current {
                return false;
            }
        }
    }

    true
}

/// Triangulate a simple 2D polygon (no holes)
///
/// Returns triangle indices into the input points.
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();
    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    // FAST PATH: convex rings are fanned from the first vertex
    if n == 3 || is_convex(points) {
        return Ok((1..n - 1).flat_map(|i| [0, i, i + 1]).collect());
    }

    let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    earcutr::earcut(&flat, &[], 2).map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}

/// Normal of a 3D ring by Newell's method, `(0, 0, 1)` if degenerate
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    normal
        .try_normalize(1e-12)
        .unwrap_or_else(|| Vector3::new(0.0, 0.0, 1.0))
}

/// Project 3D points onto the plane through `points[0]` with the given normal
pub fn project_to_2d(points: &[Point3<f64>], normal: &Vector3<f64>) -> Vec<Point2<f64>> {
    let Some(&origin) = points.first() else {
        return Vec::new();
    };

    // Axis least parallel to the normal gives a stable basis
    let reference = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
        Vector3::x()
    } else if normal.y.abs() <= normal.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u_axis = normal.cross(&reference).normalize();
    let v_axis = normal.cross(&u_axis).normalize();

    points
        .iter()
        .map(|p| {
            let v = p - origin;
            Point2::new(v.dot(&u_axis), v.dot(&v_axis))
        })
        .collect()
}

/// Triangulate a planar 3D ring
///
/// Returns triangle indices into `points`. The triangles keep the winding
/// of the ring.
pub fn triangulate_face(points: &[Point3<f64>]) -> Result<Vec<usize>> {
    let kept = distinct_ring_vertices(points);
    if kept.len() < 3 {
        return Err(Error::TriangulationError(format!(
            "face has only {} distinct vertices",
            kept.len()
        )));
    }

    let ring: Vec<Point3<f64>> = kept.iter().map(|&i| points[i]).collect();
    let normal = calculate_polygon_normal(&ring);
    let projected = project_to_2d(&ring, &normal);
    let local = triangulate_polygon(&projected)?;

    // earcutr may flip orientation; restore the ring's winding
    let mut triangles: Vec<usize> = local.iter().map(|&i| kept[i]).collect();
    for tri in triangles.chunks_exact_mut(3) {
        let (a, b, c) = (points[tri[0]], points[tri[1]], points[tri[2]]);
        if (b - a).cross(&(c - a)).dot(&normal) < 0.0 {
            tri.swap(1, 2);
        }
    }

    Ok(triangles)
}
