// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate conversion from file space to target units
//!
//! The only transform supported is translate-then-scale:
//! `p = (raw - origin) * scale`, applied per axis in f64.

use crate::error::{Error, Result};
use crate::mesh::CoordinateShift;
use nalgebra::Point3;

/// Convert a flat `[x0, y0, z0, x1, ...]` list into 3D points
///
/// # Errors
/// Returns [`Error::MalformedGeometry`] if the length is not a multiple of 3.
pub fn convert_to_points(
    coords: &[f64],
    scale: f64,
    origin: &CoordinateShift,
) -> Result<Vec<Point3<f64>>> {
    if coords.len() % 3 != 0 {
        return Err(Error::MalformedGeometry(format!(
            "coordinate count {} is not a multiple of 3",
            coords.len()
        )));
    }

    Ok(coords
        .chunks_exact(3)
        .map(|c| {
            Point3::new(
                (c[0] - origin.x) * scale,
                (c[1] - origin.y) * scale,
                (c[2] - origin.z) * scale,
            )
        })
        .collect())
}
