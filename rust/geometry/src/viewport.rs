// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewport clip distances sized to an imported model
//!
//! Cosmetic only: picks a power of ten just above the model extent so the
//! host camera neither clips the model nor loses depth precision.

use crate::mesh::CoordinateShift;

/// Smallest order of magnitude used for the clip range
const MIN_MAGNITUDE: f64 = 100.0;

/// Near/far clip distances for a host viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRange {
    pub clip_start: f64,
    pub clip_end: f64,
}

impl ClipRange {
    /// Derive clip distances from the largest raw coordinate of an import
    ///
    /// The extent `(max_coordinate - min(origin)) * scale` is truncated to an
    /// integer; its decimal width `b` (sign included) gives the magnitude
    /// `max(10^b, 100)`. The far plane sits at ten times the magnitude, the
    /// near plane at a millionth of it.
    pub fn from_extent(max_coordinate: f64, origin: &CoordinateShift, scale: f64) -> Self {
        let extent = ((max_coordinate - origin.min_component()) * scale).trunc() as i64;
        let digits = extent.to_string().len() as i32;
        let magnitude = 10f64.powi(digits).max(MIN_MAGNITUDE);

        Self {
            clip_start: magnitude / 1_000_000.0,
            clip_end: magnitude * 10.0,
        }
    }
}
