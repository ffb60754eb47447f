// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate text extraction and parsing
//!
//! GML carries coordinates either as one packed `gml:posList` or as a
//! sequence of `gml:pos` elements. Both are reduced to the same flat
//! `[x0, y0, z0, x1, y1, z1, ...]` list.

use crate::document::{Document, NodeId};
use crate::error::{Error, Result};
use crate::schema::{POS, POS_LIST};

/// Estimate number of floats in coordinate text
#[inline]
fn estimate_float_count(text: &str) -> usize {
    // Rough estimate: ~8 bytes per float on average (including delimiters)
    text.len() / 8
}

/// Collect the raw coordinate text of a geometry primitive
///
/// Prefers the first `gml:posList` below the primitive. Without one, the
/// trimmed text of every `gml:pos` below it is joined with single spaces,
/// in document order.
pub fn extract_coordinate_text(doc: &Document, primitive: NodeId) -> String {
    if let Some(pos_list) = doc.find_first_descendant(primitive, POS_LIST) {
        return doc.text(pos_list).to_string();
    }

    let parts: Vec<&str> = doc
        .find_descendants(primitive, POS)
        .map(|pos| doc.text(pos).trim())
        .collect();
    parts.join(" ")
}

/// Collapse every whitespace run to a single space and trim both ends
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for token in text.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(token);
    }
    result
}

/// Parse coordinate text into a flat `Vec<f64>`
///
/// Every whitespace-separated token must be a complete float and the count
/// must be a multiple of 3; anything else is [`Error::MalformedGeometry`].
pub fn parse_coordinate_text(text: &str) -> Result<Vec<f64>> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Err(Error::MalformedGeometry(
            "primitive has no coordinates".to_string(),
        ));
    }

    let mut coords = Vec::with_capacity(estimate_float_count(&normalized));
    for token in normalized.split(' ') {
        let value: f64 = fast_float::parse(token).map_err(|_| {
            Error::MalformedGeometry(format!("could not parse '{}' as a number", token))
        })?;
        coords.push(value);
    }

    if coords.len() % 3 != 0 {
        return Err(Error::MalformedGeometry(format!(
            "coordinate count {} is not a multiple of 3",
            coords.len()
        )));
    }

    Ok(coords)
}

/// Extract and parse the coordinates of a geometry primitive
#[inline]
pub fn primitive_coordinates(doc: &Document, primitive: NodeId) -> Result<Vec<f64>> {
    parse_coordinate_text(&extract_coordinate_text(doc, primitive))
}
