// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityGML-Lite Core Parser
//!
//! Namespace-aware CityGML document parsing built on
//! [quick-xml](https://docs.rs/quick-xml), plus lookup of the surface
//! geometry that the mesh pipeline consumes.
//!
//! ## Overview
//!
//! - **Document**: arena of elements in document order with identity handles
//! - **Geometry Locator**: finds `gml:Polygon`/`gml:Triangle` primitives and
//!   splits them into roof and other surfaces
//! - **Coordinate parsing**: `gml:posList`/`gml:pos` text to flat `f64` lists
//!   using [fast-float](https://docs.rs/fast-float)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use citygml_lite_core::{locate_primitives, primitive_coordinates, Document};
//!
//! let doc = Document::from_path("building.gml")?;
//! let located = locate_primitives(&doc);
//!
//! for primitive in located.roof.iter().chain(&located.other) {
//!     let coords = primitive_coordinates(&doc, primitive.id)?;
//!     println!("{:?} with {} points", primitive.class, coords.len() / 3);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for handles and classifications

pub mod document;
pub mod error;
pub mod fast_parse;
pub mod locator;
pub mod schema;

pub use document::{Document, Element, NodeId};
pub use error::{Error, Result};
pub use fast_parse::{
    extract_coordinate_text, normalize_whitespace, parse_coordinate_text, primitive_coordinates,
};
pub use locator::{locate_primitives, LocatedPrimitives, PrimitiveKind, SurfaceClass, SurfacePrimitive};
pub use schema::{QName, BUILDING_NS, GML_NS};
