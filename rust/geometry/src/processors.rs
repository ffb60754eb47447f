// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face processor
//!
//! Turns located surface primitives into vertices and polygon faces. All
//! primitives of one file append into a single [`MeshBuffers`], which the
//! importer owns and lends out by `&mut` for each pass. Faces reference the
//! contiguous vertex range added for their primitive, so indices stay valid
//! for the lifetime of the buffers.

use crate::error::{Error, Result};
use crate::material::MaterialTag;
use crate::mesh::CoordinateShift;
use crate::transform::convert_to_points;
use citygml_lite_core::{primitive_coordinates, Document, SurfaceClass, SurfacePrimitive};
use nalgebra::Point3;
use smallvec::SmallVec;

/// Vertex indices of one polygon face
pub type FaceIndices = SmallVec<[u32; 8]>;

/// Growable vertex/face accumulators for one import
#[derive(Debug, Clone)]
pub struct MeshBuffers {
    /// Transformed vertices; insertion order is the vertex index
    pub vertices: Vec<Point3<f64>>,
    /// One face per processed primitive
    pub faces: Vec<FaceIndices>,
    /// Material tag per face, only when materials are separated
    pub face_materials: Option<Vec<MaterialTag>>,
    /// Largest raw (untransformed) coordinate value seen so far
    pub max_coordinate: f64,
}

impl MeshBuffers {
    /// Running maximum before any primitive has been seen
    pub const INITIAL_MAX_COORDINATE: f64 = 1.0;

    pub fn new(separate_materials: bool) -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            face_materials: separate_materials.then(Vec::new),
            max_coordinate: Self::INITIAL_MAX_COORDINATE,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Append the points of one primitive as a new face
    ///
    /// Returns the index of the new face.
    pub fn push_face(&mut self, points: Vec<Point3<f64>>, tag: Option<MaterialTag>) -> Result<usize> {
        let start = self.vertices.len();
        let end = start + points.len();
        let start = u32::try_from(start)
            .map_err(|_| Error::MalformedGeometry("vertex count exceeds u32 range".to_string()))?;
        let end = u32::try_from(end)
            .map_err(|_| Error::MalformedGeometry("vertex count exceeds u32 range".to_string()))?;

        self.vertices.extend(points);
        self.faces.push((start..end).collect());
        if let (Some(materials), Some(tag)) = (self.face_materials.as_mut(), tag) {
            materials.push(tag);
        }

        Ok(self.faces.len() - 1)
    }
}

/// Converts primitives into faces with a fixed scale and origin
#[derive(Debug, Clone, Copy)]
pub struct FaceProcessor {
    scale: f64,
    origin: CoordinateShift,
    separate_materials: bool,
}

impl FaceProcessor {
    pub fn new(scale: f64, origin: CoordinateShift, separate_materials: bool) -> Self {
        Self {
            scale,
            origin,
            separate_materials,
        }
    }

    /// Material tag for faces of the given class, if materials are separated
    #[inline]
    fn tag_for(&self, class: SurfaceClass) -> Option<MaterialTag> {
        self.separate_materials.then(|| match class {
            SurfaceClass::Roof => MaterialTag::Roof,
            SurfaceClass::Other => MaterialTag::Wall,
        })
    }

    /// Process primitives in order, appending one face each
    ///
    /// `class` decides the material tag of every face added by this call.
    /// Returns the updated running maximum coordinate, which is also stored
    /// in `buffers`.
    ///
    /// # Errors
    /// Stops at the first primitive with unparseable coordinates. Faces added
    /// before the failure remain in `buffers`; callers discard the buffers.
    pub fn process(
        &self,
        doc: &Document,
        primitives: &[SurfacePrimitive],
        class: SurfaceClass,
        buffers: &mut MeshBuffers,
    ) -> Result<f64> {
        let tag = self.tag_for(class);

        for primitive in primitives {
            let coords = primitive_coordinates(doc, primitive.id)?;

            let local_max = coords.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if local_max > buffers.max_coordinate {
                buffers.max_coordinate = local_max;
            }

            let points = convert_to_points(&coords, self.scale, &self.origin)?;
            let face = buffers.push_face(points, tag)?;

            tracing::trace!(
                node = primitive.id.index(),
                kind = ?primitive.kind,
                class = class.as_str(),
                face,
                "Added face"
            );
        }

        Ok(buffers.max_coordinate)
    }
}
