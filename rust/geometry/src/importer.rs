// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CityGML import pipeline
//!
//! One file goes through parse → locate → face processing (roof primitives
//! first, then the rest) → assembly. Every import owns fresh buffers, so a
//! failed file never leaves partial geometry behind, and a batch can run its
//! files in parallel.

use crate::assembler::{assemble_mesh, PolygonMesh};
use crate::error::Result;
use crate::material::{MaterialPair, MaterialTag};
use crate::mesh::CoordinateShift;
use crate::processors::{FaceIndices, FaceProcessor, MeshBuffers};
use crate::viewport::ClipRange;
use citygml_lite_core::{locate_primitives, Document, SurfaceClass};
use nalgebra::Point3;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Parameters of one import
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportSettings {
    /// Multiplier applied after the origin shift (1 for meters, 0.001 for kilometers)
    pub scale: f64,
    /// File coordinate that becomes (0, 0, 0)
    pub origin: CoordinateShift,
    /// Tag faces as roof or wall
    pub separate_materials: bool,
    /// Compute viewport clip distances for the result
    pub viewport_clip: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            scale: 0.1,
            origin: CoordinateShift::default(),
            separate_materials: true,
            viewport_clip: false,
        }
    }
}

/// Geometry extracted from one CityGML document
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<FaceIndices>,
    /// One tag per face when materials are separated
    pub face_materials: Option<Vec<MaterialTag>>,
    /// Largest raw coordinate value (at least 1.0)
    pub max_coordinate: f64,
}

impl ImportResult {
    /// Assemble the host mesh
    pub fn into_mesh(self, name: impl Into<String>, materials: &MaterialPair) -> PolygonMesh {
        let buffers = MeshBuffers {
            vertices: self.vertices,
            faces: self.faces,
            face_materials: self.face_materials,
            max_coordinate: self.max_coordinate,
        };
        assemble_mesh(name, buffers, materials)
    }
}

impl From<MeshBuffers> for ImportResult {
    fn from(buffers: MeshBuffers) -> Self {
        Self {
            vertices: buffers.vertices,
            faces: buffers.faces,
            face_materials: buffers.face_materials,
            max_coordinate: buffers.max_coordinate,
        }
    }
}

/// Extract surface geometry from a parsed document
pub fn import_document(doc: &Document, settings: &ImportSettings) -> Result<ImportResult> {
    let located = locate_primitives(doc);
    tracing::debug!(
        roof_surfaces = located.roof_surfaces.len(),
        roof_primitives = located.roof.len(),
        other_primitives = located.other.len(),
        "Located primitives"
    );

    let processor = FaceProcessor::new(settings.scale, settings.origin, settings.separate_materials);
    let mut buffers = MeshBuffers::new(settings.separate_materials);

    // Roof faces must come first
    processor.process(doc, &located.roof, SurfaceClass::Roof, &mut buffers)?;
    processor.process(doc, &located.other, SurfaceClass::Other, &mut buffers)?;

    Ok(buffers.into())
}

/// Extract surface geometry from CityGML text
pub fn import_citygml_str(content: &str, settings: &ImportSettings) -> Result<ImportResult> {
    let doc = Document::parse(content)?;
    import_document(&doc, settings)
}

/// Extract surface geometry from raw CityGML bytes in their declared encoding
pub fn import_citygml_bytes(content: &[u8], settings: &ImportSettings) -> Result<ImportResult> {
    let doc = Document::parse_bytes(content)?;
    import_document(&doc, settings)
}

/// Extract surface geometry from a CityGML file
pub fn import_citygml(path: impl AsRef<Path>, settings: &ImportSettings) -> Result<ImportResult> {
    let doc = Document::from_path(path)?;
    import_document(&doc, settings)
}

/// A successfully imported file, ready for the host
#[derive(Debug, Clone)]
pub struct ImportedObject {
    pub mesh: PolygonMesh,
    pub max_coordinate: f64,
    /// Present when [`ImportSettings::viewport_clip`] is set
    pub clip: Option<ClipRange>,
}

impl ImportedObject {
    pub fn new(
        name: impl Into<String>,
        result: ImportResult,
        settings: &ImportSettings,
        materials: &MaterialPair,
    ) -> Self {
        let max_coordinate = result.max_coordinate;
        let clip = settings
            .viewport_clip
            .then(|| ClipRange::from_extent(max_coordinate, &settings.origin, settings.scale));

        Self {
            mesh: result.into_mesh(name, materials),
            max_coordinate,
            clip,
        }
    }
}

/// Outcome of importing one file of a batch
#[derive(Debug)]
pub struct FileReport {
    /// File name (without directory), also used as the object name
    pub name: String,
    /// The object, or a user-facing message naming the file and the error
    pub outcome: std::result::Result<ImportedObject, String>,
}

impl FileReport {
    /// Import already-loaded content under the given object name
    pub fn from_content(
        name: impl Into<String>,
        content: &str,
        settings: &ImportSettings,
        materials: &MaterialPair,
    ) -> Self {
        let name = name.into();
        let outcome = import_citygml_str(content, settings);
        Self::finish(name, outcome, settings, materials)
    }

    /// Import raw bytes (decoded per their XML declaration) under the given name
    pub fn from_bytes(
        name: impl Into<String>,
        content: &[u8],
        settings: &ImportSettings,
        materials: &MaterialPair,
    ) -> Self {
        let name = name.into();
        let outcome = import_citygml_bytes(content, settings);
        Self::finish(name, outcome, settings, materials)
    }

    /// Read and import one file
    pub fn from_path(path: &Path, settings: &ImportSettings, materials: &MaterialPair) -> Self {
        let outcome = import_citygml(path, settings);
        Self::finish(object_name(path), outcome, settings, materials)
    }

    fn finish(
        name: String,
        outcome: Result<ImportResult>,
        settings: &ImportSettings,
        materials: &MaterialPair,
    ) -> Self {
        let outcome = match outcome {
            Ok(result) => {
                let object = ImportedObject::new(name.clone(), result, settings, materials);
                tracing::info!(
                    file = %name,
                    vertices = object.mesh.vertex_count(),
                    faces = object.mesh.face_count(),
                    "{} imported",
                    name
                );
                Ok(object)
            }
            Err(e) => {
                let message = format!("Error importing {}: {}", name, e);
                tracing::error!(file = %name, error = %e, "{}", message);
                Err(message)
            }
        };

        Self { name, outcome }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Status line for the user
    pub fn message(&self) -> String {
        match &self.outcome {
            Ok(_) => format!("{} imported", self.name),
            Err(message) => message.clone(),
        }
    }
}

/// Object name for a file: its base name
pub fn object_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Import several files independently
///
/// Files are processed in parallel; reports come back in input order. A
/// failing file is reported and never stops the others.
pub fn import_batch(
    paths: &[PathBuf],
    settings: &ImportSettings,
    materials: &MaterialPair,
) -> Vec<FileReport> {
    import_each(
        paths,
        |path| object_name(path),
        |path| FileReport::from_path(path, settings, materials),
    )
}

/// Run `import` over every source in parallel, keeping input order
///
/// `name` labels each source in the progress log. Shared by file batches and
/// in-memory uploads.
pub fn import_each<S, N, F>(sources: &[S], name: N, import: F) -> Vec<FileReport>
where
    S: Sync,
    N: Fn(&S) -> String + Sync,
    F: Fn(&S) -> FileReport + Sync,
{
    let start = Instant::now();
    let total = sources.len();

    let reports: Vec<FileReport> = sources
        .par_iter()
        .enumerate()
        .map(|(i, source)| {
            tracing::info!("File {}/{}: {}", i + 1, total, name(source));
            import(source)
        })
        .collect();

    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    tracing::info!(
        files = total,
        failed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch import finished"
    );

    reports
}
