// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use super::{ImportOptions, MaterialData, MeshData, PolygonMeshData};
use citygml_lite_geometry::{ClipRange, FileReport};
use serde::{Deserialize, Serialize};

/// Batch import response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// One entry per uploaded file, in upload order.
    pub files: Vec<FileImport>,
    /// Wall material (slot 0) and roof material (slot 1).
    pub materials: Vec<MaterialData>,
    /// Options the files were imported with.
    pub options: ImportOptions,
    /// Processing statistics.
    pub stats: ImportStats,
}

/// Outcome of one uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Imported,
    Error,
}

/// Viewport clip distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipData {
    pub clip_start: f64,
    pub clip_end: f64,
}

impl From<ClipRange> for ClipData {
    fn from(clip: ClipRange) -> Self {
        Self {
            clip_start: clip.clip_start,
            clip_end: clip.clip_end,
        }
    }
}

/// Result for a single file of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileImport {
    /// Uploaded file name, also the object name.
    pub name: String,
    pub status: ImportStatus,
    /// "<name> imported" or "Error importing <name>: <error>".
    pub message: String,
    /// Cache key (SHA256 of file content and options).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_coordinate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<PolygonMeshData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub render_meshes: Vec<MeshData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipData>,
    /// Whether this entry was served from cache.
    #[serde(default)]
    pub from_cache: bool,
}

impl FileImport {
    /// Failure entry for a file that never reached the importer.
    pub fn failed(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let name = name.into();
        Self {
            message: format!("Error importing {}: {}", name, reason),
            name,
            status: ImportStatus::Error,
            cache_key: None,
            max_coordinate: None,
            mesh: None,
            render_meshes: Vec::new(),
            clip: None,
            from_cache: false,
        }
    }

    #[inline]
    pub fn is_imported(&self) -> bool {
        self.status == ImportStatus::Imported
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, |m| m.vertices.len())
    }

    pub fn face_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, |m| m.faces.len())
    }
}

impl From<&FileReport> for FileImport {
    fn from(report: &FileReport) -> Self {
        let message = report.message();
        match &report.outcome {
            Ok(object) => Self {
                name: report.name.clone(),
                status: ImportStatus::Imported,
                message,
                cache_key: None,
                max_coordinate: Some(object.max_coordinate),
                mesh: Some(PolygonMeshData::from(&object.mesh)),
                render_meshes: MeshData::from_polygon_mesh(&object.mesh),
                clip: object.clip.map(ClipData::from),
                from_cache: false,
            },
            Err(_) => Self {
                message,
                ..Self::failed(report.name.clone(), "")
            },
        }
    }
}

/// Processing statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    pub total_files: usize,
    pub imported_files: usize,
    pub failed_files: usize,
    pub cached_files: usize,
    pub total_vertices: usize,
    pub total_faces: usize,
    /// Total processing time (ms).
    pub total_time_ms: u64,
}

impl ImportStats {
    pub fn from_files(files: &[FileImport], total_time_ms: u64) -> Self {
        let imported_files = files.iter().filter(|f| f.is_imported()).count();
        Self {
            total_files: files.len(),
            imported_files,
            failed_files: files.len() - imported_files,
            cached_files: files.iter().filter(|f| f.from_cache).count(),
            total_vertices: files.iter().map(FileImport::vertex_count).sum(),
            total_faces: files.iter().map(FileImport::face_count).sum(),
            total_time_ms,
        }
    }
}
