// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data types for serialization.

use citygml_lite_geometry::{Material, Mesh, PolygonMesh};
use serde::{Deserialize, Serialize};

/// Material description sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialData {
    pub name: String,
    /// RGBA color [r, g, b, a] in 0-1 range.
    pub diffuse_color: [f32; 4],
    pub specular_intensity: f32,
    pub roughness: f32,
}

impl From<&Material> for MaterialData {
    fn from(material: &Material) -> Self {
        Self {
            name: material.name.clone(),
            diffuse_color: material.diffuse_color,
            specular_intensity: material.specular_intensity,
            roughness: material.roughness,
        }
    }
}

/// Polygon mesh as produced by the importer.
///
/// Faces keep their original vertex order, including a repeated closing
/// vertex when the source ring had one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonMeshData {
    pub name: String,
    /// Vertex positions, one `[x, y, z]` per vertex.
    pub vertices: Vec<[f64; 3]>,
    /// Vertex indices per face.
    pub faces: Vec<Vec<u32>>,
    /// Material slot per face; -1 when materials were not separated.
    pub face_material_slots: Vec<i32>,
}

impl From<&PolygonMesh> for PolygonMeshData {
    fn from(mesh: &PolygonMesh) -> Self {
        Self {
            name: mesh.name.clone(),
            vertices: mesh.vertices.iter().map(|p| [p.x, p.y, p.z]).collect(),
            faces: mesh.faces.iter().map(|f| f.to_vec()).collect(),
            face_material_slots: mesh
                .face_material_slots
                .iter()
                .map(|slot| slot.map_or(-1, |s| s as i32))
                .collect(),
        }
    }
}

/// Triangulated render mesh for one material slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshData {
    /// Name of the material this mesh is drawn with.
    pub material: String,
    /// Vertex positions (x, y, z triplets).
    pub positions: Vec<f32>,
    /// Vertex normals (x, y, z triplets).
    pub normals: Vec<f32>,
    /// Triangle indices.
    pub indices: Vec<u32>,
    /// RGBA color [r, g, b, a] in 0-1 range.
    pub color: [f32; 4],
}

impl MeshData {
    pub fn new(mesh: Mesh, material: &Material) -> Self {
        Self {
            material: material.name.clone(),
            positions: mesh.positions,
            normals: mesh.normals,
            indices: mesh.indices,
            color: material.diffuse_color,
        }
    }

    /// Render meshes of a polygon mesh, skipping empty slots.
    pub fn from_polygon_mesh(mesh: &PolygonMesh) -> Vec<Self> {
        mesh.to_render_meshes()
            .into_iter()
            .zip(mesh.materials.iter())
            .filter(|(render, _)| !render.is_empty())
            .map(|(render, material)| Self::new(render, material))
            .collect()
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
