// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh assembly
//!
//! Builds the final polygon mesh handed to the host from the filled
//! [`MeshBuffers`]. Face `i` takes its material slot from material tag `i`;
//! slots are never derived from geometry.

use crate::material::{Material, MaterialPair};
use crate::mesh::Mesh;
use crate::processors::{FaceIndices, MeshBuffers};
use crate::triangulation::triangulate_face;
use nalgebra::Point3;

/// Polygon mesh with two material slots (`[wall, roof]`)
#[derive(Debug, Clone)]
pub struct PolygonMesh {
    pub name: String,
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<FaceIndices>,
    pub materials: [Material; 2],
    /// Material slot per face; `None` leaves the host default in place
    pub face_material_slots: Vec<Option<usize>>,
}

impl PolygonMesh {
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

    /// Triangulate every face into one render mesh per material slot
    ///
    /// Faces without a slot go to slot 0. Vertices are duplicated per
    /// triangle mesh so each slot can be uploaded on its own. Faces that
    /// cannot be triangulated (fewer than three distinct points) are skipped.
    pub fn to_render_meshes(&self) -> [Mesh; 2] {
        let mut meshes = [Mesh::new(), Mesh::new()];
        let mut skipped = 0usize;

        for (face, slot) in self.faces.iter().zip(&self.face_material_slots) {
            let points: Vec<Point3<f64>> =
                face.iter().map(|&i| self.vertices[i as usize]).collect();

            let triangles = match triangulate_face(&points) {
                Ok(triangles) => triangles,
                Err(e) => {
                    tracing::debug!(mesh = %self.name, error = %e, "Skipping face");
                    skipped += 1;
                    continue;
                }
            };

            let mesh = &mut meshes[slot.unwrap_or(0)];
            let base = mesh.vertex_count() as u32;
            for point in &points {
                mesh.push_position(point);
            }
            for tri in triangles.chunks_exact(3) {
                mesh.add_triangle(
                    base + tri[0] as u32,
                    base + tri[1] as u32,
                    base + tri[2] as u32,
                );
            }
        }

        for mesh in &mut meshes {
            mesh.compute_normals();
        }

        if skipped > 0 {
            tracing::debug!(mesh = %self.name, skipped, "Skipped degenerate faces");
        }

        meshes
    }
}

/// Build the host mesh from filled buffers
///
/// Without material tags every face keeps the host default slot.
pub fn assemble_mesh(name: impl Into<String>, buffers: MeshBuffers, materials: &MaterialPair) -> PolygonMesh {
    let MeshBuffers {
        vertices,
        faces,
        face_materials,
        ..
    } = buffers;

    let face_material_slots = match face_materials {
        Some(tags) => {
            debug_assert_eq!(tags.len(), faces.len());
            tags.iter().map(|tag| Some(tag.slot())).collect()
        }
        None => vec![None; faces.len()],
    };

    PolygonMesh {
        name: name.into(),
        vertices,
        faces,
        materials: [materials.wall.clone(), materials.roof.clone()],
        face_material_slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialTag;

    fn buffers_with_two_faces(separate: bool) -> MeshBuffers {
        let mut buffers = MeshBuffers::new(separate);
        let roof = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let wall = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
        ];
        buffers.push_face(roof, Some(MaterialTag::Roof)).unwrap();
        buffers.push_face(wall, Some(MaterialTag::Wall)).unwrap();
        buffers
    }

    #[test]
    fn test_slots_follow_tags_by_index() {
        let mesh = assemble_mesh("a.gml", buffers_with_two_faces(true), &MaterialPair::default());
        assert_eq!(mesh.name, "a.gml");
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.face_material_slots, vec![Some(1), Some(0)]);
        assert_eq!(mesh.materials[0].name, "Wall_Material");
        assert_eq!(mesh.materials[1].name, "Roof_Material");
    }

    #[test]
    fn test_no_tags_leaves_default() {
        let mesh = assemble_mesh("a.gml", buffers_with_two_faces(false), &MaterialPair::default());
        assert_eq!(mesh.face_material_slots, vec![None, None]);
    }

    #[test]
    fn test_render_meshes_split_by_slot() {
        let mesh = assemble_mesh("a.gml", buffers_with_two_faces(true), &MaterialPair::default());
        let [wall, roof] = mesh.to_render_meshes();
        assert_eq!(wall.triangle_count(), 1);
        assert_eq!(roof.triangle_count(), 1);
        assert_eq!(roof.positions[3..6], [1.0, 0.0, 0.0]);
        assert_eq!(wall.normals.len(), wall.positions.len());
    }

    #[test]
    fn test_render_meshes_skip_degenerate() {
        let mut buffers = MeshBuffers::new(true);
        let line = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        buffers.push_face(line, Some(MaterialTag::Wall)).unwrap();
        let mesh = assemble_mesh("line", buffers, &MaterialPair::default());
        let [wall, roof] = mesh.to_render_meshes();
        assert!(wall.is_empty());
        assert!(roof.is_empty());
    }
}
