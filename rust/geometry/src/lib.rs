//! CityGML-Lite Geometry Processing
//!
//! Turns CityGML building surfaces into a polygon mesh with wall and roof
//! material slots, using nalgebra for points and earcutr for render
//! triangulation.

pub mod assembler;
pub mod error;
pub mod importer;
pub mod material;
pub mod mesh;
pub mod processors;
pub mod transform;
pub mod triangulation;
pub mod viewport;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use assembler::{assemble_mesh, PolygonMesh};
pub use error::{Error, Result};
pub use importer::{
    import_batch, import_citygml, import_citygml_bytes, import_citygml_str, import_document,
    import_each, object_name, FileReport, ImportResult, ImportSettings, ImportedObject,
};
pub use material::{
    hex_to_rgba, Material, MaterialPair, MaterialTag, ROOF_MATERIAL_COLOR, WALL_MATERIAL_COLOR,
};
pub use mesh::{CoordinateShift, Mesh};
pub use processors::{FaceIndices, FaceProcessor, MeshBuffers};
pub use transform::convert_to_points;
pub use triangulation::{triangulate_face, triangulate_polygon};
pub use viewport::ClipRange;
