// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry locator
//!
//! Finds the polygon and triangle primitives of a CityGML document and splits
//! them into roof and other surfaces. Surfaces can be nested arbitrarily deep
//! inside semantic containers, and `bldg:RoofSurface` is the only container
//! that is classified explicitly: a primitive is a roof primitive if it lies
//! anywhere below a roof surface, and every other primitive is "other".
//! Membership is decided by [`NodeId`], never by content.

use crate::document::{Document, NodeId};
use crate::schema::{QName, POLYGON, ROOF_SURFACE, TRIANGLE};
use rustc_hash::FxHashSet;

/// Kind of GML geometry primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PrimitiveKind {
    Polygon,
    Triangle,
}

impl PrimitiveKind {
    #[inline]
    pub fn qname(self) -> QName {
        match self {
            PrimitiveKind::Polygon => POLYGON,
            PrimitiveKind::Triangle => TRIANGLE,
        }
    }
}

/// Semantic class of a surface primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SurfaceClass {
    /// Below a `bldg:RoofSurface`
    Roof,
    /// Walls, ground, closures and anything else
    Other,
}

impl SurfaceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceClass::Roof => "RoofSurface",
            SurfaceClass::Other => "WallSurface",
        }
    }
}

/// A polygon or triangle element of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SurfacePrimitive {
    pub id: NodeId,
    pub kind: PrimitiveKind,
    pub class: SurfaceClass,
}

/// Primitives of one document, classified
#[derive(Debug, Clone, Default)]
pub struct LocatedPrimitives {
    /// Every `bldg:RoofSurface` element, in document order
    pub roof_surfaces: Vec<NodeId>,
    /// Polygons below roof surfaces, then triangles below roof surfaces
    pub roof: Vec<SurfacePrimitive>,
    /// Remaining polygons, then remaining triangles, in document order
    pub other: Vec<SurfacePrimitive>,
}

impl LocatedPrimitives {
    /// Total number of primitives found
    #[inline]
    pub fn len(&self) -> usize {
        self.roof.len() + self.other.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roof.is_empty() && self.other.is_empty()
    }
}

/// Locate and classify all surface primitives of a document
///
/// Only elements below the root are considered, both as primitives and as
/// roof containers.
pub fn locate_primitives(doc: &Document) -> LocatedPrimitives {
    let roof_surfaces: Vec<NodeId> = doc.find_all(ROOF_SURFACE).collect();

    let mut roof_ids: FxHashSet<NodeId> = FxHashSet::default();
    let mut roof = Vec::new();
    for kind in [PrimitiveKind::Polygon, PrimitiveKind::Triangle] {
        for &surface in &roof_surfaces {
            for id in doc.find_descendants(surface, kind.qname()) {
                // Nested roof surfaces would otherwise list a primitive twice
                if roof_ids.insert(id) {
                    roof.push(SurfacePrimitive {
                        id,
                        kind,
                        class: SurfaceClass::Roof,
                    });
                }
            }
        }
    }

    let mut other = Vec::new();
    for kind in [PrimitiveKind::Polygon, PrimitiveKind::Triangle] {
        other.extend(
            doc.find_all(kind.qname())
                .filter(|id| !roof_ids.contains(id))
                .map(|id| SurfacePrimitive {
                    id,
                    kind,
                    class: SurfaceClass::Other,
                }),
        );
    }

    LocatedPrimitives {
        roof_surfaces,
        roof,
        other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(prims: &[SurfacePrimitive]) -> Vec<NodeId> {
        prims.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_roof_and_other_split() {
        let xml = r#"
<CityModel xmlns:gml="http://www.opengis.net/gml"
           xmlns:bldg="http://www.opengis.net/citygml/building/1.0">
  <bldg:WallSurface><gml:Polygon/></bldg:WallSurface>
  <bldg:RoofSurface>
    <bldg:lod2MultiSurface><gml:MultiSurface><gml:surfaceMember>
      <gml:Polygon/>
    </gml:surfaceMember></gml:MultiSurface></bldg:lod2MultiSurface>
    <gml:Triangle/>
  </bldg:RoofSurface>
  <gml:Triangle/>
  <gml:Polygon/>
</CityModel>"#;
        let doc = Document::parse(xml).unwrap();
        let located = locate_primitives(&doc);

        assert_eq!(located.roof_surfaces.len(), 1);
        assert_eq!(located.roof.len(), 2);
        assert_eq!(located.roof[0].kind, PrimitiveKind::Polygon);
        assert_eq!(located.roof[1].kind, PrimitiveKind::Triangle);
        assert!(located.roof.iter().all(|p| p.class == SurfaceClass::Roof));

        let kinds: Vec<_> = located.other.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![PrimitiveKind::Polygon, PrimitiveKind::Polygon, PrimitiveKind::Triangle]
        );
        assert!(located.other.iter().all(|p| p.class == SurfaceClass::Other));
        assert_eq!(located.len(), 5);
    }

    #[test]
    fn test_identical_content_is_still_distinct() {
        let polygon = "<gml:Polygon><gml:posList>0 0 0 1 0 0 1 1 0</gml:posList></gml:Polygon>";
        let xml = format!(
            r#"<CityModel xmlns:gml="http://www.opengis.net/gml"
                        xmlns:bldg="http://www.opengis.net/citygml/building/1.0">
                 <bldg:RoofSurface>{p}</bldg:RoofSurface>{p}
               </CityModel>"#,
            p = polygon
        );
        let doc = Document::parse(&xml).unwrap();
        let located = locate_primitives(&doc);

        assert_eq!(located.roof.len(), 1);
        assert_eq!(located.other.len(), 1);
        assert_ne!(located.roof[0].id, located.other[0].id);
    }

    #[test]
    fn test_nested_roof_surfaces_list_once() {
        let xml = r#"<r xmlns:gml="http://www.opengis.net/gml"
                        xmlns:bldg="http://www.opengis.net/citygml/building/1.0">
            <bldg:RoofSurface><bldg:RoofSurface><gml:Polygon/></bldg:RoofSurface></bldg:RoofSurface>
        </r>"#;
        let doc = Document::parse(xml).unwrap();
        let located = locate_primitives(&doc);
        assert_eq!(located.roof_surfaces.len(), 2);
        assert_eq!(located.roof.len(), 1);
        assert!(located.other.is_empty());
    }

    #[test]
    fn test_foreign_namespaces_are_invisible() {
        let xml = r#"<r xmlns:gml="http://www.opengis.net/gml/3.2"
                        xmlns:bldg="http://www.opengis.net/citygml/building/2.0">
            <bldg:RoofSurface><gml:Polygon/></bldg:RoofSurface>
            <Polygon/>
        </r>"#;
        let doc = Document::parse(xml).unwrap();
        let located = locate_primitives(&doc);
        assert!(located.is_empty());
        assert!(located.roof_surfaces.is_empty());
    }

    #[test]
    fn test_document_order_of_others() {
        let xml = r#"<r xmlns:gml="http://www.opengis.net/gml">
            <gml:Polygon/><gml:Triangle/><gml:Polygon/>
        </r>"#;
        let doc = Document::parse(xml).unwrap();
        let located = locate_primitives(&doc);
        let polygons: Vec<_> = doc.find_all(POLYGON).collect();
        let triangles: Vec<_> = doc.find_all(TRIANGLE).collect();
        assert_eq!(
            ids(&located.other),
            vec![polygons[0], polygons[1], triangles[0]]
        );
    }

    #[test]
    fn test_root_roof_surface_is_not_a_container() {
        let xml = r#"<bldg:RoofSurface xmlns:gml="http://www.opengis.net/gml"
                        xmlns:bldg="http://www.opengis.net/citygml/building/1.0">
            <gml:Polygon/>
        </bldg:RoofSurface>"#;
        let doc = Document::parse(xml).unwrap();
        let located = locate_primitives(&doc);
        assert!(located.roof_surfaces.is_empty());
        assert!(located.roof.is_empty());
        assert_eq!(located.other.len(), 1);
    }

    #[test]
    fn test_surface_class_labels() {
        assert!(SurfaceClass::Roof.as_str().contains("RoofSurface"));
        assert!(!SurfaceClass::Other.as_str().contains("RoofSurface"));
    }
}
