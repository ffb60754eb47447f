// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CityGML namespaces and the element names the importer cares about
//!
//! Only CityGML 1.0 building features are recognized. Elements bound to any
//! other namespace never match one of these names.

/// GML 3.1 namespace (geometry primitives)
pub const GML_NS: &str = "http://www.opengis.net/gml";

/// CityGML 1.0 building module namespace (semantic surfaces)
pub const BUILDING_NS: &str = "http://www.opengis.net/citygml/building/1.0";

/// Namespace-qualified element name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QName {
    pub namespace: &'static str,
    pub local: &'static str,
}

impl QName {
    #[inline]
    pub const fn new(namespace: &'static str, local: &'static str) -> Self {
        Self { namespace, local }
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local)
    }
}

/// `bldg:RoofSurface` - the only semantic surface classified explicitly
pub const ROOF_SURFACE: QName = QName::new(BUILDING_NS, "RoofSurface");

/// `gml:Polygon`
pub const POLYGON: QName = QName::new(GML_NS, "Polygon");

/// `gml:Triangle`
pub const TRIANGLE: QName = QName::new(GML_NS, "Triangle");

/// `gml:posList` - packed whitespace-separated coordinate list
pub const POS_LIST: QName = QName::new(GML_NS, "posList");

/// `gml:pos` - a single coordinate tuple
pub const POS: QName = QName::new(GML_NS, "pos");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clark_notation() {
        assert_eq!(
            ROOF_SURFACE.to_string(),
            "{http://www.opengis.net/citygml/building/1.0}RoofSurface"
        );
        assert_eq!(POLYGON.to_string(), "{http://www.opengis.net/gml}Polygon");
    }
}
