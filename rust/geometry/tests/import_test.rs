// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end import tests over small CityGML documents.

use citygml_lite_geometry::{
    import_batch, import_citygml, import_citygml_str, CoordinateShift, ImportSettings,
    MaterialPair, MaterialTag,
};
use std::fs;
use std::path::PathBuf;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<core:CityModel xmlns:core="http://www.opengis.net/citygml/1.0"
                xmlns:gml="http://www.opengis.net/gml"
                xmlns:bldg="http://www.opengis.net/citygml/building/1.0">"#;
const FOOTER: &str = "</core:CityModel>";

fn city(body: &str) -> String {
    format!("{}{}{}", HEADER, body, FOOTER)
}

fn polygon(pos_list: &str) -> String {
    format!(
        "<gml:Polygon><gml:exterior><gml:LinearRing><gml:posList>{}</gml:posList></gml:LinearRing></gml:exterior></gml:Polygon>",
        pos_list
    )
}

/// House with two walls, a ground plate and two roof planes (one a TIN)
fn house() -> String {
    city(&format!(
        r#"<core:cityObjectMember><bldg:Building>
  <bldg:boundedBy><bldg:WallSurface>{wall1}</bldg:WallSurface></bldg:boundedBy>
  <bldg:boundedBy><bldg:RoofSurface>{roof1}</bldg:RoofSurface></bldg:boundedBy>
  <bldg:boundedBy><bldg:GroundSurface>{ground}</bldg:GroundSurface></bldg:boundedBy>
  <bldg:boundedBy><bldg:RoofSurface>
    <gml:TriangulatedSurface><gml:trianglePatches>
      <gml:Triangle><gml:exterior><gml:LinearRing><gml:posList>0 10 6 10 10 6 5 5 9 0 10 6</gml:posList></gml:LinearRing></gml:exterior></gml:Triangle>
    </gml:trianglePatches></gml:TriangulatedSurface>
  </bldg:RoofSurface></bldg:boundedBy>
  <bldg:boundedBy><bldg:WallSurface>{wall2}</bldg:WallSurface></bldg:boundedBy>
</bldg:Building></core:cityObjectMember>"#,
        wall1 = polygon("0 0 0 10 0 0 10 0 6 0 0 6 0 0 0"),
        roof1 = polygon("0 0 6 10 0 6 5 5 9 0 0 6"),
        ground = polygon("0 0 0 0 10 0 10 10 0 10 0 0 0 0 0"),
        wall2 = polygon("10 0 0 10 10 0 10 10 6 10 0 6 10 0 0"),
    ))
}

fn unit() -> ImportSettings {
    ImportSettings {
        scale: 1.0,
        ..ImportSettings::default()
    }
}

#[test]
fn test_material_tags_parallel_faces() {
    let result = import_citygml_str(&house(), &unit()).unwrap();
    let tags = result.face_materials.as_ref().unwrap();

    assert_eq!(tags.len(), result.faces.len());
    assert_eq!(result.faces.len(), 5);
    assert_eq!(
        tags,
        &vec![
            MaterialTag::Roof,
            MaterialTag::Roof,
            MaterialTag::Wall,
            MaterialTag::Wall,
            MaterialTag::Wall,
        ]
    );
}

#[test]
fn test_indices_in_range_and_roof_first() {
    let result = import_citygml_str(&house(), &unit()).unwrap();
    let tags = result.face_materials.clone().unwrap();

    for face in &result.faces {
        assert!(face.iter().all(|&i| (i as usize) < result.vertices.len()));
    }

    let last_roof = tags.iter().rposition(|t| *t == MaterialTag::Roof).unwrap();
    let first_other = tags.iter().position(|t| *t == MaterialTag::Wall).unwrap();
    let max_roof_index = result.faces[..=last_roof].iter().flatten().max().unwrap();
    let min_other_index = result.faces[first_other..].iter().flatten().min().unwrap();
    assert!(max_roof_index < min_other_index);
}

#[test]
fn test_ring_closure_is_kept() {
    let result = import_citygml_str(&house(), &unit()).unwrap();
    // roof1 has 4 positions including the repeated first one
    assert_eq!(result.faces[0].len(), 4);
    assert_eq!(result.vertices[0], result.vertices[3]);
    assert_eq!(result.vertices.len(), 4 + 4 + 5 + 5 + 5);
}

#[test]
fn test_pos_and_pos_list_are_equivalent() {
    let packed = city(
        "<bldg:WallSurface><gml:Polygon><gml:exterior><gml:LinearRing>
           <gml:posList srsDimension=\"3\">1.5 2 3
               4 5\t6   7 8 9</gml:posList>
         </gml:LinearRing></gml:exterior></gml:Polygon></bldg:WallSurface>",
    );
    let discrete = city(
        "<bldg:WallSurface><gml:Polygon><gml:exterior><gml:LinearRing>
           <gml:pos>1.5 2 3</gml:pos>
           <gml:pos>
             4 5 6
           </gml:pos>
           <gml:pos>7\t8 9</gml:pos>
         </gml:LinearRing></gml:exterior></gml:Polygon></bldg:WallSurface>",
    );

    let settings = ImportSettings {
        scale: 0.5,
        origin: CoordinateShift::new(1.0, 1.0, 1.0),
        ..ImportSettings::default()
    };
    let a = import_citygml_str(&packed, &settings).unwrap();
    let b = import_citygml_str(&discrete, &settings).unwrap();
    assert_eq!(a.vertices, b.vertices);
    assert_eq!(a.faces, b.faces);
    assert_eq!(a.vertices[0].x, 0.25);
}

#[test]
fn test_classification_by_container_membership() {
    // The same coordinates inside and outside a roof container
    let p = polygon("0 0 0 1 0 0 1 1 0");
    let doc = city(&format!(
        "{p}<bldg:RoofSurface><gml:MultiSurface><gml:surfaceMember>{p}</gml:surfaceMember></gml:MultiSurface></bldg:RoofSurface>",
        p = p
    ));

    let result = import_citygml_str(&doc, &unit()).unwrap();
    assert_eq!(
        result.face_materials,
        Some(vec![MaterialTag::Roof, MaterialTag::Wall])
    );
}

#[test]
fn test_no_materials_when_not_separated() {
    let settings = ImportSettings {
        separate_materials: false,
        ..unit()
    };
    let result = import_citygml_str(&house(), &settings).unwrap();
    assert!(result.face_materials.is_none());

    let mesh = result.into_mesh("house.gml", &MaterialPair::default());
    assert!(mesh.face_material_slots.iter().all(Option::is_none));
}

#[test]
fn test_max_coordinate_is_raw() {
    let settings = ImportSettings {
        scale: 0.001,
        origin: CoordinateShift::new(5.0, 5.0, 5.0),
        ..ImportSettings::default()
    };
    let result = import_citygml_str(&house(), &settings).unwrap();
    assert_eq!(result.max_coordinate, 10.0);
}

#[test]
fn test_render_meshes_cover_all_faces() {
    let mesh = import_citygml_str(&house(), &unit())
        .unwrap()
        .into_mesh("house.gml", &MaterialPair::default());
    let [wall, roof] = mesh.to_render_meshes();

    // Two triangles per quad (wall, wall, ground), one per triangle (two roofs)
    assert_eq!(wall.triangle_count(), 6);
    assert_eq!(roof.triangle_count(), 2);
    assert!(wall.indices.iter().all(|&i| (i as usize) < wall.vertex_count()));
}

fn temp_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("citygml-lite-{}-{}", test, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_import_from_file() {
    let dir = temp_dir("file");
    let path = dir.join("house.gml");
    fs::write(&path, house()).unwrap();

    let result = import_citygml(&path, &unit()).unwrap();
    assert_eq!(result.faces.len(), 5);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_latin1_file_with_roof() {
    let dir = temp_dir("latin1");
    let path = dir.join("strasse.gml");

    let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?>
<core:CityModel xmlns:core="http://www.opengis.net/citygml/1.0"
                xmlns:gml="http://www.opengis.net/gml"
                xmlns:bldg="http://www.opengis.net/citygml/building/1.0">
<bldg:Building><gml:name>Stra"#
        .to_vec();
    bytes.push(0xDF);
    bytes.extend_from_slice(
        format!(
            "e</gml:name><bldg:boundedBy><bldg:RoofSurface>{}</bldg:RoofSurface></bldg:boundedBy></bldg:Building>{}",
            polygon("0 0 6 10 0 6 5 5 9 0 0 6"),
            FOOTER
        )
        .as_bytes(),
    );
    fs::write(&path, &bytes).unwrap();

    let result = import_citygml(&path, &unit()).unwrap();
    assert_eq!(result.faces.len(), 1);
    assert_eq!(result.face_materials, Some(vec![MaterialTag::Roof]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_batch_continues_after_failure() {
    let dir = temp_dir("batch");
    let good = dir.join("good.gml");
    let bad = dir.join("bad.gml");
    let missing = dir.join("missing.gml");
    fs::write(&good, house()).unwrap();
    fs::write(&bad, city(&polygon("0 0 0 1 x 0 1 1 0"))).unwrap();

    let paths = vec![bad.clone(), missing.clone(), good.clone()];
    let reports = import_batch(&paths, &unit(), &MaterialPair::default());

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].name, "bad.gml");
    assert!(reports[0].message().starts_with("Error importing bad.gml: Malformed geometry"));
    assert_eq!(reports[1].name, "missing.gml");
    assert!(reports[1].message().starts_with("Error importing missing.gml: Failed to read"));

    assert!(reports[2].is_ok());
    assert_eq!(reports[2].message(), "good.gml imported");
    let object = reports[2].outcome.as_ref().unwrap();
    assert_eq!(object.mesh.name, "good.gml");
    assert_eq!(object.mesh.face_count(), 5);

    let _ = fs::remove_dir_all(&dir);
}
