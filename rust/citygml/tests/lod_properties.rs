// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder properties that hold for any input geometry.

use approx::assert_relative_eq;
use citylod_citygml::{
    build_solid, extract_geometry, pos_list, write_city_model, BuildWarning, BuildingAttributes,
    CityGmlOptions, EnvelopeMode, FaceIndices, FaceKind, Geometry, LodLevel, MeshData, ModelData,
    Point3D,
};
use citylod_vision::{Contour, Footprint, PixelCoord, SegmentationResult};
use image::GrayImage;
use smallvec::smallvec;

/// Unit cube with quad faces
fn cube() -> MeshData {
    let vertices = vec![
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(1.0, 1.0, 0.0),
        Point3D::new(0.0, 1.0, 0.0),
        Point3D::new(0.0, 0.0, 1.0),
        Point3D::new(1.0, 0.0, 1.0),
        Point3D::new(1.0, 1.0, 1.0),
        Point3D::new(0.0, 1.0, 1.0),
    ];
    let faces: Vec<FaceIndices> = vec![
        smallvec![0, 3, 2, 1],
        smallvec![4, 5, 6, 7],
        smallvec![0, 1, 5, 4],
        smallvec![2, 3, 7, 6],
        smallvec![0, 4, 7, 3],
        smallvec![1, 2, 6],
        smallvec![1, 6, 5],
    ];
    MeshData::new(vertices, faces)
}

fn no_attributes() -> BuildingAttributes {
    BuildingAttributes::default()
}

/// Segmentation bundle holding one rectangular footprint
fn one_footprint() -> SegmentationResult {
    let contour = Contour::new(vec![
        PixelCoord::new(10, 10),
        PixelCoord::new(50, 10),
        PixelCoord::new(50, 30),
        PixelCoord::new(10, 30),
    ])
    .unwrap();
    SegmentationResult {
        footprints: vec![Footprint {
            area: contour.area(),
            bounding_box: contour.bounding_box(),
            centroid: contour.centroid(),
            mask: GrayImage::new(64, 64),
            contour,
        }],
        edges: GrayImage::new(64, 64),
        lines: Vec::new(),
        image_width: 64,
        image_height: 64,
    }
}

#[test]
fn template_face_counts_per_lod() {
    let expected = [(1, 6), (2, 7), (3, 9), (4, 9)];
    for (lod, faces) in expected {
        let solid = build_solid(lod, &Geometry::None, &no_attributes()).unwrap();
        assert_eq!(solid.solid.faces.len(), faces, "LOD{}", lod);
        assert_eq!(solid.room.is_some(), lod == 4, "LOD{}", lod);
    }

    let lod4 = build_solid(4, &Geometry::None, &no_attributes()).unwrap();
    assert_eq!(lod4.room.unwrap().solid.faces.len(), 6);
}

#[test]
fn contour_geometry_uses_templates_below_lod3() {
    let model = ModelData::from_segmentation(one_footprint());
    let geometry = extract_geometry(&model);
    assert_eq!(geometry.form_name(), "contours");

    let lod1 = build_solid(1, &geometry, &no_attributes()).unwrap();
    let template_lod1 = build_solid(1, &Geometry::None, &no_attributes()).unwrap();
    assert_eq!(lod1.solid.faces.len(), 6);
    assert_eq!(lod1.rings(), template_lod1.rings());

    let lod2 = build_solid(2, &geometry, &no_attributes()).unwrap();
    assert_eq!(lod2.solid.faces.len(), 7);
    assert!(lod2
        .solid
        .faces
        .iter()
        .all(|face| face.kind == FaceKind::Surface));
}

#[test]
fn mesh_faces_map_one_to_one() {
    let mesh = cube();
    let model = ModelData::from_mesh(mesh.clone());
    let geometry = extract_geometry(&model);

    for lod in [1, 2] {
        let solid = build_solid(lod, &geometry, &no_attributes()).unwrap();
        assert_eq!(solid.solid.faces.len(), mesh.faces.len());
        for (face, indices) in solid.solid.faces.iter().zip(&mesh.faces) {
            assert_eq!(face.kind, FaceKind::Surface);
            assert_eq!(face.ring.len(), indices.len());
            for (point, &index) in face.ring.iter().zip(indices.iter()) {
                assert_eq!(*point, mesh.vertices[index]);
            }
        }
    }
}

#[test]
fn unsupported_lod_matches_lod2() {
    for geometry_model in [ModelData::default(), ModelData::from_mesh(cube())] {
        let geometry = extract_geometry(&geometry_model);
        let lod2 = build_solid(2, &geometry, &no_attributes()).unwrap();
        assert!(lod2.warnings.is_empty());

        for requested in [99, 0, -1, 300] {
            let fallback = build_solid(requested, &geometry, &no_attributes()).unwrap();
            assert_eq!(fallback.lod, LodLevel::Lod2);
            assert_eq!(fallback.rings(), lod2.rings());
            assert_eq!(
                fallback.warnings,
                vec![BuildWarning::UnsupportedLod { requested }]
            );
        }
    }
}

#[test]
fn repeated_builds_differ_only_in_ids() {
    for lod in 1..=4 {
        let a = build_solid(lod, &Geometry::None, &no_attributes()).unwrap();
        let b = build_solid(lod, &Geometry::None, &no_attributes()).unwrap();

        assert_eq!(a.rings(), b.rings());
        assert_ne!(a.id, b.id);
        assert_ne!(a.solid.id, b.solid.id);
        assert_ne!(a.solid.faces[0].id, b.solid.faces[0].id);
    }
}

#[test]
fn pos_lists_round_trip() {
    let model = ModelData::from_mesh(MeshData::new(
        vec![
            Point3D::new(0.1, 0.2, 0.3),
            Point3D::new(1.0 / 3.0, -2.5e-4, 1234.5678),
            Point3D::new(f64::EPSILON, 7.0, -0.0),
        ],
        vec![smallvec![0, 1, 2]],
    ));
    let building = build_solid(4, &extract_geometry(&model), &no_attributes()).unwrap();
    let doc = write_city_model(&building, &CityGmlOptions::default()).unwrap();

    let parsed: Vec<Vec<f64>> = doc
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            line.strip_prefix("<gml:posList>")
                .and_then(|rest| rest.strip_suffix("</gml:posList>"))
        })
        .map(|list| list.split(' ').map(|v| v.parse().unwrap()).collect())
        .collect();

    let faces: Vec<_> = building
        .solid
        .faces
        .iter()
        .chain(building.room.iter().flat_map(|r| r.solid.faces.iter()))
        .collect();
    assert_eq!(parsed.len(), faces.len());

    for (values, face) in parsed.iter().zip(faces) {
        assert_eq!(values.len(), face.ring.len() * 3);
        for (triple, point) in values.chunks(3).zip(&face.ring) {
            assert_eq!(triple, [point.x, point.y, point.z]);
        }
    }
}

#[test]
fn computed_envelope_bounds_every_point() {
    let building = build_solid(4, &Geometry::None, &no_attributes()).unwrap();
    let (mut lo, mut hi) = ([f64::MAX; 3], [f64::MIN; 3]);
    for p in building.points() {
        for (axis, v) in [p.x, p.y, p.z].into_iter().enumerate() {
            lo[axis] = lo[axis].min(v);
            hi[axis] = hi[axis].max(v);
        }
    }
    assert_relative_eq!(hi[2], 8.0);

    let options = CityGmlOptions {
        envelope: EnvelopeMode::Computed,
        ..Default::default()
    };
    let doc = write_city_model(&building, &options).unwrap();
    assert!(doc.contains(&format!(
        "<gml:lowerCorner>{}</gml:lowerCorner>",
        pos_list(&[Point3D::from(lo)])
    )));
    assert!(doc.contains(&format!(
        "<gml:upperCorner>{}</gml:upperCorner>",
        pos_list(&[Point3D::from(hi)])
    )));
}
