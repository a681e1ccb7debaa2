// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image to CityGML, end to end on a synthetic tile.

use citylod_citygml::{
    build_solid, extract_geometry, write_city_model, BuildingAttributes, BuildingData,
    CityGmlOptions, FaceKind, Geometry, ModelData, Opening, OpeningKind, Point3D,
};
use citylod_vision::{segment, RasterImage};
use image::{GrayImage, Luma};

/// White tile with one dark 64 x 64 roof
fn tile() -> RasterImage {
    let mut img = GrayImage::from_pixel(200, 200, Luma([255]));
    for y in 68..132 {
        for x in 68..132 {
            img.put_pixel(x, y, Luma([0]));
        }
    }
    RasterImage::from_gray(img)
}

fn openings() -> BuildingData {
    BuildingData {
        openings: vec![
            Opening {
                kind: OpeningKind::Door,
                coords: vec![
                    Point3D::new(1.0, 0.01, 0.0),
                    Point3D::new(2.0, 0.01, 0.0),
                    Point3D::new(2.0, 0.01, 2.5),
                    Point3D::new(1.0, 0.01, 2.5),
                ],
            },
            Opening {
                kind: OpeningKind::Window,
                coords: vec![
                    Point3D::new(5.0, 0.01, 1.0),
                    Point3D::new(6.0, 0.01, 1.0),
                    Point3D::new(5.5, 0.01, 2.0),
                ],
            },
        ],
    }
}

#[test]
fn segmentation_selects_contour_geometry() {
    let model = ModelData::from_segmentation(segment(&tile()).unwrap());
    let geometry = extract_geometry(&model);

    match geometry {
        Geometry::Contours {
            segmentation,
            building_data,
        } => {
            assert_eq!(segmentation.count(), 1);
            assert!(building_data.is_none());
        }
        other => panic!("expected contours, got {}", other.form_name()),
    }
}

#[test]
fn contour_lod3_uses_bundle_openings() {
    let model =
        ModelData::from_segmentation(segment(&tile()).unwrap()).with_building_data(openings());
    let building =
        build_solid(3, &extract_geometry(&model), &BuildingAttributes::default()).unwrap();

    let kinds: Vec<FaceKind> = building.solid.faces.iter().map(|f| f.kind).collect();
    assert_eq!(kinds.len(), 9);
    assert!(kinds[..7].iter().all(|k| *k == FaceKind::Surface));
    assert_eq!(kinds[7], FaceKind::Door);
    assert_eq!(kinds[8], FaceKind::Window);
    assert_eq!(building.solid.faces[8].ring.len(), 3);
}

#[test]
fn contour_lod3_without_openings_has_only_walls() {
    let model = ModelData::from_segmentation(segment(&tile()).unwrap());
    let building =
        build_solid(3, &extract_geometry(&model), &BuildingAttributes::default()).unwrap();
    assert_eq!(building.solid.faces.len(), 7);
}

#[test]
fn blank_tile_falls_back_to_templates() {
    let blank = RasterImage::from_gray(GrayImage::from_pixel(100, 100, Luma([128])));
    let model = ModelData::from_segmentation(segment(&blank).unwrap());
    let geometry = extract_geometry(&model);
    assert!(geometry.is_none());

    let building = build_solid(3, &geometry, &BuildingAttributes::default()).unwrap();
    assert_eq!(building.solid.faces.len(), 9);
}

#[test]
fn full_document() {
    let attributes = BuildingAttributes::from_json(
        r#"{"function": "residential", "storeysAboveGround": 2, "measuredHeight": 8.0}"#,
    )
    .unwrap();
    let model = ModelData::from_segmentation(segment(&tile()).unwrap());
    let building = build_solid(4, &extract_geometry(&model), &attributes).unwrap();
    let doc = write_city_model(&building, &CityGmlOptions::default()).unwrap();

    assert!(doc.contains("<bldg:function>residential</bldg:function>"));
    assert!(doc.contains("<bldg:storeysAboveGround>2</bldg:storeysAboveGround>"));
    assert!(doc.contains(r#"<bldg:measuredHeight uom="m">8</bldg:measuredHeight>"#));
    assert_eq!(doc.matches("<gml:Polygon ").count(), 7 + 6);
    assert_eq!(doc.matches("<gml:Solid ").count(), 2);
    assert_eq!(doc.matches('<').count(), doc.matches('>').count());
}
