// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for LOD solid construction

use crate::attributes::BuildingAttributes;
use crate::ids::new_id;
use citylod_vision::SegmentationResult;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A 3D point (simplified for serialization)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_nalgebra(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Point3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Vertex indices of one mesh face
pub type FaceIndices = SmallVec<[usize; 4]>;

/// Explicit vertex/face mesh
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Point3D>,
    pub faces: Vec<FaceIndices>,
}

impl MeshData {
    pub fn new(vertices: Vec<Point3D>, faces: Vec<FaceIndices>) -> Self {
        Self { vertices, faces }
    }
}

/// Opening classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Window,
    Door,
}

/// Window or door drawn as a coplanar overlay polygon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Opening {
    #[serde(rename = "type")]
    pub kind: OpeningKind,
    pub coords: Vec<Point3D>,
}

/// Extra per-building data travelling with contour-form geometry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildingData {
    pub openings: Vec<Opening>,
}

/// Whatever an upstream stage produced for one building
///
/// Several fields may be populated at once; [`crate::extract_geometry`]
/// decides which one is used.
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    /// Mesh attached as a named sub-record (highest precedence)
    pub mesh: Option<MeshData>,
    /// Top-level vertex list
    pub vertices: Option<Vec<Point3D>>,
    /// Top-level face list, paired with `vertices`
    pub faces: Option<Vec<FaceIndices>>,
    /// Footprint segmentation bundle
    pub segmentation: Option<SegmentationResult>,
    /// Openings and other extras for the segmentation bundle
    pub building_data: Option<BuildingData>,
}

impl ModelData {
    pub fn from_mesh(mesh: MeshData) -> Self {
        Self {
            mesh: Some(mesh),
            ..Default::default()
        }
    }

    pub fn from_vertices_and_faces(vertices: Vec<Point3D>, faces: Vec<FaceIndices>) -> Self {
        Self {
            vertices: Some(vertices),
            faces: Some(faces),
            ..Default::default()
        }
    }

    pub fn from_segmentation(segmentation: SegmentationResult) -> Self {
        Self {
            segmentation: Some(segmentation),
            ..Default::default()
        }
    }

    pub fn with_building_data(mut self, building_data: BuildingData) -> Self {
        self.building_data = Some(building_data);
        self
    }
}

/// The single geometry form selected from a [`ModelData`]
#[derive(Debug, Clone, Copy)]
pub enum Geometry<'a> {
    /// Faces given as index tuples into a vertex list
    Mesh {
        vertices: &'a [Point3D],
        faces: &'a [FaceIndices],
    },
    /// Footprint contours without face records
    Contours {
        segmentation: &'a SegmentationResult,
        building_data: Option<&'a BuildingData>,
    },
    /// Nothing usable upstream
    None,
}

impl Geometry<'_> {
    pub fn is_none(&self) -> bool {
        matches!(self, Geometry::None)
    }

    pub fn form_name(&self) -> &'static str {
        match self {
            Geometry::Mesh { .. } => "mesh",
            Geometry::Contours { .. } => "contours",
            Geometry::None => "none",
        }
    }
}

/// Level of detail tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LodLevel {
    /// Block form
    Lod1,
    /// Roofed form
    Lod2,
    /// Roofed form with doors and windows
    Lod3,
    /// LOD3 exterior with an interior room
    Lod4,
}

impl LodLevel {
    /// Level used when a request cannot be honoured
    pub const FALLBACK: LodLevel = LodLevel::Lod2;

    pub fn from_number(lod: i64) -> Option<Self> {
        match lod {
            1 => Some(LodLevel::Lod1),
            2 => Some(LodLevel::Lod2),
            3 => Some(LodLevel::Lod3),
            4 => Some(LodLevel::Lod4),
            _ => None,
        }
    }

    /// Map a requested number to a level, degrading unsupported values
    pub fn resolve(lod: i64) -> (Self, Option<BuildWarning>) {
        match Self::from_number(lod) {
            Some(level) => (level, None),
            None => (
                Self::FALLBACK,
                Some(BuildWarning::UnsupportedLod { requested: lod }),
            ),
        }
    }

    pub fn number(self) -> u8 {
        match self {
            LodLevel::Lod1 => 1,
            LodLevel::Lod2 => 2,
            LodLevel::Lod3 => 3,
            LodLevel::Lod4 => 4,
        }
    }

    /// Building property element holding the solid (e.g. `lod2Solid`)
    pub fn solid_element(self) -> String {
        format!("lod{}Solid", self.number())
    }
}

/// Non-fatal issue raised while building a solid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum BuildWarning {
    /// The requested LOD is outside 1-4; LOD2 was built instead
    UnsupportedLod { requested: i64 },
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildWarning::UnsupportedLod { requested } => {
                write!(f, "Invalid LOD: {}, using LOD2 instead", requested)
            }
        }
    }
}

/// Role of a face within a solid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FaceKind {
    /// Wall, roof or ground surface
    Surface,
    Window,
    Door,
    /// Boundary of an interior room
    Interior,
}

impl FaceKind {
    fn id_prefix(self) -> &'static str {
        match self {
            FaceKind::Surface => "Building_Polygon",
            FaceKind::Window => "Window_Polygon",
            FaceKind::Door => "Door_Polygon",
            FaceKind::Interior => "Room_Polygon",
        }
    }
}

impl From<OpeningKind> for FaceKind {
    fn from(kind: OpeningKind) -> Self {
        match kind {
            OpeningKind::Window => FaceKind::Window,
            OpeningKind::Door => FaceKind::Door,
        }
    }
}

/// Planar polygon: an ordered ring of at least 3 points, never re-wound
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Face {
    pub id: String,
    pub kind: FaceKind,
    pub ring: Vec<Point3D>,
}

impl Face {
    /// Create a face with a fresh identifier
    pub fn new(kind: FaceKind, ring: Vec<Point3D>) -> Self {
        Self {
            id: new_id(kind.id_prefix()),
            kind,
            ring,
        }
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

/// Closed surface made of faces (a `gml:Solid`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Solid {
    pub id: String,
    pub faces: Vec<Face>,
}

impl Solid {
    pub fn new(id_prefix: &str, faces: Vec<Face>) -> Self {
        Self {
            id: new_id(id_prefix),
            faces,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &Point3D> {
        self.faces.iter().flat_map(|f| f.ring.iter())
    }
}

/// Interior room nested in a LOD4 building
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: String,
    pub solid: Solid,
}

/// Builder output: one building at one level of detail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildingSolid {
    pub id: String,
    pub lod: LodLevel,
    pub attributes: BuildingAttributes,
    /// Exterior shell (walls, roof and any openings)
    pub solid: Solid,
    /// Interior room, LOD4 only
    pub room: Option<Room>,
    pub warnings: Vec<BuildWarning>,
}

impl BuildingSolid {
    /// Every point of the exterior and the room
    pub fn points(&self) -> impl Iterator<Item = &Point3D> {
        self.solid
            .points()
            .chain(self.room.iter().flat_map(|r| r.solid.points()))
    }

    /// Face rings without identifiers, for structural comparison
    pub fn rings(&self) -> Vec<(FaceKind, Vec<Point3D>)> {
        self.solid
            .faces
            .iter()
            .chain(self.room.iter().flat_map(|r| r.solid.faces.iter()))
            .map(|f| (f.kind, f.ring.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lod_resolve() {
        assert_eq!(LodLevel::resolve(3), (LodLevel::Lod3, None));

        for requested in [0, -1, 5, 300, i64::MAX] {
            let (level, warning) = LodLevel::resolve(requested);
            assert_eq!(level, LodLevel::Lod2);
            assert_eq!(warning, Some(BuildWarning::UnsupportedLod { requested }));
        }
    }

    #[test]
    fn test_solid_element_name() {
        assert_eq!(LodLevel::Lod1.solid_element(), "lod1Solid");
        assert_eq!(LodLevel::Lod4.solid_element(), "lod4Solid");
    }

    #[test]
    fn test_face_ids_unique() {
        let ring = vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(1.0, 1.0, 0.0),
        ];
        let a = Face::new(FaceKind::Window, ring.clone());
        let b = Face::new(FaceKind::Window, ring);

        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("Window_Polygon_"));
    }

    #[test]
    fn test_opening_json_shape() {
        let opening: Opening =
            serde_json::from_str(r#"{"type":"door","coords":[{"x":0,"y":0,"z":0}]}"#).unwrap();
        assert_eq!(opening.kind, OpeningKind::Door);
        assert_eq!(opening.coords.len(), 1);
    }
}
