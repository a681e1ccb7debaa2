// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LOD solid builder
//!
//! Turns a selected [`Geometry`] into a [`BuildingSolid`] at the requested
//! level of detail:
//!
//! | Level | Mesh geometry        | Contours                  | None                        |
//! |-------|----------------------|---------------------------|-----------------------------|
//! | LOD1  | one face per record  | box                       | box                         |
//! | LOD2  | one face per record  | gable                     | gable                       |
//! | LOD3  | one face per record  | gable + bundle openings   | gable + placeholder openings|
//! | LOD4  | LOD3 + room          | LOD3 + room               | LOD3 + room                 |

use crate::attributes::BuildingAttributes;
use crate::error::{Error, Result};
use crate::ids::new_id;
use crate::templates;
use crate::types::{
    BuildingData, BuildingSolid, Face, FaceIndices, FaceKind, Geometry, LodLevel, Point3D, Room,
    Solid,
};

/// Build one building solid
///
/// An unsupported `lod` builds LOD2 instead and records a
/// [`crate::BuildWarning::UnsupportedLod`] on the result.
pub fn build_solid(
    lod: i64,
    geometry: &Geometry<'_>,
    attributes: &BuildingAttributes,
) -> Result<BuildingSolid> {
    let (level, warning) = LodLevel::resolve(lod);
    if let Some(warning) = &warning {
        tracing::warn!(requested = lod, fallback = level.number(), "{}", warning);
    }

    let mut faces = match geometry {
        Geometry::Mesh { vertices, faces } => mesh_faces(vertices, faces)?,
        _ => template_faces(match level {
            LodLevel::Lod1 => &templates::BOX[..],
            _ => &templates::GABLE[..],
        }),
    };

    if level >= LodLevel::Lod3 {
        match geometry {
            Geometry::Contours { building_data, .. } => {
                if let Some(data) = building_data {
                    faces.extend(opening_faces(data)?);
                }
            }
            Geometry::None => {
                faces.push(Face::new(FaceKind::Window, templates::WINDOW.to_vec()));
                faces.push(Face::new(FaceKind::Door, templates::DOOR.to_vec()));
            }
            Geometry::Mesh { .. } => {}
        }
    }

    let room = (level == LodLevel::Lod4).then(build_room);

    tracing::debug!(
        lod = level.number(),
        geometry = geometry.form_name(),
        faces = faces.len(),
        room = room.is_some(),
        "Built building solid"
    );

    Ok(BuildingSolid {
        id: new_id("Building"),
        lod: level,
        attributes: attributes.clone(),
        solid: Solid::new("Solid", faces),
        room,
        warnings: warning.into_iter().collect(),
    })
}

fn mesh_faces(vertices: &[Point3D], faces: &[FaceIndices]) -> Result<Vec<Face>> {
    faces
        .iter()
        .enumerate()
        .map(|(face, indices)| {
            if indices.len() < 3 {
                return Err(Error::DegenerateFace {
                    face,
                    count: indices.len(),
                });
            }
            let ring = indices
                .iter()
                .map(|&index| {
                    vertices
                        .get(index)
                        .copied()
                        .ok_or(Error::VertexIndexOutOfRange {
                            face,
                            index,
                            vertex_count: vertices.len(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Face::new(FaceKind::Surface, ring))
        })
        .collect()
}

fn opening_faces(data: &BuildingData) -> Result<Vec<Face>> {
    data.openings
        .iter()
        .enumerate()
        .map(|(index, opening)| {
            if opening.coords.len() < 3 {
                return Err(Error::DegenerateOpening {
                    index,
                    count: opening.coords.len(),
                });
            }
            Ok(Face::new(opening.kind.into(), opening.coords.clone()))
        })
        .collect()
}

fn template_faces(rings: &[&[Point3D]]) -> Vec<Face> {
    template_faces_of_kind(rings, FaceKind::Surface)
}

fn template_faces_of_kind(rings: &[&[Point3D]], kind: FaceKind) -> Vec<Face> {
    rings
        .iter()
        .map(|ring| Face::new(kind, ring.to_vec()))
        .collect()
}

fn build_room() -> Room {
    Room {
        id: new_id("Room"),
        solid: Solid::new(
            "Room_Solid",
            template_faces_of_kind(&templates::ROOM, FaceKind::Interior),
        ),
    }
}
