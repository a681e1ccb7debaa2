// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry selection from upstream model data

use crate::types::{Geometry, ModelData};

/// Select the geometry form to build from
///
/// Precedence: `mesh` with at least one face, then the top-level
/// `vertices`/`faces` pair with at least one face, then a segmentation
/// bundle with at least one footprint. Anything else yields
/// [`Geometry::None`], which makes the builder fall back to its templates.
pub fn extract_geometry(model: &ModelData) -> Geometry<'_> {
    if let Some(mesh) = &model.mesh {
        if !mesh.faces.is_empty() {
            return Geometry::Mesh {
                vertices: &mesh.vertices,
                faces: &mesh.faces,
            };
        }
    }

    if let (Some(vertices), Some(faces)) = (&model.vertices, &model.faces) {
        if !faces.is_empty() {
            return Geometry::Mesh { vertices, faces };
        }
    }

    if let Some(segmentation) = &model.segmentation {
        if segmentation.count() > 0 {
            return Geometry::Contours {
                segmentation,
                building_data: model.building_data.as_ref(),
            };
        }
    }

    Geometry::None
}
