// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Multi-LOD building solids and CityGML 2.0 output
//!
//! Takes whatever an upstream stage produced for one building (an explicit
//! mesh, a vertex/face pair or a footprint segmentation) and builds a closed
//! solid at LOD1-LOD4:
//! 1. [`extract_geometry`] picks one geometry form by fixed precedence
//! 2. [`build_solid`] maps it onto faces, falling back to templates
//! 3. [`write_city_model`] serializes the result as a CityGML document
//!
//! # Usage
//!
//! ```rust,ignore
//! use citylod_citygml::{build_solid, extract_geometry, write_city_model};
//! use citylod_citygml::{BuildingAttributes, CityGmlOptions, ModelData};
//!
//! let model = ModelData::from_segmentation(citylod_vision::segment(&raster)?);
//! let building = build_solid(2, &extract_geometry(&model), &BuildingAttributes::default())?;
//! let gml = write_city_model(&building, &CityGmlOptions::default())?;
//! ```

pub mod attributes;
pub mod error;
pub mod extract;
pub mod ids;
pub mod lod;
pub mod templates;
pub mod types;
pub mod writer;

pub use attributes::{Address, BuildingAttributes};
pub use error::{Error, Result};
pub use extract::extract_geometry;
pub use lod::build_solid;
pub use types::{
    BuildWarning, BuildingData, BuildingSolid, Face, FaceIndices, FaceKind, Geometry, LodLevel,
    MeshData, ModelData, Opening, OpeningKind, Point3D, Room, Solid,
};
pub use writer::{pos_list, write_city_model, CityGmlOptions, EnvelopeMode};
