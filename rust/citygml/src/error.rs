// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for solid building and document writing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building solids or writing CityGML
#[derive(Error, Debug)]
pub enum Error {
    #[error("Face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    VertexIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("Face {face} has {count} vertices (a polygon needs at least 3)")]
    DegenerateFace { face: usize, count: usize },

    #[error("Opening {index} has {count} points (a polygon needs at least 3)")]
    DegenerateOpening { index: usize, count: usize },

    #[error("Invalid XML element name: {0:?}")]
    InvalidElementName(String),

    #[error("Invalid attributes document: {0}")]
    Attributes(#[from] serde_json::Error),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}
