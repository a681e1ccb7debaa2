// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for segmentation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or segmenting an image
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported channel count: {0} (expected 1 or 3)")]
    UnsupportedChannels(u8),

    #[error("Pixel buffer has {actual} bytes, expected {expected} ({width}x{height}x{channels})")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Contour has {count} points (a ring needs at least 3)")]
    DegenerateContour { count: usize },

    #[error("Invalid resize target {width}x{height}")]
    InvalidResize { width: u32, height: u32 },
}
