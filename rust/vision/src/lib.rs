// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building footprint segmentation from raster imagery
//!
//! This crate turns an aerial or satellite image into building-footprint
//! primitives:
//! 0. Optional contrast stretch and resize ([`preprocess`])
//! 1. Grayscale conversion and 5x5 Gaussian smoothing
//! 2. Inverted adaptive thresholding (buildings are locally darker blobs)
//! 3. Morphological opening to remove speckle
//! 4. External contour extraction with a 1%-of-image area floor
//! 5. Bounding boxes, moment centroids and masks per footprint
//! 6. Canny edges and Hough line segments as auxiliary data
//!
//! # Usage
//!
//! ```rust,ignore
//! use citylod_vision::{segment, RasterImage};
//!
//! let raster = RasterImage::from_dynamic(&image::open("tile.png")?);
//! let result = segment(&raster)?;
//! for footprint in &result.footprints {
//!     println!("{:?} -> {:?}", footprint.bounding_box, footprint.centroid);
//! }
//! ```

pub mod error;
pub mod footprint_detector;
pub mod image_ops;
pub mod line_ops;
pub mod overlay;
pub mod preprocess;
pub mod stats;
pub mod types;

pub use error::{Error, Result};
pub use footprint_detector::{segment, segment_with_params};
pub use overlay::draw_overlay;
pub use preprocess::{preprocess, PreprocessOptions};
pub use stats::{image_statistics, ChannelStats, ImageStatistics};
pub use types::{
    BoundingBox, Contour, Footprint, LineSegment, Moments, PixelCoord, Point2D, RasterImage,
    SegmentationParams, SegmentationResult,
};
