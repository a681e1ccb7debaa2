// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optional raster preparation ahead of segmentation
//!
//! Steps run in a fixed order: percentile contrast stretch, then resize.
//! With default options the image passes through unchanged.

use crate::error::{Error, Result};
use crate::types::RasterImage;
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

/// Which preparation steps to apply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Lower / upper percentile (0-100) mapped to 0 / 255
    pub contrast_stretch: Option<(u8, u8)>,
    /// Target `(width, height)`, Lanczos resampling
    pub resize: Option<(u32, u32)>,
}

impl PreprocessOptions {
    pub fn is_noop(&self) -> bool {
        self.contrast_stretch.is_none() && self.resize.is_none()
    }
}

/// Apply the requested preparation steps
pub fn preprocess(image: &RasterImage, options: &PreprocessOptions) -> Result<RasterImage> {
    let mut current = image.clone();

    if let Some((low, high)) = options.contrast_stretch {
        current = contrast_stretch(&current, low, high)?;
    }
    if let Some((width, height)) = options.resize {
        current = resize(&current, width, height)?;
    }

    Ok(current)
}

/// Clip to the `low`/`high` percentiles of all sample values and rescale to 0-255
///
/// Percentiles are taken over every channel together. A flat image (equal
/// bounds) is returned unchanged.
pub fn contrast_stretch(image: &RasterImage, low: u8, high: u8) -> Result<RasterImage> {
    let channels = image.channels();
    // One row of samples per image row, so per-value operations see every channel
    let samples = GrayImage::from_raw(
        image.width() * channels as u32,
        image.height(),
        image.as_raw().to_vec(),
    )
    .ok_or(Error::BufferSizeMismatch {
        width: image.width(),
        height: image.height(),
        channels,
        expected: image.pixel_count() * channels as usize,
        actual: image.as_raw().len(),
    })?;

    let (low, high) = (low.min(100), high.min(100));
    let lower = imageproc::stats::percentile(&samples, low.min(high));
    let upper = imageproc::stats::percentile(&samples, high.max(low));

    if lower >= upper {
        tracing::debug!(lower, upper, "Contrast stretch skipped on flat image");
        return Ok(image.clone());
    }

    let stretched = imageproc::contrast::stretch_contrast(&samples, lower, upper, 0, 255);
    tracing::debug!(lower, upper, "Stretched contrast");

    RasterImage::new(
        image.width(),
        image.height(),
        channels,
        stretched.into_raw(),
    )
}

/// Resample to `width` x `height`
pub fn resize(image: &RasterImage, width: u32, height: u32) -> Result<RasterImage> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidResize { width, height });
    }

    let (src_width, src_height) = (image.width(), image.height());
    let mismatch = || Error::BufferSizeMismatch {
        width: src_width,
        height: src_height,
        channels: image.channels(),
        expected: image.pixel_count() * image.channels() as usize,
        actual: image.as_raw().len(),
    };

    let resized = match image.channels() {
        1 => {
            let gray = GrayImage::from_raw(src_width, src_height, image.as_raw().to_vec())
                .ok_or_else(mismatch)?;
            RasterImage::from_gray(imageops::resize(&gray, width, height, FilterType::Lanczos3))
        }
        3 => {
            let rgb = RgbImage::from_raw(src_width, src_height, image.as_raw().to_vec())
                .ok_or_else(mismatch)?;
            RasterImage::from_rgb(imageops::resize(&rgb, width, height, FilterType::Lanczos3))
        }
        other => return Err(Error::UnsupportedChannels(other)),
    };

    tracing::debug!(
        from_width = src_width,
        from_height = src_height,
        width,
        height,
        "Resized image"
    );
    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Horizontal ramp from 50 to 149
    fn ramp() -> RasterImage {
        RasterImage::from_gray(GrayImage::from_fn(100, 4, |x, _| Luma([50 + x as u8])))
    }

    #[test]
    fn test_default_is_passthrough() {
        let options = PreprocessOptions::default();
        assert!(options.is_noop());
        assert_eq!(preprocess(&ramp(), &options).unwrap(), ramp());
    }

    #[test]
    fn test_contrast_stretch_widens_range() {
        let stretched = contrast_stretch(&ramp(), 2, 98).unwrap();
        let raw = stretched.as_raw();

        assert_eq!(raw.iter().copied().min(), Some(0));
        assert_eq!(raw.iter().copied().max(), Some(255));
        // Order preserved along the ramp
        assert!(raw[..100].windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_contrast_stretch_flat_image_unchanged() {
        let flat = RasterImage::from_gray(GrayImage::from_pixel(10, 10, Luma([77])));
        assert_eq!(contrast_stretch(&flat, 2, 98).unwrap(), flat);
    }

    #[test]
    fn test_contrast_stretch_rgb_keeps_shape() {
        let raster = RasterImage::new(2, 1, 3, vec![10, 20, 30, 200, 210, 220]).unwrap();
        let stretched = contrast_stretch(&raster, 1, 100).unwrap();

        assert_eq!(stretched.channels(), 3);
        assert_eq!(stretched.as_raw()[0], 0);
        assert_eq!(stretched.as_raw()[5], 255);
    }

    #[test]
    fn test_resize() {
        let resized = resize(&ramp(), 50, 8).unwrap();
        assert_eq!((resized.width(), resized.height()), (50, 8));
        assert_eq!(resized.channels(), 1);

        assert!(matches!(
            resize(&ramp(), 0, 8),
            Err(Error::InvalidResize { width: 0, height: 8 })
        ));
    }

    #[test]
    fn test_preprocess_order() {
        let options = PreprocessOptions {
            contrast_stretch: Some((0, 100)),
            resize: Some((20, 2)),
        };
        let prepared = preprocess(&ramp(), &options).unwrap();
        assert_eq!((prepared.width(), prepared.height()), (20, 2));
    }
}
