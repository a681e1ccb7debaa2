// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image processing operations for footprint segmentation

use crate::error::{Error, Result};
use crate::types::RasterImage;
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::separable_filter_equal;

/// Binomial 5-tap Gaussian (sigma ~1.1)
const GAUSSIAN_5: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Convert a raster to single-channel grayscale
///
/// RGB input uses the ITU-R BT.601 luma weights; single-channel input is
/// copied unchanged.
pub fn to_grayscale(image: &RasterImage) -> Result<GrayImage> {
    let (width, height) = (image.width(), image.height());
    let data = image.as_raw();

    match image.channels() {
        1 => GrayImage::from_raw(width, height, data.to_vec()).ok_or(Error::BufferSizeMismatch {
            width,
            height,
            channels: 1,
            expected: image.pixel_count(),
            actual: data.len(),
        }),
        3 => {
            let luma: Vec<u8> = data
                .chunks_exact(3)
                .map(|px| rgb_to_luma(px[0], px[1], px[2]))
                .collect();
            GrayImage::from_raw(width, height, luma).ok_or(Error::BufferSizeMismatch {
                width,
                height,
                channels: 3,
                expected: image.pixel_count() * 3,
                actual: data.len(),
            })
        }
        other => Err(Error::UnsupportedChannels(other)),
    }
}

/// Standard luminance formula (ITU-R BT.601), rounded
#[inline]
pub fn rgb_to_luma(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Normalized 1D Gaussian kernel of odd `size`
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f32> {
    let half = (size / 2) as i64;
    let weights: Vec<f64> = (-half..=half)
        .map(|k| (-((k * k) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Sigma implied by a kernel size when none is given (matches common CV toolkits)
pub fn sigma_for_kernel_size(size: usize) -> f64 {
    0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// 5x5 Gaussian smoothing to suppress pixel noise
pub fn gaussian_blur_5x5(image: &GrayImage) -> GrayImage {
    separable_filter_equal(image, &GAUSSIAN_5)
}

/// Inverted adaptive threshold against a Gaussian-weighted local mean
///
/// A pixel becomes foreground (255) when it is at least `c` darker than its
/// `block_size` x `block_size` neighbourhood, so locally dark blobs light up.
pub fn adaptive_threshold_inv(image: &GrayImage, block_size: u32, c: f64) -> GrayImage {
    let size = (block_size.max(3) | 1) as usize;
    let kernel = gaussian_kernel(size, sigma_for_kernel_size(size));
    let means = separable_filter_equal(image, &kernel);

    let mut result = GrayImage::new(image.width(), image.height());
    for ((dst, src), mean) in result.pixels_mut().zip(image.pixels()).zip(means.pixels()) {
        let threshold = mean.0[0] as f64 - c;
        let value = if src.0[0] as f64 <= threshold { 255 } else { 0 };
        *dst = Luma([value]);
    }
    result
}

/// Apply Canny edge detection
pub fn canny_edges(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    imageproc::edges::canny(image, low_threshold, high_threshold)
}

/// Morphological dilation with a 3x3 square element - expands white regions
pub fn dilate(image: &GrayImage) -> GrayImage {
    imageproc::morphology::dilate(image, Norm::LInf, 1)
}

/// Morphological erosion with a 3x3 square element - shrinks white regions
pub fn erode(image: &GrayImage) -> GrayImage {
    imageproc::morphology::erode(image, Norm::LInf, 1)
}

/// Morphological opening (erode then dilate) - removes small noise
///
/// All erosions run before all dilations.
pub fn morphological_open(image: &GrayImage, iterations: u32) -> GrayImage {
    let mut result = image.clone();
    for _ in 0..iterations {
        result = erode(&result);
    }
    for _ in 0..iterations {
        result = dilate(&result);
    }
    result
}

/// Fraction of pixels marked as edges in a binary edge map
pub fn edge_density(edges: &GrayImage) -> f64 {
    let total = edges.width() as usize * edges.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let on = edges.pixels().filter(|p| p.0[0] > 0).count();
    on as f64 / total as f64
}
