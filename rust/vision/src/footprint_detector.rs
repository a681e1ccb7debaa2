// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building footprint detection via adaptive thresholding and contour finding

use crate::error::{Error, Result};
use crate::image_ops::{
    adaptive_threshold_inv, canny_edges, gaussian_blur_5x5, morphological_open, to_grayscale,
};
use crate::line_ops::detect_lines;
use crate::types::{
    Contour, Footprint, PixelCoord, RasterImage, SegmentationParams, SegmentationResult,
};
use image::{GrayImage, Luma};
use imageproc::contours::BorderType;
use imageproc::point::Point;

/// Segment building footprints with the fixed pipeline parameters
///
/// Buildings are assumed to appear as locally darker blobs. An image without
/// any qualifying blob yields an empty result, not an error.
pub fn segment(image: &RasterImage) -> Result<SegmentationResult> {
    segment_with_params(image, &SegmentationParams::default())
}

/// Segment building footprints with explicit parameters
pub fn segment_with_params(
    image: &RasterImage,
    params: &SegmentationParams,
) -> Result<SegmentationResult> {
    let width = image.width();
    let height = image.height();
    if image.pixel_count() == 0 {
        return Err(Error::EmptyImage { width, height });
    }

    // Step 1: Grayscale
    let grayscale = to_grayscale(image)?;

    // Step 2: Smooth pixel noise
    let blurred = gaussian_blur_5x5(&grayscale);

    // Step 3: Locally dark regions become foreground
    let binary = adaptive_threshold_inv(&blurred, params.threshold_block_size, params.threshold_c);

    // Step 4: Remove speckle
    let cleaned = morphological_open(&binary, params.opening_iterations);

    // Step 5-6: Outer contours above the area floor
    let min_area = image.pixel_count() as f64 * params.min_area_fraction;
    let contours = find_external_contours(&cleaned);
    let candidate_count = contours.len();

    // Step 7: Per-footprint measurements
    let footprints: Vec<Footprint> = contours
        .into_iter()
        .filter(|contour| contour.area() >= min_area)
        .map(|contour| measure_footprint(contour, width, height))
        .collect();

    // Step 8: Auxiliary straight lines from the unsmoothed grayscale
    let edges = canny_edges(&grayscale, params.canny_low, params.canny_high);
    let lines = detect_lines(
        &edges,
        params.hough_threshold,
        params.min_line_length,
        params.max_line_gap,
    );

    tracing::debug!(
        width,
        height,
        candidates = candidate_count,
        min_area,
        footprints = footprints.len(),
        lines = lines.len(),
        "Footprint segmentation complete"
    );

    Ok(SegmentationResult {
        footprints,
        edges,
        lines,
        image_width: width,
        image_height: height,
    })
}

/// Outermost borders of white regions; holes and nested borders are dropped
fn find_external_contours(binary: &GrayImage) -> Vec<Contour> {
    imageproc::contours::find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|c| {
            Contour::new(
                c.points
                    .into_iter()
                    .map(|p| PixelCoord::new(p.x, p.y))
                    .collect(),
            )
        })
        .collect()
}

fn measure_footprint(contour: Contour, width: u32, height: u32) -> Footprint {
    let moments = contour.moments();
    let bounding_box = contour.bounding_box();
    let mask = contour_mask(&contour, width, height);

    Footprint {
        area: moments.m00.abs(),
        bounding_box,
        centroid: moments.centroid(),
        mask,
        contour,
    }
}

/// Rasterize a filled contour
fn contour_mask(contour: &Contour, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);

    let mut polygon: Vec<Point<i32>> = contour
        .points()
        .iter()
        .map(|p| Point::new(p.x, p.y))
        .collect();
    // The polygon fill requires an open ring
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }

    if polygon.len() >= Contour::MIN_POINTS {
        imageproc::drawing::draw_polygon_mut(&mut mask, &polygon, Luma([255]));
    } else {
        for p in &polygon {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
                mask.put_pixel(p.x as u32, p.y as u32, Luma([255]));
            }
        }
    }

    mask
}
