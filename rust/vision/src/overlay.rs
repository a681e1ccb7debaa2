// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Debug overlay of segmentation output on the source image

use crate::error::{Error, Result};
use crate::types::{RasterImage, SegmentationResult};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

const CONTOUR_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const LINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Draw footprint contours (red) and detected lines (green) over the image
pub fn draw_overlay(image: &RasterImage, result: &SegmentationResult) -> Result<RgbImage> {
    let mut canvas = to_rgb(image)?;

    for footprint in &result.footprints {
        let points = footprint.contour.points();
        for (i, p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()];
            draw_line_segment_mut(
                &mut canvas,
                (p.x as f32, p.y as f32),
                (q.x as f32, q.y as f32),
                CONTOUR_COLOR,
            );
        }
    }

    for line in &result.lines {
        draw_line_segment_mut(
            &mut canvas,
            (line.start.x as f32, line.start.y as f32),
            (line.end.x as f32, line.end.y as f32),
            LINE_COLOR,
        );
    }

    Ok(canvas)
}

fn to_rgb(image: &RasterImage) -> Result<RgbImage> {
    let (width, height) = (image.width(), image.height());
    let data = match image.channels() {
        1 => image.as_raw().iter().flat_map(|&v| [v, v, v]).collect(),
        3 => image.as_raw().to_vec(),
        other => return Err(Error::UnsupportedChannels(other)),
    };

    RgbImage::from_raw(width, height, data).ok_or(Error::BufferSizeMismatch {
        width,
        height,
        channels: image.channels(),
        expected: image.pixel_count() * 3,
        actual: image.as_raw().len() * 3 / image.channels().max(1) as usize,
    })
}
