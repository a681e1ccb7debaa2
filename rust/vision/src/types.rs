// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for footprint segmentation

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage, RgbImage};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A 2D point in pixel space (sub-pixel precision)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (other.to_nalgebra() - self.to_nalgebra()).norm()
    }
}

/// Integer pixel coordinate on a contour
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub x: i32,
    pub y: i32,
}

impl PixelCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Closed polygon boundary in image space
///
/// Always holds at least 3 points; the ring is implicitly closed (the last
/// point connects back to the first).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "ContourPoints")]
pub struct Contour {
    points: Vec<PixelCoord>,
}

/// Unchecked wire form of [`Contour`]
#[derive(Deserialize)]
struct ContourPoints {
    points: Vec<PixelCoord>,
}

impl TryFrom<ContourPoints> for Contour {
    type Error = Error;

    fn try_from(raw: ContourPoints) -> Result<Self> {
        let count = raw.points.len();
        Contour::new(raw.points).ok_or(Error::DegenerateContour { count })
    }
}

impl Contour {
    /// Minimum number of points in a contour
    pub const MIN_POINTS: usize = 3;

    /// Build a contour, rejecting rings with fewer than three points
    pub fn new(points: Vec<PixelCoord>) -> Option<Self> {
        if points.len() < Self::MIN_POINTS {
            return None;
        }
        Some(Self { points })
    }

    pub fn points(&self) -> &[PixelCoord] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Unsigned polygon area (shoelace formula)
    pub fn area(&self) -> f64 {
        self.moments().m00.abs()
    }

    /// Polygon moments of order 0 and 1 via Green's theorem
    pub fn moments(&self) -> Moments {
        let n = self.points.len();
        let mut a = 0.0;
        let mut sx = 0.0;
        let mut sy = 0.0;

        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let (x0, y0) = (p.x as f64, p.y as f64);
            let (x1, y1) = (q.x as f64, q.y as f64);
            let cross = x0 * y1 - x1 * y0;
            a += cross;
            sx += (x0 + x1) * cross;
            sy += (y0 + y1) * cross;
        }

        Moments {
            m00: a / 2.0,
            m10: sx / 6.0,
            m01: sy / 6.0,
        }
    }

    /// Centroid from the polygon moments, `None` for zero-area rings
    pub fn centroid(&self) -> Option<Point2D> {
        self.moments().centroid()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox {
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
        };
        for p in &self.points {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        bbox
    }
}

/// Zeroth and first order polygon moments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Signed area
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    pub fn centroid(&self) -> Option<Point2D> {
        if self.m00 == 0.0 {
            return None;
        }
        Some(Point2D::new(self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Axis-aligned bounding box with inclusive pixel extents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Width in pixels (inclusive extents)
    pub fn width(&self) -> u32 {
        (self.max_x as i64 - self.min_x as i64 + 1).clamp(0, u32::MAX as i64) as u32
    }

    /// Height in pixels (inclusive extents)
    pub fn height(&self) -> u32 {
        (self.max_y as i64 - self.min_y as i64 + 1).clamp(0, u32::MAX as i64) as u32
    }
}

/// Straight line segment detected on the edge map
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LineSegment {
    pub start: Point2D,
    pub end: Point2D,
}

impl LineSegment {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    pub fn midpoint(&self) -> Point2D {
        Point2D::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }
}

/// One building candidate that passed the area filter
#[derive(Debug, Clone, Serialize)]
pub struct Footprint {
    pub contour: Contour,
    /// Polygon area in square pixels
    pub area: f64,
    pub bounding_box: BoundingBox,
    /// `None` when the contour has zero signed area
    pub centroid: Option<Point2D>,
    /// Filled contour mask (255 inside, 0 outside), same size as the source
    #[serde(skip)]
    pub mask: GrayImage,
}

/// Output bundle of the footprint segmenter
#[derive(Debug, Clone, Serialize)]
pub struct SegmentationResult {
    /// Qualifying footprints in detection order
    pub footprints: Vec<Footprint>,
    /// Binary edge map (255 = edge)
    #[serde(skip)]
    pub edges: GrayImage,
    /// Straight segments found on the edge map
    pub lines: Vec<LineSegment>,
    pub image_width: u32,
    pub image_height: u32,
}

impl SegmentationResult {
    /// Number of qualifying contours
    pub fn count(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    pub fn contours(&self) -> impl Iterator<Item = &Contour> {
        self.footprints.iter().map(|f| &f.contour)
    }
}

/// Fixed parameters of the segmentation pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentationParams {
    /// Adaptive threshold neighbourhood size (odd)
    pub threshold_block_size: u32,
    /// Constant subtracted from the weighted local mean
    pub threshold_c: f64,
    /// Opening iterations with a 3x3 structuring element
    pub opening_iterations: u32,
    /// Minimum contour area as a fraction of the image pixel count.
    /// A policy threshold separating buildings from noise, not a measurement.
    pub min_area_fraction: f64,
    /// Canny low / high thresholds
    pub canny_low: f32,
    pub canny_high: f32,
    /// Hough vote threshold
    pub hough_threshold: u32,
    /// Minimum line segment length in pixels
    pub min_line_length: f64,
    /// Maximum gap bridged inside one segment
    pub max_line_gap: f64,
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self {
            threshold_block_size: 11,
            threshold_c: 2.0,
            opening_iterations: 2,
            min_area_fraction: 0.01,
            canny_low: 100.0,
            canny_high: 200.0,
            hough_threshold: 50,
            min_line_length: 50.0,
            max_line_gap: 10.0,
        }
    }
}

/// Decoded 8-bit raster, channel-last and row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap a pixel buffer, checking its length against the declared shape
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn from_gray(image: GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            channels: 1,
            data: image.into_raw(),
        }
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            channels: 3,
            data: image.into_raw(),
        }
    }

    /// Single-channel images stay single-channel; everything else is flattened to RGB
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => Self::from_gray(gray.clone()),
            other => Self::from_rgb(other.to_rgb8()),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }
}
