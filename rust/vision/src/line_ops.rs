// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Straight line detection on binary edge maps

use crate::types::{LineSegment, Point2D};
use image::GrayImage;
use std::f64::consts::PI;

/// Upper bound on accumulator peaks examined per image
const MAX_PEAKS: usize = 500;

/// Maximum distance (pixels) between an edge point and a peak line
const RHO_TOLERANCE: f64 = 2.0;

/// Detect line segments using a probabilistic Hough transform
///
/// Votes in a 1 pixel x 1 degree accumulator, then walks the strongest
/// peaks, splitting the supporting edge points into segments wherever two
/// consecutive points are more than `max_line_gap` apart. Edge points are
/// consumed by the first segment that claims them.
pub fn detect_lines(
    edges: &GrayImage,
    threshold: u32,
    min_line_length: f64,
    max_line_gap: f64,
) -> Vec<LineSegment> {
    let width = edges.width() as i64;
    let height = edges.height() as i64;

    let rho_resolution = 1.0;
    let theta_resolution = PI / 180.0;
    let num_thetas = (PI / theta_resolution).round() as usize;

    let (cos_table, sin_table): (Vec<f64>, Vec<f64>) = (0..num_thetas)
        .map(|i| {
            let theta = i as f64 * theta_resolution;
            (theta.cos(), theta.sin())
        })
        .unzip();

    let max_rho = ((width * width + height * height) as f64).sqrt();
    let num_rhos = (2.0 * max_rho / rho_resolution) as usize + 1;
    let rho_offset = max_rho;

    let edge_points: Vec<(i64, i64)> = edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 128)
        .map(|(x, y, _)| (x as i64, y as i64))
        .collect();

    if edge_points.is_empty() {
        return Vec::new();
    }

    // Vote in Hough space
    let mut accumulator = vec![0u32; num_thetas * num_rhos];
    for &(x, y) in &edge_points {
        for theta_idx in 0..num_thetas {
            let rho = x as f64 * cos_table[theta_idx] + y as f64 * sin_table[theta_idx];
            let rho_idx = ((rho + rho_offset) / rho_resolution) as usize;
            if rho_idx < num_rhos {
                accumulator[theta_idx * num_rhos + rho_idx] += 1;
            }
        }
    }

    let mut peaks: Vec<(usize, usize, u32)> = Vec::new();
    for theta_idx in 0..num_thetas {
        for rho_idx in 0..num_rhos {
            let votes = accumulator[theta_idx * num_rhos + rho_idx];
            if votes >= threshold {
                peaks.push((theta_idx, rho_idx, votes));
            }
        }
    }

    // Strongest first; ties keep accumulator order so the result is deterministic
    peaks.sort_by(|a, b| b.2.cmp(&a.2));

    let mut lines = Vec::new();
    let mut used_points = vec![false; edge_points.len()];

    for &(theta_idx, rho_idx, _) in peaks.iter().take(MAX_PEAKS) {
        let rho = rho_idx as f64 * rho_resolution - rho_offset;
        let cos_t = cos_table[theta_idx];
        let sin_t = sin_table[theta_idx];

        let mut line_points: Vec<(i64, i64, usize)> = edge_points
            .iter()
            .enumerate()
            .filter(|&(i, &(x, y))| {
                !used_points[i] && (x as f64 * cos_t + y as f64 * sin_t - rho).abs() < RHO_TOLERANCE
            })
            .map(|(i, &(x, y))| (x, y, i))
            .collect();

        if line_points.len() < 2 {
            continue;
        }

        // Order along the line direction
        line_points.sort_by(|a, b| {
            let proj_a = a.0 as f64 * (-sin_t) + a.1 as f64 * cos_t;
            let proj_b = b.0 as f64 * (-sin_t) + b.1 as f64 * cos_t;
            proj_a.total_cmp(&proj_b)
        });

        let mut segment_start = 0;
        for i in 1..=line_points.len() {
            let split = i == line_points.len() || {
                let dx = (line_points[i].0 - line_points[i - 1].0) as f64;
                let dy = (line_points[i].1 - line_points[i - 1].1) as f64;
                (dx * dx + dy * dy).sqrt() > max_line_gap
            };

            if !split {
                continue;
            }

            if i - segment_start >= 2 {
                let start_pt = line_points[segment_start];
                let end_pt = line_points[i - 1];
                let segment = LineSegment::new(
                    Point2D::new(start_pt.0 as f64, start_pt.1 as f64),
                    Point2D::new(end_pt.0 as f64, end_pt.1 as f64),
                );

                if segment.length() >= min_line_length {
                    for point in &line_points[segment_start..i] {
                        used_points[point.2] = true;
                    }
                    lines.push(segment);
                }
            }
            segment_start = i;
        }
    }

    lines
}
