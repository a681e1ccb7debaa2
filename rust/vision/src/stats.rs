// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Global image statistics reported alongside segmentation

use crate::error::{Error, Result};
use crate::image_ops::{canny_edges, edge_density, to_grayscale};
use crate::types::RasterImage;
use serde::{Deserialize, Serialize};

/// Summary of one channel's pixel values
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: u8,
    pub max: u8,
}

/// Per-channel statistics plus the edge density of the grayscale image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageStatistics {
    pub channels: Vec<ChannelStats>,
    /// Fraction of pixels on Canny edges (thresholds 100 / 200)
    pub edge_density: f64,
}

pub fn image_statistics(image: &RasterImage) -> Result<ImageStatistics> {
    if image.pixel_count() == 0 {
        return Err(Error::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }

    let grayscale = to_grayscale(image)?;
    let channel_count = image.channels() as usize;

    let channels = (0..channel_count)
        .map(|c| {
            let values = image.as_raw().iter().skip(c).step_by(channel_count);
            channel_stats(values.copied())
        })
        .collect();

    let edges = canny_edges(&grayscale, 100.0, 200.0);

    Ok(ImageStatistics {
        channels,
        edge_density: edge_density(&edges),
    })
}

fn channel_stats(values: impl Iterator<Item = u8>) -> ChannelStats {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut min = u8::MAX;
    let mut max = u8::MIN;

    for v in values {
        let f = v as f64;
        count += 1;
        sum += f;
        sum_sq += f * f;
        min = min.min(v);
        max = max.max(v);
    }

    if count == 0 {
        return ChannelStats {
            mean: 0.0,
            std: 0.0,
            min: 0,
            max: 0,
        };
    }

    let mean = sum / count as f64;
    let variance = (sum_sq / count as f64 - mean * mean).max(0.0);

    ChannelStats {
        mean,
        std: variance.sqrt(),
        min,
        max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rgb_channel_stats() {
        // Two pixels: (10, 20, 30) and (30, 20, 10)
        let raster = RasterImage::new(2, 1, 3, vec![10, 20, 30, 30, 20, 10]).unwrap();
        let stats = image_statistics(&raster).unwrap();

        assert_eq!(stats.channels.len(), 3);
        assert_relative_eq!(stats.channels[0].mean, 20.0);
        assert_relative_eq!(stats.channels[0].std, 10.0);
        assert_eq!(stats.channels[0].min, 10);
        assert_eq!(stats.channels[0].max, 30);
        assert_relative_eq!(stats.channels[1].std, 0.0);
    }

    #[test]
    fn test_uniform_image_has_no_edges() {
        let raster = RasterImage::new(16, 16, 1, vec![90; 256]).unwrap();
        let stats = image_statistics(&raster).unwrap();

        assert_eq!(stats.channels.len(), 1);
        assert_relative_eq!(stats.edge_density, 0.0);
    }
}
