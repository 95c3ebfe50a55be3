use image::{RgbImage, imageops};
use penmaze_core::PixelPoint;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything the tracker needs to know about the pen and the camera.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub range: HsvRange,
    /// Frames are scaled to this width (keeping aspect) before tracking; `None` keeps them as-is.
    pub resize_width: Option<u32>,
    /// Flip frames horizontally so the pen moves like a mirror image of the user.
    pub mirror: bool,
    /// Gaussian blur sigma; zero or less disables blurring.
    pub blur_sigma: f32,
    /// Erode/dilate passes used to clean up the mask.
    pub morph_iterations: u32,
    /// Blobs smaller than this many pixels are treated as noise.
    pub min_blob_area: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            range: HsvRange::default(),
            resize_width: Some(600),
            mirror: true,
            blur_sigma: 2.0,
            morph_iterations: 2,
            min_blob_area: 1,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        self.range.validate()
    }
}

/// Finds the pen in a frame: the largest blob of pen-coloured pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PenTracker {
    config: TrackerConfig,
}

impl PenTracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Centroid of the pen in the coordinates of [`PenTracker::prepare`]'s output.
    pub fn locate(&self, frame: &RgbImage) -> Option<PixelPoint> {
        let frame = self.prepare(frame);
        self.locate_prepared(&frame)
    }

    /// Mirrors, rescales and blurs a raw frame.
    pub fn prepare(&self, frame: &RgbImage) -> RgbImage {
        let mut frame = if self.config.mirror {
            imageops::flip_horizontal(frame)
        } else {
            frame.clone()
        };

        if let Some(width) = self.config.resize_width {
            if width > 0 && frame.width() > 0 && width != frame.width() {
                let height = u64::from(frame.height()) * u64::from(width) / u64::from(frame.width());
                let height = u32::try_from(height).unwrap_or(u32::MAX).max(1);
                frame = imageops::resize(&frame, width, height, imageops::FilterType::Triangle);
            }
        }

        if self.config.blur_sigma > 0.0 {
            frame = imageops::blur(&frame, self.config.blur_sigma);
        }

        frame
    }

    /// Same as [`PenTracker::locate`] for a frame that has already been prepared.
    pub fn locate_prepared(&self, frame: &RgbImage) -> Option<PixelPoint> {
        let mask = mask::threshold(frame, &self.config.range);
        let mask = mask::erode(&mask, self.config.morph_iterations);
        let mask = mask::dilate(&mask, self.config.morph_iterations);

        let blob = blob::largest_blob(&mask)?;
        if blob.area < self.config.min_blob_area {
            log::trace!("largest blob of {} px is below the noise floor", blob.area);
            return None;
        }
        Some(blob.centroid())
    }
}
