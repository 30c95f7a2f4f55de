//! CountingPipeline for combining detection with per-frame counting.

use image::RgbImage;

use crate::counting::{FrameCount, FrameCounter, OverlapThresholds, Region};
use crate::error::{Error, Result};

use super::DetectionSource;

/// Bundles a `DetectionSource` with a `FrameCounter` for one tracking session.
///
/// Each call runs one full cycle on a frame: detect, outline the region,
/// count, then label the frame. Nothing but the fixed region survives from one
/// frame to the next.
pub struct CountingPipeline<D: DetectionSource> {
    detector: D,
    counter: FrameCounter,
}

impl<D: DetectionSource> CountingPipeline<D> {
    /// Create a new pipeline with the given detector, region and thresholds.
    pub fn new(detector: D, region: Region, thresholds: OverlapThresholds) -> Self {
        Self {
            detector,
            counter: FrameCounter::new(region, thresholds),
        }
    }

    /// Create a pipeline whose region is a `square_size` square centered in a
    /// `width` x `height` frame.
    pub fn for_frame_size(
        detector: D,
        width: u32,
        height: u32,
        square_size: u32,
        thresholds: OverlapThresholds,
    ) -> Self {
        Self::new(
            detector,
            Region::centered(width, height, square_size),
            thresholds,
        )
    }

    /// Process one frame, returning detector failures to the caller.
    ///
    /// The detector sees the frame before any overlay is drawn. On failure the
    /// frame is left untouched.
    pub fn try_process_frame(&mut self, frame: &mut RgbImage) -> Result<FrameCount> {
        let detections = self
            .detector
            .detect(frame.as_raw(), frame.width(), frame.height())
            .map_err(|e| Error::Detector(e.to_string()))?;

        self.counter.region().draw(frame);
        let count = self.counter.count(frame, &detections);
        self.counter.draw_total(frame, count);
        Ok(count)
    }

    /// Process one frame, counting zero when anything goes wrong.
    ///
    /// A failed frame is logged and still gets the region outline, but no
    /// count label. The stream keeps going either way.
    pub fn process_frame(&mut self, frame: &mut RgbImage) -> FrameCount {
        match self.try_process_frame(frame) {
            Ok(count) => count,
            Err(err) => {
                log::error!("{err}; counting zero for this frame");
                self.counter.region().draw(frame);
                FrameCount::default()
            }
        }
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying counter.
    pub fn counter(&self) -> &FrameCounter {
        &self.counter
    }

    pub fn region(&self) -> &Region {
        self.counter.region()
    }
}
