//! Counts pills crossing a fixed region of a video stream.
//!
//! A detector supplies bounding boxes for every frame; the counter keeps the
//! boxes that overlap a square region centered in the frame, marks their
//! centers and labels the frame with the total. Each frame is counted from
//! scratch, with no identity carried between frames.

pub mod config;
pub mod counting;
pub mod error;
pub mod integration;

pub use config::Config;
pub use counting::{
    BoundingBox, DetectionSet, FrameCount, FrameCounter, GeometryError, OverlapThresholds, Point,
    Region, center_of, overlaps,
};
pub use error::{Error, Result};
pub use integration::{
    CountingPipeline, DetectionSetBuilder, DetectionSource, FrameSink, FrameSource, ImageDirSink,
    ImageDirSource, IntoDetectionSet, ReplayDetector,
};

#[cfg(feature = "burn-backend")]
pub use integration::{BurnDetector, BurnDetectorError, BurnModel, RawDetection};
