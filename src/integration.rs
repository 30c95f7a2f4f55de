//! Integration module for connecting detection backends and frame streams
//! with the pill counter.
//!
//! This module provides traits and utilities for plugging a detector
//! (recorded detections, Burn, etc.) and a frame source into the per-frame
//! counting pipeline.

mod builder;
mod detector;
mod pipeline;
mod replay;
mod source;

pub use builder::DetectionSetBuilder;
pub use detector::{DetectionSource, IntoDetectionSet};
pub use pipeline::CountingPipeline;
pub use replay::ReplayDetector;
pub use source::{FrameSink, FrameSource, ImageDirSink, ImageDirSource};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnDetector, BurnDetectorError, BurnModel, RawDetection};
