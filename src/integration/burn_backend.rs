//! Burn inference backend for pill detection.
//!
//! This module provides a `BurnDetector` that implements `DetectionSource`
//! for running detection models built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use pill_counter::{BurnDetector, BurnModel, RawDetection};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your detection model
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> Vec<RawDetection> {
//!         // Run inference
//!     }
//! }
//!
//! let model = MyYoloModel::load("pills.bin");
//! let detector = BurnDetector::new(model, Default::default()).with_class_filter(0);
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use image::RgbImage;
use image::imageops::{self, FilterType};
use thiserror::Error;

use super::DetectionSource;
use crate::counting::{BoundingBox, DetectionSet};

/// Error type for Burn detection failures.
#[derive(Error, Debug, Clone)]
pub enum BurnDetectorError {
    /// Pixel buffer does not match the announced frame size.
    #[error("invalid input: expected {expected} RGB bytes, got {got}")]
    InvalidInput { expected: usize, got: usize },
    /// Model input shape is not usable.
    #[error("preprocessing error: {0}")]
    Preprocessing(String),
}

/// Raw detection output from the model, in model input coordinates.
#[derive(Debug, Clone)]
pub struct RawDetection {
    /// Bounding box: [x1, y1, x2, y2] or [cx, cy, w, h] depending on model
    pub bbox: [f32; 4],
    /// Confidence score
    pub score: f32,
    /// Class ID (optional, for multi-class detection)
    pub class_id: Option<usize>,
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape [batch, channels, height, width]
    ///
    /// # Returns
    /// Vector of raw detections after the model's own NMS.
    fn forward(&self, input: Tensor<B, 4>) -> Vec<RawDetection>;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 416, 416)
    }

    /// Whether bbox output is in XYWH format (vs XYXY).
    fn bbox_is_xywh(&self) -> bool {
        true
    }
}

/// Burn-based object detector implementing `DetectionSource`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    conf_threshold: f32,
    class_filter: Option<usize>,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    /// Create a new Burn detector with the given model and device.
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            conf_threshold: 0.8,
            class_filter: None,
        }
    }

    /// Set the confidence threshold for filtering detections.
    pub fn with_conf_threshold(mut self, threshold: f32) -> Self {
        self.conf_threshold = threshold;
        self
    }

    /// Keep only detections of one class.
    pub fn with_class_filter(mut self, class_id: usize) -> Self {
        self.class_filter = Some(class_id);
        self
    }

    /// Resize an RGB8 frame to the model input and convert it to a
    /// normalized [1, C, H, W] tensor.
    pub fn preprocess(
        &self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Tensor<B, 4>, BurnDetectorError> {
        let (channels, target_h, target_w) = self.model.input_size();
        if channels != 3 {
            return Err(BurnDetectorError::Preprocessing(format!(
                "model expects {channels} channels, frames are RGB"
            )));
        }

        let expected = (width * height * 3) as usize;
        let frame = RgbImage::from_raw(width, height, input.to_vec()).ok_or(
            BurnDetectorError::InvalidInput {
                expected,
                got: input.len(),
            },
        )?;
        let resized = if (width, height) == (target_w, target_h) {
            frame
        } else {
            imageops::resize(&frame, target_w, target_h, FilterType::Triangle)
        };

        // HWC interleaved -> CHW planar, normalized to [0, 1]
        let plane = (target_w * target_h) as usize;
        let mut data = vec![0.0f32; plane * 3];
        for (i, pixel) in resized.pixels().enumerate() {
            for c in 0..3 {
                data[c * plane + i] = pixel[c] as f32 / 255.0;
            }
        }

        let tensor = Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
            1,
            3,
            target_h as usize,
            target_w as usize,
        ]);
        Ok(tensor)
    }

    /// Filter raw model outputs and map them back to frame coordinates.
    fn postprocess(
        &self,
        raw_detections: Vec<RawDetection>,
        width: u32,
        height: u32,
    ) -> DetectionSet {
        let (_, target_h, target_w) = self.model.input_size();
        let sx = width as f32 / target_w as f32;
        let sy = height as f32 / target_h as f32;

        let mut set = DetectionSet::new();
        for d in raw_detections {
            if d.score < self.conf_threshold {
                continue;
            }
            if self.class_filter.is_some_and(|c| d.class_id != Some(c)) {
                continue;
            }
            let [a, b, c, e] = d.bbox;
            let bbox = if self.model.bbox_is_xywh() {
                BoundingBox::from_xywh(a, b, c, e)
            } else {
                BoundingBox::new(a, b, c, e)
            };
            set.bbox.push(vec![
                bbox.x_min * sx,
                bbox.y_min * sy,
                bbox.x_max * sx,
                bbox.y_max * sy,
            ]);
            set.conf.push(d.score);
            set.cls_id.push(d.class_id.unwrap_or(0) as f32);
        }
        set
    }
}

impl<B: Backend, M: BurnModel<B>> DetectionSource for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DetectionSet, Self::Error> {
        let tensor = self.preprocess(input, width, height)?;
        let raw_detections = self.model.forward(tensor);
        Ok(self.postprocess(raw_detections, width, height))
    }
}
