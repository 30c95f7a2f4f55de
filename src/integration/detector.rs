//! Trait for object detection inference backends.

use ndarray::{Array2, Axis};

use crate::counting::DetectionSet;

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the counter.
///
/// # Example
///
/// ```ignore
/// use pill_counter::{DetectionSet, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<DetectionSet, Self::Error> {
///         // Run inference and return the frame's boxes
///         Ok(DetectionSet::new())
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error: std::fmt::Display;

    /// Run inference on one frame.
    ///
    /// # Arguments
    /// * `pixels` - Interleaved RGB8 bytes, row major
    /// * `width` - Frame width in pixels
    /// * `height` - Frame height in pixels
    ///
    /// # Returns
    /// The frame's detections, or an error. The counter treats an error as a
    /// frame with zero pills.
    fn detect(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DetectionSet, Self::Error>;
}

/// Helper trait for converting model-specific outputs to a `DetectionSet`.
pub trait IntoDetectionSet {
    fn into_detection_set(self) -> DetectionSet;
}

impl IntoDetectionSet for DetectionSet {
    fn into_detection_set(self) -> DetectionSet {
        self
    }
}

/// A detector that produced no result yields an empty set.
impl IntoDetectionSet for Option<DetectionSet> {
    fn into_detection_set(self) -> DetectionSet {
        self.unwrap_or_default()
    }
}

impl IntoDetectionSet for Vec<[f32; 4]> {
    fn into_detection_set(self) -> DetectionSet {
        DetectionSet {
            bbox: self.into_iter().map(Vec::from).collect(),
            ..DetectionSet::default()
        }
    }
}

/// Rows of `x1, y1, x2, y2[, conf[, cls]]`.
///
/// A matrix with fewer than four columns produces short rows, which the
/// counter skips as malformed.
impl IntoDetectionSet for Array2<f32> {
    fn into_detection_set(self) -> DetectionSet {
        let cols = self.ncols();
        let mut set = DetectionSet::default();
        for row in self.axis_iter(Axis(0)) {
            set.bbox.push(row.iter().take(4).copied().collect());
            if cols > 4 {
                set.conf.push(row[4]);
            }
            if cols > 5 {
                set.cls_id.push(row[5]);
            }
        }
        set
    }
}
