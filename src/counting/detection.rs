//! Per-frame detector output and count.

use serde::{Deserialize, Serialize};

/// Detector output for one frame.
///
/// `bbox` holds raw `[x_min, y_min, x_max, y_max]` rows exactly as the
/// detector produced them; rows with the wrong number of coordinates are kept
/// here and skipped at counting time. `cls_id` and `conf` run parallel to
/// `bbox` when present and are not used for counting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSet {
    pub bbox: Vec<Vec<f32>>,
    #[serde(default)]
    pub cls_id: Vec<f32>,
    #[serde(default)]
    pub conf: Vec<f32>,
}

impl DetectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bbox.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bbox.is_empty()
    }

    /// Raw coordinate rows, in detector order.
    pub fn boxes(&self) -> impl Iterator<Item = &[f32]> {
        self.bbox.iter().map(Vec::as_slice)
    }
}

/// Number of detections counted in a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCount {
    pub total_count: usize,
}

impl FrameCount {
    pub fn new(total_count: usize) -> Self {
        Self { total_count }
    }
}
