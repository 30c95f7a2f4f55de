//! Builder for assembling a `DetectionSet` one detection at a time.

use crate::counting::{BoundingBox, DetectionSet};

/// Builder for `DetectionSet`, keeping `bbox`, `conf` and `cls_id` parallel.
#[derive(Debug, Clone, Default)]
pub struct DetectionSetBuilder {
    set: DetectionSet,
}

impl DetectionSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detection in XYXY format (x_min, y_min, x_max, y_max).
    pub fn xyxy(self, x1: f32, y1: f32, x2: f32, y2: f32, score: f32, class_id: f32) -> Self {
        self.push(BoundingBox::new(x1, y1, x2, y2), score, class_id)
    }

    /// Add a detection in XYWH format (center_x, center_y, width, height).
    pub fn xywh(self, cx: f32, cy: f32, w: f32, h: f32, score: f32, class_id: f32) -> Self {
        self.push(BoundingBox::from_xywh(cx, cy, w, h), score, class_id)
    }

    /// Add a detection in TLWH format (left, top, width, height).
    pub fn tlwh(self, l: f32, t: f32, w: f32, h: f32, score: f32, class_id: f32) -> Self {
        self.push(BoundingBox::new(l, t, l + w, t + h), score, class_id)
    }

    pub fn push(mut self, bbox: BoundingBox, score: f32, class_id: f32) -> Self {
        self.set.bbox.push(bbox.to_xyxy().to_vec());
        self.set.conf.push(score);
        self.set.cls_id.push(class_id);
        self
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn build(self) -> DetectionSet {
        self.set
    }
}
