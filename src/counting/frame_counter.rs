//! Per-frame pill counting against the region of interest.

use image::RgbImage;

use crate::counting::annotate::{CENTER_COLOR, GLYPH_HEIGHT, TEXT_COLOR, draw_dot, draw_text};
use crate::counting::detection::{DetectionSet, FrameCount};
use crate::counting::geometry::{BoundingBox, OverlapThresholds, Point};
use crate::counting::region::Region;

const CENTER_RADIUS: i32 = 4;
const TEXT_SCALE: u32 = 3;
/// Bottom-left corner of the count label.
const TEXT_ANCHOR: Point = Point { x: 50, y: 50 };

/// Counts detections that overlap a session's region of interest.
///
/// Holds only the region and thresholds; nothing carries over between frames.
#[derive(Debug, Clone)]
pub struct FrameCounter {
    region: Region,
    thresholds: OverlapThresholds,
}

impl FrameCounter {
    pub fn new(region: Region, thresholds: OverlapThresholds) -> Self {
        Self { region, thresholds }
    }

    pub fn with_default_thresholds(region: Region) -> Self {
        Self::new(region, OverlapThresholds::default())
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn thresholds(&self) -> OverlapThresholds {
        self.thresholds
    }

    /// Centers of the detections that count for this frame, in detector order.
    ///
    /// Rows that are not four coordinates long are logged and skipped.
    pub fn counted_centers(&self, detections: &DetectionSet) -> Vec<Point> {
        let region = self.region.bbox();
        detections
            .boxes()
            .enumerate()
            .filter_map(|(idx, raw)| match BoundingBox::try_from(raw) {
                Ok(bbox) => Some(bbox),
                Err(err) => {
                    log::warn!("skipping detection {idx}: {err}");
                    None
                }
            })
            .filter(|bbox| bbox.overlaps(&region, self.thresholds))
            .map(|bbox| bbox.center())
            .collect()
    }

    /// Count the detections inside the region and mark each counted center on
    /// `frame`.
    pub fn count(&self, frame: &mut RgbImage, detections: &DetectionSet) -> FrameCount {
        let centers = self.counted_centers(detections);
        for center in &centers {
            draw_dot(frame, *center, CENTER_RADIUS, CENTER_COLOR);
        }
        log::debug!(
            "counted {} of {} detections",
            centers.len(),
            detections.len()
        );
        FrameCount::new(centers.len())
    }

    /// Render the `Pill Count: n` label. The bitmap font draws it in capitals.
    pub fn draw_total(&self, frame: &mut RgbImage, count: FrameCount) {
        let text = format!("Pill Count: {}", count.total_count);
        let origin = Point::new(
            TEXT_ANCHOR.x,
            TEXT_ANCHOR.y - (GLYPH_HEIGHT * TEXT_SCALE) as i32,
        );
        draw_text(frame, &text, origin, TEXT_SCALE, TEXT_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn counter() -> FrameCounter {
        FrameCounter::with_default_thresholds(Region::centered(640, 480, 500))
    }

    fn set(rows: &[&[f32]]) -> DetectionSet {
        DetectionSet {
            bbox: rows.iter().map(|r| r.to_vec()).collect(),
            ..DetectionSet::default()
        }
    }

    #[test]
    fn test_counts_only_boxes_in_region() {
        let detections = set(&[
            &[100.0, 100.0, 120.0, 120.0],
            &[0.0, 0.0, 20.0, 20.0],
            &[560.0, 200.0, 600.0, 240.0],
            &[600.0, 200.0, 640.0, 240.0],
        ]);
        let mut frame = RgbImage::from_pixel(640, 480, WHITE);
        let count = counter().count(&mut frame, &detections);

        // The third box straddles the right edge at x=570 with 10 of 40 pixels inside.
        assert_eq!(count.total_count, 2);
        assert_eq!(*frame.get_pixel(110, 110), CENTER_COLOR);
        assert_eq!(*frame.get_pixel(580, 220), CENTER_COLOR);
        assert_eq!(*frame.get_pixel(10, 10), WHITE);
        assert_eq!(*frame.get_pixel(620, 220), WHITE);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let detections = set(&[&[100.0, 100.0, 120.0], &[], &[150.0, 150.0, 170.0, 170.0]]);
        let mut frame = RgbImage::from_pixel(640, 480, WHITE);
        assert_eq!(counter().count(&mut frame, &detections).total_count, 1);
    }

    #[test]
    fn test_extreme_rows_do_not_disturb_the_count() {
        let detections = set(&[
            &[-1.0, 0.0, 1e19, 10.0],
            &[100.0, 100.0, 120.0, 120.0],
            &[1e19, 0.0, f32::MAX, 10.0],
            &[0.0, 0.0, 20.0, 20.0],
        ]);
        let mut frame = RgbImage::from_pixel(640, 480, WHITE);
        let count = counter().count(&mut frame, &detections);
        assert_eq!(count.total_count, 2);
        assert_eq!(*frame.get_pixel(110, 110), CENTER_COLOR);
    }

    #[test]
    fn test_empty_set_leaves_frame_untouched() {
        let mut frame = RgbImage::from_pixel(64, 48, WHITE);
        let before = frame.clone();
        let count = counter().count(&mut frame, &DetectionSet::new());
        assert_eq!(count, FrameCount::default());
        assert_eq!(frame, before);
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let region = Region::centered(640, 480, 500);
        // 10 of 40 pixels inside on x: 25%.
        let detections = set(&[&[560.0, 200.0, 600.0, 240.0]]);

        let loose = FrameCounter::new(region, OverlapThresholds::new(20.0, 20.0));
        let strict = FrameCounter::new(region, OverlapThresholds::new(50.0, 50.0));
        assert_eq!(loose.counted_centers(&detections).len(), 1);
        assert!(strict.counted_centers(&detections).is_empty());
    }

    #[test]
    fn test_draw_total() {
        let mut frame = RgbImage::from_pixel(640, 480, WHITE);
        counter().draw_total(&mut frame, FrameCount::new(7));
        let label_area = (50..400).flat_map(|x| (29..50).map(move |y| (x, y)));
        assert!(label_area.into_iter().any(|(x, y)| *frame.get_pixel(x, y) == TEXT_COLOR));
        assert_eq!(*frame.get_pixel(10, 10), WHITE);
    }
}
