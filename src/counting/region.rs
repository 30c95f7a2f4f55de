//! Region of interest: a fixed square centered in the frame.

use image::RgbImage;

use super::annotate::{REGION_COLOR, draw_outline};
use super::geometry::BoundingBox;

/// Default side length of the counting square, in pixels.
pub const DEFAULT_SQUARE_SIZE: u32 = 500;

const OUTLINE_THICKNESS: u32 = 2;

/// Counting region, fixed for a whole session.
///
/// The square is not clamped to the frame; on small frames it extends past
/// the edges and partially visible detections are still measured against the
/// full square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    x: i32,
    y: i32,
    size: u32,
}

impl Region {
    /// Square of side `square_size` centered in a `frame_width` x `frame_height` frame.
    pub fn centered(frame_width: u32, frame_height: u32, square_size: u32) -> Self {
        let half = (square_size / 2) as i32;
        Self {
            x: (frame_width / 2) as i32 - half,
            y: (frame_height / 2) as i32 - half,
            size: square_size,
        }
    }

    /// `[x1, y1, x2, y2]` in pixel coordinates. The far edges saturate at
    /// `i32::MAX` for squares wider than the coordinate range.
    pub fn coords(&self) -> [i32; 4] {
        let size = i32::try_from(self.size).unwrap_or(i32::MAX);
        [
            self.x,
            self.y,
            self.x.saturating_add(size),
            self.y.saturating_add(size),
        ]
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn bbox(&self) -> BoundingBox {
        let [x1, y1, x2, y2] = self.coords();
        BoundingBox::new(x1 as f32, y1 as f32, x2 as f32, y2 as f32)
    }

    /// Outline the region on `frame`.
    pub fn draw(&self, frame: &mut RgbImage) {
        draw_outline(
            frame,
            self.x,
            self.y,
            self.size,
            self.size,
            REGION_COLOR,
            OUTLINE_THICKNESS,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_centered_region() {
        let region = Region::centered(640, 480, 500);
        assert_eq!(region.coords(), [70, -10, 570, 490]);
        assert_eq!(region.bbox().to_xyxy(), [70.0, -10.0, 570.0, 490.0]);
    }

    #[test]
    fn test_odd_dimensions_floor() {
        let region = Region::centered(101, 51, 11);
        // center (50, 25), half 5
        assert_eq!(region.coords(), [45, 20, 56, 31]);
    }

    #[test]
    fn test_region_larger_than_frame() {
        let region = Region::centered(100, 100, 500);
        assert_eq!(region.coords(), [-200, -200, 300, 300]);
    }

    #[test]
    fn test_huge_square_saturates() {
        let region = Region::centered(640, 480, 3_000_000_000);
        assert_eq!(
            region.coords(),
            [-1_499_999_680, -1_499_999_760, i32::MAX, i32::MAX]
        );

        let region = Region::centered(640, 480, u32::MAX);
        let [x1, y1, x2, y2] = region.coords();
        assert!(x1 < 0 && y1 < 0);
        assert_eq!((x2, y2), (i32::MAX, i32::MAX));

        let mut frame = RgbImage::new(64, 48);
        region.draw(&mut frame);
    }

    #[test]
    fn test_draw_region() {
        let white = Rgb([255, 255, 255]);
        let mut frame = RgbImage::from_pixel(40, 40, white);
        let region = Region::centered(40, 40, 20);
        region.draw(&mut frame);
        assert_eq!(*frame.get_pixel(10, 10), REGION_COLOR);
        assert_eq!(*frame.get_pixel(9, 9), REGION_COLOR);
        assert_eq!(*frame.get_pixel(20, 20), white);
    }
}
