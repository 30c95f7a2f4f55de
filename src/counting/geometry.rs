//! Bounding box geometry: centers and per-axis discrete overlap.
//!
//! Overlap is measured on pixel spans treated as integer sets: a span from
//! `min` to `max` covers the pixels `floor(min)..ceil(max)`. The overlap
//! percentage along an axis is the size of the shared pixel set relative to
//! each box's own span, and the larger of the two ratios is kept. A small box
//! fully inside a larger one therefore scores 100% regardless of how big the
//! larger box is.

use thiserror::Error;

/// Why a raw coordinate list could not be used as a bounding box.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("bounding box is missing")]
    Missing,
    #[error("bounding box has {len} coordinates, expected 4")]
    WrongArity { len: usize },
}

/// Integer pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Per-axis overlap thresholds, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapThresholds {
    pub x_pct: f32,
    pub y_pct: f32,
}

impl OverlapThresholds {
    #[inline]
    pub fn new(x_pct: f32, y_pct: f32) -> Self {
        Self { x_pct, y_pct }
    }
}

impl Default for OverlapThresholds {
    fn default() -> Self {
        Self {
            x_pct: 10.0,
            y_pct: 10.0,
        }
    }
}

/// Axis-aligned box in XYXY format (x_min, y_min, x_max, y_max).
///
/// Coordinate ordering is not validated; a box with `x_min > x_max` simply
/// has an empty span on that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    #[inline]
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Create a box from XYWH format (center x, center y, width, height).
    #[inline]
    pub fn from_xywh(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x_min: cx - width / 2.0,
            y_min: cy - height / 2.0,
            x_max: cx + width / 2.0,
            y_max: cy + height / 2.0,
        }
    }

    /// Convert to XYXY format.
    #[inline]
    pub fn to_xyxy(&self) -> [f32; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Midpoint truncated toward zero.
    #[inline]
    pub fn center(&self) -> Point {
        Point {
            x: ((self.x_min + self.x_max) / 2.0) as i32,
            y: ((self.y_min + self.y_max) / 2.0) as i32,
        }
    }

    /// Overlap percentages `(x, y)` between `self` and `other`.
    pub fn axis_overlap_pct(&self, other: &BoundingBox) -> (f64, f64) {
        let x = Span::new(self.x_min, self.x_max);
        let y = Span::new(self.y_min, self.y_max);
        (
            x.overlap_pct(&Span::new(other.x_min, other.x_max)),
            y.overlap_pct(&Span::new(other.y_min, other.y_max)),
        )
    }

    /// True when both axes reach their thresholds.
    pub fn overlaps(&self, other: &BoundingBox, thresholds: OverlapThresholds) -> bool {
        let (x, y) = self.axis_overlap_pct(other);
        x >= f64::from(thresholds.x_pct) && y >= f64::from(thresholds.y_pct)
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl TryFrom<&[f32]> for BoundingBox {
    type Error = GeometryError;

    fn try_from(coords: &[f32]) -> Result<Self, Self::Error> {
        match *coords {
            [x_min, y_min, x_max, y_max] => Ok(Self::new(x_min, y_min, x_max, y_max)),
            _ => Err(GeometryError::WrongArity { len: coords.len() }),
        }
    }
}

/// Half-open integer pixel span `start..end`.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: i64,
    end: i64,
}

impl Span {
    fn new(min: f32, max: f32) -> Self {
        Self {
            start: min.floor() as i64,
            end: max.ceil() as i64,
        }
    }

    // Coordinates past the i64 range saturate on conversion, so lengths
    // saturate as well.
    fn len(&self) -> i64 {
        self.end.saturating_sub(self.start).max(0)
    }

    fn intersection_len(&self, other: &Span) -> i64 {
        self.end
            .min(other.end)
            .saturating_sub(self.start.max(other.start))
            .max(0)
    }

    fn overlap_pct(&self, other: &Span) -> f64 {
        let shared = self.intersection_len(other) as f64 * 100.0;
        // An empty span divides by one.
        let own = self.len().max(1) as f64;
        let theirs = other.len().max(1) as f64;
        (shared / own).max(shared / theirs)
    }
}

fn parse(bbox: Option<&[f32]>) -> Result<BoundingBox, GeometryError> {
    bbox.ok_or(GeometryError::Missing)?.try_into()
}

/// Center of a raw `[x_min, y_min, x_max, y_max]` box.
///
/// Returns an error instead of a point when the box is absent or does not hold
/// exactly four coordinates; callers skip such detections.
pub fn center_of(bbox: Option<&[f32]>) -> Result<Point, GeometryError> {
    parse(bbox).map(|b| b.center())
}

/// Overlap test over raw boxes that reports malformed input.
pub fn try_overlaps(
    a: Option<&[f32]>,
    b: Option<&[f32]>,
    x_threshold_pct: f32,
    y_threshold_pct: f32,
) -> Result<bool, GeometryError> {
    let a = parse(a)?;
    let b = parse(b)?;
    Ok(a.overlaps(&b, OverlapThresholds::new(x_threshold_pct, y_threshold_pct)))
}

/// Overlap test over raw boxes. Absent or malformed boxes never overlap.
pub fn overlaps(
    a: Option<&[f32]>,
    b: Option<&[f32]>,
    x_threshold_pct: f32,
    y_threshold_pct: f32,
) -> bool {
    try_overlaps(a, b, x_threshold_pct, y_threshold_pct).unwrap_or(false)
}
