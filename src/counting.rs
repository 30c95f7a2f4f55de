mod annotate;
mod detection;
mod frame_counter;
pub mod geometry;
mod region;

pub use annotate::{CENTER_COLOR, REGION_COLOR, TEXT_COLOR, draw_dot, draw_outline, draw_text};
pub use detection::{DetectionSet, FrameCount};
pub use frame_counter::FrameCounter;
pub use geometry::{
    BoundingBox, GeometryError, OverlapThresholds, Point, center_of, overlaps, try_overlaps,
};
pub use region::{DEFAULT_SQUARE_SIZE, Region};
