//! Detector that replays recorded detections.
//!
//! The recording is JSON lines, one line per frame, in frame order. Each line
//! is either a detection mapping such as
//! `{"bbox": [[x1, y1, x2, y2], ...], "cls_id": [...], "conf": [...]}` or
//! `null` for a frame where the model produced nothing.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::counting::DetectionSet;
use crate::error::{Error, Result};

use super::{DetectionSource, IntoDetectionSet};

/// Replays a JSON-lines detections recording, one line per `detect` call.
pub struct ReplayDetector<R: BufRead> {
    lines: Lines<R>,
    frame: u64,
}

impl ReplayDetector<BufReader<File>> {
    /// Open a recording file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::Detector(format!("cannot open detections {}: {e}", path.display()))
        })?;
        log::info!("replaying detections from {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplayDetector<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            frame: 0,
        }
    }

    /// Number of frames served so far.
    pub fn frames_served(&self) -> u64 {
        self.frame
    }

    /// Drop the recording of a frame that never reached the detector.
    pub fn skip(&mut self) {
        self.frame += 1;
        let _ = self.lines.next();
    }

    fn next_set(&mut self) -> Result<DetectionSet> {
        let frame = self.frame;
        self.frame += 1;
        let line = match self.lines.next() {
            Some(line) => line?,
            None => {
                return Err(Error::Detector(format!(
                    "no recorded detections for frame {frame}"
                )));
            }
        };
        let parsed: Option<DetectionSet> = serde_json::from_str(&line)
            .map_err(|e| Error::Detector(format!("frame {frame}: {e}")))?;
        Ok(parsed.into_detection_set())
    }
}

impl<R: BufRead> DetectionSource for ReplayDetector<R> {
    type Error = Error;

    fn detect(&mut self, _pixels: &[u8], _width: u32, _height: u32) -> Result<DetectionSet> {
        self.next_set()
    }
}
