//! Frame sources and sinks for driving a pipeline from disk.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::{Error, Result};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Supplies frames in acquisition order.
pub trait FrameSource {
    /// Next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;

    /// Next frame that loads, passing each unreadable frame's error to
    /// `on_unreadable` on the way. `None` at end of stream.
    fn next_readable_frame(&mut self, mut on_unreadable: impl FnMut(Error)) -> Option<RgbImage>
    where
        Self: Sized,
    {
        loop {
            match self.next_frame() {
                Ok(frame) => return frame,
                Err(err) => on_unreadable(err),
            }
        }
    }
}

/// Consumes annotated frames.
pub trait FrameSink {
    fn write_frame(&mut self, index: u64, frame: &RgbImage) -> Result<()>;
}

/// Reads every PNG/JPEG file of a directory as one frame, in file name order.
#[derive(Debug)]
pub struct ImageDirSource {
    paths: std::vec::IntoIter<PathBuf>,
    total: usize,
}

impl ImageDirSource {
    /// Scan `dir` for frames. Fails if the directory cannot be read or holds no
    /// frames.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| Error::Source(format!("cannot read {}: {e}", dir.display())))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_frame_file(&path) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(Error::Source(format!(
                "no PNG or JPEG frames in {}",
                dir.display()
            )));
        }
        paths.sort();

        log::info!("found {} frames in {}", paths.len(), dir.display());
        Ok(Self {
            total: paths.len(),
            paths: paths.into_iter(),
        })
    }

    /// Total number of frames found at open time.
    pub fn total(&self) -> usize {
        self.total
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        match self.paths.next() {
            Some(path) => {
                let frame = image::open(&path)?.to_rgb8();
                log::debug!("loaded {}", path.display());
                Ok(Some(frame))
            }
            None => Ok(None),
        }
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Writes annotated frames as `frame_NNNNNN.png` into a directory.
#[derive(Debug)]
pub struct ImageDirSink {
    dir: PathBuf,
}

impl ImageDirSink {
    /// Create the output directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl FrameSink for ImageDirSink {
    fn write_frame(&mut self, index: u64, frame: &RgbImage) -> Result<()> {
        frame.save(self.frame_path(index))?;
        Ok(())
    }
}
