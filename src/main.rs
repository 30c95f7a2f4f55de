//! pill-counter - count pills in a stream of frames
//!
//! Reads frames from an image directory and the detector's output for each
//! frame from a JSON-lines recording. Prints one `{"total_count": n}` line per
//! frame and, when output is enabled, writes the annotated frames.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use pill_counter::{
    Config, CountingPipeline, FrameSink, FrameSource, ImageDirSink, ImageDirSource, Region,
    ReplayDetector,
};

#[derive(Parser, Debug)]
#[command(name = "pill-counter", version, about)]
struct Args {
    /// TOML config file
    #[arg(long, env = "PILL_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of PNG/JPEG frames, processed in file name order
    #[arg(long)]
    frames: Option<PathBuf>,

    /// JSON-lines detections recording, one line per frame
    #[arg(long)]
    detections: Option<PathBuf>,

    /// Write annotated frames here
    #[arg(long)]
    output: Option<PathBuf>,

    /// Side of the counting square, in pixels
    #[arg(long)]
    square_size: Option<u32>,

    /// Minimum horizontal overlap with the square, in percent
    #[arg(long)]
    x_threshold: Option<f32>,

    /// Minimum vertical overlap with the square, in percent
    #[arg(long)]
    y_threshold: Option<f32>,

    /// Log to <DIR>/<YYYY-MM-DD>.log instead of stderr
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn apply(&self, cfg: &mut Config) {
        if let Some(frames) = &self.frames {
            cfg.frames_dir = Some(frames.clone());
        }
        if let Some(detections) = &self.detections {
            cfg.detections_path = Some(detections.clone());
        }
        if let Some(output) = &self.output {
            cfg.output.dir = output.clone();
            cfg.output.enabled = true;
        }
        if let Some(size) = self.square_size {
            cfg.counting.square_size = size;
        }
        if let Some(pct) = self.x_threshold {
            cfg.counting.x_threshold_pct = pct;
        }
        if let Some(pct) = self.y_threshold {
            cfg.counting.y_threshold_pct = pct;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_dir.as_deref())?;

    let mut cfg = Config::load(args.config.as_deref())?;
    args.apply(&mut cfg);
    cfg.validate()?;

    let frames_dir = cfg
        .frames_dir
        .clone()
        .ok_or_else(|| anyhow!("no frames directory (use --frames or PILL_FRAMES_DIR)"))?;
    let detections_path = cfg
        .detections_path
        .clone()
        .ok_or_else(|| anyhow!("no detections file (use --detections or PILL_DETECTIONS_PATH)"))?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("failed to install Ctrl-C handler")?;
    }

    let mut source = ImageDirSource::open(&frames_dir)?;
    let mut detector = ReplayDetector::open(&detections_path)?;
    let mut sink = if cfg.output.enabled {
        log::info!("writing annotated frames to {}", cfg.output.dir.display());
        Some(ImageDirSink::create(&cfg.output.dir)?)
    } else {
        None
    };

    let mut index = 0u64;

    // The region is fixed for the session, sized from the first readable frame.
    let Some(first) = source.next_readable_frame(|err| {
        log::error!("frame {index}: {err}; skipping");
        detector.skip();
        index += 1;
    }) else {
        return Err(anyhow!("no readable frames in {}", frames_dir.display()));
    };
    let (width, height) = first.dimensions();
    let region = Region::centered(width, height, cfg.counting.square_size);
    log::info!(
        "counting region {:?} in {}x{} frames, thresholds x={}% y={}%",
        region.coords(),
        width,
        height,
        cfg.counting.x_threshold_pct,
        cfg.counting.y_threshold_pct
    );
    let mut pipeline = CountingPipeline::new(detector, region, cfg.counting.thresholds());

    let mut pending = Some(first);
    while running.load(Ordering::SeqCst) {
        let next = pending.take().or_else(|| {
            source.next_readable_frame(|err| {
                log::error!("frame {index}: {err}; skipping");
                pipeline.detector_mut().skip();
                index += 1;
            })
        });
        let Some(mut frame) = next else {
            break;
        };

        let count = pipeline.process_frame(&mut frame);
        println!("{}", serde_json::to_string(&count)?);

        if let Some(sink) = sink.as_mut() {
            if let Err(err) = sink.write_frame(index, &frame) {
                log::error!("frame {index}: failed to write annotated frame: {err}");
            }
        }
        index += 1;
    }

    if !running.load(Ordering::SeqCst) {
        log::info!("interrupted");
    }
    log::info!("processed {} of {} frames", index, source.total());
    Ok(())
}

fn init_logging(log_dir: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log dir {}", dir.display()))?;
        let path = dir.join(format!("{}.log", chrono::Local::now().format("%Y-%m-%d")));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
