//! Session configuration: TOML file, then `PILL_*` environment overrides.
//!
//! ```toml
//! [counting]
//! square_size = 500
//! x_threshold_pct = 10.0
//! y_threshold_pct = 10.0
//!
//! [source]
//! frames_dir = "frames"
//!
//! [detector]
//! detections_path = "detections.jsonl"
//!
//! [output]
//! enabled = true
//! dir = "annotated"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::counting::{DEFAULT_SQUARE_SIZE, OverlapThresholds};
use crate::error::{Error, Result};

const DEFAULT_THRESHOLD_PCT: f32 = 10.0;
const DEFAULT_OUTPUT_DIR: &str = "output";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PILL_CONFIG";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    counting: Option<CountingFile>,
    source: Option<SourceFile>,
    detector: Option<DetectorFile>,
    output: Option<OutputFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CountingFile {
    square_size: Option<u32>,
    x_threshold_pct: Option<f32>,
    y_threshold_pct: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceFile {
    frames_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorFile {
    detections_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct OutputFile {
    enabled: Option<bool>,
    dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub counting: CountingSettings,
    pub frames_dir: Option<PathBuf>,
    pub detections_path: Option<PathBuf>,
    pub output: OutputSettings,
}

/// Numbers that shape the count itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountingSettings {
    pub square_size: u32,
    pub x_threshold_pct: f32,
    pub y_threshold_pct: f32,
}

impl CountingSettings {
    pub fn thresholds(&self) -> OverlapThresholds {
        OverlapThresholds::new(self.x_threshold_pct, self.y_threshold_pct)
    }
}

impl Default for CountingSettings {
    fn default() -> Self {
        Self {
            square_size: DEFAULT_SQUARE_SIZE,
            x_threshold_pct: DEFAULT_THRESHOLD_PCT,
            y_threshold_pct: DEFAULT_THRESHOLD_PCT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(ConfigFile::default())
    }
}

impl Config {
    /// Load from `path`, or from `$PILL_CONFIG` when no path is given, then
    /// apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let file = match path.or(env_path.as_deref()) {
            Some(path) => read_config_file(path)?,
            None => ConfigFile::default(),
        };
        let mut cfg = Self::from_file(file);
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML document without touching the environment.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let cfg = Self::from_file(toml::from_str(raw)?);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ConfigFile) -> Self {
        let counting = file.counting.unwrap_or_default();
        let defaults = CountingSettings::default();
        let output = file.output.unwrap_or_default();
        Self {
            counting: CountingSettings {
                square_size: counting.square_size.unwrap_or(defaults.square_size),
                x_threshold_pct: counting.x_threshold_pct.unwrap_or(defaults.x_threshold_pct),
                y_threshold_pct: counting.y_threshold_pct.unwrap_or(defaults.y_threshold_pct),
            },
            frames_dir: file.source.and_then(|s| s.frames_dir),
            detections_path: file.detector.and_then(|d| d.detections_path),
            output: OutputSettings {
                enabled: output.enabled.unwrap_or(false),
                dir: output
                    .dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            },
        }
    }

    /// Apply `PILL_*` overrides read through `lookup`. Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("PILL_SQUARE_SIZE") {
            self.counting.square_size = parse_number("PILL_SQUARE_SIZE", &v)?;
        }
        if let Some(v) = get("PILL_X_THRESHOLD_PCT") {
            self.counting.x_threshold_pct = parse_number("PILL_X_THRESHOLD_PCT", &v)?;
        }
        if let Some(v) = get("PILL_Y_THRESHOLD_PCT") {
            self.counting.y_threshold_pct = parse_number("PILL_Y_THRESHOLD_PCT", &v)?;
        }
        if let Some(v) = get("PILL_FRAMES_DIR") {
            self.frames_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("PILL_DETECTIONS_PATH") {
            self.detections_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("PILL_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(v);
            self.output.enabled = true;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.counting.square_size == 0 {
            return Err(Error::Config("square_size must be greater than zero".into()));
        }
        for (name, pct) in [
            ("x_threshold_pct", self.counting.x_threshold_pct),
            ("y_threshold_pct", self.counting.y_threshold_pct),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(Error::Config(format!(
                    "{name} must be between 0 and 100, got {pct}"
                )));
            }
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("failed to read config file {}: {e}", path.display()))
    })?;
    toml::from_str(&raw)
        .map_err(|e| Error::Config(format!("invalid config file {}: {e}", path.display())))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} must be a number, got {value:?}")))
}
