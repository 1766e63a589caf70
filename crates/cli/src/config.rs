//! Run configuration: defaults, then an optional JSON file, then flags.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tonefill_core::metrics::FontFace;
use tonefill_core::packer::{JustifySpaces, PackOptions, SpaceRunPolicy};
use tonefill_core::params::{FillParams, Tone};

pub const DEFAULT_GRID: usize = 100;
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Target tone as written in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetTone {
    Dark,
    Light,
}

impl From<TargetTone> for Tone {
    fn from(t: TargetTone) -> Self {
        match t {
            TargetTone::Dark => Tone::Dark,
            TargetTone::Light => Tone::Light,
        }
    }
}

/// Every setting a config file may carry. Missing fields keep their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub threshold: Option<f64>,
    pub target: Option<TargetTone>,
    pub buffer: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub grid: Option<usize>,
    pub font: Option<String>,
    pub font_size: Option<f64>,
    pub line_spacing: Option<f64>,
    pub repeat: Option<bool>,
    pub consume_spaces: Option<bool>,
    pub justify_spaces: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Fills every field left unset in `self` from `base`.
    pub fn or(self, base: FileConfig) -> FileConfig {
        FileConfig {
            threshold: self.threshold.or(base.threshold),
            target: self.target.or(base.target),
            buffer: self.buffer.or(base.buffer),
            width: self.width.or(base.width),
            height: self.height.or(base.height),
            grid: self.grid.or(base.grid),
            font: self.font.or(base.font),
            font_size: self.font_size.or(base.font_size),
            line_spacing: self.line_spacing.or(base.line_spacing),
            repeat: self.repeat.or(base.repeat),
            consume_spaces: self.consume_spaces.or(base.consume_spaces),
            justify_spaces: self.justify_spaces.or(base.justify_spaces),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub params: FillParams,
    pub grid: usize,
    pub face: FontFace,
    pub font_size: f64,
    pub repeat: bool,
}

impl RunConfig {
    /// Resolves `cfg` against the defaults. `aspect` is the image's
    /// height / width and sets the output height when none is given.
    pub fn resolve(cfg: FileConfig, aspect: f64) -> Result<Self> {
        let defaults = FillParams::default();
        let face = match cfg.font.as_deref() {
            None => FontFace::default(),
            Some(name) => FontFace::from_name(name)
                .with_context(|| format!("unknown font {name:?}, expected helvetica or courier"))?,
        };
        let font_size = cfg.font_size.unwrap_or(DEFAULT_FONT_SIZE);
        let line_spacing = cfg.line_spacing.unwrap_or(1.0);
        for (name, value) in [("font size", font_size), ("line spacing", line_spacing)] {
            if !(value.is_finite() && value > 0.0) {
                bail!("invalid {name} {value}: must be positive");
            }
        }
        let width = cfg.width.unwrap_or(defaults.width);
        let height = cfg.height.unwrap_or_else(|| {
            if cfg.width.is_some() {
                width * aspect
            } else {
                defaults.height
            }
        });

        let pack = PackOptions {
            space_run: if cfg.consume_spaces.unwrap_or(false) {
                SpaceRunPolicy::ConsumeLeadingSpaces
            } else {
                SpaceRunPolicy::SkipSlot
            },
            justify_spaces: if cfg.justify_spaces.unwrap_or(true) {
                JustifySpaces::Include
            } else {
                JustifySpaces::Exclude
            },
        };

        let params = FillParams {
            threshold: cfg.threshold.unwrap_or(defaults.threshold),
            target: cfg.target.map(Tone::from).unwrap_or(defaults.target),
            buffer: cfg.buffer.unwrap_or(defaults.buffer),
            width,
            height,
            line_height: font_size * line_spacing,
            pack,
        };
        params.validate()?;

        Ok(Self {
            params,
            grid: cfg.grid.unwrap_or(DEFAULT_GRID).max(1),
            face,
            font_size,
            repeat: cfg.repeat.unwrap_or(false),
        })
    }
}
