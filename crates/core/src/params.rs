//! Fill parameters.
//!
//! Contains the FillParams struct for controlling region extraction, slot
//! generation and packing.

use crate::error::{FillError, Result};
use crate::packer::PackOptions;

/// Tonal class that receives text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    /// Cells with tone at or below the threshold.
    #[default]
    Dark,
    /// Cells with tone above the threshold.
    Light,
}

impl Tone {
    /// Classification rule shared by every stage: a cell is a target cell iff
    /// it falls on this side of `threshold`.
    #[inline]
    pub fn matches(self, tone: f64, threshold: f64) -> bool {
        match self {
            Tone::Dark => tone <= threshold,
            Tone::Light => tone > threshold,
        }
    }
}

/// Parameters for a fill run.
///
/// All linear values share the output unit (points in the CLI).
#[derive(Debug, Clone, PartialEq)]
pub struct FillParams {
    /// Tone threshold in [0, 1].
    pub threshold: f64,

    /// Which side of the threshold is filled with text.
    pub target: Tone,

    /// Signed offset applied to the target area. Negative values keep text
    /// away from region edges, positive values let it spill over.
    pub buffer: f64,

    /// Output width.
    pub width: f64,

    /// Output height.
    pub height: f64,

    /// Slot height and scanline spacing.
    pub line_height: f64,

    /// Packing policies.
    pub pack: PackOptions,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            target: Tone::Dark,
            buffer: 0.0,
            width: 612.0,
            height: 792.0,
            line_height: 10.0,
            pack: PackOptions::default(),
        }
    }
}

impl FillParams {
    /// Checks that every value is physical. Runs before any geometry work.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(FillError::config(
                "threshold",
                self.threshold,
                "must lie in [0, 1]",
            ));
        }
        if !self.buffer.is_finite() {
            return Err(FillError::config("buffer", self.buffer, "must be finite"));
        }
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("line_height", self.line_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FillError::config(name, value, "must be positive"));
            }
        }
        Ok(())
    }
}
