//! Error types for the tonefill pipeline.

use std::fmt;

use thiserror::Error;

/// Pipeline stage that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Buffer,
    Slots,
    Metrics,
    Pack,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "region extraction",
            Stage::Buffer => "region buffer",
            Stage::Slots => "slot generation",
            Stage::Metrics => "metrics cache",
            Stage::Pack => "packing",
        };
        f.write_str(name)
    }
}

/// Primary error type for fill operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FillError {
    #[error("{stage} failed: {reason}")]
    Geometry { stage: Stage, reason: String },

    #[error("character {ch:?} has no measurable width")]
    UnmeasurableCharacter { ch: char },

    #[error("invalid {name} = {value}: {reason}")]
    Configuration {
        /// Stage that rejected the value; `None` when caught up front.
        stage: Option<Stage>,
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid raster: {0}")]
    Raster(String),
}

impl FillError {
    /// Stage the error belongs to, when it is tied to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            FillError::Geometry { stage, .. } => Some(*stage),
            FillError::UnmeasurableCharacter { .. } => Some(Stage::Metrics),
            FillError::Configuration { stage, .. } => *stage,
            FillError::Raster(_) => None,
        }
    }

    /// True when the error means the usable area vanished, i.e. no placement
    /// is possible.
    pub fn is_empty_area(&self) -> bool {
        matches!(self, FillError::Geometry { .. })
    }

    pub(crate) fn config(name: &'static str, value: f64, reason: &'static str) -> Self {
        FillError::Configuration {
            stage: None,
            name,
            value,
            reason,
        }
    }

    /// Tags a configuration error with the stage that raised it.
    pub(crate) fn in_stage(self, stage: Stage) -> Self {
        match self {
            FillError::Configuration {
                stage: None,
                name,
                value,
                reason,
            } => FillError::Configuration {
                stage: Some(stage),
                name,
                value,
                reason,
            },
            other => other,
        }
    }
}

/// Convenience Result type alias for FillError.
pub type Result<T> = std::result::Result<T, FillError>;
