//! Signed buffering of the target area.

use tracing::debug;

use crate::error::{FillError, Result, Stage};
use crate::geometry::Area;

/// Grows (`distance > 0`) or shrinks (`distance < 0`) an area.
///
/// Uses a square structuring element so straight edges remain straight. An
/// empty result means no placement is possible and is reported as a
/// `Geometry` error.
pub fn buffer_area(area: &Area, distance: f64) -> Result<Area> {
    if !distance.is_finite() {
        return Err(
            FillError::config("buffer", distance, "must be finite").in_stage(Stage::Buffer)
        );
    }
    let usable = area.buffer(distance);
    if usable.is_empty() {
        return Err(FillError::Geometry {
            stage: Stage::Buffer,
            reason: format!("buffer of {distance} leaves no usable area"),
        });
    }
    debug!(
        distance,
        before = area.area(),
        after = usable.area(),
        "buffered target area"
    );
    Ok(usable)
}
