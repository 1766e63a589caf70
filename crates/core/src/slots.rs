//! Slot generation.
//!
//! Sweeps horizontal scanlines across the usable area, turns every
//! intersection into a band of line height, and orders the resulting slots
//! top-to-bottom, left-to-right.

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::{FillError, Result, Stage};
use crate::geometry::{Area, HasBBox};

/// Decimal places kept from a slot's top edge when ordering slots, so slots
/// on the same row compare equal.
pub const READING_ORDER_DECIMALS: i32 = 3;

/// An axis-aligned rectangle that receives one line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Position in reading order.
    pub index: usize,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Slot {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            index: 0,
            left,
            bottom,
            right,
            top,
        }
    }
}

impl HasBBox for Slot {
    fn x0(&self) -> f64 {
        self.left
    }
    fn y0(&self) -> f64 {
        self.bottom
    }
    fn x1(&self) -> f64 {
        self.right
    }
    fn y1(&self) -> f64 {
        self.top
    }
}

/// Scanline heights, top first: `height - line_height / 2`, stepping down by
/// `line_height` while the position stays at or above zero.
pub fn scanlines(height: f64, line_height: f64) -> Vec<f64> {
    let first = height - line_height / 2.0;
    (0..)
        .map(|k| first - k as f64 * line_height)
        .take_while(|&y| y >= 0.0)
        .collect()
}

/// Generates the reading-ordered slots covering `usable`.
///
/// Zero slots is a valid result. Scanline spacing ignores local shape, so
/// features thinner than a line may be missed entirely.
pub fn generate_slots(
    usable: &Area,
    width: f64,
    height: f64,
    line_height: f64,
) -> Result<Vec<Slot>> {
    for (name, value) in [
        ("width", width),
        ("height", height),
        ("line_height", line_height),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(
                FillError::config(name, value, "must be positive").in_stage(Stage::Slots)
            );
        }
    }

    let lines = scanlines(height, line_height);
    let half = line_height / 2.0;
    let mut slots: Vec<Slot> = lines
        .par_iter()
        .map(|&y| scanline_slots(usable, y, width, half))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    sort_reading_order(&mut slots);
    debug!(scanlines = lines.len(), slots = slots.len(), "generated slots");
    Ok(slots)
}

/// Slots contributed by one scanline.
fn scanline_slots(usable: &Area, y: f64, width: f64, half: f64) -> Vec<Slot> {
    let segments = usable.intersect_hline(y, 0.0, width);
    if segments.is_empty() {
        return Vec::new();
    }
    // Flat caps: each segment becomes a rectangle exactly as wide as itself.
    let bands = Area::from_rects(
        segments.iter().map(|&(x0, x1)| (x0, y - half, x1, y + half)),
    );
    let slots: Vec<Slot> = bands
        .components()
        .iter()
        .filter_map(Area::bbox)
        .map(|(x0, y0, x1, y1)| Slot::new(x0, y0, x1, y1))
        .collect();
    trace!(y, segments = segments.len(), slots = slots.len(), "scanline");
    slots
}

/// Sorts slots top-to-bottom (rounded top, descending), then left-to-right,
/// and renumbers them. The sort is stable.
pub fn sort_reading_order(slots: &mut [Slot]) {
    slots.sort_by_key(|slot| {
        (
            std::cmp::Reverse(OrderedFloat(round_to(slot.top, READING_ORDER_DECIMALS))),
            OrderedFloat(slot.left),
        )
    });
    for (index, slot) in slots.iter_mut().enumerate() {
        slot.index = index;
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
