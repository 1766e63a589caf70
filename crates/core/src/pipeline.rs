//! End-to-end fill pipeline.
//!
//! Runs region extraction, buffering, slot generation, width measurement and
//! packing in order. Each stage consumes the immutable output of the one
//! before it; a failure stops the run at the stage boundary.

use tracing::{debug, debug_span};

use crate::error::Result;
use crate::geometry::Area;
use crate::metrics::{MeasureText, WidthTable};
use crate::packer::{Line, Placement, pack};
use crate::params::FillParams;
use crate::raster::Raster;
use crate::region::{RegionMap, buffer_area, extract_regions};
use crate::slots::{Slot, generate_slots};
use crate::text::prepare_stream;

/// Everything a renderer needs from one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub regions: RegionMap,
    /// Target area after buffering.
    pub usable: Area,
    /// Slots in reading order.
    pub slots: Vec<Slot>,
    pub placements: Vec<Placement>,
    pub lines: Vec<Line>,
    /// The character stream that was packed.
    pub stream: Vec<char>,
    /// Characters consumed from the front of `stream`.
    pub consumed: usize,
}

impl Layout {
    pub fn total(&self) -> usize {
        self.stream.len()
    }

    /// Count of characters that found no slot.
    pub fn remaining(&self) -> usize {
        self.stream.len() - self.consumed
    }

    /// The text that found no slot.
    pub fn unconsumed(&self) -> String {
        self.stream[self.consumed..].iter().collect()
    }
}

/// Fills the target regions of `raster` with `stream`.
///
/// The raster is stretched to `params.width` x `params.height`.
pub fn fill_stream<M>(
    raster: &Raster,
    stream: Vec<char>,
    params: &FillParams,
    measurer: &M,
) -> Result<Layout>
where
    M: MeasureText + Sync + ?Sized,
{
    params.validate()?;
    let raster = raster.clone().with_extent(params.width, params.height);

    let regions = {
        let _span = debug_span!("extract").entered();
        extract_regions(&raster, params.threshold, params.target)?
    };

    let usable = {
        let _span = debug_span!("buffer").entered();
        buffer_area(&regions.target, params.buffer)?
    };

    let slots = {
        let _span = debug_span!("slots").entered();
        generate_slots(&usable, params.width, params.height, params.line_height)?
    };

    let (widths, min_width) = {
        let _span = debug_span!("metrics").entered();
        let table = WidthTable::build(&stream, measurer)?;
        (table.widths_for(&stream)?, table.min_width())
    };

    let outcome = {
        let _span = debug_span!("pack").entered();
        pack(&slots, &stream, &widths, min_width, params.pack)?
    };

    debug!(
        slots = slots.len(),
        placed = outcome.placements.len(),
        consumed = outcome.consumed,
        total = stream.len(),
        "fill complete"
    );

    Ok(Layout {
        width: params.width,
        height: params.height,
        regions,
        usable,
        slots,
        placements: outcome.placements,
        lines: outcome.lines,
        stream,
        consumed: outcome.consumed,
    })
}

/// Same as [`fill_stream`], preparing `text` with [`prepare_stream`] first.
pub fn fill_text<M>(
    raster: &Raster,
    text: &str,
    params: &FillParams,
    measurer: &M,
) -> Result<Layout>
where
    M: MeasureText + Sync + ?Sized,
{
    fill_stream(raster, prepare_stream(text), params, measurer)
}
