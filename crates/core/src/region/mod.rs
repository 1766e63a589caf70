//! Region extraction.
//!
//! Classifies raster cells against a tone threshold and merges same-class
//! cells into areas:
//! - `extract_regions`: connected regions of both classes plus the unioned
//!   target area
//! - `buffer_area`: signed offset of the target area

mod buffer;

pub use buffer::buffer_area;

use tracing::debug;

use crate::error::{FillError, Result, Stage};
use crate::geometry::{Area, Band, Span};
use crate::params::Tone;
use crate::raster::Raster;

/// A maximal connected set of same-class cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// True if the cells match the target tone.
    pub target: bool,
    pub area: Area,
}

/// Result of region extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMap {
    /// Partition of the raster, top-to-bottom then left-to-right.
    pub regions: Vec<Region>,
    /// Union of every target cell.
    pub target: Area,
    /// Union of every non-target cell.
    pub non_target: Area,
}

impl RegionMap {
    pub fn target_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.target)
    }
}

/// Splits a raster into target and non-target regions.
///
/// Cells are merged row by row into runs, and runs into bands; the band
/// representation never holds overlapping or degenerate pieces, so the
/// merged areas need no further repair.
pub fn extract_regions(raster: &Raster, threshold: f64, target: Tone) -> Result<RegionMap> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(FillError::config(
            "threshold",
            threshold,
            "must lie in [0, 1]",
        )
        .in_stage(Stage::Extract));
    }

    let cell_w = raster.cell_width();
    let mut target_bands = Vec::with_capacity(raster.rows());
    let mut other_bands = Vec::with_capacity(raster.rows());
    for row in (0..raster.rows()).rev() {
        let (bottom, top) = raster.row_span(row);
        let (hits, misses) = row_runs(raster.row(row), cell_w, |tone| {
            target.matches(tone, threshold)
        });
        target_bands.push(Band::new(bottom, top, hits));
        other_bands.push(Band::new(bottom, top, misses));
    }
    let target_area = Area::from_bands(target_bands);
    let other_area = Area::from_bands(other_bands);

    let mut regions: Vec<Region> = target_area
        .components()
        .into_iter()
        .map(|area| Region { target: true, area })
        .chain(
            other_area
                .components()
                .into_iter()
                .map(|area| Region {
                    target: false,
                    area,
                }),
        )
        .collect();
    regions.sort_by(|a, b| {
        let (ax, ay) = first_cell(&a.area);
        let (bx, by) = first_cell(&b.area);
        by.total_cmp(&ay).then(ax.total_cmp(&bx))
    });

    debug!(
        regions = regions.len(),
        target_regions = regions.iter().filter(|r| r.target).count(),
        target_area = target_area.area(),
        "extracted regions"
    );

    Ok(RegionMap {
        regions,
        target: target_area,
        non_target: other_area,
    })
}

/// Top-left corner `(x, top)` of an area's topmost, leftmost span.
fn first_cell(area: &Area) -> (f64, f64) {
    area.bands()
        .last()
        .map(|band| (band.spans()[0].0, band.top()))
        .unwrap_or((0.0, 0.0))
}

/// Splits a row into maximal runs of matching and non-matching cells.
fn row_runs(
    tones: &[f64],
    cell_w: f64,
    is_target: impl Fn(f64) -> bool,
) -> (Vec<Span>, Vec<Span>) {
    let mut hits = Vec::new();
    let mut misses = Vec::new();
    let mut start = 0;
    for col in 1..=tones.len() {
        let class = is_target(tones[start]);
        if col < tones.len() && is_target(tones[col]) == class {
            continue;
        }
        let run = (start as f64 * cell_w, col as f64 * cell_w);
        if class {
            hits.push(run);
        } else {
            misses.push(run);
        }
        start = col;
    }
    (hits, misses)
}
