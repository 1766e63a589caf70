//! Tone rasters handed over by an image source.
//!
//! Tones are stored row-major with row 0 at the top of the image. Output
//! space is y-up: row `r` of a raster with `rows` rows and extent height `H`
//! covers `y ∈ [H - (r + 1) * cell_height, H - r * cell_height]`.

use crate::error::{FillError, Result};
use crate::geometry::Rect;

/// A single raster cell in output-space units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterCell {
    pub col: usize,
    pub row: usize,
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    pub tone: f64,
}

/// A grid of tone values in `[0, 1]` (0 is black, 1 is white).
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    cols: usize,
    rows: usize,
    cell_width: f64,
    cell_height: f64,
    tones: Vec<f64>,
}

impl Raster {
    /// Creates a raster from row-major tones with unit-sized cells.
    pub fn new(cols: usize, rows: usize, tones: Vec<f64>) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(FillError::Raster(format!(
                "raster must have at least one cell, got {cols}x{rows}"
            )));
        }
        if tones.len() != cols * rows {
            return Err(FillError::Raster(format!(
                "expected {} tones for a {cols}x{rows} raster, got {}",
                cols * rows,
                tones.len()
            )));
        }
        if let Some(&bad) = tones.iter().find(|t| !(0.0..=1.0).contains(*t)) {
            return Err(FillError::config("tone", bad, "must lie in [0, 1]"));
        }
        Ok(Self {
            cols,
            rows,
            cell_width: 1.0,
            cell_height: 1.0,
            tones,
        })
    }

    /// Creates a raster from 8-bit luma samples, row-major.
    pub fn from_luma(cols: usize, rows: usize, luma: &[u8]) -> Result<Self> {
        Self::new(
            cols,
            rows,
            luma.iter().map(|&v| f64::from(v) / 255.0).collect(),
        )
    }

    /// Creates a raster from cells given in any order as `(col, row, tone)`.
    ///
    /// Every grid position must appear exactly once.
    pub fn from_cells(
        cols: usize,
        rows: usize,
        cells: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self> {
        let mut tones = vec![f64::NAN; cols * rows];
        for (col, row, tone) in cells {
            if col >= cols || row >= rows {
                return Err(FillError::Raster(format!(
                    "cell ({col}, {row}) outside {cols}x{rows} raster"
                )));
            }
            tones[row * cols + col] = tone;
        }
        if let Some(missing) = tones.iter().position(|t| t.is_nan()) {
            return Err(FillError::Raster(format!(
                "cell ({}, {}) has no tone",
                missing % cols,
                missing / cols
            )));
        }
        Self::new(cols, rows, tones)
    }

    /// Scales the cells so the raster spans `width` x `height` output units.
    pub fn with_extent(mut self, width: f64, height: f64) -> Self {
        self.cell_width = width / self.cols as f64;
        self.cell_height = height / self.rows as f64;
        self
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    pub fn width(&self) -> f64 {
        self.cell_width * self.cols as f64
    }

    pub fn height(&self) -> f64 {
        self.cell_height * self.rows as f64
    }

    pub fn tone(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.tones[row * self.cols + col])
    }

    /// Output-space rectangle of a cell.
    pub fn cell_rect(&self, col: usize, row: usize) -> Rect {
        let (y0, y1) = self.row_span(row);
        (
            col as f64 * self.cell_width,
            y0,
            (col + 1) as f64 * self.cell_width,
            y1,
        )
    }

    /// Vertical extent `(bottom, top)` of a row. Adjacent rows share the
    /// exact same boundary value.
    pub fn row_span(&self, row: usize) -> (f64, f64) {
        (
            (self.rows - 1 - row) as f64 * self.cell_height,
            (self.rows - row) as f64 * self.cell_height,
        )
    }

    /// Iterates the cells row by row, top row first.
    pub fn cells(&self) -> impl Iterator<Item = RasterCell> + '_ {
        self.tones.iter().enumerate().map(move |(i, &tone)| {
            let (col, row) = (i % self.cols, i / self.cols);
            let (x, y, _, _) = self.cell_rect(col, row);
            RasterCell {
                col,
                row,
                x,
                y,
                tone,
            }
        })
    }

    /// Tones of one row, left to right.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.tones[row * self.cols..(row + 1) * self.cols]
    }
}
