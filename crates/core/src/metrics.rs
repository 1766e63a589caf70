//! Character width measurement and caching.
//!
//! The core never measures glyphs itself; it asks a `MeasureText` provider
//! once per distinct character and keeps the answers in a `WidthTable`.
//! Two providers ship with the crate:
//! - `FixedWidth`: every character has the same advance
//! - `StandardFont`: AFM advance widths of the standard Helvetica and Courier
//!   faces for the WinAnsi character set (printable ASCII, Latin-1 and the
//!   typographic extras such as curly quotes and dashes)

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{FillError, Result};

/// Width-measurement capability.
///
/// Returns the advance of `ch` in output units, or `None` if the character
/// cannot be measured. Implementations must be deterministic for the
/// duration of a run.
pub trait MeasureText {
    fn char_width(&self, ch: char) -> Option<f64>;
}

impl<F> MeasureText for F
where
    F: Fn(char) -> Option<f64>,
{
    fn char_width(&self, ch: char) -> Option<f64> {
        self(ch)
    }
}

/// Every character has the same advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidth(pub f64);

impl MeasureText for FixedWidth {
    fn char_width(&self, _ch: char) -> Option<f64> {
        Some(self.0)
    }
}

/// Standard PDF base faces with built-in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFace {
    #[default]
    Helvetica,
    Courier,
}

impl FontFace {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "helvetica" | "arial" | "sans" | "sans-serif" => Some(FontFace::Helvetica),
            "courier" | "mono" | "monospace" => Some(FontFace::Courier),
            _ => None,
        }
    }

    /// CSS/SVG family name.
    pub fn family(self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica, Arial, sans-serif",
            FontFace::Courier => "Courier, monospace",
        }
    }

    /// Advance of `ch` in 1/1000 em, or `None` outside WinAnsi.
    fn units(self, ch: char) -> Option<u16> {
        let code = ch as usize;
        let helvetica = match code {
            0x20..=0x7E => HELVETICA_WIDTHS[code - 0x20],
            0xA0..=0xFF => HELVETICA_LATIN1_WIDTHS[code - 0xA0],
            _ => helvetica_extra(ch)?,
        };
        Some(match self {
            FontFace::Helvetica => helvetica,
            FontFace::Courier => COURIER_WIDTH,
        })
    }
}

/// A standard face at a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardFont {
    pub face: FontFace,
    pub size: f64,
}

impl StandardFont {
    pub fn new(face: FontFace, size: f64) -> Self {
        Self { face, size }
    }
}

impl MeasureText for StandardFont {
    fn char_width(&self, ch: char) -> Option<f64> {
        self.face
            .units(ch)
            .map(|units| f64::from(units) * self.size / 1000.0)
    }
}

/// Width of every glyph in Courier.
const COURIER_WIDTH: u16 = 600;

/// Helvetica advance widths for ASCII 0x20..=0x7E.
/// Index = (char as usize) - 32.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    222, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica advance widths for U+00A0..=U+00FF.
/// Index = (char as usize) - 0xA0.
#[rustfmt::skip]
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica widths for the characters WinAnsi places at 0x80..=0x9F.
fn helvetica_extra(ch: char) -> Option<u16> {
    Some(match ch {
        '\u{20AC}' => 556, // euro
        '\u{201A}' => 222, // single low quote
        '\u{0192}' => 556, // florin
        '\u{201E}' => 333, // double low quote
        '\u{2026}' => 1000, // ellipsis
        '\u{2020}' | '\u{2021}' => 556,
        '\u{02C6}' | '\u{02DC}' => 333,
        '\u{2030}' => 1000, // per mille
        '\u{0160}' => 667,
        '\u{2039}' | '\u{203A}' => 333,
        '\u{0152}' => 1000,
        '\u{017D}' => 611,
        '\u{2018}' | '\u{2019}' => 222,
        '\u{201C}' | '\u{201D}' => 333,
        '\u{2022}' => 350,
        '\u{2013}' => 556,
        '\u{2014}' => 1000,
        '\u{2122}' => 1000,
        '\u{0161}' | '\u{017E}' => 500,
        '\u{0153}' => 944,
        '\u{0178}' => 667,
        _ => return None,
    })
}

/// Character-to-width mapping for one run.
///
/// Built once before packing and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct WidthTable {
    widths: FxHashMap<char, f64>,
    min_width: f64,
}

impl WidthTable {
    /// Measures every distinct character of `text` exactly once.
    ///
    /// Distinct characters are measured in parallel; the table is only
    /// returned once every measurement has completed.
    pub fn build<M>(text: &[char], measurer: &M) -> Result<Self>
    where
        M: MeasureText + Sync + ?Sized,
    {
        let mut distinct: Vec<char> = text
            .iter()
            .copied()
            .collect::<FxHashSet<char>>()
            .into_iter()
            .collect();
        distinct.sort_unstable();

        let measured: Vec<(char, Option<f64>)> = distinct
            .par_iter()
            .map(|&ch| (ch, measurer.char_width(ch)))
            .collect();

        let mut widths = FxHashMap::with_capacity_and_hasher(measured.len(), Default::default());
        let mut min_width = f64::INFINITY;
        for (ch, width) in measured {
            let width = match width {
                Some(w) if w.is_finite() && w >= 0.0 => w,
                _ => return Err(FillError::UnmeasurableCharacter { ch }),
            };
            min_width = min_width.min(width);
            widths.insert(ch, width);
        }
        if widths.is_empty() {
            min_width = 0.0;
        }

        debug!(distinct = widths.len(), min_width, "built width table");
        Ok(Self { widths, min_width })
    }

    pub fn width(&self, ch: char) -> Option<f64> {
        self.widths.get(&ch).copied()
    }

    /// Per-occurrence widths of `chars`, in order.
    pub fn widths_for(&self, chars: &[char]) -> Result<Vec<f64>> {
        chars
            .iter()
            .map(|&ch| {
                self.width(ch)
                    .ok_or(FillError::UnmeasurableCharacter { ch })
            })
            .collect()
    }

    /// Smallest width over all distinct characters; 0 for an empty table.
    pub fn min_width(&self) -> f64 {
        self.min_width
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
        self.widths.iter().map(|(&ch, &w)| (ch, w))
    }
}
