//! Greedy character packing and justification.
//!
//! The packer walks the slots in reading order and, for each one, takes the
//! longest prefix of the remaining stream that fits, trims one boundary
//! space on each side, and spreads the leftover width over the gaps. The
//! stream is never copied or shrunk; a cursor marks how much has been
//! consumed.

use std::ops::Range;

use tracing::trace;

use crate::error::{FillError, Result, Stage};
use crate::slots::Slot;

pub const SPACE: char = ' ';

/// What to do when every character that fits a slot is a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpaceRunPolicy {
    /// Leave the slot empty and consume nothing. A long space run then
    /// blocks every slot narrower than itself.
    #[default]
    SkipSlot,
    /// Consume the leading space run before measuring each line.
    ConsumeLeadingSpaces,
}

/// Whether spaces receive justification width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JustifySpaces {
    /// Every character but the last is widened.
    #[default]
    Include,
    /// Only non-space characters before the last are widened.
    Exclude,
}

/// Packing policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackOptions {
    pub space_run: SpaceRunPolicy,
    pub justify_spaces: JustifySpaces,
}

/// One placed character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Index of the slot in reading order.
    pub slot: usize,
    pub ch: char,
    /// Left edge of the character.
    pub x: f64,
    /// Baseline; the bottom edge of the slot.
    pub y: f64,
    /// Width occupied, justification included.
    pub advance: f64,
}

/// Stream bookkeeping for one filled slot. Ranges index the full stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub slot: usize,
    /// Characters removed from the stream, trimmed spaces included.
    pub consumed: Range<usize>,
    /// Characters actually placed.
    pub drawn: Range<usize>,
    /// Width added to each widened character.
    pub extra: f64,
}

/// Outcome of one slot transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotFill {
    Filled(Line),
    /// Not even the next character fits; nothing consumed.
    NoFit,
    /// Every fitting character is a space; nothing consumed.
    SpacesOnly,
    /// The stream is used up.
    Exhausted,
}

/// Cursor-based packing state machine.
#[derive(Debug, Clone)]
pub struct Packer<'a> {
    chars: &'a [char],
    widths: &'a [f64],
    min_width: f64,
    options: PackOptions,
    cursor: usize,
}

impl<'a> Packer<'a> {
    /// `widths[i]` is the width of `chars[i]`; `min_width` is the smallest
    /// width of any distinct character and bounds the per-slot search.
    pub fn new(
        chars: &'a [char],
        widths: &'a [f64],
        min_width: f64,
        options: PackOptions,
    ) -> Result<Self> {
        if chars.len() != widths.len() {
            return Err(FillError::config(
                "widths",
                widths.len() as f64,
                "need one width per character",
            )
            .in_stage(Stage::Pack));
        }
        if min_width.is_nan() || min_width < 0.0 {
            return Err(FillError::config(
                "min_width",
                min_width,
                "must be non-negative",
            )
            .in_stage(Stage::Pack));
        }
        Ok(Self {
            chars,
            widths,
            min_width,
            options,
            cursor: 0,
        })
    }

    /// Number of characters consumed so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> &'a [char] {
        &self.chars[self.cursor..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.chars.len()
    }

    /// Fills one slot, appending its placements to `out`.
    pub fn fill_slot(&mut self, slot: &Slot, out: &mut Vec<Placement>) -> SlotFill {
        if self.options.space_run == SpaceRunPolicy::ConsumeLeadingSpaces {
            while self.chars.get(self.cursor) == Some(&SPACE) {
                self.cursor += 1;
            }
        }
        if self.is_exhausted() {
            return SlotFill::Exhausted;
        }

        let slot_width = slot.right - slot.left;
        let chars = &self.chars[self.cursor..];
        let widths = &self.widths[self.cursor..];
        let window = window_len(slot_width, self.min_width, chars.len());
        let k = fit_count(&widths[..window], slot_width);
        if k == 0 {
            return SlotFill::NoFit;
        }

        let candidate = &chars[..k];
        if candidate.iter().all(|&ch| ch == SPACE) {
            return SlotFill::SpacesOnly;
        }

        let mut start = 0;
        let mut end = k;
        if candidate[start] == SPACE {
            start += 1;
        }
        if candidate[end - 1] == SPACE {
            end -= 1;
        }
        let drawn = &candidate[start..end];
        let drawn_widths = &widths[start..end];

        let extra = justification(drawn, drawn_widths, slot_width, self.options.justify_spaces);
        let mut x = slot.left;
        let last = drawn.len() - 1;
        for (i, (&ch, &w)) in drawn.iter().zip(drawn_widths).enumerate() {
            let widened = i < last
                && (self.options.justify_spaces == JustifySpaces::Include || ch != SPACE);
            let advance = if widened { w + extra } else { w };
            out.push(Placement {
                slot: slot.index,
                ch,
                x,
                y: slot.bottom,
                advance,
            });
            x += advance;
        }

        let base = self.cursor;
        self.cursor += k;
        SlotFill::Filled(Line {
            slot: slot.index,
            consumed: base..base + k,
            drawn: base + start..base + end,
            extra,
        })
    }
}

/// Upper bound on how many characters of any width can fit.
fn window_len(slot_width: f64, min_width: f64, available: usize) -> usize {
    if min_width <= 0.0 {
        return available;
    }
    let bound = (slot_width / min_width).ceil();
    if bound <= 0.0 {
        0
    } else {
        (bound as usize).min(available)
    }
}

/// Greatest `k` with `widths[..k].sum() <= slot_width`.
fn fit_count(widths: &[f64], slot_width: f64) -> usize {
    let mut total = 0.0;
    let mut k = 0;
    for &w in widths {
        total += w;
        if total > slot_width {
            break;
        }
        k += 1;
    }
    k
}

/// Width added to each widened character so the line spans the slot.
fn justification(
    chars: &[char],
    widths: &[f64],
    slot_width: f64,
    policy: JustifySpaces,
) -> f64 {
    if chars.len() < 2 {
        return 0.0;
    }
    let slack = slot_width - widths.iter().sum::<f64>();
    let receivers = match policy {
        JustifySpaces::Include => chars.len() - 1,
        JustifySpaces::Exclude => chars[..chars.len() - 1]
            .iter()
            .filter(|&&ch| ch != SPACE)
            .count(),
    };
    if receivers == 0 {
        0.0
    } else {
        slack / receivers as f64
    }
}

/// Result of packing a character stream into slots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackOutcome {
    pub placements: Vec<Placement>,
    pub lines: Vec<Line>,
    /// Characters consumed from the front of the stream.
    pub consumed: usize,
    /// Length of the stream.
    pub total: usize,
    /// Slots left empty.
    pub skipped_slots: usize,
}

impl PackOutcome {
    /// Characters never consumed.
    pub fn remaining(&self) -> usize {
        self.total - self.consumed
    }
}

/// Packs `chars` into `slots`, which must be in reading order.
///
/// Stops once every slot has been visited or the stream is used up.
pub fn pack(
    slots: &[Slot],
    chars: &[char],
    widths: &[f64],
    min_width: f64,
    options: PackOptions,
) -> Result<PackOutcome> {
    let mut packer = Packer::new(chars, widths, min_width, options)?;
    let mut outcome = PackOutcome {
        total: chars.len(),
        ..PackOutcome::default()
    };

    for slot in slots {
        match packer.fill_slot(slot, &mut outcome.placements) {
            SlotFill::Filled(line) => {
                trace!(
                    slot = slot.index,
                    consumed = line.consumed.len(),
                    drawn = line.drawn.len(),
                    extra = line.extra,
                    "filled slot"
                );
                outcome.lines.push(line);
            }
            SlotFill::NoFit | SlotFill::SpacesOnly => {
                trace!(slot = slot.index, width = slot.right - slot.left, "skipped slot");
                outcome.skipped_slots += 1;
            }
            SlotFill::Exhausted => break,
        }
    }

    outcome.consumed = packer.cursor();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_len_rounds_up() {
        assert_eq!(window_len(10.0, 3.0, 100), 4);
        assert_eq!(window_len(9.0, 3.0, 100), 3);
        assert_eq!(window_len(10.0, 3.0, 2), 2);
        assert_eq!(window_len(10.0, 0.0, 7), 7);
        assert_eq!(window_len(0.0, 1.0, 7), 0);
    }

    #[test]
    fn fit_count_is_inclusive() {
        assert_eq!(fit_count(&[1.0, 1.0, 1.0], 2.0), 2);
        assert_eq!(fit_count(&[3.0, 1.0], 2.0), 0);
        assert_eq!(fit_count(&[], 2.0), 0);
    }

    #[test]
    fn justification_excluding_spaces() {
        let extra = justification(
            &['a', ' ', 'b'],
            &[1.0, 1.0, 1.0],
            5.0,
            JustifySpaces::Exclude,
        );
        assert_eq!(extra, 2.0);
        let none = justification(&[' ', 'b'], &[1.0, 1.0], 5.0, JustifySpaces::Exclude);
        assert_eq!(none, 0.0);
    }
}
