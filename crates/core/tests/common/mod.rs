#![allow(dead_code)]

use tonefill_core::raster::Raster;
use tonefill_core::slots::Slot;

#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    pub fn gen_f64(&mut self, min: f64, max: f64) -> f64 {
        let n = self.next_u64() as f64 / u64::MAX as f64;
        min + (max - min) * n
    }

    pub fn gen_range(&mut self, min: usize, max: usize) -> usize {
        min + (self.next_u64() % (max - min) as u64) as usize
    }
}

/// Random raster with tones in [0, 1].
pub fn random_raster(seed: u64, cols: usize, rows: usize) -> Raster {
    let mut rng = XorShift64::new(seed);
    let tones = (0..cols * rows).map(|_| rng.gen_f64(0.0, 1.0)).collect();
    Raster::new(cols, rows, tones).expect("valid raster")
}

/// Raster from ASCII art: '#' is black, anything else white. First line is
/// the top row.
pub fn raster_from_art(art: &[&str]) -> Raster {
    let rows = art.len();
    let cols = art[0].len();
    let tones = art
        .iter()
        .flat_map(|line| line.chars().map(|c| if c == '#' { 0.0 } else { 1.0 }))
        .collect();
    Raster::new(cols, rows, tones).expect("valid raster")
}

pub fn slot(left: f64, bottom: f64, right: f64, top: f64) -> Slot {
    Slot::new(left, bottom, right, top)
}

/// Slots with consecutive indices, in the given order.
pub fn indexed(slots: impl IntoIterator<Item = Slot>) -> Vec<Slot> {
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| Slot { index, ..slot })
        .collect()
}

pub fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}
