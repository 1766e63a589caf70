//! Rectilinear area algebra.
//!
//! Every area the pipeline handles is built from raster cells, so it can be
//! represented exactly as a stack of horizontal bands, each holding sorted,
//! disjoint x-spans. This module provides:
//! - Geometric aliases (Rect, Span) and the HasBBox trait
//! - `Area`: union, intersection, difference, square buffering
//! - Horizontal-line intersection and connected-component splitting

pub mod area;
mod spans;

pub use area::{Area, Band};

/// A rectangle defined by (x0, y0, x1, y1) where (x0, y0) is bottom-left
/// and (x1, y1) is top-right.
pub type Rect = (f64, f64, f64, f64);

/// A horizontal interval (x0, x1) with x0 <= x1.
pub type Span = (f64, f64);

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Trait for objects that have a bounding box.
pub trait HasBBox {
    fn x0(&self) -> f64;
    fn y0(&self) -> f64;
    fn x1(&self) -> f64;
    fn y1(&self) -> f64;

    fn bbox(&self) -> Rect {
        (self.x0(), self.y0(), self.x1(), self.y1())
    }

    fn width(&self) -> f64 {
        self.x1() - self.x0()
    }

    fn height(&self) -> f64 {
        self.y1() - self.y0()
    }
}
