//! tonefill - lay text out inside the dark or light regions of an image.
//!
//! The pipeline classifies a tone raster, merges the target cells into an
//! area, offsets it, slices it into reading-ordered line slots, and packs a
//! character stream into those slots with per-line justification. Decoding
//! images, measuring glyphs and drawing are left to the caller.

pub mod error;
pub mod geometry;
pub mod metrics;
pub mod packer;
pub mod params;
pub mod pipeline;
pub mod raster;
pub mod region;
pub mod slots;
pub mod text;

pub use error::{FillError, Result, Stage};
pub use geometry::Area;
pub use metrics::{FixedWidth, FontFace, MeasureText, StandardFont, WidthTable};
pub use packer::{JustifySpaces, PackOptions, Placement, SpaceRunPolicy, pack};
pub use params::{FillParams, Tone};
pub use pipeline::{Layout, fill_stream, fill_text};
pub use raster::Raster;
pub use slots::Slot;
