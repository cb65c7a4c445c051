//! Histogram view of strand count vectors.
//!
//! Consumes only a count vector and a bin count:
//! - [`Histogram`]: equal-width bins over the observed count range
//! - [`NormalOverlay`]: fitted normal curve scaled to raw strand counts
//! - [`render_text`]: terminal rendering
//! - CSV export of both

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod export;
pub mod histogram;
pub mod overlay;
pub mod render;

pub use error::{Error, Result};
pub use export::{save_histogram_csv, save_overlay_csv, write_histogram_csv, write_overlay_csv};
pub use histogram::{Bin, Histogram, DEFAULT_BINS};
pub use overlay::{NormalOverlay, OverlayPoint, DEFAULT_SAMPLES};
pub use render::{render_text, DEFAULT_WIDTH};
