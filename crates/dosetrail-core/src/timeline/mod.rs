//! Timeline curve builder.
//!
//! This module provides:
//! - Graph span computation over a batch of ingestions
//! - Normalized rise/peak/fall curves and uncertainty envelopes
//! - Inset indices for overlapping peaks

mod builder;
mod chart;
mod geometry;

pub use builder::{compute_timeline, Timeline, TimelineBuilder, UndrawableIngestion};
pub use geometry::{Envelope, IngestionGeometry, NormalizedPoint};
