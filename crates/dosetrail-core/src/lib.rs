//! # Dosetrail Core Library
//!
//! This library provides the computation behind the Dosetrail ingestion
//! journal: dose classification, per-ingestion effect weights and the
//! normalized timeline geometry a renderer draws. Persistence and UI live
//! elsewhere and only hand plain data to this crate.
//!
//! ## Architecture
//!
//! - **Range model**: duration ranges in mixed units and dose bands, with
//!   zero-as-absent bounds, unit normalization and dose classification
//! - **Weights**: horizontal (dose within its documented span) and vertical
//!   (dose relative to same-substance peers) interpolation weights
//! - **Timeline**: graph span, rise/peak/fall curves, uncertainty envelopes
//!   and overlap insets for a batch of ingestions
//! - **Summary**: cumulative dose per substance
//!
//! Every computation takes a full snapshot of the batch plus an injected
//! [`SubstanceRepository`] and keeps no state between calls.
//!
//! ## Key Components
//!
//! - [`TimelineBuilder`]: Timeline curve builder
//! - [`RoaDose`] / [`RoaDuration`]: Per-route reference tables
//! - [`SubstanceTable`]: JSON-backed repository
//! - [`Config`]: Application configuration management

pub mod error;
pub mod ingestion;
pub mod range;
pub mod storage;
pub mod substance;
pub mod summary;
pub mod timeline;
pub mod weights;

pub use error::{ConfigError, CoreError, ValidationError};
pub use ingestion::Ingestion;
pub use range::{
    classify_dose, DoseClass, DoseRange, DurationRange, DurationUnits, RoaDose, RoaDuration,
};
pub use storage::{Config, DataConfig, TimelineConfig};
pub use substance::{AdministrationRoute, Roa, Substance, SubstanceRepository, SubstanceTable};
pub use summary::{summarize_doses, DoseSummary};
pub use timeline::{
    compute_timeline, Envelope, IngestionGeometry, NormalizedPoint, Timeline, TimelineBuilder,
    UndrawableIngestion,
};
pub use weights::{horizontal_weight, resolve_weights, vertical_weight, WeightedIngestion};
