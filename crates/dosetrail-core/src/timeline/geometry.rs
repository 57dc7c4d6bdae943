//! Normalized curve geometry for one ingestion.
//!
//! X is a fraction of the graph's time span, Y a fraction of full height
//! with 0 at the baseline. Renderers flip Y as their coordinate system needs.

use serde::{Deserialize, Serialize};

use crate::substance::AdministrationRoute;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Uncertainty envelope drawn behind the core curve.
///
/// `early_rise` takes the fastest onset and comeup with the longest peak
/// and offset. `late_rise` takes the slowest onset and comeup with the
/// shortest peak and offset. The area between them is shaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub early_rise: Vec<NormalizedPoint>,
    pub late_rise: Vec<NormalizedPoint>,
}

impl Envelope {
    /// Closed polygon: `early_rise` forward, then `late_rise` backward.
    pub fn band(&self) -> Vec<NormalizedPoint> {
        self.early_rise
            .iter()
            .chain(self.late_rise.iter().rev())
            .copied()
            .collect()
    }
}

/// Renderable geometry for one drawable ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionGeometry {
    /// Position of the ingestion in the caller's input slice
    pub ingestion_index: usize,
    pub substance_name: String,
    pub route: AdministrationRoute,
    pub color: String,
    pub horizontal_weight: f64,
    pub vertical_weight: f64,
    /// Number of earlier ingestions whose peak overlaps this one
    pub inset_index: usize,
    /// Seconds from the graph start to the ingestion
    pub offset_seconds: f64,
    /// X of the ingestion itself; the curve is flat until onset ends
    pub start_x: f64,
    pub rising_edge: Vec<NormalizedPoint>,
    pub peak_plateau: Vec<NormalizedPoint>,
    pub falling_edge: Vec<NormalizedPoint>,
    pub envelope: Envelope,
}

impl IngestionGeometry {
    /// The core line from the ingestion point to the end of the offset.
    pub fn core_line(&self) -> Vec<NormalizedPoint> {
        let mut line = vec![NormalizedPoint::new(self.start_x, 0.0)];
        line.extend(self.rising_edge.iter().copied());
        line.extend(self.peak_plateau.iter().skip(1).copied());
        line.extend(self.falling_edge.iter().skip(1).copied());
        line
    }

    /// Highest Y reached by the core line.
    pub fn peak_height(&self) -> f64 {
        self.vertical_weight
    }
}
