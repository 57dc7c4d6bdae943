//! Phase durations for a route of administration.

use serde::{Deserialize, Serialize};

use super::{defined, deserialize_defined, DurationUnits};
use crate::error::ValidationError;

/// One phase's duration (onset, comeup, peak, offset, total or afterglow).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    #[serde(default, deserialize_with = "deserialize_defined")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_defined")]
    pub max: Option<f64>,
    pub units: DurationUnits,
}

impl DurationRange {
    /// Create a range. Zero or negative bounds are stored as absent.
    pub fn new(min: Option<f64>, max: Option<f64>, units: DurationUnits) -> Self {
        Self {
            min: defined(min),
            max: defined(max),
            units,
        }
    }

    /// Build a range from bounds expressed in seconds.
    pub fn from_seconds(min_seconds: f64, max_seconds: f64, units: DurationUnits) -> Self {
        let factor = units.seconds_per_unit();
        Self::new(
            Some(min_seconds / factor),
            Some(max_seconds / factor),
            units,
        )
    }

    pub fn min_seconds(&self) -> Option<f64> {
        self.min.map(|v| v * self.units.seconds_per_unit())
    }

    pub fn max_seconds(&self) -> Option<f64> {
        self.max.map(|v| v * self.units.seconds_per_unit())
    }

    /// Both bounds in seconds, or `None` if either is undefined.
    pub fn to_seconds(&self) -> Option<(f64, f64)> {
        Some((self.min_seconds()?, self.max_seconds()?))
    }

    /// Linear interpolation between the bounds, in seconds.
    ///
    /// # Panics
    ///
    /// Panics if `weight` is outside `[0, 1]`. Weights come from the
    /// resolver and are always in range; anything else is a caller bug.
    pub fn interpolate(&self, weight: f64) -> Option<f64> {
        assert!(
            (0.0..=1.0).contains(&weight),
            "interpolation weight must lie in [0, 1], got {weight}"
        );
        let (min, max) = self.to_seconds()?;
        Some(min + weight * (max - min))
    }

    /// Check the `min <= max` invariant. `field` names the range in the error.
    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(ValidationError::InvalidRange {
                field: field.to_string(),
                min,
                max,
            }),
            _ => Ok(()),
        }
    }
}

/// Duration table for one substance and route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoaDuration {
    pub onset: Option<DurationRange>,
    pub comeup: Option<DurationRange>,
    pub peak: Option<DurationRange>,
    pub offset: Option<DurationRange>,
    #[serde(default)]
    pub total: Option<DurationRange>,
    #[serde(default)]
    pub afterglow: Option<DurationRange>,
}

/// Resolved phase durations in seconds, all four phases present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PhaseSeconds {
    pub onset: (f64, f64),
    pub comeup: (f64, f64),
    pub peak: (f64, f64),
    pub offset: (f64, f64),
}

impl RoaDuration {
    /// True iff onset, comeup, peak and offset all have both bounds.
    pub fn is_fully_defined(&self) -> bool {
        self.phase_seconds().is_some()
    }

    pub(crate) fn phase_seconds(&self) -> Option<PhaseSeconds> {
        Some(PhaseSeconds {
            onset: self.onset?.to_seconds()?,
            comeup: self.comeup?.to_seconds()?,
            peak: self.peak?.to_seconds()?,
            offset: self.offset?.to_seconds()?,
        })
    }

    /// Sum of the four phase maxima in seconds.
    pub fn max_length_seconds(&self) -> Option<f64> {
        let phases = self.phase_seconds()?;
        Some(phases.onset.1 + phases.comeup.1 + phases.peak.1 + phases.offset.1)
    }

    /// Validate every present range. `context` prefixes the field names.
    pub fn validate(&self, context: &str) -> Result<(), ValidationError> {
        let named = [
            ("onset", self.onset),
            ("comeup", self.comeup),
            ("peak", self.peak),
            ("offset", self.offset),
            ("total", self.total),
            ("afterglow", self.afterglow),
        ];
        for (name, range) in named {
            if let Some(range) = range {
                range.validate(&format!("{context}/{name}"))?;
            }
        }
        Ok(())
    }
}
