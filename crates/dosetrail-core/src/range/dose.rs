//! Dose bands and dose classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{defined, deserialize_defined};
use crate::error::ValidationError;

/// A light/common/strong dose band.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DoseRange {
    #[serde(default, deserialize_with = "deserialize_defined")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_defined")]
    pub max: Option<f64>,
}

impl DoseRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: defined(min),
            max: defined(max),
        }
    }

    fn validate(&self, field: &str) -> Result<(), ValidationError> {
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

/// Dose classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseClass {
    Threshold,
    Light,
    Common,
    Strong,
    Heavy,
}

impl DoseClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::Light => "light",
            Self::Common => "common",
            Self::Strong => "strong",
            Self::Heavy => "heavy",
        }
    }
}

impl fmt::Display for DoseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dose table for one substance and route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoaDose {
    /// Dose units, e.g. "mg" or "µg"
    pub units: String,
    #[serde(default, deserialize_with = "deserialize_defined")]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub light: Option<DoseRange>,
    #[serde(default)]
    pub common: Option<DoseRange>,
    #[serde(default)]
    pub strong: Option<DoseRange>,
    #[serde(default, deserialize_with = "deserialize_defined")]
    pub heavy: Option<f64>,
}

impl RoaDose {
    pub fn new(units: impl Into<String>) -> Self {
        Self {
            units: units.into(),
            threshold: None,
            light: None,
            common: None,
            strong: None,
            heavy: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = defined(Some(threshold));
        self
    }

    pub fn with_light(mut self, min: f64, max: f64) -> Self {
        self.light = Some(DoseRange::new(Some(min), Some(max)));
        self
    }

    pub fn with_common(mut self, min: f64, max: f64) -> Self {
        self.common = Some(DoseRange::new(Some(min), Some(max)));
        self
    }

    pub fn with_strong(mut self, min: f64, max: f64) -> Self {
        self.strong = Some(DoseRange::new(Some(min), Some(max)));
        self
    }

    pub fn with_heavy(mut self, heavy: f64) -> Self {
        self.heavy = defined(Some(heavy));
        self
    }

    fn light_min(&self) -> Option<f64> {
        self.light.and_then(|r| r.min)
    }

    fn common_min(&self) -> Option<f64> {
        self.common.and_then(|r| r.min)
    }

    fn strong_min(&self) -> Option<f64> {
        self.strong.and_then(|r| r.min)
    }

    fn strong_max(&self) -> Option<f64> {
        self.strong.and_then(|r| r.max)
    }

    /// The widest documented dose span, used to place a dose on the
    /// horizontal axis of the duration ranges.
    ///
    /// Candidates are tried in order and the first with `min <= max` wins:
    /// (threshold, heavy), (threshold, strong.max), (light.min, heavy),
    /// (light.min, strong.max).
    pub fn min_and_max_range_for_graph(&self) -> Option<(f64, f64)> {
        let candidates = [
            (self.threshold, self.heavy),
            (self.threshold, self.strong_max()),
            (self.light_min(), self.heavy),
            (self.light_min(), self.strong_max()),
        ];
        candidates.into_iter().find_map(|pair| match pair {
            (Some(min), Some(max)) if min <= max => Some((min, max)),
            _ => None,
        })
    }

    /// Place `value` on the threshold..heavy ladder.
    ///
    /// A value sitting exactly on a band's lower bound belongs to that band.
    /// Returns `None` when the defined bounds cannot place the value.
    pub fn classify(&self, value: f64) -> Option<DoseClass> {
        if !value.is_finite() {
            return None;
        }
        let ladder = [
            (self.heavy, DoseClass::Heavy),
            (self.strong_min(), DoseClass::Strong),
            (self.common_min(), DoseClass::Common),
            (self.light_min(), DoseClass::Light),
        ];
        for (lower, class) in ladder {
            if let Some(lower) = lower {
                if value >= lower {
                    return Some(class);
                }
            }
        }

        let threshold_ceiling = self.light_min().or(self.threshold)?;
        (value < threshold_ceiling).then_some(DoseClass::Threshold)
    }

    /// Like [`classify`](Self::classify), but only when `units` match the table.
    pub fn classify_with_units(&self, value: f64, units: &str) -> Option<DoseClass> {
        if !self.units.eq_ignore_ascii_case(units.trim()) {
            return None;
        }
        self.classify(value)
    }

    /// Check `min <= max` on every band. `context` prefixes the field names.
    pub fn validate(&self, context: &str) -> Result<(), ValidationError> {
        for (name, band) in [
            ("light", self.light),
            ("common", self.common),
            ("strong", self.strong),
        ] {
            if let Some(band) = band {
                band.validate(&format!("{context}/{name}"))?;
            }
        }
        Ok(())
    }
}

/// Classify a dose value for display badges.
pub fn classify_dose(value: f64, roa_dose: &RoaDose) -> Option<DoseClass> {
    roa_dose.classify(value)
}
