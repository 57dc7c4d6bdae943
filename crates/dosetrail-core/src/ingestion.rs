//! Ingestion records supplied by the journal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::range::{defined, deserialize_defined};
use crate::substance::AdministrationRoute;

/// A single logged ingestion. The core reads these and never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingestion {
    pub substance_name: String,
    pub route: AdministrationRoute,
    /// Dose amount; `None` when unknown
    #[serde(default, deserialize_with = "deserialize_defined")]
    pub dose: Option<f64>,
    /// Dose units, e.g. "mg"
    pub units: String,
    pub time: DateTime<Utc>,
    /// Display colour tag, passed through to the geometry
    #[serde(default)]
    pub color: String,
}

impl Ingestion {
    pub fn new(
        substance_name: impl Into<String>,
        route: AdministrationRoute,
        dose: Option<f64>,
        units: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            substance_name: substance_name.into(),
            route,
            dose: defined(dose),
            units: units.into(),
            time,
            color: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Same substance, compared case-insensitively.
    pub fn is_same_substance(&self, other: &Ingestion) -> bool {
        self.substance_name.eq_ignore_ascii_case(&other.substance_name)
    }
}
