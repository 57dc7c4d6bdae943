//! In-memory substance reference table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::{AdministrationRoute, SubstanceRepository};
use crate::error::Result;
use crate::range::{RoaDose, RoaDuration};

/// Reference data for one route of administration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roa {
    pub route: AdministrationRoute,
    #[serde(default)]
    pub duration: Option<RoaDuration>,
    #[serde(default)]
    pub dose: Option<RoaDose>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substance {
    pub name: String,
    #[serde(default)]
    pub roas: Vec<Roa>,
}

impl Substance {
    pub fn roa(&self, route: AdministrationRoute) -> Option<&Roa> {
        self.roas.iter().find(|roa| roa.route == route)
    }
}

#[derive(Debug, Deserialize)]
struct SubstanceFile {
    substances: Vec<Substance>,
}

/// Substance table keyed by lower-cased name.
#[derive(Debug, Clone, Default)]
pub struct SubstanceTable {
    substances: HashMap<String, Substance>,
}

impl SubstanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a substance after validating its ranges.
    pub fn insert(&mut self, substance: Substance) -> Result<()> {
        for roa in &substance.roas {
            let context = format!("{}/{}", substance.name, roa.route);
            if let Some(duration) = &roa.duration {
                duration.validate(&context)?;
            }
            if let Some(dose) = &roa.dose {
                dose.validate(&context)?;
            }
        }
        self.substances
            .insert(substance.name.to_lowercase(), substance);
        Ok(())
    }

    /// Parse a `{"substances": [...]}` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, carries an unknown unit or
    /// route tag, or contains a range with `min > max`.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: SubstanceFile = serde_json::from_str(json)?;
        let mut table = Self::new();
        for substance in file.substances {
            table.insert(substance)?;
        }
        tracing::debug!(count = table.len(), "loaded substance table");
        Ok(table)
    }

    /// Read and parse a table from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn get(&self, name: &str) -> Option<&Substance> {
        self.substances.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.substances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substances.is_empty()
    }

    fn roa(&self, name: &str, route: AdministrationRoute) -> Option<&Roa> {
        self.get(name)?.roa(route)
    }
}

impl SubstanceRepository for SubstanceTable {
    fn roa_duration(
        &self,
        substance_name: &str,
        route: AdministrationRoute,
    ) -> Option<&RoaDuration> {
        self.roa(substance_name, route)?.duration.as_ref()
    }

    fn roa_dose(&self, substance_name: &str, route: AdministrationRoute) -> Option<&RoaDose> {
        self.roa(substance_name, route)?.dose.as_ref()
    }
}
