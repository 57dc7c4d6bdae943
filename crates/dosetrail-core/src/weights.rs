//! Per-ingestion interpolation weights.
//!
//! The horizontal weight places a dose inside its documented dose span and
//! selects how far into the peak/offset duration ranges to sample. The
//! vertical weight compares a dose to the strongest same-substance dose in
//! the batch and scales curve amplitude.
//!
//! Both are computed over the whole batch on every call. A vertical weight
//! depends on every same-substance peer, so any edit to the batch means
//! resolving all weights again.

use serde::Serialize;

use crate::ingestion::Ingestion;
use crate::range::{RoaDose, RoaDuration};
use crate::substance::SubstanceRepository;

/// Horizontal weight used when a dose cannot be placed.
pub const DEFAULT_HORIZONTAL_WEIGHT: f64 = 0.5;

/// How far into the documented dose span `dose` falls, in `[0, 1]`.
pub fn horizontal_weight(dose: Option<f64>, roa_dose: Option<&RoaDose>) -> f64 {
    let (Some(dose), Some(roa_dose)) = (dose, roa_dose) else {
        return DEFAULT_HORIZONTAL_WEIGHT;
    };
    let Some((min, max)) = roa_dose.min_and_max_range_for_graph() else {
        return DEFAULT_HORIZONTAL_WEIGHT;
    };

    if dose <= min {
        0.0
    } else if dose >= max {
        1.0
    } else {
        (dose - min) / (max - min)
    }
}

/// `ingestion.dose` relative to the largest dose of the same substance in
/// `all`, in `(0, 1]`. Unknown doses weigh 1.
pub fn vertical_weight(ingestion: &Ingestion, all: &[Ingestion]) -> f64 {
    let Some(dose) = ingestion.dose else {
        return 1.0;
    };
    let max_dose = all
        .iter()
        .filter(|other| other.is_same_substance(ingestion))
        .filter_map(|other| other.dose)
        .fold(dose, f64::max);

    if max_dose > 0.0 {
        dose / max_dose
    } else {
        1.0
    }
}

/// An ingestion with its resolved weights and duration table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedIngestion {
    pub ingestion: Ingestion,
    pub horizontal_weight: f64,
    pub vertical_weight: f64,
    #[serde(skip)]
    pub roa_duration: Option<RoaDuration>,
}

impl WeightedIngestion {
    pub fn can_timeline_be_drawn(&self) -> bool {
        self.roa_duration
            .map(|duration| duration.is_fully_defined())
            .unwrap_or(false)
    }
}

/// Resolve weights for every ingestion in the batch, preserving order.
pub fn resolve_weights<R>(ingestions: &[Ingestion], repository: &R) -> Vec<WeightedIngestion>
where
    R: SubstanceRepository + ?Sized,
{
    ingestions
        .iter()
        .map(|ingestion| {
            let roa_dose = repository
                .roa_dose(&ingestion.substance_name, ingestion.route)
                .filter(|dose| {
                    let matches = dose.units.eq_ignore_ascii_case(ingestion.units.trim());
                    if !matches && ingestion.dose.is_some() {
                        tracing::warn!(
                            substance = %ingestion.substance_name,
                            ingestion_units = %ingestion.units,
                            table_units = %dose.units,
                            "dose units differ from reference table, using default weight"
                        );
                    }
                    matches
                });

            WeightedIngestion {
                ingestion: ingestion.clone(),
                horizontal_weight: horizontal_weight(ingestion.dose, roa_dose),
                vertical_weight: vertical_weight(ingestion, ingestions),
                roa_duration: repository
                    .roa_duration(&ingestion.substance_name, ingestion.route)
                    .copied(),
            }
        })
        .collect()
}
