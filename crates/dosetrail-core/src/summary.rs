//! Cumulative dose summary.
//!
//! Groups an experience's ingestions by substance and dose units and
//! classifies the combined dose against the route's dose table.

use serde::{Deserialize, Serialize};

use crate::ingestion::Ingestion;
use crate::range::DoseClass;
use crate::substance::{AdministrationRoute, SubstanceRepository};

/// Combined dose for one substance in one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseSummary {
    pub substance_name: String,
    pub units: String,
    /// Route of the first ingestion; its dose table classifies the total
    pub route: AdministrationRoute,
    pub ingestion_count: usize,
    /// Sum of known doses
    pub total_dose: f64,
    /// At least one ingestion had an unknown dose, so the total is a lower bound
    pub has_unknown_dose: bool,
    pub classification: Option<DoseClass>,
}

/// Summarize doses, ordered by each group's first ingestion time.
pub fn summarize_doses<R>(ingestions: &[Ingestion], repository: &R) -> Vec<DoseSummary>
where
    R: SubstanceRepository + ?Sized,
{
    let mut sorted: Vec<&Ingestion> = ingestions.iter().collect();
    sorted.sort_by_key(|i| i.time);

    let mut summaries: Vec<DoseSummary> = Vec::new();
    for ingestion in sorted {
        let existing = summaries.iter_mut().find(|s| {
            s.substance_name.eq_ignore_ascii_case(&ingestion.substance_name)
                && s.units.eq_ignore_ascii_case(&ingestion.units)
        });

        match existing {
            Some(summary) => {
                summary.ingestion_count += 1;
                match ingestion.dose {
                    Some(dose) => summary.total_dose += dose,
                    None => summary.has_unknown_dose = true,
                }
            }
            None => summaries.push(DoseSummary {
                substance_name: ingestion.substance_name.clone(),
                units: ingestion.units.clone(),
                route: ingestion.route,
                ingestion_count: 1,
                total_dose: ingestion.dose.unwrap_or(0.0),
                has_unknown_dose: ingestion.dose.is_none(),
                classification: None,
            }),
        }
    }

    for summary in &mut summaries {
        summary.classification = if summary.total_dose > 0.0 {
            repository
                .roa_dose(&summary.substance_name, summary.route)
                .and_then(|dose| dose.classify_with_units(summary.total_dose, &summary.units))
        } else {
            None
        };
    }

    summaries
}
