//! Lays ingestions out on a shared time axis.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::{Envelope, IngestionGeometry, NormalizedPoint};
use crate::error::{Result, ValidationError};
use crate::ingestion::Ingestion;
use crate::range::RoaDuration;
use crate::storage::TimelineConfig;
use crate::substance::{AdministrationRoute, SubstanceRepository};
use crate::weights::{resolve_weights, WeightedIngestion};

/// Onset and comeup are always sampled at their midpoint.
const ONSET_COMEUP_WEIGHT: f64 = 0.5;

/// An ingestion left out of the drawing because its route lacks a complete
/// onset/comeup/peak/offset table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndrawableIngestion {
    pub ingestion_index: usize,
    pub substance_name: String,
    pub route: AdministrationRoute,
}

/// Computed timeline for a batch of ingestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Geometry in chronological order
    pub geometries: Vec<IngestionGeometry>,
    pub undrawable: Vec<UndrawableIngestion>,
}

impl Timeline {
    pub fn total_seconds(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0
    }

}

/// Offsets in seconds from the graph start.
#[derive(Debug, Clone, Copy, PartialEq)]
struct KeyOffsets {
    start: f64,
    onset_end: f64,
    comeup_end: f64,
    peak_end: f64,
    offset_end: f64,
}

impl KeyOffsets {
    fn interpolated(start: f64, duration: &RoaDuration, horizontal_weight: f64) -> Option<Self> {
        let onset_end = start + duration.onset?.interpolate(ONSET_COMEUP_WEIGHT)?;
        let comeup_end = onset_end + duration.comeup?.interpolate(ONSET_COMEUP_WEIGHT)?;
        let peak_end = comeup_end + duration.peak?.interpolate(horizontal_weight)?;
        let offset_end = peak_end + duration.offset?.interpolate(horizontal_weight)?;
        Some(Self {
            start,
            onset_end,
            comeup_end,
            peak_end,
            offset_end,
        })
    }

    /// Closed-interval overlap of the two peak windows.
    fn peak_overlaps(&self, other: &KeyOffsets) -> bool {
        self.comeup_end <= other.peak_end && other.comeup_end <= self.peak_end
    }
}

struct Placed {
    weighted: WeightedIngestion,
    ingestion_index: usize,
    duration: RoaDuration,
    offsets: KeyOffsets,
}

/// Builds [`Timeline`]s from ingestion batches.
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    config: TimelineConfig,
}

impl TimelineBuilder {
    pub fn new(config: TimelineConfig) -> Self {
        Self { config }
    }

    /// Compute the timeline for the whole batch.
    ///
    /// Weights, insets and the graph span depend on every ingestion, so the
    /// batch is always recomputed in full.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyCollection` when `ingestions` is empty.
    pub fn build<R>(&self, ingestions: &[Ingestion], repository: &R) -> Result<Timeline>
    where
        R: SubstanceRepository + ?Sized,
    {
        if ingestions.is_empty() {
            return Err(ValidationError::EmptyCollection("ingestions".into()).into());
        }

        let weighted = resolve_weights(ingestions, repository);
        let mut order: Vec<usize> = (0..ingestions.len()).collect();
        order.sort_by_key(|&i| ingestions[i].time);

        let start_time = ingestions[order[0]].time;
        let latest_time = ingestions[order[order.len() - 1]].time;

        let mut placed = Vec::new();
        let mut undrawable = Vec::new();
        for index in order {
            let w = &weighted[index];
            let offset = seconds_between(start_time, w.ingestion.time);
            let resolved = w
                .roa_duration
                .filter(|d| d.is_fully_defined())
                .and_then(|d| {
                    KeyOffsets::interpolated(offset, &d, w.horizontal_weight).map(|o| (d, o))
                });

            match resolved {
                Some((duration, offsets)) => placed.push(Placed {
                    weighted: w.clone(),
                    ingestion_index: index,
                    duration,
                    offsets,
                }),
                None => {
                    tracing::debug!(
                        substance = %w.ingestion.substance_name,
                        route = %w.ingestion.route,
                        "no complete duration table, leaving ingestion out of the timeline"
                    );
                    undrawable.push(UndrawableIngestion {
                        ingestion_index: index,
                        substance_name: w.ingestion.substance_name.clone(),
                        route: w.ingestion.route,
                    });
                }
            }
        }

        let latest_offset = seconds_between(start_time, latest_time);
        let mut span = placed
            .iter()
            .filter_map(|p| Some(p.offsets.start + p.duration.max_length_seconds()?))
            .fold(latest_offset, f64::max);
        if self.config.add_trailing_margin {
            span += self.config.trailing_margin_seconds();
        }

        let geometries = placed
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let inset_index = placed[..i]
                    .iter()
                    .filter(|earlier| earlier.offsets.peak_overlaps(&p.offsets))
                    .count();
                geometry(p, inset_index, span)
            })
            .collect();

        Ok(Timeline {
            start_time,
            end_time: end_time(start_time, span)?,
            geometries,
            undrawable,
        })
    }
}

/// Compute a timeline with the default configuration.
pub fn compute_timeline<R>(ingestions: &[Ingestion], repository: &R) -> Result<Timeline>
where
    R: SubstanceRepository + ?Sized,
{
    TimelineBuilder::default().build(ingestions, repository)
}

/// `start + span` seconds, or an error when reference durations push the
/// end past what a timestamp can hold.
fn end_time(start: DateTime<Utc>, span: f64) -> Result<DateTime<Utc>> {
    let millis = (span * 1000.0).round();
    let out_of_range = || ValidationError::InvalidValue {
        field: "timeline span".into(),
        message: format!("{span} seconds is beyond the representable time range"),
    };
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return Err(out_of_range().into());
    }
    Duration::try_milliseconds(millis as i64)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| out_of_range().into())
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

fn normalize(offset: f64, span: f64) -> f64 {
    if span > 0.0 {
        offset / span
    } else {
        0.0
    }
}

fn geometry(placed: &Placed, inset_index: usize, span: f64) -> IngestionGeometry {
    let h = placed.weighted.vertical_weight;
    let o = placed.offsets;
    let point = |offset: f64, y: f64| NormalizedPoint::new(normalize(offset, span), y);

    IngestionGeometry {
        ingestion_index: placed.ingestion_index,
        substance_name: placed.weighted.ingestion.substance_name.clone(),
        route: placed.weighted.ingestion.route,
        color: placed.weighted.ingestion.color.clone(),
        horizontal_weight: placed.weighted.horizontal_weight,
        vertical_weight: h,
        inset_index,
        offset_seconds: o.start,
        start_x: normalize(o.start, span),
        rising_edge: vec![point(o.onset_end, 0.0), point(o.comeup_end, h)],
        peak_plateau: vec![point(o.comeup_end, h), point(o.peak_end, h)],
        falling_edge: vec![point(o.peak_end, h), point(o.offset_end, 0.0)],
        envelope: envelope(o.start, &placed.duration, h, span),
    }
}

fn envelope(start: f64, duration: &RoaDuration, h: f64, span: f64) -> Envelope {
    let Some(phases) = duration.phase_seconds() else {
        return Envelope {
            early_rise: Vec::new(),
            late_rise: Vec::new(),
        };
    };

    let shape = |onset: f64, comeup: f64, peak: f64, offset: f64| {
        let onset_end = start + onset;
        let comeup_end = onset_end + comeup;
        let peak_end = comeup_end + peak;
        let offset_end = peak_end + offset;
        vec![
            NormalizedPoint::new(normalize(onset_end, span), 0.0),
            NormalizedPoint::new(normalize(comeup_end, span), h),
            NormalizedPoint::new(normalize(peak_end, span), h),
            NormalizedPoint::new(normalize(offset_end, span), 0.0),
        ]
    };

    Envelope {
        early_rise: shape(phases.onset.0, phases.comeup.0, phases.peak.1, phases.offset.1),
        late_rise: shape(phases.onset.1, phases.comeup.1, phases.peak.0, phases.offset.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::range::{DurationRange, DurationUnits, RoaDose};
    use chrono::TimeZone;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Repo {
        durations: HashMap<String, RoaDuration>,
        doses: HashMap<String, RoaDose>,
    }

    impl SubstanceRepository for Repo {
        fn roa_duration(&self, name: &str, _: AdministrationRoute) -> Option<&RoaDuration> {
            self.durations.get(name)
        }
        fn roa_dose(&self, name: &str, _: AdministrationRoute) -> Option<&RoaDose> {
            self.doses.get(name)
        }
    }

    fn minutes(min: f64, max: f64) -> Option<DurationRange> {
        Some(DurationRange::new(Some(min), Some(max), DurationUnits::Minutes))
    }

    fn duration(
        onset: (f64, f64),
        comeup: (f64, f64),
        peak: (f64, f64),
        offset: (f64, f64),
    ) -> RoaDuration {
        RoaDuration {
            onset: minutes(onset.0, onset.1),
            comeup: minutes(comeup.0, comeup.1),
            peak: minutes(peak.0, peak.1),
            offset: minutes(offset.0, offset.1),
            total: None,
            afterglow: None,
        }
    }

    fn at(minute: i64, name: &str, dose: Option<f64>) -> Ingestion {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        Ingestion::new(
            name,
            AdministrationRoute::Oral,
            dose,
            "mg",
            base + Duration::minutes(minute),
        )
    }

    fn no_margin() -> TimelineBuilder {
        TimelineBuilder::new(TimelineConfig {
            add_trailing_margin: false,
            ..TimelineConfig::default()
        })
    }

    fn mdma_repo() -> Repo {
        let mut repo = Repo::default();
        repo.durations.insert(
            "MDMA".into(),
            duration((15.0, 30.0), (15.0, 30.0), (60.0, 180.0), (60.0, 120.0)),
        );
        repo.doses.insert(
            "MDMA".into(),
            RoaDose::new("mg").with_threshold(60.0).with_heavy(150.0),
        );
        repo
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let err = no_margin().build(&[], &Repo::default()).unwrap_err();
        assert!(err.to_string().contains("Empty collection"));
    }

    #[test]
    fn test_oversized_duration_is_an_error_not_a_panic() {
        let mut repo = mdma_repo();
        let mut endless = duration((15.0, 30.0), (15.0, 30.0), (60.0, 180.0), (60.0, 120.0));
        endless.peak = Some(DurationRange::new(Some(1.0), Some(1e12), DurationUnits::Days));
        repo.durations.insert("MDMA".into(), endless);

        let err = no_margin()
            .build(&[at(0, "MDMA", Some(100.0))], &repo)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_single_mdma_ingestion() {
        let timeline = no_margin()
            .build(&[at(0, "MDMA", Some(100.0))], &mdma_repo())
            .unwrap();
        assert_eq!(timeline.total_seconds(), 360.0 * 60.0);

        let g = &timeline.geometries[0];
        assert!((g.horizontal_weight - 0.4444).abs() < 1e-3);
        assert_eq!(g.vertical_weight, 1.0);
        assert_eq!(g.start_x, 0.0);
        assert_eq!(g.inset_index, 0);

        // onset and comeup midpoints: 22.5 + 22.5 minutes
        let span = 360.0;
        assert!((g.rising_edge[0].x - 22.5 / span).abs() < 1e-9);
        assert!((g.rising_edge[1].x - 45.0 / span).abs() < 1e-9);
        let peak_minutes = 60.0 + (40.0 / 90.0) * 120.0;
        assert!((g.peak_plateau[1].x - (45.0 + peak_minutes) / span).abs() < 1e-9);
        assert_eq!(g.core_line().len(), 5);
    }

    #[test]
    fn test_trailing_margin() {
        let timeline = TimelineBuilder::default()
            .build(&[at(0, "MDMA", Some(100.0))], &mdma_repo())
            .unwrap();
        assert_eq!(timeline.total_seconds(), 420.0 * 60.0);
    }

    #[test]
    fn test_envelope_uses_literal_bounds() {
        let timeline = no_margin()
            .build(&[at(0, "MDMA", Some(100.0))], &mdma_repo())
            .unwrap();
        let envelope = &timeline.geometries[0].envelope;
        let span = 360.0;
        assert!((envelope.early_rise[0].x - 15.0 / span).abs() < 1e-9);
        assert!((envelope.early_rise[3].x - 330.0 / span).abs() < 1e-9);
        assert!((envelope.late_rise[1].x - 60.0 / span).abs() < 1e-9);
        assert!((envelope.late_rise[3].x - 180.0 / span).abs() < 1e-9);
    }

    #[test]
    fn test_undrawable_ingestion_does_not_abort_batch() {
        let mut repo = mdma_repo();
        let mut partial = duration((20.0, 40.0), (10.0, 20.0), (60.0, 90.0), (30.0, 60.0));
        partial.peak = None;
        repo.durations.insert("Cannabis".into(), partial);

        let batch = [at(0, "Cannabis", Some(10.0)), at(30, "MDMA", Some(100.0))];
        let timeline = no_margin().build(&batch, &repo).unwrap();
        assert_eq!(timeline.geometries.len(), 1);
        assert_eq!(timeline.geometries[0].ingestion_index, 1);
        assert_eq!(timeline.undrawable.len(), 1);
        assert_eq!(timeline.undrawable[0].substance_name, "Cannabis");
        assert_eq!(timeline.start_time, batch[0].time);
    }

    #[test]
    fn test_nothing_drawable_keeps_latest_ingestion_in_span() {
        let batch = [at(0, "Unknown", None), at(45, "Unknown", None)];
        let timeline = no_margin().build(&batch, &Repo::default()).unwrap();
        assert!(timeline.geometries.is_empty());
        assert_eq!(timeline.total_seconds(), 45.0 * 60.0);
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        let repo = mdma_repo();
        let batch = [at(60, "MDMA", Some(50.0)), at(0, "MDMA", Some(100.0))];
        let timeline = no_margin().build(&batch, &repo).unwrap();
        assert_eq!(timeline.start_time, batch[1].time);
        assert_eq!(timeline.geometries[0].ingestion_index, 1);
        assert_eq!(timeline.geometries[1].vertical_weight, 0.5);
        assert!((timeline.geometries[1].offset_seconds - 3600.0).abs() < 1e-9);
    }
}
