//! Integration tests for the timeline curve builder.

use chrono::{DateTime, Duration, TimeZone, Utc};
use dosetrail_core::{
    AdministrationRoute, DoseClass, Ingestion, SubstanceRepository, SubstanceTable,
    TimelineBuilder, TimelineConfig,
};

const SUBSTANCES: &str = r#"{
    "substances": [
        {
            "name": "MDMA",
            "roas": [
                {
                    "route": "oral",
                    "duration": {
                        "onset": {"min": 15, "max": 30, "units": "minutes"},
                        "comeup": {"min": 15, "max": 30, "units": "minutes"},
                        "peak": {"min": 60, "max": 180, "units": "minutes"},
                        "offset": {"min": 60, "max": 120, "units": "minutes"}
                    },
                    "dose": {"units": "mg", "threshold": 60, "heavy": 150}
                }
            ]
        },
        {
            "name": "Alpha",
            "roas": [
                {
                    "route": "oral",
                    "duration": {
                        "onset": {"min": 10, "max": 10, "units": "minutes"},
                        "comeup": {"min": 20, "max": 20, "units": "minutes"},
                        "peak": {"min": 60, "max": 60, "units": "minutes"},
                        "offset": {"min": 30, "max": 30, "units": "minutes"}
                    }
                }
            ]
        },
        {
            "name": "Beta",
            "roas": [
                {
                    "route": "oral",
                    "duration": {
                        "onset": {"min": 0.5, "max": 0.5, "units": "hours"},
                        "comeup": {"min": 0.5, "max": 0.5, "units": "hours"},
                        "peak": {"min": 1, "max": 1, "units": "hours"},
                        "offset": {"min": 1, "max": 1, "units": "hours"}
                    }
                }
            ]
        },
        {
            "name": "Cannabis",
            "roas": [
                {
                    "route": "smoked",
                    "duration": {
                        "onset": {"min": 0, "max": 10, "units": "minutes"},
                        "comeup": {"min": 5, "max": 10, "units": "minutes"},
                        "offset": {"min": 1, "max": 2, "units": "hours"}
                    }
                }
            ]
        }
    ]
}"#;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 12, 22, 0, 0).unwrap()
}

fn at(minute: i64, name: &str, route: AdministrationRoute, dose: Option<f64>) -> Ingestion {
    Ingestion::new(name, route, dose, "mg", base() + Duration::minutes(minute))
}

fn builder(margin: bool) -> TimelineBuilder {
    TimelineBuilder::new(TimelineConfig {
        add_trailing_margin: margin,
        trailing_margin_minutes: 60,
    })
}

#[test]
fn test_mdma_scenario() {
    let table = SubstanceTable::from_json(SUBSTANCES).unwrap();
    let batch = [at(0, "MDMA", AdministrationRoute::Oral, Some(100.0)).with_color("pink")];

    let timeline = builder(false).build(&batch, &table).unwrap();
    assert_eq!(timeline.start_time, base());
    assert_eq!(timeline.end_time, base() + Duration::minutes(360));

    let g = &timeline.geometries[0];
    assert_eq!(g.color, "pink");
    assert!((g.horizontal_weight - 0.444).abs() < 1e-3);

    // peak plateau length: 60 + 0.444 * 120 minutes
    let plateau_minutes = (g.peak_plateau[1].x - g.peak_plateau[0].x) * 360.0;
    assert!((plateau_minutes - 113.33).abs() < 0.01);

    let with_margin = builder(true).build(&batch, &table).unwrap();
    assert_eq!(with_margin.end_time, base() + Duration::minutes(420));
}

#[test]
fn test_overlapping_peaks_are_inset() {
    let table = SubstanceTable::from_json(SUBSTANCES).unwrap();
    // Alpha peaks at [30, 90], Beta at [60, 120]
    let batch = [
        at(0, "Alpha", AdministrationRoute::Oral, None),
        at(0, "Beta", AdministrationRoute::Oral, None),
    ];
    let timeline = builder(false).build(&batch, &table).unwrap();
    assert_eq!(timeline.geometries[0].inset_index, 0);
    assert_eq!(timeline.geometries[1].inset_index, 1);
}

#[test]
fn test_touching_peaks_count_as_overlap() {
    let table = SubstanceTable::from_json(SUBSTANCES).unwrap();
    // Alpha peak [30, 90], second Alpha peak [90, 150]
    let batch = [
        at(0, "Alpha", AdministrationRoute::Oral, None),
        at(60, "Alpha", AdministrationRoute::Oral, None),
    ];
    let timeline = builder(false).build(&batch, &table).unwrap();
    assert_eq!(timeline.geometries[1].inset_index, 1);
}

#[test]
fn test_separate_peaks_are_not_inset() {
    let table = SubstanceTable::from_json(SUBSTANCES).unwrap();
    let batch = [
        at(0, "Alpha", AdministrationRoute::Oral, None),
        at(180, "Beta", AdministrationRoute::Oral, None),
    ];
    let timeline = builder(false).build(&batch, &table).unwrap();
    assert!(timeline.geometries.iter().all(|g| g.inset_index == 0));
}

#[test]
fn test_route_without_peak_is_excluded() {
    let table = SubstanceTable::from_json(SUBSTANCES).unwrap();
    let batch = [
        at(0, "Cannabis", AdministrationRoute::Smoked, Some(20.0)),
        at(10, "MDMA", AdministrationRoute::Oral, Some(100.0)),
        at(20, "MDMA", AdministrationRoute::Insufflated, Some(30.0)),
    ];
    let timeline = builder(false).build(&batch, &table).unwrap();
    assert_eq!(timeline.geometries.len(), 1);
    assert_eq!(timeline.geometries[0].substance_name, "MDMA");
    let excluded: Vec<_> = timeline.undrawable.iter().map(|u| u.ingestion_index).collect();
    assert_eq!(excluded, vec![0, 2]);
}

#[test]
fn test_span_covers_every_drawable_ingestion() {
    let table = SubstanceTable::from_json(SUBSTANCES).unwrap();
    let batch = [
        at(0, "MDMA", AdministrationRoute::Oral, Some(80.0)),
        at(45, "Alpha", AdministrationRoute::Oral, None),
        at(200, "MDMA", AdministrationRoute::Oral, Some(40.0)),
        at(300, "Beta", AdministrationRoute::Oral, None),
    ];
    let timeline = builder(false).build(&batch, &table).unwrap();

    for ingestion in &batch {
        let longest = table
            .roa_duration(&ingestion.substance_name, ingestion.route)
            .and_then(|d| d.max_length_seconds())
            .unwrap();
        let end = ingestion.time + Duration::seconds(longest as i64);
        assert!(end <= timeline.end_time);
    }
    for g in &timeline.geometries {
        assert!(g.falling_edge[1].x <= 1.0 + 1e-12);
        assert!(g.start_x >= 0.0);
    }
}

#[test]
fn test_repeated_doses_scale_amplitude() {
    let table = SubstanceTable::from_json(SUBSTANCES).unwrap();
    let batch = [
        at(0, "MDMA", AdministrationRoute::Oral, Some(120.0)),
        at(120, "MDMA", AdministrationRoute::Oral, Some(60.0)),
    ];
    let timeline = builder(true).build(&batch, &table).unwrap();
    assert_eq!(timeline.geometries[0].peak_height(), 1.0);
    assert_eq!(timeline.geometries[1].peak_height(), 0.5);
    assert_eq!(timeline.geometries[1].peak_plateau[0].y, 0.5);
}

#[test]
fn test_classification_from_table() {
    let table = SubstanceTable::from_json(SUBSTANCES).unwrap();
    let dose = table.roa_dose("MDMA", AdministrationRoute::Oral).unwrap();
    assert_eq!(dose.classify(40.0), Some(DoseClass::Threshold));
    assert_eq!(dose.classify(150.0), Some(DoseClass::Heavy));
}
