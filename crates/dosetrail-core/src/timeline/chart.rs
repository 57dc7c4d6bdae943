//! Plain-text rendering of a timeline.

use super::Timeline;

impl Timeline {
    /// Render one row per drawable ingestion, `width` cells wide.
    ///
    /// `·` marks onset, `▄` comeup and offset, `█` the peak.
    pub fn render_ascii_chart(&self, width: usize) -> String {
        let width = width.max(10);
        let mut output = format!(
            "\nTimeline {} → {}\n",
            self.start_time.format("%Y-%m-%d %H:%M"),
            self.end_time.format("%H:%M")
        );
        output.push_str(&"─".repeat(width + 24));
        output.push('\n');

        for g in &self.geometries {
            let (Some(onset_end), Some(comeup_end), Some(peak_end), Some(offset_end)) = (
                g.rising_edge.first(),
                g.rising_edge.get(1),
                g.peak_plateau.get(1),
                g.falling_edge.get(1),
            ) else {
                continue;
            };
            let (onset_end, comeup_end, peak_end, offset_end) =
                (onset_end.x, comeup_end.x, peak_end.x, offset_end.x);

            let bar: String = (0..width)
                .map(|cell| {
                    let x = (cell as f64 + 0.5) / width as f64;
                    if x < g.start_x || x > offset_end {
                        ' '
                    } else if x < onset_end {
                        '·'
                    } else if x < comeup_end || x > peak_end {
                        '▄'
                    } else {
                        '█'
                    }
                })
                .collect();

            let Some(at) = chrono::Duration::try_seconds(g.offset_seconds as i64)
                .and_then(|offset| self.start_time.checked_add_signed(offset))
            else {
                continue;
            };
            let mut label: String = g.substance_name.chars().take(16).collect();
            if g.inset_index > 0 {
                label.push_str(&format!(" +{}", g.inset_index));
            }
            output.push_str(&format!(
                "{} {:<18}{} {:.0}%\n",
                at.format("%H:%M"),
                label,
                bar,
                g.vertical_weight * 100.0
            ));
        }

        for u in &self.undrawable {
            output.push_str(&format!(
                "      {:<18}(no complete duration data for {})\n",
                u.substance_name, u.route
            ));
        }

        output.push_str(&"─".repeat(width + 24));
        output.push_str("\n· onset  ▄ comeup/offset  █ peak\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use crate::timeline::{Envelope, IngestionGeometry, NormalizedPoint, Timeline};
    use crate::AdministrationRoute;
    use chrono::{TimeZone, Utc};

    fn mdma_timeline() -> Timeline {
        let p = NormalizedPoint::new;
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        Timeline {
            start_time: start,
            end_time: start + chrono::Duration::hours(6),
            geometries: vec![IngestionGeometry {
                ingestion_index: 0,
                substance_name: "MDMA".into(),
                route: AdministrationRoute::Oral,
                color: String::new(),
                horizontal_weight: 0.5,
                vertical_weight: 1.0,
                inset_index: 0,
                offset_seconds: 0.0,
                start_x: 0.0,
                rising_edge: vec![p(0.1, 0.0), p(0.2, 1.0)],
                peak_plateau: vec![p(0.2, 1.0), p(0.6, 1.0)],
                falling_edge: vec![p(0.6, 1.0), p(0.9, 0.0)],
                envelope: Envelope {
                    early_rise: Vec::new(),
                    late_rise: Vec::new(),
                },
            }],
            undrawable: Vec::new(),
        }
    }

    #[test]
    fn test_chart_has_one_row_per_geometry() {
        let chart = mdma_timeline().render_ascii_chart(40);
        let row = chart.lines().find(|l| l.starts_with("20:00")).unwrap();
        assert!(row.contains("MDMA"));
        assert!(row.contains('█'));
        assert!(row.ends_with("100%"));
    }

    #[test]
    fn test_chart_skips_geometry_with_missing_points() {
        let mut timeline = mdma_timeline();
        timeline.geometries[0].peak_plateau.truncate(1);
        timeline.geometries[0].falling_edge.clear();

        let chart = timeline.render_ascii_chart(40);
        assert!(!chart.lines().any(|l| l.starts_with("20:00")));
        assert!(chart.contains("█ peak"));
    }
}
