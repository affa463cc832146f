//! Line chart rendering for derived series.

use crate::export::OutputError;
use chrono::Duration;
use plotters::prelude::*;
use quarry_core::TimeSeries;
use std::fs;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1024, 768);

/// Render one dated series as a PNG line chart.
///
/// X axis is the reporting period, y axis the raw value with `y_label` as
/// its description. The destination directory is created if absent.
pub fn render_line_chart(
    series: &TimeSeries,
    title: &str,
    y_label: &str,
    path: &Path,
) -> Result<(), OutputError> {
    let (start, end) = series
        .period_bounds()
        .ok_or_else(|| OutputError::Chart("cannot chart an empty series".to_string()))?;
    let (lo, hi) = series
        .value_bounds()
        .ok_or_else(|| OutputError::Chart("cannot chart an empty series".to_string()))?;

    // Degenerate ranges make plotters panic; widen them slightly.
    let end = if start == end { end + Duration::days(1) } else { end };
    let pad = ((hi - lo).abs() * 0.05).max(1.0);
    let (lo, hi) = (lo - pad, hi + pad);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| OutputError::Chart(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(start..end, lo..hi)
        .map_err(|e| OutputError::Chart(e.to_string()))?;

    chart
        .configure_mesh()
        .y_desc(y_label)
        .x_labels(series.len().min(8))
        .draw()
        .map_err(|e| OutputError::Chart(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            series.points().iter().map(|(period, value)| (*period, *value)),
            &BLUE,
        ))
        .map_err(|e| OutputError::Chart(e.to_string()))?;

    chart
        .draw_series(
            series
                .points()
                .iter()
                .map(|(period, value)| Circle::new((*period, *value), 3, BLUE.filled())),
        )
        .map_err(|e| OutputError::Chart(e.to_string()))?;

    root.present().map_err(|e| OutputError::Chart(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 9, 30).unwrap()
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("revenue_over_time.png");
        let series = TimeSeries::new(vec![
            (d(2021), 100.0),
            (d(2022), 110.0),
            (d(2023), 121.0),
        ]);

        render_line_chart(&series, "AAPL Revenue Over Time", "Revenue ($)", &path).unwrap();
        let metadata = fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_empty_series_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let series = TimeSeries::new(vec![]);

        let err = render_line_chart(&series, "Empty", "Value", &path).unwrap_err();
        assert!(matches!(err, OutputError::Chart(_)));
        assert!(!path.exists());
    }
}
