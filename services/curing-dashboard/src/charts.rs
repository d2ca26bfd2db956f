//! Time-series charts rebuilt wholesale from history queries

use serde::Serialize;

use crate::clock;
use crate::model::{History, HistoryPoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// One line on a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub color: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub axis_label: String,
    /// Fixed y range, or `None` to fit the data
    pub y_range: Option<(f64, f64)>,
    pub series: Vec<ChartSeries>,
}

impl Chart {
    fn empty(
        title: &str,
        axis_label: &str,
        y_range: Option<(f64, f64)>,
        labels: [(&str, &str); 2],
    ) -> Self {
        Self {
            title: title.to_string(),
            axis_label: axis_label.to_string(),
            y_range,
            series: labels
                .iter()
                .map(|(label, color)| ChartSeries {
                    label: label.to_string(),
                    color: color.to_string(),
                    points: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Range the y axis spans, padded so flat lines stay visible
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if let Some(range) = self.y_range {
            return Some(range);
        }
        let mut values = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.value));
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if (max - min).abs() < f64::EPSILON {
            Some((min - 1.0, max + 1.0))
        } else {
            Some((min, max))
        }
    }

    /// SVG `points` attribute for each series, scaled into `width` x `height`
    pub fn polylines(&self, width: f64, height: f64) -> Vec<(String, String)> {
        let Some((min, max)) = self.bounds() else {
            return Vec::new();
        };
        let span = max - min;

        self.series
            .iter()
            .map(|series| {
                let steps = series.points.len().saturating_sub(1).max(1) as f64;
                let points = series
                    .points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let x = width * i as f64 / steps;
                        let y = height - (p.value.clamp(min, max) - min) / span * height;
                        format!("{:.1},{:.1}", x, y)
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                (series.color.clone(), points)
            })
            .collect()
    }
}

/// Temperature and humidity charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub temperature: Chart,
    pub humidity: Chart,
}

impl Default for Charts {
    fn default() -> Self {
        Self {
            temperature: Chart::empty(
                "Temperatura",
                "Temperatura (°C)",
                None,
                [
                    ("Temperatura betona", "#e74c3c"),
                    ("Temperatura vazduha", "#3498db"),
                ],
            ),
            humidity: Chart::empty(
                "Vlažnost",
                "Vlažnost (%)",
                Some((0.0, 100.0)),
                [
                    ("Vlažnost betona", "#27ae60"),
                    ("Vlažnost vazduha", "#f39c12"),
                ],
            ),
        }
    }
}

/// Pair concrete and air samples by index, up to the shorter of the two.
/// A pair missing any value is skipped so both lines share the same labels.
pub fn build_charts(beton: &[HistoryPoint], vazduh: &[HistoryPoint]) -> Charts {
    let mut charts = Charts::default();

    for (b, v) in beton.iter().zip(vazduh.iter()) {
        let (Some(bt), Some(vt), Some(bh), Some(vh)) =
            (b.temperature, v.temperature, b.humidity, v.humidity)
        else {
            continue;
        };
        let label = clock::chart_label(&b.timestamp);

        let values = [(&mut charts.temperature, bt, vt), (&mut charts.humidity, bh, vh)];
        for (chart, beton_value, vazduh_value) in values {
            chart.series[0].points.push(ChartPoint {
                label: label.clone(),
                value: beton_value,
            });
            chart.series[1].points.push(ChartPoint {
                label: label.clone(),
                value: vazduh_value,
            });
        }
    }

    charts
}

/// Charts from an `/api/istorija` response
pub fn charts_from_history(history: &History) -> Charts {
    build_charts(&history.beton, &history.vazduh)
}
