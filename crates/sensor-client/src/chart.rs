//! Chart series for the readings line chart
//!
//! The API returns readings newest first. The chart plots them oldest first
//! with temperature and humidity on separate vertical scales.

use std::fmt::Display;

use chrono::TimeZone;

use crate::models::Reading;

/// Format of the x-axis labels
pub const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub time: String,
    pub temperature: f64,
    pub humidity: f64,
}

/// Reverse `readings` into chronological order and label them in `tz`
pub fn chart_series<Tz: TimeZone>(readings: &[Reading], tz: &Tz) -> Vec<ChartPoint>
where
    Tz::Offset: Display,
{
    readings
        .iter()
        .rev()
        .map(|reading| ChartPoint {
            time: reading
                .timestamp
                .with_timezone(tz)
                .format(LABEL_FORMAT)
                .to_string(),
            temperature: reading.temperature,
            humidity: reading.humidity,
        })
        .collect()
}

/// Value range of one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |range, value| match range {
            None => Some(AxisRange {
                min: value,
                max: value,
            }),
            Some(range) => Some(AxisRange {
                min: range.min.min(value),
                max: range.max.max(value),
            }),
        })
    }

    /// Flat series get one unit of headroom each way
    fn widened(self) -> Self {
        if self.max > self.min {
            self
        } else {
            AxisRange {
                min: self.min - 1.0,
                max: self.max + 1.0,
            }
        }
    }
}

/// SVG geometry for a rendered chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlot {
    pub width: f64,
    pub height: f64,
    /// `points` attribute of the temperature polyline
    pub temperature: String,
    /// `points` attribute of the humidity polyline
    pub humidity: String,
    pub temperature_range: AxisRange,
    pub humidity_range: AxisRange,
    /// x position and text of each time label
    pub labels: Vec<(f64, String)>,
}

/// Lay out `points` inside a `width` x `height` box with `padding` on all sides.
///
/// Returns `None` when there is nothing to draw.
pub fn plot(points: &[ChartPoint], width: f64, height: f64, padding: f64) -> Option<ChartPlot> {
    let temperature_range = AxisRange::of(points.iter().map(|p| p.temperature))?.widened();
    let humidity_range = AxisRange::of(points.iter().map(|p| p.humidity))?.widened();

    let inner_width = (width - 2.0 * padding).max(0.0);
    let inner_height = (height - 2.0 * padding).max(0.0);
    let x = |index: usize| {
        if points.len() == 1 {
            padding + inner_width / 2.0
        } else {
            padding + inner_width * index as f64 / (points.len() - 1) as f64
        }
    };
    let y = |value: f64, range: AxisRange| {
        padding + inner_height * (range.max - value) / (range.max - range.min)
    };
    let polyline = |value: fn(&ChartPoint) -> f64, range: AxisRange| {
        points
            .iter()
            .enumerate()
            .map(|(index, point)| format!("{:.1},{:.1}", x(index), y(value(point), range)))
            .collect::<Vec<_>>()
            .join(" ")
    };

    Some(ChartPlot {
        width,
        height,
        temperature: polyline(|p| p.temperature, temperature_range),
        humidity: polyline(|p| p.humidity, humidity_range),
        temperature_range,
        humidity_range,
        labels: points
            .iter()
            .enumerate()
            .map(|(index, point)| (x(index), point.time.clone()))
            .collect(),
    })
}
