//! Chart Plotter Module
//! Pure chart geometry: colours, value labels, bars and bands computed from the table.
//! Nothing here draws; the renderer turns these into plotters elements.

use crate::data::{LstTable, YearRecord};
use plotters::style::RGBColor;

/// Urban series colour (pure red).
pub const URBAN_COLOR: RGBColor = RGBColor(255, 0, 0);
/// Suburban series colour (pure blue).
pub const SUBURBAN_COLOR: RGBColor = RGBColor(0, 0, 255);

/// Vertical distance between a mean marker and its label, in °C.
pub const TREND_LABEL_OFFSET: f64 = 0.5;
/// Vertical distance between a bar end and its label, in °C.
pub const BAR_LABEL_OFFSET: f64 = 0.1;
pub const BAR_WIDTH: f64 = 0.8;
/// Extra x-axis room on either side of the first/last year.
pub const YEAR_MARGIN: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Urban,
    Suburban,
}

impl Zone {
    pub const ALL: [Zone; 2] = [Zone::Urban, Zone::Suburban];

    pub fn name(self) -> &'static str {
        match self {
            Zone::Urban => "Urban",
            Zone::Suburban => "Suburban",
        }
    }

    pub fn color(self) -> RGBColor {
        match self {
            Zone::Urban => URBAN_COLOR,
            Zone::Suburban => SUBURBAN_COLOR,
        }
    }

    /// Positive differences belong to the urban side; zero and below to the suburban side.
    pub fn for_difference(diff: f64) -> Zone {
        if diff > 0.0 {
            Zone::Urban
        } else {
            Zone::Suburban
        }
    }

    pub fn mean(self, record: &YearRecord) -> f64 {
        match self {
            Zone::Urban => record.urban_mean,
            Zone::Suburban => record.suburban_mean,
        }
    }

    pub fn stddev(self, record: &YearRecord) -> f64 {
        match self {
            Zone::Urban => record.urban_stddev,
            Zone::Suburban => record.suburban_stddev,
        }
    }
}

/// Where a label hangs relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAnchor {
    /// Text sits above the point.
    Bottom,
    /// Text hangs below the point.
    Top,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub zone: Zone,
    pub anchor: LabelAnchor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub year: i32,
    pub height: f64,
    pub zone: Zone,
    pub label: Annotation,
}

impl Bar {
    /// Lower-left and upper-right corners in data coordinates.
    pub fn corners(&self) -> [(f64, f64); 2] {
        let x = self.year as f64;
        [
            (x - BAR_WIDTH / 2.0, 0.0_f64.min(self.height)),
            (x + BAR_WIDTH / 2.0, 0.0_f64.max(self.height)),
        ]
    }
}

/// `(year, mean - sd, mean + sd)` for one year of one zone.
pub type BandPoint = (f64, f64, f64);

/// Value rounded to one decimal with a degree suffix.
pub fn format_celsius(value: f64) -> String {
    format!("{:.1}°C", value)
}

pub fn mean_points(table: &LstTable, zone: Zone) -> Vec<(f64, f64)> {
    table
        .records()
        .iter()
        .map(|r| (r.year as f64, zone.mean(r)))
        .collect()
}

/// Urban labels above the urban line, suburban labels below the suburban line.
pub fn trend_annotations(table: &LstTable) -> Vec<Annotation> {
    let mut annotations = Vec::with_capacity(table.len() * 2);
    for record in table.records() {
        let x = record.year as f64;
        annotations.push(Annotation {
            x,
            y: record.urban_mean + TREND_LABEL_OFFSET,
            text: format_celsius(record.urban_mean),
            zone: Zone::Urban,
            anchor: LabelAnchor::Bottom,
        });
        annotations.push(Annotation {
            x,
            y: record.suburban_mean - TREND_LABEL_OFFSET,
            text: format_celsius(record.suburban_mean),
            zone: Zone::Suburban,
            anchor: LabelAnchor::Top,
        });
    }
    annotations
}

pub fn difference_bars(table: &LstTable) -> Vec<Bar> {
    table
        .records()
        .iter()
        .map(|r| {
            let height = r.temperature_difference;
            let zone = Zone::for_difference(height);
            let (y, anchor) = if height > 0.0 {
                (height + BAR_LABEL_OFFSET, LabelAnchor::Bottom)
            } else {
                (height - BAR_LABEL_OFFSET, LabelAnchor::Top)
            };
            Bar {
                year: r.year,
                height,
                zone,
                label: Annotation {
                    x: r.year as f64,
                    y,
                    text: format_celsius(height),
                    zone,
                    anchor,
                },
            }
        })
        .collect()
}

pub fn variability_band(table: &LstTable, zone: Zone) -> Vec<BandPoint> {
    table
        .records()
        .iter()
        .map(|r| {
            let mean = zone.mean(r);
            let sd = zone.stddev(r);
            (r.year as f64, mean - sd, mean + sd)
        })
        .collect()
}

/// Closed outline of a band: upper edge left to right, then lower edge back.
pub fn band_polygon(band: &[BandPoint]) -> Vec<(f64, f64)> {
    band.iter()
        .map(|&(x, _, hi)| (x, hi))
        .chain(band.iter().rev().map(|&(x, lo, _)| (x, lo)))
        .collect()
}

/// Padded y-range covering every finite value.
///
/// Falls back to `0..1` when there is nothing finite to cover, and widens a
/// zero-height range by `min_pad` on each side.
pub fn value_range<I>(values: I, pad_fraction: f64, min_pad: f64) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_infinite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * pad_fraction).max(min_pad);
    (min - pad, max + pad)
}

/// X-range spanning all years with a margin; defaults to `0..1` for an empty table.
pub fn year_range(table: &LstTable) -> (f64, f64) {
    let years = table.records().iter().map(|r| r.year as f64);
    let min = years.clone().fold(f64::INFINITY, f64::min);
    let max = years.fold(f64::NEG_INFINITY, f64::max);
    if min.is_infinite() {
        return (0.0, 1.0);
    }
    (min - YEAR_MARGIN, max + YEAR_MARGIN)
}

/// Tick label for the year axis: whole years print as integers, anything else stays blank.
pub fn year_tick_label(x: f64) -> String {
    if (x - x.round()).abs() < 1e-6 {
        format!("{:.0}", x)
    } else {
        String::new()
    }
}

/// Upper bound on year-axis ticks; enough for a step of one year across the span.
pub fn year_label_count(table: &LstTable) -> usize {
    let (x0, x1) = year_range(table);
    (x1 - x0).ceil() as usize + 1
}

/// Y-range for the trend chart, leaving room for labels above and below.
pub fn trend_y_range(table: &LstTable) -> (f64, f64) {
    value_range(
        trend_annotations(table)
            .into_iter()
            .map(|a| a.y)
            .chain(table.records().iter().flat_map(|r| [r.urban_mean, r.suburban_mean])),
        0.1,
        0.5,
    )
}

/// Y-range for the difference chart; always includes the zero line.
pub fn difference_y_range(table: &LstTable) -> (f64, f64) {
    value_range(
        difference_bars(table)
            .into_iter()
            .flat_map(|b| [b.height, b.label.y])
            .chain(std::iter::once(0.0)),
        0.12,
        0.2,
    )
}

pub fn variability_y_range(table: &LstTable) -> (f64, f64) {
    value_range(
        Zone::ALL
            .iter()
            .flat_map(|&zone| variability_band(table, zone))
            .flat_map(|(_, lo, hi)| [lo, hi]),
        0.08,
        0.5,
    )
}
