//! Static Chart Renderer
//! Draws the three LST charts with plotters into in-memory RGB images.
//!
//! Layout shared by every chart:
//! 1. Title centered on top, with the year span of the data
//! 2. Year axis labelled at whole years only
//! 3. Legend in the upper left (trend and variability charts)
//!
//! Every size is given in points and scaled by the configured DPI.

use crate::charts::plotter::{self, Annotation, LabelAnchor, Zone};
use crate::config::{ChartTitles, ConfigError, ReportConfig};
use crate::data::LstTable;
use image::RgbImage;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;

const FONT_FAMILY: &str = "sans-serif";

// Sizes in points
const TITLE_PT: f64 = 16.0;
const AXIS_DESC_PT: f64 = 14.0;
const TICK_PT: f64 = 11.0;
const LEGEND_PT: f64 = 12.0;
const VALUE_LABEL_PT: f64 = 10.0;
const LINE_PT: f64 = 2.0;
const MARKER_PT: f64 = 4.0;
const ZERO_LINE_PT: f64 = 0.8;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Pixel buffer does not fit a {0}x{1} canvas")]
    InvalidBuffer(u32, u32),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

/// The three charts produced per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Urban vs suburban mean temperature lines.
    Trend,
    /// Urban minus suburban bars (heat island effect).
    Difference,
    /// Mean ± standard deviation bands.
    Variability,
}

impl ChartKind {
    /// Rendering order.
    pub const ALL: [ChartKind; 3] = [ChartKind::Trend, ChartKind::Difference, ChartKind::Variability];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::Trend => "temperature_trend.png",
            ChartKind::Difference => "urban_heat_island.png",
            ChartKind::Variability => "temperature_variability.png",
        }
    }

    pub fn title(self, config: &ReportConfig, table: &LstTable) -> String {
        let template = match self {
            ChartKind::Trend => &config.titles.trend,
            ChartKind::Difference => &config.titles.difference,
            ChartKind::Variability => &config.titles.variability,
        };
        ChartTitles::expand(template, table.year_span())
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one chart into an RGB image of `figure_size_in * dpi` pixels.
    pub fn render(
        kind: ChartKind,
        table: &LstTable,
        config: &ReportConfig,
    ) -> Result<RgbImage, RenderError> {
        config.validate()?;
        let (width, height) = config.pixel_size();
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;

            match kind {
                ChartKind::Trend => Self::draw_trend(&root, table, config)?,
                ChartKind::Difference => Self::draw_difference(&root, table, config)?,
                ChartKind::Variability => Self::draw_variability(&root, table, config)?,
            }

            root.present()?;
        }

        tracing::debug!(chart = ?kind, width, height, "chart rendered");
        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::InvalidBuffer(width, height))
    }

    fn font(config: &ReportConfig, points: f64) -> FontDesc<'static> {
        (FONT_FAMILY, config.pt(points) as f64).into_font()
    }

    fn label_style(config: &ReportConfig, annotation: &Annotation, color: RGBColor) -> TextStyle<'static> {
        let vpos = match annotation.anchor {
            LabelAnchor::Bottom => VPos::Bottom,
            LabelAnchor::Top => VPos::Top,
        };
        Self::font(config, VALUE_LABEL_PT)
            .color(&color)
            .pos(Pos::new(HPos::Center, vpos))
    }

    fn label_element(
        config: &ReportConfig,
        annotation: &Annotation,
        color: RGBColor,
    ) -> Text<'static, (f64, f64), String> {
        Text::new(
            annotation.text.clone(),
            (annotation.x, annotation.y),
            Self::label_style(config, annotation, color),
        )
    }

    fn draw_trend<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        table: &LstTable,
        config: &ReportConfig,
    ) -> Result<(), RenderError> {
        let (x0, x1) = plotter::year_range(table);
        let (y0, y1) = plotter::trend_y_range(table);

        let mut chart = ChartBuilder::on(root)
            .caption(ChartKind::Trend.title(config, table), Self::font(config, TITLE_PT))
            .margin(config.pt(12.0))
            .x_label_area_size(config.pt(36.0))
            .y_label_area_size(config.pt(48.0))
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Temperature (°C)")
            .axis_desc_style(Self::font(config, AXIS_DESC_PT))
            .label_style(Self::font(config, TICK_PT))
            .x_labels(plotter::year_label_count(table))
            .x_label_formatter(&|x| plotter::year_tick_label(*x))
            .y_label_formatter(&|y| format!("{:.1}", y))
            .bold_line_style(BLACK.mix(0.15))
            .draw()?;

        let line_width = config.pt(LINE_PT);
        let marker = config.pt(MARKER_PT);
        let legend_len = config.pt(20.0) as i32;

        for zone in Zone::ALL {
            let color = zone.color();
            let points = plotter::mean_points(table, zone);

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(line_width)))?
                .label(zone.name())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + legend_len, y)], color.stroke_width(line_width))
                });
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, marker, color.filled())),
            )?;
        }

        chart.draw_series(
            plotter::trend_annotations(table)
                .iter()
                .map(|a| Self::label_element(config, a, a.zone.color())),
        )?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(Self::font(config, LEGEND_PT))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }

    fn draw_difference<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        table: &LstTable,
        config: &ReportConfig,
    ) -> Result<(), RenderError> {
        let (x0, x1) = plotter::year_range(table);
        let (y0, y1) = plotter::difference_y_range(table);
        let bars = plotter::difference_bars(table);

        let mut chart = ChartBuilder::on(root)
            .caption(ChartKind::Difference.title(config, table), Self::font(config, TITLE_PT))
            .margin(config.pt(12.0))
            .x_label_area_size(config.pt(36.0))
            .y_label_area_size(config.pt(48.0))
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Year")
            .y_desc("Temperature difference (Urban - Suburban, °C)")
            .axis_desc_style(Self::font(config, AXIS_DESC_PT))
            .label_style(Self::font(config, TICK_PT))
            .x_labels(plotter::year_label_count(table))
            .x_label_formatter(&|x| plotter::year_tick_label(*x))
            .y_label_formatter(&|y| format!("{:.1}", y))
            .bold_line_style(BLACK.mix(0.15))
            .draw()?;

        chart.draw_series(
            bars.iter()
                .map(|b| Rectangle::new(b.corners(), b.zone.color().filled())),
        )?;

        // Labels are black on this chart; only the bars carry the zone colour.
        chart.draw_series(
            bars.iter()
                .map(|b| Self::label_element(config, &b.label, BLACK)),
        )?;

        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x0, 0.0), (x1, 0.0)],
            BLACK.stroke_width(config.pt(ZERO_LINE_PT)),
        )))?;

        Ok(())
    }

    fn draw_variability<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        table: &LstTable,
        config: &ReportConfig,
    ) -> Result<(), RenderError> {
        let (x0, x1) = plotter::year_range(table);
        let (y0, y1) = plotter::variability_y_range(table);

        let mut chart = ChartBuilder::on(root)
            .caption(ChartKind::Variability.title(config, table), Self::font(config, TITLE_PT))
            .margin(config.pt(12.0))
            .x_label_area_size(config.pt(36.0))
            .y_label_area_size(config.pt(48.0))
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Temperature (°C)")
            .axis_desc_style(Self::font(config, AXIS_DESC_PT))
            .label_style(Self::font(config, TICK_PT))
            .x_labels(plotter::year_label_count(table))
            .x_label_formatter(&|x| plotter::year_tick_label(*x))
            .y_label_formatter(&|y| format!("{:.1}", y))
            .bold_line_style(BLACK.mix(0.15))
            .draw()?;

        let line_width = config.pt(LINE_PT);
        let marker = config.pt(MARKER_PT);
        let swatch = config.pt(6.0) as i32;

        // Bands first so the mean lines stay on top.
        for zone in Zone::ALL {
            let band = plotter::variability_band(table, zone);
            if band.is_empty() {
                continue;
            }
            let fill = zone.color().mix(0.2);
            chart
                .draw_series(std::iter::once(Polygon::new(
                    plotter::band_polygon(&band),
                    fill.filled(),
                )))?
                .label(zone.name())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - swatch), (x + 3 * swatch, y + swatch)], fill.filled())
                });
        }

        for zone in Zone::ALL {
            let color = zone.color();
            let points = plotter::mean_points(table, zone);
            chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(line_width)))?;
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, marker, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(Self::font(config, LEGEND_PT))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::YearRecord;

    fn small_config() -> ReportConfig {
        ReportConfig {
            dpi: 40,
            display: false,
            ..ReportConfig::default()
        }
    }

    fn table() -> LstTable {
        LstTable::new(vec![
            YearRecord {
                year: 2013,
                urban_mean: 30.0,
                suburban_mean: 28.0,
                urban_stddev: 1.2,
                suburban_stddev: 0.9,
                temperature_difference: 2.0,
            },
            YearRecord {
                year: 2018,
                urban_mean: 29.1,
                suburban_mean: 29.4,
                urban_stddev: 1.0,
                suburban_stddev: 1.1,
                temperature_difference: -0.3,
            },
            YearRecord {
                year: 2023,
                urban_mean: 32.0,
                suburban_mean: 28.5,
                urban_stddev: 1.4,
                suburban_stddev: 0.8,
                temperature_difference: 3.5,
            },
        ])
    }

    #[test]
    fn file_names_are_fixed() {
        let names: Vec<_> = ChartKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "temperature_trend.png",
                "urban_heat_island.png",
                "temperature_variability.png"
            ]
        );
    }

    #[test]
    fn titles_carry_the_year_span() {
        let config = small_config();
        let title = ChartKind::Difference.title(&config, &table());
        assert!(title.contains("2013-2023"), "{title}");
    }

    #[test]
    fn every_chart_fills_the_configured_canvas() {
        let config = small_config();
        let table = table();
        for kind in ChartKind::ALL {
            let img = StaticChartRenderer::render(kind, &table, &config).unwrap();
            assert_eq!(img.dimensions(), (560, 280));
            // Something other than the white background was drawn.
            assert!(img.pixels().any(|p| p.0 != [255, 255, 255]), "{kind:?} is blank");
        }
    }

    #[test]
    fn difference_chart_uses_zone_colours() {
        let config = small_config();
        let img = StaticChartRenderer::render(ChartKind::Difference, &table(), &config).unwrap();
        assert!(img.pixels().any(|p| p.0 == [255, 0, 0]));
        assert!(img.pixels().any(|p| p.0 == [0, 0, 255]));
    }

    #[test]
    fn decade_of_years_renders_on_the_year_axis() {
        let config = small_config();
        let records = (2013..=2023)
            .map(|year| YearRecord {
                year,
                urban_mean: 30.0 + (year - 2013) as f64 * 0.2,
                suburban_mean: 28.5,
                urban_stddev: 1.0,
                suburban_stddev: 0.8,
                temperature_difference: 1.5 + (year - 2013) as f64 * 0.2,
            })
            .collect();
        let table = LstTable::new(records);

        for kind in ChartKind::ALL {
            let img = StaticChartRenderer::render(kind, &table, &config).unwrap();
            assert_eq!(img.dimensions(), (560, 280));
        }
    }

    #[test]
    fn unbounded_canvas_is_refused_before_allocating() {
        let config = ReportConfig {
            figure_size_in: (1e9, 1e9),
            ..small_config()
        };
        assert!(matches!(
            StaticChartRenderer::render(ChartKind::Trend, &table(), &config),
            Err(RenderError::Config(ConfigError::InvalidGeometry))
        ));
    }

    #[test]
    fn empty_table_still_renders() {
        let config = small_config();
        let img =
            StaticChartRenderer::render(ChartKind::Variability, &LstTable::default(), &config)
                .unwrap();
        assert_eq!(img.dimensions(), (560, 280));
    }
}
