//! Figure rendering to image files.

use crate::average::AveragedSeries;
use crate::error::RenderError;
use crate::style::{ChartStyle, LineStyle, Marker, Rgb};
use crate::ticks::{finite_bounds, format_thousands, padded_range, pruned_ticks, Ticks};
use anyhow::{Context, Result};
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Image formats a figure can be saved as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
}

impl OutputFormat {
    /// Infer the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Ok(Self::Svg),
            _ => Err(RenderError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Limits and ticks of one stacked panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelAxes {
    pub y_range: (f64, f64),
    pub y_ticks: Ticks,
}

/// Axis limits shared by the file and terminal renderers
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    pub x_range: (f64, f64),
    /// Top panel first
    pub panels: [PanelAxes; 2],
}

impl FigureLayout {
    pub fn new(series: &AveragedSeries, style: &ChartStyle) -> Self {
        let x_range = padded_range(finite_bounds(series.keys()), style.axis_margin);
        let display = series.display_series();

        let panels = std::array::from_fn(|axis| {
            let values = display
                .iter()
                .filter(|(a, _)| *a == axis)
                .flat_map(|(_, ys)| ys.iter());
            let y_range = padded_range(finite_bounds(values), style.axis_margin);
            PanelAxes {
                y_range,
                y_ticks: pruned_ticks(y_range.0, y_range.1, style.y_max_intervals),
            }
        });

        Self { x_range, panels }
    }
}

/// Plot points of one series, skipping anything that cannot be placed
pub fn finite_points(keys: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    keys.iter()
        .copied()
        .zip(ys.iter().copied())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect()
}

/// Linear axis labelled at the pruned locator ticks instead of plotters' own
#[derive(Clone)]
struct TickedAxis {
    linear: RangedCoordf64,
    ticks: Vec<f64>,
}

impl TickedAxis {
    fn new((lo, hi): (f64, f64), ticks: &Ticks) -> Self {
        Self {
            linear: (lo..hi).into(),
            ticks: ticks.values.clone(),
        }
    }
}

impl Ranged for TickedAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.linear.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.ticks.iter().copied().take(hint.max_num_points()).collect()
    }

    fn range(&self) -> Range<f64> {
        self.linear.range()
    }
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Write the figure to `path` in the format its extension names
pub fn save_figure(series: &AveragedSeries, style: &ChartStyle, path: &Path) -> Result<()> {
    match OutputFormat::from_path(path)? {
        OutputFormat::Svg => {
            let svg = render_svg(series, style)?;
            fs::write(path, svg)
                .with_context(|| format!("Failed to write figure: {}", path.display()))?;
        }
    }
    Ok(())
}

/// Render the figure into an in-memory SVG document
pub fn render_svg(series: &AveragedSeries, style: &ChartStyle) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, style.figure_pixels()).into_drawing_area();
        draw_figure(&root, series, style)?;
        root.present()?;
    }
    Ok(svg)
}

/// Draw both panels, read times on top and write times below
fn draw_figure(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    series: &AveragedSeries,
    style: &ChartStyle,
) -> Result<()> {
    root.fill(&WHITE)?;

    let layout = FigureLayout::new(series, style);
    let (_, height) = root.dim_in_pixel();
    let (upper, lower) = root.split_vertically(height as i32 / 2);

    draw_panel(&upper, 0, &layout, series, style)?;
    draw_panel(&lower, 1, &layout, series, style)?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    axis: usize,
    layout: &FigureLayout,
    series: &AveragedSeries,
    style: &ChartStyle,
) -> Result<()> {
    let panel = &layout.panels[axis];
    let labels = &style.panels[axis];
    // only the bottom panel carries x tick labels and the x description
    let is_bottom = axis == 1;

    let (x_lo, x_hi) = layout.x_range;

    let mut chart = ChartBuilder::on(area)
        .margin(style.px(3.0))
        .x_label_area_size(if is_bottom { style.px(24.0) } else { 0 })
        .y_label_area_size(style.px(34.0))
        .build_cartesian_2d(x_lo..x_hi, TickedAxis::new(panel.y_range, &panel.y_ticks))?;

    let tick_font = (style.font_family, style.px(style.tick_pt) as f64);
    let label_font = (style.font_family, style.px(style.label_pt) as f64);
    let x_formatter = |x: &f64| format_thousands(*x);
    let y_formatter = |y: &f64| panel.y_ticks.label(*y);

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_labels(5)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .label_style(tick_font)
        .axis_desc_style(label_font)
        .y_desc(labels.y_label);
    if is_bottom {
        mesh.x_desc(style.x_label);
    }
    mesh.draw()?;

    let radius = (style.px(style.marker_pt) / 2).max(1) as i32;
    let line_width = style.px(style.line_width_pt);

    for (idx, (series_axis, ys)) in series.display_series().iter().enumerate() {
        if *series_axis != axis {
            continue;
        }
        let look = style.series[idx];
        let color = rgb(look.color);
        let fill = color.filled();
        let points = finite_points(series.keys(), ys);
        let label = style.legend_label(idx, axis);

        if look.line == LineStyle::Solid {
            chart.draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(line_width),
            ))?;
        }

        match look.marker {
            Marker::Circle => {
                chart
                    .draw_series(points.iter().map(|&p| Circle::new(p, radius, fill)))?
                    .label(label)
                    .legend(move |(x, y)| Circle::new((x, y), radius, fill));
            }
            Marker::Square => {
                chart
                    .draw_series(points.iter().map(|&p| {
                        EmptyElement::at(p) + Rectangle::new([(-radius, -radius), (radius, radius)], fill)
                    }))?
                    .label(label)
                    .legend(move |(x, y)| {
                        Rectangle::new([(x - radius, y - radius), (x + radius, y + radius)], fill)
                    });
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((style.font_family, style.px(style.legend_pt) as f64))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}
