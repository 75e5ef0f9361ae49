//! Chart configuration: figure size, typography, per-series styles and labels.
//!
//! Sized for a single column of a two-column paper: 240 pt wide and twice
//! the golden-ratio height, so both panels keep a pleasant aspect.

use anyhow::{ensure, Result};

/// TeX points per inch
pub const PTS_PER_INCH: f64 = 72.27;

/// Golden ratio conjugate, (sqrt(5) - 1) / 2
pub const PHI: f64 = 0.618_033_988_749_894_9;

/// Font points per inch as the renderers count them
const FONT_PTS_PER_INCH: f64 = 72.0;

/// How a series connects its points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Markers only
    None,
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub line: LineStyle,
    pub color: Rgb,
    pub marker: Marker,
}

/// Labels of one stacked panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLabels {
    pub y_label: &'static str,
    /// Legend entries, in the order the panel's series are drawn
    pub legend: [&'static str; 2],
}

/// Everything the renderers need to know about the figure's look
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Target width in TeX points before scaling
    pub width_pt: f64,
    pub scale: f64,
    /// Output pixels per inch
    pub dpi: f64,

    pub font_family: &'static str,
    pub label_pt: f64,
    pub tick_pt: f64,
    pub legend_pt: f64,
    /// Marker diameter
    pub marker_pt: f64,
    pub line_width_pt: f64,

    /// Indexed by display position
    pub series: [SeriesStyle; 4],
    pub x_label: &'static str,
    /// Top panel first
    pub panels: [PanelLabels; 2],

    /// Upper bound on y tick intervals per panel
    pub y_max_intervals: usize,
    /// Fraction of the data span added on each side of an axis
    pub axis_margin: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width_pt: 240.0,
            scale: 1.0,
            dpi: 100.0,
            font_family: "Times",
            label_pt: 9.0,
            tick_pt: 9.0,
            legend_pt: 9.0,
            marker_pt: 6.0,
            line_width_pt: 1.0,
            series: [
                SeriesStyle {
                    line: LineStyle::None,
                    color: Rgb::from_hex(0x3465a4),
                    marker: Marker::Circle,
                },
                SeriesStyle {
                    line: LineStyle::None,
                    color: Rgb::from_hex(0x73d216),
                    marker: Marker::Square,
                },
                SeriesStyle {
                    line: LineStyle::None,
                    color: Rgb::from_hex(0xf57900),
                    marker: Marker::Circle,
                },
                SeriesStyle {
                    line: LineStyle::None,
                    color: Rgb::from_hex(0xcc0000),
                    marker: Marker::Square,
                },
            ],
            x_label: "Number of books",
            panels: [
                PanelLabels {
                    y_label: "Average read time (ms)",
                    legend: ["NumOrders", "GetTitles"],
                },
                PanelLabels {
                    y_label: "Average write time (ms)",
                    legend: ["PlaceOrder", "AddBook"],
                },
            ],
            y_max_intervals: 5,
            axis_margin: 0.05,
        }
    }
}

impl ChartStyle {
    /// Default style with a different scale and resolution
    pub fn sized(scale: f64, dpi: f64) -> Result<Self> {
        ensure!(scale.is_finite() && scale > 0.0, "scale must be positive, got {}", scale);
        ensure!(dpi.is_finite() && dpi > 0.0, "dpi must be positive, got {}", dpi);
        Ok(Self {
            scale,
            dpi,
            ..Default::default()
        })
    }

    /// Draw every series as a solid line through its markers
    pub fn connect_points(&mut self) {
        for series in &mut self.series {
            series.line = LineStyle::Solid;
        }
    }

    /// Figure width and height in inches
    pub fn figure_inches(&self) -> (f64, f64) {
        let width_in = self.width_pt * self.scale / PTS_PER_INCH;
        (width_in, width_in * 2.0 * PHI)
    }

    pub fn figure_pixels(&self) -> (u32, u32) {
        let (w, h) = self.figure_inches();
        ((w * self.dpi).round() as u32, (h * self.dpi).round() as u32)
    }

    /// Convert a font or line size in points to whole pixels, never below one
    pub fn px(&self, pt: f64) -> u32 {
        ((pt * self.dpi / FONT_PTS_PER_INCH).round() as u32).max(1)
    }

    /// Legend label for a display position
    pub fn legend_label(&self, display_idx: usize, axis: usize) -> &'static str {
        self.panels[axis].legend[display_idx % 2]
    }
}
