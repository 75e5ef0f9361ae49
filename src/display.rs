//! Interactive terminal display of the figure using ratatui.

use crate::average::AveragedSeries;
use crate::plot::{finite_points, FigureLayout};
use crate::style::{ChartStyle, LineStyle, Marker, Rgb};
use crate::ticks::{format_thousands, Ticks};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};

/// Number of evenly spaced labels on the terminal x axis
const AXIS_LABELS: usize = 3;

/// Raw-mode alternate screen, restored when dropped
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn start() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                Err(e.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Show the figure until the user quits with `q` or Esc
pub fn show(series: &AveragedSeries, style: &ChartStyle) -> Result<()> {
    let mut session = TerminalSession::start()?;

    loop {
        session.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Length(1)])
                .split(f.area());

            render_figure(f, chunks[0], series, style);
            render_help_bar(f, chunks[1]);
        })?;

        // anything else, including resizes, just redraws
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                break;
            }
        }
    }

    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn marker_symbol(marker: Marker) -> symbols::Marker {
    match marker {
        Marker::Circle => symbols::Marker::Dot,
        Marker::Square => symbols::Marker::Block,
    }
}

fn graph_type(line: LineStyle) -> GraphType {
    match line {
        LineStyle::None => GraphType::Scatter,
        LineStyle::Solid => GraphType::Line,
    }
}

/// Evenly spaced labels between the bounds; terminal axes cannot place them at values
fn spread_labels(lo: f64, hi: f64, format: impl Fn(f64) -> String) -> Vec<String> {
    (0..AXIS_LABELS)
        .map(|i| format(lo + (hi - lo) * i as f64 / (AXIS_LABELS - 1) as f64))
        .collect()
}

/// Bounds widened to whole tick steps with one label per step.
///
/// ratatui spreads labels evenly between the bounds, so this is what puts
/// each locator tick at its value. Steps the locator dropped stay blank.
fn stepped_axis((lo, hi): (f64, f64), ticks: &Ticks) -> ([f64; 2], Vec<String>) {
    let step = ticks.step;
    if ticks.values.is_empty() || !(step > 0.0) {
        return ([lo, hi], Vec::new());
    }
    let first = (lo / step).floor();
    let last = (hi / step).ceil();
    let bounds = [first * step, last * step];
    if !(bounds[0].is_finite() && bounds[1].is_finite()) {
        return ([lo, hi], Vec::new());
    }

    let labels = (0..=(last - first) as i64)
        .map(|i| {
            let value = (first + i as f64) * step;
            if ticks.values.iter().any(|t| (t - value).abs() <= step * 1e-6) {
                ticks.label(value)
            } else {
                String::new()
            }
        })
        .collect();
    (bounds, labels)
}

/// Render both panels stacked in `area`
pub fn render_figure(f: &mut Frame, area: Rect, series: &AveragedSeries, style: &ChartStyle) {
    let layout = FigureLayout::new(series, style);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let display = series.display_series();
    for (axis, chunk) in chunks.iter().enumerate() {
        let points: Vec<(usize, Vec<(f64, f64)>)> = display
            .iter()
            .enumerate()
            .filter(|(_, (a, _))| *a == axis)
            .map(|(idx, (_, ys))| (idx, finite_points(series.keys(), ys)))
            .collect();
        render_panel(f, *chunk, axis, &layout, &points, style);
    }
}

fn render_panel(
    f: &mut Frame,
    area: Rect,
    axis: usize,
    layout: &FigureLayout,
    points: &[(usize, Vec<(f64, f64)>)],
    style: &ChartStyle,
) {
    let labels = &style.panels[axis];
    let panel = &layout.panels[axis];
    let (x_lo, x_hi) = layout.x_range;
    let (y_bounds, y_labels) = stepped_axis(panel.y_range, &panel.y_ticks);

    let datasets: Vec<Dataset> = points
        .iter()
        .map(|(idx, data)| {
            let look = style.series[*idx];
            Dataset::default()
                .name(style.legend_label(*idx, axis))
                .marker(marker_symbol(look.marker))
                .graph_type(graph_type(look.line))
                .style(Style::default().fg(color(look.color)))
                .data(data)
        })
        .collect();

    let mut x_axis = Axis::default()
        .bounds([x_lo, x_hi])
        .style(Style::default().fg(Color::Gray))
        .labels(spread_labels(x_lo, x_hi, format_thousands));
    if axis == 1 {
        x_axis = x_axis.title(style.x_label);
    }

    let y_axis = Axis::default()
        .bounds(y_bounds)
        .style(Style::default().fg(Color::Gray))
        .labels(y_labels);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {} ", labels.y_label))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(Some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    f.render_widget(chart, area);
}

fn render_help_bar(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(" q: Quit ")
        .style(Style::default().fg(Color::Black).bg(Color::Gray));
    f.render_widget(paragraph, area);
}
