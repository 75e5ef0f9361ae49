//! benchplot - plot averaged read and write times of a bookstore benchmark.
//!
//! Reads whitespace-separated samples from stdin, averages the four timed
//! operations per number of books and draws them as two stacked panels,
//! either saved to a file or shown in the terminal.

mod aggregate;
mod average;
mod display;
mod error;
mod input;
mod plot;
mod style;
mod ticks;

use aggregate::Aggregation;
use anyhow::{Context, Result};
use average::AveragedSeries;
use clap::Parser;
use error::PipelineError;
use input::Record;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use style::ChartStyle;

/// Average benchmark samples from stdin and plot read/write times
#[derive(Parser, Debug)]
#[command(name = "benchplot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Save the figure here (.svg) instead of opening the interactive display
    output: Option<PathBuf>,

    /// Multiplier applied to the 240 pt figure width
    #[arg(long, default_value = "1.0")]
    scale: f64,

    /// Resolution of the saved figure in pixels per inch
    #[arg(long, default_value = "100")]
    dpi: f64,

    /// Also write the averaged series as JSON Lines ("-" for stdout)
    #[arg(long)]
    series: Option<PathBuf>,

    /// Join each series' markers with a solid line
    #[arg(long)]
    connect: bool,

    /// Suppress status messages
    #[arg(short, long)]
    quiet: bool,
}

/// Group records by reference value and average each group.
fn summarize(records: &[Record], quiet: bool) -> Result<AveragedSeries, PipelineError> {
    let aggregation = Aggregation::from_records(records);
    if aggregation.is_empty() {
        return Err(PipelineError::NoSamples);
    }
    if !quiet {
        eprintln!(
            "Read {} samples in {} groups",
            aggregation.sample_count(),
            aggregation.len()
        );
    }
    Ok(average::average(aggregation))
}

fn write_series(series: &AveragedSeries, path: &Path) -> Result<()> {
    if path.as_os_str() == "-" {
        series.write_json_lines(io::stdout().lock())
    } else {
        let file = File::create(path)
            .with_context(|| format!("Failed to create series file: {}", path.display()))?;
        series.write_json_lines(BufWriter::new(file))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut style = ChartStyle::sized(args.scale, args.dpi)?;
    if args.connect {
        style.connect_points();
    }

    // Reject an unusable output path before consuming the whole input
    if let Some(ref output) = args.output {
        plot::OutputFormat::from_path(output)?;
    }

    let records = input::read_records(io::stdin().lock())?;
    let series = summarize(&records, args.quiet)?;

    if let Some(ref path) = args.series {
        write_series(&series, path)?;
    }

    match args.output {
        Some(ref output) => {
            plot::save_figure(&series, &style, output)?;
            if !args.quiet {
                let (w, h) = style.figure_pixels();
                eprintln!("Saved {}x{} figure to: {}", w, h, output.display());
            }
        }
        None => display::show(&series, &style)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;

    fn run(text: &str) -> Result<AveragedSeries, PipelineError> {
        let records = input::read_records(Cursor::new(text))?;
        summarize(&records, true)
    }

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn cli_defaults_and_output() {
        let args = Args::try_parse_from(["benchplot"]).unwrap();
        assert!(args.output.is_none());
        assert_eq!(args.scale, 1.0);
        assert_eq!(args.dpi, 100.0);
        assert!(!args.quiet);
        assert!(!args.connect);

        let args = Args::try_parse_from(["benchplot", "fig.svg", "--scale", "2", "--series", "-"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("fig.svg")));
        assert_eq!(args.scale, 2.0);
        assert_eq!(args.series, Some(PathBuf::from("-")));

        assert!(Args::try_parse_from(["benchplot", "a.svg", "b.svg"]).is_err());
    }

    #[test]
    fn end_to_end_display_vector() {
        let series = run("0 1 2 10 20 30 40\n0 1 2 30 40 50 60\n").unwrap();
        assert_eq!(series.keys(), &[1.0]);
        assert_eq!(series.means(), &[[20.0, 30.0, 40.0, 50.0]]);

        let shown: Vec<f64> = series.display_series().iter().map(|(_, ys)| ys[0]).collect();
        assert_eq!(shown, vec![50.0, 40.0, 30.0, 20.0]);
    }

    #[test]
    fn arrival_order_does_not_matter() {
        let forward = run("0 5 0 1 1 1 1\n0 1 0 2 2 2 2\n0 3 0 3 3 3 3\n0 1 0 4 4 4 4\n").unwrap();
        let backward = run("0 1 0 4 4 4 4\n0 3 0 3 3 3 3\n0 1 0 2 2 2 2\n0 5 0 1 1 1 1\n").unwrap();

        assert_eq!(forward.keys(), &[1.0, 3.0, 5.0]);
        assert_eq!(forward, backward);
        assert_eq!(forward.means()[0], [3.0; 4]);
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let text = "7 100 0 1.5 2.5 3.5 4.5\n\n7 200 0 1 1 1 1\n7 100 0 0.5 0.5 0.5 0.5\n";
        let dump = |series: AveragedSeries| {
            let mut out = Vec::new();
            series.write_json_lines(&mut out).unwrap();
            out
        };
        assert_eq!(dump(run(text).unwrap()), dump(run(text).unwrap()));
    }

    #[test]
    fn empty_or_blank_input_has_nothing_to_plot() {
        assert!(matches!(run(""), Err(PipelineError::NoSamples)));
        assert!(matches!(run("\n  \n\t\n"), Err(PipelineError::NoSamples)));
    }

    #[test]
    fn bad_input_is_fatal() {
        assert!(matches!(
            run("0 1 2 3 4 5 6\n0 1 2 3\n"),
            Err(PipelineError::ShortRecord { line: 2, .. })
        ));
        assert!(matches!(
            run("0 1 2 3 4 five 6\n"),
            Err(PipelineError::MalformedToken { column: 5, .. })
        ));
    }

    #[test]
    fn series_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.jsonl");
        let series = run("0 2 0 1 2 3 4\n0 4 0 5 6 7 8\n").unwrap();
        write_series(&series, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "{\"key\":2.0,\"means\":[1.0,2.0,3.0,4.0]}\n{\"key\":4.0,\"means\":[5.0,6.0,7.0,8.0]}\n"
        );
    }
}
