//! Sample parsing from whitespace-separated benchmark output.
//!
//! Every non-blank line is one sample. Only a few columns matter:
//! the reference column becomes the x value, the interesting columns
//! become the four plotted metrics.

use crate::error::PipelineError;
use std::io::BufRead;

/// Field holding the x value samples are grouped by (number of books).
pub const REFERENCE_COLUMN: usize = 1;

/// Fields holding the four timed operations, in source order.
pub const INTERESTING_COLUMNS: [usize; 4] = [3, 4, 5, 6];

/// Number of metric columns carried per sample.
pub const METRIC_COUNT: usize = INTERESTING_COLUMNS.len();

/// Shortest line that still covers every column above.
pub const MIN_FIELDS: usize = max_column() + 1;

const fn max_column() -> usize {
    let mut max = REFERENCE_COLUMN;
    let mut i = 0;
    while i < INTERESTING_COLUMNS.len() {
        if INTERESTING_COLUMNS[i] > max {
            max = INTERESTING_COLUMNS[i];
        }
        i += 1;
    }
    max
}

/// One sample projected onto the columns we care about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub key: f64,
    pub values: [f64; METRIC_COUNT],
}

impl Record {
    /// Project parsed fields onto the schema. `line` is only used for errors.
    pub fn from_fields(fields: &[f64], line: usize) -> Result<Self, PipelineError> {
        if fields.len() < MIN_FIELDS {
            return Err(PipelineError::ShortRecord {
                line,
                found: fields.len(),
                required: MIN_FIELDS,
            });
        }

        let values = INTERESTING_COLUMNS.map(|col| fields[col]);
        Ok(Self {
            key: fields[REFERENCE_COLUMN],
            values,
        })
    }
}

/// Split a line into numeric fields. Blank lines yield `None`.
pub fn parse_line(line: &str, line_num: usize) -> Result<Option<Vec<f64>>, PipelineError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    line.split_whitespace()
        .enumerate()
        .map(|(column, token)| {
            token.parse::<f64>().map_err(|source| PipelineError::MalformedToken {
                line: line_num,
                column,
                token: token.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Read records until end of stream. The first bad line aborts the whole read.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<Record>, PipelineError> {
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.map_err(|source| PipelineError::Io { line: line_num, source })?;
        if let Some(fields) = parse_line(&line, line_num)? {
            records.push(Record::from_fields(&fields, line_num)?);
        }
    }

    Ok(records)
}
