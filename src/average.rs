//! Per-group column means, ordered by reference value.

use crate::aggregate::{Aggregation, Tuple};
use crate::input::METRIC_COUNT;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Source column shown at each display position.
pub const DISPLAY_ORDER: [usize; METRIC_COUNT] = [3, 2, 1, 0];

/// Panel each display position is drawn on (0 = top, 1 = bottom).
pub const AXIS_ASSIGNMENT: [usize; METRIC_COUNT] = [0, 0, 1, 1];

/// One line of the series dump
#[derive(Debug, Clone, Serialize)]
pub struct AveragedPoint {
    pub key: f64,
    pub means: Tuple,
}

/// Ascending keys with index-aligned mean tuples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AveragedSeries {
    keys: Vec<f64>,
    means: Vec<Tuple>,
}

/// Arithmetic mean of each column across a non-empty bucket
pub fn column_means(bucket: &[Tuple]) -> Tuple {
    let n = bucket.len() as f64;
    let mut sums = [0.0; METRIC_COUNT];
    for tuple in bucket {
        for (sum, value) in sums.iter_mut().zip(tuple) {
            *sum += value;
        }
    }
    sums.map(|sum| sum / n)
}

/// Sort the buckets by key and average each one.
pub fn average(aggregation: Aggregation) -> AveragedSeries {
    let (keys, means): (Vec<f64>, Vec<Tuple>) = aggregation
        .into_sorted()
        .into_iter()
        .map(|(key, bucket)| (key.value(), column_means(&bucket)))
        .unzip();

    AveragedSeries { keys, means }
}

impl AveragedSeries {
    pub fn keys(&self) -> &[f64] {
        &self.keys
    }

    pub fn means(&self) -> &[Tuple] {
        &self.means
    }

    /// Means of one source column across all keys
    pub fn column(&self, column: usize) -> Vec<f64> {
        self.means.iter().map(|m| m[column]).collect()
    }

    /// The four series in display order, each paired with its panel.
    pub fn display_series(&self) -> [(usize, Vec<f64>); METRIC_COUNT] {
        std::array::from_fn(|i| (AXIS_ASSIGNMENT[i], self.column(DISPLAY_ORDER[i])))
    }

    /// Write one JSON object per key
    pub fn write_json_lines<W: Write>(&self, mut writer: W) -> Result<()> {
        for (key, means) in self.keys().iter().zip(self.means()) {
            let point = AveragedPoint { key: *key, means: *means };
            serde_json::to_writer(&mut writer, &point)?;
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Record;

    fn series(records: &[(f64, Tuple)]) -> AveragedSeries {
        let records: Vec<Record> = records
            .iter()
            .map(|&(key, values)| Record { key, values })
            .collect();
        average(Aggregation::from_records(&records))
    }

    #[test]
    fn means_per_column() {
        let s = series(&[(1.0, [10.0, 20.0, 30.0, 40.0]), (1.0, [30.0, 40.0, 50.0, 60.0])]);
        assert_eq!(s.keys(), &[1.0]);
        assert_eq!(s.means(), &[[20.0, 30.0, 40.0, 50.0]]);
    }

    #[test]
    fn single_sample_bucket_is_its_own_mean() {
        assert_eq!(column_means(&[[1.5, -2.0, 0.0, 7.0]]), [1.5, -2.0, 0.0, 7.0]);
    }

    #[test]
    fn keys_ascend() {
        let s = series(&[(5.0, [5.0; 4]), (1.0, [1.0; 4]), (3.0, [3.0; 4])]);
        assert_eq!(s.keys(), &[1.0, 3.0, 5.0]);
        assert_eq!(s.column(0), vec![1.0, 3.0, 5.0]);
        assert_eq!(s.means().len(), 3);
    }

    #[test]
    fn display_order_reverses_columns() {
        let s = series(&[(1.0, [10.0, 20.0, 30.0, 40.0]), (1.0, [30.0, 40.0, 50.0, 60.0])]);
        let display = s.display_series();

        let values: Vec<f64> = display.iter().map(|(_, ys)| ys[0]).collect();
        assert_eq!(values, vec![50.0, 40.0, 30.0, 20.0]);
        let axes: Vec<usize> = display.iter().map(|(axis, _)| *axis).collect();
        assert_eq!(axes, vec![0, 0, 1, 1]);
    }

    #[test]
    fn json_lines_are_deterministic() {
        let input = [
            (4.0, [1.0, 2.0, 3.0, 4.0]),
            (2.0, [0.5, 0.25, 0.125, 1e-3]),
            (4.0, [3.0, 4.0, 5.0, 6.0]),
            (8.0, [9.0; 4]),
        ];
        let mut first = Vec::new();
        series(&input).write_json_lines(&mut first).unwrap();
        let mut second = Vec::new();
        series(&input).write_json_lines(&mut second).unwrap();

        assert_eq!(first, second);
        let text = String::from_utf8(first).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], r#"{"key":4.0,"means":[2.0,3.0,4.0,5.0]}"#);
    }

    #[test]
    fn empty_series() {
        let s = average(Aggregation::new());
        assert!(s.keys().is_empty());
        let mut out = Vec::new();
        s.write_json_lines(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
