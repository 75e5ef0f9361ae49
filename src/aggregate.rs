//! Grouping of records by their reference value.

use crate::input::{Record, METRIC_COUNT};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Metric values of one sample, in source column order
pub type Tuple = [f64; METRIC_COUNT];

/// Reference value used as a bucket key.
///
/// Identity is exact: two keys are equal only if the parsed values are
/// bit-identical, so `1000` and `1000.0000001` land in different buckets.
/// The input is expected to hold small integers written as floats, where
/// that is harmless; grouping is not tolerance-based. The exceptions are
/// `-0.0`, which is the same key as `0.0`, and NaN, which is a single key
/// ordered after every number.
#[derive(Debug, Clone, Copy)]
pub struct GroupKey(pub f64);

impl GroupKey {
    fn canonical_bits(self) -> u64 {
        if self.0 == 0.0 {
            0.0f64.to_bits()
        } else if self.0.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.0.to_bits()
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bits() == other.canonical_bits()
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_bits().hash(state);
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        f64::from_bits(self.canonical_bits()).total_cmp(&f64::from_bits(other.canonical_bits()))
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Buckets of metric tuples keyed by reference value
#[derive(Debug, Default)]
pub struct Aggregation {
    buckets: HashMap<GroupKey, Vec<Tuple>>,
    samples: usize,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut aggregation = Self::new();
        for record in records {
            aggregation.push(record);
        }
        aggregation
    }

    /// Append a record's metrics to its bucket, creating the bucket on first sight
    pub fn push(&mut self, record: &Record) {
        self.buckets
            .entry(GroupKey(record.key))
            .or_default()
            .push(record.values);
        self.samples += 1;
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of records pushed
    pub fn sample_count(&self) -> usize {
        self.samples
    }

    /// Buckets sorted by ascending key.
    pub fn into_sorted(self) -> Vec<(GroupKey, Vec<Tuple>)> {
        let mut entries: Vec<_> = self.buckets.into_iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}
