//! Axis ranges, tick placement and tick label formatting.

use num_format::{Locale, ToFormattedString};

/// Step multipliers tried per decade, smallest first
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

const THIN_SPACE: &str = "\u{2009}";

/// Major ticks of one axis plus the precision their labels need
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    pub values: Vec<f64>,
    /// Distance between neighbouring ticks, zero when there are none
    pub step: f64,
    pub decimals: usize,
}

impl Ticks {
    fn none() -> Self {
        Ticks { values: Vec::new(), step: 0.0, decimals: 0 }
    }


    pub fn label(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }
}

/// Smallest and largest finite value, if any
pub fn finite_bounds<'a, I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a f64>,
{
    values
        .into_iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Axis limits around the data, widened by `margin` of the span on each side.
///
/// A zero-width span is first opened up by 5% of its magnitude, or to
/// +/-0.05 around zero, so a single point still gets a usable axis.
/// Bounds are expected finite. The result always has a finite width; data
/// too spread out for that gets the widest such window centred on it.
pub fn padded_range(bounds: Option<(f64, f64)>, margin: f64) -> (f64, f64) {
    let (data_lo, data_hi) = bounds.unwrap_or((0.0, 1.0));
    let (mut lo, mut hi) = (data_lo, data_hi);
    if hi - lo <= f64::EPSILON * lo.abs().max(hi.abs()) {
        if lo == 0.0 && hi == 0.0 {
            lo = -0.05;
            hi = 0.05;
        } else {
            lo -= 0.05 * lo.abs();
            hi += 0.05 * hi.abs();
        }
    }
    let span = hi - lo;
    let (lo, hi) = (lo - span * margin, hi + span * margin);
    if (hi - lo).is_finite() {
        return (lo, hi);
    }

    let mid = data_lo / 2.0 + data_hi / 2.0;
    let half = f64::MAX / 2.0;
    ((mid - half).max(f64::MIN), (mid + half).min(f64::MAX))
}

/// Place at most `max_intervals` nice-stepped intervals over `lo..=hi`,
/// keep the ticks inside the range and drop the uppermost one.
pub fn pruned_ticks(lo: f64, hi: f64, max_intervals: usize) -> Ticks {
    if !(hi > lo) || !(hi - lo).is_finite() || max_intervals == 0 {
        return Ticks::none();
    }

    let n = max_intervals as f64;
    let raw_step = (hi - lo) / n;
    let decade = 10f64.powf(raw_step.log10().floor());
    let tolerance = (hi - lo) * 1e-10;

    let candidates = NICE_STEPS
        .iter()
        .map(|s| s * decade)
        .chain(NICE_STEPS.iter().map(|s| s * decade * 10.0));

    for step in candidates {
        if step < raw_step * (1.0 - 1e-9) {
            continue;
        }
        if !step.is_finite() {
            break;
        }
        // a bound sitting on a multiple of the step must not open an extra interval
        let first = ((lo + tolerance) / step).floor();
        let last = ((hi - tolerance) / step).ceil();
        if last - first > n {
            continue;
        }

        let mut values: Vec<f64> = (0..=(last - first) as i64)
            .map(|i| (first + i as f64) * step)
            .filter(|v| *v >= lo - tolerance && *v <= hi + tolerance)
            .collect();
        values.pop();

        return Ticks {
            values,
            step,
            decimals: step_decimals(step),
        };
    }

    Ticks::none()
}

/// Digits after the point needed to print multiples of `step` exactly
fn step_decimals(step: f64) -> usize {
    (0..=8)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6 * scaled.abs().max(1.0)
        })
        .unwrap_or(8)
}

/// Integer part of `x`, grouped by thousands with thin spaces
pub fn format_thousands(x: f64) -> String {
    let n = x.trunc() as i64;
    n.to_formatted_string(&Locale::en).replace(',', THIN_SPACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(1_234_567.9), "1\u{2009}234\u{2009}567");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1\u{2009}000");
        assert_eq!(format_thousands(-12_345.6), "-12\u{2009}345");
        assert_eq!(format_thousands(0.7), "0");
    }

    #[test]
    fn ticks_stay_in_range_and_top_is_pruned() {
        let ticks = pruned_ticks(0.0, 10.0, 5);
        assert_eq!(ticks.values, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        assert_eq!(ticks.step, 2.0);
        assert_eq!(ticks.decimals, 0);
    }

    #[test]
    fn bounds_on_step_multiples_keep_the_finest_step() {
        let ticks = pruned_ticks(-5.0, 5.0, 5);
        assert_eq!(ticks.values, vec![-5.0, -2.5, 0.0, 2.5]);
        assert_eq!(ticks.decimals, 1);

        let ticks = pruned_ticks(10.0, 35.0, 5);
        assert_eq!(ticks.step, 5.0);
        assert_eq!(ticks.values, vec![10.0, 15.0, 20.0, 25.0, 30.0]);

        let ticks = pruned_ticks(33.25, 71.75, 5);
        assert_eq!(ticks.values, vec![40.0, 50.0, 60.0]);
    }

    #[test]
    fn at_most_five_ticks() {
        for &(lo, hi) in &[(0.0, 1.0), (-3.2, 17.9), (12.5, 12.75), (0.001, 0.0093), (100.0, 98_765.0)] {
            let ticks = pruned_ticks(lo, hi, 5);
            assert!(!ticks.values.is_empty(), "{lo}..{hi}");
            assert!(ticks.values.len() <= 5, "{lo}..{hi}: {:?}", ticks.values);
            for v in &ticks.values {
                assert!(*v >= lo - 1e-9 && *v <= hi + 1e-9, "{v} outside {lo}..{hi}");
            }
            assert!(ticks.values.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn quarter_steps_get_decimals() {
        let ticks = pruned_ticks(0.0, 1.0, 5);
        assert_eq!(ticks.values.len(), 5);
        assert_eq!(ticks.decimals, 1);
        assert_eq!(ticks.label(0.4), "0.4");

        let ticks = pruned_ticks(0.0, 1.2, 5);
        assert_eq!(ticks.decimals, 2);
        assert_eq!(ticks.label(0.25), "0.25");
    }

    #[test]
    fn degenerate_ranges_have_no_ticks() {
        assert!(pruned_ticks(1.0, 1.0, 5).values.is_empty());
        assert!(pruned_ticks(2.0, 1.0, 5).values.is_empty());
        assert!(pruned_ticks(0.0, f64::INFINITY, 5).values.is_empty());
        assert!(pruned_ticks(-f64::MAX, f64::MAX, 5).values.is_empty());
    }

    #[test]
    fn widest_ranges_stay_finite() {
        let (lo, hi) = padded_range(Some((-1e308, 1e308)), 0.05);
        assert!((hi - lo).is_finite());
        assert_eq!((lo, hi), (-f64::MAX / 2.0, f64::MAX / 2.0));

        let (lo, hi) = padded_range(Some((f64::MAX, f64::MAX)), 0.05);
        assert!(lo.is_finite() && hi.is_finite() && (hi - lo).is_finite());
        assert!(hi == f64::MAX && lo < hi);

        let ticks = pruned_ticks(-f64::MAX / 2.0, f64::MAX / 2.0, 5);
        assert!(!ticks.values.is_empty() && ticks.values.len() <= 5);
        assert!(ticks.values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn padding() {
        assert_eq!(padded_range(Some((0.0, 10.0)), 0.05), (-0.5, 10.5));
        let (lo, hi) = padded_range(Some((4.0, 4.0)), 0.0);
        assert!((lo - 3.8).abs() < 1e-12 && (hi - 4.2).abs() < 1e-12);
        assert_eq!(padded_range(Some((0.0, 0.0)), 0.0), (-0.05, 0.05));
        assert_eq!(padded_range(None, 0.0), (0.0, 1.0));
    }

    #[test]
    fn bounds_skip_non_finite() {
        let values = [3.0, f64::NAN, -1.0, f64::INFINITY, 2.0];
        assert_eq!(finite_bounds(&values), Some((-1.0, 3.0)));
        assert_eq!(finite_bounds(&[f64::NAN]), None);
    }
}
