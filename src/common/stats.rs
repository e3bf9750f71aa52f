//! Small statistics helpers shared across the analysis modules
//!
//! All helpers are missing-aware in the same way a dataframe mean is:
//! absent values are skipped, and an all-absent input yields `None`.

/// Arithmetic mean of a slice; `None` for empty input
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean over optional values, skipping the missing ones
pub fn mean_opt<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values.into_iter().flatten().collect();
    mean(&present)
}

/// Sample standard deviation (ddof = 1); `None` for fewer than two values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Standard error of the mean; `None` when the sample std is undefined
pub fn sem(values: &[f64]) -> Option<f64> {
    Some(sample_std(values)? / (values.len() as f64).sqrt())
}

/// Linearly interpolated percentile of an ascending-sorted, non-empty slice
///
/// `p` is in 0..=100. Matches the default interpolation used by numpy and
/// matplotlib box plots.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    let fraction = rank - low as f64;
    sorted[low] + (sorted[high] - sorted[low]) * fraction
}

/// Five-number summary for a box-and-whisker glyph
///
/// Whiskers extend to the most extreme data points within 1.5 IQR of the
/// box; everything beyond is reported as an outlier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Computes the summary; `None` for empty input
    pub fn new(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(f64::total_cmp);

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let fence_low = q1 - 1.5 * iqr;
        let fence_high = q3 + 1.5 * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|v| *v >= fence_low)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= fence_high)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < fence_low || *v > fence_high)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Deterministic jitter offsets in `-scale..scale` for overlaying raw
/// points on a box plot
///
/// A fixed-seed LCG keeps runs reproducible without pulling in an RNG
/// crate for one chart.
pub fn jitter_offsets(count: usize, scale: f64) -> Vec<f64> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            (unit * 2.0 - 1.0) * scale
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0]), Some(2.0));
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_mean_opt_skips_missing() {
        assert_eq!(mean_opt(vec![Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean_opt(vec![None, None]), None);
        assert_eq!(mean_opt(Vec::<Option<f64>>::new()), None);
    }

    #[test]
    fn test_sample_std_and_sem() {
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(sem(&[1.0]), None);

        // std of [2, 4, 4, 4, 5, 5, 7, 9] with ddof=1 is ~2.138
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = sample_std(&values).unwrap();
        assert!((std - 2.13808993529939).abs() < 1e-12);
        let sem_value = sem(&values).unwrap();
        assert!((sem_value - std / 8.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 50.0), 2.5);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
        assert_eq!(percentile(&[42.0], 75.0), 42.0);
    }

    #[test]
    fn test_box_summary() {
        assert_eq!(BoxSummary::new(&[]), None);

        let summary = BoxSummary::new(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.q3, 4.0);
        // 100.0 lies beyond q3 + 1.5*IQR = 7.0, so the whisker stops at 4.0
        assert_eq!(summary.whisker_high, 4.0);
        assert_eq!(summary.whisker_low, 1.0);
        assert_eq!(summary.outliers, vec![100.0]);
    }

    #[test]
    fn test_jitter_is_deterministic_and_bounded() {
        let a = jitter_offsets(16, 0.04);
        let b = jitter_offsets(16, 0.04);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| v.abs() <= 0.04));
        // Not all offsets collapse to the same value
        assert!(a.windows(2).any(|w| w[0] != w[1]));
    }
}
