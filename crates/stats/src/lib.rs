//! Scalar statistics shared by the aeolus wavelet-analysis crates.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let m = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn std_dev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Median of pre-sorted data. For even length, averages the middle two values.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn median(sorted: &[f64]) -> f64 {
    assert!(!sorted.is_empty(), "median: input must not be empty");
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Median of unsorted data. Sorts a copy; incomparable pairs (NaN) are
/// treated as equal, so callers should pre-filter non-finite values.
///
/// # Panics
///
/// Panics if `data` is empty.
pub fn median_unsorted(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    median(&sorted)
}

/// Lag-1 autocorrelation via the Yule-Walker ratio on the demeaned series,
/// clamped to `[0, 0.99]` for use as an AR(1) background coefficient.
///
/// Returns 0.0 for series shorter than 3 elements or with zero variance.
pub fn lag1_autocorrelation(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 3 {
        return 0.0;
    }
    let m = data.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = data.iter().map(|&x| x - m).collect();
    let denom: f64 = centered.iter().map(|&x| x * x).sum();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    let num: f64 = centered.windows(2).map(|w| w[0] * w[1]).sum();
    (num / denom).clamp(0.0, 0.99)
}

/// Geometric mean of the strictly positive, finite entries.
///
/// Returns `None` when no entry qualifies. NaN, infinities, zeros and
/// negatives are skipped rather than poisoning the result.
pub fn geometric_mean_positive(data: &[f64]) -> Option<f64> {
    let mut log_sum = 0.0;
    let mut count = 0usize;
    for &x in data {
        if x.is_finite() && x > 0.0 {
            log_sum += x.ln();
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some((log_sum / count as f64).exp())
    }
}
