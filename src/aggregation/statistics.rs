//! Descriptive statistics over reading collections
//!
//! All functions return NaN for an empty slice.

/// Arithmetic mean
pub fn mean(readings: &[f64]) -> f64 {
    if readings.is_empty() {
        return f64::NAN;
    }
    readings.iter().sum::<f64>() / readings.len() as f64
}

/// Largest reading
pub fn max(readings: &[f64]) -> f64 {
    if readings.is_empty() {
        return f64::NAN;
    }
    readings.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Quantile `q` (0..=1) with linear interpolation between the order
/// statistics bracketing rank `q * (n - 1)`
pub fn quantile(readings: &[f64], q: f64) -> f64 {
    if readings.is_empty() || q.is_nan() {
        return f64::NAN;
    }

    let mut sorted = readings.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
