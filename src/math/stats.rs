//! Robust statistical primitives.
//!
//! Note: Functions may reorder the input slice.

pub const MAD_SCALE: f64 = 1.4826;

pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        let a = values[n / 2 - 1];
        let b = values[n / 2];
        (a + b) / 2.0
    }
}

pub fn mad(values: &mut [f64], median_val: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    for v in values.iter_mut() {
        *v = (*v - median_val).abs();
    }
    median(values)
}

/// MAD restricted to the values at or above the median.
pub fn upper_mad(values: &[f64], median_val: f64) -> f64 {
    let mut upper: Vec<f64> = values
        .iter()
        .filter(|&&v| v >= median_val)
        .map(|&v| v - median_val)
        .collect();
    median(&mut upper)
}

pub fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
