//! Population statistics shared by both anomaly policies.

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for an empty slice
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Absolute z-score of `value` within its group; defined as 0 when the
/// group has no spread, so ties never get magnified into anomalies.
pub fn z_score(value: f64, group_mean: f64, group_std: f64) -> f64 {
    if group_std > 0.0 {
        (value - group_mean).abs() / group_std
    } else {
        0.0
    }
}
