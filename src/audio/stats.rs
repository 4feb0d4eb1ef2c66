//! Reductions shared by the ratio features. Empty inputs reduce to 0.0 so a
//! missing band or a zero-frame spectrum never produces NaN.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// `numerator / (denominator + epsilon)`, clamped into [0, 1].
pub fn unit_ratio(numerator: f64, denominator: f64, epsilon: f64) -> f64 {
    clamp_unit(numerator / (denominator + epsilon))
}

/// Hard clamp to [0, 1]. NaN maps to 0.0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
