/// Round half away from zero to `decimals` places. NaN and infinities pass
/// through unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Whether `key` names a color field for the given suffix.
pub fn is_color_key(key: &str, suffix: &str) -> bool {
    key.ends_with(suffix)
}
