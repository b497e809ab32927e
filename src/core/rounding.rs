use std::cmp::Ordering;

/// Round to a fixed number of decimals, halves away from zero
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Descending order for already-rounded scores
#[inline]
pub fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
