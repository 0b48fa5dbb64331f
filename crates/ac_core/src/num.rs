//! Total defaulting for numeric input.

/// Returns `value` when it is finite, otherwise `fallback`.
#[inline]
pub(crate) fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Resolves an optional input: missing, non-finite or rejected by `accept`
/// all fall back to `fallback`.
#[inline]
pub(crate) fn resolve(value: Option<f64>, fallback: f64, accept: impl Fn(f64) -> bool) -> f64 {
    match value {
        Some(v) if v.is_finite() && accept(v) => v,
        _ => fallback,
    }
}

/// Finite and non-negative, otherwise zero.
#[inline]
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
