//! Two-parameter Weibull distribution.
//!
//! Evaluates reliability, failure density, hazard rate, mean life and B-life
//! for a given shape (beta) and scale (eta).

use serde::Serialize;

use statrs::function::gamma::gamma;

/// Weibull distribution with shape beta > 0 and scale eta > 0.
///
/// - Reliability: R(t) = exp(-(t/eta)^beta)
/// - Density: f(t) = (beta/eta) * (t/eta)^(beta-1) * exp(-(t/eta)^beta)
/// - Hazard: h(t) = (beta/eta) * (t/eta)^(beta-1)
/// - Mean life: eta * Gamma(1 + 1/beta)
///
/// # Examples
///
/// ```
/// use ac_core::Weibull;
/// let w = Weibull::new(2.0, 10.0).unwrap();
/// assert!((w.reliability(0.0) - 1.0).abs() < 1e-12);
/// assert!((w.mean_life() - 8.862_269).abs() < 1e-6);
/// ```
///
/// # Reference
/// Meeker & Escobar (1998), *Statistical Methods for Reliability Data*, Wiley.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weibull {
    shape: f64,
    scale: f64,
}

impl Weibull {
    /// Returns `None` if either parameter is non-positive or non-finite.
    pub fn new(shape: f64, scale: f64) -> Option<Self> {
        if !shape.is_finite() || !scale.is_finite() || shape <= 0.0 || scale <= 0.0 {
            return None;
        }
        Some(Self { shape, scale })
    }

    /// Caller guarantees both parameters are finite and positive.
    pub(crate) fn from_validated(shape: f64, scale: f64) -> Self {
        debug_assert!(shape.is_finite() && shape > 0.0, "shape {shape}");
        debug_assert!(scale.is_finite() && scale > 0.0, "scale {scale}");
        Self { shape, scale }
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Characteristic life: the time by which ~63.2 % of units have failed.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Survival probability at `t`. 1.0 for `t <= 0`.
    pub fn reliability(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        (-(t / self.scale).powf(self.shape)).exp()
    }

    /// Failure density at `t`. Defined as 0.0 for `t <= 0`, which sidesteps
    /// the `0^(beta-1)` form at the origin.
    pub fn density(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        self.hazard_rate(t) * self.reliability(t)
    }

    /// Instantaneous failure rate at `t`. 0.0 for `t <= 0`.
    ///
    /// beta < 1 decreasing (infant mortality), beta = 1 constant,
    /// beta > 1 increasing (wear-out).
    pub fn hazard_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let z = t / self.scale;
        (self.shape / self.scale) * z.powf(self.shape - 1.0)
    }

    /// Mean time to failure.
    pub fn mean_life(&self) -> f64 {
        self.scale * gamma(1.0 + 1.0 / self.shape)
    }

    /// Time at which reliability drops to `p`, for `p` in (0, 1).
    pub fn time_to_reliability(&self, p: f64) -> Option<f64> {
        if p <= 0.0 || p >= 1.0 || p.is_nan() {
            return None;
        }
        Some(self.scale * (-p.ln()).powf(1.0 / self.shape))
    }

    /// Time by which `fraction_failed` of the population has failed
    /// (B10 = `b_life(0.10)`).
    pub fn b_life(&self, fraction_failed: f64) -> Option<f64> {
        if fraction_failed <= 0.0 || fraction_failed >= 1.0 || fraction_failed.is_nan() {
            return None;
        }
        self.time_to_reliability(1.0 - fraction_failed)
    }

    /// Median life (B50).
    pub fn median_life(&self) -> f64 {
        self.scale * std::f64::consts::LN_2.powf(1.0 / self.shape)
    }
}
