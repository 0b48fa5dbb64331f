//! Weibull accelerated-failure-time lifecycle model.
//!
//! The shape parameter is fixed at [`SHAPE`] (wear-out). The scale is the base
//! service life adjusted log-linearly by usage, maintenance, environment,
//! technology and temperature penalties:
//!
//! ```text
//! eta = base_life * exp(hours + maintenance + environment + technology + temperature)
//! ```
//!
//! Hours and temperature are one-sided: nothing is credited for running
//! below the neutral point.

use serde::{Deserialize, Serialize};

use crate::energy::REFERENCE_HOURS_PER_DAY;
use crate::weibull::Weibull;
use crate::{usable_service_life, EquipmentEntry, Environment, MaintenanceRegime, Technology};

/// Weibull shape shared by every unit.
pub const SHAPE: f64 = 2.0;

/// Characteristic life assumed when no usable service life is declared.
pub const DEFAULT_BASE_LIFE_YEARS: f64 = 10.0;

/// Daily usage (5 h 42 min) above which the hours penalty applies.
pub const NEUTRAL_HOURS_PER_DAY: f64 = 5.7;

/// Ambient temperature above which the temperature penalty applies.
pub const NEUTRAL_TEMP_C: f64 = 26.2;

/// Sampling step of the generated curves, in years.
pub const CURVE_STEP_YEARS: f64 = 0.5;

const HOURS_COEFFICIENT: f64 = -0.04;
const TEMP_COEFFICIENT: f64 = -0.025;

/// Floor on the summed penalties. Keeps the scale strictly positive for
/// absurd inputs such as a 10 000 °C ambient.
const MIN_LOG_ADJUSTMENT: f64 = -20.0;

// ---------------------------------------------------------------------------
// Penalty tables
// ---------------------------------------------------------------------------

impl MaintenanceRegime {
    pub fn penalty(self) -> f64 {
        match self {
            MaintenanceRegime::Regular => 0.0,
            MaintenanceRegime::Irregular => -0.10,
            MaintenanceRegime::Absent => -0.25,
        }
    }
}

impl Environment {
    pub fn penalty(self) -> f64 {
        match self {
            Environment::Ideal => 0.0,
            Environment::Hot => -0.10,
            Environment::Severe => -0.20,
        }
    }
}

impl Technology {
    pub fn penalty(self) -> f64 {
        match self {
            Technology::Inverter => 0.0,
            Technology::Conventional => -0.12,
        }
    }
}

/// `-0.04` per hour above [`NEUTRAL_HOURS_PER_DAY`]. Non-finite input earns
/// no penalty.
///
/// The summed penalties are floored at `MIN_LOG_ADJUSTMENT` (-20), so the
/// scale stops shrinking once hours alone pass about 505 h/day. Below that
/// every extra hour strictly reduces the scale.
pub fn hours_penalty(hours_per_day: f64) -> f64 {
    if !hours_per_day.is_finite() {
        return 0.0;
    }
    HOURS_COEFFICIENT * (hours_per_day - NEUTRAL_HOURS_PER_DAY).max(0.0)
}

/// `-0.025` per degree above [`NEUTRAL_TEMP_C`]. Missing or non-finite input
/// earns no penalty.
pub fn temperature_penalty(ambient_temp_c: Option<f64>) -> f64 {
    match ambient_temp_c {
        Some(t) if t.is_finite() => TEMP_COEFFICIENT * (t - NEUTRAL_TEMP_C).max(0.0),
        _ => 0.0,
    }
}

/// Arrhenius temperature acceleration. Disabled: temperature acts only
/// through [`temperature_penalty`], so this always returns 1.
pub fn arrhenius_acceleration_factor(_ambient_temp_c: Option<f64>) -> f64 {
    1.0
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Full parameter set for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifecycleParams {
    pub hours_per_day: f64,
    pub maintenance: MaintenanceRegime,
    pub environment: Environment,
    pub ambient_temp_c: Option<f64>,
    pub technology: Technology,
    /// Declared service life in years; values rejected by
    /// [`usable_service_life`] fall back to [`DEFAULT_BASE_LIFE_YEARS`].
    pub base_life_years: Option<f64>,
}

impl LifecycleParams {
    pub fn base_life(&self) -> f64 {
        self.base_life_years
            .and_then(usable_service_life)
            .unwrap_or(DEFAULT_BASE_LIFE_YEARS)
    }
}

/// Settings shared by every unit in a lifecycle comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifecycleBaseParams {
    #[serde(default = "default_hours")]
    pub hours_per_day: f64,
    #[serde(default)]
    pub maintenance: MaintenanceRegime,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub ambient_temp_c: Option<f64>,
}

fn default_hours() -> f64 {
    REFERENCE_HOURS_PER_DAY
}

impl Default for LifecycleBaseParams {
    fn default() -> Self {
        Self {
            hours_per_day: default_hours(),
            maintenance: MaintenanceRegime::Regular,
            environment: Environment::Ideal,
            ambient_temp_c: Some(NEUTRAL_TEMP_C),
        }
    }
}

/// Per-unit input: what sets one unit apart from the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleSubject {
    pub label: String,
    pub technology: Technology,
    #[serde(default)]
    pub base_life_years: Option<f64>,
}

impl LifecycleSubject {
    pub fn from_entry(entry: &EquipmentEntry) -> Self {
        Self {
            label: entry.equipment.label(),
            technology: entry.equipment.technology_class(),
            base_life_years: Some(entry.life_years),
        }
    }

    pub fn params(&self, base: &LifecycleBaseParams) -> LifecycleParams {
        LifecycleParams {
            hours_per_day: base.hours_per_day,
            maintenance: base.maintenance,
            environment: base.environment,
            ambient_temp_c: base.ambient_temp_c,
            technology: self.technology,
            base_life_years: self.base_life_years,
        }
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// The individual log-linear terms that adjust the base life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PenaltyTerms {
    pub hours: f64,
    pub maintenance: f64,
    pub environment: f64,
    pub technology: f64,
    pub temperature: f64,
}

impl PenaltyTerms {
    pub fn from_params(params: &LifecycleParams) -> Self {
        Self {
            hours: hours_penalty(params.hours_per_day),
            maintenance: params.maintenance.penalty(),
            environment: params.environment.penalty(),
            technology: params.technology.penalty(),
            temperature: temperature_penalty(params.ambient_temp_c),
        }
    }

    pub fn sum(&self) -> f64 {
        self.hours + self.maintenance + self.environment + self.technology + self.temperature
    }
}

/// Fitted scale and summary statistics for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeibullAft {
    /// Characteristic life (eta), in years.
    pub scale: f64,
    /// Always 1; see [`arrhenius_acceleration_factor`].
    pub acceleration_factor: f64,
    /// Mean time to failure, in years.
    pub mttf: f64,
    pub penalties: PenaltyTerms,
}

impl WeibullAft {
    pub fn distribution(&self) -> Weibull {
        Weibull::from_validated(SHAPE, self.scale)
    }

    /// Curve horizon: `ceil(3 * MTTF)` whole years.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // mttf is finite and positive
    pub fn max_time(&self) -> u32 {
        (3.0 * self.mttf).ceil().min(f64::from(u32::MAX)) as u32
    }
}

pub fn weibull_aft(params: &LifecycleParams) -> WeibullAft {
    let penalties = PenaltyTerms::from_params(params);
    let mut scale = params.base_life() * penalties.sum().max(MIN_LOG_ADJUSTMENT).exp();
    let acceleration_factor = arrhenius_acceleration_factor(params.ambient_temp_c);
    scale /= acceleration_factor;
    let mttf = Weibull::from_validated(SHAPE, scale).mean_life();
    WeibullAft {
        scale,
        acceleration_factor,
        mttf,
        penalties,
    }
}

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub t: f64,
    pub value: f64,
}

/// Curves sampled every [`CURVE_STEP_YEARS`], all values in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleCurves {
    /// R(t) from t = 0.
    pub reliability: Vec<CurvePoint>,
    /// f(t) from t = 0, with f(0) = 0.
    pub density: Vec<CurvePoint>,
    /// h(t) from t = 0.5; the origin is excluded.
    pub hazard: Vec<CurvePoint>,
}

/// Sample times `0, 0.5, ..., max_time`.
pub fn sample_times(max_time: u32) -> impl Iterator<Item = f64> {
    (0..=max_time.saturating_mul(2)).map(|i| f64::from(i) * CURVE_STEP_YEARS)
}

pub fn sample_curves(distribution: &Weibull, max_time: u32) -> LifecycleCurves {
    let reliability: Vec<CurvePoint> = sample_times(max_time)
        .map(|t| CurvePoint {
            t,
            value: distribution.reliability(t) * 100.0,
        })
        .collect();
    let density = sample_times(max_time)
        .map(|t| CurvePoint {
            t,
            value: distribution.density(t) * 100.0,
        })
        .collect();
    let hazard = sample_times(max_time)
        .skip(1)
        .map(|t| CurvePoint {
            t,
            value: distribution.hazard_rate(t) * 100.0,
        })
        .collect();
    LifecycleCurves {
        reliability,
        density,
        hazard,
    }
}

/// Everything computed for one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleResult {
    pub label: String,
    pub params: LifecycleParams,
    pub shape: f64,
    pub scale: f64,
    pub acceleration_factor: f64,
    pub mttf: f64,
    pub b10_life: f64,
    pub median_life: f64,
    pub max_time: u32,
    pub penalties: PenaltyTerms,
    pub curves: LifecycleCurves,
}

pub fn compute_lifecycle(subject: &LifecycleSubject, base: &LifecycleBaseParams) -> LifecycleResult {
    let params = subject.params(base);
    let aft = weibull_aft(&params);
    let distribution = aft.distribution();
    let max_time = aft.max_time();
    LifecycleResult {
        label: subject.label.clone(),
        params,
        shape: distribution.shape(),
        scale: distribution.scale(),
        acceleration_factor: aft.acceleration_factor,
        mttf: aft.mttf,
        b10_life: distribution.b_life(0.10).unwrap_or(0.0),
        median_life: distribution.median_life(),
        max_time,
        penalties: aft.penalties,
        curves: sample_curves(&distribution, max_time),
    }
}

/// Each unit is fitted independently against the shared settings.
pub fn compute_lifecycle_curves(
    subjects: &[LifecycleSubject],
    base: &LifecycleBaseParams,
) -> Vec<LifecycleResult> {
    subjects
        .iter()
        .map(|subject| compute_lifecycle(subject, base))
        .collect()
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// One unit's curves on the shared time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeries {
    pub label: String,
    pub reliability: Vec<Option<f64>>,
    pub density: Vec<Option<f64>>,
    /// `None` at t = 0, where the hazard is not sampled.
    pub hazard: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedCurves {
    pub time_axis: Vec<f64>,
    pub series: Vec<AlignedSeries>,
}

/// Lays every result on `[0, max(max_time)]`. Samples past a unit's own
/// horizon are omitted (`None`) rather than extrapolated.
pub fn align_curves(results: &[LifecycleResult]) -> AlignedCurves {
    let Some(horizon) = results.iter().map(|r| r.max_time).max() else {
        return AlignedCurves {
            time_axis: Vec::new(),
            series: Vec::new(),
        };
    };
    let time_axis: Vec<f64> = sample_times(horizon).collect();
    let series = results
        .iter()
        .map(|r| AlignedSeries {
            label: r.label.clone(),
            reliability: pad(&r.curves.reliability, 0, time_axis.len()),
            density: pad(&r.curves.density, 0, time_axis.len()),
            hazard: pad(&r.curves.hazard, 1, time_axis.len()),
        })
        .collect();
    AlignedCurves { time_axis, series }
}

/// Places `points` at axis index `offset` onward, leaving gaps as `None`.
fn pad(points: &[CurvePoint], offset: usize, len: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; len];
    for (slot, point) in out.iter_mut().skip(offset).zip(points) {
        *slot = Some(point.value);
    }
    out
}
