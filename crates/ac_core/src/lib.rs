//! Cost and lifecycle engines for comparing air-conditioning units.
//!
//! No IO. Every operation is a pure function of its inputs; degenerate
//! numeric input is resolved to documented defaults rather than rejected.

mod cashflow;
mod energy;
mod lifecycle;
mod num;
mod types;
mod weibull;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use cashflow::{
    build_cashflow_rows, cashflow_difference, compute_lifecycle_payback, find_payback,
    CashflowParams, CashflowRow, CashflowTotals, Payback,
};
pub use energy::{
    adjusted_annual_consumption, compare_lifetime_totals, compute_cost_breakdown,
    compute_cost_breakdowns, declared_annual_consumption, present_value_annuity,
    present_value_single, resolve_discount_rate, shared_horizon, CostBreakdown, CostComparison,
    BASE_ANNUAL_HOURS, DEFAULT_DISCOUNT_RATE, REFERENCE_HOURS_PER_DAY,
};
pub use lifecycle::{
    align_curves, arrhenius_acceleration_factor, compute_lifecycle, compute_lifecycle_curves,
    hours_penalty, sample_curves, sample_times, temperature_penalty, weibull_aft, AlignedCurves,
    AlignedSeries, CurvePoint, LifecycleBaseParams, LifecycleCurves, LifecycleParams,
    LifecycleResult, LifecycleSubject, PenaltyTerms, WeibullAft, CURVE_STEP_YEARS,
    DEFAULT_BASE_LIFE_YEARS, NEUTRAL_HOURS_PER_DAY, NEUTRAL_TEMP_C, SHAPE,
};
pub use types::*;
pub use weibull::Weibull;
