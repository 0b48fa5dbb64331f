//! Year-indexed cashflow tables and present-value payback between two units.
//!
//! Year 0 carries the capital expenditure alone. Years `1..=N` carry energy
//! and maintenance, with the disposal cash flow added at year `N`.

use serde::{Deserialize, Serialize};

use crate::energy::resolve_discount_rate;
use crate::CostBreakdown;

/// Horizon and discounting for a cashflow table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashflowParams {
    pub years: u32,
    #[serde(default)]
    pub discount_rate: Option<f64>,
}

impl CashflowParams {
    pub fn new(years: u32, discount_rate: f64) -> Self {
        Self {
            years,
            discount_rate: Some(discount_rate),
        }
    }

    pub fn rate(&self) -> f64 {
        resolve_discount_rate(self.discount_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CashflowRow {
    pub year: u32,
    pub capex: f64,
    pub energy: f64,
    pub maintenance: f64,
    pub disposal: f64,
    /// Energy + maintenance + disposal for the year.
    pub operating_cost: f64,
    pub operating_cost_pv: f64,
    /// Capex + operating cost, undiscounted.
    pub total: f64,
    pub total_pv: f64,
    pub cumulative_total: f64,
    pub cumulative_pv: f64,
}

/// Discount factor `(1 + r)^year`.
#[inline]
fn growth(rate: f64, year: u32) -> f64 {
    (1.0 + rate).powf(f64::from(year))
}

/// Builds the table for one unit: one row per year from 0 to `params.years`.
pub fn build_cashflow_rows(breakdown: &CostBreakdown, params: &CashflowParams) -> Vec<CashflowRow> {
    let rate = params.rate();
    let mut rows = Vec::with_capacity(params.years as usize + 1);
    rows.push(CashflowRow {
        year: 0,
        capex: breakdown.capex,
        total: breakdown.capex,
        total_pv: breakdown.capex,
        cumulative_total: breakdown.capex,
        cumulative_pv: breakdown.capex,
        ..CashflowRow::default()
    });

    let mut cumulative_total = breakdown.capex;
    let mut cumulative_pv = breakdown.capex;
    for year in 1..=params.years {
        let disposal = if year == params.years {
            breakdown.disposal
        } else {
            0.0
        };
        let operating_cost = breakdown.annual_energy_cost + breakdown.annual_maintenance + disposal;
        let operating_cost_pv = operating_cost / growth(rate, year);
        cumulative_total += operating_cost;
        cumulative_pv += operating_cost_pv;
        rows.push(CashflowRow {
            year,
            capex: 0.0,
            energy: breakdown.annual_energy_cost,
            maintenance: breakdown.annual_maintenance,
            disposal,
            operating_cost,
            operating_cost_pv,
            total: operating_cost,
            total_pv: operating_cost_pv,
            cumulative_total,
            cumulative_pv,
        });
    }
    rows
}

/// Column sums over a table. Cumulative columns are not summed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CashflowTotals {
    pub capex: f64,
    pub energy: f64,
    pub maintenance: f64,
    pub disposal: f64,
    pub operating_cost: f64,
    pub operating_cost_pv: f64,
    pub total: f64,
    pub total_pv: f64,
}

impl CashflowTotals {
    pub fn from_rows(rows: &[CashflowRow]) -> Self {
        rows.iter().fold(Self::default(), |acc, r| Self {
            capex: acc.capex + r.capex,
            energy: acc.energy + r.energy,
            maintenance: acc.maintenance + r.maintenance,
            disposal: acc.disposal + r.disposal,
            operating_cost: acc.operating_cost + r.operating_cost,
            operating_cost_pv: acc.operating_cost_pv + r.operating_cost_pv,
            total: acc.total + r.total,
            total_pv: acc.total_pv + r.total_pv,
        })
    }
}

/// Per-year difference `B - A`. Rows are paired by position; the shorter
/// table bounds the result.
///
/// Capex present value in the difference is discounted by
/// `(1 + r)^max(year - 1, 0)` while operating costs use `(1 + r)^year`.
/// `cumulative_pv` is the running present-value difference used for payback.
pub fn cashflow_difference(
    rows_a: &[CashflowRow],
    rows_b: &[CashflowRow],
    params: &CashflowParams,
) -> Vec<CashflowRow> {
    let rate = params.rate();
    let mut cumulative_total = 0.0;
    let mut cumulative_pv = 0.0;
    rows_a
        .iter()
        .zip(rows_b)
        .map(|(a, b)| {
            let capex = b.capex - a.capex;
            let operating_cost_pv = b.operating_cost_pv - a.operating_cost_pv;
            let capex_pv = capex / growth(rate, b.year.saturating_sub(1));
            let total = b.total - a.total;
            let total_pv = capex_pv + operating_cost_pv;
            cumulative_total += total;
            cumulative_pv += total_pv;
            CashflowRow {
                year: b.year,
                capex,
                energy: b.energy - a.energy,
                maintenance: b.maintenance - a.maintenance,
                disposal: b.disposal - a.disposal,
                operating_cost: b.operating_cost - a.operating_cost,
                operating_cost_pv,
                total,
                total_pv,
                cumulative_total,
                cumulative_pv,
            }
        })
        .collect()
}

/// Outcome of a payback search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Payback {
    /// First year at which the cumulative present-value difference is
    /// non-negative; `None` when that never happens within the horizon.
    pub year: Option<u32>,
    /// Cumulative difference at the end of the horizon.
    pub cumulative_diff: f64,
}

impl Payback {
    pub fn within_horizon(&self) -> bool {
        self.year.is_some()
    }
}

/// Scans a difference table for the first non-negative cumulative value.
/// A table that starts at exactly zero pays back at year 0.
pub fn find_payback(diff: &[CashflowRow]) -> Payback {
    Payback {
        year: diff.iter().find(|r| r.cumulative_pv >= 0.0).map(|r| r.year),
        cumulative_diff: diff.last().map_or(0.0, |r| r.cumulative_pv),
    }
}

/// Payback of B relative to A: accumulates `PV(B) - PV(A)` year by year.
pub fn compute_lifecycle_payback(
    rows_a: &[CashflowRow],
    rows_b: &[CashflowRow],
    params: &CashflowParams,
) -> Payback {
    find_payback(&cashflow_difference(rows_a, rows_b, params))
}
