//! Energy consumption and present-value cost aggregation.
//!
//! Catalog consumption figures refer to a fixed reference profile of
//! [`BASE_ANNUAL_HOURS`] per year. The engine rescales them to the caller's
//! usage profile, prices them with the tariff and discounts recurring costs as
//! level annuities at the real discount rate.
//!
//! Nothing here fails: missing or non-finite input resolves to a documented
//! default, so every returned figure is finite.

use serde::Serialize;

use crate::num::{finite_or, non_negative, resolve};
use crate::{usable_service_life, EquipmentEntry, EquipmentId, EquipmentRecord, UsagePlan};

/// Annual operating hours the declared catalog consumption refers to.
pub const BASE_ANNUAL_HOURS: f64 = 2080.0;

/// Hours per day assumed when the usage plan leaves it unset.
pub const REFERENCE_HOURS_PER_DAY: f64 = 5.698;

/// Real discount rate assumed when the usage plan leaves it unset.
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.01;

/// Rates closer to zero than this are priced as undiscounted. Below it the
/// closed-form annuity loses all precision.
const ZERO_RATE_TOLERANCE: f64 = 1e-12;

impl UsagePlan {
    /// Hours per day; missing, non-finite or negative values resolve to
    /// [`REFERENCE_HOURS_PER_DAY`].
    pub fn effective_hours_per_day(&self) -> f64 {
        resolve(self.hours_per_day, REFERENCE_HOURS_PER_DAY, |h| h >= 0.0)
    }

    /// Days per year; when unusable, derived so that the reference annual
    /// hours are met at the effective daily usage.
    pub fn effective_days_per_year(&self) -> f64 {
        let fallback = BASE_ANNUAL_HOURS / self.effective_hours_per_day().max(1.0);
        resolve(self.days_per_year, fallback, |d| d >= 0.0)
    }

    pub fn effective_discount_rate(&self) -> f64 {
        resolve_discount_rate(self.real_discount_rate)
    }

    pub fn effective_tariff(&self) -> f64 {
        finite_or(self.tariff_per_kwh, 0.0)
    }

    /// Ratio of the actual annual usage hours to the catalog reference.
    pub fn usage_factor(&self) -> f64 {
        self.effective_hours_per_day() * self.effective_days_per_year() / BASE_ANNUAL_HOURS
    }
}

/// Missing, non-finite, or `<= -1` rates (which would make the discount
/// factor non-positive) resolve to [`DEFAULT_DISCOUNT_RATE`].
pub fn resolve_discount_rate(rate: Option<f64>) -> f64 {
    resolve(rate, DEFAULT_DISCOUNT_RATE, |r| r > -1.0)
}

/// Declared annual consumption, clamped to be finite and non-negative.
pub fn declared_annual_consumption(equipment: &EquipmentRecord) -> f64 {
    non_negative(equipment.annual_consumption_kwh)
}

/// Declared consumption rescaled to the usage profile.
pub fn adjusted_annual_consumption(equipment: &EquipmentRecord, usage: &UsagePlan) -> f64 {
    declared_annual_consumption(equipment) * usage.usage_factor()
}

/// Present value of a level payment `pmt` received at the end of each of
/// `periods` years.
///
/// ```text
/// PV = pmt * n                          r = 0
/// PV = pmt * (1 - (1 + r)^-n) / r       otherwise
/// ```
pub fn present_value_annuity(pmt: f64, rate: f64, periods: u32) -> f64 {
    let n = f64::from(periods);
    if rate.abs() < ZERO_RATE_TOLERANCE {
        return pmt * n;
    }
    pmt * (1.0 - (1.0 + rate).powf(-n)) / rate
}

/// Present value of a single cash flow occurring at the end of year `periods`.
pub fn present_value_single(value: f64, rate: f64, periods: u32) -> f64 {
    value / (1.0 + rate).powf(f64::from(periods))
}

/// Per-equipment cost summary over a horizon of `life_years`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub equipment_id: EquipmentId,
    pub label: String,
    pub life_years: u32,
    pub discount_rate: f64,

    // Consumption (kWh)
    pub annual_consumption_kwh: f64,
    pub lifetime_consumption_kwh: f64,

    // Energy
    pub annual_energy_cost: f64,
    pub lifetime_energy_cost: f64,
    pub energy_cost_pv: f64,

    // Maintenance and disposal
    pub annual_maintenance: f64,
    pub maintenance_pv: f64,
    pub disposal: f64,
    pub disposal_pv: f64,

    // Operating cost (energy + maintenance, disposal at the terminal year)
    pub annual_operating_cost: f64,
    pub lifetime_operating_cost: f64,
    pub operating_cost_pv: f64,

    // Totals
    pub capex: f64,
    pub first_year_cost: f64,
    /// Undiscounted lifetime energy cost plus capex.
    pub lifetime_total: f64,
    /// `energy_cost_pv + capex + maintenance_pv + disposal_pv`.
    pub lifetime_total_pv: f64,
}

impl CostBreakdown {
    /// Operating cost present value spread evenly over the horizon.
    pub fn annualized_operating_cost_pv(&self) -> f64 {
        if self.life_years == 0 {
            return 0.0;
        }
        self.operating_cost_pv / f64::from(self.life_years)
    }

    /// Energy cost present value spread evenly over the horizon.
    pub fn annualized_energy_cost_pv(&self) -> f64 {
        if self.life_years == 0 {
            return 0.0;
        }
        self.energy_cost_pv / f64::from(self.life_years)
    }
}

/// Computes the cost breakdown for one entry. Capex falls at year 0 and is
/// never discounted.
pub fn compute_cost_breakdown(
    entry: &EquipmentEntry,
    usage: &UsagePlan,
    life_years: u32,
) -> CostBreakdown {
    let rate = usage.effective_discount_rate();
    let years = f64::from(life_years);

    let annual_maintenance = finite_or(entry.annual_maintenance, 0.0);
    let disposal = finite_or(entry.disposal_cost, 0.0);
    let capex = finite_or(entry.acquisition_cost, 0.0) + finite_or(entry.installation_cost, 0.0);

    let annual_consumption_kwh = adjusted_annual_consumption(&entry.equipment, usage);
    let annual_energy_cost = annual_consumption_kwh * usage.effective_tariff();
    let lifetime_energy_cost = annual_energy_cost * years;
    let energy_cost_pv = present_value_annuity(annual_energy_cost, rate, life_years);

    let maintenance_pv = present_value_annuity(annual_maintenance, rate, life_years);
    let disposal_pv = present_value_single(disposal, rate, life_years);

    CostBreakdown {
        equipment_id: entry.equipment.id,
        label: entry.equipment.label(),
        life_years,
        discount_rate: rate,
        annual_consumption_kwh,
        lifetime_consumption_kwh: annual_consumption_kwh * years,
        annual_energy_cost,
        lifetime_energy_cost,
        energy_cost_pv,
        annual_maintenance,
        maintenance_pv,
        disposal,
        disposal_pv,
        annual_operating_cost: annual_energy_cost + annual_maintenance,
        lifetime_operating_cost: lifetime_energy_cost + annual_maintenance * years + disposal,
        operating_cost_pv: energy_cost_pv + maintenance_pv + disposal_pv,
        capex,
        first_year_cost: capex + annual_energy_cost,
        lifetime_total: lifetime_energy_cost + capex,
        lifetime_total_pv: energy_cost_pv + capex + maintenance_pv + disposal_pv,
    }
}

/// Computes breakdowns for every entry on a common horizon.
pub fn compute_cost_breakdowns(
    entries: &[EquipmentEntry],
    usage: &UsagePlan,
    life_years: u32,
) -> Vec<CostBreakdown> {
    entries
        .iter()
        .map(|entry| compute_cost_breakdown(entry, usage, life_years))
        .collect()
}

/// Comparison horizon: the shortest usable service life among the entries,
/// truncated to whole years. Falls back to one year.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to [1, u32::MAX]
pub fn shared_horizon(entries: &[EquipmentEntry]) -> u32 {
    let shortest = entries
        .iter()
        .filter_map(|e| usable_service_life(e.life_years))
        .fold(f64::INFINITY, f64::min);
    if !shortest.is_finite() {
        return 1;
    }
    shortest.floor().clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Cheapest and most expensive entries by lifetime present value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostComparison {
    pub cheapest: usize,
    pub most_expensive: usize,
    /// Lifetime PV saved by picking the cheapest entry; zero when all match.
    pub saving: f64,
}

/// Returns `None` when there is nothing to compare. Ties resolve to the
/// earliest entry.
pub fn compare_lifetime_totals(breakdowns: &[CostBreakdown]) -> Option<CostComparison> {
    let first = breakdowns.first()?;
    let mut cheapest = (0, first.lifetime_total_pv);
    let mut most_expensive = (0, first.lifetime_total_pv);
    for (idx, b) in breakdowns.iter().enumerate().skip(1) {
        if b.lifetime_total_pv < cheapest.1 {
            cheapest = (idx, b.lifetime_total_pv);
        }
        if b.lifetime_total_pv > most_expensive.1 {
            most_expensive = (idx, b.lifetime_total_pv);
        }
    }
    let saving = if cheapest.0 == most_expensive.0 {
        0.0
    } else {
        most_expensive.1 - cheapest.1
    };
    Some(CostComparison {
        cheapest: cheapest.0,
        most_expensive: most_expensive.0,
        saving,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{entry, record, reference_usage};

    fn usage(hours: Option<f64>, days: Option<f64>) -> UsagePlan {
        UsagePlan {
            hours_per_day: hours,
            days_per_year: days,
            tariff_per_kwh: 1.0,
            real_discount_rate: Some(0.0),
            ambient_temp_c: None,
        }
    }

    #[test]
    fn reference_profile_keeps_declared_consumption() {
        let eq = record(1, "Acme", "Inverter", 500.0);
        let plan = usage(Some(8.0), Some(260.0));
        assert!((adjusted_annual_consumption(&eq, &plan) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn doubling_daily_hours_doubles_consumption() {
        let eq = record(1, "Acme", "Inverter", 500.0);
        let base = adjusted_annual_consumption(&eq, &usage(Some(4.0), Some(260.0)));
        let doubled = adjusted_annual_consumption(&eq, &usage(Some(8.0), Some(260.0)));
        assert!((doubled - 2.0 * base).abs() < 1e-9);
    }

    #[test]
    fn missing_hours_and_days_resolve_to_reference() {
        let plan = usage(None, None);
        assert!((plan.effective_hours_per_day() - REFERENCE_HOURS_PER_DAY).abs() < 1e-12);
        // Days derived from the reference hours reproduce the base year exactly.
        assert!((plan.usage_factor() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_hours_fall_back() {
        let plan = usage(Some(f64::NAN), Some(f64::INFINITY));
        assert!((plan.effective_hours_per_day() - REFERENCE_HOURS_PER_DAY).abs() < 1e-12);
        assert!((plan.usage_factor() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn short_days_default_uses_one_hour_floor() {
        // Half an hour a day: fallback days = 2080 / max(0.5, 1) = 2080.
        let plan = usage(Some(0.5), None);
        assert!((plan.effective_days_per_year() - 2080.0).abs() < 1e-9);
    }

    #[test]
    fn discount_rate_defaults() {
        assert!((resolve_discount_rate(None) - DEFAULT_DISCOUNT_RATE).abs() < 1e-15);
        assert!((resolve_discount_rate(Some(f64::NAN)) - DEFAULT_DISCOUNT_RATE).abs() < 1e-15);
        assert!((resolve_discount_rate(Some(-1.0)) - DEFAULT_DISCOUNT_RATE).abs() < 1e-15);
        assert!(resolve_discount_rate(Some(0.0)).abs() < 1e-15);
        assert!((resolve_discount_rate(Some(0.08)) - 0.08).abs() < 1e-15);
    }

    #[test]
    fn negative_or_nan_consumption_is_zero() {
        let mut eq = record(1, "Acme", "Inverter", -10.0);
        assert!(declared_annual_consumption(&eq).abs() < f64::EPSILON);
        eq.annual_consumption_kwh = f64::NAN;
        assert!(declared_annual_consumption(&eq).abs() < f64::EPSILON);
    }

    #[test]
    fn annuity_zero_rate_is_linear() {
        for n in 1..=30 {
            assert!((present_value_annuity(120.0, 0.0, n) - 120.0 * f64::from(n)).abs() < 1e-9);
        }
    }

    #[test]
    fn annuity_known_value() {
        // 100/yr for 3 years at 10 %: 100 * (1 - 1.1^-3) / 0.1
        let pv = present_value_annuity(100.0, 0.10, 3);
        assert!((pv - 248.685_199_098_422_2).abs() < 1e-9, "pv = {pv}");
    }

    #[test]
    fn annuity_zero_periods_is_zero() {
        assert!(present_value_annuity(100.0, 0.05, 0).abs() < f64::EPSILON);
        assert!(present_value_annuity(100.0, 0.0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_cash_flow_discounting() {
        let pv = present_value_single(1_000.0, 0.05, 2);
        assert!((pv - 1_000.0 / 1.1025).abs() < 1e-9);
        assert!((present_value_single(1_000.0, 0.05, 0) - 1_000.0).abs() < 1e-12);
    }

    #[test]
    fn breakdown_total_pv_invariant() {
        let mut e = entry(record(1, "Acme", "Inverter", 800.0), 2_500.0, 300.0);
        e.annual_maintenance = 150.0;
        e.disposal_cost = 90.0;
        let b = compute_cost_breakdown(&e, &reference_usage(), 12);
        let expected = b.energy_cost_pv + b.capex + b.maintenance_pv + b.disposal_pv;
        assert!((b.lifetime_total_pv - expected).abs() < 1e-9);
        assert!((b.capex - 2_800.0).abs() < 1e-12);
        assert!((b.operating_cost_pv - (b.energy_cost_pv + b.maintenance_pv + b.disposal_pv)).abs() < 1e-9);
        assert!(
            (b.lifetime_operating_cost - (b.lifetime_energy_cost + 150.0 * 12.0 + 90.0)).abs()
                < 1e-9
        );
    }

    #[test]
    fn breakdown_undiscounted_figures() {
        let e = entry(record(1, "Acme", "Inverter", 1_000.0), 3_000.0, 0.0);
        let plan = UsagePlan {
            hours_per_day: Some(8.0),
            days_per_year: Some(260.0),
            tariff_per_kwh: 0.5,
            real_discount_rate: Some(0.0),
            ambient_temp_c: None,
        };
        let b = compute_cost_breakdown(&e, &plan, 10);
        assert!((b.annual_energy_cost - 500.0).abs() < 1e-9);
        assert!((b.lifetime_energy_cost - 5_000.0).abs() < 1e-9);
        assert!((b.energy_cost_pv - 5_000.0).abs() < 1e-9);
        assert!((b.first_year_cost - 3_500.0).abs() < 1e-9);
        assert!((b.lifetime_total - 8_000.0).abs() < 1e-9);
        assert!((b.annualized_operating_cost_pv() - 500.0).abs() < 1e-9);
        assert!((b.annualized_energy_cost_pv() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn zero_life_years_degenerates_cleanly() {
        let mut e = entry(record(1, "Acme", "Inverter", 1_000.0), 1_000.0, 0.0);
        e.disposal_cost = 50.0;
        let b = compute_cost_breakdown(&e, &reference_usage(), 0);
        assert!(b.energy_cost_pv.abs() < f64::EPSILON);
        assert!(b.maintenance_pv.abs() < f64::EPSILON);
        assert!((b.disposal_pv - 50.0).abs() < 1e-12);
        assert!((b.lifetime_total_pv - 1_050.0).abs() < 1e-9);
        assert!(b.annualized_operating_cost_pv().abs() < f64::EPSILON);
        assert!(b.annualized_energy_cost_pv().abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_inputs_never_leak_non_finite_values() {
        let mut e = entry(record(1, "Acme", "Inverter", f64::NAN), f64::NAN, f64::INFINITY);
        e.annual_maintenance = f64::NEG_INFINITY;
        e.disposal_cost = f64::NAN;
        let plan = UsagePlan {
            hours_per_day: Some(f64::NAN),
            days_per_year: None,
            tariff_per_kwh: f64::NAN,
            real_discount_rate: Some(f64::INFINITY),
            ambient_temp_c: None,
        };
        let b = compute_cost_breakdown(&e, &plan, 15);
        let fields = [
            b.annual_consumption_kwh,
            b.lifetime_consumption_kwh,
            b.annual_energy_cost,
            b.lifetime_energy_cost,
            b.energy_cost_pv,
            b.maintenance_pv,
            b.disposal_pv,
            b.operating_cost_pv,
            b.capex,
            b.lifetime_total,
            b.lifetime_total_pv,
        ];
        assert!(fields.iter().all(|v| v.is_finite()), "{b:?}");
        assert!(b.lifetime_total_pv.abs() < f64::EPSILON);
    }

    #[test]
    fn identical_input_is_bit_identical() {
        let entries = vec![
            entry(record(1, "Acme", "Inverter", 700.0), 2_000.0, 400.0),
            entry(record(2, "Polar", "Convencional", 950.0), 1_500.0, 400.0),
        ];
        let plan = reference_usage();
        let first = compute_cost_breakdowns(&entries, &plan, 10);
        let second = compute_cost_breakdowns(&entries, &plan, 10);
        assert_eq!(first, second);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.lifetime_total_pv.to_bits(), b.lifetime_total_pv.to_bits());
        }
    }

    #[test]
    fn shared_horizon_takes_shortest_positive_life() {
        let mut a = entry(record(1, "Acme", "Inverter", 700.0), 0.0, 0.0);
        let mut b = entry(record(2, "Polar", "Inverter", 700.0), 0.0, 0.0);
        a.life_years = 12.0;
        b.life_years = 8.7;
        assert_eq!(shared_horizon(&[a.clone(), b.clone()]), 8);

        b.life_years = 0.0;
        assert_eq!(shared_horizon(&[a.clone(), b.clone()]), 12);

        b.life_years = 1.0e9;
        assert_eq!(shared_horizon(&[a.clone(), b.clone()]), 12);

        a.life_years = f64::NAN;
        assert_eq!(shared_horizon(&[a, b]), 1);
        assert_eq!(shared_horizon(&[]), 1);
    }

    #[test]
    fn comparison_picks_cheapest_and_saving() {
        let entries = vec![
            entry(record(1, "Acme", "Inverter", 700.0), 3_000.0, 0.0),
            entry(record(2, "Polar", "Convencional", 1_400.0), 1_800.0, 0.0),
        ];
        let breakdowns = compute_cost_breakdowns(&entries, &reference_usage(), 10);
        let cmp = compare_lifetime_totals(&breakdowns).unwrap();
        let (lo, hi) = if breakdowns[0].lifetime_total_pv < breakdowns[1].lifetime_total_pv {
            (0, 1)
        } else {
            (1, 0)
        };
        assert_eq!(cmp.cheapest, lo);
        assert_eq!(cmp.most_expensive, hi);
        assert!(
            (cmp.saving - (breakdowns[hi].lifetime_total_pv - breakdowns[lo].lifetime_total_pv))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn comparison_of_equal_totals_saves_nothing() {
        let e = entry(record(1, "Acme", "Inverter", 700.0), 3_000.0, 0.0);
        let breakdowns = compute_cost_breakdowns(&[e.clone(), e], &reference_usage(), 10);
        let cmp = compare_lifetime_totals(&breakdowns).unwrap();
        assert_eq!(cmp.cheapest, 0);
        assert_eq!(cmp.most_expensive, 0);
        assert!(cmp.saving.abs() < f64::EPSILON);
        assert!(compare_lifetime_totals(&[]).is_none());
    }
}
