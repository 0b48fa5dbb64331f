//! Shared test fixtures for ac_core and downstream crates.
//!
//! `reference_usage()` reproduces the catalog's rating profile (8 h/day on
//! 260 days), so adjusted consumption equals the declared figure.

use crate::{
    CostBreakdown, EquipmentEntry, EquipmentId, EquipmentRecord, Environment, LifecycleParams,
    MaintenanceRegime, Technology, UsagePlan,
};

/// Split cooling unit with the given brand, declared technology and
/// declared annual consumption (kWh).
pub fn record(id: u32, brand: &str, technology: &str, annual_consumption_kwh: f64) -> EquipmentRecord {
    EquipmentRecord {
        id: EquipmentId::Catalog(id),
        brand: brand.to_string(),
        kind: "split".to_string(),
        function: "cooling".to_string(),
        technology: technology.to_string(),
        voltage: 220,
        power_btu_h: 12_000.0,
        power_w: 1_100.0,
        model: format!("{brand}-{id}"),
        annual_consumption_kwh,
        reliability_index: 6.5,
        efficiency_class: "A".to_string(),
    }
}

/// Entry with acquisition and installation cost, no maintenance or disposal,
/// ten-year life.
pub fn entry(equipment: EquipmentRecord, acquisition_cost: f64, installation_cost: f64) -> EquipmentEntry {
    EquipmentEntry {
        acquisition_cost,
        installation_cost,
        ..EquipmentEntry::new(equipment)
    }
}

/// 8 h/day, 260 days/year, 0.85 per kWh, 6 % real discount rate.
pub fn reference_usage() -> UsagePlan {
    UsagePlan {
        hours_per_day: Some(8.0),
        days_per_year: Some(260.0),
        tariff_per_kwh: 0.85,
        real_discount_rate: Some(0.06),
        ambient_temp_c: Some(26.2),
    }
}

/// Breakdown with flat yearly costs over a ten-year life. Only the fields the
/// cashflow builder reads are meaningful; discounted figures are at 0 %.
pub fn flat_breakdown(
    capex: f64,
    annual_energy_cost: f64,
    annual_maintenance: f64,
    disposal: f64,
) -> CostBreakdown {
    let years = 10.0;
    CostBreakdown {
        equipment_id: EquipmentId::Manual(0),
        label: "Flat (inverter)".to_string(),
        life_years: 10,
        discount_rate: 0.0,
        annual_consumption_kwh: 0.0,
        lifetime_consumption_kwh: 0.0,
        annual_energy_cost,
        lifetime_energy_cost: annual_energy_cost * years,
        energy_cost_pv: annual_energy_cost * years,
        annual_maintenance,
        maintenance_pv: annual_maintenance * years,
        disposal,
        disposal_pv: disposal,
        annual_operating_cost: annual_energy_cost + annual_maintenance,
        lifetime_operating_cost: (annual_energy_cost + annual_maintenance) * years + disposal,
        operating_cost_pv: (annual_energy_cost + annual_maintenance) * years + disposal,
        capex,
        first_year_cost: capex + annual_energy_cost,
        lifetime_total: annual_energy_cost * years + capex,
        lifetime_total_pv: (annual_energy_cost + annual_maintenance) * years + disposal + capex,
    }
}

/// Lifecycle parameters with every penalty at zero and a ten-year base life.
pub fn neutral_params() -> LifecycleParams {
    LifecycleParams {
        hours_per_day: 5.7,
        maintenance: MaintenanceRegime::Regular,
        environment: Environment::Ideal,
        ambient_temp_c: Some(26.2),
        technology: Technology::Inverter,
        base_life_years: Some(10.0),
    }
}
