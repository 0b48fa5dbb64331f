//! Type definitions for `ac_core`.
//!
//! Input records shared by the cost and lifecycle engines. Output types live
//! next to the functions that produce them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifies an equipment record either by its catalog position or by the
/// selection slot it was typed into manually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentId {
    Catalog(u32),
    Manual(u32),
}

impl std::fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipmentId::Catalog(id) => write!(f, "{id}"),
            EquipmentId::Manual(key) => write!(f, "custom-{key}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    Inverter,
    Conventional,
}

impl Technology {
    /// Normalizes free catalog text. Anything mentioning "conv" is a
    /// conventional (fixed-speed) unit; everything else, including blank
    /// text, is treated as inverter.
    pub fn normalize(raw: &str) -> Self {
        if raw.to_lowercase().contains("conv") {
            Technology::Conventional
        } else {
            Technology::Inverter
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Technology::Inverter => "inverter",
            Technology::Conventional => "conventional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceRegime {
    #[default]
    Regular,
    Irregular,
    #[serde(rename = "none")]
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Ideal,
    Hot,
    Severe,
}

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

/// Read-only equipment record as supplied by the catalog or manual entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: EquipmentId,
    pub brand: String,
    /// Installation type (split, window, ...).
    pub kind: String,
    /// Cooling only or heat pump.
    pub function: String,
    /// Technology as declared. Use [`EquipmentRecord::technology_class`] for
    /// the normalized value.
    pub technology: String,
    pub voltage: u32,
    pub power_btu_h: f64,
    pub power_w: f64,
    pub model: String,
    /// Declared consumption in kWh/year for the 2080 h/year reference profile.
    pub annual_consumption_kwh: f64,
    /// Manufacturer-declared seasonal performance index (IDRS).
    pub reliability_index: f64,
    pub efficiency_class: String,
}

impl EquipmentRecord {
    pub fn technology_class(&self) -> Technology {
        Technology::normalize(&self.technology)
    }

    /// Label used in summaries: brand plus the declared (or normalized)
    /// technology.
    pub fn label(&self) -> String {
        let technology = if self.technology.trim().is_empty() {
            self.technology_class().as_str()
        } else {
            self.technology.as_str()
        };
        format!("{} ({technology})", self.brand)
    }
}

/// One selected piece of equipment together with the owner-supplied costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentEntry {
    pub equipment: EquipmentRecord,
    #[serde(default)]
    pub acquisition_cost: f64,
    #[serde(default)]
    pub installation_cost: f64,
    #[serde(default)]
    pub annual_maintenance: f64,
    /// Disposal (residual) cash flow at the end of the horizon.
    #[serde(default)]
    pub disposal_cost: f64,
    /// Expected service life in years. Bounds the comparison horizon and
    /// seeds the Weibull characteristic life.
    #[serde(default = "default_life_years")]
    pub life_years: f64,
}

fn default_life_years() -> f64 {
    10.0
}

/// Longest service life the engines accept. Longer declared lives are
/// treated as unusable, which bounds cashflow tables and curve sampling.
pub const MAX_SERVICE_LIFE_YEARS: f64 = 100.0;

/// `Some(years)` when `years` is a usable service life: finite, positive and
/// at most [`MAX_SERVICE_LIFE_YEARS`].
pub fn usable_service_life(years: f64) -> Option<f64> {
    (years.is_finite() && years > 0.0 && years <= MAX_SERVICE_LIFE_YEARS).then_some(years)
}

impl EquipmentEntry {
    pub fn new(equipment: EquipmentRecord) -> Self {
        Self {
            equipment,
            acquisition_cost: 0.0,
            installation_cost: 0.0,
            annual_maintenance: 0.0,
            disposal_cost: 0.0,
            life_years: default_life_years(),
        }
    }
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

/// How the equipment is used and how money is valued. Missing fields are
/// resolved to documented defaults by the engines, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsagePlan {
    #[serde(default)]
    pub hours_per_day: Option<f64>,
    #[serde(default)]
    pub days_per_year: Option<f64>,
    /// Energy tariff in currency per kWh.
    pub tariff_per_kwh: f64,
    /// Real discount rate as a fraction (0.01 = 1 %).
    #[serde(default)]
    pub real_discount_rate: Option<f64>,
    #[serde(default)]
    pub ambient_temp_c: Option<f64>,
}

impl Default for UsagePlan {
    fn default() -> Self {
        Self {
            hours_per_day: Some(5.698),
            days_per_year: Some(253.0),
            tariff_per_kwh: 1.80,
            real_discount_rate: Some(0.01),
            ambient_temp_c: Some(26.2),
        }
    }
}
