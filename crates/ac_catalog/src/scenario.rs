use std::path::Path;

use ac_core::{
    usable_service_life, EquipmentEntry, LifecycleBaseParams, UsagePlan, MAX_SERVICE_LIFE_YEARS,
};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::{Catalog, ManualEquipment};

/// A comparison run: usage profile, the selected equipment with its costs,
/// and the shared lifecycle settings.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub usage: UsagePlan,
    pub selections: Vec<Selection>,
    #[serde(default)]
    pub lifecycle: LifecycleBaseParams,
}

#[derive(Debug, Deserialize)]
pub struct Selection {
    #[serde(flatten)]
    pub source: EquipmentSource,
    #[serde(default)]
    pub acquisition_cost: f64,
    #[serde(default)]
    pub installation_cost: f64,
    #[serde(default)]
    pub annual_maintenance: f64,
    #[serde(default)]
    pub disposal_cost: f64,
    #[serde(default)]
    pub life_years: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EquipmentSource {
    Catalog { catalog_id: u32 },
    Manual { manual: ManualEquipment },
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario file: {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&json)
        .with_context(|| format!("parsing scenario file: {}", path.display()))?;
    if scenario.name.trim().is_empty() {
        bail!("scenario 'name' must not be empty");
    }
    if scenario.selections.is_empty() {
        bail!("scenario 'selections' must list at least one unit");
    }
    if !scenario.usage.tariff_per_kwh.is_finite() || scenario.usage.tariff_per_kwh < 0.0 {
        bail!("scenario 'usage.tariff_per_kwh' must be a non-negative number");
    }
    for (idx, selection) in scenario.selections.iter().enumerate() {
        if let Some(years) = selection.life_years {
            if usable_service_life(years).is_none() {
                bail!(
                    "selection {} 'life_years' must be > 0 and <= {MAX_SERVICE_LIFE_YEARS}",
                    idx + 1
                );
            }
        }
    }
    Ok(scenario)
}

/// Turns selections into engine entries, in order. Selections that point at
/// a missing catalog row or hold an unusable manual entry are skipped.
pub fn resolve_entries(scenario: &Scenario, catalog: &Catalog) -> Vec<EquipmentEntry> {
    let mut entries = Vec::with_capacity(scenario.selections.len());
    for (slot, selection) in (1u32..).zip(&scenario.selections) {
        let record = match &selection.source {
            EquipmentSource::Catalog { catalog_id } => {
                let record = catalog.get(*catalog_id).cloned();
                if record.is_none() {
                    tracing::warn!(slot, catalog_id, "catalog id not found, skipping");
                }
                record
            }
            EquipmentSource::Manual { manual } => {
                let record = manual.clone().into_record(slot);
                if record.is_none() {
                    tracing::warn!(slot, name = %manual.name, "manual entry needs a name and positive consumption, skipping");
                }
                record
            }
        };
        let Some(equipment) = record else {
            continue;
        };
        let mut entry = EquipmentEntry::new(equipment);
        entry.acquisition_cost = selection.acquisition_cost;
        entry.installation_cost = selection.installation_cost;
        entry.annual_maintenance = selection.annual_maintenance;
        entry.disposal_cost = selection.disposal_cost;
        if let Some(years) = selection.life_years {
            entry.life_years = years;
        }
        entries.push(entry);
    }
    tracing::debug!(
        selected = scenario.selections.len(),
        resolved = entries.len(),
        "selections resolved"
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::test_fixtures::record;
    use ac_core::{EquipmentId, MaintenanceRegime};
    use std::io::Write;

    fn write_temp_scenario(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn two_unit_catalog() -> Catalog {
        Catalog::from_records(vec![
            record(1, "Polar", "Inverter", 620.0),
            record(2, "Breeze", "Convencional", 980.0),
        ])
    }

    #[test]
    fn test_load_scenario_with_defaults() {
        let file = write_temp_scenario(
            r#"{
            "name": "office",
            "selections": [{"catalog_id": 1}, {"catalog_id": 2, "acquisition_cost": 2300}]
        }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.name, "office");
        assert_eq!(scenario.selections.len(), 2);
        assert_eq!(scenario.usage, UsagePlan::default());
        assert_eq!(scenario.lifecycle, LifecycleBaseParams::default());
        assert!((scenario.selections[1].acquisition_cost - 2_300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_scenario_with_manual_unit_and_lifecycle() {
        let file = write_temp_scenario(
            r#"{
            "name": "home",
            "usage": {"hours_per_day": 8, "tariff_per_kwh": 0.92},
            "selections": [
                {"catalog_id": 1, "life_years": 12},
                {"manual": {"name": "Brisa 3000", "annual_consumption_kwh": 410}}
            ],
            "lifecycle": {"hours_per_day": 9.5, "maintenance": "none", "environment": "hot"}
        }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.usage.hours_per_day, Some(8.0));
        assert!(scenario.usage.days_per_year.is_none());
        assert!(matches!(
            scenario.selections[1].source,
            EquipmentSource::Manual { .. }
        ));
        assert_eq!(scenario.lifecycle.maintenance, MaintenanceRegime::Absent);
        assert!(scenario.lifecycle.ambient_temp_c.is_none());
    }

    #[test]
    fn test_load_scenario_empty_name_fails() {
        let file = write_temp_scenario(r#"{"name": " ", "selections": [{"catalog_id": 1}]}"#);
        let err = load_scenario(file.path()).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_load_scenario_without_selections_fails() {
        let file = write_temp_scenario(r#"{"name": "x", "selections": []}"#);
        assert!(load_scenario(file.path()).is_err());
    }

    #[test]
    fn test_load_scenario_bad_life_years_fails() {
        let file = write_temp_scenario(
            r#"{"name": "x", "selections": [{"catalog_id": 1, "life_years": 0}]}"#,
        );
        let err = load_scenario(file.path()).unwrap_err();
        assert!(err.to_string().contains("life_years"));
    }

    #[test]
    fn test_load_scenario_life_years_above_cap_fails() {
        let file = write_temp_scenario(
            r#"{"name": "x", "selections": [{"catalog_id": 1, "life_years": 1e9}]}"#,
        );
        let err = load_scenario(file.path()).unwrap_err();
        assert!(err.to_string().contains("<= 100"));

        let file = write_temp_scenario(
            r#"{"name": "x", "selections": [{"catalog_id": 1, "life_years": 100}]}"#,
        );
        assert!(load_scenario(file.path()).is_ok());
    }

    #[test]
    fn test_unknown_maintenance_is_parse_error() {
        let file = write_temp_scenario(
            r#"{"name": "x", "selections": [{"catalog_id": 1}],
                "lifecycle": {"maintenance": "sometimes"}}"#,
        );
        assert!(load_scenario(file.path()).is_err());
    }

    #[test]
    fn test_resolve_entries_skips_unresolvable() {
        let file = write_temp_scenario(
            r#"{
            "name": "mixed",
            "selections": [
                {"catalog_id": 2, "acquisition_cost": 2300, "annual_maintenance": 120},
                {"catalog_id": 9},
                {"manual": {"name": "", "annual_consumption_kwh": 410}},
                {"manual": {"name": "Brisa", "annual_consumption_kwh": 410}, "life_years": 8}
            ]
        }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        let entries = resolve_entries(&scenario, &two_unit_catalog());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].equipment.id, EquipmentId::Catalog(2));
        assert!((entries[0].acquisition_cost - 2_300.0).abs() < f64::EPSILON);
        assert!((entries[0].life_years - 10.0).abs() < f64::EPSILON);
        assert_eq!(entries[1].equipment.id, EquipmentId::Manual(4));
        assert!((entries[1].life_years - 8.0).abs() < f64::EPSILON);
    }
}
