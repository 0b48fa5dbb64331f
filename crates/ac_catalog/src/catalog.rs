use std::borrow::Cow;
use std::path::Path;

use ac_core::{EquipmentId, EquipmentRecord};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_VOLTAGE: u32 = 220;
const ENERGY_CLASSES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// One row of the published efficiency catalog. Every field is optional;
/// gaps are filled when the row becomes an [`EquipmentRecord`].
#[derive(Debug, Default, Deserialize)]
struct CatalogRow {
    #[serde(default)]
    marca: Option<String>,
    #[serde(default)]
    tipo: Option<String>,
    #[serde(default)]
    funcao: Option<String>,
    #[serde(default)]
    tecnologia: Option<String>,
    #[serde(default)]
    tensao: Option<serde_json::Value>,
    #[serde(default)]
    potencia_btu: Option<f64>,
    #[serde(default)]
    potencia_w: Option<f64>,
    #[serde(default)]
    modelo_concat: Option<String>,
    #[serde(default)]
    consumo_kwh_ano: Option<f64>,
    #[serde(default)]
    idrs: Option<f64>,
    #[serde(default)]
    classe: Option<String>,
    #[serde(default, rename = "Classe")]
    classe_upper: Option<String>,
}

fn text(value: Option<String>) -> String {
    value.unwrap_or_default()
}

/// Zero stands in for both "missing" and "zero", matching the catalog export.
fn number(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Voltage appears as a number, a numeric string or not at all.
fn voltage(value: Option<&serde_json::Value>) -> u32 {
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_VOLTAGE)
}

impl CatalogRow {
    fn into_record(self, id: u32) -> EquipmentRecord {
        let efficiency_class = self
            .classe
            .filter(|c| !c.is_empty())
            .or(self.classe_upper)
            .unwrap_or_default();
        EquipmentRecord {
            id: EquipmentId::Catalog(id),
            brand: text(self.marca),
            kind: text(self.tipo),
            function: text(self.funcao),
            technology: text(self.tecnologia),
            voltage: voltage(self.tensao.as_ref()),
            power_btu_h: number(self.potencia_btu),
            power_w: number(self.potencia_w),
            model: text(self.modelo_concat),
            annual_consumption_kwh: number(self.consumo_kwh_ano),
            reliability_index: number(self.idrs),
            efficiency_class,
        }
    }
}

/// Rewrites bare `NaN` values (`: NaN`, any case) to `: null` so the text
/// parses as JSON. Returns the input untouched when there is nothing to fix.
pub fn sanitize_nan(raw: &str) -> Cow<'_, str> {
    let bytes = raw.as_bytes();
    let mut out = String::new();
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b':' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let is_nan = bytes.len() >= j + 3
            && bytes[j..j + 3].eq_ignore_ascii_case(b"nan")
            && !matches!(bytes.get(j + 3), Some(b) if b.is_ascii_alphanumeric() || *b == b'_');
        if is_nan {
            out.push_str(&raw[copied..i]);
            out.push_str(": null");
            copied = j + 3;
            i = j + 3;
        } else {
            i += 1;
        }
    }
    if copied == 0 {
        return Cow::Borrowed(raw);
    }
    out.push_str(&raw[copied..]);
    Cow::Owned(out)
}

/// Equipment catalog with 1-based positional ids.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<EquipmentRecord>,
}

impl Catalog {
    pub fn from_records(records: Vec<EquipmentRecord>) -> Self {
        Self { records }
    }

    pub fn get(&self, id: u32) -> Option<&EquipmentRecord> {
        let idx = usize::try_from(id).ok()?.checked_sub(1)?;
        self.records.get(idx)
    }

    pub fn records(&self) -> &[EquipmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parses catalog text, tolerating `NaN` literals.
pub fn parse_catalog(raw: &str) -> Result<Catalog> {
    let rows: Vec<CatalogRow> =
        serde_json::from_str(&sanitize_nan(raw)).context("parsing equipment catalog")?;
    let records = rows
        .into_iter()
        .zip(1u32..)
        .map(|(row, id)| row.into_record(id))
        .collect();
    Ok(Catalog::from_records(records))
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog file: {}", path.display()))?;
    let catalog =
        parse_catalog(&raw).with_context(|| format!("loading catalog: {}", path.display()))?;
    tracing::info!(records = catalog.len(), path = %path.display(), "catalog loaded");
    Ok(catalog)
}

/// Equipment typed in by hand instead of picked from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualEquipment {
    pub name: String,
    pub annual_consumption_kwh: f64,
    #[serde(default)]
    pub technology: Option<String>,
    #[serde(default)]
    pub power_btu_h: f64,
    #[serde(default)]
    pub reliability_index: f64,
    #[serde(default)]
    pub efficiency_class: Option<String>,
}

impl ManualEquipment {
    /// `None` for a blank name or a non-positive consumption.
    pub fn into_record(self, key: u32) -> Option<EquipmentRecord> {
        let name = self.name.trim().to_string();
        if name.is_empty()
            || !self.annual_consumption_kwh.is_finite()
            || self.annual_consumption_kwh <= 0.0
        {
            return None;
        }
        let efficiency_class = self
            .efficiency_class
            .map(|c| c.trim().to_uppercase())
            .filter(|c| ENERGY_CLASSES.contains(&c.as_str()))
            .unwrap_or_default();
        let technology = self
            .technology
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Inverter".to_string());
        Some(EquipmentRecord {
            id: EquipmentId::Manual(key),
            brand: name.clone(),
            kind: "Custom".to_string(),
            function: "Quente e Frio".to_string(),
            technology,
            voltage: 0,
            power_btu_h: number(Some(self.power_btu_h)),
            power_w: 0.0,
            model: name,
            annual_consumption_kwh: self.annual_consumption_kwh,
            reliability_index: number(Some(self.reliability_index)),
            efficiency_class,
        })
    }
}
