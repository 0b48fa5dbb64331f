//! Report export: JSON summaries and CSV tables in a timestamped directory.

use std::path::{Path, PathBuf};

use ac_core::{
    AlignedCurves, CashflowRow, CashflowTotals, CostBreakdown, CostComparison, LifecycleResult,
    Payback,
};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
pub struct CashflowReport {
    pub a: Vec<CashflowRow>,
    pub b: Vec<CashflowRow>,
    pub difference: Vec<CashflowRow>,
    pub totals_a: CashflowTotals,
    pub totals_b: CashflowTotals,
    pub totals_difference: CashflowTotals,
}

impl CashflowReport {
    pub fn new(a: Vec<CashflowRow>, b: Vec<CashflowRow>, difference: Vec<CashflowRow>) -> Self {
        Self {
            totals_a: CashflowTotals::from_rows(&a),
            totals_b: CashflowTotals::from_rows(&b),
            totals_difference: CashflowTotals::from_rows(&difference),
            a,
            b,
            difference,
        }
    }
}

#[derive(Serialize)]
pub struct CompareReport<'a> {
    pub scenario: &'a str,
    pub generated_at: String,
    pub horizon_years: u32,
    pub discount_rate: f64,
    pub breakdowns: &'a [CostBreakdown],
    pub comparison: Option<CostComparison>,
    pub cashflow: &'a CashflowReport,
    pub payback: Payback,
}

#[derive(Serialize)]
pub struct LifecycleReport<'a> {
    pub scenario: &'a str,
    pub generated_at: String,
    pub results: &'a [LifecycleResult],
    pub aligned: &'a AlignedCurves,
}

pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Creates `<root>/<name>_<YYYYmmdd_HHMMSS>`.
pub fn create_output_dir(root: &Path, name: &str) -> Result<PathBuf> {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let dir = root.join(format!("{name}_{stamp}"));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory: {}", dir.display()))?;
    Ok(dir)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn write_cashflow_csv(path: &Path, rows: &[CashflowRow]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing year {} to {}", row.year, path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

/// One row per sample time; three columns (R, f, h in percent) per unit.
/// Samples past a unit's horizon are left blank.
pub fn write_curves_csv(path: &Path, aligned: &AlignedCurves) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    let mut header = vec!["t_years".to_string()];
    for series in &aligned.series {
        header.push(format!("{} R(%)", series.label));
        header.push(format!("{} f(%)", series.label));
        header.push(format!("{} h(%)", series.label));
    }
    writer.write_record(&header).context("writing curves header")?;

    for (idx, t) in aligned.time_axis.iter().enumerate() {
        let mut record = vec![format!("{t:.1}")];
        for series in &aligned.series {
            record.push(cell(series.reliability[idx]));
            record.push(cell(series.density[idx]));
            record.push(cell(series.hazard[idx]));
        }
        writer
            .write_record(&record)
            .with_context(|| format!("writing t = {t} to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}
