mod report;

use std::path::PathBuf;

use ac_catalog::{load_catalog, load_scenario, resolve_entries, Scenario};
use ac_core::{
    align_curves, build_cashflow_rows, cashflow_difference, compare_lifetime_totals,
    compute_cost_breakdowns, compute_lifecycle_curves, find_payback, shared_horizon,
    CashflowParams, CostBreakdown, CostComparison, EquipmentEntry, LifecycleResult,
    LifecycleSubject, Payback,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::report::{CashflowReport, CompareReport, LifecycleReport};

/// The lifecycle view compares at most this many units.
const MAX_LIFECYCLE_UNITS: usize = 3;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "ac_cli", about = "Air-conditioning cost and lifecycle comparison")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Inputs {
    /// Equipment catalog (JSON array).
    #[arg(long)]
    catalog: PathBuf,
    /// Scenario file with usage, selections and lifecycle settings.
    #[arg(long)]
    scenario: PathBuf,
    /// Write JSON and CSV reports into a timestamped directory under this path.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost breakdown, cashflow tables and payback for the selected units.
    Compare {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Weibull reliability, density and hazard curves for up to three units.
    Lifecycle {
        #[command(flatten)]
        inputs: Inputs,
    },
}

fn load_inputs(inputs: &Inputs) -> Result<(Scenario, Vec<EquipmentEntry>)> {
    let catalog = load_catalog(&inputs.catalog)?;
    let scenario = load_scenario(&inputs.scenario)?;
    let entries = resolve_entries(&scenario, &catalog);
    Ok((scenario, entries))
}

// ---------------------------------------------------------------------------
// compare
// ---------------------------------------------------------------------------

fn compare(inputs: &Inputs) -> Result<()> {
    let (scenario, entries) = load_inputs(inputs)?;
    if entries.len() < 2 {
        println!(
            "Select at least two units to compare ({} resolved).",
            entries.len()
        );
        return Ok(());
    }

    let horizon = shared_horizon(&entries);
    let breakdowns = compute_cost_breakdowns(&entries, &scenario.usage, horizon);
    let params = CashflowParams {
        years: horizon,
        discount_rate: scenario.usage.real_discount_rate,
    };
    let rows_a = build_cashflow_rows(&breakdowns[0], &params);
    let rows_b = build_cashflow_rows(&breakdowns[1], &params);
    let difference = cashflow_difference(&rows_a, &rows_b, &params);
    let payback = find_payback(&difference);
    let cashflow = CashflowReport::new(rows_a, rows_b, difference);
    tracing::info!(units = breakdowns.len(), horizon, "cost comparison computed");

    print_breakdowns(&breakdowns, horizon, params.rate());
    print_payback(&breakdowns[0], &breakdowns[1], &payback);

    let report = CompareReport {
        scenario: &scenario.name,
        generated_at: report::timestamp(),
        horizon_years: horizon,
        discount_rate: params.rate(),
        breakdowns: &breakdowns,
        comparison: compare_lifetime_totals(&breakdowns),
        cashflow: &cashflow,
        payback,
    };
    if let Some(comparison) = report.comparison {
        println!("{}", comparison_summary(&breakdowns, &comparison));
    }

    if let Some(root) = &inputs.output {
        let dir = report::create_output_dir(root, &scenario.name)?;
        report::write_json(&dir.join("report.json"), &report)?;
        report::write_cashflow_csv(&dir.join("cashflow_a.csv"), &cashflow.a)?;
        report::write_cashflow_csv(&dir.join("cashflow_b.csv"), &cashflow.b)?;
        report::write_cashflow_csv(&dir.join("cashflow_difference.csv"), &cashflow.difference)?;
        println!("Reports written to {}", dir.display());
    }
    Ok(())
}

fn print_breakdowns(breakdowns: &[CostBreakdown], horizon: u32, rate: f64) {
    println!(
        "Horizon: {horizon} years, real discount rate {:.2}%",
        rate * 100.0
    );
    println!("{}", "-".repeat(80));
    for b in breakdowns {
        println!("{}", breakdown_summary(b));
    }
    println!("{}", "-".repeat(80));
}

fn breakdown_summary(b: &CostBreakdown) -> String {
    format!(
        "{label}\n  consumption {kwh:.1} kWh/yr  energy {energy:.2}/yr  first year {first:.2}\n  \
         PV energy {pv_energy:.2}  PV maintenance {pv_maint:.2}  PV disposal {pv_disp:.2}  \
         capex {capex:.2}\n  annual energy (PV) {annual_energy_pv:.2}  \
         annual operating cost (PV) {annual_operating_pv:.2}\n  lifetime total (PV) {total:.2}",
        label = b.label,
        kwh = b.annual_consumption_kwh,
        energy = b.annual_energy_cost,
        first = b.first_year_cost,
        pv_energy = b.energy_cost_pv,
        pv_maint = b.maintenance_pv,
        pv_disp = b.disposal_pv,
        capex = b.capex,
        annual_energy_pv = b.annualized_energy_cost_pv(),
        annual_operating_pv = b.annualized_operating_cost_pv(),
        total = b.lifetime_total_pv,
    )
}

fn comparison_summary(breakdowns: &[CostBreakdown], comparison: &CostComparison) -> String {
    if comparison.saving > 0.0 {
        format!(
            "Cheapest over the horizon: {} (saves {:.2} against {})",
            breakdowns[comparison.cheapest].label,
            comparison.saving,
            breakdowns[comparison.most_expensive].label,
        )
    } else {
        "All units have equivalent lifetime totals (PV).".to_string()
    }
}

fn print_payback(a: &CostBreakdown, b: &CostBreakdown, payback: &Payback) {
    match payback.year {
        Some(year) => println!(
            "{} pays back against {} in year {year} (cumulative PV difference {:.2})",
            a.label, b.label, payback.cumulative_diff
        ),
        None => println!(
            "{} does not pay back against {} within the horizon (cumulative PV difference {:.2})",
            a.label, b.label, payback.cumulative_diff
        ),
    }
}

// ---------------------------------------------------------------------------
// lifecycle
// ---------------------------------------------------------------------------

fn lifecycle(inputs: &Inputs) -> Result<()> {
    let (scenario, entries) = load_inputs(inputs)?;
    if entries.is_empty() {
        println!("Select at least one unit for the lifecycle view.");
        return Ok(());
    }
    if entries.len() > MAX_LIFECYCLE_UNITS {
        tracing::warn!(
            selected = entries.len(),
            kept = MAX_LIFECYCLE_UNITS,
            "lifecycle view compares at most three units"
        );
    }

    let subjects: Vec<LifecycleSubject> = entries
        .iter()
        .take(MAX_LIFECYCLE_UNITS)
        .map(LifecycleSubject::from_entry)
        .collect();
    let results = compute_lifecycle_curves(&subjects, &scenario.lifecycle);
    let aligned = align_curves(&results);
    tracing::info!(units = results.len(), samples = aligned.time_axis.len(), "lifecycle curves computed");

    print_lifecycle(&results);

    if let Some(root) = &inputs.output {
        let dir = report::create_output_dir(root, &scenario.name)?;
        let report = LifecycleReport {
            scenario: &scenario.name,
            generated_at: report::timestamp(),
            results: &results,
            aligned: &aligned,
        };
        report::write_json(&dir.join("lifecycle.json"), &report)?;
        report::write_curves_csv(&dir.join("lifecycle_curves.csv"), &aligned)?;
        println!("Reports written to {}", dir.display());
    }
    Ok(())
}

fn print_lifecycle(results: &[LifecycleResult]) {
    println!("{}", "-".repeat(80));
    for r in results {
        println!(
            "{label}\n  beta {shape:.1}  eta {scale:.2} yr  MTTF {mttf:.2} yr  AF {af:.2}  B10 {b10:.2} yr  \
             median {median:.2} yr  horizon {max_time} yr",
            label = r.label,
            shape = r.shape,
            scale = r.scale,
            mttf = r.mttf,
            af = r.acceleration_factor,
            b10 = r.b10_life,
            median = r.median_life,
            max_time = r.max_time,
        );
    }
    println!("{}", "-".repeat(80));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match &cli.command {
        Commands::Compare { inputs } => compare(inputs)?,
        Commands::Lifecycle { inputs } => lifecycle(inputs)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::test_fixtures::flat_breakdown;
    use clap::CommandFactory;
    use std::io::Write;
    use std::path::Path;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compare_parses_paths() {
        let cli = Cli::parse_from([
            "ac_cli",
            "compare",
            "--catalog",
            "catalog.json",
            "--scenario",
            "office.json",
        ]);
        let Commands::Compare { inputs } = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(inputs.catalog, Path::new("catalog.json"));
        assert!(inputs.output.is_none());
    }

    #[test]
    fn summary_shows_annualized_present_values() {
        let b = flat_breakdown(1_000.0, 200.0, 50.0, 0.0);
        let text = breakdown_summary(&b);
        assert!(text.contains("annual energy (PV) 200.00"), "{text}");
        assert!(text.contains("annual operating cost (PV) 250.00"), "{text}");
    }

    #[test]
    fn equal_totals_are_reported_as_equivalent() {
        let b = flat_breakdown(1_000.0, 200.0, 0.0, 0.0);
        let breakdowns = vec![b.clone(), b];
        let comparison = compare_lifetime_totals(&breakdowns).unwrap();
        assert_eq!(
            comparison_summary(&breakdowns, &comparison),
            "All units have equivalent lifetime totals (PV)."
        );

        let cheaper = flat_breakdown(500.0, 200.0, 0.0, 0.0);
        let breakdowns = vec![breakdowns[0].clone(), cheaper];
        let comparison = compare_lifetime_totals(&breakdowns).unwrap();
        assert!(comparison_summary(&breakdowns, &comparison).contains("saves 500.00"));
    }

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    fn fixture_inputs(dir: &Path) -> Inputs {
        let catalog = write(
            dir,
            "catalog.json",
            r#"[
                {"marca": "Polar", "tecnologia": "Inverter", "consumo_kwh_ano": 620},
                {"marca": "Breeze", "tecnologia": "Convencional", "consumo_kwh_ano": 980, "idrs": NaN}
            ]"#,
        );
        let scenario = write(
            dir,
            "scenario.json",
            r#"{
                "name": "office",
                "usage": {"hours_per_day": 8, "days_per_year": 260, "tariff_per_kwh": 0.85,
                          "real_discount_rate": 0.06},
                "selections": [
                    {"catalog_id": 1, "acquisition_cost": 3400, "installation_cost": 450, "life_years": 12},
                    {"catalog_id": 2, "acquisition_cost": 2300, "installation_cost": 450}
                ]
            }"#,
        );
        Inputs {
            catalog,
            scenario,
            output: Some(dir.join("out")),
        }
    }

    fn only_subdir(root: &Path) -> PathBuf {
        let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(dirs.len(), 1);
        dirs.remove(0)
    }

    #[test]
    fn compare_writes_reports() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = fixture_inputs(dir.path());
        compare(&inputs).unwrap();

        let out = only_subdir(&dir.path().join("out"));
        for name in [
            "report.json",
            "cashflow_a.csv",
            "cashflow_b.csv",
            "cashflow_difference.csv",
        ] {
            assert!(out.join(name).is_file(), "missing {name}");
        }
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("report.json")).unwrap())
                .unwrap();
        assert_eq!(report["horizon_years"], 10);
        assert_eq!(report["breakdowns"].as_array().unwrap().len(), 2);
        assert_eq!(report["comparison"]["cheapest"], 0);
    }

    #[test]
    fn lifecycle_writes_curves() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = fixture_inputs(dir.path());
        lifecycle(&inputs).unwrap();

        let out = only_subdir(&dir.path().join("out"));
        assert!(out.join("lifecycle.json").is_file());
        assert!(out.join("lifecycle_curves.csv").is_file());
    }

    #[test]
    fn compare_with_one_unit_is_a_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut inputs = fixture_inputs(dir.path());
        inputs.scenario = write(
            dir.path(),
            "single.json",
            r#"{"name": "single", "selections": [{"catalog_id": 1}, {"catalog_id": 7}]}"#,
        );
        compare(&inputs).unwrap();
        assert!(!dir.path().join("out").exists());
    }
}
