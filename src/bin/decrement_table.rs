//! Write the decrement table for each demographic scenario to CSV
//!
//! Produces one `decrement_table_<scenario>.csv` per scenario that has its own
//! table (base, mortality setback up/down, withdrawal up/down), for checking
//! against spreadsheet life tables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gratuity_valuation::assumptions::loader::{load_plan_assumptions, load_rate_tables, DEFAULT_RATES_FILE};
use gratuity_valuation::assumptions::RateReferencePolicy;
use gratuity_valuation::decrement::build_from_rates;
use gratuity_valuation::Scenario;

#[derive(Debug, Parser)]
#[command(name = "decrement_table", about = "Dump decrement tables for each demographic scenario")]
struct Args {
    /// Plan assumptions JSON
    #[arg(long)]
    assumptions: PathBuf,

    /// Rate table CSV with columns id,rateType,age,rate
    #[arg(long, default_value = DEFAULT_RATES_FILE)]
    rates: PathBuf,

    /// Directory for the output CSV files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let plan = load_plan_assumptions(&args.assumptions)
        .with_context(|| format!("reading assumptions from {}", args.assumptions.display()))?;
    let demographic = plan
        .demographic
        .context("plan has no demographic assumptions")?;
    let rates = load_rate_tables(&args.rates)?;
    let resolved = demographic.resolve_rates(&rates, RateReferencePolicy::Strict)?;

    let scenarios = Scenario::ALL
        .iter()
        .filter(|s| **s == Scenario::Base || s.has_own_table());

    for &scenario in scenarios {
        let table = build_from_rates(&demographic, &resolved, scenario.decrement_adjustment())?;
        let path = args.out_dir.join(format!("decrement_table_{}.csv", scenario.as_str()));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        for entry in table.entries() {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        println!("{:<22} {} ages -> {}", scenario.as_str(), table.len(), path.display());
    }

    Ok(())
}
