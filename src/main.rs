//! Gratuity Valuation CLI
//!
//! Values an active employee roster against plan assumptions and writes the
//! per-employee results, liability report and expected benefit payments as JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use gratuity_valuation::assumptions::loader::{load_plan_assumptions, load_rate_tables};
use gratuity_valuation::assumptions::RateReferencePolicy;
use gratuity_valuation::census::load_roster;
use gratuity_valuation::progress::LogProgress;
use gratuity_valuation::valuation::AccrualMode;
use gratuity_valuation::{Scenario, ValuationConfig, ValuationEngine};

#[derive(Debug, Parser)]
#[command(name = "gratuity_valuation", version, about = "Value gratuity liabilities for an employee roster")]
struct Args {
    /// Plan assumptions JSON (demographic, financial, benefit structure)
    #[arg(long)]
    assumptions: PathBuf,

    /// Rate table CSV with columns id,rateType,age,rate
    #[arg(long, default_value = gratuity_valuation::assumptions::loader::DEFAULT_RATES_FILE)]
    rates: PathBuf,

    /// Active employee roster CSV
    #[arg(long)]
    roster: PathBuf,

    /// Valuation date (YYYY-MM-DD), needed when the roster has DOB/DOA columns
    #[arg(long)]
    valuation_date: Option<NaiveDate>,

    /// Job identifier attached to progress messages
    #[arg(long, default_value = "local")]
    job_id: String,

    /// Output JSON path
    #[arg(long, default_value = "valuation_output.json")]
    output: PathBuf,

    /// Value employees on a single thread
    #[arg(long)]
    sequential: bool,

    /// Treat missing rate tables as all-zero instead of failing
    #[arg(long)]
    zero_fill_missing_rates: bool,

    /// Attribute each year's value per year of service instead of prorating by past service (no normal cost)
    #[arg(long)]
    unprorated: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let assumptions = load_plan_assumptions(&args.assumptions)
        .with_context(|| format!("reading assumptions from {}", args.assumptions.display()))?
        .require()?;
    let rates = load_rate_tables(&args.rates)
        .with_context(|| format!("reading rate tables from {}", args.rates.display()))?;
    let roster = load_roster(&args.roster, args.valuation_date)
        .with_context(|| format!("reading roster from {}", args.roster.display()))?;
    println!("Loaded {} employees and {} rate tables in {:?}", roster.len(), rates.len(), start.elapsed());

    let config = ValuationConfig {
        accrual: if args.unprorated { AccrualMode::Unprorated } else { AccrualMode::Prorated },
        rate_reference_policy: if args.zero_fill_missing_rates {
            RateReferencePolicy::ZeroFill
        } else {
            RateReferencePolicy::Strict
        },
        parallel: !args.sequential,
    };
    let engine = ValuationEngine::new(assumptions, rates, config);
    let outcome = engine.run(&args.job_id, &roster, &LogProgress)?;

    let file = File::create(&args.output).with_context(|| format!("creating {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &outcome)?;
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    let report = &outcome.liability_report;
    println!("\nLiability Summary:");
    for scenario in &report.scenarios {
        println!(
            "  {:<22} death={:>14.2} withdrawal={:>14.2} illHealth={:>14.2} retirement={:>14.2} total={:>14.2}",
            scenario.scenario.as_str(),
            scenario.accrued.death,
            scenario.accrued.withdrawal,
            scenario.accrued.ill_health,
            scenario.accrued.retirement,
            scenario.total,
        );
    }
    if let Some(nc) = report.scenario(Scenario::Base).and_then(|s| s.normal_cost) {
        println!("  Normal cost (base): {:.2}", nc.total());
    }
    println!("  Duration: {:.4}", report.duration);
    println!("  Payment years: {}", outcome.expected_benefit_payments.len());

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
