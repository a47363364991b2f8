//! File loaders for rate tables and plan assumptions
//!
//! Rate tables are read from one long-format CSV with columns
//! `id,rateType,age,rate` (optionally `name`). Rows for one id may appear in
//! any order; ages missing between the first and last row are stored as 0.
//! Plan assumptions are read from a JSON document.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::rates::{RateTable, RateTableSet, RateType};
use super::PlanAssumptions;
use crate::error::ValuationError;

/// Default location of the rate table CSV
pub const DEFAULT_RATES_FILE: &str = "data/rates.csv";

/// Highest age a rate table row may carry
pub const MAX_RATE_AGE: u32 = 120;

#[derive(Debug, Deserialize)]
struct RateRow {
    id: String,
    #[serde(rename = "rateType")]
    rate_type: String,
    age: u32,
    rate: f64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Default)]
struct PendingTable {
    rate_type: Option<RateType>,
    name: Option<String>,
    rates: BTreeMap<u32, f64>,
}

impl PendingTable {
    fn finish(self) -> RateTable {
        let starting_age = self.rates.keys().next().copied().unwrap_or(0);
        let last_age = self.rates.keys().next_back().copied().unwrap_or(0);
        let mut value = vec![0.0; (last_age - starting_age + 1) as usize];
        for (age, rate) in &self.rates {
            value[(age - starting_age) as usize] = *rate;
        }
        RateTable {
            starting_age,
            value,
            rate_type: self.rate_type.unwrap_or(RateType::Other),
            decrement_rate_name: self.name.unwrap_or_default(),
        }
    }
}

/// Load every rate table in a long-format CSV file
pub fn load_rate_tables<P: AsRef<Path>>(path: P) -> Result<RateTableSet, ValuationError> {
    load_rate_tables_from_reader(File::open(path)?)
}

/// Load rate tables from any reader
pub fn load_rate_tables_from_reader<R: Read>(reader: R) -> Result<RateTableSet, ValuationError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut pending: BTreeMap<String, PendingTable> = BTreeMap::new();

    for result in csv_reader.deserialize() {
        let row: RateRow = result?;
        if row.age > MAX_RATE_AGE {
            return Err(ValuationError::InvalidRateTable {
                id: row.id,
                reason: format!("age {} is above the maximum of {}", row.age, MAX_RATE_AGE),
            });
        }
        let table = pending.entry(row.id).or_default();
        table.rate_type.get_or_insert_with(|| RateType::from_tag(&row.rate_type));
        if let Some(name) = row.name {
            table.name.get_or_insert(name);
        }
        table.rates.insert(row.age, row.rate);
    }

    let set: RateTableSet = pending
        .into_iter()
        .map(|(id, table)| (id, table.finish()))
        .collect();
    log::debug!("Loaded {} rate tables", set.len());
    Ok(set)
}

/// Load the plan assumption document
pub fn load_plan_assumptions<P: AsRef<Path>>(path: P) -> Result<PlanAssumptions, ValuationError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}
