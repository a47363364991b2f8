//! Decrement rate tables keyed by age
//!
//! A rate table is an ordered vector of annual probabilities starting at a
//! given age. Every lookup is bounds-checked: an age below the starting age,
//! beyond the last entry, or a negative age yields a rate of zero. Callers
//! rely on this when shifting the mortality index for setback sensitivities.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Kind of decrement a table describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RateType {
    Mortality,
    Withdrawal,
    IllHealth,
    #[serde(other)]
    Other,
}

impl RateType {
    /// Parse the free-form tag stored on rate documents
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "mortality" | "death" => RateType::Mortality,
            "withdrawal" | "withdrawl" => RateType::Withdrawal,
            "illhealth" | "disability" => RateType::IllHealth,
            _ => RateType::Other,
        }
    }
}

/// Per-age decrement probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    /// Age of the first entry in `value`
    pub starting_age: u32,

    /// Annual probabilities, one per age from `starting_age`
    pub value: Vec<f64>,

    pub rate_type: RateType,

    #[serde(default)]
    pub decrement_rate_name: String,
}

impl RateTable {
    pub fn new(starting_age: u32, value: Vec<f64>, rate_type: RateType) -> Self {
        Self {
            starting_age,
            value,
            rate_type,
            decrement_rate_name: String::new(),
        }
    }

    /// Table with no entries; every lookup returns zero
    pub fn empty(rate_type: RateType) -> Self {
        Self::new(0, Vec::new(), rate_type)
    }

    /// Annual rate at `age`, or 0.0 when the age is outside the table
    pub fn rate_at(&self, age: i64) -> f64 {
        let offset = age - self.starting_age as i64;
        if offset < 0 {
            return 0.0;
        }
        self.value.get(offset as usize).copied().unwrap_or(0.0)
    }

    /// Last age with a defined entry
    pub fn last_age(&self) -> Option<u32> {
        if self.value.is_empty() {
            None
        } else {
            Some(self.starting_age + self.value.len() as u32 - 1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Rate tables fetched in one batch, addressable by document id
#[derive(Debug, Clone, Default)]
pub struct RateTableSet {
    tables: HashMap<String, RateTable>,
}

impl RateTableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, table: RateTable) {
        self.tables.insert(id.into(), table);
    }

    pub fn get(&self, id: &str) -> Option<&RateTable> {
        self.tables.get(id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<(String, RateTable)> for RateTableSet {
    fn from_iter<I: IntoIterator<Item = (String, RateTable)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
