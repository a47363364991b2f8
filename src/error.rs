//! Error kinds surfaced by the valuation engine and its loaders

use thiserror::Error;

/// Failure of a valuation run or of loading its inputs
#[derive(Error, Debug)]
pub enum ValuationError {
    /// Demographic or financial assumptions absent on the plan record
    #[error("missing assumptions: {0}")]
    MissingAssumptions(String),

    /// Roster file absent or empty
    #[error("missing employee data: roster is empty")]
    MissingEmployeeData,

    /// A referenced rate table id was not among the fetched rates
    #[error("rate table '{id}' referenced for {axis} was not found")]
    InvalidRateReference { axis: &'static str, id: String },

    #[error("retirement age {0} must be greater than the minimum joining age 18")]
    InvalidRetirementAge(u32),

    #[error("invalid rate table '{id}': {reason}")]
    InvalidRateTable { id: String, reason: String },

    #[error("invalid roster row {row}: {reason}")]
    InvalidEmployee { row: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
