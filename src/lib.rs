//! Gratuity Valuation - actuarial valuation engine for gratuity and pension liabilities
//!
//! This library provides:
//! - Multiple-decrement service tables built from mortality, withdrawal and ill-health rates
//! - Salary projection under three salary-increase timing regimes
//! - Accrued liability and normal cost per employee by cause of exit
//! - Liability reports across sensitivity scenarios, with duration
//! - Expected benefit payment schedules for the whole plan

pub mod assumptions;
pub mod census;
pub mod decrement;
pub mod error;
pub mod progress;
pub mod report;
pub mod scenario;
pub mod valuation;

// Re-export commonly used types
pub use assumptions::{Assumptions, PlanAssumptions, RateTable, RateTableSet};
pub use census::EmployeeRecord;
pub use decrement::{build_decrement_table, DecrementTable, DecrementTableEntry};
pub use error::ValuationError;
pub use report::{aggregate, LiabilityReport};
pub use scenario::Scenario;
pub use valuation::{ValuationConfig, ValuationEngine, ValuationOutcome};
