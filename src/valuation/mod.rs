//! Present values, roster valuation and expected cash flows

mod cashflows;
mod discount;
mod engine;
mod pv;
mod results;

pub use cashflows::project_cash_flows;
pub use discount::Discounting;
pub use engine::{ValuationConfig, ValuationEngine, ValuationOutcome};
pub use pv::{present_value_at_retirement, present_value_by_cause, AccrualMode, PvInputs};
pub use results::{CauseResult, CauseResults, EmployeeValuation, YearResult};
