//! Valuation assumptions: decrement rates, demographic, financial and benefit structure

mod benefit;
mod demographic;
mod financial;
mod rates;
mod salary;
pub mod loader;

pub use benefit::{
    benefit_factor, BenefitBand, BenefitStructure, Cause, ServiceRounding, ServiceRule, ServiceTypeEntry,
};
pub use demographic::{DecrementRates, DemographicAssumptions, RateReferencePolicy, MIN_JOINING_AGE};
pub use financial::FinancialAssumptions;
pub use rates::{RateTable, RateTableSet, RateType};
pub use salary::{salary_factors, SalaryFactors, SalaryIncreaseAssumptions, SalaryTiming, NEAR_TERM_YEARS};

use serde::{Deserialize, Serialize};

use crate::error::ValuationError;

/// Assumption documents attached to a plan at its valuation stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAssumptions {
    #[serde(default)]
    pub demographic: Option<DemographicAssumptions>,

    #[serde(default)]
    pub financial: Option<FinancialAssumptions>,

    #[serde(default)]
    pub benefit_structure: BenefitStructure,
}

/// Plan assumptions with every required part present
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    pub demographic: DemographicAssumptions,
    pub financial: FinancialAssumptions,
    pub benefits: BenefitStructure,
}

impl PlanAssumptions {
    /// Check that every part needed for a valuation is present and consistent
    pub fn require(self) -> Result<Assumptions, ValuationError> {
        let demographic = self
            .demographic
            .ok_or_else(|| ValuationError::MissingAssumptions("demographic assumptions".into()))?;
        let financial = self
            .financial
            .ok_or_else(|| ValuationError::MissingAssumptions("financial assumptions".into()))?;
        demographic.validate()?;
        self.benefit_structure.validate()?;

        Ok(Assumptions {
            demographic,
            financial,
            benefits: self.benefit_structure,
        })
    }
}
