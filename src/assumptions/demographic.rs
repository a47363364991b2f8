//! Demographic assumptions: retirement age, mortality setback, rate references

use serde::{Deserialize, Serialize};

use super::rates::{RateTable, RateTableSet, RateType};
use crate::error::ValuationError;

/// Youngest age at which an employee can join the plan
pub const MIN_JOINING_AGE: u32 = 18;

/// How to treat a rate table id that is absent from the fetched set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RateReferencePolicy {
    /// Fail the run
    #[default]
    Strict,
    /// Substitute an all-zero table and log a warning
    ZeroFill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicAssumptions {
    /// Id of the mortality rate table
    pub mortality_rate: String,

    /// Id of the withdrawal rate table
    pub withdrawal_rate: String,

    /// Id of the ill-health rate table
    pub ill_health_rate: String,

    /// Offset added to the age before the mortality lookup
    #[serde(default)]
    pub mortality_age_set_back: i32,

    pub retirement_age: u32,
}

/// The three rate tables a decrement table is built from
#[derive(Debug, Clone, PartialEq)]
pub struct DecrementRates {
    pub mortality: RateTable,
    pub withdrawal: RateTable,
    pub ill_health: RateTable,
}

impl DemographicAssumptions {
    pub fn validate(&self) -> Result<(), ValuationError> {
        if self.retirement_age <= MIN_JOINING_AGE {
            return Err(ValuationError::InvalidRetirementAge(self.retirement_age));
        }
        Ok(())
    }

    /// Look up the three referenced tables in a fetched batch
    pub fn resolve_rates(
        &self,
        rates: &RateTableSet,
        policy: RateReferencePolicy,
    ) -> Result<DecrementRates, ValuationError> {
        Ok(DecrementRates {
            mortality: resolve(rates, "mortality", &self.mortality_rate, RateType::Mortality, policy)?,
            withdrawal: resolve(rates, "withdrawal", &self.withdrawal_rate, RateType::Withdrawal, policy)?,
            ill_health: resolve(rates, "ill-health", &self.ill_health_rate, RateType::IllHealth, policy)?,
        })
    }
}

fn resolve(
    rates: &RateTableSet,
    axis: &'static str,
    id: &str,
    rate_type: RateType,
    policy: RateReferencePolicy,
) -> Result<RateTable, ValuationError> {
    match (rates.get(id), policy) {
        (Some(table), _) => Ok(table.clone()),
        (None, RateReferencePolicy::Strict) => Err(ValuationError::InvalidRateReference {
            axis,
            id: id.to_string(),
        }),
        (None, RateReferencePolicy::ZeroFill) => {
            log::warn!("{} rate table '{}' not found; treating {} rates as zero", axis, id, axis);
            Ok(RateTable::empty(rate_type))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assumptions() -> DemographicAssumptions {
        DemographicAssumptions {
            mortality_rate: "m".into(),
            withdrawal_rate: "w".into(),
            ill_health_rate: "i".into(),
            mortality_age_set_back: 0,
            retirement_age: 60,
        }
    }

    fn rates() -> RateTableSet {
        let mut set = RateTableSet::new();
        set.insert("m", RateTable::new(0, vec![0.001; 100], RateType::Mortality));
        set.insert("w", RateTable::new(18, vec![0.05; 50], RateType::Withdrawal));
        set
    }

    #[test]
    fn test_retirement_age_must_exceed_joining_age() {
        let mut demo = assumptions();
        assert!(demo.validate().is_ok());
        demo.retirement_age = 18;
        assert!(matches!(demo.validate(), Err(ValuationError::InvalidRetirementAge(18))));
    }

    #[test]
    fn test_strict_policy_rejects_missing_table() {
        let err = assumptions()
            .resolve_rates(&rates(), RateReferencePolicy::Strict)
            .unwrap_err();
        match err {
            ValuationError::InvalidRateReference { axis, id } => {
                assert_eq!(axis, "ill-health");
                assert_eq!(id, "i");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_fill_policy_substitutes_empty_table() {
        let resolved = assumptions()
            .resolve_rates(&rates(), RateReferencePolicy::ZeroFill)
            .unwrap();
        assert!(resolved.ill_health.is_empty());
        assert_eq!(resolved.withdrawal.rate_at(30), 0.05);
    }
}
