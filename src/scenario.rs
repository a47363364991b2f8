//! Sensitivity scenarios
//!
//! Every valuation runs the base assumptions plus eight what-if variants.
//! Discount and salary variants move by the plan's sensitivity change;
//! mortality variants shift the setback by one year; withdrawal variants
//! scale withdrawal rates by five percent.

use serde::{Deserialize, Serialize};

use crate::decrement::DecrementAdjustment;

/// Mortality setback shift used by the mortality sensitivities, years
pub const MORTALITY_SETBACK_SHIFT: i32 = 1;

/// Withdrawal rate change used by the withdrawal sensitivities, percent
pub const WITHDRAWAL_CHANGE_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scenario {
    Base,
    DiscountRateUp,
    DiscountRateDown,
    SalaryIncreaseUp,
    SalaryIncreaseDown,
    MortalitySetbackUp,
    MortalitySetbackDown,
    WithdrawalRateUp,
    WithdrawalRateDown,
}

impl Scenario {
    pub const ALL: [Scenario; 9] = [
        Scenario::Base,
        Scenario::DiscountRateUp,
        Scenario::DiscountRateDown,
        Scenario::SalaryIncreaseUp,
        Scenario::SalaryIncreaseDown,
        Scenario::MortalitySetbackUp,
        Scenario::MortalitySetbackDown,
        Scenario::WithdrawalRateUp,
        Scenario::WithdrawalRateDown,
    ];

    /// Position in `Scenario::ALL`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Change to the discount rate, in units of the sensitivity change
    pub fn discount_direction(self) -> f64 {
        match self {
            Scenario::DiscountRateUp => 1.0,
            Scenario::DiscountRateDown => -1.0,
            _ => 0.0,
        }
    }

    /// Change to every salary increase rate, in units of the sensitivity change
    pub fn salary_direction(self) -> f64 {
        match self {
            Scenario::SalaryIncreaseUp => 1.0,
            Scenario::SalaryIncreaseDown => -1.0,
            _ => 0.0,
        }
    }

    /// Adjustment applied when building this scenario's decrement table
    pub fn decrement_adjustment(self) -> DecrementAdjustment {
        match self {
            Scenario::MortalitySetbackUp => DecrementAdjustment::mortality_setback(MORTALITY_SETBACK_SHIFT),
            Scenario::MortalitySetbackDown => DecrementAdjustment::mortality_setback(-MORTALITY_SETBACK_SHIFT),
            Scenario::WithdrawalRateUp => DecrementAdjustment::withdrawal_change(WITHDRAWAL_CHANGE_PERCENT),
            Scenario::WithdrawalRateDown => DecrementAdjustment::withdrawal_change(-WITHDRAWAL_CHANGE_PERCENT),
            _ => DecrementAdjustment::default(),
        }
    }

    /// Whether this scenario needs its own decrement table
    pub fn has_own_table(self) -> bool {
        self.decrement_adjustment() != DecrementAdjustment::default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Base => "base",
            Scenario::DiscountRateUp => "discountRateUp",
            Scenario::DiscountRateDown => "discountRateDown",
            Scenario::SalaryIncreaseUp => "salaryIncreaseUp",
            Scenario::SalaryIncreaseDown => "salaryIncreaseDown",
            Scenario::MortalitySetbackUp => "mortalitySetbackUp",
            Scenario::MortalitySetbackDown => "mortalitySetbackDown",
            Scenario::WithdrawalRateUp => "withdrawalRateUp",
            Scenario::WithdrawalRateDown => "withdrawalRateDown",
        }
    }
}
