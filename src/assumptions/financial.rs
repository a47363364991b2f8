//! Financial assumptions, stored as percentages

use serde::{Deserialize, Serialize};

use super::salary::{SalaryIncreaseAssumptions, NEAR_TERM_YEARS};

/// Discount and salary assumptions as entered on the plan (percent values)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAssumptions {
    /// Annual discount rate, percent
    pub discount_rate: f64,

    /// si1..si5, percent
    pub salary_increase_rates: [f64; NEAR_TERM_YEARS],

    /// SI, percent
    pub long_term_salary_increase_rate: f64,

    /// Months from the valuation date to the next salary increase
    pub month_of_salary_increase: u32,

    /// Size of the discount and salary sensitivities, percentage points
    #[serde(default = "default_sensitivity_change")]
    pub sensitivity_change: f64,
}

fn default_sensitivity_change() -> f64 { 1.0 }

impl FinancialAssumptions {
    /// Discount rate as a decimal
    pub fn discount_rate(&self) -> f64 {
        self.discount_rate / 100.0
    }

    /// Sensitivity delta as a decimal
    pub fn sensitivity_delta(&self) -> f64 {
        self.sensitivity_change / 100.0
    }

    /// Salary assumptions shifted by `delta_pp` percentage points
    pub fn salary_increase(&self, delta_pp: f64) -> SalaryIncreaseAssumptions {
        SalaryIncreaseAssumptions::from_percentages(
            self.salary_increase_rates,
            self.long_term_salary_increase_rate,
            delta_pp,
        )
    }
}
