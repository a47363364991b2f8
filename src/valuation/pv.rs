//! Present value of decrement benefits for a single employee
//!
//! For death, withdrawal and ill-health the engine walks every future year of
//! service up to retirement. In year `t` the employee has `ps + 0.5 + t` years
//! of service at the assumed mid-year exit; the benefit paid is
//!
//! ```text
//! min(rounded service, cap) * pay * sif * hs * factor
//! ```
//!
//! weighted by the probability of exiting by that cause in that year and
//! discounted to the middle of the year. Normal retirement is valued once, at
//! the retirement age.

use serde::{Deserialize, Serialize};

use super::discount::Discounting;
use super::results::{CauseResult, YearResult};
use crate::assumptions::{benefit_factor, salary_factors, BenefitBand, Cause, SalaryIncreaseAssumptions, ServiceRule};
use crate::census::EmployeeRecord;
use crate::decrement::DecrementTable;

/// How each year's present value is attributed to AL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccrualMode {
    /// AL takes the past-service share of each year's value
    #[default]
    Prorated,
    /// AL takes the value per year of service, and nothing for years beyond the cap.
    /// No normal cost is accrued in this mode.
    Unprorated,
}

/// Everything except the employee that a present value depends on
#[derive(Debug, Clone, Copy)]
pub struct PvInputs<'a> {
    /// Annual discount rate as a decimal
    pub discount_rate: f64,
    pub salary: &'a SalaryIncreaseAssumptions,
    pub table: &'a DecrementTable,
    pub service: ServiceRule,
    pub months_to_salary_increase: u32,
    pub retirement_age: u32,
    pub bands: &'a [BenefitBand],
    pub accrual: AccrualMode,
}

impl PvInputs<'_> {
    /// Present value of the benefit paid on exit at `service` years in future year `t`
    fn benefit_pv(&self, employee: &EmployeeRecord, cause: Cause, t: u32, service: f64, discount: f64) -> f64 {
        let factors = salary_factors(self.months_to_salary_increase, t, self.salary);
        let rounded = self.service.rounding.apply(service);
        let factor = benefit_factor(self.bands, service, cause);
        let probability = self.table.exit_probability(employee.age, employee.age + t, cause);

        let projected = rounded.min(self.service.cap) * employee.pay * factors.sif * factors.hs * factor;
        projected * probability * discount
    }

    /// Add one year's value to AL and NC
    fn accrue(&self, result: &mut CauseResult, past_service: f64, service: f64, pv: f64) {
        let cap = self.service.cap;
        let divisor = service.min(cap).max(1.0);

        match self.accrual {
            AccrualMode::Prorated => {
                result.al += pv * past_service.min(cap) / divisor;
                result.nc += pv / divisor;
            }
            AccrualMode::Unprorated => {
                if service <= cap {
                    result.al += pv / service.max(1.0);
                }
            }
        }
    }
}

/// AL, NC and yearly expected benefits for one employee and one cause
pub fn present_value_by_cause(employee: &EmployeeRecord, inputs: &PvInputs<'_>, cause: Cause) -> CauseResult {
    if cause == Cause::Retirement {
        return present_value_at_retirement(employee, inputs);
    }

    let discounting = Discounting::new(inputs.discount_rate);
    let years = inputs.retirement_age.saturating_sub(employee.age);
    let mut result = CauseResult {
        results: Vec::with_capacity(years as usize),
        ..CauseResult::default()
    };

    for t in 0..years {
        let service = employee.past_service + 0.5 + t as f64;
        let pv = inputs.benefit_pv(employee, cause, t, service, discounting.mid_year(t));

        inputs.accrue(&mut result, employee.past_service, service, pv);
        result.results.push(YearResult {
            year: t,
            expected_benefit: pv,
            future_service: None,
        });
    }

    result
}

/// Present value of the normal retirement benefit
///
/// Valued once at `t = retirement_age - age` with service `ps + t`. Employees
/// already past retirement age have no retirement benefit to value.
pub fn present_value_at_retirement(employee: &EmployeeRecord, inputs: &PvInputs<'_>) -> CauseResult {
    let Some(t) = inputs.retirement_age.checked_sub(employee.age) else {
        return CauseResult::default();
    };

    let discounting = Discounting::new(inputs.discount_rate);
    let service = employee.past_service + t as f64;
    let pv = inputs.benefit_pv(employee, Cause::Retirement, t, service, discounting.mid_year(t));

    let mut result = CauseResult::default();
    inputs.accrue(&mut result, employee.past_service, service, pv);
    result.results.push(YearResult {
        year: 0,
        expected_benefit: pv,
        future_service: Some(t),
    });
    result
}
