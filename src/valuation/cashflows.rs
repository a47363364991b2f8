//! Expected benefit payments by future year

use super::results::EmployeeValuation;
use crate::assumptions::Cause;

/// Plan-level expected benefit payments, indexed by future year
///
/// Year `t` sums every employee's base-scenario expected benefit for `t`
/// across all causes. Projection stops at the first year in which no employee
/// has a row for any cause. A cause sequence with an internal gap would
/// therefore end the schedule early.
pub fn project_cash_flows(valuations: &[EmployeeValuation]) -> Vec<f64> {
    let mut payments = Vec::new();

    for t in 0u32.. {
        let mut contributors = 0usize;
        let mut total = 0.0;

        for valuation in valuations {
            for cause in Cause::ALL {
                if let Some(amount) = valuation.base.get(cause).expected_benefit_at(t) {
                    contributors += 1;
                    total += amount;
                }
            }
        }

        if contributors == 0 {
            break;
        }
        payments.push(total);
    }

    payments
}
