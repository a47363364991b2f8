//! Liability report across the roster and duration

use serde::{Deserialize, Serialize};

use crate::assumptions::Cause;
use crate::scenario::Scenario;
use crate::valuation::{CauseResult, CauseResults, EmployeeValuation};

/// Amounts split by cause of exit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseTotals {
    pub death: f64,
    #[serde(rename = "withdrawl", alias = "withdrawal")]
    pub withdrawal: f64,
    pub ill_health: f64,
    pub retirement: f64,
}

impl CauseTotals {
    pub fn total(&self) -> f64 {
        self.death + self.withdrawal + self.ill_health + self.retirement
    }

    fn add(&mut self, cause: Cause, amount: f64) {
        match cause {
            Cause::Death => self.death += amount,
            Cause::Withdrawal => self.withdrawal += amount,
            Cause::IllHealth => self.ill_health += amount,
            Cause::Retirement => self.retirement += amount,
        }
    }

    fn add_results(&mut self, results: &CauseResults, pick: impl Fn(&CauseResult) -> f64) {
        for cause in Cause::ALL {
            self.add(cause, pick(results.get(cause)));
        }
    }
}

/// Roster liability under one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioLiability {
    pub scenario: Scenario,

    /// Accrued liability by cause
    pub accrued: CauseTotals,

    /// Sum of the cause subtotals
    pub total: f64,

    /// Normal cost by cause, base scenario only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_cost: Option<CauseTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityReport {
    pub scenarios: Vec<ScenarioLiability>,
    pub duration: f64,
}

impl LiabilityReport {
    pub fn scenario(&self, scenario: Scenario) -> Option<&ScenarioLiability> {
        self.scenarios.iter().find(|s| s.scenario == scenario)
    }

    /// Total AL under `scenario`, zero if absent
    pub fn total(&self, scenario: Scenario) -> f64 {
        self.scenario(scenario).map(|s| s.total).unwrap_or(0.0)
    }
}

/// Centred-difference duration of the liability with respect to the discount rate
///
/// `rate` and `delta` are decimals. A zero `delta` or zero base liability is a
/// caller error and yields a non-finite result.
pub fn duration(al_up: f64, al_down: f64, al_base: f64, rate: f64, delta: f64) -> f64 {
    -(al_up - al_down) / (al_base * ((rate + delta) - (rate - delta)))
}

/// Sum per-employee results into a liability report
///
/// `base_discount_rate` is a decimal; `sensitivity_delta_percent` is in
/// percentage points.
pub fn aggregate(
    valuations: &[EmployeeValuation],
    base_discount_rate: f64,
    sensitivity_delta_percent: f64,
) -> LiabilityReport {
    let mut normal_cost = CauseTotals::default();
    let scenarios: Vec<ScenarioLiability> = Scenario::ALL
        .iter()
        .map(|&scenario| {
            let accrued = valuations
                .iter()
                .filter_map(|v| v.scenario(scenario))
                .fold(CauseTotals::default(), |mut totals, results| {
                    totals.add_results(results, |r| r.al);
                    totals
                });
            ScenarioLiability {
                scenario,
                accrued,
                total: accrued.total(),
                normal_cost: None,
            }
        })
        .collect();

    for results in valuations.iter().filter_map(|v| v.scenario(Scenario::Base)) {
        normal_cost.add_results(results, |r| r.nc);
    }

    let mut report = LiabilityReport { scenarios, duration: 0.0 };
    if let Some(base) = report.scenarios.iter_mut().find(|s| s.scenario == Scenario::Base) {
        base.normal_cost = Some(normal_cost);
    }
    report.duration = duration(
        report.total(Scenario::DiscountRateUp),
        report.total(Scenario::DiscountRateDown),
        report.total(Scenario::Base),
        base_discount_rate,
        sensitivity_delta_percent / 100.0,
    );

    log::info!(
        "Aggregated {} employees: base AL {:.2}, duration {:.4}",
        valuations.len(),
        report.total(Scenario::Base),
        report.duration
    );
    report
}
