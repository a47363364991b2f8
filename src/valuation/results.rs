//! Per-employee valuation outputs

use serde::{Deserialize, Serialize};

use crate::assumptions::Cause;
use crate::census::EmployeeRecord;
use crate::scenario::Scenario;

/// Expected benefit for one future year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    /// Future year index `t`
    pub year: u32,

    /// Present value of the expected benefit before service proration
    pub expected_benefit: f64,

    /// Years to retirement (retirement results only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_service: Option<u32>,
}

/// AL and NC for one employee and one cause
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CauseResult {
    #[serde(rename = "AL")]
    pub al: f64,

    #[serde(rename = "NC")]
    pub nc: f64,

    pub results: Vec<YearResult>,
}

impl CauseResult {
    /// Expected benefit paid in future year `t`, if this cause has a row for it
    pub fn expected_benefit_at(&self, t: u32) -> Option<f64> {
        self.results
            .iter()
            .find(|row| row.future_service.unwrap_or(row.year) == t)
            .map(|row| row.expected_benefit)
    }
}

/// Results for every cause under one scenario
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseResults {
    pub death: CauseResult,
    #[serde(rename = "withdrawl", alias = "withdrawal")]
    pub withdrawal: CauseResult,
    pub ill_health: CauseResult,
    pub retirement: CauseResult,
}

impl CauseResults {
    pub fn get(&self, cause: Cause) -> &CauseResult {
        match cause {
            Cause::Death => &self.death,
            Cause::Withdrawal => &self.withdrawal,
            Cause::IllHealth => &self.ill_health,
            Cause::Retirement => &self.retirement,
        }
    }

    pub fn get_mut(&mut self, cause: Cause) -> &mut CauseResult {
        match cause {
            Cause::Death => &mut self.death,
            Cause::Withdrawal => &mut self.withdrawal,
            Cause::IllHealth => &mut self.ill_health,
            Cause::Retirement => &mut self.retirement,
        }
    }

    pub fn total_al(&self) -> f64 {
        Cause::ALL.iter().map(|&c| self.get(c).al).sum()
    }
}

/// One employee valued under every scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeValuation {
    #[serde(flatten)]
    pub employee: EmployeeRecord,

    /// Results indexed in `Scenario::ALL` order
    #[serde(skip)]
    pub scenarios: Vec<CauseResults>,

    /// Base scenario results, as reported per employee
    #[serde(rename = "AL")]
    pub base: CauseResults,
}

impl EmployeeValuation {
    pub fn new(employee: EmployeeRecord, scenarios: Vec<CauseResults>) -> Self {
        let base = scenarios.get(Scenario::Base.index()).cloned().unwrap_or_default();
        Self { employee, scenarios, base }
    }

    /// Results for `scenario`, or None if it was not valued
    pub fn scenario(&self, scenario: Scenario) -> Option<&CauseResults> {
        self.scenarios.get(scenario.index())
    }
}
