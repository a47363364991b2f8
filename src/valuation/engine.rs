//! Roster valuation across every sensitivity scenario

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;

use super::cashflows::project_cash_flows;
use super::pv::{present_value_by_cause, AccrualMode, PvInputs};
use super::results::{CauseResults, EmployeeValuation};
use crate::assumptions::{Assumptions, Cause, RateReferencePolicy, RateTableSet, SalaryIncreaseAssumptions, ServiceRule};
use crate::census::EmployeeRecord;
use crate::decrement::{build_from_rates, DecrementTable};
use crate::error::ValuationError;
use crate::progress::{ProgressSink, ProgressStage, ProgressUpdate};
use crate::report::{aggregate, LiabilityReport};
use crate::scenario::Scenario;

/// Engine options
#[derive(Debug, Clone)]
pub struct ValuationConfig {
    pub accrual: AccrualMode,
    pub rate_reference_policy: RateReferencePolicy,
    /// Value employees on the rayon thread pool
    pub parallel: bool,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            accrual: AccrualMode::Prorated,
            rate_reference_policy: RateReferencePolicy::Strict,
            parallel: true,
        }
    }
}

/// Assumptions for one scenario, fully prepared
#[derive(Debug, Clone)]
struct ScenarioBasis {
    scenario: Scenario,
    discount_rate: f64,
    salary: SalaryIncreaseAssumptions,
    table: DecrementTable,
}

/// Output of a completed valuation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationOutcome {
    pub employees: Vec<EmployeeValuation>,
    pub liability_report: LiabilityReport,
    pub expected_benefit_payments: Vec<f64>,
}

pub struct ValuationEngine {
    assumptions: Assumptions,
    rates: RateTableSet,
    config: ValuationConfig,
}

impl ValuationEngine {
    pub fn new(assumptions: Assumptions, rates: RateTableSet, config: ValuationConfig) -> Self {
        Self { assumptions, rates, config }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Value a roster, reporting milestones to `sink` under `job_id`
    ///
    /// Either every employee is valued or the run fails as a whole.
    pub fn run(
        &self,
        job_id: &str,
        roster: &[EmployeeRecord],
        sink: &dyn ProgressSink,
    ) -> Result<ValuationOutcome, ValuationError> {
        sink.notify(ProgressUpdate::new(job_id, ProgressStage::Initialization, "Valuation started"));

        match self.run_stages(job_id, roster, sink) {
            Ok(outcome) => {
                sink.notify(
                    ProgressUpdate::new(job_id, ProgressStage::Completed, "Valuation completed")
                        .with_counts(roster.len(), roster.len()),
                );
                Ok(outcome)
            }
            Err(err) => {
                sink.notify(ProgressUpdate::new(job_id, ProgressStage::Error, err.to_string()));
                Err(err)
            }
        }
    }

    fn run_stages(
        &self,
        job_id: &str,
        roster: &[EmployeeRecord],
        sink: &dyn ProgressSink,
    ) -> Result<ValuationOutcome, ValuationError> {
        if roster.is_empty() {
            return Err(ValuationError::MissingEmployeeData);
        }
        let total = roster.len();

        sink.notify(
            ProgressUpdate::new(job_id, ProgressStage::DataPreparation, "Building decrement tables")
                .with_counts(0, total),
        );
        let bases = self.prepare_scenarios()?;
        let rules = self.service_rules()?;

        sink.notify(
            ProgressUpdate::new(job_id, ProgressStage::CalculationStart, "Valuing employees").with_counts(0, total),
        );
        let processed = AtomicUsize::new(0);
        let midpoint = total.div_ceil(2);
        let value_one = |employee: &EmployeeRecord| {
            let valuation = self.value_employee(employee, &bases, &rules);
            if processed.fetch_add(1, Ordering::Relaxed) + 1 == midpoint {
                sink.notify(
                    ProgressUpdate::new(job_id, ProgressStage::CalculationMidpoint, "Half of the roster valued")
                        .with_counts(midpoint, total),
                );
            }
            valuation
        };

        let employees: Vec<EmployeeValuation> = if self.config.parallel {
            roster.par_iter().map(value_one).collect()
        } else {
            roster.iter().map(value_one).collect()
        };

        sink.notify(
            ProgressUpdate::new(job_id, ProgressStage::Finalization, "Aggregating liabilities")
                .with_counts(total, total),
        );
        let financial = &self.assumptions.financial;
        let liability_report = aggregate(&employees, financial.discount_rate(), financial.sensitivity_change);
        let expected_benefit_payments = project_cash_flows(&employees);

        Ok(ValuationOutcome {
            employees,
            liability_report,
            expected_benefit_payments,
        })
    }

    /// Discount rate, salary scale and decrement table for every scenario
    fn prepare_scenarios(&self) -> Result<Vec<ScenarioBasis>, ValuationError> {
        let demographic = &self.assumptions.demographic;
        let financial = &self.assumptions.financial;
        let rates = demographic.resolve_rates(&self.rates, self.config.rate_reference_policy)?;
        let base_table = build_from_rates(demographic, &rates, Scenario::Base.decrement_adjustment())?;

        Scenario::ALL
            .iter()
            .map(|&scenario| {
                let table = if scenario.has_own_table() {
                    build_from_rates(demographic, &rates, scenario.decrement_adjustment())?
                } else {
                    base_table.clone()
                };
                Ok(ScenarioBasis {
                    scenario,
                    discount_rate: financial.discount_rate()
                        + scenario.discount_direction() * financial.sensitivity_delta(),
                    salary: financial.salary_increase(scenario.salary_direction() * financial.sensitivity_change),
                    table,
                })
            })
            .collect()
    }

    fn service_rules(&self) -> Result<[ServiceRule; 4], ValuationError> {
        let benefits = &self.assumptions.benefits;
        Ok([
            benefits.service_rule(Cause::ALL[0])?,
            benefits.service_rule(Cause::ALL[1])?,
            benefits.service_rule(Cause::ALL[2])?,
            benefits.service_rule(Cause::ALL[3])?,
        ])
    }

    fn value_employee(
        &self,
        employee: &EmployeeRecord,
        bases: &[ScenarioBasis],
        rules: &[ServiceRule; 4],
    ) -> EmployeeValuation {
        let scenarios = bases
            .iter()
            .map(|basis| {
                let mut results = CauseResults::default();
                for (cause, rule) in Cause::ALL.iter().zip(rules) {
                    let inputs = PvInputs {
                        discount_rate: basis.discount_rate,
                        salary: &basis.salary,
                        table: &basis.table,
                        service: *rule,
                        months_to_salary_increase: self.assumptions.financial.month_of_salary_increase,
                        retirement_age: self.assumptions.demographic.retirement_age,
                        bands: self.assumptions.benefits.bands(),
                        accrual: self.config.accrual,
                    };
                    *results.get_mut(*cause) = present_value_by_cause(employee, &inputs, *cause);
                }
                log::trace!("{:?}: employee age {} AL {:.2}", basis.scenario, employee.age, results.total_al());
                results
            })
            .collect();

        EmployeeValuation::new(employee.clone(), scenarios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{
        BenefitBand, BenefitStructure, DemographicAssumptions, FinancialAssumptions, RateTable, RateType,
        ServiceRounding,
    };
    use crate::progress::RecordingProgress;
    use approx::assert_relative_eq;

    fn assumptions() -> Assumptions {
        Assumptions {
            demographic: DemographicAssumptions {
                mortality_rate: "mort".into(),
                withdrawal_rate: "wd".into(),
                ill_health_rate: "ih".into(),
                mortality_age_set_back: 0,
                retirement_age: 60,
            },
            financial: FinancialAssumptions {
                discount_rate: 8.0,
                salary_increase_rates: [5.0; 5],
                long_term_salary_increase_rate: 5.0,
                month_of_salary_increase: 12,
                sensitivity_change: 1.0,
            },
            benefits: BenefitStructure::uniform(
                ServiceRule::new(ServiceRounding::Floor, 30.0),
                vec![BenefitBand::uniform(0.0, 100.0, 1.0)],
            ),
        }
    }

    fn rates() -> RateTableSet {
        let mut set = RateTableSet::new();
        set.insert(
            "mort",
            RateTable::new(0, (0..=110).map(|a| 0.0005 + a as f64 * 0.0001).collect(), RateType::Mortality),
        );
        set.insert("wd", RateTable::new(18, vec![0.04; 42], RateType::Withdrawal));
        set.insert("ih", RateTable::new(18, vec![0.002; 42], RateType::IllHealth));
        set
    }

    fn roster() -> Vec<EmployeeRecord> {
        vec![
            EmployeeRecord::new(40, 10.0, 50_000.0),
            EmployeeRecord::new(30, 3.0, 30_000.0),
            EmployeeRecord::new(55, 25.0, 80_000.0),
        ]
    }

    #[test]
    fn test_run_reports_all_milestones() {
        let engine = ValuationEngine::new(assumptions(), rates(), ValuationConfig::default());
        let sink = RecordingProgress::new();
        let outcome = engine.run("job-7", &roster(), &sink).unwrap();

        assert_eq!(
            sink.stages(),
            vec![
                ProgressStage::Initialization,
                ProgressStage::DataPreparation,
                ProgressStage::CalculationStart,
                ProgressStage::CalculationMidpoint,
                ProgressStage::Finalization,
                ProgressStage::Completed,
            ]
        );
        assert!(sink.updates().iter().all(|u| u.job_id == "job-7"));
        assert_eq!(outcome.employees.len(), 3);
    }

    #[test]
    fn test_sensitivities_move_liability_in_expected_direction() {
        let engine = ValuationEngine::new(assumptions(), rates(), ValuationConfig::default());
        let outcome = engine.run("job", &roster(), &crate::progress::NoProgress).unwrap();
        let report = &outcome.liability_report;

        let base = report.total(Scenario::Base);
        assert!(base > 0.0);
        assert!(report.total(Scenario::DiscountRateUp) < base);
        assert!(report.total(Scenario::DiscountRateDown) > base);
        assert!(report.total(Scenario::SalaryIncreaseUp) > base);
        assert!(report.total(Scenario::SalaryIncreaseDown) < base);
        assert!(report.duration > 0.0);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let parallel = ValuationEngine::new(assumptions(), rates(), ValuationConfig::default());
        let sequential = ValuationEngine::new(
            assumptions(),
            rates(),
            ValuationConfig { parallel: false, ..ValuationConfig::default() },
        );
        let a = parallel.run("a", &roster(), &crate::progress::NoProgress).unwrap();
        let b = sequential.run("b", &roster(), &crate::progress::NoProgress).unwrap();

        assert_eq!(a.employees, b.employees);
        assert_relative_eq!(
            a.liability_report.total(Scenario::Base),
            b.liability_report.total(Scenario::Base)
        );
        assert_eq!(a.expected_benefit_payments, b.expected_benefit_payments);
    }

    #[test]
    fn test_cash_flow_horizon_follows_youngest_employee() {
        let engine = ValuationEngine::new(assumptions(), rates(), ValuationConfig::default());
        let outcome = engine.run("job", &roster(), &crate::progress::NoProgress).unwrap();
        // age 30 retires in 30 years; retirement paid at t = 30
        assert_eq!(outcome.expected_benefit_payments.len(), 31);
        assert!(outcome.expected_benefit_payments.iter().all(|p| *p > 0.0));
    }

    #[test]
    fn test_empty_roster_fails_with_error_stage() {
        let engine = ValuationEngine::new(assumptions(), rates(), ValuationConfig::default());
        let sink = RecordingProgress::new();
        let err = engine.run("job", &[], &sink).unwrap_err();
        assert!(matches!(err, ValuationError::MissingEmployeeData));
        assert_eq!(sink.stages(), vec![ProgressStage::Initialization, ProgressStage::Error]);
    }

    #[test]
    fn test_missing_rate_table() {
        let full = rates();
        let mut set = RateTableSet::new();
        for id in ["mort", "wd"] {
            set.insert(id, full.get(id).cloned().unwrap());
        }

        let strict = ValuationEngine::new(assumptions(), set.clone(), ValuationConfig::default());
        assert!(matches!(
            strict.run("job", &roster(), &crate::progress::NoProgress),
            Err(ValuationError::InvalidRateReference { .. })
        ));

        let lenient = ValuationEngine::new(
            assumptions(),
            set,
            ValuationConfig { rate_reference_policy: RateReferencePolicy::ZeroFill, ..ValuationConfig::default() },
        );
        let outcome = lenient.run("job", &roster(), &crate::progress::NoProgress).unwrap();
        assert_eq!(outcome.employees[0].base.ill_health.al, 0.0);
    }
}
