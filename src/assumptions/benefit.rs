//! Benefit structure: service bands, benefit factors and service rules

use serde::{Deserialize, Serialize};

use crate::error::ValuationError;

/// Cause of exit from the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cause {
    Death,
    #[serde(alias = "withdrawl")]
    Withdrawal,
    IllHealth,
    Retirement,
}

impl Cause {
    pub const ALL: [Cause; 4] = [Cause::Death, Cause::Withdrawal, Cause::IllHealth, Cause::Retirement];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cause::Death => "death",
            Cause::Withdrawal => "withdrawal",
            Cause::IllHealth => "illHealth",
            Cause::Retirement => "retirement",
        }
    }
}

/// How total service is rounded before it enters the benefit formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceRounding {
    Exact,
    Nearest,
    Floor,
}

impl ServiceRounding {
    /// Map the stored code: 1 exact, 2 nearest, anything else floor
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ServiceRounding::Exact,
            2 => ServiceRounding::Nearest,
            _ => ServiceRounding::Floor,
        }
    }

    pub fn apply(&self, service: f64) -> f64 {
        match self {
            ServiceRounding::Exact => service,
            // halves round up for the non-negative service values seen here
            ServiceRounding::Nearest => (service + 0.5).floor(),
            ServiceRounding::Floor => service.floor(),
        }
    }
}

/// Rounding mode and service cap for one benefit type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceRule {
    pub rounding: ServiceRounding,
    pub cap: f64,
}

impl ServiceRule {
    pub fn new(rounding: ServiceRounding, cap: f64) -> Self {
        Self { rounding, cap }
    }
}

/// One row of the service-banded benefit schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitBand {
    pub from_service_years: f64,
    pub to_service_years: f64,
    pub death: f64,
    pub retirement: f64,
    #[serde(alias = "withdrawl")]
    pub withdrawal: f64,
    pub ill_health: f64,
    #[serde(default)]
    pub termination: f64,
}

impl BenefitBand {
    /// Band over `[from, to)` paying the same factor for every cause
    pub fn uniform(from: f64, to: f64, factor: f64) -> Self {
        Self {
            from_service_years: from,
            to_service_years: to,
            death: factor,
            retirement: factor,
            withdrawal: factor,
            ill_health: factor,
            termination: factor,
        }
    }

    pub fn contains(&self, service: f64) -> bool {
        service >= self.from_service_years && service < self.to_service_years
    }

    pub fn factor(&self, cause: Cause) -> f64 {
        match cause {
            Cause::Death => self.death,
            Cause::Withdrawal => self.withdrawal,
            Cause::IllHealth => self.ill_health,
            Cause::Retirement => self.retirement,
        }
    }
}

/// Benefit factor for `cause` at `service` years
///
/// Uses the first band whose `[from, to)` interval contains `service`, or the
/// last band when none does. An empty schedule pays nothing.
pub fn benefit_factor(bands: &[BenefitBand], service: f64, cause: Cause) -> f64 {
    bands
        .iter()
        .find(|band| band.contains(service))
        .or_else(|| bands.last())
        .map(|band| band.factor(cause))
        .unwrap_or(0.0)
}

/// Service-type entry as stored on the plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeEntry {
    pub benefit_type: Cause,
    /// Rounding mode code (1 exact, 2 nearest, other floor)
    #[serde(deserialize_with = "deserialize_service_code")]
    pub service_type: i64,
    pub service_cap: f64,
}

/// Codes arrive as integers, floats or numeric strings
#[derive(Deserialize)]
#[serde(untagged)]
enum ServiceCode {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Read a rounding code; anything that is not a whole number becomes 0 (floor)
fn deserialize_service_code<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let whole = |x: f64| if x.is_finite() && x.fract() == 0.0 { x as i64 } else { 0 };
    Ok(match ServiceCode::deserialize(deserializer)? {
        ServiceCode::Int(code) => code,
        ServiceCode::Float(code) => whole(code),
        ServiceCode::Text(text) => text.trim().parse::<f64>().map(whole).unwrap_or(0),
    })
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitStructure {
    #[serde(default)]
    pub service_type: Vec<ServiceTypeEntry>,
    #[serde(default)]
    pub benefit_structure: Vec<BenefitBand>,
}

impl BenefitStructure {
    /// Same service rule for every cause
    pub fn uniform(rule: ServiceRule, bands: Vec<BenefitBand>) -> Self {
        let code = match rule.rounding {
            ServiceRounding::Exact => 1,
            ServiceRounding::Nearest => 2,
            ServiceRounding::Floor => 3,
        };
        Self {
            service_type: Cause::ALL
                .iter()
                .map(|&cause| ServiceTypeEntry {
                    benefit_type: cause,
                    service_type: code,
                    service_cap: rule.cap,
                })
                .collect(),
            benefit_structure: bands,
        }
    }

    pub fn bands(&self) -> &[BenefitBand] {
        &self.benefit_structure
    }

    pub fn service_rule(&self, cause: Cause) -> Result<ServiceRule, ValuationError> {
        self.service_type
            .iter()
            .find(|entry| entry.benefit_type == cause)
            .map(|entry| ServiceRule::new(ServiceRounding::from_code(entry.service_type), entry.service_cap))
            .ok_or_else(|| {
                ValuationError::MissingAssumptions(format!("service type for {} benefit", cause.as_str()))
            })
    }

    pub fn validate(&self) -> Result<(), ValuationError> {
        if self.benefit_structure.is_empty() {
            return Err(ValuationError::MissingAssumptions("benefit structure bands".into()));
        }
        for cause in Cause::ALL {
            self.service_rule(cause)?;
        }
        Ok(())
    }
}
