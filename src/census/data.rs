//! Employee census records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValuationError;

const DAYS_PER_YEAR: f64 = 365.25;

/// Minimal inputs needed to value one active employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    /// Employee code from the roster, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Age in completed years at the valuation date
    pub age: u32,

    /// Past service in years (may be fractional)
    pub past_service: f64,

    /// Current pay
    pub pay: f64,
}

impl EmployeeRecord {
    pub fn new(age: u32, past_service: f64, pay: f64) -> Self {
        Self {
            code: None,
            age,
            past_service,
            pay,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Derive age and past service from dates of birth and appointment
    ///
    /// Age is in completed years. Past service is fractional, counted in days
    /// over 365.25.
    pub fn from_dates(
        valuation_date: NaiveDate,
        date_of_birth: NaiveDate,
        date_of_appointment: NaiveDate,
        pay: f64,
    ) -> Result<Self, ValuationError> {
        let age = valuation_date.years_since(date_of_birth).ok_or_else(|| ValuationError::InvalidEmployee {
            row: 0,
            reason: format!("date of birth {} is after valuation date {}", date_of_birth, valuation_date),
        })?;
        if date_of_appointment > valuation_date {
            return Err(ValuationError::InvalidEmployee {
                row: 0,
                reason: format!(
                    "date of appointment {} is after valuation date {}",
                    date_of_appointment, valuation_date
                ),
            });
        }
        let days = (valuation_date - date_of_appointment).num_days() as f64;

        Ok(Self::new(age, days / DAYS_PER_YEAR, pay))
    }
}
