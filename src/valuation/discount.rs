//! Annual discounting for decrement present values
//!
//! Exits other than normal retirement are assumed to happen mid-year, so a
//! payment in future year `t` is discounted by `v^t` and a further half year.

use serde::{Deserialize, Serialize};

/// Discounting at a single annual rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discounting {
    /// Annual discount rate as a decimal
    pub annual_rate: f64,
}

impl Discounting {
    pub fn new(annual_rate: f64) -> Self {
        Self { annual_rate }
    }

    /// `v^t = (1 + i)^-t`
    pub fn v(&self, years: u32) -> f64 {
        (1.0 + self.annual_rate).powi(-(years as i32))
    }

    /// Half-year adjustment `(1 + i)^-0.5`
    pub fn half_year(&self) -> f64 {
        (1.0 + self.annual_rate).powf(-0.5)
    }

    /// Discount factor to the middle of future year `t`
    pub fn mid_year(&self, years: u32) -> f64 {
        self.v(years) * self.half_year()
    }
}
