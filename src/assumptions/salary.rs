//! Salary increase assumptions and projection factors
//!
//! Five near-term annual increase rates are followed by a long-term rate.
//! The projected salary for future year `t` is `pay * sif * hs`, where `sif`
//! compounds the increases already granted and `hs` is a half-step for an
//! increase that lands in the middle of the year.
//!
//! When the increase is granted relative to the valuation date decides which
//! increases have been granted by year `t`:
//!
//! | months to increase | increases granted by year `t` | `hs`                  |
//! |--------------------|-------------------------------|-----------------------|
//! | `< 6`              | `t + 1`                       | 1                     |
//! | `== 6`             | `t`                           | `sqrt(1 + rate(t))`   |
//! | `> 6`              | `t`                           | 1                     |
//!
//! where `rate(k)` is `si(k+1)` for `k < 5` and the long-term rate afterwards.

use serde::{Deserialize, Serialize};

/// Number of explicitly assumed near-term increase years
pub const NEAR_TERM_YEARS: usize = 5;

/// Annual salary increase rates as decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryIncreaseAssumptions {
    /// si1..si5
    pub near_term: [f64; NEAR_TERM_YEARS],

    /// SI, applied from the sixth year onward
    pub long_term: f64,
}

impl SalaryIncreaseAssumptions {
    pub fn new(near_term: [f64; NEAR_TERM_YEARS], long_term: f64) -> Self {
        Self { near_term, long_term }
    }

    /// Build from rates stored as percentages, shifted by `delta_pp` percentage points
    pub fn from_percentages(near_term: [f64; NEAR_TERM_YEARS], long_term: f64, delta_pp: f64) -> Self {
        Self {
            near_term: near_term.map(|p| (p + delta_pp) / 100.0),
            long_term: (long_term + delta_pp) / 100.0,
        }
    }

    /// Same rate for every year
    pub fn flat(rate: f64) -> Self {
        Self::new([rate; NEAR_TERM_YEARS], rate)
    }

    /// Increase granted in year `k` (0-based)
    pub fn rate(&self, k: u32) -> f64 {
        self.near_term
            .get(k as usize)
            .copied()
            .unwrap_or(self.long_term)
    }

    /// Cumulative growth after `granted` increases
    fn compounded(&self, granted: u32) -> f64 {
        let near = (granted as usize).min(NEAR_TERM_YEARS);
        let near_growth: f64 = self.near_term[..near].iter().map(|r| 1.0 + r).product();
        let long_years = granted - near as u32;
        near_growth * (1.0 + self.long_term).powi(long_years as i32)
    }
}

/// Timing of the annual increase relative to the valuation date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryTiming {
    /// Increase falls within the first half of the year
    Early,
    /// Increase falls exactly at mid-year
    MidYear,
    /// Increase falls in the second half of the year
    Late,
}

impl SalaryTiming {
    pub fn from_months(months_to_increase: u32) -> Self {
        match months_to_increase {
            0..=5 => SalaryTiming::Early,
            6 => SalaryTiming::MidYear,
            _ => SalaryTiming::Late,
        }
    }

    /// Increases granted before the mid-point of future year `t`
    fn granted_by(self, t: u32) -> u32 {
        match self {
            SalaryTiming::Early => t + 1,
            SalaryTiming::MidYear | SalaryTiming::Late => t,
        }
    }
}

/// Salary projection factors for one future year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryFactors {
    /// Cumulative salary index factor
    pub sif: f64,
    /// Half-step adjustment for a mid-year increase
    pub hs: f64,
}

/// Salary index and half-step factors for future year `year_offset`
pub fn salary_factors(
    months_to_salary_increase: u32,
    year_offset: u32,
    salary: &SalaryIncreaseAssumptions,
) -> SalaryFactors {
    let timing = SalaryTiming::from_months(months_to_salary_increase);
    let sif = salary.compounded(timing.granted_by(year_offset));
    let hs = match timing {
        SalaryTiming::MidYear => (1.0 + salary.rate(year_offset)).sqrt(),
        SalaryTiming::Early | SalaryTiming::Late => 1.0,
    };
    SalaryFactors { sif, hs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stepped() -> SalaryIncreaseAssumptions {
        SalaryIncreaseAssumptions::new([0.10, 0.09, 0.08, 0.07, 0.06], 0.05)
    }

    #[test]
    fn test_from_percentages_with_delta() {
        let s = SalaryIncreaseAssumptions::from_percentages([10.0, 9.0, 8.0, 7.0, 6.0], 5.0, 0.5);
        assert_relative_eq!(s.near_term[0], 0.105, max_relative = 1e-12);
        assert_relative_eq!(s.near_term[4], 0.065, max_relative = 1e-12);
        assert_relative_eq!(s.long_term, 0.055, max_relative = 1e-12);
    }

    #[test]
    fn test_mid_year_first_year_boundary() {
        let s = stepped();
        let f = salary_factors(6, 0, &s);
        assert_eq!(f.sif, 1.0);
        assert_eq!(f.hs, (1.0_f64 + 0.10).sqrt());
    }

    #[test]
    fn test_early_regime() {
        let s = stepped();
        assert_relative_eq!(salary_factors(3, 0, &s).sif, 1.10, max_relative = 1e-12);
        assert_relative_eq!(salary_factors(3, 4, &s).sif, 1.10 * 1.09 * 1.08 * 1.07 * 1.06, max_relative = 1e-12);
        let year5 = salary_factors(0, 5, &s);
        assert_relative_eq!(year5.sif, 1.10 * 1.09 * 1.08 * 1.07 * 1.06 * 1.05, max_relative = 1e-12);
        assert_eq!(year5.hs, 1.0);
        assert_relative_eq!(
            salary_factors(5, 8, &s).sif,
            1.10 * 1.09 * 1.08 * 1.07 * 1.06 * 1.05_f64.powi(4),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_mid_year_regime() {
        let s = stepped();
        let f4 = salary_factors(6, 4, &s);
        assert_relative_eq!(f4.sif, 1.10 * 1.09 * 1.08 * 1.07, max_relative = 1e-12);
        assert_relative_eq!(f4.hs, 1.06_f64.sqrt(), max_relative = 1e-12);

        let f5 = salary_factors(6, 5, &s);
        assert_relative_eq!(f5.sif, 1.10 * 1.09 * 1.08 * 1.07 * 1.06, max_relative = 1e-12);
        assert_relative_eq!(f5.hs, 1.05_f64.sqrt(), max_relative = 1e-12);

        let f7 = salary_factors(6, 7, &s);
        assert_relative_eq!(f7.sif, 1.10 * 1.09 * 1.08 * 1.07 * 1.06 * 1.05_f64.powi(2), max_relative = 1e-12);
        assert_relative_eq!(f7.hs, 1.05_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_late_regime_lags_early_by_one_year() {
        let s = stepped();
        assert_eq!(salary_factors(12, 0, &s).sif, 1.0);
        for t in 1..12 {
            let late = salary_factors(12, t, &s);
            let early = salary_factors(1, t - 1, &s);
            assert_relative_eq!(late.sif, early.sif, max_relative = 1e-12);
            assert_eq!(late.hs, 1.0);
        }
    }

    #[test]
    fn test_timing_cutoffs() {
        assert_eq!(SalaryTiming::from_months(5), SalaryTiming::Early);
        assert_eq!(SalaryTiming::from_months(6), SalaryTiming::MidYear);
        assert_eq!(SalaryTiming::from_months(7), SalaryTiming::Late);
    }
}
