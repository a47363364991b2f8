//! Multiple-decrement service table
//!
//! One entry per integer age from the minimum joining age to the retirement
//! age inclusive. Survivors start at a fixed radix and are reduced each year
//! by deaths, withdrawals, ill-health retirements and, at the final age,
//! normal retirement.

use serde::{Deserialize, Serialize};

use crate::assumptions::{Cause, DecrementRates, DemographicAssumptions, RateTable, MIN_JOINING_AGE};
use crate::error::ValuationError;

/// Survivors entering the minimum joining age
pub const RADIX: f64 = 1_000_000.0;

/// Sensitivity adjustments applied while building a table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecrementAdjustment {
    /// Years added to the mortality lookup age on top of the plan setback
    pub mortality_setback_delta: i32,
    /// Percent change applied multiplicatively to withdrawal rates
    pub withdrawal_change_percent: f64,
}

impl DecrementAdjustment {
    pub fn mortality_setback(delta: i32) -> Self {
        Self { mortality_setback_delta: delta, ..Self::default() }
    }

    pub fn withdrawal_change(percent: f64) -> Self {
        Self { withdrawal_change_percent: percent, ..Self::default() }
    }
}

/// One age of the service table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecrementTableEntry {
    pub age: u32,
    /// Probability of death
    pub qd: f64,
    /// Probability of withdrawal
    pub qw: f64,
    /// Probability of ill-health retirement
    pub qi: f64,
    /// Probability of normal retirement
    pub qr: f64,
    /// Survivors entering the age
    pub lx: f64,
    /// Average lives exposed during the year
    pub ll: f64,
    pub dd: f64,
    pub dw: f64,
    pub di: f64,
    pub dr: f64,
}

impl DecrementTableEntry {
    pub fn total_decrements(&self) -> f64 {
        self.dd + self.dw + self.di + self.dr
    }

    /// Number of exits from `cause` during the year
    pub fn decrements(&self, cause: Cause) -> f64 {
        match cause {
            Cause::Death => self.dd,
            Cause::Withdrawal => self.dw,
            Cause::IllHealth => self.di,
            Cause::Retirement => self.dr,
        }
    }
}

/// Contiguous, age-ordered service table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecrementTable {
    entries: Vec<DecrementTableEntry>,
}

impl DecrementTable {
    pub fn entries(&self) -> &[DecrementTableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `age`, or None outside the table
    pub fn entry(&self, age: u32) -> Option<&DecrementTableEntry> {
        let offset = age.checked_sub(MIN_JOINING_AGE)?;
        self.entries.get(offset as usize)
    }

    /// Survivors entering `age`, 0.0 outside the table
    pub fn lx(&self, age: u32) -> f64 {
        self.entry(age).map(|e| e.lx).unwrap_or(0.0)
    }

    /// Probability that a life aged `from_age` exits by `cause` during the year of age `at_age`
    ///
    /// Zero when either age falls outside the table or no lives remain at `from_age`.
    pub fn exit_probability(&self, from_age: u32, at_age: u32, cause: Cause) -> f64 {
        let (Some(start), Some(at)) = (self.entry(from_age), self.entry(at_age)) else {
            return 0.0;
        };
        if start.lx <= 0.0 {
            return 0.0;
        }
        at.decrements(cause) / start.lx
    }
}

fn round5(x: f64) -> f64 {
    (x * 100_000.0).round() / 100_000.0
}

/// Build the service table for a set of demographic assumptions
pub fn build_decrement_table(
    demographic: &DemographicAssumptions,
    mortality: &RateTable,
    withdrawal: &RateTable,
    ill_health: &RateTable,
    adjustment: DecrementAdjustment,
) -> Result<DecrementTable, ValuationError> {
    demographic.validate()?;
    let retirement_age = demographic.retirement_age;
    let setback = demographic.mortality_age_set_back as i64 + adjustment.mortality_setback_delta as i64;
    let withdrawal_scale = 1.0 + adjustment.withdrawal_change_percent / 100.0;

    let mut entries = Vec::with_capacity((retirement_age - MIN_JOINING_AGE + 1) as usize);
    let mut lx = RADIX;

    for age in MIN_JOINING_AGE..=retirement_age {
        let (qd, qw, qi, qr) = if age == retirement_age {
            (0.0, 0.0, 0.0, 1.0)
        } else {
            (
                round5(mortality.rate_at(age as i64 + setback)),
                withdrawal.rate_at(age as i64) * withdrawal_scale,
                ill_health.rate_at(age as i64),
                0.0,
            )
        };

        let dd = lx * qd;
        let dw = lx * qw;
        let di = lx * qi;
        let dr = lx * qr;
        let total = dd + dw + di + dr;

        entries.push(DecrementTableEntry {
            age,
            qd,
            qw,
            qi,
            qr,
            lx,
            ll: lx - total / 2.0,
            dd,
            dw,
            di,
            dr,
        });

        lx -= total;
    }

    log::debug!(
        "Built decrement table ages {}..={} (setback {:+}, withdrawal {:+}%)",
        MIN_JOINING_AGE,
        retirement_age,
        setback,
        adjustment.withdrawal_change_percent
    );

    Ok(DecrementTable { entries })
}

/// Build the table from already-resolved rate tables
pub fn build_from_rates(
    demographic: &DemographicAssumptions,
    rates: &DecrementRates,
    adjustment: DecrementAdjustment,
) -> Result<DecrementTable, ValuationError> {
    build_decrement_table(demographic, &rates.mortality, &rates.withdrawal, &rates.ill_health, adjustment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::RateType;
    use approx::assert_relative_eq;

    fn demographic() -> DemographicAssumptions {
        DemographicAssumptions {
            mortality_rate: "m".into(),
            withdrawal_rate: "w".into(),
            ill_health_rate: "i".into(),
            mortality_age_set_back: 0,
            retirement_age: 60,
        }
    }

    fn mortality() -> RateTable {
        // rises with age so that a setback changes the looked-up rate
        let value = (0..=110).map(|age| 0.0005 + age as f64 * 0.000_123_456).collect();
        RateTable::new(0, value, RateType::Mortality)
    }

    fn withdrawal() -> RateTable {
        RateTable::new(18, (0..42).map(|i| 0.08 - i as f64 * 0.001).collect(), RateType::Withdrawal)
    }

    fn ill_health() -> RateTable {
        RateTable::new(18, vec![0.001; 42], RateType::IllHealth)
    }

    fn base_table() -> DecrementTable {
        build_decrement_table(&demographic(), &mortality(), &withdrawal(), &ill_health(), DecrementAdjustment::default())
            .unwrap()
    }

    #[test]
    fn test_table_is_contiguous_from_joining_to_retirement_age() {
        let table = base_table();
        assert_eq!(table.len(), 43);
        for (i, entry) in table.entries().iter().enumerate() {
            assert_eq!(entry.age, MIN_JOINING_AGE + i as u32);
        }
        assert_eq!(table.entries()[0].lx, RADIX);
    }

    #[test]
    fn test_survivors_non_increasing() {
        let table = base_table();
        for pair in table.entries().windows(2) {
            assert!(pair[0].lx >= pair[1].lx);
            assert!(pair[1].lx >= 0.0);
        }
    }

    #[test]
    fn test_retirement_age_row() {
        let table = base_table();
        let last = table.entry(60).unwrap();
        assert_eq!(last.qr, 1.0);
        assert_eq!(last.qd, 0.0);
        assert_eq!(last.qw, 0.0);
        assert_eq!(last.qi, 0.0);
        assert_eq!(last.dr, last.lx);
        assert!(table.entries()[..42].iter().all(|e| e.qr == 0.0));
    }

    #[test]
    fn test_survivor_recursion_and_exposure() {
        let table = base_table();
        let e18 = table.entry(18).unwrap();
        let e19 = table.entry(19).unwrap();
        assert_relative_eq!(e19.lx, e18.lx - e18.total_decrements(), max_relative = 1e-12);
        assert_relative_eq!(e18.ll, e18.lx - e18.total_decrements() / 2.0, max_relative = 1e-12);
        assert_relative_eq!(e18.dw, e18.lx * e18.qw, max_relative = 1e-12);
    }

    #[test]
    fn test_mortality_rounded_to_five_places() {
        let table = base_table();
        let e30 = table.entry(30).unwrap();
        assert_eq!(e30.qd, round5(0.0005 + 30.0 * 0.000_123_456));
        assert_relative_eq!(e30.qd, 0.0042, epsilon = 1e-12);
    }

    #[test]
    fn test_mortality_setback_changes_only_death_rates() {
        let base = base_table();
        for delta in [1, -1] {
            let shifted = build_decrement_table(
                &demographic(),
                &mortality(),
                &withdrawal(),
                &ill_health(),
                DecrementAdjustment::mortality_setback(delta),
            )
            .unwrap();
            for (b, s) in base.entries().iter().zip(shifted.entries()) {
                assert_eq!(b.qw, s.qw);
                assert_eq!(b.qi, s.qi);
                assert_eq!(b.qr, s.qr);
                if b.age < 60 {
                    assert_ne!(b.qd, s.qd);
                    assert_eq!(s.qd, round5(mortality().rate_at(b.age as i64 + delta as i64)));
                }
            }
        }
    }

    #[test]
    fn test_withdrawal_change_scales_rates() {
        let up = build_decrement_table(
            &demographic(),
            &mortality(),
            &withdrawal(),
            &ill_health(),
            DecrementAdjustment::withdrawal_change(5.0),
        )
        .unwrap();
        let base = base_table();
        assert_relative_eq!(up.entry(25).unwrap().qw, base.entry(25).unwrap().qw * 1.05, max_relative = 1e-12);
        assert_eq!(up.entry(25).unwrap().qd, base.entry(25).unwrap().qd);
    }

    #[test]
    fn test_missing_rates_default_to_zero() {
        let table = build_decrement_table(
            &demographic(),
            &RateTable::empty(RateType::Mortality),
            &RateTable::new(18, vec![0.1; 5], RateType::Withdrawal),
            &RateTable::empty(RateType::IllHealth),
            DecrementAdjustment::default(),
        )
        .unwrap();
        assert_eq!(table.entry(30).unwrap().qd, 0.0);
        assert_eq!(table.entry(30).unwrap().qw, 0.0);
        assert_eq!(table.entry(22).unwrap().qw, 0.1);
    }

    #[test]
    fn test_build_is_idempotent() {
        assert_eq!(base_table(), base_table());
    }

    #[test]
    fn test_exit_probability_lookup() {
        let table = base_table();
        let p = table.exit_probability(40, 45, Cause::Withdrawal);
        assert_relative_eq!(p, table.entry(45).unwrap().dw / table.entry(40).unwrap().lx, max_relative = 1e-12);
        assert_eq!(table.exit_probability(17, 45, Cause::Death), 0.0);
        assert_eq!(table.exit_probability(40, 61, Cause::Death), 0.0);
    }

    #[test]
    fn test_invalid_retirement_age() {
        let mut demo = demographic();
        demo.retirement_age = 18;
        assert!(build_decrement_table(&demo, &mortality(), &withdrawal(), &ill_health(), DecrementAdjustment::default())
            .is_err());
    }
}
