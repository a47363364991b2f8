//! Load the active employee roster from CSV
//!
//! Each row carries `Pay` and either `Age` and `PastService` directly or
//! `DOB` and `DOA` (ISO dates) from which they are derived against the
//! valuation date. `ECODE` is optional.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;

use super::EmployeeRecord;
use crate::error::ValuationError;

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "ECODE", default)]
    code: Option<String>,
    #[serde(rename = "Age", alias = "AGE", default)]
    age: Option<u32>,
    #[serde(rename = "PastService", alias = "PS", default)]
    past_service: Option<f64>,
    #[serde(rename = "DOB", default)]
    date_of_birth: Option<NaiveDate>,
    #[serde(rename = "DOA", default)]
    date_of_appointment: Option<NaiveDate>,
    #[serde(rename = "Pay", alias = "PAY")]
    pay: f64,
}

impl CsvRow {
    fn into_record(self, row: usize, valuation_date: Option<NaiveDate>) -> Result<EmployeeRecord, ValuationError> {
        let record = match (self.age, self.past_service) {
            (Some(age), Some(past_service)) => EmployeeRecord::new(age, past_service, self.pay),
            _ => {
                let (Some(valuation), Some(dob), Some(doa)) =
                    (valuation_date, self.date_of_birth, self.date_of_appointment)
                else {
                    return Err(ValuationError::InvalidEmployee {
                        row,
                        reason: "needs Age and PastService, or DOB and DOA with a valuation date".into(),
                    });
                };
                EmployeeRecord::from_dates(valuation, dob, doa, self.pay).map_err(|err| match err {
                    ValuationError::InvalidEmployee { reason, .. } => ValuationError::InvalidEmployee { row, reason },
                    other => other,
                })?
            }
        };

        let valid = |x: f64| x.is_finite() && x >= 0.0;
        if !valid(record.pay) || !valid(record.past_service) {
            return Err(ValuationError::InvalidEmployee {
                row,
                reason: "pay and past service must be finite and non-negative".into(),
            });
        }

        Ok(match self.code {
            Some(code) if !code.is_empty() => record.with_code(code),
            _ => record,
        })
    }
}

/// Load the roster from a CSV file
pub fn load_roster<P: AsRef<Path>>(
    path: P,
    valuation_date: Option<NaiveDate>,
) -> Result<Vec<EmployeeRecord>, ValuationError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ValuationError::MissingEmployeeData);
    }
    load_roster_from_reader(std::fs::File::open(path)?, valuation_date)
}

/// Load the roster from any reader
pub fn load_roster_from_reader<R: Read>(
    reader: R,
    valuation_date: Option<NaiveDate>,
) -> Result<Vec<EmployeeRecord>, ValuationError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut employees = Vec::new();

    for (i, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // header is line 1
        employees.push(row.into_record(i + 2, valuation_date)?);
    }

    if employees.is_empty() {
        return Err(ValuationError::MissingEmployeeData);
    }
    log::info!("Loaded {} employees", employees.len());
    Ok(employees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_load_direct_columns() {
        let data = "ECODE,Age,PastService,Pay\nE1,40,10,50000\nE2,30,2.5,30000\n";
        let roster = load_roster_from_reader(data.as_bytes(), None).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].code.as_deref(), Some("E1"));
        assert_eq!(roster[1].age, 30);
        assert_relative_eq!(roster[1].past_service, 2.5);
    }

    #[test]
    fn test_load_from_dates() {
        let data = "ECODE,DOB,DOA,Pay\nE1,1984-07-01,2014-06-30,50000\n";
        let valuation = NaiveDate::from_ymd_opt(2024, 6, 30);
        let roster = load_roster_from_reader(data.as_bytes(), valuation).unwrap();
        assert_eq!(roster[0].age, 39);
        assert!(roster[0].past_service > 9.9 && roster[0].past_service < 10.1);
    }

    #[test]
    fn test_dates_without_valuation_date_rejected() {
        let data = "DOB,DOA,Pay\n1984-07-01,2014-06-30,50000\n";
        match load_roster_from_reader(data.as_bytes(), None) {
            Err(ValuationError::InvalidEmployee { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected invalid employee, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_or_negative_values_rejected() {
        for data in [
            "Age,PastService,Pay\n40,NaN,50000\n",
            "Age,PastService,Pay\n40,inf,50000\n",
            "Age,PastService,Pay\n40,-1,50000\n",
            "Age,PastService,Pay\n30,2,30000\n40,10,-5\n",
            "Age,PastService,Pay\n40,10,NaN\n",
        ] {
            match load_roster_from_reader(data.as_bytes(), None) {
                Err(ValuationError::InvalidEmployee { row, .. }) => assert!(row >= 2),
                other => panic!("expected invalid employee for {data:?}, got {other:?}"),
            }
        }
        let data = "Age,PastService,Pay\n30,2,30000\n40,10,-5\n";
        assert!(matches!(
            load_roster_from_reader(data.as_bytes(), None),
            Err(ValuationError::InvalidEmployee { row: 3, .. })
        ));
    }

    #[test]
    fn test_empty_roster_is_missing_data() {
        let data = "Age,PastService,Pay\n";
        assert!(matches!(
            load_roster_from_reader(data.as_bytes(), None),
            Err(ValuationError::MissingEmployeeData)
        ));
        assert!(matches!(
            load_roster("does/not/exist.csv", None),
            Err(ValuationError::MissingEmployeeData)
        ));
    }
}
