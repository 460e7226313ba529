//! Yearly monthly-installment schedules for lot sales.
use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::number::round2;

/// Upper bound on yearly installment columns.
pub const MAX_INSTALLMENT_YEARS: u32 = 100;

/// Financing parameters for the lot-installments transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallmentParams {
    /// Months over which the first year's monthly installment is computed.
    pub months_until_first_installment: u32,
    /// Yearly readjustment, in percent.
    pub annual_interest_percent: f64,
    /// Number of yearly installment columns.
    pub installment_years: u32,
}

impl InstallmentParams {
    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// [`TransformError::ParameterInvalid`] naming the first bad parameter.
    pub fn validate(&self) -> Result<(), TransformError> {
        if self.months_until_first_installment == 0 {
            return Err(TransformError::ParameterInvalid {
                name: "months_until_first_installment",
                detail: "must be positive".to_owned(),
            });
        }
        if !self.annual_interest_percent.is_finite() || self.annual_interest_percent < 0.0 {
            return Err(TransformError::ParameterInvalid {
                name: "annual_interest_percent",
                detail: format!("must be a non-negative number, got {}", self.annual_interest_percent),
            });
        }
        if self.installment_years == 0 || self.installment_years > MAX_INSTALLMENT_YEARS {
            return Err(TransformError::ParameterInvalid {
                name: "installment_years",
                detail: format!(
                    "must be between 1 and {MAX_INSTALLMENT_YEARS}, got {}",
                    self.installment_years
                ),
            });
        }
        Ok(())
    }

    /// Monthly installment for each year.
    ///
    /// Year 1 is `(value - entry) / months`; each later year grows by the
    /// annual rate. Every step is rounded to cents before the next one.
    /// Returns `None` when the entry exceeds the value.
    pub fn schedule(&self, value: f64, entry: f64) -> Option<Vec<f64>> {
        let financed = value - entry;
        if financed < 0.0 {
            return None;
        }
        let growth = 1.0 + self.annual_interest_percent / 100.0;
        let mut monthly = round2(financed / f64::from(self.months_until_first_installment));
        let mut out = Vec::with_capacity(self.installment_years as usize);
        for _ in 0..self.installment_years {
            out.push(monthly);
            monthly = round2(monthly * growth);
        }
        Some(out)
    }

    /// Column title of year `year` (1-based).
    pub fn column_title(year: u32) -> String {
        format!("PARCELA MENSAL ANO {year}")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn params(months: u32, annual: f64, years: u32) -> InstallmentParams {
        InstallmentParams {
            months_until_first_installment: months,
            annual_interest_percent: annual,
            installment_years: years,
        }
    }

    #[test]
    fn three_year_schedule() {
        let s = params(60, 10.0, 3)
            .schedule(100_000.0, 10_000.0)
            .expect("financed");
        assert_eq!(s, [1500.0, 1650.0, 1815.0]);
    }

    #[test]
    fn zero_rate_is_flat() {
        let s = params(12, 0.0, 2).schedule(1200.0, 0.0).expect("financed");
        assert_eq!(s, [100.0, 100.0]);
    }

    #[test]
    fn entry_above_value_yields_nothing() {
        assert!(params(12, 5.0, 1).schedule(100.0, 200.0).is_none());
    }

    #[test]
    fn validation_names_the_parameter() {
        let err = params(0, 1.0, 1).validate().expect_err("months");
        assert!(matches!(
            err,
            TransformError::ParameterInvalid { name: "months_until_first_installment", .. }
        ));
        let err = params(1, -1.0, 1).validate().expect_err("rate");
        assert!(matches!(
            err,
            TransformError::ParameterInvalid { name: "annual_interest_percent", .. }
        ));
        let err = params(1, 1.0, 0).validate().expect_err("years");
        assert!(matches!(
            err,
            TransformError::ParameterInvalid { name: "installment_years", .. }
        ));
        assert!(params(1, 0.0, 1).validate().is_ok());
    }

    #[test]
    fn installment_years_capped() {
        assert!(params(12, 5.0, MAX_INSTALLMENT_YEARS).validate().is_ok());
        for years in [MAX_INSTALLMENT_YEARS + 1, 20_000, u32::MAX] {
            let err = params(12, 5.0, years).validate().expect_err("too many years");
            assert!(matches!(
                err,
                TransformError::ParameterInvalid { name: "installment_years", .. }
            ));
        }
    }
}
