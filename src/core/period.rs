use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("days elapsed ({elapsed}) exceeds days in period ({total})")]
    ElapsedExceedsPeriod { elapsed: u32, total: u32 },
}

/// Progress through a budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    days_elapsed: u32,
    days_in_period: u32,
}

impl Period {
    pub fn new(days_elapsed: u32, days_in_period: u32) -> Result<Self, PeriodError> {
        if days_elapsed > days_in_period {
            return Err(PeriodError::ElapsedExceedsPeriod {
                elapsed: days_elapsed,
                total: days_in_period,
            });
        }
        Ok(Period {
            days_elapsed,
            days_in_period,
        })
    }

    pub fn days_elapsed(&self) -> u32 {
        self.days_elapsed
    }

    pub fn days_in_period(&self) -> u32 {
        self.days_in_period
    }

    /// Share of the period already elapsed, in `0..=1`
    pub fn fraction_elapsed(&self) -> Decimal {
        if self.days_in_period == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.days_elapsed) / Decimal::from(self.days_in_period)
    }

    pub fn percent_through(&self) -> Decimal {
        self.fraction_elapsed() * Decimal::ONE_HUNDRED
    }

    /// Actual expected by today if the budget were being spent evenly
    pub fn expected_to_date(&self, budget: Decimal) -> Decimal {
        self.fraction_elapsed() * budget
    }

    /// Actual-to-date against expected-to-date, as a percentage.
    ///
    /// Zero when nothing is expected yet (no budget or no elapsed days).
    pub fn pace(&self, actual: Decimal, budget: Decimal) -> Decimal {
        let expected = self.expected_to_date(budget);
        if expected <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        // Saturates instead of overflowing on extreme ratios
        actual
            .checked_div(expected)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(if actual.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_elapsed_past_end() {
        assert_eq!(
            Period::new(31, 30),
            Err(PeriodError::ElapsedExceedsPeriod {
                elapsed: 31,
                total: 30
            })
        );
    }

    #[test]
    fn percent_through_period() {
        let period = Period::new(15, 30).unwrap();
        assert_eq!(period.percent_through(), dec!(50));
        assert_eq!(period.expected_to_date(dec!(1000)), dec!(500));
    }

    #[test]
    fn pace_on_schedule_is_100() {
        let period = Period::new(10, 40).unwrap();
        assert_eq!(period.pace(dec!(250), dec!(1000)), dec!(100));
        assert_eq!(period.pace(dec!(200), dec!(1000)), dec!(80));
    }

    #[test]
    fn pace_without_expectation_is_zero() {
        let start = Period::new(0, 30).unwrap();
        assert_eq!(start.pace(dec!(100), dec!(1000)), Decimal::ZERO);

        let period = Period::new(10, 30).unwrap();
        assert_eq!(period.pace(dec!(100), dec!(0)), Decimal::ZERO);

        let empty = Period::new(0, 0).unwrap();
        assert_eq!(empty.percent_through(), Decimal::ZERO);
    }

    #[test]
    fn pace_saturates_on_extreme_ratio() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
        let period = Period::new(30, 30).unwrap();
        assert_eq!(period.pace(huge, dec!(0.0001)), Decimal::MAX);
        assert_eq!(period.pace(-huge, dec!(0.0001)), Decimal::MIN);
    }
}
