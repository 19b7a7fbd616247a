use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Signed difference between an actual and a reference value.
///
/// Positive means the actual exceeds the reference. `percent` is `None`
/// when the reference is not positive, which renders as "N/A".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Delta {
    pub absolute: Decimal,
    pub percent: Option<Decimal>,
}

impl Delta {
    pub fn is_favorable(&self) -> bool {
        self.absolute >= Decimal::ZERO
    }

    /// Percent with one decimal and a `%` suffix
    pub fn percent_display(&self) -> String {
        self.percent.map_or_else(|| "N/A".to_string(), format_pct)
    }
}

pub fn delta(actual: Decimal, reference: Decimal) -> Delta {
    let absolute = actual.saturating_sub(reference);
    let percent = if reference > Decimal::ZERO {
        absolute
            .checked_div(reference)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    } else {
        None
    };
    Delta { absolute, percent }
}

/// Format a percentage to one decimal place, rounding half away from zero
pub fn format_pct(pct: Decimal) -> String {
    let mut rounded = pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        // no "-0.0%"
        rounded = Decimal::ZERO;
    }
    format!("{:.1}%", rounded)
}
