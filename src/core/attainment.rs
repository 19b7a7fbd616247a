//! Attainment tiers for budget vs actual performance.
//!
//! Classification is first-match-wins over an ordered rule list. A zero
//! budget is never a failure, and having already reached most of the
//! period budget outranks a weak pace.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Percent of budget at which the goal counts as hit
pub const GOAL_HIT_PCT: Decimal = dec!(90);
/// Pace at or above which a node is on pace
pub const ON_PACE: Decimal = dec!(90);
/// Pace at or above which a node is only slightly behind
pub const SLIGHTLY_BEHIND: Decimal = dec!(80);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    NotApplicable,
    GoalHit,
    OnPace,
    SlightlyBehind,
    Behind,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::NotApplicable => "N/A",
            Tier::GoalHit => "Goal Hit",
            Tier::OnPace => "On Pace",
            Tier::SlightlyBehind => "Slightly Behind",
            Tier::Behind => "Behind",
        }
    }

    /// Foreground and gradient-dark colors
    pub fn palette(&self) -> (&'static str, &'static str) {
        match self {
            Tier::NotApplicable => ("#64748B", "#475569"),
            Tier::GoalHit => ("#22C55E", "#16A34A"),
            Tier::OnPace => ("#10B981", "#059669"),
            Tier::SlightlyBehind => ("#F59E0B", "#D97706"),
            Tier::Behind => ("#F43F5E", "#E11D48"),
        }
    }
}

/// Inputs competing for a node's tier
#[derive(Debug, Clone, Copy)]
pub struct Signals {
    pub pace: Decimal,
    pub pct_of_budget: Option<Decimal>,
    pub budget: Decimal,
}

struct Rule {
    tier: Tier,
    applies: fn(&Signals) -> bool,
}

fn zero_budget(s: &Signals) -> bool {
    s.budget.is_zero()
}

fn goal_hit(s: &Signals) -> bool {
    s.pct_of_budget.is_some_and(|pct| pct >= GOAL_HIT_PCT)
}

fn on_pace(s: &Signals) -> bool {
    s.pace >= ON_PACE
}

fn slightly_behind(s: &Signals) -> bool {
    s.pace >= SLIGHTLY_BEHIND
}

// Order is significant.
const RULES: [Rule; 4] = [
    Rule {
        tier: Tier::NotApplicable,
        applies: zero_budget,
    },
    Rule {
        tier: Tier::GoalHit,
        applies: goal_hit,
    },
    Rule {
        tier: Tier::OnPace,
        applies: on_pace,
    },
    Rule {
        tier: Tier::SlightlyBehind,
        applies: slightly_behind,
    },
];

/// Pick the first tier whose rule matches, falling back to `Behind`
pub fn classify_tier(signals: &Signals) -> Tier {
    RULES
        .iter()
        .find(|rule| (rule.applies)(signals))
        .map_or(Tier::Behind, |rule| rule.tier)
}

/// Classified tier with its display colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attainment {
    pub tier: Tier,
    pub color_fg: &'static str,
    pub color_bg: &'static str,
}

impl From<Tier> for Attainment {
    fn from(tier: Tier) -> Self {
        let (color_fg, color_bg) = tier.palette();
        Attainment {
            tier,
            color_fg,
            color_bg,
        }
    }
}

pub fn classify(pace: Decimal, pct_of_budget: Option<Decimal>, budget: Decimal) -> Attainment {
    classify_tier(&Signals {
        pace,
        pct_of_budget,
        budget,
    })
    .into()
}

/// Actual as a percentage of budget, `None` when there is no budget
pub fn pct_of_budget(actual: Decimal, budget: Decimal) -> Option<Decimal> {
    if budget > Decimal::ZERO {
        actual
            .checked_div(budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(pace: Decimal, pct: Option<Decimal>, budget: Decimal) -> Tier {
        classify(pace, pct, budget).tier
    }

    #[test]
    fn zero_budget_is_not_applicable() {
        assert_eq!(tier(dec!(0), None, dec!(0)), Tier::NotApplicable);
        assert_eq!(tier(dec!(150), Some(dec!(250)), dec!(0)), Tier::NotApplicable);
        assert_eq!(tier(dec!(-20), Some(dec!(-5)), dec!(0)), Tier::NotApplicable);
        assert_eq!(tier(dec!(95), Some(dec!(95)), dec!(0)), Tier::NotApplicable);
    }

    #[test]
    fn goal_hit_outranks_pace() {
        assert_eq!(tier(dec!(50), Some(dec!(95)), dec!(100)), Tier::GoalHit);
        assert_eq!(tier(dec!(10), Some(dec!(90)), dec!(100)), Tier::GoalHit);
    }

    #[test]
    fn pace_thresholds() {
        assert_eq!(tier(dec!(90), Some(dec!(40)), dec!(100)), Tier::OnPace);
        assert_eq!(tier(dec!(120), None, dec!(100)), Tier::OnPace);
        assert_eq!(tier(dec!(89.9), Some(dec!(40)), dec!(100)), Tier::SlightlyBehind);
        assert_eq!(tier(dec!(80), Some(dec!(40)), dec!(100)), Tier::SlightlyBehind);
        assert_eq!(tier(dec!(79.99), Some(dec!(40)), dec!(100)), Tier::Behind);
    }

    #[test]
    fn missing_pct_falls_through_to_pace() {
        assert_eq!(tier(dec!(50), None, dec!(100)), Tier::Behind);
    }

    #[test]
    fn colors_follow_tier() {
        let attainment = classify(dec!(50), Some(dec!(95)), dec!(100));
        assert_eq!(attainment.color_fg, "#22C55E");
        assert_eq!(attainment.color_bg, "#16A34A");

        let attainment = classify(dec!(50), None, dec!(0));
        assert_eq!(attainment.tier.palette(), ("#64748B", "#475569"));
    }

    #[test]
    fn pct_of_budget_guards_zero() {
        assert_eq!(pct_of_budget(dec!(45), dec!(50)), Some(dec!(90)));
        assert_eq!(pct_of_budget(dec!(45), dec!(0)), None);
    }

    #[test]
    fn pct_of_budget_overflow_is_none() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
        assert_eq!(pct_of_budget(huge, dec!(0.0001)), None);
    }
}
