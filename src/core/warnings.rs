use super::channel::Channel;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which figure of a node a warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Budget,
    Actual,
}

/// Data-quality findings that do not stop a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// A supplied total differs from the sum of its children.
    TotalMismatch {
        node: String,
        channel: Channel,
        metric: Metric,
        #[schemars(with = "f64")]
        supplied: Decimal,
        #[schemars(with = "f64")]
        computed: Decimal,
    },
    /// `annualTarget` differs from the sum of the monthly targets.
    AnnualTargetMismatch {
        sku: String,
        #[schemars(with = "f64")]
        annual_target: Decimal,
        #[schemars(with = "f64")]
        monthly_sum: Decimal,
    },
    /// Monthly targets did not hold exactly twelve values.
    MonthlyTargetsLength { sku: String, len: usize },
}

impl Warning {
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::TotalMismatch { .. } => "TotalMismatch",
            Warning::AnnualTargetMismatch { .. } => "AnnualTargetMismatch",
            Warning::MonthlyTargetsLength { .. } => "MonthlyTargetsLength",
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            Warning::TotalMismatch { node, .. } => node,
            Warning::AnnualTargetMismatch { sku, .. } | Warning::MonthlyTargetsLength { sku, .. } => sku,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Warning::TotalMismatch {
                channel,
                metric,
                supplied,
                computed,
                ..
            } => format!(
                "{} {:?} total is {} but children sum to {}",
                channel,
                metric,
                supplied.normalize(),
                computed.normalize()
            ),
            Warning::AnnualTargetMismatch {
                annual_target,
                monthly_sum,
                ..
            } => format!(
                "annual target {} does not match monthly sum {}",
                annual_target.normalize(),
                monthly_sum.normalize()
            ),
            Warning::MonthlyTargetsLength { len, .. } => {
                if *len < 12 {
                    format!("{} monthly targets given, remaining months zero-filled", len)
                } else {
                    format!("{} monthly targets given, values after December ignored", len)
                }
            }
        }
    }
}
