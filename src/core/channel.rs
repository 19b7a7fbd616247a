use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sales channel a value is resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Retail and wholesale together. Flat budget exports spell this `total`.
    #[default]
    #[serde(alias = "total")]
    Combined,
    Retail,
    Wholesale,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Combined, Channel::Retail, Channel::Wholesale];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Combined => "combined",
            Channel::Retail => "retail",
            Channel::Wholesale => "wholesale",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value with optional per-channel overrides.
///
/// Only `combined` is guaranteed; a SKU sold through a single channel
/// simply has no entry for the other one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChannelValue {
    #[schemars(with = "f64")]
    pub combined: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub retail: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub wholesale: Option<Decimal>,
}

impl ChannelValue {
    pub fn resolve(&self, channel: Channel) -> Decimal {
        resolve(channel, self)
    }
}

#[cfg(test)]
impl ChannelValue {
    pub fn new(combined: Decimal, retail: Option<Decimal>, wholesale: Option<Decimal>) -> Self {
        ChannelValue {
            combined,
            retail,
            wholesale,
        }
    }

    /// Build a value carrying explicit figures for every channel
    pub fn split(retail: Decimal, wholesale: Decimal) -> Self {
        ChannelValue::new(retail + wholesale, Some(retail), Some(wholesale))
    }
}

/// Resolve the value for a channel, treating a missing override as zero
pub fn resolve(channel: Channel, value: &ChannelValue) -> Decimal {
    match channel {
        Channel::Combined => value.combined,
        Channel::Retail => value.retail.unwrap_or(Decimal::ZERO),
        Channel::Wholesale => value.wholesale.unwrap_or(Decimal::ZERO),
    }
}

/// Sum the resolved values of many entries for one channel
pub fn resolve_sum<'a, I>(channel: Channel, values: I) -> Decimal
where
    I: IntoIterator<Item = &'a ChannelValue>,
{
    values.into_iter().map(|v| resolve(channel, v)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn combined_ignores_overrides() {
        let value = ChannelValue::new(dec!(100), Some(dec!(60)), Some(dec!(30)));
        assert_eq!(resolve(Channel::Combined, &value), dec!(100));
    }

    #[test]
    fn channel_overrides_resolved() {
        let value = ChannelValue::new(dec!(100), Some(dec!(60)), Some(dec!(40)));
        assert_eq!(resolve(Channel::Retail, &value), dec!(60));
        assert_eq!(resolve(Channel::Wholesale, &value), dec!(40));
    }

    #[test]
    fn missing_wholesale_resolves_to_zero() {
        let value = ChannelValue::new(dec!(100), Some(dec!(100)), None);
        assert_eq!(resolve(Channel::Wholesale, &value), Decimal::ZERO);
    }

    #[test]
    fn null_override_deserializes_as_missing() {
        let value: ChannelValue =
            serde_json::from_str(r#"{"combined": 12.5, "retail": null}"#).unwrap();
        assert_eq!(value.resolve(Channel::Combined), dec!(12.5));
        assert_eq!(value.resolve(Channel::Retail), Decimal::ZERO);
        assert_eq!(value.resolve(Channel::Wholesale), Decimal::ZERO);
    }

    #[test]
    fn total_is_an_alias_for_combined() {
        let channel: Channel = serde_json::from_str(r#""total""#).unwrap();
        assert_eq!(channel, Channel::Combined);
    }

    #[test]
    fn resolve_sum_adds_per_channel() {
        let values = [
            ChannelValue::split(dec!(10), dec!(5)),
            ChannelValue::new(dec!(7), Some(dec!(7)), None),
        ];
        assert_eq!(resolve_sum(Channel::Combined, &values), dec!(22));
        assert_eq!(resolve_sum(Channel::Retail, &values), dec!(17));
        assert_eq!(resolve_sum(Channel::Wholesale, &values), dec!(5));
    }
}
