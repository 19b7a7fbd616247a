//! SKU -> Category -> Cookware -> Grand total rollups.
//!
//! Budget and actual are summed bottom-up from channel-resolved SKU values.
//! Pace is a ratio, so every rollup level recomputes it from its own sums
//! and the period instead of combining child paces.

use super::attainment::{self, Attainment};
use super::channel::{resolve, resolve_sum, Channel, ChannelValue};
use super::delta::{delta, Delta};
use super::period::Period;
use super::warnings::{Metric, Warning};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CastIron,
    CarbonSteel,
    Accessory,
    GlassLid,
    #[serde(other)]
    Other,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::CastIron => "Cast Iron",
            Category::CarbonSteel => "Carbon Steel",
            Category::Accessory => "Accessories",
            Category::GlassLid => "Glass Lids",
            Category::Other => "Other",
        }
    }

    /// Cast iron and carbon steel make up the cookware total
    pub fn is_cookware(&self) -> bool {
        matches!(self, Category::CastIron | Category::CarbonSteel)
    }
}

/// Budget, actual and pace of one node, each with channel overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Metrics {
    pub budget: ChannelValue,
    pub actual: ChannelValue,
    #[serde(default)]
    pub pace: ChannelValue,
}

/// Per-SKU budget and actuals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkuTarget {
    pub sku: String,
    pub display_name: String,
    pub category: Category,
    pub budget: ChannelValue,
    pub actual: ChannelValue,
    #[serde(default)]
    pub pace: ChannelValue,
    /// January first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<Vec<f64>>")]
    pub monthly_targets: Option<Vec<Decimal>>,
    #[serde(default)]
    pub backordered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub days_of_inventory: Option<Decimal>,
}

impl SkuTarget {
    /// Values for one channel. SKU pace is taken as supplied.
    pub fn resolved(&self, channel: Channel) -> NodeValues {
        NodeValues {
            budget: resolve(channel, &self.budget),
            actual: resolve(channel, &self.actual),
            pace: resolve(channel, &self.pace),
        }
    }

    pub fn urgency(&self) -> Urgency {
        Urgency::of(self.backordered, self.days_of_inventory)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    pub category: Category,
    pub display_name: String,
    #[serde(default)]
    pub skus: Vec<SkuTarget>,
    #[serde(default)]
    pub totals: Metrics,
}

impl CategoryAggregate {
    /// Copy of this category with one SKU left out
    pub fn without_sku(&self, sku: &str) -> CategoryAggregate {
        CategoryAggregate {
            skus: self.skus.iter().filter(|s| s.sku != sku).cloned().collect(),
            ..self.clone()
        }
    }

    /// Budget and actual summed from the SKUs for one channel
    pub fn sum_skus(&self, channel: Channel) -> (Decimal, Decimal) {
        (
            resolve_sum(channel, self.skus.iter().map(|s| &s.budget)),
            resolve_sum(channel, self.skus.iter().map(|s| &s.actual)),
        )
    }
}

/// Channel-resolved figures for one row of the hierarchy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeValues {
    pub budget: Decimal,
    pub actual: Decimal,
    pub pace: Decimal,
}

impl NodeValues {
    fn rollup(budget: Decimal, actual: Decimal, period: &Period) -> Self {
        NodeValues {
            budget,
            actual,
            pace: period.pace(actual, budget),
        }
    }

    pub fn pct_of_budget(&self) -> Option<Decimal> {
        attainment::pct_of_budget(self.actual, self.budget)
    }

    pub fn attainment(&self) -> Attainment {
        attainment::classify(self.pace, self.pct_of_budget(), self.budget)
    }

    pub fn variance(&self) -> Delta {
        delta(self.actual, self.budget)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub display_name: String,
    pub sku_count: usize,
    pub totals: NodeValues,
}

/// Rolled-up totals for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollupTotals {
    pub channel: Channel,
    pub categories: Vec<CategoryTotal>,
    pub cookware: NodeValues,
    pub grand: NodeValues,
}

/// Aggregate categories for a channel.
///
/// Category totals are recomputed from the SKUs rather than trusted, so a
/// filtered SKU list never drifts from its total. Empty categories stay in
/// the output with zero totals.
pub fn aggregate(categories: &[CategoryAggregate], channel: Channel, period: &Period) -> RollupTotals {
    let category_totals: Vec<CategoryTotal> = categories
        .iter()
        .map(|c| {
            let (budget, actual) = c.sum_skus(channel);
            log::debug!(
                "{} [{}]: budget {}, actual {} over {} skus",
                c.display_name,
                channel,
                budget,
                actual,
                c.skus.len()
            );
            CategoryTotal {
                category: c.category,
                display_name: c.display_name.clone(),
                sku_count: c.skus.len(),
                totals: NodeValues::rollup(budget, actual, period),
            }
        })
        .collect();

    let (cookware_budget, cookware_actual) = sum_totals(
        category_totals
            .iter()
            .filter(|c| c.category.is_cookware()),
    );
    let (grand_budget, grand_actual) = sum_totals(category_totals.iter());

    RollupTotals {
        channel,
        categories: category_totals,
        cookware: NodeValues::rollup(cookware_budget, cookware_actual, period),
        grand: NodeValues::rollup(grand_budget, grand_actual, period),
    }
}

fn sum_totals<'a, I>(totals: I) -> (Decimal, Decimal)
where
    I: Iterator<Item = &'a CategoryTotal>,
{
    totals.fold((Decimal::ZERO, Decimal::ZERO), |(b, a), c| {
        (b + c.totals.budget, a + c.totals.actual)
    })
}

/// Compare supplied totals with the sums of their children on every channel
pub fn check_totals(categories: &[CategoryAggregate], cookware: &Metrics, grand: &Metrics) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for channel in Channel::ALL {
        let mut cookware_sum = (Decimal::ZERO, Decimal::ZERO);
        let mut grand_sum = (Decimal::ZERO, Decimal::ZERO);

        for c in categories {
            let computed = c.sum_skus(channel);
            push_mismatch(&mut warnings, &c.display_name, channel, &c.totals, computed);

            // Rollups are checked against the supplied category totals, so
            // drift is reported once at the level it occurs.
            let supplied = (
                resolve(channel, &c.totals.budget),
                resolve(channel, &c.totals.actual),
            );
            if c.category.is_cookware() {
                cookware_sum = (cookware_sum.0 + supplied.0, cookware_sum.1 + supplied.1);
            }
            grand_sum = (grand_sum.0 + supplied.0, grand_sum.1 + supplied.1);
        }

        push_mismatch(&mut warnings, "Cookware Total", channel, cookware, cookware_sum);
        push_mismatch(&mut warnings, "Grand Total", channel, grand, grand_sum);
    }

    for w in &warnings {
        log::warn!("{}: {}", w.subject(), w.message());
    }
    warnings
}

fn push_mismatch(
    warnings: &mut Vec<Warning>,
    node: &str,
    channel: Channel,
    supplied: &Metrics,
    (budget, actual): (Decimal, Decimal),
) {
    let checks = [
        (Metric::Budget, resolve(channel, &supplied.budget), budget),
        (Metric::Actual, resolve(channel, &supplied.actual), actual),
    ];
    for (metric, supplied, computed) in checks {
        if supplied != computed {
            warnings.push(Warning::TotalMismatch {
                node: node.to_string(),
                channel,
                metric,
                supplied,
                computed,
            });
        }
    }
}

/// Sort key for urgency ordering, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Backordered,
    DaysOfInventory(Decimal),
    NoForecast,
}

impl Urgency {
    pub fn of(backordered: bool, days_of_inventory: Option<Decimal>) -> Self {
        match (backordered, days_of_inventory) {
            (true, _) => Urgency::Backordered,
            (false, Some(days)) => Urgency::DaysOfInventory(days),
            (false, None) => Urgency::NoForecast,
        }
    }
}

/// Stable sort: backordered, then fewest days of inventory, then no forecast
pub fn sort_by_urgency(skus: &mut [SkuTarget]) {
    skus.sort_by_key(SkuTarget::urgency);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sku(id: &str, category: Category, budget: ChannelValue, actual: ChannelValue) -> SkuTarget {
        SkuTarget {
            sku: id.to_string(),
            display_name: id.to_string(),
            category,
            budget,
            actual,
            pace: ChannelValue::default(),
            monthly_targets: None,
            backordered: false,
            days_of_inventory: None,
        }
    }

    fn category(category: Category, skus: Vec<SkuTarget>) -> CategoryAggregate {
        let mut totals = Metrics::default();
        for s in &skus {
            for (total, value) in [(&mut totals.budget, &s.budget), (&mut totals.actual, &s.actual)] {
                total.combined += value.combined;
                total.retail = Some(total.retail.unwrap_or_default() + value.retail.unwrap_or_default());
                total.wholesale =
                    Some(total.wholesale.unwrap_or_default() + value.wholesale.unwrap_or_default());
            }
        }
        CategoryAggregate {
            category,
            display_name: category.label().to_string(),
            skus,
            totals,
        }
    }

    fn fixture() -> Vec<CategoryAggregate> {
        vec![
            category(
                Category::CastIron,
                vec![
                    sku(
                        "CI-12",
                        Category::CastIron,
                        ChannelValue::split(dec!(600), dec!(400)),
                        ChannelValue::split(dec!(300), dec!(250)),
                    ),
                    sku(
                        "CI-10",
                        Category::CastIron,
                        ChannelValue::new(dec!(500), Some(dec!(500)), None),
                        ChannelValue::new(dec!(200), Some(dec!(200)), None),
                    ),
                ],
            ),
            category(
                Category::CarbonSteel,
                vec![sku(
                    "CS-12",
                    Category::CarbonSteel,
                    ChannelValue::split(dec!(300), dec!(100)),
                    ChannelValue::split(dec!(100), dec!(100)),
                )],
            ),
            category(
                Category::Accessory,
                vec![
                    sku(
                        "ACC-SCRUB",
                        Category::Accessory,
                        ChannelValue::split(dec!(80), dec!(20)),
                        ChannelValue::split(dec!(90), dec!(30)),
                    ),
                    sku(
                        "GLASS-LID-12",
                        Category::Accessory,
                        ChannelValue::split(dec!(50), dec!(0)),
                        ChannelValue::split(dec!(10), dec!(0)),
                    ),
                ],
            ),
            category(Category::GlassLid, vec![]),
        ]
    }

    #[test]
    fn category_totals_equal_sku_sums_on_every_channel() {
        let categories = fixture();
        let period = Period::new(15, 30).unwrap();
        for channel in Channel::ALL {
            let rollup = aggregate(&categories, channel, &period);
            for (total, c) in rollup.categories.iter().zip(&categories) {
                let budget: Decimal = c.skus.iter().map(|s| s.budget.resolve(channel)).sum();
                let actual: Decimal = c.skus.iter().map(|s| s.actual.resolve(channel)).sum();
                assert_eq!(total.totals.budget, budget);
                assert_eq!(total.totals.actual, actual);
                assert_eq!(total.totals.budget, c.totals.budget.resolve(channel));
            }
        }
    }

    #[test]
    fn grand_total_sums_categories() {
        let categories = fixture();
        let period = Period::new(15, 30).unwrap();
        for channel in Channel::ALL {
            let rollup = aggregate(&categories, channel, &period);
            let budget: Decimal = rollup.categories.iter().map(|c| c.totals.budget).sum();
            let actual: Decimal = rollup.categories.iter().map(|c| c.totals.actual).sum();
            assert_eq!(rollup.grand.budget, budget);
            assert_eq!(rollup.grand.actual, actual);
        }

        let combined = aggregate(&categories, Channel::Combined, &period);
        assert_eq!(combined.grand.budget, dec!(2050));
        assert_eq!(combined.grand.actual, dec!(1080));
    }

    #[test]
    fn cookware_is_cast_iron_plus_carbon_steel() {
        let period = Period::new(15, 30).unwrap();
        let rollup = aggregate(&fixture(), Channel::Retail, &period);
        // cast iron 600 + 500, carbon steel 300
        assert_eq!(rollup.cookware.budget, dec!(1400));
        assert_eq!(rollup.cookware.actual, dec!(600));

        let wholesale = aggregate(&fixture(), Channel::Wholesale, &period);
        assert_eq!(wholesale.cookware.budget, dec!(500));
        assert_eq!(wholesale.cookware.actual, dec!(350));
    }

    #[test]
    fn rollup_pace_is_recomputed_not_averaged() {
        let mut categories = fixture();
        categories[0].skus[0].pace = ChannelValue::new(dec!(10), None, None);
        categories[0].skus[1].pace = ChannelValue::new(dec!(500), None, None);

        let period = Period::new(15, 30).unwrap();
        let rollup = aggregate(&categories, Channel::Combined, &period);
        // cast iron: actual 750 against expected 750
        assert_eq!(rollup.categories[0].totals.pace, dec!(100));
        // child paces of 10 and 500 do not leak into the rollup
        assert_eq!(rollup.cookware.pace, dec!(100));
        assert_eq!(rollup.grand.pace, period.pace(dec!(1080), dec!(2050)));
    }

    #[test]
    fn empty_category_is_kept_and_not_applicable() {
        let period = Period::new(15, 30).unwrap();
        let rollup = aggregate(&fixture(), Channel::Combined, &period);
        let glass = rollup
            .categories
            .iter()
            .find(|c| c.category == Category::GlassLid)
            .unwrap();
        assert_eq!(glass.sku_count, 0);
        assert_eq!(glass.totals, NodeValues::default());
        assert_eq!(glass.totals.attainment().tier, attainment::Tier::NotApplicable);
    }

    #[test]
    fn excluded_sku_leaves_totals_consistent() {
        let categories: Vec<_> = fixture()
            .iter()
            .map(|c| c.without_sku("GLASS-LID-12"))
            .collect();
        let period = Period::new(15, 30).unwrap();
        let rollup = aggregate(&categories, Channel::Combined, &period);
        assert_eq!(rollup.categories[2].totals.budget, dec!(100));
        assert_eq!(rollup.categories[2].sku_count, 1);
    }

    #[test]
    fn wholesale_fallback_is_zero() {
        let categories = fixture();
        let values = categories[0].skus[1].resolved(Channel::Wholesale);
        assert_eq!(values, NodeValues::default());
    }

    #[test]
    fn consistent_totals_have_no_warnings() {
        let categories = fixture();
        let cookware = rollup_metrics(&categories, |c| c.is_cookware());
        let grand = rollup_metrics(&categories, |_| true);
        assert!(check_totals(&categories, &cookware, &grand).is_empty());
    }

    #[test]
    fn drifted_category_total_is_reported() {
        let mut categories = fixture();
        let cookware = rollup_metrics(&categories, |c| c.is_cookware());
        let grand = rollup_metrics(&categories, |_| true);
        categories[2].skus.pop();

        let warnings = check_totals(&categories, &cookware, &grand);
        assert!(warnings.contains(&Warning::TotalMismatch {
            node: "Accessories".to_string(),
            channel: Channel::Combined,
            metric: Metric::Budget,
            supplied: dec!(150),
            computed: dec!(100),
        }));
        assert!(warnings.iter().all(|w| w.subject() == "Accessories"));
    }

    fn rollup_metrics(
        categories: &[CategoryAggregate],
        include: impl Fn(&Category) -> bool,
    ) -> Metrics {
        let mut metrics = Metrics::default();
        let selected: Vec<_> = categories.iter().filter(|c| include(&c.category)).collect();
        let budget = |ch| selected.iter().map(|c| c.totals.budget.resolve(ch)).sum::<Decimal>();
        let actual = |ch| selected.iter().map(|c| c.totals.actual.resolve(ch)).sum::<Decimal>();
        metrics.budget = ChannelValue::new(
            budget(Channel::Combined),
            Some(budget(Channel::Retail)),
            Some(budget(Channel::Wholesale)),
        );
        metrics.actual = ChannelValue::new(
            actual(Channel::Combined),
            Some(actual(Channel::Retail)),
            Some(actual(Channel::Wholesale)),
        );
        metrics
    }

    #[test]
    fn urgency_ordering() {
        let mut skus = vec![
            sku("doi-30", Category::CastIron, ChannelValue::default(), ChannelValue::default()),
            sku("backordered", Category::CastIron, ChannelValue::default(), ChannelValue::default()),
            sku("doi-5", Category::CastIron, ChannelValue::default(), ChannelValue::default()),
            sku("no-forecast", Category::CastIron, ChannelValue::default(), ChannelValue::default()),
        ];
        skus[0].days_of_inventory = Some(dec!(30));
        skus[1].backordered = true;
        skus[2].days_of_inventory = Some(dec!(5));

        sort_by_urgency(&mut skus);
        let order: Vec<_> = skus.iter().map(|s| s.sku.as_str()).collect();
        assert_eq!(order, ["backordered", "doi-5", "doi-30", "no-forecast"]);
    }

    #[test]
    fn urgency_sort_is_stable() {
        let mut skus = vec![
            sku("a", Category::CastIron, ChannelValue::default(), ChannelValue::default()),
            sku("b", Category::CastIron, ChannelValue::default(), ChannelValue::default()),
            sku("c", Category::CastIron, ChannelValue::default(), ChannelValue::default()),
        ];
        skus[1].days_of_inventory = Some(dec!(3));
        sort_by_urgency(&mut skus);
        let order: Vec<_> = skus.iter().map(|s| s.sku.as_str()).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }

    #[test]
    fn extreme_node_values_classify_without_overflow() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
        let node = NodeValues {
            budget: dec!(0.0001),
            actual: huge,
            pace: dec!(0),
        };
        assert_eq!(node.pct_of_budget(), None);
        assert_eq!(node.variance().percent, None);
        assert_eq!(node.attainment().tier, crate::core::attainment::Tier::Behind);

        let period = Period::new(15, 30).unwrap();
        let rolled = NodeValues::rollup(dec!(0.0001), huge, &period);
        assert_eq!(rolled.pace, Decimal::MAX);
        assert_eq!(rolled.attainment().tier, crate::core::attainment::Tier::OnPace);
    }

    #[test]
    fn unknown_category_is_other() {
        let category: Category = serde_json::from_str(r#""enamel""#).unwrap();
        assert_eq!(category, Category::Other);
    }
}
