use super::hierarchy::{check_totals, CategoryAggregate, Category, Metrics};
use super::period::{Period, PeriodError};
use super::warnings::Warning;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Budget-vs-actual snapshot for one period, as served by the budget API
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    /// Human label of the date range (e.g. "Month to Date")
    pub period_label: String,
    pub days_elapsed: u32,
    pub days_in_period: u32,
    pub categories: Vec<CategoryAggregate>,
    pub cookware_total: Metrics,
    pub grand_total: Metrics,
    /// Prior period for delta display; absent means no comparison
    #[serde(default)]
    pub comparison: Option<ComparisonPeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPeriod {
    pub label: String,
    pub cookware_total: Metrics,
    pub grand_total: Metrics,
}

impl BudgetResponse {
    pub fn period(&self) -> Result<Period, PeriodError> {
        Period::new(self.days_elapsed, self.days_in_period)
    }

    /// Categories with the given SKUs left out
    pub fn categories_excluding(&self, skus: &[String]) -> Vec<CategoryAggregate> {
        self.categories
            .iter()
            .map(|c| {
                skus.iter()
                    .fold(c.clone(), |category, sku| category.without_sku(sku))
            })
            .collect()
    }

    pub fn check_totals(&self) -> Vec<Warning> {
        check_totals(&self.categories, &self.cookware_total, &self.grand_total)
    }
}

/// Read a budget response from JSON
pub fn read_budget_json<R: Read>(reader: R) -> anyhow::Result<BudgetResponse> {
    let response: BudgetResponse = serde_json::from_reader(reader)?;
    log::info!(
        "Read {} categories, {} skus for '{}'",
        response.categories.len(),
        response.categories.iter().map(|c| c.skus.len()).sum::<usize>(),
        response.period_label
    );
    Ok(response)
}

/// Annual production target for one SKU
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnualSkuTarget {
    pub sku: String,
    pub display_name: String,
    pub category: Category,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub annual_target: Decimal,
    /// Twelve values, January first
    #[serde(default)]
    #[schemars(with = "Vec<f64>")]
    pub monthly_targets: Vec<Decimal>,
}

impl AnnualSkuTarget {
    /// Monthly targets padded with zeros (or cut) to exactly twelve
    pub fn months(&self) -> [Decimal; 12] {
        let mut months = [Decimal::ZERO; 12];
        for (slot, value) in months.iter_mut().zip(&self.monthly_targets) {
            *slot = *value;
        }
        months
    }

    pub fn monthly_total(&self) -> Decimal {
        self.months().iter().sum()
    }

    pub fn warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if self.monthly_targets.len() != 12 {
            warnings.push(Warning::MonthlyTargetsLength {
                sku: self.sku.clone(),
                len: self.monthly_targets.len(),
            });
        }
        let monthly_sum = self.monthly_total();
        if monthly_sum != self.annual_target {
            warnings.push(Warning::AnnualTargetMismatch {
                sku: self.sku.clone(),
                annual_target: self.annual_target,
                monthly_sum,
            });
        }
        warnings
    }
}

/// Read annual targets from a JSON array
pub fn read_annual_json<R: Read>(reader: R) -> anyhow::Result<Vec<AnnualSkuTarget>> {
    let targets: Vec<AnnualSkuTarget> = serde_json::from_reader(reader)?;
    log::info!("Read {} annual sku targets", targets.len());
    Ok(targets)
}
