//! CSV serialization of the budget hierarchy.
//!
//! Text fields are always quoted, amounts never are, so the output is
//! assembled line by line rather than through a record writer.

use super::channel::Channel;
use super::hierarchy::{CategoryAggregate, Category, NodeValues, RollupTotals};
use super::response::AnnualSkuTarget;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub const PERIOD_HEADER: &str = "Category,Product,SKU,Budget,Actual,Variance,Variance %";

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const COOKWARE_TOTAL: &str = "Cookware Total";
pub const GRAND_TOTAL: &str = "Grand Total";
/// Last row of the annual grid
pub const ANNUAL_GRAND_TOTAL: &str = "GRAND TOTAL";

pub fn subtotal_label(category: &str) -> String {
    format!("{} Total", category)
}

/// Quote a text field, doubling embedded quotes
pub fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn amount(value: Decimal) -> String {
    value.normalize().to_string()
}

fn period_row(category: &str, product: &str, sku: &str, values: &NodeValues) -> String {
    let variance = values.variance();
    format!(
        "{},{},{},{},{},{},{}",
        quote(category),
        quote(product),
        quote(sku),
        amount(values.budget),
        amount(values.actual),
        amount(variance.absolute),
        variance.percent_display()
    )
}

/// Period budget-vs-actual CSV for one channel.
///
/// Each category's SKU rows are followed by its subtotal, then the cookware
/// and grand totals close the file. `rollups` must come from aggregating
/// `categories` for the same channel.
pub fn to_csv(categories: &[CategoryAggregate], rollups: &RollupTotals, channel: Channel) -> String {
    debug_assert_eq!(rollups.channel, channel);
    debug_assert_eq!(rollups.categories.len(), categories.len());

    let mut lines = vec![PERIOD_HEADER.to_string()];
    for (category, total) in categories.iter().zip(&rollups.categories) {
        for sku in &category.skus {
            lines.push(period_row(
                &category.display_name,
                &sku.display_name,
                &sku.sku,
                &sku.resolved(channel),
            ));
        }
        lines.push(period_row(
            &subtotal_label(&category.display_name),
            "",
            "",
            &total.totals,
        ));
    }
    lines.push(period_row(COOKWARE_TOTAL, "", "", &rollups.cookware));
    lines.push(period_row(GRAND_TOTAL, "", "", &rollups.grand));
    lines.join("\n")
}

pub fn annual_header() -> String {
    let mut columns = vec!["SKU", "Category"];
    columns.extend(MONTHS);
    columns.push("Total");
    columns.join(",")
}

fn annual_row(name: &str, category: &str, months: &[Decimal; 12]) -> String {
    let mut fields = vec![quote(name), quote(category)];
    fields.extend(months.iter().map(|m| amount(*m)));
    fields.push(amount(months.iter().sum()));
    fields.join(",")
}

fn add_months(into: &mut [Decimal; 12], months: &[Decimal; 12]) {
    for (total, month) in into.iter_mut().zip(months) {
        *total += *month;
    }
}

/// Annual target grid: SKU rows grouped by category with subtotals, then
/// the grand total. The first column holds the display name, which is the
/// key used when the grid is imported back.
pub fn to_annual_csv(targets: &[AnnualSkuTarget]) -> String {
    let mut by_category: BTreeMap<Category, Vec<&AnnualSkuTarget>> = BTreeMap::new();
    for target in targets {
        by_category.entry(target.category).or_default().push(target);
    }

    let mut lines = vec![annual_header()];
    let mut grand = [Decimal::ZERO; 12];
    for (category, targets) in &by_category {
        let mut subtotal = [Decimal::ZERO; 12];
        for target in targets {
            let months = target.months();
            lines.push(annual_row(&target.display_name, category.label(), &months));
            add_months(&mut subtotal, &months);
        }
        lines.push(annual_row(
            &subtotal_label(category.label()),
            category.label(),
            &subtotal,
        ));
        add_months(&mut grand, &subtotal);
    }
    lines.push(annual_row(ANNUAL_GRAND_TOTAL, "", &grand));
    lines.join("\n")
}

/// `budget-vs-actual-<channel>-<range>-<yyyy-MM-dd>.csv`
pub fn period_file_name(channel: Channel, period_label: &str, date: NaiveDate) -> String {
    format!(
        "budget-vs-actual-{}-{}-{}.csv",
        channel,
        slug(period_label),
        date.format("%Y-%m-%d")
    )
}

pub fn annual_file_name(year: i32) -> String {
    format!("production-budget-{}.csv", year)
}

fn slug(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "period".to_string()
    } else {
        slug.to_string()
    }
}
