//! Dashboard command - budget vs actual by SKU with rollups and status tiers

use crate::cmd::{read_budget, ChannelArg};
use crate::core::delta::format_pct;
use crate::core::export::{subtotal_label, COOKWARE_TOTAL, GRAND_TOTAL};
use crate::core::{
    aggregate, delta, resolve, sort_by_urgency, Attainment, BudgetResponse, CategoryAggregate,
    Channel, Delta, NodeValues, Period, RollupTotals,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct DashboardCommand {
    /// Budget response JSON. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Sales channel to report
    #[arg(short, long, value_enum, default_value_t = ChannelArg::Combined)]
    channel: ChannelArg,

    /// Leave a SKU out of the report and its totals (repeatable)
    #[arg(long = "exclude-sku")]
    exclude_skus: Vec<String>,

    /// Keep SKUs in input order instead of most urgent first
    #[arg(long)]
    input_order: bool,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

/// One row of the dashboard, SKU or total
#[derive(Debug, Clone, Serialize)]
struct NodeView {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sku: Option<String>,
    budget: Decimal,
    actual: Decimal,
    pace: Decimal,
    pct_of_budget: Option<Decimal>,
    variance: Delta,
    attainment: Attainment,
}

impl NodeView {
    fn new(name: &str, sku: Option<&str>, values: &NodeValues) -> Self {
        NodeView {
            name: name.to_string(),
            sku: sku.map(str::to_string),
            budget: values.budget,
            actual: values.actual,
            pace: values.pace,
            pct_of_budget: values.pct_of_budget(),
            variance: values.variance(),
            attainment: values.attainment(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CategoryView {
    name: String,
    skus: Vec<NodeView>,
    total: NodeView,
}

#[derive(Debug, Serialize)]
struct ComparisonView {
    label: String,
    cookware: Delta,
    grand: Delta,
}

#[derive(Debug, Serialize)]
struct DashboardData {
    period_label: String,
    channel: Channel,
    days_elapsed: u32,
    days_in_period: u32,
    percent_through: Decimal,
    categories: Vec<CategoryView>,
    cookware: NodeView,
    grand: NodeView,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<ComparisonView>,
}

#[derive(Debug, Clone, Tabled)]
struct DashboardRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Actual")]
    actual: String,
    #[tabled(rename = "Variance")]
    variance: String,
    #[tabled(rename = "Var %")]
    variance_pct: String,
    #[tabled(rename = "% Budget")]
    pct_of_budget: String,
    #[tabled(rename = "Pace")]
    pace: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl DashboardRow {
    fn new(category: &str, view: &NodeView) -> Self {
        DashboardRow {
            category: category.to_string(),
            product: if view.sku.is_some() {
                view.name.clone()
            } else {
                String::new()
            },
            sku: view.sku.clone().unwrap_or_default(),
            budget: format_amount(view.budget),
            actual: format_amount(view.actual),
            variance: format_signed(view.variance.absolute),
            variance_pct: view.variance.percent_display(),
            pct_of_budget: view.pct_of_budget.map_or("N/A".to_string(), format_pct),
            pace: if view.budget.is_zero() {
                "N/A".to_string()
            } else {
                format_pct(view.pace)
            },
            status: view.attainment.tier.label().to_string(),
        }
    }
}

impl DashboardCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let response = read_budget(&self.file)?;
        let channel: Channel = self.channel.into();
        let period = response.period()?;
        let categories = response.categories_excluding(&self.exclude_skus);
        let rollups = aggregate(&categories, channel, &period);

        let data = build_dashboard(&response, &categories, &rollups, &period, !self.input_order);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            print_dashboard(&data);
        }
        Ok(())
    }
}

fn build_dashboard(
    response: &BudgetResponse,
    categories: &[CategoryAggregate],
    rollups: &RollupTotals,
    period: &Period,
    by_urgency: bool,
) -> DashboardData {
    let channel = rollups.channel;

    let categories = rollups
        .categories
        .iter()
        .zip(categories)
        .map(|(total, source)| {
            let mut skus = source.skus.clone();
            if by_urgency {
                sort_by_urgency(&mut skus);
            }
            CategoryView {
                name: total.display_name.clone(),
                skus: skus
                    .iter()
                    .map(|s| NodeView::new(&s.display_name, Some(&s.sku), &s.resolved(channel)))
                    .collect(),
                total: NodeView::new(&subtotal_label(&total.display_name), None, &total.totals),
            }
        })
        .collect();

    let comparison = response.comparison.as_ref().map(|c| ComparisonView {
        label: c.label.clone(),
        cookware: delta(rollups.cookware.actual, resolve(channel, &c.cookware_total.actual)),
        grand: delta(rollups.grand.actual, resolve(channel, &c.grand_total.actual)),
    });

    DashboardData {
        period_label: response.period_label.clone(),
        channel,
        days_elapsed: period.days_elapsed(),
        days_in_period: period.days_in_period(),
        percent_through: period.percent_through(),
        categories,
        cookware: NodeView::new(COOKWARE_TOTAL, None, &rollups.cookware),
        grand: NodeView::new(GRAND_TOTAL, None, &rollups.grand),
        comparison,
    }
}

fn print_dashboard(data: &DashboardData) {
    println!();
    println!(
        "BUDGET VS ACTUAL ({}, {}) - {} through period ({}/{} days)",
        data.period_label,
        data.channel,
        format_pct(data.percent_through),
        data.days_elapsed,
        data.days_in_period
    );
    println!();

    let mut rows = Vec::new();
    for category in &data.categories {
        for sku in &category.skus {
            rows.push(DashboardRow::new(&category.name, sku));
        }
        rows.push(DashboardRow::new(&category.total.name, &category.total));
    }
    rows.push(DashboardRow::new(&data.cookware.name, &data.cookware));
    rows.push(DashboardRow::new(&data.grand.name, &data.grand));

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..9)).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    if let Some(comparison) = &data.comparison {
        println!();
        println!("VS {}", comparison.label.to_uppercase());
        println!("  Cookware: {}", format_delta(&comparison.cookware));
        println!("  Total:    {}", format_delta(&comparison.grand));
    }
    println!();
}

fn format_amount(amount: Decimal) -> String {
    amount.round_dp(2).normalize().to_string()
}

fn format_signed(amount: Decimal) -> String {
    if amount > Decimal::ZERO {
        format!("+{}", format_amount(amount))
    } else {
        format_amount(amount)
    }
}

fn format_delta(d: &Delta) -> String {
    let pct = match d.percent {
        Some(pct) if d.is_favorable() && !pct.is_zero() => format!("+{}", format_pct(pct)),
        _ => d.percent_display(),
    };
    format!("{} ({})", format_signed(d.absolute), pct)
}
