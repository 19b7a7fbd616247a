//! Year-over-year budget comparison from flat budget rows.

use super::channel::Channel;
use super::delta::{delta, Delta};
use super::export::MONTHS;
use super::CsvColumn;
use pacer_derive::CsvColumns;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// One budget cell: a SKU's budget for a month on one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, CsvColumns)]
pub struct BudgetRow {
    /// Product SKU
    pub sku: String,
    /// Calendar year of the budget
    pub year: i32,
    /// Month number, 1 = January
    pub month: u32,
    /// retail, wholesale or total (retail + wholesale)
    pub channel: Channel,
    /// Budgeted amount for the month
    pub budget: Decimal,
}

/// Read flat budget rows from CSV
pub fn read_budget_rows<R: Read>(reader: R) -> anyhow::Result<Vec<BudgetRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let row: BudgetRow = result?;
        if !(1..=12).contains(&row.month) {
            anyhow::bail!("line {}: month {} is not between 1 and 12", i + 2, row.month);
        }
        rows.push(row);
    }
    log::info!("Read {} budget rows", rows.len());
    Ok(rows)
}

/// Budget change between two years on one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelChange {
    pub channel: Channel,
    pub base: Decimal,
    pub target: Decimal,
    pub change: Delta,
}

fn channel_total(rows: &[BudgetRow], year: i32, channel: Channel) -> Decimal {
    rows.iter()
        .filter(|r| r.year == year && r.channel == channel)
        .map(|r| r.budget)
        .sum()
}

/// Compare total budgets of `target_year` against `base_year` per channel
pub fn summarize(rows: &[BudgetRow], base_year: i32, target_year: i32) -> Vec<ChannelChange> {
    [Channel::Retail, Channel::Wholesale, Channel::Combined]
        .into_iter()
        .map(|channel| {
            let base = channel_total(rows, base_year, channel);
            let target = channel_total(rows, target_year, channel);
            ChannelChange {
                channel,
                base,
                target,
                change: delta(target, base),
            }
        })
        .collect()
}

/// SKU by month grid for one year and channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotRow {
    pub sku: String,
    pub months: [Decimal; 12],
}

impl PivotRow {
    pub fn total(&self) -> Decimal {
        self.months.iter().sum()
    }
}

/// Pivot rows into one line per SKU, sorted by SKU. Repeated cells add up.
pub fn pivot(rows: &[BudgetRow], year: i32, channel: Channel) -> Vec<PivotRow> {
    let mut grid: BTreeMap<&str, [Decimal; 12]> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.year == year && r.channel == channel) {
        let months = grid.entry(row.sku.as_str()).or_insert([Decimal::ZERO; 12]);
        if let Some(cell) = (row.month as usize).checked_sub(1).and_then(|m| months.get_mut(m)) {
            *cell += row.budget;
        }
    }
    grid.into_iter()
        .map(|(sku, months)| PivotRow {
            sku: sku.to_string(),
            months,
        })
        .collect()
}

pub fn write_pivot_csv<W: Write>(rows: &[PivotRow], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["SKU"];
    header.extend(MONTHS);
    header.push("TOTAL");
    wtr.write_record(&header)?;
    for row in rows {
        let mut record = vec![row.sku.clone()];
        record.extend(row.months.iter().map(|m| m.normalize().to_string()));
        record.push(row.total().normalize().to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ROWS: &str = "\
sku,year,month,channel,budget
CI-12,2025,1,retail,100
CI-12,2025,1,wholesale,50
CI-12,2025,1,total,150
CI-12,2026,1,retail,120
CI-12,2026,2,retail,30
CI-12,2026,1,total,150
CS-10,2026,3,wholesale,40
CS-10,2026,3,total,40
";

    #[test]
    fn reads_rows_with_total_alias() {
        let rows = read_budget_rows(ROWS.as_bytes()).unwrap();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[2].channel, Channel::Combined);
        assert_eq!(rows[0].budget, dec!(100));
    }

    #[test]
    fn rejects_out_of_range_month() {
        let csv = "sku,year,month,channel,budget\nCI-12,2025,13,retail,1\n";
        assert!(read_budget_rows(csv.as_bytes()).is_err());
    }

    #[test]
    fn summary_per_channel() {
        let rows = read_budget_rows(ROWS.as_bytes()).unwrap();
        let summary = summarize(&rows, 2025, 2026);
        assert_eq!(summary.len(), 3);

        let retail = &summary[0];
        assert_eq!(retail.channel, Channel::Retail);
        assert_eq!(retail.base, dec!(100));
        assert_eq!(retail.target, dec!(150));
        assert_eq!(retail.change.percent, Some(dec!(50)));

        let wholesale = &summary[1];
        assert_eq!(wholesale.change.absolute, dec!(-10));
        assert_eq!(wholesale.change.percent, Some(dec!(-20)));

        let total = &summary[2];
        assert_eq!(total.base, dec!(150));
        assert_eq!(total.target, dec!(190));
    }

    #[test]
    fn summary_without_base_year_has_no_percent() {
        let rows = read_budget_rows(ROWS.as_bytes()).unwrap();
        let summary = summarize(&rows, 2024, 2026);
        assert!(summary.iter().all(|c| c.change.percent.is_none()));
    }

    #[test]
    fn pivot_sorted_by_sku() {
        let rows = read_budget_rows(ROWS.as_bytes()).unwrap();
        let grid = pivot(&rows, 2026, Channel::Combined);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].sku, "CI-12");
        assert_eq!(grid[0].months[0], dec!(150));
        assert_eq!(grid[1].sku, "CS-10");
        assert_eq!(grid[1].months[2], dec!(40));
        assert_eq!(grid[1].total(), dec!(40));
    }

    #[test]
    fn pivot_csv_output() {
        let rows = read_budget_rows(ROWS.as_bytes()).unwrap();
        let grid = pivot(&rows, 2026, Channel::Retail);
        let mut out = Vec::new();
        write_pivot_csv(&grid, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "SKU,Jan,Feb,Mar,Apr,May,Jun,Jul,Aug,Sep,Oct,Nov,Dec,TOTAL\n\
             CI-12,120,30,0,0,0,0,0,0,0,0,0,0,150\n"
        );
    }

    #[test]
    fn derived_columns_follow_fields() {
        assert_eq!(BudgetRow::csv_header(), "sku,year,month,channel,budget");
        let columns = BudgetRow::csv_columns();
        assert_eq!(columns.len(), 5);
        assert!(columns.iter().all(|c| c.required));
        assert_eq!(columns[2].description, "Month number, 1 = January");
    }
}
