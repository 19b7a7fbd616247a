//! Compare command - year-over-year budget change per channel

use crate::cmd::open_input;
use crate::core::yoy::ChannelChange;
use crate::core::{read_budget_rows, summarize};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CompareCommand {
    /// Flat budget rows CSV (sku,year,month,channel,budget). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Year to compare against
    #[arg(short, long)]
    base: i32,

    /// Year being reviewed
    #[arg(short, long)]
    target: i32,

    /// Output as CSV instead of a formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct CompareRow {
    #[tabled(rename = "Channel")]
    #[serde(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Base")]
    #[serde(rename = "Base")]
    base: String,
    #[tabled(rename = "Target")]
    #[serde(rename = "Target")]
    target: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    change: String,
    #[tabled(rename = "Change %")]
    #[serde(rename = "Change %")]
    change_pct: String,
}

impl From<&ChannelChange> for CompareRow {
    fn from(c: &ChannelChange) -> Self {
        CompareRow {
            channel: c.channel.as_str().to_uppercase(),
            base: amount(c.base),
            target: amount(c.target),
            change: amount(c.change.absolute),
            change_pct: c.change.percent_display(),
        }
    }
}

impl CompareCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rows = read_budget_rows(open_input(&self.file)?)?;
        let summary = summarize(&rows, self.base, self.target);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        let table_rows: Vec<CompareRow> = summary.iter().map(CompareRow::from).collect();
        if self.csv {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            for row in &table_rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        } else {
            println!();
            println!("BUDGET {} VS {}", self.target, self.base);
            println!();
            let table = Table::new(&table_rows)
                .with(Style::rounded())
                .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
        }
        Ok(())
    }
}

fn amount(value: Decimal) -> String {
    value.round_dp(2).normalize().to_string()
}
