//! Pivot command - SKU x month budget grid for one year and channel

use crate::cmd::{open_input, ChannelArg};
use crate::core::{pivot, read_budget_rows, write_pivot_csv, Channel};
use clap::Args;
use std::io;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct PivotCommand {
    /// Flat budget rows CSV (sku,year,month,channel,budget). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Budget year
    #[arg(short, long)]
    year: i32,

    /// Channel to pivot; combined reads the `total` rows
    #[arg(short, long, value_enum, default_value_t = ChannelArg::Combined)]
    channel: ChannelArg,
}

impl PivotCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rows = read_budget_rows(open_input(&self.file)?)?;
        let channel: Channel = self.channel.into();
        let grid = pivot(&rows, self.year, channel);
        if grid.is_empty() {
            log::warn!("No {} budget rows for {}", channel, self.year);
        }
        write_pivot_csv(&grid, io::stdout())
    }
}
