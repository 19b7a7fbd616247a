//! Export command - period budget vs actual CSV

use crate::cmd::{read_budget, write_output, ChannelArg};
use crate::core::{aggregate, period_file_name, to_csv, Channel};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportCommand {
    /// Budget response JSON. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Sales channel to export
    #[arg(short, long, value_enum, default_value_t = ChannelArg::Combined)]
    channel: ChannelArg,

    /// Leave a SKU out of the export and its totals (repeatable)
    #[arg(long = "exclude-sku")]
    exclude_skus: Vec<String>,

    /// Output file (defaults to budget-vs-actual-<channel>-<range>-<date>.csv)
    #[arg(short, long, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the CSV instead of writing a file
    #[arg(long)]
    stdout: bool,
}

impl ExportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let response = read_budget(&self.file)?;
        let channel: Channel = self.channel.into();
        let period = response.period()?;
        let categories = response.categories_excluding(&self.exclude_skus);
        let rollups = aggregate(&categories, channel, &period);

        let csv = to_csv(&categories, &rollups, channel);

        let path = if self.stdout {
            None
        } else {
            Some(self.output.clone().unwrap_or_else(|| {
                let today = chrono::Local::now().date_naive();
                PathBuf::from(period_file_name(channel, &response.period_label, today))
            }))
        };
        write_output(&csv, path.as_deref())
    }
}
