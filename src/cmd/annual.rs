//! Annual command - production target grid export and import

use crate::cmd::{open_input, read_annual, write_output};
use crate::core::{annual_file_name, parse_annual_csv, to_annual_csv};
use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct AnnualCommand {
    #[command(subcommand)]
    action: AnnualAction,
}

#[derive(Subcommand, Debug)]
enum AnnualAction {
    /// Write the SKU x month target grid as CSV
    Export(AnnualExport),
    /// Read an edited grid and print the update payload as JSON
    Import(AnnualImport),
}

#[derive(Args, Debug)]
struct AnnualExport {
    /// Annual SKU targets JSON. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    targets: PathBuf,

    /// Budget year
    #[arg(short, long)]
    year: i32,

    /// Output file (defaults to production-budget-<year>.csv)
    #[arg(short, long, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the CSV instead of writing a file
    #[arg(long)]
    stdout: bool,
}

#[derive(Args, Debug)]
struct AnnualImport {
    /// Annual SKU targets JSON the grid was exported from
    #[arg(short, long)]
    targets: PathBuf,

    /// Edited annual grid CSV
    csv: PathBuf,

    /// Budget year the updates apply to
    #[arg(short, long)]
    year: i32,
}

impl AnnualCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match &self.action {
            AnnualAction::Export(export) => export.exec(),
            AnnualAction::Import(import) => import.exec(),
        }
    }
}

impl AnnualExport {
    fn exec(&self) -> anyhow::Result<()> {
        let targets = read_annual(&self.targets)?;
        let csv = to_annual_csv(&targets);
        let path = if self.stdout {
            None
        } else {
            Some(
                self.output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(annual_file_name(self.year))),
            )
        };
        write_output(&csv, path.as_deref())
    }
}

impl AnnualImport {
    fn exec(&self) -> anyhow::Result<()> {
        let targets = read_annual(&self.targets)?;
        let reader = open_input(&self.csv)?;
        let outcome = parse_annual_csv(reader, &targets, self.year)
            .with_context(|| format!("importing {}", self.csv.display()))?;

        for row in &outcome.skipped {
            eprintln!("skipped line {}: {}", row.line, row.reason);
        }
        println!("{}", serde_json::to_string_pretty(&outcome.payload)?);
        Ok(())
    }
}
