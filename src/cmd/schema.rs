//! Schema command - print expected input formats

use crate::core::export::annual_header;
use crate::core::{AnnualSkuTarget, BudgetResponse, BudgetRow};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Which input format to describe
    #[arg(value_enum, default_value = "budget-json")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the period budget response
    BudgetJson,
    /// JSON Schema for the annual SKU targets array
    AnnualJson,
    /// Header row of the annual target grid CSV
    AnnualCsv,
    /// Header row of the flat budget rows CSV
    BudgetRows,
    /// Column descriptions of the flat budget rows CSV
    BudgetRowsFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::BudgetJson => {
                let schema = schema_for!(BudgetResponse);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::AnnualJson => {
                let schema = schema_for!(Vec<AnnualSkuTarget>);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::AnnualCsv => println!("{}", annual_header()),
            SchemaFormat::BudgetRows => println!("{}", BudgetRow::csv_header()),
            SchemaFormat::BudgetRowsFields => print_budget_row_fields(),
        }
        Ok(())
    }
}

fn print_budget_row_fields() {
    println!("Budget Rows CSV Format");
    println!("======================");
    println!();
    for column in BudgetRow::csv_columns() {
        let req = if column.required { "required" } else { "optional" };
        println!("{:10} ({:8})  {}", column.name, req, column.description);
    }
    println!();
    println!("channel=total rows hold the combined budget and are not summed with retail/wholesale");
}
