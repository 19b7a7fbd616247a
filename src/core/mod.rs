pub mod attainment;
pub mod channel;
pub mod delta;
pub mod export;
pub mod hierarchy;
pub mod import;
pub mod period;
pub mod response;
pub mod warnings;
pub mod yoy;

// Flat public surface for domain types and functions.
pub use attainment::Attainment;
pub use channel::{resolve, Channel};
pub use delta::{delta, Delta};
pub use export::{annual_file_name, period_file_name, to_annual_csv, to_csv};
pub use hierarchy::{aggregate, sort_by_urgency, CategoryAggregate, NodeValues, RollupTotals};
pub use import::parse_annual_csv;
pub use period::Period;
pub use response::{read_annual_json, read_budget_json, AnnualSkuTarget, BudgetResponse};
pub use warnings::Warning;
pub use yoy::{pivot, read_budget_rows, summarize, write_pivot_csv, BudgetRow};

/// Column of a CSV input format, generated by `#[derive(CsvColumns)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumn {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}
