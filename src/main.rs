use clap::{Parser, Subcommand};

mod cmd;
mod core;

#[derive(Parser, Debug)]
#[command(name = "pacer")]
#[command(version, about = "Budget vs actual pacing for product sales")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the budget pacing dashboard for a period
    Dashboard(cmd::dashboard::DashboardCommand),
    /// Export a period's budget vs actual as CSV
    Export(cmd::export::ExportCommand),
    /// Export or import the annual SKU x month target grid
    Annual(cmd::annual::AnnualCommand),
    /// Check inputs for total drift and malformed targets
    Validate(cmd::validate::ValidateCommand),
    /// Compare budgets between two years per channel
    Compare(cmd::compare::CompareCommand),
    /// Pivot flat budget rows into a SKU x month grid
    Pivot(cmd::pivot::PivotCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Dashboard(dashboard) => dashboard.exec(),
        Command::Export(export) => export.exec(),
        Command::Annual(annual) => annual.exec(),
        Command::Validate(validate) => validate.exec(),
        Command::Compare(compare) => compare.exec(),
        Command::Pivot(pivot) => pivot.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
