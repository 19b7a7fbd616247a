//! Validate command - surface data quality issues without generating reports

use crate::cmd::{read_annual, read_budget};
use crate::core::Warning;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Budget response JSON to check
    #[arg(short, long)]
    budget: Option<PathBuf>,

    /// Annual SKU targets JSON to check
    #[arg(short, long)]
    annual: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    issue_count: usize,
    issues: &'a [Warning],
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if self.budget.is_none() && self.annual.is_none() {
            anyhow::bail!("Nothing to validate. Pass --budget and/or --annual.");
        }

        let mut issues = Vec::new();
        if let Some(path) = &self.budget {
            let response = read_budget(path)?;
            // Fails outright on an impossible period
            response.period()?;
            issues.extend(response.check_totals());
        }
        if let Some(path) = &self.annual {
            let targets = read_annual(path)?;
            issues.extend(targets.iter().flat_map(|t| t.warnings()));
        }

        if self.json {
            let output = ValidationOutput {
                issue_count: issues.len(),
                issues: &issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(issues: &[Warning]) {
    println!();
    println!("VALIDATION RESULTS");
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
    } else {
        println!("\u{26A0} {} issue(s) found:", issues.len());
        println!();

        for (i, issue) in issues.iter().enumerate() {
            println!("  {}. [{}] {}", i + 1, issue.kind(), issue.subject());
            println!("     {}", issue.message());
            println!();
        }
    }
}
