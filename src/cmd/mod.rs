pub mod annual;
pub mod compare;
pub mod dashboard;
pub mod export;
pub mod pivot;
pub mod schema;
pub mod validate;

use crate::core::{self, AnnualSkuTarget, BudgetResponse, Channel};
use anyhow::Context;
use clap::ValueEnum;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ChannelArg {
    #[default]
    Combined,
    Retail,
    Wholesale,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Combined => Channel::Combined,
            ChannelArg::Retail => Channel::Retail,
            ChannelArg::Wholesale => Channel::Wholesale,
        }
    }
}

/// Read a budget response (JSON) from a file, or stdin with "-"
pub fn read_budget(path: &Path) -> anyhow::Result<BudgetResponse> {
    core::read_budget_json(open_input(path)?)
        .with_context(|| format!("reading budget response from {}", path.display()))
}

/// Read annual SKU targets (JSON array) from a file, or stdin with "-"
pub fn read_annual(path: &Path) -> anyhow::Result<Vec<AnnualSkuTarget>> {
    core::read_annual_json(open_input(path)?)
        .with_context(|| format!("reading annual targets from {}", path.display()))
}

pub fn open_input(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        Ok(Box::new(io::Cursor::new(buffer)))
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Write CSV text exactly as given to `path`, or to stdout when no path is given
pub fn write_output(text: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("Wrote {}", path.display());
            eprintln!("Wrote {}", path.display());
        }
        None => {
            // Same bytes as the file
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
