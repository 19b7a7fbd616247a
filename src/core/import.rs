//! Import of an edited annual target grid.
//!
//! Rows are matched to SKUs by exact display name. Subtotal and grand total
//! rows are recognised by name and skipped. Malformed or unmatched rows are
//! skipped one by one; only a wrong header or a file where nothing matched
//! rejects the whole import.

use super::export::{annual_header, subtotal_label, ANNUAL_GRAND_TOTAL};
use super::response::AnnualSkuTarget;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::str::FromStr;

/// SKU name, category, twelve months and the total
const COLUMN_COUNT: usize = 15;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("header does not match the annual template: expected '{expected}', found '{found}'")]
    HeaderMismatch { expected: String, found: String },
    #[error("no rows matched a known product ({skipped} skipped); check the file is the {year} template")]
    NoMatchingRows { year: i32, skipped: usize },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Update payload for the annual targets endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportPayload {
    pub year: i32,
    pub updates: Vec<SkuUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuUpdate {
    pub sku: String,
    #[serde(serialize_with = "as_numbers")]
    pub monthly_targets: [Decimal; 12],
}

fn as_numbers<S>(values: &[Decimal; 12], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use rust_decimal::prelude::ToPrimitive;
    serializer.collect_seq(values.iter().map(|v| v.to_f64().unwrap_or_default()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line in the file
    pub line: u64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SkipReason {
    ColumnCount { found: usize },
    InvalidText,
    InvalidNumber { column: String, value: String },
    UnknownProduct { name: String },
    DuplicateProduct { name: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ColumnCount { found } => {
                write!(f, "expected {} columns, found {}", COLUMN_COUNT, found)
            }
            SkipReason::InvalidNumber { column, value } => {
                write!(f, "invalid number '{}' in {}", value, column)
            }
            SkipReason::InvalidText => write!(f, "row is not valid UTF-8"),
            SkipReason::UnknownProduct { name } => write!(f, "no product named '{}'", name),
            SkipReason::DuplicateProduct { name } => {
                write!(f, "'{}' already appeared earlier in the file", name)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub payload: ImportPayload,
    pub skipped: Vec<SkippedRow>,
}

/// Parse an annual grid and build the update payload for `year`
pub fn parse_annual_csv<R: Read>(
    reader: R,
    targets: &[AnnualSkuTarget],
    year: i32,
) -> Result<ImportOutcome, ImportError> {
    // Names are matched verbatim, so fields are not trimmed here
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    // First match wins for duplicated display names
    let mut by_name: HashMap<&str, &AnnualSkuTarget> = HashMap::new();
    for target in targets {
        by_name.entry(target.display_name.as_str()).or_insert(target);
    }
    let mut total_rows: HashSet<String> = targets
        .iter()
        .map(|t| subtotal_label(t.category.label()))
        .collect();
    total_rows.insert(ANNUAL_GRAND_TOTAL.to_string());

    let mut records = rdr.byte_records();
    let expected = annual_header();
    let header = match records.next() {
        Some(record) => record?
            .iter()
            .map(|field| String::from_utf8_lossy(field).trim().to_string())
            .collect::<Vec<_>>()
            .join(","),
        None => String::new(),
    };
    if header != expected {
        return Err(ImportError::HeaderMismatch {
            expected,
            found: header,
        });
    }

    let mut updates = Vec::new();
    let mut skipped = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for record in records {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let record = match csv::StringRecord::from_byte_record(record) {
            Ok(record) => record,
            Err(_) => {
                skip(&mut skipped, line, SkipReason::InvalidText);
                continue;
            }
        };

        if record.len() != COLUMN_COUNT {
            skip(&mut skipped, line, SkipReason::ColumnCount { found: record.len() });
            continue;
        }
        let name = &record[0];
        // A product named like a total row is still a product
        let Some(&target) = by_name.get(name) else {
            if total_rows.contains(name) {
                log::debug!("line {}: skipping total row '{}'", line, name);
            } else {
                skip(
                    &mut skipped,
                    line,
                    SkipReason::UnknownProduct {
                        name: name.to_string(),
                    },
                );
            }
            continue;
        };
        if seen.contains(target.sku.as_str()) {
            skip(
                &mut skipped,
                line,
                SkipReason::DuplicateProduct {
                    name: name.to_string(),
                },
            );
            continue;
        }
        match parse_months(&record) {
            Ok(monthly_targets) => {
                seen.insert(target.sku.as_str());
                updates.push(SkuUpdate {
                    sku: target.sku.clone(),
                    monthly_targets,
                });
            }
            Err(reason) => skip(&mut skipped, line, reason),
        }
    }

    if updates.is_empty() {
        return Err(ImportError::NoMatchingRows {
            year,
            skipped: skipped.len(),
        });
    }
    log::info!(
        "Matched {} rows for {}, skipped {}",
        updates.len(),
        year,
        skipped.len()
    );

    Ok(ImportOutcome {
        payload: ImportPayload { year, updates },
        skipped,
    })
}

fn skip(skipped: &mut Vec<SkippedRow>, line: u64, reason: SkipReason) {
    log::warn!("line {}: {}", line, reason);
    skipped.push(SkippedRow { line, reason });
}

fn parse_months(record: &csv::StringRecord) -> Result<[Decimal; 12], SkipReason> {
    let mut months = [Decimal::ZERO; 12];
    for (i, month) in months.iter_mut().enumerate() {
        let raw = &record[i + 2];
        *month = parse_amount(raw).ok_or_else(|| SkipReason::InvalidNumber {
            column: super::export::MONTHS[i].to_string(),
            value: raw.to_string(),
        })?;
    }
    Ok(months)
}

/// Empty cells count as zero; padding and thousands separators are tolerated
fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(&cleaned).ok()
}
