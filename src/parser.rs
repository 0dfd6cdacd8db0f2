//! CSV parser for cumulative status datasets.
//!
//! Columns are looked up by header name so the tool survives the dataset
//! adding or reordering columns. Blank numeric cells read as 0, matching
//! how the publisher leaves early-history cells empty.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::warn;

use crate::series::CaseSeries;

/// Header names to pull out of the dataset.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub date_column: String,
    pub cases_column: String,
    pub tests_column: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            cases_column: "total_cases".to_string(),
            tests_column: "total_tests".to_string(),
        }
    }
}

/// Validated series parsed from one dataset snapshot.
#[derive(Debug, Clone)]
pub struct ParsedDataset {
    pub cases: CaseSeries,
    /// Cumulative test counts, when the column exists and validates.
    pub tests: Option<CaseSeries>,
}

/// Parses a CSV body into validated cumulative series.
///
/// Rows are sorted by date before validation, so shuffled exports are
/// fine; duplicate dates and decreasing totals are not.
///
/// # Errors
///
/// Fails on unreadable CSV, a missing date or cases column, unparseable
/// cells, or a case series that violates the cumulative contract. A bad
/// tests column only costs the tests series, not the run.
pub fn parse_dataset(body: &[u8], options: &ParseOptions) -> Result<ParsedDataset> {
    let mut reader = csv::Reader::from_reader(body);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    let date_idx = find_column(&headers, &options.date_column)?;
    let cases_idx = find_column(&headers, &options.cases_column)?;
    let tests_idx = headers
        .iter()
        .position(|h| h.trim() == options.tests_column);

    let mut rows: Vec<(NaiveDate, u64, Option<u64>)> = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading CSV row {}", line + 2))?;

        let date_cell = record.get(date_idx).unwrap_or_default().trim();
        // Timestamped exports carry a time suffix; the first 10 chars are
        // the ISO date.
        let date: NaiveDate = date_cell
            .get(..10)
            .unwrap_or(date_cell)
            .parse()
            .with_context(|| format!("row {}: bad date {date_cell:?}", line + 2))?;

        let cases = parse_count(record.get(cases_idx).unwrap_or_default())
            .with_context(|| format!("row {}: bad case count", line + 2))?;
        let tests = match tests_idx {
            Some(idx) => Some(
                parse_count(record.get(idx).unwrap_or_default())
                    .with_context(|| format!("row {}: bad test count", line + 2))?,
            ),
            None => None,
        };

        rows.push((date, cases, tests));
    }

    rows.sort_by_key(|&(date, _, _)| date);

    let case_pairs = rows.iter().map(|&(d, c, _)| (d, c)).collect();
    let cases = CaseSeries::cumulative(case_pairs).context("validating case series")?;

    let tests = match tests_idx {
        Some(_) => {
            let test_pairs = rows.iter().map(|&(d, _, t)| (d, t.unwrap_or(0))).collect();
            match CaseSeries::cumulative(test_pairs) {
                Ok(series) => Some(series),
                Err(e) => {
                    warn!(error = %e, "tests column failed validation, dropping it");
                    None
                }
            }
        }
        None => None,
    };

    Ok(ParsedDataset { cases, tests })
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    match headers.iter().position(|h| h.trim() == name) {
        Some(idx) => Ok(idx),
        None => bail!("dataset has no {name:?} column (headers: {headers:?})"),
    }
}

/// An empty cell counts as 0; anything else must be a non-negative integer.
fn parse_count(cell: &str) -> Result<u64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(0);
    }
    cell.parse::<u64>()
        .with_context(|| format!("not a non-negative integer: {cell:?}"))
}
