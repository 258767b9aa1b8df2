//! Price history input.
//!
//! Prices come from a CSV file whose first column is a date and whose other
//! headers are ticker symbols:
//!
//! ```text
//! Date,VTI,BND,GLD
//! 2021-01-04,190.12,87.40,
//! 2021-01-05,191.80,87.35,180.01
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use frontier_core::PriceTable;
use jiff::ToSpan;
use jiff::civil::Date;
use tracing::{debug, info, warn};

use crate::error::InputError;

/// Split user text into ticker symbols.
///
/// Symbols are separated by commas or whitespace, upper-cased, and
/// de-duplicated keeping the first occurrence.
pub fn parse_tickers(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Prices for the requested tickers plus the requested tickers the source
/// did not have.
#[derive(Debug, Clone)]
pub struct LoadedPrices {
    pub table: PriceTable,
    pub missing: Vec<String>,
}

pub trait PriceSource {
    /// Load closing prices for `tickers`, or for every available asset when
    /// `tickers` is empty.
    fn load(&self, tickers: &[String]) -> Result<LoadedPrices, InputError>;
}

#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
    lookback_years: Option<i16>,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lookback_years: None,
        }
    }

    /// Keep only rows within `years` of the latest date in the file
    #[must_use]
    pub fn with_lookback_years(mut self, years: Option<i16>) -> Self {
        self.lookback_years = years;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<PriceTable, InputError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let tickers: Vec<String> = reader
            .headers()?
            .iter()
            .skip(1)
            .map(str::to_uppercase)
            .collect();
        if tickers.is_empty() {
            return Err(InputError::NoPriceColumns {
                path: self.path.clone(),
            });
        }

        let mut rows: Vec<(Date, Vec<Option<f64>>)> = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1
            let row = i + 2;

            let Some(raw_date) = record.get(0) else {
                continue;
            };
            if raw_date.is_empty() {
                debug!(row, "Skipping row without a date");
                continue;
            }
            let date = parse_date(raw_date).map_err(|source| InputError::Date {
                row,
                value: raw_date.to_string(),
                source,
            })?;

            let mut prices = Vec::with_capacity(tickers.len());
            for (col, ticker) in tickers.iter().enumerate() {
                let cell = record.get(col + 1).unwrap_or("");
                let price = parse_price(cell).ok_or_else(|| InputError::Price {
                    row,
                    column: ticker.clone(),
                    value: cell.to_string(),
                })?;
                prices.push(price);
            }
            rows.push((date, prices));
        }

        rows.sort_by_key(|(date, _)| *date);

        let dates: Vec<Date> = rows.iter().map(|(date, _)| *date).collect();
        let columns: Vec<Vec<Option<f64>>> = (0..tickers.len())
            .map(|col| rows.iter().map(|(_, prices)| prices[col]).collect())
            .collect();

        Ok(PriceTable::new(dates, tickers, columns)?)
    }
}

impl PriceSource for CsvPriceSource {
    fn load(&self, tickers: &[String]) -> Result<LoadedPrices, InputError> {
        let mut table = self.read_table()?;
        info!(
            path = %self.path.display(),
            assets = table.num_assets(),
            periods = table.num_periods(),
            "Read price file"
        );

        if let Some(years) = self.lookback_years
            && let Some(latest) = table.dates().last().copied()
        {
            let start = latest.saturating_sub(years.years());
            table = table.since(start);
            debug!(%start, periods = table.num_periods(), "Applied lookback window");
        }

        let mut missing = Vec::new();
        if !tickers.is_empty() {
            let available = table.tickers();
            let mut columns = Vec::new();
            let mut selected = Vec::new();
            for ticker in tickers {
                match available.iter().position(|t| t == ticker) {
                    Some(index) => {
                        selected.push(ticker.clone());
                        columns.push(table.column(index).to_vec());
                    }
                    None => {
                        warn!(ticker = %ticker, "Ticker not found in price file");
                        missing.push(ticker.clone());
                    }
                }
            }
            table = PriceTable::new(table.dates().to_vec(), selected, columns)?;
        }

        if table.is_empty() {
            return Err(InputError::Empty);
        }

        Ok(LoadedPrices { table, missing })
    }
}

/// Parse the date part of a cell, ignoring any time of day
fn parse_date(value: &str) -> Result<Date, jiff::Error> {
    let date_part = value.split([' ', 'T']).next().unwrap_or(value);
    date_part.parse()
}

/// `Some(None)` for a missing price, `None` when the cell is not a price
fn parse_price(cell: &str) -> Option<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(None);
    }
    match cell.to_ascii_lowercase().as_str() {
        "nan" | "null" | "na" | "n/a" => return Some(None),
        _ => {}
    }
    let price: f64 = cell.parse().ok()?;
    Some(price.is_finite().then_some(price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_csv(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("prices.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_tickers() {
        assert_eq!(parse_tickers("aapl, msft  goog"), vec!["AAPL", "MSFT", "GOOG"]);
        assert_eq!(parse_tickers(" vti,,bnd ,vti "), vec!["VTI", "BND"]);
        assert!(parse_tickers("  , ").is_empty());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("101.5"), Some(Some(101.5)));
        assert_eq!(parse_price(""), Some(None));
        assert_eq!(parse_price("NaN"), Some(None));
        assert_eq!(parse_price("null"), Some(None));
        assert_eq!(parse_price("abc"), None);
    }

    #[test]
    fn test_load_all_columns_sorted_by_date() {
        let dir = tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "Date,vti,bnd\n2024-01-03,102,50\n2024-01-02,101,\n2024-01-04 00:00:00,103,51\n",
        );

        let loaded = CsvPriceSource::new(path).load(&[]).unwrap();
        let table = loaded.table;

        assert!(loaded.missing.is_empty());
        assert_eq!(table.tickers(), ["VTI", "BND"]);
        assert_eq!(table.num_periods(), 3);
        assert_eq!(table.dates()[0], jiff::civil::date(2024, 1, 2));
        assert_eq!(table.column(0), [Some(101.0), Some(102.0), Some(103.0)]);
        assert_eq!(table.column(1), [None, Some(50.0), Some(51.0)]);
    }

    #[test]
    fn test_load_selected_reports_missing() {
        let dir = tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "Date,VTI,BND,GLD\n2024-01-02,1,2,3\n2024-01-03,1.1,2.1,3.1\n",
        );

        let requested = parse_tickers("gld, xyz, vti");
        let loaded = CsvPriceSource::new(path).load(&requested).unwrap();

        assert_eq!(loaded.table.tickers(), ["GLD", "VTI"]);
        assert_eq!(loaded.table.column(0), [Some(3.0), Some(3.1)]);
        assert_eq!(loaded.missing, vec!["XYZ".to_string()]);
    }

    #[test]
    fn test_load_none_found_is_empty() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "Date,VTI\n2024-01-02,1\n");

        let err = CsvPriceSource::new(path)
            .load(&["XYZ".to_string()])
            .unwrap_err();
        assert!(matches!(err, InputError::Empty));
    }

    #[test]
    fn test_lookback_window() {
        let dir = tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "Date,A,B\n2015-06-01,1,1\n2020-06-01,2,2\n2023-06-01,3,3\n2024-06-01,4,4\n",
        );

        let loaded = CsvPriceSource::new(path)
            .with_lookback_years(Some(2))
            .load(&[])
            .unwrap();

        assert_eq!(
            loaded.table.dates(),
            [jiff::civil::date(2023, 6, 1), jiff::civil::date(2024, 6, 1)]
        );
    }

    #[test]
    fn test_all_empty_column_is_kept_for_exclusion_later() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "Date,A,B\n2024-01-02,1,\n2024-01-03,2,NaN\n");

        let loaded = CsvPriceSource::new(path).load(&[]).unwrap();
        assert_eq!(loaded.table.num_assets(), 2);
        assert!(loaded.table.column(1).iter().all(Option::is_none));
    }

    #[test]
    fn test_bad_cells_are_errors() {
        let dir = tempdir().unwrap();

        let path = write_csv(dir.path(), "Date,A\nyesterday,1\n");
        let err = CsvPriceSource::new(path).load(&[]).unwrap_err();
        assert!(matches!(err, InputError::Date { row: 2, .. }));

        let path = write_csv(dir.path(), "Date,A\n2024-01-02,one\n");
        let err = CsvPriceSource::new(path).load(&[]).unwrap_err();
        assert!(matches!(err, InputError::Price { row: 2, .. }));
    }

    #[test]
    fn test_no_price_columns() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "Date\n2024-01-02\n");

        let err = CsvPriceSource::new(path).load(&[]).unwrap_err();
        assert!(matches!(err, InputError::NoPriceColumns { .. }));
    }
}
