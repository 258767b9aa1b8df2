//! Price history and the log-return statistics derived from it.
//!
//! Missing observations are carried as `None` and skipped pairwise: a mean
//! uses every period where the asset has a return, a covariance uses every
//! period where both assets have one.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::{CovarianceError, DataError};
use crate::model::{CovarianceMatrix, MarketInputs};

/// Conventional number of trading periods per year for daily data
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Aligned closing prices: one date index shared by every asset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    dates: Vec<Date>,
    tickers: Vec<String>,
    /// `columns[asset][period]`
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn new(
        dates: Vec<Date>,
        tickers: Vec<String>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, DataError> {
        if tickers.len() != columns.len() {
            return Err(DataError::ShapeMismatch {
                asset: "<header>".to_string(),
                expected: tickers.len(),
                found: columns.len(),
            });
        }
        for (ticker, column) in tickers.iter().zip(&columns) {
            if column.len() != dates.len() {
                return Err(DataError::ShapeMismatch {
                    asset: ticker.clone(),
                    expected: dates.len(),
                    found: column.len(),
                });
            }
        }
        Ok(Self {
            dates,
            tickers,
            columns,
        })
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    #[must_use]
    pub fn column(&self, index: usize) -> &[Option<f64>] {
        &self.columns[index]
    }

    #[must_use]
    pub fn num_periods(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn num_assets(&self) -> usize {
        self.tickers.len()
    }

    /// True when there are no dates or no assets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.tickers.is_empty()
    }

    /// Remove assets without a single observed price and return their tickers.
    pub fn drop_empty_assets(&mut self) -> Vec<String> {
        let mut dropped = Vec::new();
        let mut kept_tickers = Vec::with_capacity(self.tickers.len());
        let mut kept_columns = Vec::with_capacity(self.columns.len());

        for (ticker, column) in self.tickers.drain(..).zip(self.columns.drain(..)) {
            if column.iter().all(Option::is_none) {
                dropped.push(ticker);
            } else {
                kept_tickers.push(ticker);
                kept_columns.push(column);
            }
        }

        self.tickers = kept_tickers;
        self.columns = kept_columns;
        dropped
    }

    /// Keep only the rows dated on or after `start`.
    #[must_use]
    pub fn since(&self, start: Date) -> Self {
        let keep: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| **d >= start)
            .map(|(i, _)| i)
            .collect();

        Self {
            dates: keep.iter().map(|&i| self.dates[i]).collect(),
            tickers: self.tickers.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| keep.iter().map(|&i| column[i]).collect())
                .collect(),
        }
    }

    /// Per-period log-returns `ln(p[t] / p[t-1])`.
    ///
    /// A return is missing when either price is missing or not strictly
    /// positive. The result has one period fewer than the table.
    #[must_use]
    pub fn log_returns(&self) -> ReturnMatrix {
        let series = self
            .columns
            .iter()
            .map(|column| AssetSeries {
                returns: column
                    .windows(2)
                    .map(|pair| match (pair[0], pair[1]) {
                        (Some(prev), Some(next)) if prev > 0.0 && next > 0.0 => {
                            Some((next / prev).ln())
                        }
                        _ => None,
                    })
                    .collect(),
            })
            .collect();

        ReturnMatrix {
            tickers: self.tickers.clone(),
            series,
        }
    }
}

/// Per-period log-returns of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSeries {
    pub returns: Vec<Option<f64>>,
}

impl AssetSeries {
    #[must_use]
    pub fn new(returns: Vec<Option<f64>>) -> Self {
        Self { returns }
    }

    /// Series with no missing observations
    #[must_use]
    pub fn complete(returns: &[f64]) -> Self {
        Self {
            returns: returns.iter().copied().map(Some).collect(),
        }
    }

    #[must_use]
    pub fn observations(&self) -> usize {
        self.returns.iter().flatten().count()
    }
}

/// Log-return matrix for N assets with a shared period alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnMatrix {
    tickers: Vec<String>,
    series: Vec<AssetSeries>,
}

impl ReturnMatrix {
    pub fn new(tickers: Vec<String>, series: Vec<AssetSeries>) -> Result<Self, DataError> {
        if tickers.is_empty() || tickers.len() != series.len() {
            return Err(DataError::NoAssets);
        }
        let periods = series[0].returns.len();
        for (ticker, s) in tickers.iter().zip(&series) {
            if s.returns.len() != periods {
                return Err(DataError::ShapeMismatch {
                    asset: ticker.clone(),
                    expected: periods,
                    found: s.returns.len(),
                });
            }
        }
        Ok(Self { tickers, series })
    }

    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    #[must_use]
    pub fn series(&self) -> &[AssetSeries] {
        &self.series
    }

    #[must_use]
    pub fn num_assets(&self) -> usize {
        self.series.len()
    }

    /// Annualized mean log-return of each asset.
    pub fn mean_returns(&self, periods_per_year: f64) -> Result<Vec<f64>, DataError> {
        self.series
            .iter()
            .zip(&self.tickers)
            .map(|(s, ticker)| {
                let observed: Vec<f64> = s.returns.iter().flatten().copied().collect();
                if observed.len() < 2 {
                    return Err(DataError::InsufficientData {
                        asset: ticker.clone(),
                        observations: observed.len(),
                    });
                }
                let mean = observed.iter().sum::<f64>() / observed.len() as f64;
                Ok(mean * periods_per_year)
            })
            .collect()
    }

    /// Annualized sample covariance (denominator `n - 1`) over
    /// pairwise-complete observations.
    pub fn covariance(&self, periods_per_year: f64) -> Result<CovarianceMatrix, DataError> {
        let n = self.series.len();
        let mut values = vec![0.0; n * n];

        for i in 0..n {
            for j in i..n {
                let pairs: Vec<(f64, f64)> = self.series[i]
                    .returns
                    .iter()
                    .zip(&self.series[j].returns)
                    .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                    .collect();

                if pairs.len() < 2 {
                    let asset = if i == j {
                        self.tickers[i].clone()
                    } else {
                        format!("{}/{}", self.tickers[i], self.tickers[j])
                    };
                    return Err(DataError::InsufficientData {
                        asset,
                        observations: pairs.len(),
                    });
                }

                let count = pairs.len() as f64;
                let mean_a = pairs.iter().map(|(a, _)| a).sum::<f64>() / count;
                let mean_b = pairs.iter().map(|(_, b)| b).sum::<f64>() / count;
                let cov = pairs
                    .iter()
                    .map(|(a, b)| (a - mean_a) * (b - mean_b))
                    .sum::<f64>()
                    / (count - 1.0);

                let annualized = cov * periods_per_year;
                values[i * n + j] = annualized;
                values[j * n + i] = annualized;
            }
        }

        Ok(CovarianceMatrix::from_symmetric(n, values))
    }

    /// Annualized mean vector and covariance matrix, ready for simulation.
    ///
    /// Fails with [`DataError::NonFinite`] when a statistic overflows.
    pub fn market_inputs(&self, periods_per_year: f64) -> Result<MarketInputs, DataError> {
        let mean_returns = self.mean_returns(periods_per_year)?;
        if let Some(i) = mean_returns.iter().position(|m| !m.is_finite()) {
            return Err(DataError::NonFinite {
                asset: self.tickers[i].clone(),
            });
        }

        let covariance = self.covariance(periods_per_year)?;
        if let Err(err) = covariance.check() {
            let asset = match err {
                CovarianceError::NonFinite { row, col } if row != col => {
                    format!("{}/{}", self.tickers[row], self.tickers[col])
                }
                CovarianceError::NonFinite { row, .. } => self.tickers[row].clone(),
                CovarianceError::NegativeVariance { index, .. } => self.tickers[index].clone(),
                _ => self.tickers.join("/"),
            };
            return Err(DataError::NonFinite { asset });
        }

        Ok(MarketInputs::from_parts(
            self.tickers.clone(),
            mean_returns,
            covariance,
        ))
    }
}
