use serde::{Deserialize, Serialize};

use crate::error::{CovarianceError, SimulationError};

/// Relative tolerance used when checking covariance symmetry
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Annualized covariance matrix of asset returns, stored row-major.
///
/// Entries are finite, the matrix is square and symmetric and every diagonal
/// entry (an asset's annualized variance) is non-negative. Positive
/// semi-definiteness is a precondition of the caller and is not verified;
/// portfolio variances computed from a matrix with small negative
/// eigenvalues are clamped to zero by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct CovarianceMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl CovarianceMatrix {
    /// Build a matrix from rows, validating shape, finiteness, symmetry and
    /// the sign of the diagonal.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, CovarianceError> {
        let dim = rows.len();
        let mut values = Vec::with_capacity(dim * dim);

        for (row, entries) in rows.iter().enumerate() {
            if entries.len() != dim {
                return Err(CovarianceError::NotSquare {
                    row,
                    len: entries.len(),
                    expected: dim,
                });
            }
            for (col, value) in entries.iter().enumerate() {
                if !value.is_finite() {
                    return Err(CovarianceError::NonFinite { row, col });
                }
            }
            values.extend_from_slice(entries);
        }

        let matrix = Self { dim, values };

        for row in 0..dim {
            let variance = matrix.get(row, row);
            if variance < 0.0 {
                return Err(CovarianceError::NegativeVariance {
                    index: row,
                    variance,
                });
            }
            for col in (row + 1)..dim {
                let upper = matrix.get(row, col);
                let lower = matrix.get(col, row);
                let scale = 1.0 + upper.abs().max(lower.abs());
                if (upper - lower).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(CovarianceError::Asymmetric {
                        row,
                        col,
                        upper,
                        lower,
                    });
                }
            }
        }

        Ok(matrix)
    }

    /// Build from row-major values already known to be symmetric.
    pub(crate) fn from_symmetric(dim: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), dim * dim);
        Self { dim, values }
    }

    /// A diagonal matrix with the given variances and zero covariances
    pub fn diagonal(variances: &[f64]) -> Result<Self, CovarianceError> {
        let dim = variances.len();
        let mut values = vec![0.0; dim * dim];
        for (i, &variance) in variances.iter().enumerate() {
            if !variance.is_finite() {
                return Err(CovarianceError::NonFinite { row: i, col: i });
            }
            if variance < 0.0 {
                return Err(CovarianceError::NegativeVariance { index: i, variance });
            }
            values[i * dim + i] = variance;
        }
        Ok(Self { dim, values })
    }

    /// Re-check the entry invariants: finite everywhere, non-negative
    /// diagonal, and a value buffer matching the dimension.
    pub fn check(&self) -> Result<(), CovarianceError> {
        if self.values.len() != self.dim * self.dim {
            return Err(CovarianceError::NotSquare {
                row: 0,
                len: self.values.len(),
                expected: self.dim * self.dim,
            });
        }
        if let Some(pos) = self.values.iter().position(|v| !v.is_finite()) {
            return Err(CovarianceError::NonFinite {
                row: pos / self.dim,
                col: pos % self.dim,
            });
        }
        if let Some(index) = (0..self.dim).find(|&i| self.variance(i) < 0.0) {
            return Err(CovarianceError::NegativeVariance {
                index,
                variance: self.variance(index),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.dim + col]
    }

    #[must_use]
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.dim..(row + 1) * self.dim]
    }

    /// Annualized variance of a single asset
    #[must_use]
    pub fn variance(&self, index: usize) -> f64 {
        self.get(index, index)
    }

    /// Compute `wᵀ Σ w`. May be slightly negative for matrices that are only
    /// PSD up to floating error.
    #[must_use]
    pub fn quadratic_form(&self, weights: &[f64]) -> f64 {
        debug_assert_eq!(weights.len(), self.dim);
        weights
            .iter()
            .enumerate()
            .map(|(i, wi)| {
                let row_sum: f64 = self
                    .row(i)
                    .iter()
                    .zip(weights)
                    .map(|(c, wj)| c * wj)
                    .sum();
                wi * row_sum
            })
            .sum()
    }

    /// Rows as owned vectors, mostly for display and serialization
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.dim).map(|i| self.row(i).to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for CovarianceMatrix {
    type Error = CovarianceError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<CovarianceMatrix> for Vec<Vec<f64>> {
    fn from(matrix: CovarianceMatrix) -> Self {
        matrix.to_rows()
    }
}

/// Read-only statistical inputs shared by every draw of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMarketInputs")]
pub struct MarketInputs {
    asset_names: Vec<String>,
    mean_returns: Vec<f64>,
    covariance: CovarianceMatrix,
}

/// Unchecked serialized form of [`MarketInputs`]
#[derive(Deserialize)]
struct RawMarketInputs {
    asset_names: Vec<String>,
    mean_returns: Vec<f64>,
    covariance: CovarianceMatrix,
}

impl TryFrom<RawMarketInputs> for MarketInputs {
    type Error = SimulationError;

    fn try_from(raw: RawMarketInputs) -> Result<Self, Self::Error> {
        Self::new(raw.asset_names, raw.mean_returns, raw.covariance)
    }
}

impl MarketInputs {
    /// Bundle annualized mean returns and covariances for a set of assets.
    ///
    /// The names, the mean vector and the matrix must agree on the number of
    /// assets and every mean must be finite. The asset count itself is
    /// checked when the simulation starts.
    pub fn new(
        asset_names: Vec<String>,
        mean_returns: Vec<f64>,
        covariance: CovarianceMatrix,
    ) -> Result<Self, SimulationError> {
        if asset_names.len() != mean_returns.len() {
            return Err(SimulationError::InvalidInput(format!(
                "{} asset names but {} mean returns",
                asset_names.len(),
                mean_returns.len()
            )));
        }
        if covariance.dim() != mean_returns.len() {
            return Err(CovarianceError::DimensionMismatch {
                assets: mean_returns.len(),
                matrix: covariance.dim(),
            }
            .into());
        }
        if let Some(index) = mean_returns.iter().position(|m| !m.is_finite()) {
            return Err(SimulationError::InvalidInput(format!(
                "mean return for {} is not finite",
                asset_names[index]
            )));
        }

        Ok(Self {
            asset_names,
            mean_returns,
            covariance,
        })
    }

    /// Assemble statistics computed in this crate, which are consistent by
    /// construction.
    pub(crate) fn from_parts(
        asset_names: Vec<String>,
        mean_returns: Vec<f64>,
        covariance: CovarianceMatrix,
    ) -> Self {
        Self {
            asset_names,
            mean_returns,
            covariance,
        }
    }

    /// Convenience constructor naming assets `A0`, `A1`, ...
    pub fn unnamed(
        mean_returns: Vec<f64>,
        covariance: CovarianceMatrix,
    ) -> Result<Self, SimulationError> {
        let names = (0..mean_returns.len()).map(|i| format!("A{i}")).collect();
        Self::new(names, mean_returns, covariance)
    }

    #[must_use]
    pub fn num_assets(&self) -> usize {
        self.mean_returns.len()
    }

    #[must_use]
    pub fn asset_names(&self) -> &[String] {
        &self.asset_names
    }

    #[must_use]
    pub fn mean_returns(&self) -> &[f64] {
        &self.mean_returns
    }

    #[must_use]
    pub fn covariance(&self) -> &CovarianceMatrix {
        &self.covariance
    }

    /// Annualized volatility of holding only the asset at `index`
    #[must_use]
    pub fn asset_volatility(&self, index: usize) -> f64 {
        self.covariance.variance(index).max(0.0).sqrt()
    }

    /// Portfolio return `w · μ`
    #[must_use]
    pub fn portfolio_return(&self, weights: &[f64]) -> f64 {
        weights
            .iter()
            .zip(&self.mean_returns)
            .map(|(w, m)| w * m)
            .sum()
    }
}
