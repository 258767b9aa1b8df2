//! Monte Carlo efficient-frontier sampling
//!
//! This crate estimates the efficient frontier of a set of assets by sampling
//! random long-only weight vectors, scoring each by annualized return,
//! volatility and Sharpe ratio, and picking the best samples.
//! It provides:
//! - Price tables and log-return statistics (annualized means and covariances)
//! - The portfolio simulator, parallelized over deterministic seeded batches
//! - Selection of the maximum-Sharpe and minimum-volatility samples
//! - Progress reporting and cooperative cancellation
//!
//! The reported optima are the best among the sampled portfolios only; this
//! is not an exact optimizer.
//!
//! ```ignore
//! use frontier_core::{CovarianceMatrix, MarketInputs, SimulationConfig, simulate};
//!
//! let inputs = MarketInputs::unnamed(
//!     vec![0.10, 0.20],
//!     CovarianceMatrix::diagonal(&[0.04, 0.09])?,
//! )?;
//! let result = simulate(&inputs, &SimulationConfig::new(5_000, 0.02, 42))?;
//! let optimal = result.select().expect("non-empty result");
//! println!("max Sharpe: {:.3}", optimal.max_sharpe.portfolio.sharpe_ratio());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod sampling;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{CovarianceError, DataError, SimulationError};
pub use model::{
    AssetSeries, CovarianceMatrix, MarketInputs, OptimalPortfolios, Portfolio, PriceTable,
    RankedPortfolio, ReturnMatrix, SimulationProgress, SimulationResult, TRADING_DAYS_PER_YEAR,
};
pub use sampling::WeightSampling;
pub use simulation::{
    DEFAULT_NUM_PORTFOLIOS, DEFAULT_RISK_FREE_RATE, MIN_RECOMMENDED_PORTFOLIOS, SimulationConfig,
    evaluate_weights, sharpe_ratio, simulate, simulate_with_progress,
};
