use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::{CovarianceError, Result, SimulationError};
use crate::model::{MarketInputs, Portfolio, SimulationProgress, SimulationResult};
use crate::sampling::WeightSampling;

/// Draws evaluated by one worker with its own RNG
pub const MAX_BATCH_SIZE: usize = 1_000;
pub const DEFAULT_NUM_PORTFOLIOS: usize = 20_000;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;
/// Below this many draws the sampled frontier is too sparse to be useful
pub const MIN_RECOMMENDED_PORTFOLIOS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of portfolios to sample (K)
    pub num_portfolios: usize,
    /// Annual risk-free rate as a fraction (0.02 = 2%)
    pub risk_free_rate: f64,
    pub seed: u64,
    pub sampling: WeightSampling,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_portfolios: DEFAULT_NUM_PORTFOLIOS,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            seed: 0,
            sampling: WeightSampling::default(),
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn new(num_portfolios: usize, risk_free_rate: f64, seed: u64) -> Self {
        Self {
            num_portfolios,
            risk_free_rate,
            seed,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_sampling(mut self, sampling: WeightSampling) -> Self {
        self.sampling = sampling;
        self
    }
}

/// Sharpe ratio with the zero-volatility convention: signed infinity for a
/// non-zero excess return, zero when the excess return is zero as well.
#[must_use]
pub fn sharpe_ratio(annual_return: f64, volatility: f64, risk_free_rate: f64) -> f64 {
    let excess = annual_return - risk_free_rate;
    if volatility > 0.0 {
        excess / volatility
    } else if excess > 0.0 {
        f64::INFINITY
    } else if excess < 0.0 {
        f64::NEG_INFINITY
    } else {
        0.0
    }
}

/// Evaluate one weight vector against the market inputs.
///
/// Variance below zero, which only arises from floating error on a PSD
/// matrix, is clamped before taking the square root.
#[must_use]
pub fn evaluate_weights(inputs: &MarketInputs, weights: Vec<f64>, risk_free_rate: f64) -> Portfolio {
    let annual_return = inputs.portfolio_return(&weights);
    let variance = inputs.covariance().quadratic_form(&weights).max(0.0);
    let volatility = variance.sqrt();
    let sharpe = sharpe_ratio(annual_return, volatility, risk_free_rate);
    Portfolio::new(weights, annual_return, volatility, sharpe)
}

/// Sample `config.num_portfolios` random portfolios.
///
/// Structural preconditions are checked once up front. Results are
/// bit-identical for a given seed regardless of thread count.
pub fn simulate(inputs: &MarketInputs, config: &SimulationConfig) -> Result<SimulationResult> {
    simulate_with_progress(inputs, config, None)
}

/// Like [`simulate`], reporting each completed draw to `progress` and
/// stopping with [`SimulationError::Cancelled`] once it is cancelled.
pub fn simulate_with_progress(
    inputs: &MarketInputs,
    config: &SimulationConfig,
    progress: Option<&SimulationProgress>,
) -> Result<SimulationResult> {
    validate(inputs, config)?;

    let num_portfolios = config.num_portfolios;
    let num_batches = num_portfolios.div_ceil(MAX_BATCH_SIZE);

    info!(
        assets = inputs.num_assets(),
        num_portfolios,
        num_batches,
        seed = config.seed,
        sampling = config.sampling.label(),
        "Starting portfolio simulation"
    );

    let batch_size = |i: usize| {
        if i == num_batches - 1 {
            num_portfolios - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        }
    };

    #[cfg(feature = "parallel")]
    let batches: Result<Vec<Vec<Portfolio>>> = (0..num_batches)
        .into_par_iter()
        .map(|i| simulate_batch(inputs, config, i, batch_size(i), progress))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let batches: Result<Vec<Vec<Portfolio>>> = (0..num_batches)
        .map(|i| simulate_batch(inputs, config, i, batch_size(i), progress))
        .collect();

    let portfolios: Vec<Portfolio> = batches?.into_iter().flatten().collect();

    info!(count = portfolios.len(), "Simulation complete");

    Ok(SimulationResult::new(
        inputs.asset_names().to_vec(),
        portfolios,
        config.risk_free_rate,
        config.seed,
    ))
}

fn validate(inputs: &MarketInputs, config: &SimulationConfig) -> Result<()> {
    let n = inputs.num_assets();
    if n < 2 {
        return Err(SimulationError::InsufficientAssets { found: n });
    }
    if inputs.covariance().dim() != n {
        return Err(CovarianceError::DimensionMismatch {
            assets: n,
            matrix: inputs.covariance().dim(),
        }
        .into());
    }
    inputs.covariance().check()?;
    if let Some(index) = inputs.mean_returns().iter().position(|m| !m.is_finite()) {
        return Err(SimulationError::InvalidInput(format!(
            "mean return of asset {index} is not finite"
        )));
    }
    if config.num_portfolios == 0 {
        return Err(SimulationError::InvalidInput(
            "number of portfolios must be at least 1".to_string(),
        ));
    }
    if !config.risk_free_rate.is_finite() {
        return Err(SimulationError::InvalidInput(format!(
            "risk-free rate {} is not finite",
            config.risk_free_rate
        )));
    }
    Ok(())
}

/// Derive the RNG seed of a batch from the run seed
fn batch_seed(seed: u64, batch: usize) -> u64 {
    seed ^ (batch as u64)
        .wrapping_add(1)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn simulate_batch(
    inputs: &MarketInputs,
    config: &SimulationConfig,
    batch: usize,
    size: usize,
    progress: Option<&SimulationProgress>,
) -> Result<Vec<Portfolio>> {
    let mut rng = SmallRng::seed_from_u64(batch_seed(config.seed, batch));
    let n = inputs.num_assets();
    let mut portfolios = Vec::with_capacity(size);

    debug!(batch, size, "Simulating batch");

    for _ in 0..size {
        if progress.is_some_and(SimulationProgress::is_cancelled) {
            debug!(batch, done = portfolios.len(), "Batch cancelled");
            return Err(SimulationError::Cancelled);
        }

        let weights = config.sampling.sample(&mut rng, n);
        portfolios.push(evaluate_weights(inputs, weights, config.risk_free_rate));

        if let Some(progress) = progress {
            progress.increment();
        }
    }

    Ok(portfolios)
}
