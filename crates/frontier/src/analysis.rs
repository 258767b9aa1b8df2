//! Glue between loaded prices and the simulator.

use frontier_core::{
    MarketInputs, SimulationConfig, SimulationError, SimulationProgress, SimulationResult,
    WeightSampling, simulate_with_progress,
};
use tracing::{info, warn};

use crate::error::InputError;
use crate::input::LoadedPrices;
use crate::prompt::SimulationParameters;

/// Sampler settings that do not come from the parameter prompt
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalysisOptions {
    pub sampling: WeightSampling,
    pub seed: u64,
}

/// Market inputs ready for simulation plus every ticker left out of them.
#[derive(Debug, Clone)]
pub struct PreparedInputs {
    pub inputs: MarketInputs,
    /// Requested tickers missing from the source, then tickers without data
    pub excluded: Vec<String>,
}

/// Turn loaded prices into annualized statistics.
///
/// Tickers without a single price are excluded. Fewer than two remaining
/// assets is an error, raised before any statistics are computed.
pub fn prepare_inputs(
    loaded: LoadedPrices,
    periods_per_year: f64,
) -> Result<PreparedInputs, InputError> {
    let LoadedPrices { mut table, missing } = loaded;

    let mut excluded = missing;
    let empty = table.drop_empty_assets();
    for ticker in &empty {
        warn!(ticker = %ticker, "No price data, excluding");
    }
    excluded.extend(empty);

    if table.num_assets() < 2 {
        return Err(InputError::InsufficientAssets {
            found: table.num_assets(),
        });
    }

    let inputs = table.log_returns().market_inputs(periods_per_year)?;
    info!(
        assets = inputs.num_assets(),
        periods = table.num_periods(),
        excluded = excluded.len(),
        "Prepared market inputs"
    );

    Ok(PreparedInputs { inputs, excluded })
}

pub fn run_simulation(
    inputs: &MarketInputs,
    parameters: SimulationParameters,
    options: AnalysisOptions,
    progress: Option<&SimulationProgress>,
) -> Result<SimulationResult, SimulationError> {
    let config = SimulationConfig::new(
        parameters.num_portfolios,
        parameters.risk_free_rate,
        options.seed,
    )
    .with_sampling(options.sampling);

    simulate_with_progress(inputs, &config, progress)
}
