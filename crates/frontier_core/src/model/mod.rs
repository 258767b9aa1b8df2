mod market;
mod prices;
mod progress;
mod results;

pub use market::{CovarianceMatrix, MarketInputs};
pub use prices::{AssetSeries, PriceTable, ReturnMatrix, TRADING_DAYS_PER_YEAR};
pub use progress::SimulationProgress;
pub use results::{OptimalPortfolios, Portfolio, RankedPortfolio, SimulationResult};
