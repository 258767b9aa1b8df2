use serde::{Deserialize, Serialize};

/// One sampled candidate portfolio. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    weights: Vec<f64>,
    annual_return: f64,
    volatility: f64,
    sharpe_ratio: f64,
}

impl Portfolio {
    pub(crate) fn new(
        weights: Vec<f64>,
        annual_return: f64,
        volatility: f64,
        sharpe_ratio: f64,
    ) -> Self {
        Self {
            weights,
            annual_return,
            volatility,
            sharpe_ratio,
        }
    }

    /// Weight per asset, non-negative and summing to one
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn annual_return(&self) -> f64 {
        self.annual_return
    }

    /// Annualized standard deviation of returns
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// `(return - risk_free_rate) / volatility`, signed infinity when the
    /// volatility is zero.
    #[must_use]
    pub fn sharpe_ratio(&self) -> f64 {
        self.sharpe_ratio
    }
}

/// All portfolios produced by one simulation run, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    asset_names: Vec<String>,
    portfolios: Vec<Portfolio>,
    risk_free_rate: f64,
    seed: u64,
}

impl SimulationResult {
    pub(crate) fn new(
        asset_names: Vec<String>,
        portfolios: Vec<Portfolio>,
        risk_free_rate: f64,
        seed: u64,
    ) -> Self {
        Self {
            asset_names,
            portfolios,
            risk_free_rate,
            seed,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.portfolios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }

    #[must_use]
    pub fn portfolios(&self) -> &[Portfolio] {
        &self.portfolios
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Portfolio> {
        self.portfolios.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Portfolio> {
        self.portfolios.iter()
    }

    #[must_use]
    pub fn asset_names(&self) -> &[String] {
        &self.asset_names
    }

    #[must_use]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Seed the run was generated from
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Weights assigned to one asset across every draw
    pub fn weight_column(&self, asset_index: usize) -> impl Iterator<Item = f64> + '_ {
        self.portfolios.iter().map(move |p| p.weights[asset_index])
    }

    /// Highest Sharpe ratio among the samples. The earliest draw wins ties.
    #[must_use]
    pub fn max_sharpe(&self) -> Option<RankedPortfolio<'_>> {
        self.select_by(|candidate, best| candidate.sharpe_ratio > best.sharpe_ratio)
    }

    /// Lowest volatility among the samples. The earliest draw wins ties.
    #[must_use]
    pub fn min_volatility(&self) -> Option<RankedPortfolio<'_>> {
        self.select_by(|candidate, best| candidate.volatility < best.volatility)
    }

    /// Both optimal portfolios, or `None` for an empty result.
    ///
    /// These are optimal only among the sampled portfolios, not over every
    /// feasible weight vector.
    #[must_use]
    pub fn select(&self) -> Option<OptimalPortfolios<'_>> {
        Some(OptimalPortfolios {
            max_sharpe: self.max_sharpe()?,
            min_volatility: self.min_volatility()?,
        })
    }

    /// Stable scan: `better(candidate, best)` must be a strict comparison so
    /// equal values keep the earlier draw.
    fn select_by<F>(&self, better: F) -> Option<RankedPortfolio<'_>>
    where
        F: Fn(&Portfolio, &Portfolio) -> bool,
    {
        let mut iter = self.portfolios.iter().enumerate();
        let (mut best_index, mut best) = iter.next()?;
        for (index, candidate) in iter {
            if better(candidate, best) {
                best_index = index;
                best = candidate;
            }
        }
        Some(RankedPortfolio {
            index: best_index,
            portfolio: best,
        })
    }
}

/// A portfolio together with its draw index in the result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedPortfolio<'a> {
    pub index: usize,
    pub portfolio: &'a Portfolio,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalPortfolios<'a> {
    pub max_sharpe: RankedPortfolio<'a>,
    pub min_volatility: RankedPortfolio<'a>,
}
