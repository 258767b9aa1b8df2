//! Random weight vectors on the probability simplex.

use rand::{Rng, distr::Distribution};
use rand_distr::Exp1;
use serde::{Deserialize, Serialize};

/// How each draw's weight vector is generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightSampling {
    /// Independent `U[0, 1)` draws divided by their sum.
    ///
    /// Every vector lies on the simplex, but the density is not uniform over
    /// it: mass concentrates toward equal weights and corner portfolios are
    /// rarely sampled, which shapes the sampled frontier.
    #[default]
    #[serde(alias = "uniform")]
    UniformNormalized,
    /// Flat Dirichlet(1, ..., 1), uniform over the simplex. Generated as
    /// normalized standard exponential draws.
    Dirichlet,
}

impl WeightSampling {
    /// Fill `weights` with a non-negative vector summing to one.
    ///
    /// A draw whose components are all zero is discarded and redrawn.
    pub fn sample_into<R: Rng + ?Sized>(self, rng: &mut R, weights: &mut [f64]) {
        if weights.is_empty() {
            return;
        }

        loop {
            for w in weights.iter_mut() {
                *w = match self {
                    WeightSampling::UniformNormalized => rng.random::<f64>(),
                    WeightSampling::Dirichlet => Exp1.sample(rng),
                };
            }

            let sum: f64 = weights.iter().sum();
            if sum > 0.0 {
                for w in weights.iter_mut() {
                    *w /= sum;
                }
                return;
            }
        }
    }

    /// Allocate and fill a weight vector of length `n`
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R, n: usize) -> Vec<f64> {
        let mut weights = vec![0.0; n];
        self.sample_into(rng, &mut weights);
        weights
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            WeightSampling::UniformNormalized => "uniform",
            WeightSampling::Dirichlet => "dirichlet",
        }
    }
}
