//! Thin wrappers over `rand_distr` for the draws the core consumes.

use rand::Rng;
use rand_distr::{Distribution, LogNormal, StandardNormal};

/// Gaussian draw with mean 0 and standard deviation `sigma`.
pub fn gauss<R: Rng + ?Sized>(rng: &mut R, sigma: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    sigma * z
}

/// Log-normal sampler parameterised by arithmetic mean and coefficient of
/// variation. A CV of zero always returns the mean without consuming a draw.
#[derive(Debug, Clone)]
pub struct LognormalSampler {
    mean: f64,
    dist: Option<LogNormal<f64>>,
}

impl LognormalSampler {
    /// Returns `None` when the mean is not positive or the CV is negative.
    pub fn new(mean: f64, cv: f64) -> Option<Self> {
        if !(mean > 0.0) || !(cv >= 0.0) {
            return None;
        }
        if cv == 0.0 {
            return Some(Self { mean, dist: None });
        }
        let sigma_sq = (1.0 + cv * cv).ln();
        let mu = mean.ln() - 0.5 * sigma_sq;
        let dist = LogNormal::new(mu, sigma_sq.sqrt()).ok()?;
        Some(Self {
            mean,
            dist: Some(dist),
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match &self.dist {
            Some(dist) => dist.sample(rng),
            None => self.mean,
        }
    }
}
