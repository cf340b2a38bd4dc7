use crate::drivers::driver_type::DriverType;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

/// Tolerance applied when checking that the weights sum to one.
pub const DISTRIBUTION_SUM_TOLERANCE: f64 = 0.01;

/// Errors produced while validating a driver distribution.
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// A weight was negative or non-finite.
    InvalidWeight { driver_type: DriverType, weight: f64 },
    /// The weights do not sum to 1 within [`DISTRIBUTION_SUM_TOLERANCE`].
    BadSum { sum: f64 },
    /// Wrong number of comma-separated values in the textual form.
    BadArity { got: usize },
    /// A textual weight failed to parse as a number.
    Unparseable { token: String },
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionError::InvalidWeight { driver_type, weight } => {
                write!(f, "Invalid weight {} for driver type '{}'", weight, driver_type)
            }
            DistributionError::BadSum { sum } => {
                write!(
                    f,
                    "Driver distribution must sum to 1 within {}, got {}",
                    DISTRIBUTION_SUM_TOLERANCE, sum
                )
            }
            DistributionError::BadArity { got } => {
                write!(f, "Driver distribution needs exactly 5 values, got {}", got)
            }
            DistributionError::Unparseable { token } => {
                write!(f, "Can't parse '{}' as a distribution weight", token)
            }
        }
    }
}

impl std::error::Error for DistributionError {}

/// Probability mass function over the five population driver kinds.
///
/// Weights are stored in the canonical order of
/// [`DriverType::POPULATION`]: aggressive, normal, cautious, polite,
/// submissive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverDistribution {
    weights: [f64; 5],
}

impl Default for DriverDistribution {
    /// The calibration shipped with the simulator: 30% aggressive,
    /// 30% normal, 20% cautious, 10% polite, 10% submissive.
    fn default() -> Self {
        Self { weights: [0.3, 0.3, 0.2, 0.1, 0.1] }
    }
}

impl DriverDistribution {
    /// Validates and wraps a weight vector.
    ///
    /// # Arguments
    /// * `weights` - Non-negative fractions in canonical kind order,
    ///   summing to 1 within [`DISTRIBUTION_SUM_TOLERANCE`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use highway_traffic_sim_core::drivers::DriverDistribution;
    ///
    /// let uniform = DriverDistribution::new([0.2, 0.2, 0.2, 0.2, 0.2]).unwrap();
    /// assert_eq!(uniform.weights()[0], 0.2);
    /// assert!(DriverDistribution::new([0.9, 0.9, 0.0, 0.0, 0.0]).is_err());
    /// ```
    pub fn new(weights: [f64; 5]) -> Result<Self, DistributionError> {
        for (kind, weight) in DriverType::POPULATION.iter().zip(weights.iter()) {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(DistributionError::InvalidWeight {
                    driver_type: *kind,
                    weight: *weight,
                });
            }
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > DISTRIBUTION_SUM_TOLERANCE {
            return Err(DistributionError::BadSum { sum });
        }
        Ok(Self { weights })
    }

    /// Parses the CLI form `"A,N,C,P,S"` (five comma-separated fractions).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use highway_traffic_sim_core::drivers::DriverDistribution;
    ///
    /// let parsed = DriverDistribution::parse("0.3,0.3,0.2,0.1,0.1").unwrap();
    /// assert_eq!(parsed, DriverDistribution::default());
    /// ```
    pub fn parse(text: &str) -> Result<Self, DistributionError> {
        let tokens: Vec<&str> = text.split(',').map(str::trim).collect();
        if tokens.len() != 5 {
            return Err(DistributionError::BadArity { got: tokens.len() });
        }
        let mut weights = [0.0_f64; 5];
        for (slot, token) in weights.iter_mut().zip(tokens.iter()) {
            *slot = token
                .parse::<f64>()
                .map_err(|_| DistributionError::Unparseable { token: token.to_string() })?;
        }
        Self::new(weights)
    }

    /// Returns the weight vector in canonical kind order.
    pub fn weights(&self) -> &[f64; 5] {
        &self.weights
    }

    /// Realises the distribution into a shuffled population of `n` kinds.
    ///
    /// Counts are deterministic regardless of the RNG: each kind gets
    /// `floor(weight * n)` slots and the residual `n - sum(floors)` goes to
    /// [`DriverType::Normal`]. Only the ordering consumes randomness.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use highway_traffic_sim_core::drivers::{DriverDistribution, DriverType};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let population = DriverDistribution::default().realise(10, &mut rng);
    /// assert_eq!(population.len(), 10);
    /// assert_eq!(
    ///     population.iter().filter(|t| **t == DriverType::Aggressive).count(),
    ///     3
    /// );
    /// ```
    pub fn realise(&self, n: usize, rng: &mut impl Rng) -> Vec<DriverType> {
        let mut counts: Vec<usize> = self
            .weights
            .iter()
            .map(|weight| (weight * n as f64).floor() as usize)
            .collect();
        // Rounding slack is absorbed by normal drivers, in either direction
        let assigned: usize = counts.iter().sum();
        if assigned < n {
            counts[1] += n - assigned;
        } else {
            counts[1] = counts[1].saturating_sub(assigned - n);
        }

        let mut population = Vec::with_capacity(n);
        for (kind, count) in DriverType::POPULATION.iter().zip(counts.iter()) {
            for _ in 0..*count {
                population.push(*kind);
            }
        }
        population.shuffle(rng);
        population
    }
}
