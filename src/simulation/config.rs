use crate::drivers::{DistributionError, DriverDistribution};
use std::fmt;

/// Custom error types for world configuration.
///
/// Every variant is reported at world construction; a world is never
/// created from an invalid configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Road length must be strictly positive (m).
    InvalidRoadLength(f64),
    /// At least one lane is required.
    InvalidLanesCount(usize),
    /// Time step must be strictly positive (s).
    InvalidDt(f64),
    /// Simulation time must be strictly positive (s).
    InvalidSimulationTime(f64),
    /// Distracted percentage must be within [0, 100].
    InvalidDistractedPercentage(f64),
    /// Lane-change sampling rate must be within [0, 1].
    InvalidLaneChangeRate(f64),
    /// The driver distribution failed validation.
    Distribution(DistributionError),
    /// A lane index fell outside [0, lanes_count).
    LaneOutOfRange { lane: usize, lanes_count: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRoadLength(value) => {
                write!(f, "Road length must be > 0 m, got {}", value)
            }
            ConfigError::InvalidLanesCount(value) => {
                write!(f, "Lanes count must be >= 1, got {}", value)
            }
            ConfigError::InvalidDt(value) => {
                write!(f, "Time step must be > 0 s, got {}", value)
            }
            ConfigError::InvalidSimulationTime(value) => {
                write!(f, "Simulation time must be > 0 s, got {}", value)
            }
            ConfigError::InvalidDistractedPercentage(value) => {
                write!(f, "Distracted percentage must be in [0, 100], got {}", value)
            }
            ConfigError::InvalidLaneChangeRate(value) => {
                write!(f, "Lane-change rate must be in [0, 1], got {}", value)
            }
            ConfigError::Distribution(err) => write!(f, "{}", err),
            ConfigError::LaneOutOfRange { lane, lanes_count } => {
                write!(f, "Lane {} outside [0, {})", lane, lanes_count)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<DistributionError> for ConfigError {
    fn from(err: DistributionError) -> Self {
        ConfigError::Distribution(err)
    }
}

/// Validated world configuration.
///
/// Constructed through [`WorldConfig::new`], which returns a builder; the
/// builder's `build()` performs all range checks and either yields a
/// config or a [`ConfigError`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// Road length L (m).
    pub road_length: f64,
    /// Lane count K.
    pub lanes_count: usize,
    /// Size of the initial random population.
    pub n_vehicles: usize,
    /// Tick length (s).
    pub dt: f64,
    /// Total simulated time of a run (s).
    pub simulation_time: f64,
    /// Animation frame interval (ms). Display-only pass-through for
    /// external visualization collaborators; the core ignores it.
    pub animation_interval: u64,
    /// Percentage of the initial population eligible for inattention.
    pub distracted_percentage: f64,
    /// PMF over the five population driver kinds.
    pub driver_distribution: DriverDistribution,
    /// Per-tick Bernoulli rate gating lane-change evaluation.
    pub lane_change_rate: f64,
    /// PRNG seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl WorldConfig {
    /// Constructs a new `WorldConfigBuilder` with the stock defaults:
    /// a 1000 m road with 3 lanes, 30 vehicles, half-second ticks, 100 s of
    /// simulated time, 10% distractable drivers, and the default driver mix.
    ///
    /// # Example
    /// ```
    /// use highway_traffic_sim_core::simulation::config::WorldConfig;
    /// let config = WorldConfig::new()
    ///     .with_road_length(2000.0)
    ///     .with_lanes_count(2)
    ///     .with_seed(7)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.lanes_count, 2);
    /// ```
    pub fn new() -> WorldConfigBuilder {
        WorldConfigBuilder {
            config: WorldConfig {
                road_length: 1000.0,
                lanes_count: 3,
                n_vehicles: 30,
                dt: 0.5,
                simulation_time: 100.0,
                animation_interval: 50,
                distracted_percentage: 10.0,
                driver_distribution: DriverDistribution::default(),
                lane_change_rate: 0.1,
                seed: None,
            },
        }
    }

    /// Number of ticks a full run spans.
    pub fn steps_total(&self) -> usize {
        (self.simulation_time / self.dt) as usize
    }

    /// Validates a lane index against this configuration.
    pub fn check_lane(&self, lane: usize) -> Result<(), ConfigError> {
        if lane >= self.lanes_count {
            return Err(ConfigError::LaneOutOfRange { lane, lanes_count: self.lanes_count });
        }
        Ok(())
    }
}

/// A builder pattern implementation for constructing `WorldConfig` objects.
pub struct WorldConfigBuilder {
    config: WorldConfig,
}

impl WorldConfigBuilder {
    /// Sets the road length (m).
    pub fn with_road_length(mut self, road_length: f64) -> Self {
        self.config.road_length = road_length;
        self
    }

    /// Sets the lane count.
    pub fn with_lanes_count(mut self, lanes_count: usize) -> Self {
        self.config.lanes_count = lanes_count;
        self
    }

    /// Sets the size of the initial random population.
    pub fn with_n_vehicles(mut self, n_vehicles: usize) -> Self {
        self.config.n_vehicles = n_vehicles;
        self
    }

    /// Sets the tick length (s).
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.config.dt = dt;
        self
    }

    /// Sets the total simulated time of a run (s).
    pub fn with_simulation_time(mut self, simulation_time: f64) -> Self {
        self.config.simulation_time = simulation_time;
        self
    }

    /// Sets the animation frame interval (ms). Display-only pass-through.
    pub fn with_animation_interval(mut self, animation_interval: u64) -> Self {
        self.config.animation_interval = animation_interval;
        self
    }

    /// Sets the percentage of the initial population eligible for
    /// inattention episodes.
    pub fn with_distracted_percentage(mut self, distracted_percentage: f64) -> Self {
        self.config.distracted_percentage = distracted_percentage;
        self
    }

    /// Sets the driver-kind distribution.
    pub fn with_driver_distribution(mut self, driver_distribution: DriverDistribution) -> Self {
        self.config.driver_distribution = driver_distribution;
        self
    }

    /// Sets the per-tick Bernoulli rate gating lane-change evaluation.
    pub fn with_lane_change_rate(mut self, lane_change_rate: f64) -> Self {
        self.config.lane_change_rate = lane_change_rate;
        self
    }

    /// Sets the PRNG seed for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validates and builds the final `WorldConfig` object.
    ///
    /// # Returns
    /// The configuration, or the first [`ConfigError`] encountered.
    pub fn build(self) -> Result<WorldConfig, ConfigError> {
        let config = self.config;
        if !config.road_length.is_finite() || config.road_length <= 0.0 {
            return Err(ConfigError::InvalidRoadLength(config.road_length));
        }
        if config.lanes_count < 1 {
            return Err(ConfigError::InvalidLanesCount(config.lanes_count));
        }
        if !config.dt.is_finite() || config.dt <= 0.0 {
            return Err(ConfigError::InvalidDt(config.dt));
        }
        if !config.simulation_time.is_finite() || config.simulation_time <= 0.0 {
            return Err(ConfigError::InvalidSimulationTime(config.simulation_time));
        }
        if !config.distracted_percentage.is_finite()
            || !(0.0..=100.0).contains(&config.distracted_percentage)
        {
            return Err(ConfigError::InvalidDistractedPercentage(config.distracted_percentage));
        }
        if !config.lane_change_rate.is_finite()
            || !(0.0..=1.0).contains(&config.lane_change_rate)
        {
            return Err(ConfigError::InvalidLaneChangeRate(config.lane_change_rate));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorldConfig::new().build().expect("defaults must validate");
        assert_eq!(config.road_length, 1000.0);
        assert_eq!(config.lanes_count, 3);
        assert_eq!(config.steps_total(), 200);
    }

    #[test]
    fn test_rejects_nonpositive_road() {
        assert!(matches!(
            WorldConfig::new().with_road_length(0.0).build(),
            Err(ConfigError::InvalidRoadLength(_))
        ));
        assert!(matches!(
            WorldConfig::new().with_road_length(-5.0).build(),
            Err(ConfigError::InvalidRoadLength(_))
        ));
    }

    #[test]
    fn test_rejects_zero_lanes() {
        assert!(matches!(
            WorldConfig::new().with_lanes_count(0).build(),
            Err(ConfigError::InvalidLanesCount(0))
        ));
    }

    #[test]
    fn test_rejects_bad_dt_and_time() {
        assert!(matches!(
            WorldConfig::new().with_dt(0.0).build(),
            Err(ConfigError::InvalidDt(_))
        ));
        assert!(matches!(
            WorldConfig::new().with_simulation_time(-1.0).build(),
            Err(ConfigError::InvalidSimulationTime(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_percentage() {
        assert!(matches!(
            WorldConfig::new().with_distracted_percentage(101.0).build(),
            Err(ConfigError::InvalidDistractedPercentage(_))
        ));
    }

    #[test]
    fn test_rejects_bad_lane_change_rate() {
        assert!(matches!(
            WorldConfig::new().with_lane_change_rate(1.5).build(),
            Err(ConfigError::InvalidLaneChangeRate(_))
        ));
    }

    #[test]
    fn test_lane_bound_check() {
        let config = WorldConfig::new().with_lanes_count(2).build().unwrap();
        assert!(config.check_lane(1).is_ok());
        assert!(matches!(
            config.check_lane(2),
            Err(ConfigError::LaneOutOfRange { lane: 2, lanes_count: 2 })
        ));
    }
}
