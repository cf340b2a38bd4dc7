//! # Drivers Module
//!
//! Driver kinds, their IDM/MOBIL parameter profiles, and the population
//! sampler.
//!
//! ## Key Components
//!
//! - [`DriverType`] - The heterogeneous driver kinds (plus the obstacle marker)
//! - [`DriverProfile`] - Immutable parameter set selected once per vehicle
//! - [`DriverDistribution`] - Validated PMF realised into shuffled populations
//!
//! ## Usage
//!
//! ```rust
//! use highway_traffic_sim_core::drivers::{DriverDistribution, DriverProfile, DriverType};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let profile = DriverProfile::from_driver_type(DriverType::Cautious);
//! assert!(profile.time_headway() > 2.0);
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let population = DriverDistribution::default().realise(20, &mut rng);
//! assert_eq!(population.len(), 20);
//! ```
pub mod distribution;
pub mod driver_type;
pub mod profile;

pub use self::{distribution::*, driver_type::*, profile::*};
