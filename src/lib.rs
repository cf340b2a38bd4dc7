//! # highway_traffic_sim_core
//!
//! Core library for microscopic multi-lane highway traffic simulation.
//!
//! Vehicles follow the Intelligent Driver Model (IDM) longitudinally and a
//! MOBIL-style safety + utility criterion laterally. The [`simulation::world::World`]
//! advances the population in discrete time, honoring scheduled vehicle
//! deployments, static obstacles with activity windows, random driver
//! inattention episodes, and geographic slow-down zones.
//!
//! ## Key modules
//!
//! - [`agents`] - the [`agents::Vehicle`] agent and its storage
//! - [`drivers`] - driver kinds, IDM/MOBIL parameter profiles, and the
//!   population sampler
//! - [`longitudinal`] - the IDM acceleration law
//! - [`lateral`] - the MOBIL lane-change decision
//! - [`neighborhood`] - leader/follower queries over lane-sorted traffic
//! - [`deployment`] - scheduled vehicle injection
//! - [`distraction`] - random inattention and positional slow-down zones
//! - [`simulation`] - world construction, the tick loop, snapshots,
//!   statistics, and multi-run sweeps
//! - [`verbose`] - structured logging levels and macros
//!
//! ## Quick start
//!
//! ```rust
//! use highway_traffic_sim_core::simulation::config::WorldConfig;
//! use highway_traffic_sim_core::simulation::world::World;
//!
//! let config = WorldConfig::new()
//!     .with_road_length(1000.0)
//!     .with_lanes_count(3)
//!     .with_n_vehicles(30)
//!     .with_dt(0.5)
//!     .with_seed(42)
//!     .build()
//!     .expect("valid configuration");
//! let mut world = World::new(config);
//! let mean_velocity = world.run_steps(200);
//! println!("mean velocity over run: {:.2} m/s", mean_velocity);
//! ```
pub mod agents;
pub mod deployment;
pub mod distraction;
pub mod drivers;
pub mod lateral;
pub mod longitudinal;
pub mod neighborhood;
pub mod simulation;
pub mod utils;
pub mod verbose;
