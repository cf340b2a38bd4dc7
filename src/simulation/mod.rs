//! # Simulation module
//!
//! **Top-level orchestration module** – Coordinates all major components of
//! the highway traffic simulation.
//!
//! This module manages world construction and validation, the vehicle
//! population, scheduled deployments, distraction subsystems, and the
//! step-by-step execution of the simulation pipeline. It is the main entry
//! point for running, controlling, and inspecting the simulation state.
//!
//! ## Simulation pipeline
//!
//! [`world::World::step`] executes the following pipeline each tick:
//! ```text
//! 1. Deploy due scheduled vehicles      ← deployment module
//! 2. Refresh obstacle activity windows
//! 3. Refresh distraction state + zones  ← distraction module
//! 4. Compute IDM accelerations          ← longitudinal module
//! 5. Commit gated MOBIL lane changes    ← lateral module
//! 6. Integrate kinematics
//! 7. Retire vehicles past the road end
//! 8. Record statistics
//! ```
//!
//! Accelerations are computed from the pre-integration state, lane changes
//! are committed before integration, and integration consumes the freshly
//! computed accelerations; this compute-then-apply split is what makes
//! seeded runs bit-identical.
//!
//! ## Components
//!
//! - [`config::WorldConfig`] – Validated construction parameters
//! - [`world::World`] – Main simulation controller
//! - [`states::SimState`] – Immutable snapshot consumed by external
//!   collaborators
//! - [`stats::Statistics`] – Per-run accumulators
//! - [`sweep`] – Multi-run parameter sweeps over isolated worlds
//! - [`config::ConfigError`] – Unified error type for construction and
//!   lane validation
//!
//! ## Usage
//!
//! ```rust
//! use highway_traffic_sim_core::deployment::ScheduledDeployment;
//! use highway_traffic_sim_core::drivers::DriverType;
//! use highway_traffic_sim_core::simulation::config::WorldConfig;
//! use highway_traffic_sim_core::simulation::world::World;
//!
//! let config = WorldConfig::new()
//!     .with_road_length(1000.0)
//!     .with_lanes_count(2)
//!     .with_n_vehicles(10)
//!     .with_seed(42)
//!     .build()
//!     .expect("valid configuration");
//! let mut world = World::new(config);
//! world
//!     .schedule_vehicle(
//!         ScheduledDeployment::new(DriverType::Aggressive, 1, 5.0)
//!             .with_desired_velocity(30.0)
//!             .build(),
//!     )
//!     .unwrap();
//! let mean = world.run_steps(100);
//! let snapshot = world.snapshot();
//! println!("t={}s mean={:.1} vehicles={}", snapshot.time, mean, snapshot.vehicles.len());
//! ```
pub mod config;
pub mod states;
pub mod stats;
pub mod sweep;
pub mod world;
