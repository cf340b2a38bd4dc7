//! # Agents Module
//!
//! This module provides the core agent system for the highway simulation:
//! the driver-vehicle and the insertion-ordered storage the tick loop
//! iterates over.
//!
//! ## Key Components
//!
//! - [`Vehicle`] - The primary agent: kinematics, driver profile,
//!   distraction state, and (for obstacles) the activity window
//! - [`VehiclesStorage`] - Deterministic, insertion-ordered vehicle storage
//!
//! ## Usage
//!
//! ```rust
//! use highway_traffic_sim_core::agents::Vehicle;
//! use highway_traffic_sim_core::drivers::DriverType;
//!
//! // Create a basic vehicle
//! let vehicle = Vehicle::new(1)
//!     .with_driver_type(DriverType::Cautious)
//!     .with_position(300.0)
//!     .with_lane(2)
//!     .with_desired_velocity(28.0)
//!     .build();
//! ```
mod vehicle;
mod vehicles_storage;

pub use self::{vehicle::*, vehicles_storage::*};
