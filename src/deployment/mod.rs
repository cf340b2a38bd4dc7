//! # Deployment Module
//!
//! Scheduled vehicle injection. A [`ScheduledDeployment`] names a driver
//! kind, a lane, a position, and a time; at each tick every due entry is
//! either spawned at a conflict-free point or dropped with a warning after
//! the retry budget runs out.
mod scheduler;

pub use self::scheduler::*;
