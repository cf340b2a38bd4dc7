//! # Distraction Module
//!
//! Two independent driver-impairment mechanisms:
//!
//! - **Random inattention** ([`refresh_distraction`]): per-driver episodes
//!   started by a low-probability roll once per second of simulated time.
//!   A distracted driver holds its velocity and never changes lanes; a
//!   safety override ([`emergency_deceleration`]) still brakes when the
//!   leader gap collapses.
//! - **Positional distractions** ([`PositionalDistraction`]): geographic,
//!   time-bounded zones that cap the velocity of every vehicle inside them.
mod inattention;
mod zones;

pub use self::{inattention::*, zones::*};
