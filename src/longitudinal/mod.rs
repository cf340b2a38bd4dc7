//! # Longitudinal Module
//!
//! The Intelligent Driver Model (IDM): a pure function from a follower and
//! its (optional) leader to a desired acceleration.
//!
//! Units are SI throughout: meters, seconds, m/s, m/s².
mod idm;

pub use self::idm::*;
