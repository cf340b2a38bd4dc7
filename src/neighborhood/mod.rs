//! # Neighborhood Module
//!
//! Leader/follower queries over the vehicle population for a given lane and
//! position. Both the longitudinal update and the lane-change evaluation go
//! through these scans, so exclusion rules (no ego, no inactive obstacles)
//! live in exactly one place.
//!
//! The implementation is a plain linear scan per query; populations here
//! are small and the scan keeps removal/insertion free of index upkeep.
mod queries;

pub use self::queries::*;
