//! # Lateral Module
//!
//! MOBIL-style lane changing: a safety predicate on the prospective
//! follower plus a utility balancing the ego's acceleration gain against
//! the politeness-weighted disadvantage to surrounding drivers.
//!
//! All evaluations are hypothetical and pure: the functions here read the
//! population, synthesize a phantom ego in the candidate lane, and return a
//! verdict. Committing the change is the tick loop's job.
mod mobil;

pub use self::mobil::*;
