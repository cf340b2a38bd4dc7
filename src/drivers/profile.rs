use crate::drivers::driver_type::DriverType;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// IDM and MOBIL parameters for a driver kind.
///
/// A profile is populated once at vehicle construction and never changes
/// afterwards; all dispatch on driver kind goes through the parameter
/// values, not through the tag.
///
/// Longitudinal (IDM) fields: desired time headway, minimum gap, maximum
/// acceleration, comfortable deceleration, acceleration exponent.
/// Lateral (MOBIL) fields: politeness, lane-change threshold, safe
/// deceleration bound, right-lane bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverProfile {
    /// Desired time headway T (s).
    time_headway: f64,
    /// Minimum bumper-to-bumper gap s0 (m).
    min_gap: f64,
    /// Maximum acceleration A (m/s^2).
    max_acceleration: f64,
    /// Comfortable deceleration B (m/s^2).
    comfortable_deceleration: f64,
    /// Acceleration exponent delta.
    delta: f64,
    /// Politeness factor p in [0, 1].
    politeness: f64,
    /// Acceleration-gain threshold for committing a lane change (m/s^2).
    change_threshold: f64,
    /// Maximum deceleration the ego tolerates imposing on the prospective
    /// follower (m/s^2).
    safe_deceleration: f64,
    /// Constant utility bonus for a rightward lane change (m/s^2).
    right_bias: f64,
}

lazy_static! {
    /// Parameter table keyed by driver kind.
    ///
    /// Values follow the heterogeneous-driver calibration of the simulator:
    /// aggressive drivers run short headways and will change lanes for any
    /// advantage, submissive drivers keep large gaps and barely ever move
    /// over. Obstacles carry zero dynamics and an infinite change threshold.
    static ref DRIVER_PROFILES: HashMap<DriverType, DriverProfile> = {
        let mut table = HashMap::new();
        table.insert(
            DriverType::Aggressive,
            DriverProfile::new(1.5, 1.5, 2.0, 3.0, 4.0, 0.1, 0.0, 5.0, 0.1),
        );
        table.insert(
            DriverType::Normal,
            DriverProfile::new(1.5, 2.0, 1.5, 2.0, 4.0, 0.3, 0.1, 4.0, 0.3),
        );
        table.insert(
            DriverType::Cautious,
            DriverProfile::new(2.2, 3.0, 1.2, 1.5, 4.0, 0.3, 0.2, 3.0, 0.4),
        );
        table.insert(
            DriverType::Polite,
            DriverProfile::new(1.5, 2.0, 1.5, 2.0, 4.0, 0.7, 0.2, 4.0, 0.4),
        );
        table.insert(
            DriverType::Submissive,
            DriverProfile::new(2.5, 3.5, 1.0, 1.5, 4.0, 0.8, 0.3, 2.5, 0.5),
        );
        table.insert(
            DriverType::Obstacle,
            DriverProfile::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, f64::INFINITY, 0.0, 0.0),
        );
        table
    };
}

impl DriverProfile {
    /// Constructs a profile from raw parameter values.
    ///
    /// Prefer [`DriverProfile::from_driver_type`]; this constructor exists
    /// for custom calibrations and tests.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time_headway: f64,
        min_gap: f64,
        max_acceleration: f64,
        comfortable_deceleration: f64,
        delta: f64,
        politeness: f64,
        change_threshold: f64,
        safe_deceleration: f64,
        right_bias: f64,
    ) -> Self {
        Self {
            time_headway,
            min_gap,
            max_acceleration,
            comfortable_deceleration,
            delta,
            politeness,
            change_threshold,
            safe_deceleration,
            right_bias,
        }
    }

    /// Looks up the parameter set for the given driver kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use highway_traffic_sim_core::drivers::{DriverProfile, DriverType};
    ///
    /// let profile = DriverProfile::from_driver_type(DriverType::Normal);
    /// assert_eq!(profile.time_headway(), 1.5);
    /// assert_eq!(profile.min_gap(), 2.0);
    /// ```
    pub fn from_driver_type(driver_type: DriverType) -> Self {
        DRIVER_PROFILES[&driver_type]
    }

    /// Returns the desired time headway (s).
    pub fn time_headway(&self) -> f64 {
        self.time_headway
    }

    /// Returns the minimum gap (m).
    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    /// Returns the maximum acceleration (m/s^2).
    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    /// Returns the comfortable deceleration (m/s^2).
    pub fn comfortable_deceleration(&self) -> f64 {
        self.comfortable_deceleration
    }

    /// Returns the acceleration exponent.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns the politeness factor.
    pub fn politeness(&self) -> f64 {
        self.politeness
    }

    /// Returns the lane-change threshold (m/s^2).
    pub fn change_threshold(&self) -> f64 {
        self.change_threshold
    }

    /// Returns the safe deceleration bound (m/s^2).
    pub fn safe_deceleration(&self) -> f64 {
        self.safe_deceleration
    }

    /// Returns the right-lane bias (m/s^2).
    pub fn right_bias(&self) -> f64 {
        self.right_bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_table_covers_all_kinds() {
        for kind in DriverType::POPULATION {
            let profile = DriverProfile::from_driver_type(kind);
            assert!(
                profile.max_acceleration() > 0.0,
                "population kind {} must be able to accelerate",
                kind
            );
            assert!(profile.change_threshold().is_finite());
        }
    }

    #[test]
    fn test_obstacle_profile_is_inert() {
        let profile = DriverProfile::from_driver_type(DriverType::Obstacle);
        assert_eq!(profile.max_acceleration(), 0.0);
        assert_eq!(profile.comfortable_deceleration(), 0.0);
        assert!(
            profile.change_threshold().is_infinite(),
            "an obstacle must never clear the lane-change threshold"
        );
    }

    #[test]
    fn test_aggressive_versus_submissive() {
        let aggressive = DriverProfile::from_driver_type(DriverType::Aggressive);
        let submissive = DriverProfile::from_driver_type(DriverType::Submissive);
        assert!(aggressive.time_headway() < submissive.time_headway());
        assert!(aggressive.politeness() < submissive.politeness());
        assert!(aggressive.safe_deceleration() > submissive.safe_deceleration());
    }
}
