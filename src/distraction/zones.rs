use crate::agents::Vehicle;

/// A geographic, time-bounded slow-down zone ("positional distraction").
///
/// While the zone is active, any non-obstacle vehicle within `range` meters
/// of `center` has its post-integration velocity capped at
/// `slowness * desired_velocity` for that tick. Overlapping zones compose
/// by taking the strictest (minimum) slowness.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalDistraction {
    /// Center of the affected window (m).
    pub center: f64,
    /// Half-width of the affected window (m).
    pub range: f64,
    /// Velocity multiplier in (0, 1]; 1.0 means no effect.
    pub slowness: f64,
    /// Simulated time (s) the zone appears.
    pub spawn_time: f64,
    /// How long the zone lasts (s).
    pub duration: f64,
}

impl PositionalDistraction {
    /// Constructs a new `PositionalDistractionBuilder`.
    ///
    /// # Arguments
    /// * `center` - Center of the affected window (m).
    /// * `range` - Half-width of the affected window (m).
    ///
    /// # Example
    /// ```
    /// use highway_traffic_sim_core::distraction::PositionalDistraction;
    /// let zone = PositionalDistraction::new(500.0, 50.0)
    ///     .with_slowness(0.5)
    ///     .with_window(0.0, 120.0)
    ///     .build();
    /// assert!(zone.is_active(60.0));
    /// assert!(!zone.is_active(120.0));
    /// ```
    pub fn new(center: f64, range: f64) -> PositionalDistractionBuilder {
        PositionalDistractionBuilder {
            zone: PositionalDistraction {
                center,
                range,
                slowness: 0.7,
                spawn_time: 0.0,
                duration: 30.0,
            },
        }
    }

    /// Whether the zone affects traffic at the given time.
    ///
    /// Active from `spawn_time` (inclusive) to `spawn_time + duration`
    /// (exclusive).
    pub fn is_active(&self, now: f64) -> bool {
        now >= self.spawn_time && now < self.spawn_time + self.duration
    }

    /// Whether the given position falls inside the affected window.
    pub fn covers(&self, position: f64) -> bool {
        (position - self.center).abs() <= self.range
    }
}

/// A builder pattern implementation for constructing
/// `PositionalDistraction` objects.
pub struct PositionalDistractionBuilder {
    zone: PositionalDistraction,
}

impl PositionalDistractionBuilder {
    /// Sets the velocity multiplier in (0, 1]. Defaults to 0.7.
    pub fn with_slowness(mut self, slowness: f64) -> Self {
        self.zone.slowness = slowness;
        self
    }

    /// Sets the activity window: spawn time and duration (s).
    pub fn with_window(mut self, spawn_time: f64, duration: f64) -> Self {
        self.zone.spawn_time = spawn_time;
        self.zone.duration = duration;
        self
    }

    /// Builds the final `PositionalDistraction` object.
    pub fn build(self) -> PositionalDistraction {
        self.zone
    }
}

/// The strictest slowness factor in effect for a vehicle, if any.
///
/// Scans all zones active at `now` that cover the vehicle's current
/// position; obstacles are exempt. `None` means no cap this tick.
pub fn zone_slowness_for(
    zones: &[PositionalDistraction],
    vehicle: &Vehicle,
    now: f64,
) -> Option<f64> {
    if vehicle.is_obstacle() {
        return None;
    }
    zones
        .iter()
        .filter(|zone| zone.is_active(now) && zone.covers(vehicle.position))
        .map(|zone| zone.slowness)
        .reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::DriverType;

    fn vehicle_at(position: f64) -> Vehicle {
        Vehicle::new(1)
            .with_driver_type(DriverType::Normal)
            .with_position(position)
            .build()
    }

    #[test]
    fn test_window_bounds() {
        let zone = PositionalDistraction::new(500.0, 50.0).with_window(10.0, 20.0).build();
        assert!(!zone.is_active(9.9));
        assert!(zone.is_active(10.0));
        assert!(zone.is_active(29.9));
        assert!(!zone.is_active(30.0), "window end is exclusive");
    }

    #[test]
    fn test_coverage_is_inclusive() {
        let zone = PositionalDistraction::new(500.0, 50.0).build();
        assert!(zone.covers(450.0));
        assert!(zone.covers(550.0));
        assert!(!zone.covers(550.1));
    }

    #[test]
    fn test_overlapping_zones_take_minimum() {
        let zones = vec![
            PositionalDistraction::new(500.0, 100.0)
                .with_slowness(0.8)
                .with_window(0.0, 100.0)
                .build(),
            PositionalDistraction::new(520.0, 40.0)
                .with_slowness(0.4)
                .with_window(0.0, 100.0)
                .build(),
        ];
        let inside_both = vehicle_at(510.0);
        assert_eq!(zone_slowness_for(&zones, &inside_both, 50.0), Some(0.4));

        let inside_one = vehicle_at(420.0);
        assert_eq!(zone_slowness_for(&zones, &inside_one, 50.0), Some(0.8));

        let outside = vehicle_at(100.0);
        assert_eq!(zone_slowness_for(&zones, &outside, 50.0), None);
    }

    #[test]
    fn test_expired_zone_has_no_effect() {
        let zones = vec![
            PositionalDistraction::new(500.0, 50.0).with_slowness(0.5).with_window(0.0, 10.0).build(),
        ];
        let vehicle = vehicle_at(500.0);
        assert_eq!(zone_slowness_for(&zones, &vehicle, 10.0), None);
    }

    #[test]
    fn test_obstacles_are_exempt() {
        let zones = vec![
            PositionalDistraction::new(500.0, 50.0).with_slowness(0.5).with_window(0.0, 100.0).build(),
        ];
        let obstacle = Vehicle::new(1)
            .with_position(500.0)
            .with_obstacle_window(0.0, f64::INFINITY)
            .build();
        assert_eq!(zone_slowness_for(&zones, &obstacle, 50.0), None);
    }
}
