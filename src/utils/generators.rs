use crate::agents::Vehicle;
use crate::drivers::DriverType;

/// Generates an evenly spaced single-lane platoon of identical vehicles.
///
/// Handy for benchmarks and tests that need a populated road without going
/// through world construction: `n` vehicles of the given driver kind, lead
/// vehicle first, each `spacing` meters behind the previous one, all
/// rolling at `velocity` with the same desired velocity.
///
/// # Arguments
///
/// - `n` - Number of vehicles
/// - `lane` - Lane index for the whole platoon
/// - `spacing` - Bumper-to-bumper distance between consecutive vehicles (m)
/// - `velocity` - Initial and desired velocity (m/s)
/// - `driver_type` - Driver kind for every vehicle
///
/// # Examples
///
/// ```rust
/// use highway_traffic_sim_core::drivers::DriverType;
/// use highway_traffic_sim_core::utils::generators::generate_platoon;
///
/// let platoon = generate_platoon(5, 0, 30.0, 25.0, DriverType::Normal);
/// assert_eq!(platoon.len(), 5);
/// // Lead vehicle sits furthest down the road
/// assert!(platoon[0].position > platoon[4].position);
/// ```
pub fn generate_platoon(
    n: usize,
    lane: usize,
    spacing: f64,
    velocity: f64,
    driver_type: DriverType,
) -> Vec<Vehicle> {
    let mut vehicles = Vec::with_capacity(n);
    for i in 0..n {
        let vehicle = Vehicle::new(i as u64)
            .with_driver_type(driver_type)
            .with_lane(lane)
            .with_velocity(velocity)
            .with_desired_velocity(velocity)
            .build();
        // Head of the platoon first; each follower sits one body plus one
        // spacing further back
        let position = (n - 1 - i) as f64 * (vehicle.length + spacing);
        vehicles.push(Vehicle { position, ..vehicle });
    }
    vehicles
}
