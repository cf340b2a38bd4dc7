use crate::agents::{Vehicle, VehicleID, VehiclesStorage};
use crate::drivers::DriverType;
use crate::verbose::{EVENT_DEPLOY, EVENT_DEPLOY_DROPPED, LocalLogger, VerboseLevel};

/// Occupied-spawn threshold floor (m): a spawn point conflicts with any
/// occupant closer than max(occupant length, this).
pub const SPAWN_CONFLICT_DISTANCE: f64 = 20.0;
/// How far the spawn point advances after a conflict (m).
pub const SPAWN_RETRY_ADVANCE: f64 = 25.0;
/// How many conflict-resolution rounds a deployment gets before being dropped.
pub const SPAWN_MAX_ATTEMPTS: usize = 5;
/// Fraction of the desired velocity a vehicle carries at spawn.
pub const SPAWN_VELOCITY_FACTOR: f64 = 0.7;

/// A vehicle injection scheduled for a future simulation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledDeployment {
    /// Driver kind for the new vehicle.
    pub driver_type: DriverType,
    /// Requested lane.
    pub lane: usize,
    /// Requested longitudinal position (m).
    pub initial_position: f64,
    /// Desired (free-road) velocity of the new vehicle (m/s).
    pub desired_velocity: f64,
    /// Simulated time (s) at or after which the vehicle enters the road.
    pub deployment_time: f64,
    /// Whether the new driver is eligible for inattention episodes.
    pub can_be_distracted: bool,
}

impl ScheduledDeployment {
    /// Constructs a new `ScheduledDeploymentBuilder`.
    ///
    /// # Arguments
    /// * `driver_type` - Driver kind for the new vehicle.
    /// * `lane` - Requested lane.
    /// * `deployment_time` - Simulated time (s) of the injection.
    ///
    /// # Example
    /// ```
    /// use highway_traffic_sim_core::deployment::ScheduledDeployment;
    /// use highway_traffic_sim_core::drivers::DriverType;
    /// let entry = ScheduledDeployment::new(DriverType::Aggressive, 1, 5.0)
    ///     .with_desired_velocity(30.0)
    ///     .build();
    /// assert_eq!(entry.deployment_time, 5.0);
    /// ```
    pub fn new(
        driver_type: DriverType,
        lane: usize,
        deployment_time: f64,
    ) -> ScheduledDeploymentBuilder {
        ScheduledDeploymentBuilder {
            entry: ScheduledDeployment {
                driver_type,
                lane,
                initial_position: 0.0,
                desired_velocity: 25.0,
                deployment_time,
                can_be_distracted: false,
            },
        }
    }
}

/// A builder pattern implementation for constructing `ScheduledDeployment`
/// objects.
pub struct ScheduledDeploymentBuilder {
    entry: ScheduledDeployment,
}

impl ScheduledDeploymentBuilder {
    /// Sets the requested spawn position (m). Defaults to the road start.
    pub fn with_initial_position(mut self, position: f64) -> Self {
        self.entry.initial_position = position;
        self
    }

    /// Sets the desired (free-road) velocity (m/s).
    pub fn with_desired_velocity(mut self, desired_velocity: f64) -> Self {
        self.entry.desired_velocity = desired_velocity;
        self
    }

    /// Marks the new driver as eligible for inattention episodes.
    pub fn with_distraction_capability(mut self, can_be_distracted: bool) -> Self {
        self.entry.can_be_distracted = can_be_distracted;
        self
    }

    /// Builds the final `ScheduledDeployment` object.
    pub fn build(self) -> ScheduledDeployment {
        self.entry
    }
}

/// Searches for a conflict-free spawn point for the entry.
///
/// Starting from the requested `(lane, position)`, any active occupant of
/// the lane within `max(occupant_length, 20)` meters pushes the candidate
/// 25 m down the road; running off the end resets the position to zero and
/// rotates to the next lane. After [`SPAWN_MAX_ATTEMPTS`] conflicted rounds
/// the entry is given up on and `None` is returned.
pub fn resolve_spawn_point(
    entry: &ScheduledDeployment,
    vehicles: &VehiclesStorage,
    road_length: f64,
    lanes_count: usize,
) -> Option<(usize, f64)> {
    let mut lane = entry.lane;
    let mut position = entry.initial_position;

    for _ in 0..SPAWN_MAX_ATTEMPTS {
        let conflict = vehicles.values().any(|other| {
            other.is_active
                && other.lane == lane
                && (other.position - position).abs()
                    < other.length.max(SPAWN_CONFLICT_DISTANCE)
        });
        if !conflict {
            return Some((lane, position));
        }
        position += SPAWN_RETRY_ADVANCE;
        if position >= road_length {
            position = 0.0;
            lane = (lane + 1) % lanes_count;
        }
    }
    None
}

/// Deploys every scheduled entry whose time has come.
///
/// Due entries are drained in queue order; each either spawns a vehicle at
/// a conflict-free point (carrying 70% of its desired velocity) or is
/// dropped with a warning through the injected logger. Returns the number
/// of vehicles actually deployed.
#[allow(clippy::too_many_arguments)]
pub fn deploy_due_entries(
    queue: &mut Vec<ScheduledDeployment>,
    vehicles: &mut VehiclesStorage,
    now: f64,
    road_length: f64,
    lanes_count: usize,
    next_vehicle_id: &mut VehicleID,
    logger: &LocalLogger,
) -> usize {
    let mut deployed = 0;
    let mut index = 0;
    while index < queue.len() {
        if queue[index].deployment_time > now {
            index += 1;
            continue;
        }
        let entry = queue.remove(index);
        match resolve_spawn_point(&entry, vehicles, road_length, lanes_count) {
            Some((lane, position)) => {
                let vehicle = Vehicle::new(*next_vehicle_id)
                    .with_driver_type(entry.driver_type)
                    .with_position(position)
                    .with_velocity(SPAWN_VELOCITY_FACTOR * entry.desired_velocity)
                    .with_lane(lane)
                    .with_desired_velocity(entry.desired_velocity)
                    .with_distraction_capability(entry.can_be_distracted)
                    .build();
                *next_vehicle_id += 1;
                if logger.is_at_least(VerboseLevel::Additional) {
                    logger.log_with_fields(
                        EVENT_DEPLOY,
                        "Deployed scheduled vehicle",
                        &[
                            ("vehicle_id", &vehicle.id),
                            ("driver_type", &vehicle.driver_type),
                            ("lane", &lane),
                            ("position", &position),
                        ],
                    );
                }
                vehicles.insert_vehicle(vehicle);
                deployed += 1;
            }
            None => {
                logger.log_with_fields(
                    EVENT_DEPLOY_DROPPED,
                    "Could not deploy vehicle, spawn blocked; skipping",
                    &[("time", &now), ("lane", &entry.lane), ("position", &entry.initial_position)],
                );
            }
        }
    }
    deployed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied_storage(entries: &[(VehicleID, f64, usize)]) -> VehiclesStorage {
        let mut storage = VehiclesStorage::new();
        for (id, position, lane) in entries {
            storage.insert_vehicle(
                Vehicle::new(*id).with_position(*position).with_lane(*lane).build(),
            );
        }
        storage
    }

    #[test]
    fn test_spawn_on_empty_road() {
        let vehicles = VehiclesStorage::new();
        let entry = ScheduledDeployment::new(DriverType::Normal, 1, 0.0)
            .with_initial_position(40.0)
            .build();
        assert_eq!(resolve_spawn_point(&entry, &vehicles, 1000.0, 3), Some((1, 40.0)));
    }

    #[test]
    fn test_conflict_advances_spawn() {
        // Occupant sitting on the requested point; one advance clears the
        // 20 m conflict floor
        let vehicles = occupied_storage(&[(1, 0.0, 0)]);
        let entry = ScheduledDeployment::new(DriverType::Normal, 0, 0.0).build();
        assert_eq!(
            resolve_spawn_point(&entry, &vehicles, 1000.0, 2),
            Some((0, 25.0)),
            "spawn must shift one advance down the road"
        );
    }

    #[test]
    fn test_end_of_road_rotates_lane() {
        let vehicles = occupied_storage(&[(1, 990.0, 0)]);
        let entry = ScheduledDeployment::new(DriverType::Normal, 0, 990.0).build();
        assert_eq!(
            resolve_spawn_point(&entry, &vehicles, 1000.0, 2),
            Some((1, 0.0)),
            "running off the end must wrap to the next lane's start"
        );
    }

    #[test]
    fn test_hopeless_spawn_is_dropped() {
        // Single lane fully congested around every retry point
        let vehicles = occupied_storage(&[
            (1, 0.0, 0),
            (2, 25.0, 0),
            (3, 50.0, 0),
            (4, 75.0, 0),
            (5, 100.0, 0),
            (6, 125.0, 0),
        ]);
        let entry = ScheduledDeployment::new(DriverType::Normal, 0, 0.0).build();
        assert_eq!(resolve_spawn_point(&entry, &vehicles, 1000.0, 1), None);
    }

    #[test]
    fn test_deploy_due_entries_spawns_at_seventy_percent() {
        let mut vehicles = VehiclesStorage::new();
        let mut queue = vec![
            ScheduledDeployment::new(DriverType::Aggressive, 1, 5.0)
                .with_desired_velocity(30.0)
                .build(),
            ScheduledDeployment::new(DriverType::Normal, 0, 99.0).build(),
        ];
        let mut next_id: VehicleID = 0;
        let logger = LocalLogger::none();

        let deployed =
            deploy_due_entries(&mut queue, &mut vehicles, 5.0, 1000.0, 2, &mut next_id, &logger);
        assert_eq!(deployed, 1);
        assert_eq!(queue.len(), 1, "the future entry must stay queued");

        let vehicle = vehicles.get(&0).expect("deployed vehicle present");
        assert_eq!(vehicle.velocity, 21.0, "spawn velocity is 0.7 * desired");
        assert_eq!(vehicle.lane, 1);
        assert_eq!(next_id, 1);
    }

    #[test]
    fn test_all_due_entries_processed_in_one_tick() {
        let mut vehicles = VehiclesStorage::new();
        let mut queue = vec![
            ScheduledDeployment::new(DriverType::Normal, 0, 1.0).build(),
            ScheduledDeployment::new(DriverType::Cautious, 1, 2.0).build(),
        ];
        let mut next_id: VehicleID = 10;
        let logger = LocalLogger::none();

        let deployed =
            deploy_due_entries(&mut queue, &mut vehicles, 3.0, 1000.0, 2, &mut next_id, &logger);
        assert_eq!(deployed, 2);
        assert!(queue.is_empty());
        assert_eq!(vehicles.len(), 2);
    }
}
