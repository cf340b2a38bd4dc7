use crate::agents::{Vehicle, VehicleID, VehiclesStorage};

/// Finds the nearest vehicle ahead of `position` in the given lane.
///
/// Scans only the target lane; the ego itself and inactive obstacles are
/// excluded. The road is open, so "ahead" means strictly greater position
/// with no wrap-around. Returns `None` on an empty lane segment.
///
/// # Example
/// ```rust
/// use highway_traffic_sim_core::agents::{Vehicle, VehiclesStorage};
/// use highway_traffic_sim_core::neighborhood::find_leader;
///
/// let mut vehicles = VehiclesStorage::new();
/// vehicles.insert_vehicle(Vehicle::new(1).with_position(100.0).with_lane(0).build());
/// vehicles.insert_vehicle(Vehicle::new(2).with_position(180.0).with_lane(0).build());
/// vehicles.insert_vehicle(Vehicle::new(3).with_position(150.0).with_lane(1).build());
///
/// let leader = find_leader(&vehicles, 1, 0, 100.0).expect("vehicle 2 is ahead");
/// assert_eq!(leader.id, 2);
/// ```
pub fn find_leader(
    vehicles: &VehiclesStorage,
    ego_id: VehicleID,
    lane: usize,
    position: f64,
) -> Option<&Vehicle> {
    let mut leader: Option<&Vehicle> = None;
    let mut min_distance = f64::INFINITY;
    for vehicle in vehicles.values() {
        if vehicle.id == ego_id || vehicle.lane != lane || !vehicle.is_active {
            continue;
        }
        let distance = vehicle.position - position;
        if distance > 0.0 && distance < min_distance {
            min_distance = distance;
            leader = Some(vehicle);
        }
    }
    leader
}

/// Finds the nearest vehicle behind `position` in the given lane.
///
/// Mirror image of [`find_leader`]: strictly smaller position, same
/// exclusions, `None` when the lane is empty behind the query point.
pub fn find_follower(
    vehicles: &VehiclesStorage,
    ego_id: VehicleID,
    lane: usize,
    position: f64,
) -> Option<&Vehicle> {
    let mut follower: Option<&Vehicle> = None;
    let mut min_distance = f64::INFINITY;
    for vehicle in vehicles.values() {
        if vehicle.id == ego_id || vehicle.lane != lane || !vehicle.is_active {
            continue;
        }
        let distance = position - vehicle.position;
        if distance > 0.0 && distance < min_distance {
            min_distance = distance;
            follower = Some(vehicle);
        }
    }
    follower
}

/// Finds both neighbors around `position` in the given lane in one scan.
///
/// Returns `(leader, follower)`; either may be `None`.
pub fn find_neighbors(
    vehicles: &VehiclesStorage,
    ego_id: VehicleID,
    lane: usize,
    position: f64,
) -> (Option<&Vehicle>, Option<&Vehicle>) {
    let mut leader: Option<&Vehicle> = None;
    let mut min_lead_distance = f64::INFINITY;
    let mut follower: Option<&Vehicle> = None;
    let mut min_follow_distance = f64::INFINITY;

    for vehicle in vehicles.values() {
        if vehicle.id == ego_id || vehicle.lane != lane || !vehicle.is_active {
            continue;
        }
        let distance = vehicle.position - position;
        if distance > 0.0 && distance < min_lead_distance {
            min_lead_distance = distance;
            leader = Some(vehicle);
        }
        if distance < 0.0 && -distance < min_follow_distance {
            min_follow_distance = -distance;
            follower = Some(vehicle);
        }
    }
    (leader, follower)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_with(entries: &[(VehicleID, f64, usize)]) -> VehiclesStorage {
        let mut storage = VehiclesStorage::new();
        for (id, position, lane) in entries {
            storage.insert_vehicle(
                Vehicle::new(*id).with_position(*position).with_lane(*lane).build(),
            );
        }
        storage
    }

    #[test]
    fn test_leader_and_follower_in_lane() {
        let vehicles = storage_with(&[(1, 100.0, 0), (2, 250.0, 0), (3, 40.0, 0), (4, 180.0, 1)]);
        let (leader, follower) = find_neighbors(&vehicles, 1, 0, 100.0);
        assert_eq!(leader.map(|v| v.id), Some(2), "nearest ahead in lane 0");
        assert_eq!(follower.map(|v| v.id), Some(3), "nearest behind in lane 0");
    }

    #[test]
    fn test_empty_lane_yields_none() {
        let vehicles = storage_with(&[(1, 100.0, 0)]);
        let (leader, follower) = find_neighbors(&vehicles, 1, 2, 100.0);
        assert!(leader.is_none());
        assert!(follower.is_none());
    }

    #[test]
    fn test_ego_is_excluded() {
        let vehicles = storage_with(&[(1, 100.0, 0)]);
        assert!(find_leader(&vehicles, 1, 0, 90.0).is_none());
        assert!(find_follower(&vehicles, 1, 0, 110.0).is_none());
    }

    #[test]
    fn test_inactive_obstacle_is_invisible() {
        let mut vehicles = storage_with(&[(1, 100.0, 0)]);
        vehicles.insert_vehicle(
            Vehicle::new(9)
                .with_position(300.0)
                .with_lane(0)
                .with_obstacle_window(50.0, 100.0)
                .build(),
        );
        // Window has not opened: the obstacle must not show up as a leader
        assert!(find_leader(&vehicles, 1, 0, 100.0).is_none());

        if let Some(obstacle) = vehicles.get_mut(&9) {
            obstacle.refresh_obstacle_window(60.0);
        }
        assert_eq!(find_leader(&vehicles, 1, 0, 100.0).map(|v| v.id), Some(9));
    }

    #[test]
    fn test_nearest_wins_among_many() {
        let vehicles =
            storage_with(&[(1, 100.0, 0), (2, 400.0, 0), (3, 140.0, 0), (4, 120.0, 0)]);
        assert_eq!(find_leader(&vehicles, 1, 0, 100.0).map(|v| v.id), Some(4));
    }
}
