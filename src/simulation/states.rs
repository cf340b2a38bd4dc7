use crate::agents::{Vehicle, VehicleID};
use crate::drivers::DriverType;
use serde_json::{Value, json};
use uuid::Uuid;

/// State of a single driver-vehicle at a tick boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    pub id: VehicleID,
    pub lane: usize,
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub driver_type: DriverType,
    pub is_distracted: bool,
}

impl VehicleState {
    pub(crate) fn of(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            lane: vehicle.lane,
            position: vehicle.position,
            velocity: vehicle.velocity,
            acceleration: vehicle.acceleration,
            driver_type: vehicle.driver_type,
            is_distracted: vehicle.is_distracted,
        }
    }
}

/// State of a static obstacle at a tick boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleState {
    pub id: VehicleID,
    pub lane: usize,
    pub position: f64,
    pub is_active: bool,
    pub start_time: f64,
    pub end_time: f64,
}

impl ObstacleState {
    pub(crate) fn of(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            lane: vehicle.lane,
            position: vehicle.position,
            is_active: vehicle.is_active,
            start_time: vehicle.obstacle_start_time,
            end_time: vehicle.obstacle_end_time,
        }
    }
}

/// Aggregate statistics carried inside a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    /// Mean velocity on the most recent tick, if one was recorded.
    pub mean_velocity: Option<f64>,
    /// Active non-obstacle vehicles per lane.
    pub vehicles_per_lane: Vec<usize>,
    /// Cumulative committed lane changes.
    pub lane_changes: u64,
    /// Ticks executed so far.
    pub ticks: usize,
}

/// Immutable view of the world at a tick boundary.
///
/// This is the sole interface through which external collaborators
/// (visualization, reporting) read the simulation; nothing in it aliases
/// live world state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    /// Identifier of the world the snapshot was taken from.
    pub world_id: Uuid,
    /// Simulated time (s).
    pub time: f64,
    /// Driver-vehicles, in storage order.
    pub vehicles: Vec<VehicleState>,
    /// Obstacles, active or not.
    pub obstacles: Vec<ObstacleState>,
    /// Aggregate statistics.
    pub stats: StatsSummary,
}

impl SimState {
    /// Renders the snapshot as a JSON value for external collaborators.
    ///
    /// # Example
    /// ```
    /// use highway_traffic_sim_core::simulation::config::WorldConfig;
    /// use highway_traffic_sim_core::simulation::world::World;
    ///
    /// let config = WorldConfig::new().with_n_vehicles(2).with_seed(1).build().unwrap();
    /// let world = World::new(config);
    /// let json = world.snapshot().to_json();
    /// assert_eq!(json["vehicles"].as_array().unwrap().len(), 2);
    /// ```
    pub fn to_json(&self) -> Value {
        json!({
            "world_id": self.world_id.to_string(),
            "time": self.time,
            "vehicles": self
                .vehicles
                .iter()
                .map(|v| {
                    json!({
                        "id": v.id,
                        "lane": v.lane,
                        "position": v.position,
                        "velocity": v.velocity,
                        "acceleration": v.acceleration,
                        "driver_type": v.driver_type.to_string(),
                        "is_distracted": v.is_distracted,
                    })
                })
                .collect::<Vec<_>>(),
            "obstacles": self
                .obstacles
                .iter()
                .map(|o| {
                    json!({
                        "id": o.id,
                        "lane": o.lane,
                        "position": o.position,
                        "is_active": o.is_active,
                        "start_time": o.start_time,
                        "end_time": if o.end_time.is_finite() {
                            Value::from(o.end_time)
                        } else {
                            Value::Null
                        },
                    })
                })
                .collect::<Vec<_>>(),
            "stats": {
                "mean_velocity": self.stats.mean_velocity,
                "vehicles_per_lane": self.stats.vehicles_per_lane,
                "lane_changes": self.stats.lane_changes,
                "ticks": self.stats.ticks,
            },
        })
    }
}
