use crate::agents::{Vehicle, VehicleID, VehiclesStorage};
use crate::deployment::{
    SPAWN_CONFLICT_DISTANCE, SPAWN_VELOCITY_FACTOR, ScheduledDeployment, deploy_due_entries,
};
use crate::distraction::{
    PositionalDistraction, emergency_deceleration, refresh_distraction, zone_slowness_for,
};
use crate::lateral::decide_lane_change;
use crate::longitudinal::idm_acceleration;
use crate::neighborhood::find_leader;
use crate::simulation::config::{ConfigError, WorldConfig};
use crate::simulation::states::{ObstacleState, SimState, StatsSummary, VehicleState};
use crate::simulation::stats::Statistics;
use crate::utils::rand::seeded_rng;
use crate::verbose::{
    EVENT_DISTRACTION_BEGIN, EVENT_DISTRACTION_END, EVENT_EMERGENCY_BRAKE, EVENT_LANE_CHANGE,
    EVENT_OBSTACLE_WINDOW, EVENT_OVERLAP_WARNING, EVENT_RETIRE, EVENT_RUN_CANCELLED,
    EVENT_RUN_COMPLETE, EVENT_WORLD_CREATE, EVENT_WORLD_RESET, LocalLogger, VerboseLevel,
};
use crate::{log_additional, log_detailed};
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Lower bound of the desired-velocity draw for the initial population (m/s).
pub const INITIAL_DESIRED_VELOCITY_MIN: f64 = 25.0;
/// Upper bound of the desired-velocity draw for the initial population (m/s).
pub const INITIAL_DESIRED_VELOCITY_MAX: f64 = 35.0;
/// Clearance floor around an initial placement (m).
pub const PLACEMENT_CLEARANCE: f64 = 10.0;
// Bail-out bound for the rejection-sampling placement loop; a road packed
// beyond this is a configuration problem, not something to spin on.
const PLACEMENT_MAX_ATTEMPTS: usize = 10_000;

/// Construction parameters of a static obstacle, retained for `reset()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSpec {
    pub position: f64,
    pub lane: usize,
    pub start_time: f64,
    pub end_time: f64,
}

/// The simulation world: road geometry, the vehicle population, pending
/// deployments, slow-down zones, statistics, and the single pseudo-random
/// stream of the run.
///
/// A world is single-threaded within a run. Each tick is a two-phase
/// compute-then-apply pass over the population: accelerations are computed
/// from the pre-step state, lane changes are committed before integration,
/// and integration consumes the freshly computed accelerations. External
/// collaborators observe state only between ticks, through [`World::snapshot`].
pub struct World {
    /// Unique world identifier
    id: Uuid,
    /// Validated construction parameters
    config: WorldConfig,
    /// Current simulated time (s)
    time: f64,
    /// Driver-vehicles and obstacles, in insertion order
    vehicles: VehiclesStorage,
    /// IDs of the obstacle vehicles inside `vehicles`
    obstacle_ids: Vec<VehicleID>,
    /// Pending scheduled deployments
    scheduled: Vec<ScheduledDeployment>,
    /// Positional slow-down zones
    zones: Vec<PositionalDistraction>,
    /// Per-run statistics accumulators
    stats: Statistics,
    /// The single pseudo-random stream of the run
    rng: StdRng,
    /// Logging sink injected at construction
    logger: LocalLogger,
    /// Cooperative cancellation flag, checked at tick boundaries
    cancel: Arc<AtomicBool>,
    /// Next vehicle identifier to hand out
    next_vehicle_id: VehicleID,

    // Originals retained so reset() can restore the configured run
    original_scheduled: Vec<ScheduledDeployment>,
    original_zones: Vec<PositionalDistraction>,
    original_obstacles: Vec<ObstacleSpec>,
}

impl World {
    /// Creates a world from a validated configuration and populates the
    /// initial random traffic.
    pub fn new(config: WorldConfig) -> Self {
        Self::with_logger(config, LocalLogger::none())
    }

    /// Creates a world with an explicit logging sink.
    pub fn with_logger(config: WorldConfig, logger: LocalLogger) -> Self {
        let id = Uuid::new_v4();
        let rng = seeded_rng(config.seed);
        let mut world = World {
            id,
            config,
            time: 0.0,
            vehicles: VehiclesStorage::new(),
            obstacle_ids: Vec::new(),
            scheduled: Vec::new(),
            zones: Vec::new(),
            stats: Statistics::new(),
            rng,
            logger,
            cancel: Arc::new(AtomicBool::new(false)),
            next_vehicle_id: 0,
            original_scheduled: Vec::new(),
            original_zones: Vec::new(),
            original_obstacles: Vec::new(),
        };
        world.initialize_vehicles();
        if world.logger.is_at_least(VerboseLevel::Main) {
            world.logger.log_with_fields(
                EVENT_WORLD_CREATE,
                "World created",
                &[
                    ("road_length", &world.config.road_length),
                    ("lanes", &world.config.lanes_count),
                    ("vehicles", &world.vehicles.len()),
                ],
            );
        }
        world
    }

    /// Gets the unique world identifier
    pub fn get_id(&self) -> Uuid {
        self.id
    }

    /// Current simulated time (s)
    pub fn get_time(&self) -> f64 {
        self.time
    }

    /// The validated configuration this world was built from
    pub fn get_config(&self) -> &WorldConfig {
        &self.config
    }

    /// Read access to the vehicle population
    pub fn get_vehicles(&self) -> &VehiclesStorage {
        &self.vehicles
    }

    /// Read access to the per-run statistics
    pub fn get_stats(&self) -> &Statistics {
        &self.stats
    }

    /// The cooperative cancellation flag. Setting it stops `run_steps` at
    /// the next tick boundary; share the clone across threads as needed.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Inserts a fully built vehicle into the population.
    ///
    /// Obstacle vehicles are tracked for activity-window refresh. The
    /// internal ID counter advances past the inserted ID so subsequent
    /// deployments stay unique.
    pub fn insert_vehicle(&mut self, vehicle: Vehicle) {
        if vehicle.is_obstacle() {
            self.obstacle_ids.push(vehicle.id);
        }
        self.next_vehicle_id = self.next_vehicle_id.max(vehicle.id + 1);
        self.vehicles.insert_vehicle(vehicle);
    }

    /// Appends a deployment to the pending queue.
    ///
    /// Entries whose time has already passed are processed on the next
    /// step. The lane is validated against the world geometry.
    pub fn schedule_vehicle(&mut self, entry: ScheduledDeployment) -> Result<(), ConfigError> {
        self.config.check_lane(entry.lane)?;
        self.original_scheduled.push(entry.clone());
        self.scheduled.push(entry);
        Ok(())
    }

    /// Adds a positional slow-down zone.
    pub fn add_positional_distraction(&mut self, zone: PositionalDistraction) {
        self.original_zones.push(zone.clone());
        self.zones.push(zone);
    }

    /// Places a static obstacle with an activity window.
    ///
    /// The obstacle occupies `(lane, position)` from `start_time`
    /// (inclusive) to `end_time` (exclusive) and participates in
    /// neighborhood queries only while active.
    pub fn add_obstacle(
        &mut self,
        position: f64,
        lane: usize,
        start_time: f64,
        end_time: f64,
    ) -> Result<(), ConfigError> {
        self.config.check_lane(lane)?;
        let spec = ObstacleSpec { position, lane, start_time, end_time };
        self.original_obstacles.push(spec);
        self.spawn_obstacle(spec);
        Ok(())
    }

    fn spawn_obstacle(&mut self, spec: ObstacleSpec) {
        let obstacle = Vehicle::new(self.next_vehicle_id)
            .with_position(spec.position)
            .with_lane(spec.lane)
            .with_obstacle_window(spec.start_time, spec.end_time)
            .build();
        self.next_vehicle_id += 1;
        self.obstacle_ids.push(obstacle.id);
        self.vehicles.insert_vehicle(obstacle);
    }

    /// Places the initial random population.
    ///
    /// Driver kinds come from the configured distribution; positions and
    /// lanes are rejection-sampled until clear of every occupant; the
    /// desired velocity is uniform in [25, 35) m/s and vehicles start at
    /// 70% of it. Draw order is fixed, which keeps seeded runs
    /// reproducible.
    fn initialize_vehicles(&mut self) {
        let driver_types = self
            .config
            .driver_distribution
            .realise(self.config.n_vehicles, &mut self.rng);

        for driver_type in driver_types {
            let mut placed = None;
            for _ in 0..PLACEMENT_MAX_ATTEMPTS {
                let position = self.rng.random_range(0.0..self.config.road_length);
                let lane = self.rng.random_range(0..self.config.lanes_count);
                let conflict = self.vehicles.values().any(|other| {
                    other.lane == lane && {
                        let clearance = if other.is_obstacle() {
                            SPAWN_CONFLICT_DISTANCE
                        } else {
                            other.length.max(PLACEMENT_CLEARANCE)
                        };
                        (other.position - position).abs() < clearance
                    }
                });
                if !conflict {
                    placed = Some((position, lane));
                    break;
                }
            }
            let Some((position, lane)) = placed else {
                self.logger.log(
                    EVENT_OVERLAP_WARNING,
                    "No clear slot found for an initial vehicle; skipping it",
                );
                continue;
            };

            let desired_velocity = self
                .rng
                .random_range(INITIAL_DESIRED_VELOCITY_MIN..INITIAL_DESIRED_VELOCITY_MAX);
            let roll: u32 = self.rng.random_range(1..=100);
            let can_be_distracted = f64::from(roll) <= self.config.distracted_percentage;

            let vehicle = Vehicle::new(self.next_vehicle_id)
                .with_driver_type(driver_type)
                .with_position(position)
                .with_velocity(SPAWN_VELOCITY_FACTOR * desired_velocity)
                .with_lane(lane)
                .with_desired_velocity(desired_velocity)
                .with_distraction_capability(can_be_distracted)
                .build();
            self.next_vehicle_id += 1;
            self.vehicles.insert_vehicle(vehicle);
        }
    }

    /// Advances the simulation by exactly one tick.
    ///
    /// Pipeline, in order: deploy due vehicles, refresh obstacle windows,
    /// refresh distraction state and zone membership, compute IDM
    /// accelerations from the pre-step state, commit gated MOBIL lane
    /// changes, integrate kinematics, retire vehicles past the road end,
    /// record statistics.
    pub fn step(&mut self) {
        let now = self.time;
        let dt = self.config.dt;

        // 1. Deploy every due scheduled entry
        deploy_due_entries(
            &mut self.scheduled,
            &mut self.vehicles,
            now,
            self.config.road_length,
            self.config.lanes_count,
            &mut self.next_vehicle_id,
            &self.logger,
        );

        // 2. Obstacle activity windows
        for id in &self.obstacle_ids {
            if let Some(obstacle) = self.vehicles.get_mut(id) {
                let was_active = obstacle.is_active;
                obstacle.refresh_obstacle_window(now);
                if was_active != obstacle.is_active {
                    log_additional!(
                        EVENT_OBSTACLE_WINDOW,
                        "Obstacle activity toggled",
                        obstacle_id = obstacle.id,
                        is_active = obstacle.is_active
                    );
                }
            }
        }

        // 3. Distraction refresh and zone membership
        for vehicle in self.vehicles.values_mut() {
            let flipped = refresh_distraction(vehicle, now, &mut self.rng);
            if flipped {
                if vehicle.is_distracted {
                    log_additional!(
                        EVENT_DISTRACTION_BEGIN,
                        "Driver distracted",
                        vehicle_id = vehicle.id,
                        duration = vehicle.distraction_duration
                    );
                } else {
                    log_additional!(
                        EVENT_DISTRACTION_END,
                        "Driver attentive again",
                        vehicle_id = vehicle.id
                    );
                }
            }
            vehicle.zone_slowness = zone_slowness_for(&self.zones, vehicle, now);
        }

        // 4. Accelerations, all from the pre-integration state
        let mut accelerations: Vec<(VehicleID, f64)> = Vec::with_capacity(self.vehicles.len());
        for vehicle in self.vehicles.values() {
            if vehicle.is_obstacle() {
                continue;
            }
            let leader = find_leader(&self.vehicles, vehicle.id, vehicle.lane, vehicle.position);
            accelerations.push((vehicle.id, idm_acceleration(vehicle, leader)));
        }
        for (id, acceleration) in accelerations {
            if let Some(vehicle) = self.vehicles.get_mut(&id) {
                vehicle.acceleration = acceleration;
            }
        }

        // 5. Lateral decisions, committed before integration so the
        // neighborhoods used downstream reflect the new lanes
        let mut lane_changes_this_tick = 0u64;
        for id in self.vehicles.ids() {
            let gate = {
                let Some(vehicle) = self.vehicles.get(&id) else { continue };
                if vehicle.is_obstacle() || vehicle.is_distracted {
                    continue;
                }
                self.rng.random::<f64>() < self.config.lane_change_rate
            };
            if !gate {
                continue;
            }
            let plan = match self.vehicles.get(&id) {
                Some(ego) => decide_lane_change(ego, &self.vehicles, self.config.lanes_count),
                None => None,
            };
            if let Some(plan) = plan {
                if let Some(vehicle) = self.vehicles.get_mut(&id) {
                    let from_lane = vehicle.lane;
                    vehicle.lane = plan.target_lane;
                    lane_changes_this_tick += 1;
                    log_additional!(
                        EVENT_LANE_CHANGE,
                        "Committed lane change",
                        vehicle_id = id,
                        from_lane = from_lane,
                        to_lane = plan.target_lane
                    );
                }
            }
        }
        self.stats.add_lane_changes(lane_changes_this_tick);

        // 6. Integrate kinematics. Distracted drivers hold their velocity
        // unless the emergency override fires; zone caps apply after the
        // velocity update; position advances with the final velocity.
        let mut distracted_gaps: Vec<(VehicleID, Option<f64>)> = Vec::new();
        for vehicle in self.vehicles.values() {
            if vehicle.is_distracted && !vehicle.is_obstacle() {
                let gap = find_leader(&self.vehicles, vehicle.id, vehicle.lane, vehicle.position)
                    .map(|leader| vehicle.gap_to(leader));
                distracted_gaps.push((vehicle.id, gap));
            }
        }
        let distracted_gaps: HashMap<VehicleID, Option<f64>> =
            distracted_gaps.into_iter().collect();

        for vehicle in self.vehicles.values_mut() {
            if vehicle.is_obstacle() {
                continue;
            }
            if !vehicle.is_distracted {
                vehicle.velocity = (vehicle.velocity + vehicle.acceleration * dt)
                    .clamp(0.0, vehicle.velocity_ceiling());
            } else {
                let gap = distracted_gaps.get(&vehicle.id).copied().flatten();
                if let Some(deceleration) = emergency_deceleration(vehicle, gap, dt) {
                    vehicle.velocity -= deceleration * dt;
                    log_detailed!(
                        EVENT_EMERGENCY_BRAKE,
                        "Distracted driver forced to brake",
                        vehicle_id = vehicle.id,
                        deceleration = deceleration
                    );
                }
            }
            if let Some(slowness) = vehicle.zone_slowness {
                vehicle.velocity = vehicle.velocity.min(slowness * vehicle.desired_velocity);
            }
            vehicle.position += vehicle.velocity * dt;
        }

        // 7. Retire vehicles that crossed the road end
        let exited: Vec<VehicleID> = self
            .vehicles
            .values()
            .filter(|v| !v.is_obstacle() && v.position >= self.config.road_length)
            .map(|v| v.id)
            .collect();
        for id in exited {
            self.vehicles.remove_vehicle(&id);
            log_additional!(EVENT_RETIRE, "Vehicle left the road", vehicle_id = id);
        }

        // 8. Statistics
        let mut lane_counts = vec![0usize; self.config.lanes_count];
        let mut velocity_sum = 0.0;
        let mut moving = 0usize;
        for vehicle in self.vehicles.values() {
            if vehicle.is_obstacle() || !vehicle.is_active {
                continue;
            }
            velocity_sum += vehicle.velocity;
            moving += 1;
            if vehicle.lane < lane_counts.len() {
                lane_counts[vehicle.lane] += 1;
            }
        }
        let mean_velocity = if moving > 0 { velocity_sum / moving as f64 } else { 0.0 };
        self.stats.record_tick(mean_velocity, moving, lane_counts);

        self.time += dt;
    }

    /// Advances `n` ticks, honoring the cooperative cancel flag at tick
    /// boundaries, and returns the time-averaged mean velocity over the
    /// ticks executed (−1.0 when no vehicles ever existed in the window).
    pub fn run_steps(&mut self, n: usize) -> f64 {
        let start_tick = self.stats.ticks_recorded();
        for _ in 0..n {
            if self.cancel.load(Ordering::Relaxed) {
                self.logger.log_with_fields(
                    EVENT_RUN_CANCELLED,
                    "Cooperative cancel observed at tick boundary",
                    &[("time", &self.time)],
                );
                break;
            }
            self.step();
        }
        let mean = self.stats.time_average_since(start_tick).unwrap_or(-1.0);
        if self.logger.is_at_least(VerboseLevel::Main) {
            self.logger.log_with_fields(
                EVENT_RUN_COMPLETE,
                "Run window finished",
                &[("time", &self.time), ("mean_velocity", &mean)],
            );
        }
        mean
    }

    /// Runs the configured `simulation_time / dt` ticks from the current
    /// state and returns the time-averaged mean velocity.
    pub fn run_to_completion(&mut self) -> f64 {
        self.run_steps(self.config.steps_total())
    }

    /// Restores the world to its configured starting state: time zero,
    /// fresh statistics, the original scheduled-deployment and zone lists,
    /// the original obstacles, and a re-seeded pseudo-random stream when a
    /// seed was supplied.
    pub fn reset(&mut self) {
        if self.logger.is_at_least(VerboseLevel::Main) {
            self.logger.log_with_fields(
                EVENT_WORLD_RESET,
                "Reset simulation",
                &[
                    ("ticks", &self.stats.ticks_recorded()),
                    ("vehicles_num", &self.vehicles.len()),
                    ("scheduled_num", &self.original_scheduled.len()),
                ],
            );
        }
        self.time = 0.0;
        self.stats = Statistics::new();
        self.vehicles = VehiclesStorage::new();
        self.obstacle_ids.clear();
        self.next_vehicle_id = 0;
        self.rng = seeded_rng(self.config.seed);
        self.scheduled = self.original_scheduled.clone();
        self.zones = self.original_zones.clone();
        // Same order as original construction: population first, then the
        // obstacles added afterwards
        self.initialize_vehicles();
        let specs = self.original_obstacles.clone();
        for spec in specs {
            self.spawn_obstacle(spec);
        }
    }

    /// Emits an immutable view of the current state for external
    /// collaborators.
    pub fn snapshot(&self) -> SimState {
        let mut vehicles = Vec::new();
        let mut obstacles = Vec::new();
        for vehicle in self.vehicles.values() {
            if vehicle.is_obstacle() {
                obstacles.push(ObstacleState::of(vehicle));
            } else {
                vehicles.push(VehicleState::of(vehicle));
            }
        }
        let mut vehicles_per_lane = vec![0usize; self.config.lanes_count];
        for state in &vehicles {
            if state.lane < vehicles_per_lane.len() {
                vehicles_per_lane[state.lane] += 1;
            }
        }
        SimState {
            world_id: self.id,
            time: self.time,
            vehicles,
            obstacles,
            stats: StatsSummary {
                mean_velocity: self.stats.last_mean_velocity(),
                vehicles_per_lane,
                lane_changes: self.stats.lane_changes(),
                ticks: self.stats.ticks_recorded(),
            },
        }
    }

    /// Scans for physically overlapping same-lane vehicles and logs a
    /// warning for each pair. Returns the number of overlaps found.
    ///
    /// An overlap here means centers closer than 80% of the combined
    /// half-lengths. This is a diagnostic; a non-zero result indicates a
    /// bug or a degenerate configuration, not a recoverable condition.
    pub fn check_integrity(&self) -> usize {
        let active: Vec<&Vehicle> = self.vehicles.values().filter(|v| v.is_active).collect();
        let mut warnings = 0;
        for (i, first) in active.iter().enumerate() {
            for second in active.iter().skip(i + 1) {
                if first.lane != second.lane {
                    continue;
                }
                let distance = (first.position - second.position).abs();
                if distance < 0.8 * (first.length / 2.0 + second.length / 2.0) {
                    warnings += 1;
                    self.logger.log_with_fields(
                        EVENT_OVERLAP_WARNING,
                        "Vehicles overlapping in lane",
                        &[
                            ("first", &first.id),
                            ("second", &second.id),
                            ("lane", &first.lane),
                            ("distance", &distance),
                        ],
                    );
                }
            }
        }
        warnings
    }
}
