use crate::drivers::{DriverProfile, DriverType};

pub type VehicleID = u64; // Alias for VehicleID

/// Default physical length of a vehicle (m).
pub const DEFAULT_VEHICLE_LENGTH: f64 = 5.0;
/// Default physical width of a vehicle (m). Used by visualization only.
pub const DEFAULT_VEHICLE_WIDTH: f64 = 2.0;
/// How often a driver rolls for a new inattention episode (simulated s).
pub const DEFAULT_DISTRACTION_CHECK_INTERVAL: f64 = 1.0;
/// Probability of starting an inattention episode at each check.
pub const DEFAULT_DISTRACTION_PROBABILITY: f64 = 0.005;

/// Represents a driver-vehicle agent in the simulation.
///
/// Kinematics (position, velocity, acceleration, lane) are mutated by the
/// tick loop; the driver profile is fixed at construction from the
/// [`DriverType`]. Obstacles are ordinary vehicles with
/// [`DriverType::Obstacle`], zero dynamics, and an activity window.
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Unique identifier within a run
    pub id: VehicleID,
    /// Driver kind. See the ref. at `DriverType`
    pub driver_type: DriverType,
    /// IDM/MOBIL parameter set, populated once from the driver kind
    pub profile: DriverProfile,

    /// Longitudinal position (m), in [0, road_length)
    pub position: f64,
    /// Current velocity (m/s), never negative
    pub velocity: f64,
    /// Current acceleration (m/s^2)
    pub acceleration: f64,
    /// Current lane index, in [0, lanes_count)
    pub lane: usize,
    /// Desired (free-road) velocity (m/s)
    pub desired_velocity: f64,

    /// Physical length (m)
    pub length: f64,
    /// Physical width (m); visualization only
    pub width: f64,

    /// Whether the driver is eligible for random inattention episodes
    pub can_be_distracted: bool,
    /// Whether an inattention episode is in progress
    pub is_distracted: bool,
    /// Simulated time at which the current episode started (s)
    pub distraction_start_time: f64,
    /// Length of the current episode (s)
    pub distraction_duration: f64,
    /// Last simulated time the driver rolled for a new episode (s)
    pub last_distraction_check: f64,
    /// Interval between episode rolls (s)
    pub distraction_check_interval: f64,
    /// Probability of starting an episode at each roll
    pub distraction_probability: f64,

    /// Simulated time at which an obstacle appears (s); obstacles only
    pub obstacle_start_time: f64,
    /// Simulated time at which an obstacle disappears (s); obstacles only
    pub obstacle_end_time: f64,
    /// Whether the vehicle currently participates in neighborhood queries.
    /// Always true for non-obstacles
    pub is_active: bool,

    /// Minimum slowness factor of the zones covering this vehicle during the
    /// current tick, if any. Cleared and recomputed every tick.
    pub(crate) zone_slowness: Option<f64>,
}

impl Vehicle {
    /// Constructs a new `VehicleBuilder` for building a `Vehicle` object.
    ///
    /// # Arguments
    /// * `id` - A unique identifier for the vehicle.
    ///
    /// # Returns
    /// A `VehicleBuilder` struct which is used to configure and build the `Vehicle` object.
    ///
    /// # Example
    /// ```
    /// use highway_traffic_sim_core::agents::Vehicle;
    /// use highway_traffic_sim_core::drivers::DriverType;
    /// let vehicle = Vehicle::new(1)
    ///     .with_driver_type(DriverType::Normal)
    ///     .with_position(120.0)
    ///     .with_lane(1)
    ///     .with_desired_velocity(30.0)
    ///     .build();
    /// println!("Vehicle: {:?}", vehicle);
    /// ```
    pub fn new(id: VehicleID) -> VehicleBuilder {
        VehicleBuilder {
            vehicle: Vehicle {
                id,
                driver_type: DriverType::Normal,
                profile: DriverProfile::from_driver_type(DriverType::Normal),
                position: 0.0,
                velocity: 0.0,
                acceleration: 0.0,
                lane: 0,
                desired_velocity: 30.0,
                length: DEFAULT_VEHICLE_LENGTH,
                width: DEFAULT_VEHICLE_WIDTH,
                can_be_distracted: false,
                is_distracted: false,
                distraction_start_time: 0.0,
                distraction_duration: 0.0,
                last_distraction_check: 0.0,
                distraction_check_interval: DEFAULT_DISTRACTION_CHECK_INTERVAL,
                distraction_probability: DEFAULT_DISTRACTION_PROBABILITY,
                obstacle_start_time: 0.0,
                obstacle_end_time: f64::INFINITY,
                is_active: true,
                zone_slowness: None,
            },
        }
    }

    /// Whether this vehicle is a static obstacle.
    pub fn is_obstacle(&self) -> bool {
        self.driver_type.is_obstacle()
    }

    /// Hard ceiling on velocity: twice the desired velocity, tolerating
    /// integration overshoot.
    pub fn velocity_ceiling(&self) -> f64 {
        2.0 * self.desired_velocity
    }

    /// Bumper-to-bumper gap to a leader ahead of this vehicle (m).
    ///
    /// Negative when the extents overlap. The road is open (no wrap), so
    /// the arithmetic is linear.
    pub fn gap_to(&self, leader: &Vehicle) -> f64 {
        leader.position - self.position - leader.length
    }

    /// Re-evaluates the obstacle activity window at the given time.
    ///
    /// Non-obstacles are always active; an obstacle participates in
    /// neighborhood queries only while `start <= now < end`.
    pub fn refresh_obstacle_window(&mut self, now: f64) {
        if self.is_obstacle() {
            self.is_active = now >= self.obstacle_start_time && now < self.obstacle_end_time;
        }
    }

    /// Marks the start of an inattention episode.
    pub fn begin_distraction(&mut self, now: f64, duration: f64) {
        self.is_distracted = true;
        self.distraction_start_time = now;
        self.distraction_duration = duration;
    }

    /// Clears an expired inattention episode. The velocity is handed back
    /// to the longitudinal model rather than restored to its saved value.
    pub fn end_distraction(&mut self) {
        self.is_distracted = false;
        self.distraction_duration = 0.0;
    }

    /// Whether the episode in progress has run its course at `now`.
    pub fn distraction_expired(&self, now: f64) -> bool {
        now >= self.distraction_start_time + self.distraction_duration
    }
}

/// A builder pattern implementation for constructing `Vehicle` objects.
///
/// `VehicleBuilder` allows for optional configuration of `Vehicle` fields
/// before building the final `Vehicle` object.
pub struct VehicleBuilder {
    vehicle: Vehicle,
}

impl VehicleBuilder {
    /// Sets the driver kind and populates the matching parameter profile.
    ///
    /// # Arguments
    /// * `driver_type` - The kind of the driver. See the ref. at `DriverType`
    ///
    /// # Returns
    /// A `VehicleBuilder` instance for further method chaining.
    ///
    /// # Example
    /// ```rust
    /// use highway_traffic_sim_core::agents::Vehicle;
    /// use highway_traffic_sim_core::drivers::DriverType;
    /// let vehicle = Vehicle::new(1)
    ///     .with_driver_type(DriverType::Aggressive)
    ///     .build();
    /// assert_eq!(vehicle.profile.politeness(), 0.1);
    /// ```
    pub fn with_driver_type(mut self, driver_type: DriverType) -> Self {
        self.vehicle.driver_type = driver_type;
        self.vehicle.profile = DriverProfile::from_driver_type(driver_type);
        if driver_type.is_obstacle() {
            self.vehicle.velocity = 0.0;
            self.vehicle.acceleration = 0.0;
            self.vehicle.can_be_distracted = false;
        }
        self
    }

    /// Overrides the parameter profile with a custom calibration.
    ///
    /// Must be called after [`VehicleBuilder::with_driver_type`], which
    /// resets the profile from the table.
    pub fn with_profile(mut self, profile: DriverProfile) -> Self {
        self.vehicle.profile = profile;
        self
    }

    /// Sets the longitudinal position (m).
    ///
    /// # Example
    /// ```rust
    /// use highway_traffic_sim_core::agents::Vehicle;
    /// let vehicle = Vehicle::new(1)
    ///     .with_position(250.0)
    ///     .build();
    /// assert_eq!(vehicle.position, 250.0);
    /// ```
    pub fn with_position(mut self, position: f64) -> Self {
        self.vehicle.position = position;
        self
    }

    /// Sets the current velocity (m/s).
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.vehicle.velocity = velocity;
        self
    }

    /// Sets the lane index.
    pub fn with_lane(mut self, lane: usize) -> Self {
        self.vehicle.lane = lane;
        self
    }

    /// Sets the desired (free-road) velocity (m/s).
    ///
    /// # Example
    /// ```rust
    /// use highway_traffic_sim_core::agents::Vehicle;
    /// let vehicle = Vehicle::new(1)
    ///     .with_desired_velocity(33.0)
    ///     .build();
    /// assert_eq!(vehicle.velocity_ceiling(), 66.0);
    /// ```
    pub fn with_desired_velocity(mut self, desired_velocity: f64) -> Self {
        self.vehicle.desired_velocity = desired_velocity;
        self
    }

    /// Sets the physical length (m).
    pub fn with_length(mut self, length: f64) -> Self {
        self.vehicle.length = length;
        self
    }

    /// Sets the physical width (m). Only visualization consumes it.
    pub fn with_width(mut self, width: f64) -> Self {
        self.vehicle.width = width;
        self
    }

    /// Sets whether the driver is eligible for random inattention episodes.
    ///
    /// # Example
    /// ```rust
    /// use highway_traffic_sim_core::agents::Vehicle;
    /// let vehicle = Vehicle::new(1)
    ///     .with_distraction_capability(true)
    ///     .build();
    /// assert!(vehicle.can_be_distracted);
    /// ```
    pub fn with_distraction_capability(mut self, can_be_distracted: bool) -> Self {
        self.vehicle.can_be_distracted = can_be_distracted;
        self
    }

    /// Sets the interval (simulated s) between inattention rolls.
    pub fn with_distraction_check_interval(mut self, interval: f64) -> Self {
        self.vehicle.distraction_check_interval = interval;
        self
    }

    /// Sets the per-roll probability of starting an inattention episode.
    pub fn with_distraction_probability(mut self, probability: f64) -> Self {
        self.vehicle.distraction_probability = probability;
        self
    }

    /// Marks the vehicle as a static obstacle with an activity window.
    ///
    /// The driver kind becomes [`DriverType::Obstacle`] and the vehicle is
    /// active from `start` (inclusive) to `end` (exclusive). An obstacle
    /// whose window starts later than time zero begins inactive.
    ///
    /// # Example
    /// ```rust
    /// use highway_traffic_sim_core::agents::Vehicle;
    /// let obstacle = Vehicle::new(7)
    ///     .with_position(700.0)
    ///     .with_obstacle_window(10.0, 60.0)
    ///     .build();
    /// assert!(obstacle.is_obstacle());
    /// assert!(!obstacle.is_active);
    /// ```
    pub fn with_obstacle_window(mut self, start: f64, end: f64) -> Self {
        self = self.with_driver_type(DriverType::Obstacle);
        self.vehicle.obstacle_start_time = start;
        self.vehicle.obstacle_end_time = end;
        self.vehicle.is_active = start == 0.0;
        self
    }

    /// Builds the final `Vehicle` object with the configured properties.
    ///
    /// # Returns
    /// The fully constructed `Vehicle` object.
    pub fn build(self) -> Vehicle {
        self.vehicle
    }
}
