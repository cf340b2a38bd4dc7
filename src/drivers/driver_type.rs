use std::fmt;

/// Represents the driver kind of an agent.
///
/// The driver kind selects the IDM and MOBIL parameter set for the vehicle
/// (see [`DriverProfile`](crate::drivers::profile::DriverProfile)). The
/// special [`DriverType::Obstacle`] kind marks a static blocker: it never
/// moves, never accelerates, and never evaluates lane changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverType {
    /// Short following distance, impolite, changes lanes for any advantage.
    Aggressive,
    /// Average parameters.
    Normal,
    /// Long following distance, gentle acceleration.
    Cautious,
    /// Normal following distance, very polite.
    Polite,
    /// Very long following distance, extremely polite.
    Submissive,
    /// Static blocker with an activity window. Zero dynamics.
    Obstacle,
}

impl DriverType {
    /// The five kinds eligible for population sampling, in canonical order.
    ///
    /// [`DriverType::Obstacle`] is excluded: obstacles are placed
    /// explicitly, never drawn from a distribution.
    pub const POPULATION: [DriverType; 5] = [
        DriverType::Aggressive,
        DriverType::Normal,
        DriverType::Cautious,
        DriverType::Polite,
        DriverType::Submissive,
    ];

    /// Whether this kind is a static obstacle.
    pub fn is_obstacle(self) -> bool {
        self == DriverType::Obstacle
    }

    /// Parses a driver kind from a lowercase token (CLI surface).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use highway_traffic_sim_core::drivers::DriverType;
    ///
    /// assert_eq!(DriverType::parse("aggressive"), Some(DriverType::Aggressive));
    /// assert_eq!(DriverType::parse("obstacle"), Some(DriverType::Obstacle));
    /// assert_eq!(DriverType::parse("bulldozer"), None);
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "aggressive" => Some(DriverType::Aggressive),
            "normal" => Some(DriverType::Normal),
            "cautious" => Some(DriverType::Cautious),
            "polite" => Some(DriverType::Polite),
            "submissive" => Some(DriverType::Submissive),
            "obstacle" => Some(DriverType::Obstacle),
            _ => None,
        }
    }
}

impl fmt::Display for DriverType {
    /// Formats the driver kind for display.
    ///
    /// Returns a short, lowercase string representation suitable for
    /// logging, debugging, and user interfaces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use highway_traffic_sim_core::drivers::DriverType;
    ///
    /// assert_eq!(format!("{}", DriverType::Aggressive), "aggressive");
    /// assert_eq!(format!("{}", DriverType::Normal), "normal");
    /// assert_eq!(format!("{}", DriverType::Cautious), "cautious");
    /// assert_eq!(format!("{}", DriverType::Polite), "polite");
    /// assert_eq!(format!("{}", DriverType::Submissive), "submissive");
    /// assert_eq!(format!("{}", DriverType::Obstacle), "obstacle");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let as_str = match self {
            DriverType::Aggressive => "aggressive",
            DriverType::Normal => "normal",
            DriverType::Cautious => "cautious",
            DriverType::Polite => "polite",
            DriverType::Submissive => "submissive",
            DriverType::Obstacle => "obstacle",
        };
        write!(f, "{}", as_str)
    }
}
