use crate::agents::Vehicle;
use rand::Rng;

/// Shortest inattention episode (s).
pub const DISTRACTION_MIN_DURATION: f64 = 3.0;
/// Longest inattention episode (s).
pub const DISTRACTION_MAX_DURATION: f64 = 5.0;
/// Time headway used by the emergency-braking override while distracted (s).
pub const EMERGENCY_HEADWAY: f64 = 1.0;
/// Multiplier on the comfortable deceleration for emergency braking.
pub const EMERGENCY_BRAKE_FACTOR: f64 = 1.5;

/// Advances the driver's random-inattention state by one tick.
///
/// Obstacles and drivers without the capability never change state. An
/// episode in progress ends once its duration has elapsed. Otherwise the
/// driver rolls for a new episode at most once per check interval of
/// simulated time; a successful roll starts an episode with a duration
/// drawn uniformly from [3, 5] s.
///
/// Returns `true` when the distraction state flipped this tick, so the
/// caller can log the transition.
pub fn refresh_distraction(vehicle: &mut Vehicle, now: f64, rng: &mut impl Rng) -> bool {
    if vehicle.is_obstacle() || !vehicle.can_be_distracted {
        return false;
    }

    if vehicle.is_distracted {
        if vehicle.distraction_expired(now) {
            vehicle.end_distraction();
            return true;
        }
        return false;
    }

    if now - vehicle.last_distraction_check >= vehicle.distraction_check_interval {
        vehicle.last_distraction_check = now;
        if rng.random::<f64>() < vehicle.distraction_probability {
            let duration =
                rng.random_range(DISTRACTION_MIN_DURATION..DISTRACTION_MAX_DURATION);
            vehicle.begin_distraction(now, duration);
            return true;
        }
    }
    false
}

/// Emergency deceleration for a distracted driver, if the safety override
/// must fire this tick.
///
/// While distracted the velocity normally holds at its episode-onset value;
/// only when the same-lane leader gap shrinks below `min_gap + v * 1.0 s`
/// does the driver snap to braking. The deceleration is capped at
/// `1.5 * comfortable_deceleration` and never reverses the vehicle within
/// one tick (`v / dt` bound).
pub fn emergency_deceleration(vehicle: &Vehicle, leader_gap: Option<f64>, dt: f64) -> Option<f64> {
    let gap = leader_gap?;
    let safe_gap = vehicle.profile.min_gap() + vehicle.velocity * EMERGENCY_HEADWAY;
    if gap < safe_gap {
        let deceleration = (EMERGENCY_BRAKE_FACTOR * vehicle.profile.comfortable_deceleration())
            .min(vehicle.velocity / dt);
        Some(deceleration)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::DriverType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn distractable(id: u64) -> Vehicle {
        Vehicle::new(id)
            .with_driver_type(DriverType::Normal)
            .with_distraction_capability(true)
            .build()
    }

    #[test]
    fn test_ineligible_drivers_never_flip() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sober = Vehicle::new(1).build();
        for tick in 0..10_000 {
            assert!(!refresh_distraction(&mut sober, tick as f64 * 0.5, &mut rng));
        }
        assert!(!sober.is_distracted);
    }

    #[test]
    fn test_obstacles_never_flip() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut obstacle = Vehicle::new(1).with_obstacle_window(0.0, f64::INFINITY).build();
        obstacle.can_be_distracted = true; // even if forced on
        for tick in 0..10_000 {
            refresh_distraction(&mut obstacle, tick as f64 * 0.5, &mut rng);
        }
        assert!(!obstacle.is_distracted);
    }

    #[test]
    fn test_episode_eventually_starts_and_ends() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut vehicle = distractable(1);
        // Force the roll to succeed immediately
        vehicle.distraction_probability = 1.0;

        assert!(!refresh_distraction(&mut vehicle, 0.5, &mut rng), "interval not elapsed yet");
        assert!(refresh_distraction(&mut vehicle, 1.0, &mut rng), "first full interval rolls");
        assert!(vehicle.is_distracted);
        let duration = vehicle.distraction_duration;
        assert!(
            (DISTRACTION_MIN_DURATION..DISTRACTION_MAX_DURATION).contains(&duration),
            "duration {} outside the 3-5 s band",
            duration
        );

        // Mid-episode: no state change
        assert!(!refresh_distraction(&mut vehicle, 1.0 + duration / 2.0, &mut rng));
        assert!(vehicle.is_distracted);

        // Past the end: episode clears
        assert!(refresh_distraction(&mut vehicle, 1.0 + duration, &mut rng));
        assert!(!vehicle.is_distracted);
    }

    #[test]
    fn test_check_interval_throttles_rolls() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut vehicle = distractable(1);
        vehicle.distraction_probability = 1.0;

        assert!(refresh_distraction(&mut vehicle, 1.0, &mut rng));
        vehicle.end_distraction();
        // Only 0.5 s since the last check: the roll must not happen again
        assert!(!refresh_distraction(&mut vehicle, 1.5, &mut rng));
        assert!(refresh_distraction(&mut vehicle, 2.0, &mut rng));
    }

    #[test]
    fn test_emergency_braking_threshold() {
        let mut vehicle = distractable(1);
        vehicle.velocity = 20.0;
        // safe gap = 2.0 + 20.0 = 22.0
        assert!(emergency_deceleration(&vehicle, Some(30.0), 0.5).is_none());
        let braking = emergency_deceleration(&vehicle, Some(15.0), 0.5)
            .expect("gap below the safety margin must brake");
        // 1.5 * B = 3.0 for a normal driver, well under v/dt = 40
        assert_eq!(braking, 3.0);
    }

    #[test]
    fn test_emergency_braking_never_reverses() {
        let mut vehicle = distractable(1);
        vehicle.velocity = 0.5;
        let braking = emergency_deceleration(&vehicle, Some(0.0), 0.5)
            .expect("zero gap must brake");
        // v / dt = 1.0 is tighter than 1.5 * B = 3.0
        assert_eq!(braking, 1.0);
        assert!(vehicle.velocity - braking * 0.5 >= 0.0);
    }

    #[test]
    fn test_no_leader_no_emergency() {
        let vehicle = distractable(1);
        assert!(emergency_deceleration(&vehicle, None, 0.5).is_none());
    }
}
