use crate::agents::{Vehicle, VehiclesStorage};
use crate::longitudinal::idm_acceleration;
use crate::neighborhood::find_neighbors;

/// Outcome of a successful lane-change evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneChangePlan {
    /// Lane the ego should move to.
    pub target_lane: usize,
    /// Net utility of the move (m/s^2).
    pub advantage: f64,
}

/// Checks the MOBIL safety predicate for moving the ego next to the given
/// target-lane neighbors.
///
/// Two conditions, both on a hypothetical ego already placed in the target
/// lane at its current position and velocity:
/// 1. the bumper-to-bumper gap to the prospective leader must not be below
///    the ego's minimum gap;
/// 2. the prospective follower's IDM response to the ego cutting in must not
///    demand braking beyond the **ego's** `safe_deceleration`. Using the
///    ego's bound (not the follower's) follows the interpretation that the
///    ego owns the harm its maneuver induces.
pub fn is_lane_change_safe(
    ego: &Vehicle,
    leader_target: Option<&Vehicle>,
    follower_target: Option<&Vehicle>,
) -> bool {
    if let Some(leader) = leader_target {
        if ego.gap_to(leader) < ego.profile.min_gap() {
            return false;
        }
    }

    if let Some(follower) = follower_target {
        let mut hypothetical = ego.clone();
        hypothetical.lane = follower.lane;
        let new_follower_acc = idm_acceleration(follower, Some(&hypothetical));
        if new_follower_acc < -ego.profile.safe_deceleration() {
            return false;
        }
    }

    true
}

/// Computes the MOBIL utility of moving the ego in front of the given
/// target-lane neighbors.
///
/// `advantage = acc_gain - p * (disadvantage_new_follower + disadvantage_old_follower)`
///
/// where `acc_gain` compares the ego's hypothetical target-lane IDM
/// acceleration against its current one, and each disadvantage is the
/// before-minus-after acceleration loss the move inflicts on that follower.
/// The old follower gains room when the ego leaves; that gain is clamped
/// away rather than credited.
pub fn lane_change_advantage(
    ego: &Vehicle,
    leader_current: Option<&Vehicle>,
    follower_current: Option<&Vehicle>,
    leader_target: Option<&Vehicle>,
    follower_target: Option<&Vehicle>,
    target_lane: usize,
) -> f64 {
    let mut hypothetical = ego.clone();
    hypothetical.lane = target_lane;

    let new_acc = idm_acceleration(&hypothetical, leader_target);
    let acc_gain = new_acc - ego.acceleration;

    let disadvantage_new_follower = match follower_target {
        Some(follower) => {
            let before = idm_acceleration(follower, leader_target);
            let after = idm_acceleration(follower, Some(&hypothetical));
            before - after
        }
        None => 0.0,
    };

    let disadvantage_old_follower = match follower_current {
        Some(follower) => {
            let before = idm_acceleration(follower, Some(ego));
            let after = idm_acceleration(follower, leader_current);
            // Extra room behind the departing ego is not a cost
            (before - after).max(0.0)
        }
        None => 0.0,
    };

    acc_gain
        - ego.profile.politeness() * (disadvantage_new_follower + disadvantage_old_follower)
}

/// Evaluates a lane change for the ego against both adjacent lanes.
///
/// For each existing candidate lane the safety predicate must hold; among
/// safe candidates the one with the greatest utility wins, provided that
/// utility exceeds both zero and the ego's change threshold. A rightward
/// candidate gets the ego's keep-right bias added before the comparison.
///
/// Returns `None` when the ego should stay put: no candidate is safe, none
/// clears the threshold, the ego is an obstacle, or the driver is
/// distracted.
///
/// The ego's *current* acceleration is read from its state, which the tick
/// loop refreshed from the pre-step neighborhood earlier in the same tick.
pub fn decide_lane_change(
    ego: &Vehicle,
    vehicles: &VehiclesStorage,
    lanes_count: usize,
) -> Option<LaneChangePlan> {
    // Obstacles never change lanes
    if ego.is_obstacle() {
        return None;
    }
    // Distracted drivers don't change lanes
    if ego.is_distracted {
        return None;
    }

    let (leader_current, follower_current) =
        find_neighbors(vehicles, ego.id, ego.lane, ego.position);

    let mut candidate_lanes = Vec::with_capacity(2);
    if ego.lane > 0 {
        candidate_lanes.push(ego.lane - 1);
    }
    if ego.lane + 1 < lanes_count {
        candidate_lanes.push(ego.lane + 1);
    }

    let mut best: Option<LaneChangePlan> = None;
    let mut max_advantage = 0.0_f64;

    for target_lane in candidate_lanes {
        let (leader_target, follower_target) =
            find_neighbors(vehicles, ego.id, target_lane, ego.position);

        if !is_lane_change_safe(ego, leader_target, follower_target) {
            continue;
        }

        let mut advantage = lane_change_advantage(
            ego,
            leader_current,
            follower_current,
            leader_target,
            follower_target,
            target_lane,
        );

        // Keep-right bias
        if target_lane > ego.lane {
            advantage += ego.profile.right_bias();
        }

        if advantage > max_advantage && advantage > ego.profile.change_threshold() {
            max_advantage = advantage;
            best = Some(LaneChangePlan { target_lane, advantage });
        }
    }

    best
}
