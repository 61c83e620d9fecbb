//! # Forward driving
//!
//! Baseline reactive driving used in `Forward` mode: steer towards the mean direction of the
//! navigable terrain, adjusted away from obstacles, with the throttle modulated by how much
//! navigable terrain is visible.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::{clamp, finite_mean, lin_map};

use super::{angle_adj, Commands, DecisionParams, Perception, MAX_STEER_DEG};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Fraction of `throttle_set` applied when only `stop_forward` navigable samples are visible.
const MIN_THROTTLE_FRACTION: f64 = 0.5;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the forward driving commands.
///
/// If fewer than `stop_forward` navigable samples are visible the rover brakes to a stop with
/// straight wheels. The stuck detector is then responsible for moving into `Pickle` once the rover
/// has been stationary for long enough.
pub fn drive(params: &DecisionParams, nav_angles_rad: &[f64], input: &Perception) -> Commands {
    let nav_count = nav_angles_rad.len();

    if nav_count < params.stop_forward {
        return Commands::stop(params.brake_set);
    }

    let throttle = if input.velocity_ms < params.max_vel_ms {
        throttle_for_count(params, nav_count)
    } else {
        0.0
    };

    // Non-finite samples are skipped so a single bad pixel can't corrupt the steer command
    let nav_steer_deg = finite_mean(nav_angles_rad)
        .map(|(m, _)| clamp(m.to_degrees(), -MAX_STEER_DEG, MAX_STEER_DEG))
        .unwrap_or(0.0);

    Commands {
        throttle,
        brake: 0.0,
        steer_deg: angle_adj::adjust(nav_steer_deg, &input.obstacle_angles_rad),
        send_pickup: false,
    }
}

/// Throttle for the given navigable sample count, assuming at least `stop_forward` samples.
fn throttle_for_count(params: &DecisionParams, nav_count: usize) -> f64 {
    if nav_count >= params.go_forward {
        return params.throttle_set;
    }

    lin_map(
        (params.stop_forward as f64, params.go_forward as f64),
        (MIN_THROTTLE_FRACTION * params.throttle_set, params.throttle_set),
        nav_count as f64,
    )
}
