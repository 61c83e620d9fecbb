//! # Mission completion
//!
//! Decides whether the mission goals have been met and the rover is back at its start position.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

use super::{MissionParams, Perception};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Returns true if enough samples have been collected, enough terrain mapped, and the rover is
/// within the home tolerance of `start_position_m`.
pub fn is_complete(
    params: &MissionParams,
    input: &Perception,
    start_position_m: &Vector2<f64>,
) -> bool {
    if !params.enabled {
        return false;
    }

    input.samples_collected >= params.min_samples
        && input.mapped_pct >= params.min_mapped_pct
        && (input.position_m - start_position_m).norm() < params.home_tolerance_m
}
