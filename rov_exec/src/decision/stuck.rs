//! # Stuck detector
//!
//! Tracks how long the rover has been stationary and flags when it has been stationary for long
//! enough to be considered stuck.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;

use super::is_stopped;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Update the stopped timestamp from the current speed and mission time.
///
/// `stopped_time_s` holds the mission time at which the rover first stopped, and is `None` while
/// moving. Returns `true` if the rover has now been stationary for at least `time_limit_s`, in
/// which case the timestamp is cleared and the caller shall enter `Pickle`.
pub fn update(
    stopped_time_s: &mut Option<f64>,
    velocity_ms: f64,
    total_time_s: f64,
    time_limit_s: f64,
) -> bool {
    if !is_stopped(velocity_ms) {
        *stopped_time_s = None;
        return false;
    }

    match *stopped_time_s {
        Some(t) if total_time_s - t >= time_limit_s => {
            debug!(
                "Rover stationary for {:.2} s, limit is {:.2} s",
                total_time_s - t,
                time_limit_s
            );
            *stopped_time_s = None;
            true
        }
        Some(_) => false,
        None => {
            *stopped_time_s = Some(total_time_s);
            false
        }
    }
}
