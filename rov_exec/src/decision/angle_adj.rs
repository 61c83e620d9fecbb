//! # Obstacle angle adjustment
//!
//! Biases a proposed steer angle away from visible non-navigable terrain, with a correction that
//! grows with the amount of the view which is obstructed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::{clamp, finite_mean};

use super::MAX_STEER_DEG;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Obstacle sample counts at or below this are ignored.
pub const MIN_OBSTACLE_COUNT: usize = 40;

/// Obstacle sample count at which the correction equals the mean obstacle angle.
const OBSTACLE_COUNT_SCALE: f64 = 200.0;

/// Mean obstacle angles smaller than this are considered dead ahead.
///
/// Units: degrees
const DEAD_AHEAD_DEG: f64 = 1.0;

/// Angle the obstacles are assumed to be at when dead ahead, forcing a turn to the right.
///
/// Units: degrees
const DEAD_AHEAD_BIAS_DEG: f64 = 15.0;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Adjust `steer_deg` away from the obstacles at `obstacle_angles_rad`.
///
/// The result is always within `[-MAX_STEER_DEG, MAX_STEER_DEG]` unless there are too few
/// obstacle samples to act on, in which case `steer_deg` is returned unchanged. Non-finite
/// obstacle samples are not counted, and a non-finite `steer_deg` is treated as straight ahead.
pub fn adjust(steer_deg: f64, obstacle_angles_rad: &[f64]) -> f64 {
    let steer_deg = if steer_deg.is_finite() { steer_deg } else { 0.0 };

    let (mut mean_obstacle_deg, count) = match finite_mean(obstacle_angles_rad) {
        Some((m, count)) if count > MIN_OBSTACLE_COUNT => (m.to_degrees(), count),
        _ => return steer_deg,
    };

    // An obstruction straight ahead gives no bias either way, so pretend it is on the left to
    // break the tie
    if mean_obstacle_deg.abs() < DEAD_AHEAD_DEG {
        mean_obstacle_deg = DEAD_AHEAD_BIAS_DEG;
    }

    let adjusted = steer_deg - mean_obstacle_deg * (count as f64 / OBSTACLE_COUNT_SCALE);

    clamp(adjusted, -MAX_STEER_DEG, MAX_STEER_DEG)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_few_obstacles_ignored() {
        assert_eq!(adjust(7.5, &[]), 7.5);
        assert_eq!(adjust(-3.0, &[0.5; 40]), -3.0);

        // Even an out of range steer is passed through untouched
        assert_eq!(adjust(40.0, &[0.2; 10]), 40.0);
    }

    #[test]
    fn test_dead_ahead_bias() {
        // 100 obstacles dead ahead: 5 - 15 * 100 / 200
        assert!((adjust(5.0, &[0.0; 100]) - -2.5).abs() < 1e-9);

        // Mean just under a degree either side of zero still counts as dead ahead
        let small = (0.9f64).to_radians();
        assert!((adjust(0.0, &[small; 80]) - -6.0).abs() < 1e-9);
        assert!((adjust(0.0, &[-small; 80]) - -6.0).abs() < 1e-9);

        // Large obstruction saturates the correction
        assert_eq!(adjust(0.0, &[0.0; 400]), -15.0);
    }

    #[test]
    fn test_scaled_correction() {
        // 41 obstacles at 10 degrees to the left: 0 - 10 * 41 / 200
        let angles = vec![(10f64).to_radians(); 41];
        assert!((adjust(0.0, &angles) - -2.05).abs() < 1e-9);

        // Obstacles on the right push the steer left
        let angles = vec![(-20f64).to_radians(); 100];
        assert!((adjust(2.0, &angles) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_output_limited() {
        let obstacle_sets = vec![
            vec![(-30f64).to_radians(); 300],
            vec![(30f64).to_radians(); 300],
            vec![0.0; 41],
            vec![1.5; 1000],
        ];

        for obstacles in obstacle_sets.iter() {
            for &steer in [-100.0, -15.0, 0.0, 15.0, 100.0].iter() {
                let a = adjust(steer, obstacles);
                assert!(a >= -MAX_STEER_DEG && a <= MAX_STEER_DEG);
            }
        }
    }

    #[test]
    fn test_non_finite_samples() {
        // A single bad sample in an otherwise valid set is skipped
        let mut obstacles = vec![0.2; 50];
        obstacles[3] = std::f64::NAN;
        obstacles[7] = std::f64::INFINITY;
        let a = adjust(0.0, &obstacles);
        assert!(a.is_finite());
        assert!(a >= -MAX_STEER_DEG && a <= MAX_STEER_DEG);
        assert!((a - -(0.2f64).to_degrees() * 48.0 / 200.0).abs() < 1e-9);

        // Bad samples don't count towards the obstacle threshold
        let mut obstacles = vec![0.5; 45];
        for o in obstacles.iter_mut().take(10) {
            *o = std::f64::NAN;
        }
        assert_eq!(adjust(4.0, &obstacles), 4.0);

        // Nothing but bad samples
        assert_eq!(adjust(4.0, &[std::f64::NAN; 100]), 4.0);

        // A bad steer is treated as straight ahead
        assert!((adjust(std::f64::NAN, &[0.0; 100]) - -7.5).abs() < 1e-9);
    }
}
