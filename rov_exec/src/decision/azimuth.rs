//! # [`Azimuth`] decision mode
//!
//! Turns the rover in place to the heading selected by a `Pickle` sweep, then returns to
//! `Forward`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;

use super::{is_stopped, Commands, DecisionParams, Mode, Perception, MAX_STEER_DEG};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Heading error under which the target is considered reached.
///
/// Units: degrees
const TARGET_REACHED_DEG: f64 = 3.0;

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Azimuth mode state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Azimuth {
    /// Heading to turn to.
    ///
    /// Units: degrees
    pub target_angle_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl Azimuth {
    pub fn new(target_angle_deg: f64) -> Self {
        Self { target_angle_deg }
    }

    /// Step the mode, updating the commands in `cmd`.
    ///
    /// Returns the next mode if a transition is required.
    pub fn step(
        &self,
        params: &DecisionParams,
        input: &Perception,
        cmd: &mut Commands,
    ) -> Option<Mode> {
        // Never chase a target that doesn't exist
        if !self.target_angle_deg.is_finite() {
            warn!(
                "Azimuth target {} is invalid, returning to Forward",
                self.target_angle_deg
            );
            return Some(Mode::Forward);
        }

        if !is_stopped(input.velocity_ms) {
            cmd.brake(params.brake_set);
            return None;
        }

        // Turn right, back towards the best heading found by sweeping left
        cmd.brake = 0.0;
        cmd.steer_deg = -MAX_STEER_DEG;

        if (input.yaw_deg - self.target_angle_deg).abs() < TARGET_REACHED_DEG {
            return Some(Mode::Forward);
        }

        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn perception(yaw_deg: f64, velocity_ms: f64) -> Perception {
        Perception {
            nav_angles_rad: Some(vec![0.0; 100]),
            yaw_deg,
            velocity_ms,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_target() {
        let params = DecisionParams::default();
        let mut cmd = Commands::default();

        let az = Azimuth::new(std::f64::NAN);
        assert_eq!(az.step(&params, &perception(10.0, 0.0), &mut cmd), Some(Mode::Forward));
        assert_eq!(cmd, Commands::default());

        let az = Azimuth::new(std::f64::INFINITY);
        assert_eq!(az.step(&params, &perception(10.0, 0.0), &mut cmd), Some(Mode::Forward));
    }

    #[test]
    fn test_brake_while_moving() {
        let params = DecisionParams::default();
        let mut cmd = Commands {
            throttle: 0.1,
            ..Default::default()
        };

        // Moving even when on target brakes first
        let az = Azimuth::new(90.0);
        assert_eq!(az.step(&params, &perception(90.0, 0.3), &mut cmd), None);
        assert_eq!(cmd.throttle, 0.0);
        assert_eq!(cmd.brake, params.brake_set);
    }

    #[test]
    fn test_turn_to_target() {
        let params = DecisionParams::default();
        let mut cmd = Commands {
            brake: params.brake_set,
            ..Default::default()
        };

        let az = Azimuth::new(120.0);

        assert_eq!(az.step(&params, &perception(140.0, 0.0), &mut cmd), None);
        assert_eq!(cmd.brake, 0.0);
        assert_eq!(cmd.steer_deg, -MAX_STEER_DEG);

        assert_eq!(az.step(&params, &perception(123.0, 0.05), &mut cmd), None);
        assert_eq!(
            az.step(&params, &perception(122.9, 0.0), &mut cmd),
            Some(Mode::Forward)
        );
    }
}
