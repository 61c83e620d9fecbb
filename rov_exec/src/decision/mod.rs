//! # Decision module
//!
//! This module implements the navigation and recovery decision core of the rover. Once per control
//! cycle it takes the latest [`Perception`] snapshot, decides throttle, brake and steer
//! [`Commands`], and manages the recovery state machine, which is broken down into the modes:
//!
//! - `Forward` - Normal reactive driving towards the mean navigable terrain direction, with the
//!   stuck detector watching for the rover failing to move.
//! - `Pickle` - The rover is stuck (or can see no navigable terrain). Stop, then sweep 45 degrees
//!   to the left in place, recording the heading with the best navigable view.
//! - `Azimuth` - Turn in place to the heading selected by `Pickle`, then resume `Forward`.
//!
//! The per-cycle transition is the pure function [`decide`], which threads the persistent
//! [`RoverState`] explicitly. [`DecisionCtrl`] wraps it as a `util::module::State` module with
//! parameter loading and archiving.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod angle_adj;
mod azimuth;
mod cmd;
pub mod forward;
pub mod mission;
mod mode;
mod params;
mod perception;
mod pickle;
mod state;
pub mod stuck;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use azimuth::Azimuth;
pub use cmd::Commands;
pub use mode::{Mode, ModeKind};
pub use params::{DecisionParams, MissionParams};
pub use perception::Perception;
pub use pickle::{Pickle, Sweep};
pub use state::{decide, DecisionCtrl, RoverState, StatusReport};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Maximum absolute steer demand.
///
/// Units: degrees
pub const MAX_STEER_DEG: f64 = 15.0;

/// Speed below which the rover is considered stationary.
///
/// Units: meters/second
pub const STOPPED_SPEED_MS: f64 = 0.1;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur in the decision module.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error("Failed to load DecisionParams: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid decision parameters: {0}")]
    InvalidParams(String),

    #[error("Could not initialise the decision archives: {0}")]
    ArchiveError(util::archive::ArchiveError),

    #[error("Perception input contains a non-finite {0}, tick rejected")]
    InvalidPerception(&'static str),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Returns true if the given speed is low enough for the rover to be considered stationary.
pub fn is_stopped(velocity_ms: f64) -> bool {
    velocity_ms.abs() < STOPPED_SPEED_MS
}

#[cfg(test)]
mod test {
    use super::*;
    use util::script_interpreter::{Pending, ScriptInterpreter};

    const SW_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/..");

    #[test]
    fn test_is_stopped() {
        assert!(is_stopped(0.0));
        assert!(is_stopped(-0.099));
        assert!(!is_stopped(0.1));
        assert!(!is_stopped(-0.1));
        assert!(!is_stopped(std::f64::NAN));
    }

    #[test]
    fn test_param_file() {
        let params: DecisionParams =
            util::params::load_from_path(format!("{}/params/decision.toml", SW_ROOT)).unwrap();
        assert!(params.validate().is_ok());
    }

    /// Replay the demo script through the decision core and check the recovery sequence.
    #[test]
    fn test_replay_stuck_recovery() {
        let params = DecisionParams::default();
        let mut script: ScriptInterpreter<Perception> =
            ScriptInterpreter::new(format!("{}/scripts/stuck_recovery.txt", SW_ROOT)).unwrap();

        let frames = match script.get_pending(std::f64::INFINITY) {
            Pending::Some(f) => f,
            _ => panic!("Script released no frames"),
        };

        let mut state = RoverState::default();
        let mut modes = vec![ModeKind::Forward];

        for p in frames.iter() {
            let (s, report) = decide(&params, state, p).unwrap();
            state = s;

            if report.mode != *modes.last().unwrap() {
                modes.push(report.mode);
            }
        }

        assert_eq!(
            modes,
            vec![
                ModeKind::Forward,
                ModeKind::Pickle,
                ModeKind::Azimuth,
                ModeKind::Forward
            ]
        );
        assert!(state.cmd.throttle > 0.0);
        assert_eq!(state.cmd.brake, 0.0);
    }
}
