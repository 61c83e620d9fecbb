//! # [`Pickle`] decision mode
//!
//! Gets the rover out of a pickle by sweeping 45 degrees of terrain to the left at a time,
//! recording the heading with the most navigable terrain in view. Once the sweep limit is reached
//! the rover hands over to [`Azimuth`] to turn back to the best heading.
//!
//! Sweeping leftwards in fixed increments keeps the chosen heading close to the original one
//! after a head-on collision, while repeated sweeps still cover a full turn and escape box
//! canyons.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use util::maths::wrap_360;

use super::{is_stopped, Azimuth, Commands, DecisionParams, Mode, Perception, MAX_STEER_DEG};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Size of one sweep.
///
/// Units: degrees
pub const SWEEP_ANGLE_DEG: f64 = 45.0;

/// Distance from the sweep target at which the sweep is complete.
///
/// Units: degrees
const SWEEP_REACHED_DEG: f64 = 5.0;

/// Extra turn added when the selected heading is barely different from the start heading.
///
/// Units: degrees
const MIN_TURN_DEG: f64 = 20.0;

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Pickle mode state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pickle {
    /// The sweep in progress, `None` until the rover has come to a stop.
    sweep: Option<Sweep>,
}

/// Tracking data for one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    /// Heading at the start of the sweep.
    pub stopped_angle_deg: f64,

    /// Heading the sweep turns towards.
    pub target_angle_deg: f64,

    /// Highest navigable sample count seen during the sweep.
    pub best_nav_count: usize,

    /// Heading at which `best_nav_count` was seen.
    pub best_angle_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl Pickle {
    /// The sweep in progress, if any.
    pub fn sweep(&self) -> Option<&Sweep> {
        self.sweep.as_ref()
    }

    /// Step the mode, updating the commands in `cmd`.
    ///
    /// Returns the next mode if a transition is required.
    pub fn step(
        &mut self,
        params: &DecisionParams,
        input: &Perception,
        cmd: &mut Commands,
    ) -> Option<Mode> {
        // With no navigable terrain at all keep turning left until some comes into view, which
        // gets to the edge of a navigable region faster than sweeping
        let nav_count = match input.nav_angles_rad {
            Some(ref n) => n.len(),
            None => {
                cmd.steer_deg = MAX_STEER_DEG;
                cmd.throttle = 0.0;
                return None;
            }
        };

        // Come to a complete stop before sweeping
        if !is_stopped(input.velocity_ms) || cmd.throttle > 0.0 {
            cmd.brake(params.brake_set);
            return None;
        }

        // Stopped, take the brake off
        if cmd.brake != 0.0 {
            cmd.brake = 0.0;
            return None;
        }

        let sweep = match self.sweep {
            Some(ref mut s) => s,
            None => {
                let sweep = Sweep::start(input.yaw_deg, params.go_forward);
                debug!(
                    "Pickle sweep started at {:.1} deg, target {:.1} deg",
                    sweep.stopped_angle_deg, sweep.target_angle_deg
                );
                self.sweep = Some(sweep);
                return None;
            }
        };

        cmd.steer_deg = MAX_STEER_DEG;

        if nav_count > sweep.best_nav_count {
            sweep.best_nav_count = nav_count;
            sweep.best_angle_deg = input.yaw_deg;
        }

        if (sweep.target_angle_deg - input.yaw_deg).abs() < SWEEP_REACHED_DEG {
            let target_angle_deg = min_turn_guard(sweep.best_angle_deg, sweep.stopped_angle_deg);

            info!(
                "Pickle sweep from {:.1} deg complete, best view of {} samples, turning to {:.1} deg",
                sweep.stopped_angle_deg, sweep.best_nav_count, target_angle_deg
            );

            self.sweep = None;
            return Some(Mode::Azimuth(Azimuth::new(target_angle_deg)));
        }

        None
    }
}

impl Sweep {
    /// Begin a sweep at the given heading.
    ///
    /// The best count is seeded with `go_forward` and the best heading with the sweep target, so
    /// a heading is only selected if its view is at least good enough to drive forward. Otherwise
    /// the rover turns to the end of the sweep and starts another.
    pub fn start(yaw_deg: f64, go_forward: usize) -> Self {
        let target_angle_deg = wrap_360(yaw_deg + SWEEP_ANGLE_DEG);

        Self {
            stopped_angle_deg: yaw_deg,
            target_angle_deg,
            best_nav_count: go_forward,
            best_angle_deg: target_angle_deg,
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Ensure the selected heading turns the rover a minimum amount from where the sweep started.
///
/// Terrain outside the field of view can make a heading near the start look good every time, so
/// headings within 10 degrees left of the start are pushed a further 20 degrees. The `-352` bound
/// catches the case where the selected heading has wrapped past zero (e.g. start 357, best 2).
pub(crate) fn min_turn_guard(target_angle_deg: f64, stopped_angle_deg: f64) -> f64 {
    let delta = target_angle_deg - stopped_angle_deg;

    if delta < -352.0 || (delta > 0.0 && delta < 10.0) {
        wrap_360(target_angle_deg + MIN_TURN_DEG)
    } else {
        target_angle_deg
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn perception(yaw_deg: f64, nav_count: usize) -> Perception {
        Perception {
            nav_angles_rad: Some(vec![0.0; nav_count]),
            yaw_deg,
            ..Default::default()
        }
    }

    /// Step a pickle which has already stopped and released its brake through the given yaws.
    fn sweep_through(
        pickle: &mut Pickle,
        params: &DecisionParams,
        frames: &[(f64, usize)],
    ) -> Option<Mode> {
        let mut cmd = Commands::default();
        for &(yaw, count) in frames.iter() {
            if let Some(m) = pickle.step(params, &perception(yaw, count), &mut cmd) {
                return Some(m);
            }
            assert_eq!(cmd.steer_deg, MAX_STEER_DEG);
        }
        None
    }

    #[test]
    fn test_blind_turn() {
        let params = DecisionParams::default();
        let mut pickle = Pickle::default();
        let mut cmd = Commands {
            throttle: 0.2,
            ..Default::default()
        };

        let p = Perception {
            nav_angles_rad: None,
            velocity_ms: 1.0,
            ..Default::default()
        };

        assert_eq!(pickle.step(&params, &p, &mut cmd), None);
        assert_eq!(cmd.steer_deg, MAX_STEER_DEG);
        assert_eq!(cmd.throttle, 0.0);
        assert!(pickle.sweep().is_none());
    }

    #[test]
    fn test_stop_then_release() {
        let params = DecisionParams::default();
        let mut pickle = Pickle::default();
        let mut cmd = Commands {
            throttle: 0.2,
            ..Default::default()
        };

        // Throttle still on: brake
        let moving = Perception {
            velocity_ms: -0.5,
            ..perception(90.0, 100)
        };
        pickle.step(&params, &moving, &mut cmd);
        assert_eq!(cmd.throttle, 0.0);
        assert_eq!(cmd.brake, params.brake_set);

        // Still rolling: keep braking
        pickle.step(&params, &moving, &mut cmd);
        assert_eq!(cmd.brake, params.brake_set);

        // Stopped: release
        pickle.step(&params, &perception(90.0, 100), &mut cmd);
        assert_eq!(cmd.brake, 0.0);
        assert!(pickle.sweep().is_none());

        // Next tick initialises the sweep
        pickle.step(&params, &perception(90.0, 100), &mut cmd);
        let sweep = pickle.sweep().unwrap();
        assert_eq!(sweep.stopped_angle_deg, 90.0);
        assert_eq!(sweep.target_angle_deg, 135.0);
        assert_eq!(sweep.best_nav_count, params.go_forward);
        assert_eq!(sweep.best_angle_deg, 135.0);
    }

    #[test]
    fn test_sweep_start_at_zero_yaw() {
        let params = DecisionParams::default();
        let mut pickle = Pickle::default();
        let mut cmd = Commands::default();

        pickle.step(&params, &perception(0.0, 10), &mut cmd);
        let sweep = *pickle.sweep().unwrap();
        assert_eq!(sweep.stopped_angle_deg, 0.0);
        assert_eq!(sweep.target_angle_deg, 45.0);

        // A heading of zero is a started sweep, the next tick turns rather than restarting
        pickle.step(&params, &perception(0.0, 10), &mut cmd);
        assert_eq!(cmd.steer_deg, MAX_STEER_DEG);
        assert_eq!(pickle.sweep().unwrap().stopped_angle_deg, 0.0);
    }

    #[test]
    fn test_sweep_across_zero_without_better_view() {
        let params = DecisionParams::default();
        let mut pickle = Pickle::default();
        let mut cmd = Commands::default();

        pickle.step(&params, &perception(350.0, 100), &mut cmd);
        assert_eq!(pickle.sweep().unwrap().target_angle_deg, 35.0);

        let next = sweep_through(
            &mut pickle,
            &params,
            &[(355.0, 100), (0.0, 120), (10.0, 90), (20.0, 200), (30.0, 50), (33.0, 60)],
        );

        assert_eq!(next, Some(Mode::Azimuth(Azimuth::new(35.0))));
        assert!(pickle.sweep().is_none());
    }

    #[test]
    fn test_sweep_selects_best_view() {
        let params = DecisionParams::default();
        let mut pickle = Pickle::default();
        let mut cmd = Commands::default();

        pickle.step(&params, &perception(100.0, 100), &mut cmd);

        let next = sweep_through(
            &mut pickle,
            &params,
            &[(110.0, 300), (120.0, 900), (130.0, 700), (140.0, 600), (144.0, 100)],
        );

        assert_eq!(next, Some(Mode::Azimuth(Azimuth::new(120.0))));
    }

    #[test]
    fn test_sweep_best_view_close_to_start() {
        let params = DecisionParams::default();
        let mut pickle = Pickle::default();
        let mut cmd = Commands::default();

        pickle.step(&params, &perception(100.0, 100), &mut cmd);

        // Best view 5 degrees from the start gets a further 20 degrees of turn
        let next = sweep_through(&mut pickle, &params, &[(105.0, 800), (120.0, 100), (142.0, 0)]);
        assert_eq!(next, Some(Mode::Azimuth(Azimuth::new(125.0))));
    }

    #[test]
    fn test_min_turn_guard_bounds() {
        // Crossing zero from 335 to 20 is a delta of -315, outside the literal bound
        assert_eq!(min_turn_guard(20.0, 335.0), 20.0);

        // Delta of -353 and beyond triggers
        assert_eq!(min_turn_guard(0.0, 353.0), 20.0);
        assert_eq!(min_turn_guard(2.0, 357.0), 22.0);

        // Delta of exactly -352 does not
        assert_eq!(min_turn_guard(0.0, 352.0), 0.0);

        // Small positive deltas trigger, the ends of the range do not
        assert_eq!(min_turn_guard(105.0, 100.0), 125.0);
        assert_eq!(min_turn_guard(100.0, 100.0), 100.0);
        assert_eq!(min_turn_guard(110.0, 100.0), 110.0);
        assert_eq!(min_turn_guard(345.0, 340.0), 5.0);

        // Small negative deltas do not
        assert_eq!(min_turn_guard(95.0, 100.0), 95.0);
    }
}
