//! Implementations for the decision state structures

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{
    forward, mission, stuck, Commands, DecisionError, DecisionParams, Mode, ModeKind, Perception,
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Persistent state of the decision core, carried from one cycle to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoverState {
    /// Current mode, including the data of the recovery modes.
    pub mode: Mode,

    /// The last commands issued.
    pub cmd: Commands,

    /// Mission time at which the rover was first seen stationary in `Forward`, `None` while
    /// moving.
    pub stopped_time_s: Option<f64>,

    /// Position on the first cycle of the mission.
    pub start_position_m: Option<Vector2<f64>>,

    /// True while the mission is complete and the rover is holding at its start position.
    pub arrived: bool,
}

/// Status report for decision processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Mission time of the processed perception.
    pub total_time_s: f64,

    /// Mode at the start of the cycle.
    pub prev_mode: ModeKind,

    /// Mode at the end of the cycle.
    pub mode: ModeKind,

    /// True if the mode changed during this cycle.
    pub mode_changed: bool,

    /// True if the mission is complete and the rover is stopping at its start position.
    pub arrived: bool,

    /// Number of navigable samples, `None` if no navigable terrain was in view.
    pub nav_count: Option<usize>,

    /// Number of obstacle samples.
    pub obstacle_count: usize,

    /// Stuck detector timestamp after processing.
    pub stopped_time_s: Option<f64>,
}

/// Decision control module.
///
/// Holds the parameters and the persistent [`RoverState`], and steps [`decide`] once per cycle.
#[derive(Default)]
pub struct DecisionCtrl {
    pub(crate) params: DecisionParams,

    pub(crate) state: RoverState,

    pub(crate) report: StatusReport,
    arch_report: Archiver,

    arch_cmd: Archiver,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Perform one decision cycle.
///
/// Takes the state of the previous cycle and the latest perception, returning the next state
/// (which contains the commands to send to the vehicle) and a status report. If the perception
/// contains non-finite kinematic values an error is returned and no new state is produced.
///
/// The cycle is processed in order:
/// 1. Mission complete check, which stops the rover and ends the cycle if met.
/// 2. Dispatch to the current mode. The stuck detector only runs in `Forward`, recovery modes
///    manage their own exit.
/// 3. Entry into `Pickle` if no navigable terrain is in view and the rover is not recovering.
/// 4. Pickup request if the rover is stationary over a sample.
pub fn decide(
    params: &DecisionParams,
    mut state: RoverState,
    input: &Perception,
) -> Result<(RoverState, StatusReport), DecisionError> {
    input.validate()?;

    let prev_mode = state.mode.kind();
    let start_position_m = *state.start_position_m.get_or_insert(input.position_m);

    state.cmd.send_pickup = false;

    let mut report = StatusReport {
        total_time_s: input.total_time_s,
        prev_mode,
        mode: prev_mode,
        mode_changed: false,
        arrived: false,
        nav_count: input.nav_angles_rad.as_ref().map(Vec::len),
        obstacle_count: input.obstacle_angles_rad.len(),
        stopped_time_s: state.stopped_time_s,
    };

    // ---- MISSION COMPLETE ----

    if mission::is_complete(&params.mission, input, &start_position_m) {
        if !state.arrived {
            info!(
                "Mission complete with {} samples and {:.1}% mapped, stopping at start position",
                input.samples_collected, input.mapped_pct
            );
        }
        state.arrived = true;
        state.cmd = Commands::stop(params.brake_set);

        report.arrived = true;
        return Ok((state, report));
    }
    state.arrived = false;

    // ---- MODE DISPATCH ----

    let next_mode = match state.mode {
        Mode::Forward => match input.nav_angles_rad {
            Some(ref nav) => {
                state.cmd = forward::drive(params, nav, input);

                if stuck::update(
                    &mut state.stopped_time_s,
                    input.velocity_ms,
                    input.total_time_s,
                    params.stuck_time_limit_s,
                ) {
                    info!(
                        "Rover stationary for at least {:.1} s, getting out of a pickle",
                        params.stuck_time_limit_s
                    );
                    Some(Mode::pickle())
                } else {
                    None
                }
            }
            None => {
                info!("No navigable terrain in view");
                // Leave the brake to Pickle, which must be able to turn blind
                state.cmd.throttle = 0.0;
                Some(Mode::pickle())
            }
        },
        Mode::Pickle(ref mut pickle) => pickle.step(params, input, &mut state.cmd),
        Mode::Azimuth(ref azimuth) => azimuth.step(params, input, &mut state.cmd),
    };

    if let Some(m) = next_mode {
        state.set_mode(m);
    }

    // Catch a return to forward this cycle with no terrain to drive on
    if input.nav_angles_rad.is_none() && !state.mode.is_recovering() {
        state.set_mode(Mode::pickle());
    }

    // ---- PICKUP ----

    if input.near_sample && input.velocity_ms == 0.0 && !input.picking_up {
        state.cmd.send_pickup = true;
    }

    report.mode = state.mode.kind();
    report.mode_changed = report.mode != prev_mode || next_mode.is_some();
    report.stopped_time_s = state.stopped_time_s;

    Ok((state, report))
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RoverState {
    /// Change into the given mode.
    ///
    /// The stuck timer is cleared on every change, so a recovery always starts and finishes with
    /// a fresh timer.
    fn set_mode(&mut self, mode: Mode) {
        info!("Decision mode change: {} -> {}", self.mode, mode);
        self.stopped_time_s = None;
        self.mode = mode;
    }
}

impl DecisionCtrl {
    /// Create a new decision module from the given parameters, without archiving.
    pub fn new(params: DecisionParams) -> Result<Self, DecisionError> {
        params.validate()?;

        Ok(Self {
            params,
            ..Default::default()
        })
    }

    /// The current persistent state.
    pub fn state(&self) -> &RoverState {
        &self.state
    }

    /// The report from the last successful cycle.
    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    pub fn params(&self) -> &DecisionParams {
        &self.params
    }
}

impl State for DecisionCtrl {
    type InitData = &'static str;
    type InitError = DecisionError;

    type InputData = Perception;
    type OutputData = Commands;
    type StatusReport = StatusReport;
    type ProcError = DecisionError;

    /// Initialise the decision module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), Self::InitError> {
        self.params = params::load(init_data).map_err(DecisionError::ParamLoadError)?;
        self.params.validate()?;

        self.state = RoverState::default();
        self.report = StatusReport::default();

        self.arch_report = Archiver::from_path(session, "decision/status_report.csv")
            .map_err(DecisionError::ArchiveError)?;
        self.arch_cmd =
            Archiver::from_path(session, "decision/cmd.csv").map_err(DecisionError::ArchiveError)?;

        Ok(())
    }

    /// Perform one decision cycle.
    ///
    /// On error the state is left as it was at the end of the previous cycle.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let (state, report) = decide(&self.params, self.state, input_data)?;

        self.state = state;
        self.report = report;

        trace!(
            "Decision output:\n    mode: {}\n    cmd: {:?}",
            self.state.mode,
            self.state.cmd
        );

        Ok((self.state.cmd, self.report))
    }
}

impl Archived for DecisionCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)?;
        self.arch_cmd.serialise(self.state.cmd)?;

        Ok(())
    }
}
