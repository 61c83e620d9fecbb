//! Main rover-side executable entry point.
//!
//! # Architecture
//!
//! The executable replays a timed perception script through the decision core:
//!
//!     - Initialise the session, logging, and the decision module
//!     - Main loop:
//!         - Perception acquisition from the script
//!         - Decision processing
//!         - Archiving of the commands and status report
//!         - Cycle management
//!
//! # Usage
//!
//! ```text
//! rov_exec <perception_script>
//! ```
//!
//! `ROVER_SW_ROOT` must point at the software root, which contains the `params` directory.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use rov_lib::decision::{DecisionCtrl, Perception};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{Pending, ScriptInterpreter},
    session::{get_elapsed_seconds, Session},
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Number of consecutive rejected perception frames after which execution stops.
const MAX_CONSEC_REJECTED_FRAMES: u64 = 50;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    let session = Session::new("rov_exec", "sessions").wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Rover Decision Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PERCEPTION SCRIPT ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected one argument (the perception script path), found {}",
            args.len() - 1
        ));
    }

    info!("Loading perception script from \"{}\"", &args[1]);

    let mut script: ScriptInterpreter<Perception> =
        ScriptInterpreter::new(&args[1]).wrap_err("Failed to load perception script")?;

    info!(
        "Loaded script {:?} lasts {:.02} s and contains {} frames\n",
        script.get_path().unwrap_or_else(|| Path::new(&args[1])),
        script.get_duration(),
        script.get_num_entries()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut decision = DecisionCtrl::default();
    decision
        .init("decision.toml", &session)
        .wrap_err("Failed to initialise DecisionCtrl")?;
    info!("DecisionCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut num_cycles: u128 = 0;
    let mut num_consec_rejected: u64 = 0;

    loop {
        let cycle_start_instant = Instant::now();

        // ---- DATA INPUT ----

        // Only the latest frame released this cycle is processed, older ones are stale
        let perception = match script.get_pending(get_elapsed_seconds()) {
            Pending::None => None,
            Pending::Some(mut frames) => {
                if frames.len() > 1 {
                    debug!("Dropping {} stale perception frames", frames.len() - 1);
                }
                frames.pop()
            }
            Pending::EndOfScript => {
                info!("End of perception script reached, stopping");
                break;
            }
        };

        // ---- DECISION PROCESSING ----

        if let Some(p) = perception {
            match decision.proc(&p) {
                Ok((cmd, report)) => {
                    num_consec_rejected = 0;

                    debug!(
                        "{:?}: throttle {:.2}, brake {:.2}, steer {:.2} deg",
                        report.mode, cmd.throttle, cmd.brake, cmd.steer_deg
                    );

                    if cmd.send_pickup {
                        info!("Sample pickup requested");
                    }

                    // ---- WRITE ARCHIVES ----

                    if let Err(e) = decision.write() {
                        warn!("Could not write decision archives: {}", e);
                    }
                }
                Err(e) => {
                    // The previous commands are held, a bad frame shouldn't stop the rover
                    warn!("Error during decision processing: {}", e);
                    num_consec_rejected += 1;

                    if num_consec_rejected > MAX_CONSEC_REJECTED_FRAMES {
                        return Err(eyre!(
                            "More than {} consecutive perception frames rejected",
                            MAX_CONSEC_REJECTED_FRAMES
                        ));
                    }
                }
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
            ),
        }

        num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!(
        "End of execution after {} cycles, final mode {}",
        num_cycles,
        decision.state().mode
    );

    Ok(())
}
