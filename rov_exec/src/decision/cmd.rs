//! Motor commands output by the decision module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Commands for the vehicle, produced once per cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Commands {
    /// Forward throttle demand, zero or positive.
    pub throttle: f64,

    /// Brake demand, either zero or `DecisionParams::brake_set`.
    pub brake: f64,

    /// Steer demand, positive to the left.
    ///
    /// Units: degrees, limited to [-15, 15]
    pub steer_deg: f64,

    /// Request the vehicle to pick up the sample it is over.
    pub send_pickup: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Commands {
    /// Cut the throttle and apply the brake.
    pub fn brake(&mut self, brake_set: f64) {
        self.throttle = 0.0;
        self.brake = brake_set;
    }

    /// Brake to a stop with the wheels straight.
    pub fn stop(brake_set: f64) -> Self {
        Self {
            throttle: 0.0,
            brake: brake_set,
            steer_deg: 0.0,
            send_pickup: false,
        }
    }
}
