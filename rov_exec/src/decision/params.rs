//! Parameters structure for the decision module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::DecisionError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the decision module.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionParams {
    // ---- COMMANDS ----
    /// Brake demand applied whenever the rover must stop.
    pub brake_set: f64,

    /// Throttle demand while driving forward with a fully open view.
    pub throttle_set: f64,

    /// Speed above which no more throttle is applied.
    ///
    /// Units: meters/second
    pub max_vel_ms: f64,

    // ---- THRESHOLDS ----
    /// Minimum number of navigable samples required to keep driving forward.
    pub stop_forward: usize,

    /// Number of navigable samples which justifies driving forward at full throttle. Also the
    /// count a `Pickle` sweep heading must beat to be selected.
    pub go_forward: usize,

    /// Time the rover may be stationary in `Forward` before it is considered stuck.
    ///
    /// Units: seconds
    pub stuck_time_limit_s: f64,

    // ---- MISSION ----
    #[serde(default)]
    pub mission: MissionParams,
}

/// Parameters for the mission-complete check.
#[derive(Debug, Clone, Deserialize)]
pub struct MissionParams {
    /// If false the mission-complete check is skipped entirely.
    pub enabled: bool,

    /// Number of samples which must have been collected.
    pub min_samples: u32,

    /// Percentage of the terrain which must have been mapped.
    pub min_mapped_pct: f64,

    /// Distance from the start position within which the rover is considered home.
    ///
    /// Units: meters
    pub home_tolerance_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DecisionParams {
    /// Check the parameters are consistent.
    pub fn validate(&self) -> Result<(), DecisionError> {
        if !(self.brake_set > 0.0) {
            return Err(DecisionError::InvalidParams(format!(
                "brake_set must be positive, found {}",
                self.brake_set
            )));
        }
        if !(self.throttle_set > 0.0) || !(self.max_vel_ms > 0.0) {
            return Err(DecisionError::InvalidParams(format!(
                "throttle_set ({}) and max_vel_ms ({}) must be positive",
                self.throttle_set, self.max_vel_ms
            )));
        }
        if self.go_forward < self.stop_forward {
            return Err(DecisionError::InvalidParams(format!(
                "go_forward ({}) must not be less than stop_forward ({})",
                self.go_forward, self.stop_forward
            )));
        }
        if !(self.stuck_time_limit_s >= 0.0) {
            return Err(DecisionError::InvalidParams(format!(
                "stuck_time_limit_s must not be negative, found {}",
                self.stuck_time_limit_s
            )));
        }
        if self.mission.enabled && !(self.mission.home_tolerance_m > 0.0) {
            return Err(DecisionError::InvalidParams(format!(
                "mission.home_tolerance_m must be positive, found {}",
                self.mission.home_tolerance_m
            )));
        }

        Ok(())
    }
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            brake_set: 10.0,
            throttle_set: 0.2,
            max_vel_ms: 2.0,
            stop_forward: 50,
            go_forward: 500,
            stuck_time_limit_s: 15.0,
            mission: MissionParams::default(),
        }
    }
}

impl Default for MissionParams {
    fn default() -> Self {
        Self {
            enabled: true,
            min_samples: 6,
            min_mapped_pct: 95.0,
            home_tolerance_m: 5.0,
        }
    }
}
