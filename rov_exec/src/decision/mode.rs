//! Decision modes

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::fmt::Display;

use super::{Azimuth, Pickle};

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// The active mode of the decision core.
///
/// Recovery modes carry their own data, so sweep tracking can only exist while in `Pickle` and a
/// target heading only while in `Azimuth`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Forward,
    Pickle(Pickle),
    Azimuth(Azimuth),
}

/// Data-less tag of a [`Mode`], used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModeKind {
    Forward,
    Pickle,
    Azimuth,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl Mode {
    /// A fresh `Pickle` mode with no sweep in progress.
    pub fn pickle() -> Self {
        Mode::Pickle(Pickle::default())
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Forward => ModeKind::Forward,
            Mode::Pickle(_) => ModeKind::Pickle,
            Mode::Azimuth(_) => ModeKind::Azimuth,
        }
    }

    /// Returns true for the `Pickle` and `Azimuth` modes.
    pub fn is_recovering(&self) -> bool {
        !matches!(self, Mode::Forward)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Forward
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Forward => write!(f, "Mode::Forward"),
            Mode::Pickle(_) => write!(f, "Mode::Pickle"),
            Mode::Azimuth(a) => write!(f, "Mode::Azimuth(target {:.1} deg)", a.target_angle_deg),
        }
    }
}

impl Default for ModeKind {
    fn default() -> Self {
        ModeKind::Forward
    }
}
