//! # Rover library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to access items defined
//! inside the rover crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Decision module - decides throttle, brake, and steer from perception, and recovers the rover
/// when it gets stuck
pub mod decision;
