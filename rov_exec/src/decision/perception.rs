//! Per-cycle input to the decision module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::DecisionError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Snapshot of the perceived terrain and the rover's kinematic state.
///
/// Produced by perception once per cycle and consumed by [`super::decide`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perception {
    /// Angles to navigable terrain pixels, or `None` if no drivable terrain is visible.
    ///
    /// Units: radians, rover frame, positive to the left
    pub nav_angles_rad: Option<Vec<f64>>,

    /// Angles to non-navigable (obstacle) pixels.
    ///
    /// Units: radians, rover frame, positive to the left
    #[serde(default)]
    pub obstacle_angles_rad: Vec<f64>,

    /// Signed forward speed.
    ///
    /// Units: meters/second
    pub velocity_ms: f64,

    /// Heading of the rover.
    ///
    /// Units: degrees, [0, 360)
    pub yaw_deg: f64,

    /// Position of the rover in the world frame.
    ///
    /// Units: meters
    #[serde(default = "default_position")]
    pub position_m: Vector2<f64>,

    /// Mission clock, monotonically increasing.
    ///
    /// Units: seconds
    pub total_time_s: f64,

    /// True if the rover is over a sample.
    #[serde(default)]
    pub near_sample: bool,

    /// True if a pickup is already in progress.
    #[serde(default)]
    pub picking_up: bool,

    /// Number of samples collected so far.
    #[serde(default)]
    pub samples_collected: u32,

    /// Percentage of the terrain which has been mapped.
    #[serde(default)]
    pub mapped_pct: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Perception {
    /// Number of navigable samples, zero if none are visible.
    pub fn nav_count(&self) -> usize {
        self.nav_angles_rad.as_ref().map(|n| n.len()).unwrap_or(0)
    }

    /// Check the kinematic values are usable by the decision core.
    ///
    /// Angle samples are not checked, only the scalar state. Non-finite angle samples are
    /// skipped when the steer is computed.
    pub fn validate(&self) -> Result<(), DecisionError> {
        if !self.velocity_ms.is_finite() {
            return Err(DecisionError::InvalidPerception("velocity"));
        }
        if !self.yaw_deg.is_finite() {
            return Err(DecisionError::InvalidPerception("yaw"));
        }
        if !self.total_time_s.is_finite() {
            return Err(DecisionError::InvalidPerception("mission time"));
        }
        if !self.position_m.iter().all(|p| p.is_finite()) {
            return Err(DecisionError::InvalidPerception("position"));
        }

        Ok(())
    }
}

impl Default for Perception {
    fn default() -> Self {
        Self {
            nav_angles_rad: None,
            obstacle_angles_rad: Vec::new(),
            velocity_ms: 0.0,
            yaw_deg: 0.0,
            position_m: Vector2::zeros(),
            total_time_s: 0.0,
            near_sample: false,
            picking_up: false,
            samples_collected: 0,
            mapped_pct: 0.0,
        }
    }
}

fn default_position() -> Vector2<f64> {
    Vector2::zeros()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json() {
        let p: Perception = serde_json::from_str(
            r#"{
                "nav_angles_rad": [0.1, -0.1],
                "velocity_ms": 0.5,
                "yaw_deg": 90.0,
                "position_m": [1.0, 2.0],
                "total_time_s": 3.0
            }"#,
        )
        .unwrap();

        assert_eq!(p.nav_count(), 2);
        assert!(p.obstacle_angles_rad.is_empty());
        assert_eq!(p.position_m, Vector2::new(1.0, 2.0));
        assert!(!p.near_sample);

        let p: Perception = serde_json::from_str(
            r#"{"nav_angles_rad": null, "velocity_ms": 0.0, "yaw_deg": 0.0, "total_time_s": 0.0}"#,
        )
        .unwrap();
        assert_eq!(p.nav_angles_rad, None);
        assert_eq!(p.nav_count(), 0);
    }

    #[test]
    fn test_validate() {
        assert!(Perception::default().validate().is_ok());

        let p = Perception {
            yaw_deg: std::f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(DecisionError::InvalidPerception("yaw"))
        ));

        let p = Perception {
            position_m: Vector2::new(std::f64::INFINITY, 0.0),
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }
}
