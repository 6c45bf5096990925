//! Simulation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::{kinematics::KinematicState, speed_ctrl::DEFAULT_SPEED_K_P};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the vehicle and the control loop.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Integration timestep of one tick.
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// Distance between the front and rear axles.
    ///
    /// Units: meters
    pub wheelbase_m: f64,

    /// Simulation time after which the run is stopped if the goal hasn't
    /// been reached.
    ///
    /// Units: seconds
    pub max_time_s: f64,

    /// Speed the speed controller drives towards, negative to reverse.
    ///
    /// Units: meters/second
    pub target_speed_ms: f64,

    /// Proportional gain of the speed controller
    #[serde(default = "default_speed_k_p")]
    pub speed_k_p: f64,
}

/// The starting state and the course to follow.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScenarioParams {
    /// Initial state of the vehicle
    pub initial: KinematicState,

    /// Course waypoints as `[x, y]` pairs, in meters.
    pub course: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn default_speed_k_p() -> f64 {
    DEFAULT_SPEED_K_P
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deserialise() {
        let params: Params = util::params::from_str(
            r#"
            dt_s = 0.2
            wheelbase_m = 2.9
            max_time_s = 120.0
            target_speed_ms = 0.447
            "#,
        )
        .unwrap();

        assert_eq!(params.dt_s, 0.2);
        assert_eq!(params.speed_k_p, DEFAULT_SPEED_K_P);

        let scenario: ScenarioParams = util::params::from_str(
            r#"
            course = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]

            [initial]
            x_m = 0.0
            y_m = 0.0
            yaw_rad = 0.0
            speed_ms = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(scenario.initial, KinematicState::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(scenario.course.len(), 3);
    }
}
