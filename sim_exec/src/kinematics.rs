//! # Kinematic model
//!
//! A kinematic bicycle model of the vehicle, integrated with an explicit
//! Euler step over a fixed timestep.
//!
//! The model does not saturate its inputs. Steering angles of exactly
//! `+/- pi/2` produce an unbounded yaw rate and must be avoided by the caller.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose and speed of the vehicle in the planar course frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    /// Position along the X axis.
    ///
    /// Units: meters
    pub x_m: f64,

    /// Position along the Y axis.
    ///
    /// Units: meters
    pub y_m: f64,

    /// Heading, measured from the +X axis. Not wrapped.
    ///
    /// Units: radians
    pub yaw_rad: f64,

    /// Longitudinal speed, negative when reversing.
    ///
    /// Units: meters/second
    pub speed_ms: f64,
}

/// Constants of the kinematic model which stay fixed for a whole run.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct KinematicModel {
    wheelbase_m: f64,
    dt_s: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised when building a kinematic model.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    #[error("The wheelbase must be strictly positive, got {0} m")]
    NonPositiveWheelbase(f64),

    #[error("The timestep must be strictly positive, got {0} s")]
    NonPositiveTimestep(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl KinematicState {
    pub fn new(x_m: f64, y_m: f64, yaw_rad: f64, speed_ms: f64) -> Self {
        Self {
            x_m,
            y_m,
            yaw_rad,
            speed_ms,
        }
    }

    /// The position as a vector.
    pub fn position2(&self) -> Vector2<f64> {
        Vector2::new(self.x_m, self.y_m)
    }

    /// Integrate the state over one timestep of the model.
    ///
    /// `accel_ms2` is the commanded longitudinal acceleration and `steer_rad`
    /// the commanded steering angle. Neither is clamped.
    pub fn advance(&self, accel_ms2: f64, steer_rad: f64, model: &KinematicModel) -> Self {
        let dt = model.dt_s;

        Self {
            x_m: self.x_m + self.speed_ms * self.yaw_rad.cos() * dt,
            y_m: self.y_m + self.speed_ms * self.yaw_rad.sin() * dt,
            yaw_rad: self.yaw_rad + self.speed_ms / model.wheelbase_m * steer_rad.tan() * dt,
            speed_ms: self.speed_ms + accel_ms2 * dt,
        }
    }
}

impl KinematicModel {
    /// Create a new model, checking that both constants are strictly positive.
    pub fn new(wheelbase_m: f64, dt_s: f64) -> Result<Self, KinematicsError> {
        // Written as negated comparisons so that NaN is rejected too
        if !(wheelbase_m > 0.0) {
            return Err(KinematicsError::NonPositiveWheelbase(wheelbase_m));
        }
        if !(dt_s > 0.0) {
            return Err(KinematicsError::NonPositiveTimestep(dt_s));
        }

        Ok(Self { wheelbase_m, dt_s })
    }

    pub fn wheelbase_m(&self) -> f64 {
        self.wheelbase_m
    }

    pub fn dt_s(&self) -> f64 {
        self.dt_s
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Advance a state by one step using loose model constants.
pub fn advance(
    state: &KinematicState,
    accel_ms2: f64,
    steer_rad: f64,
    dt_s: f64,
    wheelbase_m: f64,
) -> Result<KinematicState, KinematicsError> {
    let model = KinematicModel::new(wheelbase_m, dt_s)?;
    Ok(state.advance(accel_ms2, steer_rad, &model))
}
