//! Trajectory control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector2;
use serde::Serialize;
use std::f64::consts::PI;

// Internal
use super::*;
use crate::kinematics::KinematicState;
use util::params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Pure pursuit path tracker.
///
/// The tracker keeps the index of the last target it chose so that the aim
/// point never moves backwards along the course, even when the nearest
/// waypoint does.
#[derive(Debug, Clone)]
pub struct PathTracker {
    params: Params,

    /// Wheelbase of the vehicle being steered.
    wheelbase_m: f64,

    /// Progress along the current course, `None` until `begin` is called.
    progress: Option<TrackerProgress>,
}

/// The tracker's memory between ticks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerProgress {
    /// The last target index chosen
    pub prev_index: usize,
}

/// The result of one target selection.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Target {
    /// Index of the aim waypoint in the course
    pub index: usize,

    /// The aim point itself
    pub aim_m: Vector2<f64>,

    /// Angle between the vehicle heading and the aim point, after flipping
    /// for reverse travel.
    pub alpha_rad: f64,

    /// The steering angle demand.
    pub steer_rad: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum TrajCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("The look-ahead distance must be strictly positive, got {0} m")]
    NonPositiveLookAhead(f64),

    #[error("The wheelbase must be strictly positive, got {0} m")]
    NonPositiveWheelbase(f64),

    /// Attempted to step the tracker before setting its initial progress.
    #[error("The tracker has not been started on a course")]
    NotStarted,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathTracker {
    /// Intiailise the tracker from a parameter file.
    ///
    /// The path is relative to the parameters directory.
    pub fn init(params_path: &str, wheelbase_m: f64) -> Result<Self, TrajCtrlError> {
        let params = params::load(params_path).map_err(TrajCtrlError::ParamLoadError)?;

        Self::new(params, wheelbase_m)
    }

    /// Create a new tracker, validating the parameters.
    pub fn new(params: Params, wheelbase_m: f64) -> Result<Self, TrajCtrlError> {
        if !(params.look_ahead_m > 0.0) {
            return Err(TrajCtrlError::NonPositiveLookAhead(params.look_ahead_m));
        }
        if !(wheelbase_m > 0.0) {
            return Err(TrajCtrlError::NonPositiveWheelbase(wheelbase_m));
        }

        Ok(Self {
            params,
            wheelbase_m,
            progress: None,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn wheelbase_m(&self) -> f64 {
        self.wheelbase_m
    }

    pub fn progress(&self) -> Option<TrackerProgress> {
        self.progress
    }

    /// Start tracking a course, setting the progress to the waypoint nearest
    /// the vehicle.
    ///
    /// Returns the initial progress index.
    pub fn begin(&mut self, state: &KinematicState, course: &Course) -> usize {
        let prev_index = course.nearest_index(&state.position2());

        debug!("Tracker starting at course index {}", prev_index);

        self.progress = Some(TrackerProgress { prev_index });
        prev_index
    }

    /// Select a target for the current state and record it as the new
    /// progress.
    pub fn step(
        &mut self,
        state: &KinematicState,
        course: &Course,
    ) -> Result<Target, TrajCtrlError> {
        let progress = self.progress.ok_or(TrajCtrlError::NotStarted)?;

        let target = self.select_target(state, course, progress.prev_index);

        self.progress = Some(TrackerProgress {
            prev_index: target.index,
        });

        Ok(target)
    }

    /// Select the aim waypoint and compute the steering demand to reach it.
    ///
    /// The returned index is never lower than `prev_index`, and never beyond
    /// the end of the course. This function has no side effects.
    pub fn select_target(
        &self,
        state: &KinematicState,
        course: &Course,
        prev_index: usize,
    ) -> Target {
        // ---- TARGET MANAGEMENT ----

        let nearest_index = course.nearest_index(&state.position2());
        let candidate_index = course.look_ahead_index(nearest_index, self.params.look_ahead_m);

        // The aim point may not regress, then it may not leave the course
        let index = prev_index.max(candidate_index).min(course.last_index());

        // Can't fail as the index was clamped to the course
        let aim_m = course.points()[index];

        // ---- COMMAND GENERATION ----

        let mut alpha_rad = (aim_m[1] - state.y_m).atan2(aim_m[0] - state.x_m) - state.yaw_rad;

        // When reversing "ahead" is behind the vehicle
        if state.speed_ms < 0.0 {
            alpha_rad = PI - alpha_rad;
        }

        let steer_rad =
            (2.0 * self.wheelbase_m * alpha_rad.sin() / self.params.look_ahead_m).atan2(1.0);

        debug!(
            "Target: nearest {}, candidate {}, selected {} (prev {}), steer {:.4} rad",
            nearest_index, candidate_index, index, prev_index, steer_rad
        );

        Target {
            index,
            aim_m,
            alpha_rad,
            steer_rad,
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Select a target using loose parameters, returning the target index and
/// steering angle.
pub fn select_target(
    state: &KinematicState,
    course: &Course,
    prev_index: usize,
    look_ahead_m: f64,
    wheelbase_m: f64,
) -> Result<(usize, f64), TrajCtrlError> {
    let tracker = PathTracker::new(Params { look_ahead_m }, wheelbase_m)?;
    let target = tracker.select_target(state, course, prev_index);

    Ok((target.index, target.steer_rad))
}
