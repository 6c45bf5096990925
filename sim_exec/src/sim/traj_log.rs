//! # Trajectory log
//!
//! The trajectory log records one sample per tick for inspection after the
//! run. It is never read by the control loop.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::kinematics::KinematicState;
use util::archive::{ArchiveError, Archiver};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The state after a tick together with the commands that produced it.
///
/// Kept flat so that it can be written directly as a CSV row.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TrajSample {
    /// Simulation time of the sample
    pub time_s: f64,

    /// The course index being aimed at
    pub target_index: usize,

    pub x_m: f64,
    pub y_m: f64,
    pub yaw_rad: f64,
    pub speed_ms: f64,

    /// The aim point
    pub aim_x_m: f64,
    pub aim_y_m: f64,

    /// Steering demand applied during the tick
    pub steer_rad: f64,

    /// Acceleration demand applied during the tick
    pub accel_ms2: f64,
}

/// Ordered record of a simulation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrajLog {
    samples: Vec<TrajSample>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajSample {
    pub fn state(&self) -> KinematicState {
        KinematicState::new(self.x_m, self.y_m, self.yaw_rad, self.speed_ms)
    }
}

impl TrajLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: TrajSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[TrajSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&TrajSample> {
        self.samples.last()
    }

    /// Rate of change of the target index between consecutive samples, in
    /// indices per second.
    ///
    /// Spikes show the aim point jumping along the course, which happens
    /// where the course crosses itself or the waypoints bunch up.
    pub fn index_rates(&self) -> Vec<f64> {
        self.samples
            .windows(2)
            .map(|pair| {
                (pair[1].target_index as f64 - pair[0].target_index as f64)
                    / (pair[1].time_s - pair[0].time_s)
            })
            .collect()
    }

    /// Write every sample into the archive as a CSV row.
    pub fn archive(&self, archiver: &mut Archiver) -> Result<(), ArchiveError> {
        for sample in self.samples.iter() {
            archiver.serialise(sample)?;
        }

        Ok(())
    }
}
