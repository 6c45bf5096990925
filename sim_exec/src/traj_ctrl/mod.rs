//! # Trajectory control module
//!
//! Trajectory control is responsible for keeping the vehicle on the target
//! course. It does this with a pure pursuit law: an aim waypoint is picked a
//! look-ahead distance along the course from the waypoint nearest the
//! vehicle, and the steering angle is chosen so that the vehicle's arc passes
//! through it.
//!
//! The course is a list of waypoints which may be unevenly spaced, so the
//! look-ahead is found by walking the course and accumulating the distance
//! between waypoints. The walk stops at the first waypoint at or beyond the
//! look-ahead distance.
//!
//! Vehicles overshoot waypoints, particularly at corners, which can make the
//! nearest waypoint jump backwards. The tracker therefore remembers the last
//! index it aimed at and never selects an earlier one.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod course;
pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use course::*;
pub use params::Params;
pub use state::*;
