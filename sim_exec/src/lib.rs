//! # Path tracking library.
//!
//! This library provides the control core of the path tracking simulation so
//! that the executables and benchmarks in this crate can share it.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Kinematic model - integrates the vehicle state over one timestep
pub mod kinematics;

/// Simulation loop - ties the controllers and model together and records the trajectory
pub mod sim;

/// Speed control - proportional acceleration demand from the speed error
pub mod speed_ctrl;

/// Trajectory control module - keeps the vehicle on the given course
pub mod traj_ctrl;
