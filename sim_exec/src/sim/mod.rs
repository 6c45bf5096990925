//! # Simulation module
//!
//! The simulation closes the loop between the trajectory controller, the speed
//! controller and the kinematic model. Each tick:
//!
//!  1. The path tracker picks the aim waypoint and a steering demand.
//!  1. The speed controller produces an acceleration demand.
//!  1. The kinematic model integrates both over one timestep.
//!  1. The new state is appended to the trajectory log.
//!
//! Before every tick the loop checks whether the tracker is aiming at the last
//! waypoint of the course, in which case the goal has been reached, and then
//! whether the time budget has run out.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod state;
pub mod sweep;
pub mod traj_log;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;
pub use sweep::*;
pub use traj_log::*;
