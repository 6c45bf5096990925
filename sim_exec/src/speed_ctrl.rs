//! # Speed controller
//!
//! A proportional controller converting the speed error into an acceleration
//! demand. No saturation is applied, high gains with a long timestep will
//! overshoot.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Proportional gain used when none is configured.
pub const DEFAULT_SPEED_K_P: f64 = 1.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The speed controller.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedController {
    /// Proportional gain
    ///
    /// Units: 1/seconds
    pub k_p: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SpeedController {
    pub fn new(k_p: f64) -> Self {
        Self { k_p }
    }

    /// Get the acceleration demand needed to reach the target speed.
    pub fn command(&self, target_speed_ms: f64, current_speed_ms: f64) -> f64 {
        command_acceleration(target_speed_ms, current_speed_ms, self.k_p)
    }
}

impl Default for SpeedController {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_K_P)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Proportional acceleration demand, `gain * (target - current)`.
pub fn command_acceleration(target_speed_ms: f64, current_speed_ms: f64, gain: f64) -> f64 {
    gain * (target_speed_ms - current_speed_ms)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_command() {
        assert_eq!(command_acceleration(2.0, 0.0, 1.0), 2.0);
        assert_eq!(SpeedController::default().command(2.0, 0.0), 2.0);

        // Above target gives a deceleration
        assert_eq!(SpeedController::new(0.5).command(1.0, 3.0), -1.0);

        // Reverse targets drive the speed negative
        assert_eq!(SpeedController::new(2.0).command(-1.0, 0.0), -2.0);

        assert_eq!(SpeedController::new(3.0).command(0.447, 0.447), 0.0);
    }
}
