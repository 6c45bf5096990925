//! Trajectory control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for trajectory control
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Params {
    /// Look-ahead distance. The aim point is the first waypoint at least this
    /// far along the course from the waypoint nearest the vehicle.
    ///
    /// Units: meters
    pub look_ahead_m: f64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deserialise() {
        let params: Params = util::params::from_str("look_ahead_m = 0.5").unwrap();
        assert_eq!(params.look_ahead_m, 0.5);

        assert!(util::params::from_str::<Params>("").is_err());
    }
}
