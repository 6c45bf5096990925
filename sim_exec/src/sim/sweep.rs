//! # Look-ahead sweep
//!
//! Runs the same scenario with several look-ahead distances. Runs share
//! nothing but the read-only course, so each is given its own thread.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use serde::Serialize;
use std::thread;

// Internal
use super::*;
use crate::{
    kinematics::KinematicState,
    traj_ctrl::{self, Course},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Summary of one run in a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepResult {
    pub look_ahead_m: f64,

    pub termination: Termination,

    pub num_ticks: usize,

    pub final_time_s: f64,

    /// Distance from the final position to the last waypoint
    pub final_dist_to_goal_m: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Run one simulation per look-ahead distance in parallel.
///
/// Results are returned in the same order as `look_aheads_m`. If any run
/// fails to set up the first error is returned.
pub fn sweep_look_ahead(
    initial: KinematicState,
    course: &Course,
    params: &Params,
    look_aheads_m: &[f64],
) -> Result<Vec<SweepResult>, SimError> {
    info!("Sweeping {} look-ahead distances", look_aheads_m.len());

    // Build every loop up front so bad parameters fail before any work starts
    let sims = look_aheads_m
        .iter()
        .map(|&look_ahead_m| SimLoop::new(params, traj_ctrl::Params { look_ahead_m }))
        .collect::<Result<Vec<_>, _>>()?;

    let goal_m = course.points()[course.last_index()];

    thread::scope(|scope| {
        let handles: Vec<_> = sims
            .into_iter()
            .map(|mut sim| scope.spawn(move || sim.run(initial, course)))
            .collect();

        handles
            .into_iter()
            .zip(look_aheads_m.iter())
            .map(|(handle, &look_ahead_m)| {
                let output = handle.join().map_err(|_| SimError::SweepWorkerPanicked)??;

                let last = output.log.last().copied();
                let (final_time_s, final_dist_to_goal_m) = match last {
                    Some(s) => (s.time_s, (s.state().position2() - goal_m).norm()),
                    None => (0.0, (initial.position2() - goal_m).norm()),
                };

                Ok(SweepResult {
                    look_ahead_m,
                    termination: output.termination,
                    num_ticks: output.num_ticks(),
                    final_time_s,
                    final_dist_to_goal_m,
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> Params {
        Params {
            dt_s: 0.1,
            wheelbase_m: 2.9,
            max_time_s: 60.0,
            target_speed_ms: 1.0,
            speed_k_p: 1.0,
        }
    }

    fn course() -> Course {
        Course::from_xy(
            &(0..41)
                .map(|i| [i as f64 * 0.25, 0.0])
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_sweep_matches_single_runs() {
        let course = course();
        let initial = KinematicState::new(0.0, 0.0, 0.0, 0.0);
        let look_aheads_m = [0.5, 1.0, 2.0, 4.0];

        let results = sweep_look_ahead(initial, &course, &params(), &look_aheads_m).unwrap();

        assert_eq!(results.len(), look_aheads_m.len());

        for (result, &look_ahead_m) in results.iter().zip(look_aheads_m.iter()) {
            assert_eq!(result.look_ahead_m, look_ahead_m);

            let single = SimLoop::new(&params(), traj_ctrl::Params { look_ahead_m })
                .unwrap()
                .run(initial, &course)
                .unwrap();

            assert_eq!(result.termination, single.termination);
            assert_eq!(result.num_ticks, single.num_ticks());
        }

        // A longer look-ahead aims at the goal sooner on a straight course
        assert!(results[3].num_ticks < results[0].num_ticks);
    }

    #[test]
    fn test_sweep_rejects_bad_look_ahead() {
        let initial = KinematicState::default();

        let result = sweep_look_ahead(initial, &course(), &params(), &[1.0, -1.0]);

        assert!(matches!(
            result,
            Err(SimError::TrajCtrl(
                traj_ctrl::TrajCtrlError::NonPositiveLookAhead(_)
            ))
        ));
    }

    #[test]
    fn test_sweep_results_serialise() {
        let results =
            sweep_look_ahead(KinematicState::default(), &course(), &params(), &[1.0]).unwrap();

        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json[0]["termination"], "GoalReached");
        assert_eq!(json[0]["look_ahead_m"], 1.0);
    }
}
