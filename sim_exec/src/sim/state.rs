//! Simulation loop state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::*;
use crate::{
    kinematics::{KinematicModel, KinematicState, KinematicsError},
    speed_ctrl::SpeedController,
    traj_ctrl::{self, Course, CourseError, PathTracker, TrajCtrlError},
};
use util::params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Closed loop simulation of a vehicle tracking a course.
///
/// Each call to `run` starts from fresh tracker progress, so a loop may be
/// reused for several runs.
#[derive(Debug, Clone)]
pub struct SimLoop {
    model: KinematicModel,

    speed_ctrl: SpeedController,

    tracker: PathTracker,

    target_speed_ms: f64,

    max_time_s: f64,
}

/// The outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimOutput {
    /// Every sample of the run, starting with the initial state.
    pub log: TrajLog,

    pub termination: Termination,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Why a run stopped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// The tracker aimed at the final waypoint.
    GoalReached,

    /// The simulation time reached the time budget first.
    TimeBudgetExhausted,
}

/// Errors raised while setting up or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("Invalid kinematic model: {0}")]
    Kinematics(#[from] KinematicsError),

    #[error("Trajectory control error: {0}")]
    TrajCtrl(#[from] TrajCtrlError),

    #[error("Invalid course: {0}")]
    Course(#[from] CourseError),

    #[error("The time budget must not be negative, got {0} s")]
    NegativeTimeBudget(f64),

    #[error("A sweep worker thread panicked")]
    SweepWorkerPanicked,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimLoop {
    /// Intiailise the loop from parameter files.
    ///
    /// Paths are relative to the parameters directory.
    pub fn init(sim_params_path: &str, traj_params_path: &str) -> Result<Self, SimError> {
        let sim_params: Params = params::load(sim_params_path).map_err(SimError::ParamLoadError)?;
        let traj_params: traj_ctrl::Params =
            params::load(traj_params_path).map_err(SimError::ParamLoadError)?;

        Self::new(&sim_params, traj_params)
    }

    /// Build the loop, validating every parameter.
    pub fn new(params: &Params, traj_params: traj_ctrl::Params) -> Result<Self, SimError> {
        let model = KinematicModel::new(params.wheelbase_m, params.dt_s)?;
        let tracker = PathTracker::new(traj_params, params.wheelbase_m)?;

        if !(params.max_time_s >= 0.0) {
            return Err(SimError::NegativeTimeBudget(params.max_time_s));
        }

        Ok(Self {
            model,
            speed_ctrl: SpeedController::new(params.speed_k_p),
            tracker,
            target_speed_ms: params.target_speed_ms,
            max_time_s: params.max_time_s,
        })
    }

    pub fn tracker(&self) -> &PathTracker {
        &self.tracker
    }

    pub fn model(&self) -> &KinematicModel {
        &self.model
    }

    /// Run the simulation from the initial state until the goal is reached or
    /// the time budget is exhausted.
    pub fn run(
        &mut self,
        initial: KinematicState,
        course: &Course,
    ) -> Result<SimOutput, SimError> {
        let last_index = course.last_index();
        let dt_s = self.model.dt_s();

        info!(
            "Starting run over {} waypoints ({:.2} m), look-ahead {} m, time budget {} s",
            course.get_num_points(),
            course.get_length(),
            self.tracker.params().look_ahead_m,
            self.max_time_s
        );

        let mut state = initial;
        let mut time_s = 0f64;
        let mut target_index = self.tracker.begin(&state, course);

        let mut log = TrajLog::new();
        let aim_m = course.points()[target_index];
        log.push(TrajSample {
            time_s,
            target_index,
            x_m: state.x_m,
            y_m: state.y_m,
            yaw_rad: state.yaw_rad,
            speed_ms: state.speed_ms,
            aim_x_m: aim_m[0],
            aim_y_m: aim_m[1],
            steer_rad: 0.0,
            accel_ms2: 0.0,
        });

        let termination = loop {
            // Goal takes precedence over the time budget
            if target_index == last_index {
                break Termination::GoalReached;
            }
            if time_s >= self.max_time_s {
                break Termination::TimeBudgetExhausted;
            }

            let target = self.tracker.step(&state, course)?;
            let accel_ms2 = self.speed_ctrl.command(self.target_speed_ms, state.speed_ms);

            state = state.advance(accel_ms2, target.steer_rad, &self.model);
            time_s += dt_s;
            target_index = target.index;

            debug!(
                "t = {:.3} s: pos ({:.3}, {:.3}), speed {:.3} m/s, target {} at ({:.3}, {:.3})",
                time_s, state.x_m, state.y_m, state.speed_ms, target.index, target.aim_m[0],
                target.aim_m[1]
            );

            log.push(TrajSample {
                time_s,
                target_index,
                x_m: state.x_m,
                y_m: state.y_m,
                yaw_rad: state.yaw_rad,
                speed_ms: state.speed_ms,
                aim_x_m: target.aim_m[0],
                aim_y_m: target.aim_m[1],
                steer_rad: target.steer_rad,
                accel_ms2,
            });
        };

        match termination {
            Termination::GoalReached => info!(
                "Goal reached after {} ticks ({:.3} s)",
                log.len() - 1,
                time_s
            ),
            Termination::TimeBudgetExhausted => warn!(
                "Time budget exhausted after {} ticks, aiming at index {} of {}",
                log.len() - 1,
                target_index,
                last_index
            ),
        }

        Ok(SimOutput { log, termination })
    }
}

impl SimOutput {
    /// Number of ticks executed.
    pub fn num_ticks(&self) -> usize {
        self.log.len().saturating_sub(1)
    }

    /// The state at the end of the run.
    pub fn final_state(&self) -> Option<KinematicState> {
        self.log.last().map(|s| s.state())
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Run a simulation from loose parameters.
#[allow(clippy::too_many_arguments)]
pub fn run_sim(
    initial: KinematicState,
    course: &Course,
    look_ahead_m: f64,
    speed_k_p: f64,
    target_speed_ms: f64,
    dt_s: f64,
    max_time_s: f64,
    wheelbase_m: f64,
) -> Result<SimOutput, SimError> {
    let params = Params {
        dt_s,
        wheelbase_m,
        max_time_s,
        target_speed_ms,
        speed_k_p,
    };

    SimLoop::new(&params, traj_ctrl::Params { look_ahead_m })?.run(initial, course)
}

#[cfg(test)]
mod test {
    use super::*;

    fn params(max_time_s: f64) -> Params {
        Params {
            dt_s: 0.1,
            wheelbase_m: 2.9,
            max_time_s,
            target_speed_ms: 1.0,
            speed_k_p: 1.0,
        }
    }

    fn sim(max_time_s: f64, look_ahead_m: f64) -> SimLoop {
        SimLoop::new(&params(max_time_s), traj_ctrl::Params { look_ahead_m }).unwrap()
    }

    fn l_course() -> Course {
        Course::from_xy(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]).unwrap()
    }

    /// Straight course along +X with a waypoint every half meter.
    fn straight_course(num_points: usize) -> Course {
        Course::from_xy(
            &(0..num_points)
                .map(|i| [i as f64 * 0.5, 0.0])
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_time_budget() {
        let initial = KinematicState::new(0.0, 0.0, 0.0, 1.0);

        let output = sim(0.0, 1.0).run(initial, &l_course()).unwrap();

        assert_eq!(output.termination, Termination::TimeBudgetExhausted);
        assert_eq!(output.num_ticks(), 0);
        assert_eq!(output.log.len(), 1);
        assert_eq!(output.log.samples()[0].state(), initial);
        assert_eq!(output.log.samples()[0].time_s, 0.0);
    }

    #[test]
    fn test_goal_precedes_time_budget() {
        // Starting on the last waypoint with no time budget
        let course = Course::from_xy(&[[0.0, 0.0], [5.0, 0.0]]).unwrap();
        let initial = KinematicState::new(5.0, 0.0, 0.0, 0.0);

        let output = sim(0.0, 1.0).run(initial, &course).unwrap();

        assert_eq!(output.termination, Termination::GoalReached);
        assert_eq!(output.num_ticks(), 0);

        // A single waypoint course is already complete
        let single = Course::from_xy(&[[3.0, 3.0]]).unwrap();
        let output = sim(10.0, 1.0).run(initial, &single).unwrap();
        assert_eq!(output.termination, Termination::GoalReached);
        assert_eq!(output.log.len(), 1);
    }

    #[test]
    fn test_straight_course_reaches_goal() {
        let course = straight_course(21);
        let initial = KinematicState::new(0.0, 0.0, 0.0, 0.0);

        let output = sim(60.0, 1.0).run(initial, &course).unwrap();

        assert_eq!(output.termination, Termination::GoalReached);
        assert_eq!(output.log.last().unwrap().target_index, course.last_index());

        // No lateral error on a straight course
        for sample in output.log.samples() {
            assert!(sample.y_m.abs() < 1e-12);
            assert!(sample.steer_rad.abs() < 1e-12);
        }

        // The goal is aimed at once within the look-ahead, 9 m along the course
        let final_state = output.final_state().unwrap();
        assert!(final_state.x_m > 8.0 && final_state.x_m < 9.5);
    }

    #[test]
    fn test_time_budget_exhausted() {
        let course = straight_course(201);
        let initial = KinematicState::new(0.0, 0.0, 0.0, 0.0);

        let output = sim(1.0, 1.0).run(initial, &course).unwrap();

        assert_eq!(output.termination, Termination::TimeBudgetExhausted);

        // 0.1 s ticks accumulate to just under 1.0 after ten steps, allow one
        // extra tick for the rounding
        assert!(output.num_ticks() == 10 || output.num_ticks() == 11);
        assert!(output.log.last().unwrap().time_s >= 1.0);
    }

    #[test]
    fn test_log_samples() {
        let course = straight_course(201);
        let initial = KinematicState::new(0.0, 0.0, 0.0, 0.0);

        let output = sim(2.0, 1.0).run(initial, &course).unwrap();
        let samples = output.log.samples();

        // First tick: speed error of 1 m/s with unit gain
        assert_eq!(samples[1].accel_ms2, 1.0);
        assert!((samples[1].speed_ms - 0.1).abs() < 1e-12);

        // The vehicle only starts moving on the second tick
        assert_eq!(samples[1].x_m, 0.0);
        assert!(samples[2].x_m > 0.0);

        for pair in samples.windows(2) {
            assert!(pair[1].target_index >= pair[0].target_index);
            assert!((pair[1].time_s - pair[0].time_s - 0.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_corner_monotonic_and_deterministic() {
        let mut points = Vec::new();
        for i in 0..40 {
            points.push([i as f64 * 0.5, 0.0]);
        }
        for i in 1..40 {
            points.push([19.5, i as f64 * 0.5]);
        }
        let course = Course::from_xy(&points).unwrap();
        let initial = KinematicState::new(0.0, -1.0, 0.0, 0.0);

        let a = sim(120.0, 2.0).run(initial, &course).unwrap();
        let b = sim(120.0, 2.0).run(initial, &course).unwrap();

        assert_eq!(a.termination, Termination::GoalReached);
        assert_eq!(a.log.samples(), b.log.samples());

        // Turning left at the corner
        assert!(a.log.samples().iter().any(|s| s.steer_rad > 0.1));

        for rate in a.log.index_rates() {
            assert!(rate >= 0.0);
        }
    }

    #[test]
    fn test_loop_reusable() {
        let course = straight_course(21);
        let initial = KinematicState::new(0.0, 0.0, 0.0, 0.0);
        let mut sim = sim(60.0, 1.0);

        let a = sim.run(initial, &course).unwrap();
        let b = sim.run(initial, &course).unwrap();

        assert_eq!(a.log.samples(), b.log.samples());
    }

    #[test]
    fn test_invalid_params() {
        let traj = traj_ctrl::Params { look_ahead_m: 1.0 };

        assert!(matches!(
            SimLoop::new(&params(-1.0), traj),
            Err(SimError::NegativeTimeBudget(_))
        ));

        let mut bad_dt = params(1.0);
        bad_dt.dt_s = 0.0;
        assert!(matches!(
            SimLoop::new(&bad_dt, traj),
            Err(SimError::Kinematics(KinematicsError::NonPositiveTimestep(_)))
        ));

        assert!(matches!(
            SimLoop::new(&params(1.0), traj_ctrl::Params { look_ahead_m: 0.0 }),
            Err(SimError::TrajCtrl(TrajCtrlError::NonPositiveLookAhead(_)))
        ));
    }

    #[test]
    fn test_run_sim() {
        let initial = KinematicState::new(0.0, 0.0, 0.0, 1.0);

        let output = run_sim(initial, &l_course(), 1.0, 1.0, 2.0, 0.2, 0.0, 2.9).unwrap();
        assert_eq!(output.termination, Termination::TimeBudgetExhausted);
        assert_eq!(output.num_ticks(), 0);

        assert!(run_sim(initial, &l_course(), 1.0, 1.0, 2.0, -0.2, 1.0, 2.9).is_err());
    }
}
