//! # Simulation executable
//!
//! Runs a single closed loop simulation of the vehicle following a course.
//!
//! Vehicle and loop parameters come from `sim.toml`, the look-ahead from
//! `traj_ctrl.toml`, both in the parameters directory. The scenario (initial
//! state and course) is read from `scenario.toml`, or from the path given as
//! the only argument.
//!
//! The trajectory is archived to `arch/traj.csv` in the session directory and
//! a summary of the run is saved to `summary.json`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::env;

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::{debug, info};
use serde::Serialize;

use sim_lib::{
    kinematics::KinematicState,
    sim::{ScenarioParams, SimLoop, Termination},
    traj_ctrl::Course,
};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Summary of the run saved alongside the archive.
#[derive(Serialize)]
struct RunSummary {
    termination: Termination,
    num_ticks: usize,
    final_state: Option<KinematicState>,
    course_length_m: f64,
    max_index_rate: f64,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("sim_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Path Tracking Simulation\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let scenario: ScenarioParams = match args.len() {
        1 => util::params::load("scenario.toml").wrap_err("Could not load scenario params")?,
        2 => {
            info!("Loading scenario from \"{}\"", &args[1]);
            util::params::load_path(&args[1]).wrap_err("Could not load scenario file")?
        }
        _ => return Err(eyre!("Expected the path to a scenario file as the only argument")),
    };

    let course = Course::from_xy(&scenario.course).wrap_err("Invalid course in scenario")?;

    // ---- MODULE INIT ----

    let mut sim =
        SimLoop::init("sim.toml", "traj_ctrl.toml").wrap_err("Failed to initialise SimLoop")?;
    info!("SimLoop init complete");

    // ---- RUN ----

    let output = sim
        .run(scenario.initial, &course)
        .wrap_err("Simulation failed")?;

    // ---- ARCHIVE ----

    let mut archiver =
        Archiver::from_path(&session, "traj.csv").wrap_err("Failed to create trajectory archive")?;
    output
        .log
        .archive(&mut archiver)
        .wrap_err("Failed to archive the trajectory")?;

    let max_index_rate = output
        .log
        .index_rates()
        .into_iter()
        .fold(0f64, f64::max);
    info!("Peak target index rate: {:.2} /s", max_index_rate);

    session.save(
        "summary.json",
        RunSummary {
            termination: output.termination,
            num_ticks: output.num_ticks(),
            final_state: output.final_state(),
            course_length_m: course.get_length(),
            max_index_rate,
        },
    );

    session.exit();

    Ok(())
}
