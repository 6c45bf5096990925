//! # Look-ahead Sweep
//!
//! Runs the scenario once for every look-ahead distance listed in
//! `sweep.toml`, in parallel, and reports how each run ended. Useful for
//! picking a look-ahead for a new course.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Result};
use log::info;
use serde::Deserialize;

use sim_lib::{
    sim::{self, ScenarioParams},
    traj_ctrl::Course,
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Deserialize)]
struct SweepParams {
    /// Look-ahead distances to run, in meters
    look_aheads_m: Vec<f64>,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let session =
        Session::new("lookahead_sweep", "sessions").wrap_err("Failed to create the session")?;

    // Per-tick logs from parallel runs would interleave, so stay at info
    logger_init(LevelFilter::Info, &session).wrap_err("Failed to initialise logging")?;

    info!("Look-ahead Sweep\n");

    // ---- LOAD PARAMETERS ----

    let sim_params: sim::Params =
        util::params::load("sim.toml").wrap_err("Could not load sim params")?;
    let scenario: ScenarioParams =
        util::params::load("scenario.toml").wrap_err("Could not load scenario params")?;
    let sweep_params: SweepParams =
        util::params::load("sweep.toml").wrap_err("Could not load sweep params")?;

    let course = Course::from_xy(&scenario.course).wrap_err("Invalid course in scenario")?;

    // ---- SWEEP ----

    let results = sim::sweep_look_ahead(
        scenario.initial,
        &course,
        &sim_params,
        &sweep_params.look_aheads_m,
    )
    .wrap_err("Sweep failed")?;

    info!("  Lf [m] | termination          | ticks | time [s] | dist to goal [m]");
    for r in results.iter() {
        info!(
            "  {:6.2} | {:20} | {:5} | {:8.2} | {:8.3}",
            r.look_ahead_m,
            format!("{:?}", r.termination),
            r.num_ticks,
            r.final_time_s,
            r.final_dist_to_goal_m
        );
    }

    session.save("sweep.json", results);

    session.exit();

    Ok(())
}
