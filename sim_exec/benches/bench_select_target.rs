//! # Target Selection Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sim_lib::{
    kinematics::KinematicState,
    sim::{Params, SimLoop},
    traj_ctrl::{self, Course, PathTracker},
};

/// A long winding course with a waypoint every 5 cm.
fn winding_course(num_points: usize) -> Course {
    let points: Vec<[f64; 2]> = (0..num_points)
        .map(|i| {
            let x = i as f64 * 0.05;
            [x, 2.0 * (x / 5.0).sin()]
        })
        .collect();

    Course::from_xy(&points).unwrap()
}

fn select_target_benchmark(c: &mut Criterion) {
    let course = winding_course(10_000);
    let tracker = PathTracker::new(traj_ctrl::Params { look_ahead_m: 1.0 }, 2.9).unwrap();
    let state = KinematicState::new(250.0, 0.5, 0.2, 0.447);

    c.bench_function("select_target 10k points", |b| {
        b.iter(|| tracker.select_target(black_box(&state), black_box(&course), black_box(4000)))
    });
}

fn sim_run_benchmark(c: &mut Criterion) {
    let course = winding_course(2_000);
    let params = Params {
        dt_s: 0.2,
        wheelbase_m: 2.9,
        max_time_s: 120.0,
        target_speed_ms: 0.447,
        speed_k_p: 1.0,
    };
    let mut sim = SimLoop::new(&params, traj_ctrl::Params { look_ahead_m: 0.5 }).unwrap();
    let initial = KinematicState::new(0.0, 0.0, 0.0, 0.0);

    c.bench_function("sim run 2k points", |b| {
        b.iter(|| sim.run(black_box(initial), black_box(&course)).unwrap())
    });
}

criterion_group!(benches, select_target_benchmark, sim_run_benchmark);
criterion_main!(benches);
