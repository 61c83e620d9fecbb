//! # Decision Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rov_lib::decision::{angle_adj, decide, DecisionParams, Mode, Perception, RoverState};

fn decision_benchmark(c: &mut Criterion) {
    // ---- Build a dense perception frame ----

    let nav_angles_rad: Vec<f64> = (0..4000).map(|i| (i as f64 / 4000.0 - 0.5) * 1.2).collect();
    let obstacle_angles_rad: Vec<f64> = (0..1500).map(|i| (i as f64 / 1500.0) * 0.6).collect();

    let perception = Perception {
        nav_angles_rad: Some(nav_angles_rad),
        obstacle_angles_rad: obstacle_angles_rad.clone(),
        velocity_ms: 1.0,
        yaw_deg: 123.0,
        total_time_s: 10.0,
        ..Default::default()
    };

    let params = DecisionParams::default();

    // ---- Benchmarks ----

    c.bench_function("angle_adj", |b| {
        b.iter(|| angle_adj::adjust(black_box(4.0), black_box(&obstacle_angles_rad)))
    });

    c.bench_function("decide forward", |b| {
        b.iter(|| decide(&params, black_box(RoverState::default()), black_box(&perception)))
    });

    let pickle_state = RoverState {
        mode: Mode::pickle(),
        ..Default::default()
    };
    c.bench_function("decide pickle", |b| {
        b.iter(|| decide(&params, black_box(pickle_state), black_box(&perception)))
    });
}

criterion_group!(benches, decision_benchmark);
criterion_main!(benches);
