//! Benchmarks for characteristics time stepping.
//!
//! Run with: `cargo bench --bench time_stepping_bench`
//!
//! Add `--features parallel` to include the rayon interior sweep.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use moc_rs::boundary::InflowHydrograph;
use moc_rs::config::{Channel, InflowConfig, ScenarioConfig, SchemeConfig};
use moc_rs::equations::{Characteristics, NodeHydraulics, NodeState, SourceTermSign};
use moc_rs::mesh::Mesh1D;
use moc_rs::simulation::Simulation;
use moc_rs::solver::{FlowField, NullSink};
use moc_rs::time::{TemporalGrid, TimeMarcher};
use moc_rs::types::{NodeIndex, StepIndex};

/// Single interior update from two neighbour states.
fn bench_interior_update(c: &mut Criterion) {
    let channel = Channel::default();
    let chars = Characteristics::new(&channel, 20.0, SourceTermSign::Additive);
    let a = NodeHydraulics::evaluate(NodeState::new(3.4, 1.3), &channel);
    let b = NodeHydraulics::evaluate(NodeState::new(3.3, 1.25), &channel);

    c.bench_function("interior_update", |bencher| {
        bencher.iter(|| black_box(chars.interior(black_box(&a), black_box(&b))))
    });
}

/// One full step (both boundaries and the interior sweep) for several grid sizes.
fn bench_single_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_step");
    let channel = Channel::default();

    for n_nodes in [51, 201, 1001] {
        let mesh = Mesh1D::uniform(channel.length, n_nodes).unwrap();
        let grid = TemporalGrid::new(100.0, 1.0).unwrap();
        let hydrograph = InflowHydrograph::from_config(&InflowConfig::default(), &grid).unwrap();
        let initial = NodeState::new(3.2336, 1.237);

        let mut variants = vec![("serial", false)];
        if cfg!(feature = "parallel") {
            variants.push(("parallel", true));
        }

        for (name, parallel) in variants {
            let scheme = SchemeConfig {
                parallel,
                ..SchemeConfig::default()
            };
            group.bench_with_input(BenchmarkId::new(name, n_nodes), &n_nodes, |bencher, &n| {
                let mut marcher = TimeMarcher::new(&channel, &mesh, &grid, &hydrograph, &scheme);
                let mut field = FlowField::new_uniform(grid.n_steps(), n, initial);
                bencher.iter(|| {
                    marcher
                        .step(&mut field, StepIndex::ZERO, &mut NullSink)
                        .unwrap();
                    black_box(field.depth(StepIndex::new(1), NodeIndex::new(n / 2)))
                })
            });
        }
    }

    group.finish();
}

/// The complete reference scenario.
fn bench_reference_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_run");
    group.sample_size(10);

    let sim = Simulation::new(ScenarioConfig::default()).unwrap();
    group.bench_function("flood_wave_5h", |bencher| {
        bencher.iter(|| black_box(sim.run().unwrap().field.min_depth()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_interior_update,
    bench_single_step,
    bench_reference_run
);
criterion_main!(benches);
