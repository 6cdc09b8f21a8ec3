//! Performance benchmarks for ride_core using Criterion.rs.

use bevy_ecs::prelude::World;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ride_core::progress::{waypoint_index, ProgressStream};
use ride_core::runner::{dispatch, initialize_simulation, ride_schedule, run_until_empty};
use ride_core::scenario::{build_scenario, FlowParams};
use ride_core::state::{RideEvent, RiderAction};

fn bench_full_flow(c: &mut Criterion) {
    let intervals = vec![("50ms", 50), ("10ms", 10), ("1ms", 1)];

    let mut group = c.benchmark_group("full_flow");
    for (name, interval_ms) in intervals {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &interval_ms,
            |b, &interval_ms| {
                b.iter(|| {
                    let mut world = World::new();
                    let params = FlowParams::default()
                        .with_update_interval_ms(interval_ms)
                        .with_record_positions(false);
                    build_scenario(&mut world, &params).expect("valid params");
                    initialize_simulation(&mut world);
                    dispatch(&mut world, RideEvent::OfferRideClicked);
                    let mut schedule = ride_schedule();
                    run_until_empty(&mut world, &mut schedule, 1_000_000);
                    dispatch(&mut world, RideEvent::RiderAction(RiderAction::PickedUp));
                    black_box(run_until_empty(&mut world, &mut schedule, 1_000_000));
                });
            },
        );
    }
    group.finish();
}

fn bench_progress_stream(c: &mut Criterion) {
    c.bench_function("progress_stream_with_lookup", |b| {
        b.iter(|| {
            let stream = ProgressStream::new(black_box(6000), black_box(1)).expect("stream");
            let sum: usize = stream
                .filter_map(|p| waypoint_index(p, black_box(26)))
                .sum();
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_full_flow, bench_progress_stream);
criterion_main!(benches);
