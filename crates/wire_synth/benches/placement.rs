mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wire_synth::prelude::{draw_wire, Canvas, WireBounds, WirePlacer};

const OPENING_ANGLES: [f64; 4] = [0.0, 90.0, 180.0, 270.0];
const WIRES: usize = 100;
const SIZE: u32 = 2048;

fn placement_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement/place");
    group.throughput(common::elements_throughput(WIRES));

    for &angle in &OPENING_ANGLES {
        let placer =
            WirePlacer::new(WireBounds::uniform(SIZE, (250.0, 500.0), (5.0, 10.0), angle));
        let mut rng = StdRng::seed_from_u64(0x91ACE ^ angle as u64);

        group.bench_with_input(BenchmarkId::from_parameter(angle), &angle, |b, _| {
            b.iter(|| {
                let mut attempts = 0;
                for _ in 0..WIRES {
                    attempts += placer.place(&mut rng).map(|p| p.attempts).unwrap_or(0);
                }
                black_box(attempts);
            });
        });
    }

    group.finish();
}

fn draw_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement/draw");
    group.throughput(common::elements_throughput(WIRES));

    for &angle in &OPENING_ANGLES {
        let placer =
            WirePlacer::new(WireBounds::uniform(SIZE, (250.0, 500.0), (5.0, 10.0), angle));
        let mut rng = StdRng::seed_from_u64(0xD8A3 ^ angle as u64);
        let wires: Vec<_> = (0..WIRES)
            .filter_map(|_| placer.place(&mut rng).ok())
            .map(|p| p.wire)
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(angle), &angle, |b, _| {
            b.iter(|| {
                let mut canvas = Canvas::new(SIZE);
                for wire in &wires {
                    draw_wire(&mut canvas, wire);
                }
                black_box(canvas.foreground_count());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = placement_benches, draw_benches
}
criterion_main!(benches);
