//! Benchmarks for the VSU per-cycle hot path
//!
//! Run with: cargo bench --bench vsu

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use vsu::vsu::{AudioFrames, ChannelId, Field, RegisterWrite, Vsu};

/// All six channels keyed with a non-trivial setup
fn busy_chip() -> Vsu {
    let mut chip = Vsu::new();
    let ramp: Vec<i32> = (1..=32).map(|i| i * 2).collect();
    for table in 0..5 {
        chip.set_waveform_data(table, &ramp);
    }
    chip.set_modulation_data(&[3; 32]);

    for (i, id) in ChannelId::ALL.into_iter().enumerate() {
        chip.write(&RegisterWrite::scalar(Field::Frequency(id), 1000 + 100 * i as u32));
        chip.write(&RegisterWrite::scalar(Field::Waveform(id), i as u32 % 5));
        chip.write(&RegisterWrite::scalar(Field::EnvelopeLevel(id), 15));
        chip.write(&RegisterWrite::flag(Field::EnvelopeRepeat(id), true));
        chip.write(&RegisterWrite::flag(Field::EnvelopeEnabled(id), true));
        chip.write(&RegisterWrite::flag(Field::Enabled(id), true));
    }
    chip.write(&RegisterWrite::flag(Field::SweepModFunction, true));
    chip.write(&RegisterWrite::flag(Field::ModRepeat, true));
    chip.write(&RegisterWrite::scalar(Field::SweepModInterval, 2));
    chip.write(&RegisterWrite::flag(Field::SweepModEnabled, true));
    chip
}

fn bench_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycles");
    let mut chip = busy_chip();

    for frame_count in [128, 1024, 41_667].iter() {
        let mut frames = AudioFrames::new(*frame_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(frame_count),
            frame_count,
            |b, _| {
                b.iter(|| {
                    chip.cycles(&mut frames);
                    black_box(frames.left()[0]);
                });
            },
        );
    }

    group.finish();
}

fn bench_idle_chip(c: &mut Criterion) {
    let mut chip = Vsu::new();
    let mut frames = AudioFrames::new(1024);
    c.bench_function("cycles_idle_1024", |b| {
        b.iter(|| {
            chip.cycles(&mut frames);
            black_box(frames.right()[0]);
        });
    });
}

criterion_group!(benches, bench_cycles, bench_idle_chip);
criterion_main!(benches);
