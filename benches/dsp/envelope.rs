//! Benchmarks for the tick-driven envelope generator.

use std::hint::black_box;

use criterion::Criterion;
use tracker_voice::{dsp::EnvelopeGenerator, instrument::EnvelopeParams};

/// One second of control ticks at 50 Hz.
const TICKS: usize = 50;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let params = EnvelopeParams {
        attack_length: 20,
        attack_level: 64,
        decay_length: 20,
        decay_level: 40,
        sustain_level: 40,
        sustain_ticks: 0,
        release_length: 40,
    };

    group.bench_function("attack_decay", |b| {
        let mut env = EnvelopeGenerator::new();
        b.iter(|| {
            env.note_on(&params);
            for _ in 0..TICKS {
                black_box(env.tick(black_box(&params)));
            }
        })
    });

    group.bench_function("release", |b| {
        let mut env = EnvelopeGenerator::new();
        b.iter(|| {
            env.note_on(&params);
            env.note_off();
            for _ in 0..TICKS {
                black_box(env.tick(black_box(&params)));
            }
        })
    });

    group.finish();
}
