//! Benchmarks for the wavetable and PCM oscillators.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tracker_voice::{
    dsp::oscillator::{PcmOscillator, WavetableOscillator},
    instrument::PcmSample,
};

use crate::BLOCK_SIZES;

fn fill_wavetable(osc: &mut WavetableOscillator, buffer: &mut [f32]) {
    for out in buffer.iter_mut() {
        *out = osc.produce_sample();
        osc.advance_phase();
    }
}

fn fill_pcm(osc: &mut PcmOscillator, sample: &PcmSample, buffer: &mut [f32]) {
    for out in buffer.iter_mut() {
        *out = osc.produce_sample(sample);
        osc.advance_phase(sample);
    }
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let sample = PcmSample::new((0..8_192).map(|i| (i % 256) as u8 as i8).collect())
        .with_loop(4_096, 4_096);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Long wave: 32 samples per cycle
        let mut osc = WavetableOscillator::new(16);
        osc.set_frequency(440.0, 48_000.0);
        group.bench_with_input(BenchmarkId::new("wavetable", size), &size, |b, _| {
            b.iter(|| fill_wavetable(&mut osc, black_box(&mut buffer)))
        });

        // Looping sample played an octave up so the loop wraps often
        let mut osc = PcmOscillator::new();
        osc.set_frequency(261.63);
        group.bench_with_input(BenchmarkId::new("pcm_loop", size), &size, |b, _| {
            b.iter(|| fill_pcm(&mut osc, &sample, black_box(&mut buffer)))
        });
    }

    group.finish();
}
