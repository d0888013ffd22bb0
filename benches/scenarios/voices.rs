//! Benchmarks for complete voices rendered through a [`Context`].
//!
//! Each render runs the control tick as well as the oscillator, so these
//! numbers are what a host pays per voice per block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tracker_voice::{
    instrument::{
        ArpeggioTable, InstrumentData, PcmSample, SequencerStep, VibratoParams, WavetableSource,
    },
    synth::{Context, VoiceHandle},
    MAX_VOICES,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: u32 = 48_000;

fn plain_synth() -> InstrumentData {
    InstrumentData::wavetable(WavetableSource::new(16))
}

/// Every per-tick stage busy: vibrato, arpeggio and a wave sequence.
fn modulated_synth() -> InstrumentData {
    let steps: Vec<SequencerStep> = (16..32).map(|wave| SequencerStep::new(wave, 0)).collect();
    InstrumentData::wavetable(WavetableSource::new(16).with_sequence(1, &steps))
        .with_vibrato(VibratoParams {
            delay: 0,
            speed: 8,
            depth: 20,
        })
        .with_arpeggio(ArpeggioTable::new(&[0, 4, 7, 12]))
}

fn looped_sample() -> InstrumentData {
    let data = (0..16_384).map(|i| ((i * 3) % 256) as u8 as i8).collect();
    InstrumentData::pcm(PcmSample::new(data).with_loop(8_192, 8_192))
}

/// A context with one sounding voice per instrument.
fn playing(instruments: &[InstrumentData]) -> (Context, Vec<VoiceHandle>) {
    let mut ctx = Context::new(SAMPLE_RATE).unwrap();
    let handles = instruments
        .iter()
        .enumerate()
        .map(|(i, instrument)| {
            let voice = ctx.create_voice().unwrap();
            ctx.load_instrument_data(voice, instrument.clone()).unwrap();
            ctx.note_on(voice, 36 + i as u8 * 5, 127);
            voice
        })
        .collect();
    (ctx, handles)
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    let cases = [
        ("synth", plain_synth()),
        ("synth_modulated", modulated_synth()),
        ("pcm_loop", looped_sample()),
    ];

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        for (name, instrument) in &cases {
            let (mut ctx, handles) = playing(std::slice::from_ref(instrument));
            let voice = handles[0];
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| ctx.render(voice, black_box(&mut left), black_box(&mut right)))
            });
        }

        // === FULL POOL ===
        // Every voice sounding and summed, as the audition player does
        let instruments: Vec<InstrumentData> = (0..MAX_VOICES)
            .map(|i| match i % 3 {
                0 => plain_synth(),
                1 => modulated_synth(),
                _ => looped_sample(),
            })
            .collect();
        let (mut ctx, handles) = playing(&instruments);
        let mut mix = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("full_pool", size), &size, |b, _| {
            b.iter(|| {
                mix.fill(0.0);
                for &voice in &handles {
                    ctx.render(voice, &mut left, &mut right);
                    for (out, &s) in mix.iter_mut().zip(left.iter()) {
                        *out += s;
                    }
                }
                black_box(&mix);
            })
        });
    }

    group.finish();
}
