//! Built-in instruments and blob loading.

use std::{f32::consts::TAU, fs, path::Path};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracker_voice::instrument::{
    ArpeggioTable, EnvelopeParams, InstrumentData, PcmSample, SequencerStep, StepEffect,
    VibratoParams, WavetableSource,
};

use crate::DemoKind;

/// Reads the blob at `path`, or encodes the selected demo instrument.
pub fn load_blob(path: Option<&Path>, demo: DemoKind) -> EyreResult<Vec<u8>> {
    match path {
        Some(path) => fs::read(path)
            .wrap_err_with(|| format!("failed to read instrument {}", path.display())),
        None => {
            log::info!("using built-in {demo:?} instrument");
            Ok(demo_instrument(demo).to_bytes())
        }
    }
}

pub fn demo_instrument(demo: DemoKind) -> InstrumentData {
    match demo {
        DemoKind::Synth => synth_lead(),
        DemoKind::Pcm => pcm_pad(),
    }
}

/// Wavetable lead: a pulse-width sweep with a delayed vibrato and a minor
/// chord arpeggio. Synth blobs carry no arpeggio speed, so each chord note
/// is written twice.
fn synth_lead() -> InstrumentData {
    let source = WavetableSource::new(16).with_sequence(
        3,
        &[
            SequencerStep::new(16, 0).with_effect(StepEffect::VolumeReset),
            SequencerStep::new(18, 0),
            SequencerStep::new(20, 0),
            SequencerStep::new(22, 0),
            SequencerStep::new(24, 0),
            SequencerStep::new(22, 0),
            SequencerStep::new(20, 0),
            SequencerStep::new(18, 0),
        ],
    );
    InstrumentData::wavetable(source)
        .with_envelope(EnvelopeParams {
            attack_length: 2,
            attack_level: 64,
            decay_length: 12,
            decay_level: 44,
            sustain_level: 44,
            sustain_ticks: 0,
            release_length: 20,
        })
        .with_vibrato(VibratoParams {
            delay: 20,
            speed: 6,
            depth: 10,
        })
        .with_arpeggio(ArpeggioTable::new(&[
            0, 0, 3, 3, 7, 7, 12, 12, 7, 7, 3, 3, 0, 0, 0, 0,
        ]))
}

const PAD_CYCLE: usize = 64;
const PAD_CYCLES: usize = 32;

/// Slowly fading organ tone, 64 samples per cycle, looping over its last
/// eight cycles.
fn pcm_pad() -> InstrumentData {
    let data: Vec<i8> = (0..PAD_CYCLE * PAD_CYCLES)
        .map(|i| {
            let t = (i % PAD_CYCLE) as f32 / PAD_CYCLE as f32;
            let fade = 1.0 - 0.5 * (i / PAD_CYCLE) as f32 / PAD_CYCLES as f32;
            let s = (TAU * t).sin() + 0.3 * (2.0 * TAU * t).sin();
            (s * fade * 90.0).round() as i8
        })
        .collect();
    let loop_start = PAD_CYCLE * (PAD_CYCLES - 8);
    let sample = PcmSample::new(data)
        .with_volume(56)
        .with_transpose(-12)
        .with_loop(loop_start as u32, (PAD_CYCLE * 8) as u32);
    InstrumentData::pcm(sample)
}
