//! Bounces a short chord, built from a wavetable instrument blob, to
//! `bounce.wav`.
//!
//! Run with: cargo run --example offline_bounce

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use tracker_voice::{
    instrument::{ArpeggioTable, EnvelopeParams, InstrumentData, SequencerStep, WavetableSource},
    synth::Context,
    MAX_BLOCK_SIZE,
};

const SAMPLE_RATE: u32 = 44_100;
const CHORD: [u8; 3] = [48, 52, 55];

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let instrument = InstrumentData::wavetable(WavetableSource::new(40).with_sequence(
        4,
        &[SequencerStep::new(40, 0), SequencerStep::new(41, 0)],
    ))
    .with_envelope(EnvelopeParams {
        attack_length: 3,
        attack_level: 64,
        decay_length: 15,
        decay_level: 36,
        sustain_level: 36,
        sustain_ticks: 0,
        release_length: 25,
    })
    .with_arpeggio(ArpeggioTable::new(&[0, 12]));
    let blob = instrument.to_bytes();
    println!("Instrument blob: {} bytes", blob.len());

    let mut ctx = Context::new(SAMPLE_RATE)?;
    let mut voices = Vec::new();
    for &note in &CHORD {
        let voice = ctx.create_voice().ok_or_else(|| eyre!("voice pool exhausted"))?;
        ctx.load_instrument(voice, &blob)?;
        ctx.note_on(voice, note, 110);
        voices.push(voice);
    }

    let hold_frames = SAMPLE_RATE as usize;
    let total_frames = hold_frames * 2;
    let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut right = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut mix = Vec::with_capacity(total_frames * 2);

    let mut rendered = 0;
    while rendered < total_frames {
        let frames = (total_frames - rendered).min(MAX_BLOCK_SIZE);
        if rendered == hold_frames - hold_frames % MAX_BLOCK_SIZE {
            for &voice in &voices {
                ctx.note_off(voice);
            }
        }

        let start = mix.len();
        mix.resize(start + frames * 2, 0.0);
        for &voice in &voices {
            ctx.render(voice, &mut left[..frames], &mut right[..frames]);
            for (i, (&l, &r)) in left[..frames].iter().zip(&right[..frames]).enumerate() {
                mix[start + i * 2] += l / CHORD.len() as f32;
                mix[start + i * 2 + 1] += r / CHORD.len() as f32;
            }
        }
        rendered += frames;
    }

    let peak = mix.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    println!("Rendered {total_frames} frames, peak {peak:.3}");

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create("bounce.wav", spec).wrap_err("creating bounce.wav")?;
    for &s in &mix {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    println!("Wrote bounce.wav");
    Ok(())
}
