//! Plays a looping arpeggio on the default output device. Notes are sent
//! from a driver thread through an rtrb ring, the same way a host would.
//!
//! Run with: cargo run --example cpal_demo

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracker_voice::{
    instrument::{InstrumentData, SequencerStep, VibratoParams, WavetableSource},
    synth::{Context, VoiceMessage},
    MAX_BLOCK_SIZE,
};

const PATTERN: [u8; 4] = [48, 52, 55, 60];

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    let sample_rate = config.sample_rate().0;
    let channels = usize::from(config.channels());

    let instrument = InstrumentData::wavetable(WavetableSource::new(18).with_sequence(
        2,
        &[
            SequencerStep::new(18, 0),
            SequencerStep::new(22, 0),
            SequencerStep::new(26, 0),
            SequencerStep::new(22, 0),
        ],
    ))
    .with_vibrato(VibratoParams {
        delay: 10,
        speed: 5,
        depth: 8,
    });

    let mut ctx = Context::new(sample_rate)?;
    let voice = ctx.create_voice().ok_or_else(|| eyre!("voice pool exhausted"))?;
    ctx.load_instrument(voice, &instrument.to_bytes())?;

    let (mut tx, mut rx) = RingBuffer::<VoiceMessage>::new(64);
    let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                ctx.process_messages(&mut rx);
                for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let frames = chunk.len() / channels;
                    ctx.render(voice, &mut left[..frames], &mut right[..frames]);
                    for (i, frame) in chunk.chunks_mut(channels).enumerate() {
                        for (ch, out) in frame.iter_mut().enumerate() {
                            *out = if ch % 2 == 0 { left[i] } else { right[i] };
                        }
                    }
                }
            },
            move |err| eprintln!("Stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    println!("Playing on {sample_rate} Hz output. Press Ctrl+C to stop.");
    loop {
        for &note in &PATTERN {
            let _ = tx.push(VoiceMessage::NoteOn {
                voice,
                note,
                velocity: 110,
            });
            thread::sleep(Duration::from_millis(300));
            let _ = tx.push(VoiceMessage::NoteOff { voice });
            thread::sleep(Duration::from_millis(100));
        }
    }
}
