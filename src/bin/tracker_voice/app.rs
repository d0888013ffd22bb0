//! Live playback: cpal output stream plus the terminal UI

use std::io::stdout;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::supports_keyboard_enhancement,
};
use rtrb::{PushError, RingBuffer};
use tracker_voice::{
    synth::{Context, VoiceHandle, VoiceMessage},
    MAX_BLOCK_SIZE, MAX_VOICES,
};

use crate::ui::{state::VoiceSnapshot, UiApp, VIS_BUFFER_SIZE};

const CONTROL_RING_LEN: usize = 256;
const AUDIO_RING_BLOCKS: usize = 16;
const SNAPSHOT_RING_LEN: usize = 32;
/// Headroom for eight summed voices
const MIX_GAIN: f32 = 0.35;

pub struct PlayOptions {
    pub blob: Vec<u8>,
    pub octave: u8,
    pub velocity: u8,
}

/// Builds a context with every voice loaded with `blob`.
fn build_context(sample_rate: u32, blob: &[u8]) -> EyreResult<(Context, Vec<VoiceHandle>)> {
    let mut ctx = Context::new(sample_rate).wrap_err("unusable device sample rate")?;
    let mut voices = Vec::with_capacity(MAX_VOICES);
    while let Some(voice) = ctx.create_voice() {
        ctx.load_instrument(voice, blob)
            .wrap_err("failed to load instrument")?;
        voices.push(voice);
    }
    Ok((ctx, voices))
}

pub fn run(options: PlayOptions) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    let sample_rate = config.sample_rate().0;
    let channels = usize::from(config.channels());
    log::info!("output at {sample_rate} Hz, {channels} channels");

    let (mut ctx, voices) = build_context(sample_rate, &options.blob)?;

    let (msg_tx, mut msg_rx) = RingBuffer::<VoiceMessage>::new(CONTROL_RING_LEN);
    let (mut audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * AUDIO_RING_BLOCKS);
    let (mut snapshot_tx, snapshot_rx) = RingBuffer::<VoiceSnapshot>::new(SNAPSHOT_RING_LEN);

    let mut mix_left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut mix_right = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut voice_left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut voice_right = vec![0.0f32; MAX_BLOCK_SIZE];
    let handles = voices.clone();

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                ctx.process_messages(&mut msg_rx);

                let total_frames = data.len() / channels;
                let mut frames_written = 0;
                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let left = &mut mix_left[..frames];
                    let right = &mut mix_right[..frames];
                    left.fill(0.0);
                    right.fill(0.0);

                    for &voice in &handles {
                        let (vl, vr) = (&mut voice_left[..frames], &mut voice_right[..frames]);
                        if ctx.render(voice, vl, vr) == 0 {
                            continue;
                        }
                        for (out, &s) in left.iter_mut().zip(vl.iter()) {
                            *out += s * MIX_GAIN;
                        }
                        for (out, &s) in right.iter_mut().zip(vr.iter()) {
                            *out += s * MIX_GAIN;
                        }
                    }

                    // Left on even channels, right on odd ones
                    let out_off = frames_written * channels;
                    for i in 0..frames {
                        for ch in 0..channels {
                            let s = if ch % 2 == 0 { left[i] } else { right[i] };
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    for (&l, &r) in left.iter().zip(right.iter()) {
                        if let Err(PushError::Full(_)) = audio_tx.push(0.5 * (l + r)) {
                            break;
                        }
                    }

                    frames_written += frames;
                }

                let _ = snapshot_tx.push(VoiceSnapshot::capture(&ctx));
            },
            |err| log::error!("stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    let mut app = UiApp::new(
        msg_tx,
        audio_rx,
        snapshot_rx,
        voices,
        sample_rate,
        options.octave,
        options.velocity,
    );

    let mut terminal = ratatui::init();
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let result = app.run(&mut terminal);

    if enhanced {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    ratatui::restore();
    result
}
