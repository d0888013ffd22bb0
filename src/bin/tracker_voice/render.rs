//! Offline note rendering to WAV.

use std::path::Path;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use tracker_voice::{synth::Context, MAX_BLOCK_SIZE};

pub struct RenderOptions {
    pub note: u8,
    pub velocity: u8,
    pub hold: f32,
    pub tail: f32,
    pub sample_rate: u32,
}

/// Plays one note through a fresh [`Context`] and returns the interleaved
/// stereo frames.
pub fn render_note(blob: &[u8], options: &RenderOptions) -> EyreResult<Vec<f32>> {
    let mut ctx = Context::new(options.sample_rate).wrap_err("invalid sample rate")?;
    let voice = ctx
        .create_voice()
        .ok_or_else(|| eyre!("no free voice in a new context"))?;
    ctx.load_instrument(voice, blob)
        .wrap_err("failed to load instrument")?;

    let seconds_to_frames = |secs: f32| (secs.max(0.0) * options.sample_rate as f32) as usize;
    let hold_frames = seconds_to_frames(options.hold);
    let total_frames = hold_frames + seconds_to_frames(options.tail);

    let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut right = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut out = Vec::with_capacity(total_frames * 2);

    ctx.note_on(voice, options.note, options.velocity);
    if hold_frames == 0 {
        ctx.note_off(voice);
    }
    let mut rendered = 0;
    while rendered < total_frames {
        // Split blocks so note-off lands on the exact frame.
        let limit = if rendered < hold_frames {
            hold_frames
        } else {
            total_frames
        };
        let frames = (limit - rendered).min(MAX_BLOCK_SIZE);
        ctx.render(voice, &mut left[..frames], &mut right[..frames]);
        for (&l, &r) in left[..frames].iter().zip(&right[..frames]) {
            out.push(l);
            out.push(r);
        }
        rendered += frames;
        if rendered == hold_frames {
            ctx.note_off(voice);
        }
    }
    Ok(out)
}

pub fn render_to_wav(blob: &[u8], options: &RenderOptions, path: &Path) -> EyreResult<()> {
    let frames = render_note(blob, options)?;

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: options.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;
    for &sample in &frames {
        writer
            .write_sample(sample)
            .wrap_err("failed to write sample")?;
    }
    writer.finalize().wrap_err("failed to finalize WAV file")?;

    log::info!(
        "wrote {} frames at {} Hz to {}",
        frames.len() / 2,
        options.sample_rate,
        path.display()
    );
    Ok(())
}
