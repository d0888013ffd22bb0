//! Realtime voice engine for Amiga tracker instruments.
//!
//! A [`Context`](synth::Context) owns a fixed pool of voices. Each voice plays
//! one instrument, either a wavetable synth stepping through the built-in wave
//! set or a looped/one-shot 8-bit PCM sample, driven by a 50 Hz tick clock
//! derived from the audio sample clock.
//!
//! ```
//! use tracker_voice::{instrument::{InstrumentData, WavetableSource}, synth::Context};
//!
//! let mut ctx = Context::new(44_100).unwrap();
//! let voice = ctx.create_voice().unwrap();
//! let blob = InstrumentData::wavetable(WavetableSource::new(40)).to_bytes();
//! ctx.load_instrument(voice, &blob).unwrap();
//! ctx.note_on(voice, 60, 100);
//!
//! let (mut left, mut right) = ([0.0f32; 512], [0.0f32; 512]);
//! ctx.render(voice, &mut left, &mut right);
//! ```

pub mod dsp;
pub mod error;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod instrument;
pub mod synth; // Voice management and polyphony

pub use error::{ContextError, LoadError, ParseError};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Control clock rate in ticks per second.
pub const TICK_RATE_HZ: f32 = 50.0;
/// Number of voices in every context.
pub const MAX_VOICES: usize = 8;
/// Full envelope and instrument volume.
pub const MAX_VOLUME: u8 = 64;
pub const MAX_NOTE: u8 = 127;
pub const MAX_VELOCITY: u8 = 127;
/// Largest PCM sample accepted by the parser, in bytes.
pub const MAX_PCM_LENGTH: usize = 1024 * 1024;
