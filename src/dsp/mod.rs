//! Tick-rate modulators and sample-rate oscillators.
//!
//! Everything here is allocation-free and owns only its own runtime state.
//! Instrument parameters are passed in by reference on every call so that a
//! voice can edit them live between ticks.

/// Arpeggio table stepping.
pub mod arpeggio;
/// Tick-driven ADSR volume envelope.
pub mod envelope;
/// Vibrato and arpeggio combined into one pitch offset.
pub mod modulation;
/// Wavetable and PCM oscillators.
pub mod oscillator;
/// Note to frequency helpers.
pub mod pitch;
/// Wave table stepping for wavetable instruments.
pub mod sequencer;
/// Tick-rate sine vibrato.
pub mod vibrato;
/// The built-in wave set.
pub mod waves;

pub use envelope::{EnvelopeGenerator, EnvelopeState};
pub use modulation::{ModulationUnit, PitchOffset};
pub use oscillator::{Oscillator, Playback};
