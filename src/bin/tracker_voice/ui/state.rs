//! Snapshot types sent from the audio thread to the UI
//!
//! Everything here is `Copy` so the audio callback can publish it without
//! allocating.

use tracker_voice::{dsp::EnvelopeState, synth::Context, MAX_VOICES};

/// Per-voice status captured after a render block.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VoiceStatus {
    pub active: bool,
    pub state: EnvelopeState,
    /// Envelope level, 0..=64
    pub level: f32,
    pub note: u8,
    /// Arpeggio table position
    pub arpeggio_index: usize,
    /// Wave sequencer position (always 0 for samples)
    pub sequencer_step: usize,
}

/// State of every voice in the context at one instant.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoiceSnapshot {
    pub voices: [VoiceStatus; MAX_VOICES],
    /// Control ticks elapsed on the busiest voice
    pub ticks: u64,
}

impl VoiceSnapshot {
    pub fn capture(ctx: &Context) -> Self {
        let mut snapshot = Self::default();
        for (handle, voice) in ctx.voices().iter() {
            snapshot.voices[handle.index()] = VoiceStatus {
                active: voice.is_active(),
                state: voice.envelope_state(),
                level: voice.envelope_volume(),
                note: voice.note(),
                arpeggio_index: voice.arpeggio_index(),
                sequencer_step: voice.sequencer_step(),
            };
            snapshot.ticks = snapshot.ticks.max(voice.ticks());
        }
        snapshot
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.active).count()
    }
}
