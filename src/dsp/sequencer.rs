//! Wave sequencer: steps a wavetable instrument through its wave table.

use crate::instrument::{SequencerStep, WavetableSource};

/// Playback position within a [`WavetableSource`] sequence.
#[derive(Debug, Clone, Default)]
pub struct WaveSequencer {
    step: usize,
    counter: u8,
}

impl WaveSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_on(&mut self) {
        self.step = 0;
        self.counter = 0;
    }

    /// Advances one tick. Returns the newly entered step when the sequencer
    /// moved on, `None` otherwise. A one-step table re-enters its only step.
    pub fn tick(&mut self, source: &WavetableSource) -> Option<SequencerStep> {
        self.counter = self.counter.saturating_add(1);
        if self.counter < source.speed() {
            return None;
        }

        self.counter = 0;
        self.step = (self.step + 1) % source.step_count();
        Some(source.step(self.step))
    }

    /// Transpose of the current step.
    pub fn transpose(&self, source: &WavetableSource) -> i8 {
        source.step(self.step).transpose
    }

    pub fn step(&self) -> usize {
        self.step
    }
}
