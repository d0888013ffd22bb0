//! Wavetable and PCM sample oscillators.

/*
Oscillators
===========

Both oscillators read signed 8-bit data through a floating phase and divide by
128, so output sits in [-1.0, 1.0).

  phase       Read position, in samples of the source data.
  increment   How far the phase moves per output sample.

WAVETABLE
    The phase cycles over one built-in wave:

        increment = frequency / sample_rate · wave_len

    and wraps by subtracting the wave length, so it always stays inside
    [0, wave_len). Switching waves keeps the phase (folded into the new
    length) so the sequencer can change timbre mid-cycle.

PCM
    The phase walks through the owned sample buffer. The sample is assumed to
    be recorded so that note 48 (C-3) plays it at its native rate:

        increment = frequency / note_to_frequency(48)

    The increment does not depend on the output sample rate. With a loop
    (length > 1) the phase jumps back by the loop length whenever it reaches
    the loop end. Without one the oscillator reports `Finished` when the phase
    runs off the end of the data.
*/

use super::{pitch::note_to_frequency, waves};
use crate::instrument::{PcmSample, SoundSource};

/// MIDI note at which a PCM sample plays back unshifted.
pub const PCM_NATIVE_NOTE: f32 = 48.0;

/// Whether the oscillator can keep producing sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Playing,
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct WavetableOscillator {
    wave: u8,
    phase: f32,
    increment: f32,
}

impl WavetableOscillator {
    pub fn new(wave: u8) -> Self {
        Self {
            wave,
            ..Self::default()
        }
    }

    pub fn reset(&mut self, wave: u8) {
        *self = Self::new(wave);
    }

    pub fn set_wave(&mut self, wave: u8) {
        self.wave = wave;
        let len = self.wave_len();
        while self.phase >= len {
            self.phase -= len;
        }
    }

    pub fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        self.increment = frequency / sample_rate * self.wave_len();
    }

    #[inline]
    pub fn produce_sample(&self) -> f32 {
        match waves::waveform(usize::from(self.wave)) {
            Some(wave) => f32::from(wave[self.phase as usize % wave.len()]) / 128.0,
            None => 0.0,
        }
    }

    #[inline]
    pub fn advance_phase(&mut self) {
        let len = self.wave_len();
        self.phase += self.increment;
        while self.phase >= len {
            self.phase -= len;
        }
    }

    fn wave_len(&self) -> f32 {
        waves::wave_length(usize::from(self.wave)) as f32
    }

    pub fn wave(&self) -> u8 {
        self.wave
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn increment(&self) -> f32 {
        self.increment
    }
}

#[derive(Debug, Clone, Default)]
pub struct PcmOscillator {
    phase: f32,
    increment: f32,
}

impl PcmOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.increment = frequency / note_to_frequency(PCM_NATIVE_NOTE);
    }

    #[inline]
    pub fn produce_sample(&self, sample: &PcmSample) -> f32 {
        sample
            .data()
            .get(self.phase as usize)
            .map_or(0.0, |&s| f32::from(s) / 128.0)
    }

    #[inline]
    pub fn advance_phase(&mut self, sample: &PcmSample) -> Playback {
        self.phase += self.increment;

        if sample.is_looping() {
            let loop_end = sample.loop_end() as f32;
            let loop_length = sample.loop_length() as f32;
            while self.phase >= loop_end {
                self.phase -= loop_length;
            }
            Playback::Playing
        } else if self.phase >= sample.len() as f32 {
            Playback::Finished
        } else {
            Playback::Playing
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn increment(&self) -> f32 {
        self.increment
    }
}

/// The sound generator of a voice, matching the kind of its instrument.
#[derive(Debug, Clone)]
pub enum Oscillator {
    Wavetable(WavetableOscillator),
    Pcm(PcmOscillator),
}

impl Oscillator {
    /// A fresh oscillator of the right variant for `source`.
    pub fn for_source(source: &SoundSource) -> Self {
        match source {
            SoundSource::Wavetable(table) => {
                Oscillator::Wavetable(WavetableOscillator::new(table.start_wave()))
            }
            SoundSource::Pcm(_) => Oscillator::Pcm(PcmOscillator::new()),
        }
    }

    /// One sample at the current phase. Mismatched source variants are silent.
    #[inline]
    pub fn produce_sample(&self, source: &SoundSource) -> f32 {
        match (self, source) {
            (Oscillator::Wavetable(osc), SoundSource::Wavetable(_)) => osc.produce_sample(),
            (Oscillator::Pcm(osc), SoundSource::Pcm(sample)) => osc.produce_sample(sample),
            _ => 0.0,
        }
    }

    #[inline]
    pub fn advance_phase(&mut self, source: &SoundSource) -> Playback {
        match (self, source) {
            (Oscillator::Wavetable(osc), SoundSource::Wavetable(_)) => {
                osc.advance_phase();
                Playback::Playing
            }
            (Oscillator::Pcm(osc), SoundSource::Pcm(sample)) => osc.advance_phase(sample),
            _ => Playback::Finished,
        }
    }

    pub fn phase(&self) -> f32 {
        match self {
            Oscillator::Wavetable(osc) => osc.phase(),
            Oscillator::Pcm(osc) => osc.phase(),
        }
    }

    pub fn increment(&self) -> f32 {
        match self {
            Oscillator::Wavetable(osc) => osc.increment(),
            Oscillator::Pcm(osc) => osc.increment(),
        }
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Oscillator::Wavetable(WavetableOscillator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::{PcmSample, WavetableSource};
    use approx::assert_relative_eq;

    #[test]
    fn wavetable_phase_stays_inside_wave() {
        let mut osc = WavetableOscillator::new(46);
        osc.set_frequency(3_000.0, 44_100.0);
        for _ in 0..10_000 {
            osc.advance_phase();
            assert!(osc.phase() >= 0.0 && osc.phase() < 48.0);
        }
    }

    #[test]
    fn wavetable_increment_scales_with_wave_length() {
        let mut long = WavetableOscillator::new(0);
        let mut short = WavetableOscillator::new(32);
        long.set_frequency(441.0, 44_100.0);
        short.set_frequency(441.0, 44_100.0);
        assert_relative_eq!(long.increment(), 0.32, max_relative = 1e-6);
        assert_relative_eq!(short.increment(), 0.16, max_relative = 1e-6);
    }

    #[test]
    fn wavetable_reads_normalised_wave_data() {
        let osc = WavetableOscillator::new(40);
        assert_eq!(osc.produce_sample(), -1.0);
    }

    #[test]
    fn switching_to_shorter_wave_folds_phase() {
        let mut osc = WavetableOscillator::new(0);
        osc.set_frequency(1.0, 32.0);
        for _ in 0..20 {
            osc.advance_phase();
        }
        osc.set_wave(32);
        assert_eq!(osc.phase(), 4.0);
    }

    #[test]
    fn pcm_native_note_plays_one_sample_per_frame() {
        let mut osc = PcmOscillator::new();
        osc.set_frequency(note_to_frequency(PCM_NATIVE_NOTE));
        assert_relative_eq!(osc.increment(), 1.0, max_relative = 1e-6);

        osc.set_frequency(note_to_frequency(PCM_NATIVE_NOTE + 12.0));
        assert_relative_eq!(osc.increment(), 2.0, max_relative = 1e-5);
    }

    #[test]
    fn pcm_loop_keeps_phase_in_region() {
        let sample = PcmSample::new(vec![0; 100]).with_loop(10, 20);
        let mut osc = PcmOscillator::new();
        osc.set_frequency(note_to_frequency(PCM_NATIVE_NOTE + 7.0));

        let mut wrapped = false;
        for _ in 0..1_000 {
            assert_eq!(osc.advance_phase(&sample), Playback::Playing);
            assert!(osc.phase() < 30.0);
            if wrapped {
                assert!(osc.phase() >= 10.0);
            }
            wrapped |= osc.phase() >= 10.0;
        }
    }

    #[test]
    fn pcm_one_shot_finishes_at_end() {
        let sample = PcmSample::new(vec![64; 4]);
        let mut osc = PcmOscillator::new();
        osc.set_frequency(note_to_frequency(PCM_NATIVE_NOTE));

        assert_eq!(osc.produce_sample(&sample), 0.5);
        let states: Vec<Playback> = (0..4).map(|_| osc.advance_phase(&sample)).collect();
        assert_eq!(states[2], Playback::Playing);
        assert_eq!(states[3], Playback::Finished);
        assert_eq!(osc.produce_sample(&sample), 0.0);
    }

    #[test]
    fn oscillator_variant_follows_source() {
        let table = SoundSource::Wavetable(WavetableSource::new(16));
        let pcm = SoundSource::Pcm(PcmSample::new(vec![1]));
        assert!(matches!(Oscillator::for_source(&table), Oscillator::Wavetable(ref o) if o.wave() == 16));
        assert!(matches!(Oscillator::for_source(&pcm), Oscillator::Pcm(_)));
        assert_eq!(Oscillator::for_source(&pcm).produce_sample(&table), 0.0);
    }
}
