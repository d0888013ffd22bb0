use crate::{
    dsp::{
        pitch::{cents_to_ratio, note_to_frequency},
        sequencer::WaveSequencer,
        EnvelopeGenerator, EnvelopeState, ModulationUnit, Oscillator, PitchOffset, Playback,
    },
    instrument::{InstrumentData, SoundSource, StepEffect},
    MAX_NOTE, MAX_VELOCITY, MAX_VOLUME, TICK_RATE_HZ,
};

/*
Dual-Clock Rendering
====================

A voice runs on two clocks at once:

  sample clock   One step per output frame (44 100 or 48 000 per second).
                 Moves the oscillator phase.

  tick clock     Fixed 50 steps per second. Moves the envelope, vibrato,
                 arpeggio and wave sequencer, then recomputes pitch.

The tick clock is derived from the sample clock with one accumulator:

    accumulator += 1                      every frame
    if accumulator >= sample_rate / 50:
        accumulator -= sample_rate / 50
        tick()

Counting frames instead of seconds keeps the boundary exact whenever
sample_rate / 50 is a whole number, so 44.1 kHz ticks land on every 882nd
frame forever instead of drifting with float error. Fractional boundaries
carry the remainder forward: at 11 025 Hz ticks alternate between 220 and
221 frames apart.

Per frame, in order:

    1. advance the accumulator, maybe tick
    2. if the envelope went Off on that tick: silence the rest, stop
    3. produce one oscillator sample and scale it by
           envelope/64 · velocity/127 · master/64
    4. advance the oscillator phase; a finished one-shot sample stops the
       voice and silences the rest of the buffer
*/

/// A single tracker voice: one instrument, one note at a time.
#[derive(Debug, Clone)]
pub struct Voice {
    instrument: Option<InstrumentData>,
    envelope: EnvelopeGenerator,
    modulation: ModulationUnit,
    sequencer: WaveSequencer,
    oscillator: Oscillator,
    sample_rate: f32,
    samples_per_tick: f32,
    tick_accumulator: f32,
    ticks: u64,
    note: u8,
    velocity: u8,
    master_volume: u8,
    active: bool,
}

impl Voice {
    /// [`Context`](super::Context) only builds voices at 50 Hz or more. Lower
    /// rates run one tick per frame.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            instrument: None,
            envelope: EnvelopeGenerator::new(),
            modulation: ModulationUnit::new(),
            sequencer: WaveSequencer::new(),
            oscillator: Oscillator::default(),
            sample_rate,
            samples_per_tick: (sample_rate / TICK_RATE_HZ).max(1.0),
            tick_accumulator: 0.0,
            ticks: 0,
            note: 0,
            velocity: 0,
            master_volume: MAX_VOLUME,
            active: false,
        }
    }

    /// Replaces the instrument. A sounding note is cut, since its phase may
    /// not be valid for the new data.
    pub fn load(&mut self, instrument: InstrumentData) {
        self.stop();
        self.oscillator = Oscillator::for_source(&instrument.source);
        self.instrument = Some(instrument);
    }

    /// Starts a note. Velocity 0 releases instead, like MIDI running status.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        if velocity == 0 {
            self.note_off();
            return;
        }
        let Some(instrument) = &self.instrument else {
            log::trace!("note-on ignored, voice has no instrument");
            return;
        };

        self.note = note.min(MAX_NOTE);
        self.velocity = velocity.min(MAX_VELOCITY);
        self.oscillator = Oscillator::for_source(&instrument.source);
        self.tick_accumulator = 0.0;
        self.ticks = 0;
        self.sequencer.note_on();
        self.modulation
            .note_on(&instrument.vibrato, &instrument.arpeggio);
        self.envelope.note_on(&instrument.envelope);
        self.active = true;
        self.update_increment();
    }

    /// Moves the envelope into release. The voice keeps sounding until the
    /// release ends.
    pub fn note_off(&mut self) {
        self.envelope.note_off();
    }

    /// Silences immediately, keeping the instrument.
    pub fn stop(&mut self) {
        self.envelope.force_off();
        self.active = false;
    }

    /// Drops the instrument and clears all playback state.
    pub fn reset(&mut self) {
        *self = Self::new(self.sample_rate);
    }

    /// Renders `min(left.len(), right.len())` frames of the same signal into
    /// both channels and returns how many of them the voice produced before
    /// going silent. Frames after that point are zeroed.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) -> usize {
        let frames = left.len().min(right.len());
        let (left, right) = (&mut left[..frames], &mut right[..frames]);

        if !self.active {
            left.fill(0.0);
            right.fill(0.0);
            return 0;
        }

        for i in 0..frames {
            self.tick_accumulator += 1.0;
            while self.tick_accumulator >= self.samples_per_tick {
                self.tick_accumulator -= self.samples_per_tick;
                self.tick();
                if !self.active {
                    left[i..].fill(0.0);
                    right[i..].fill(0.0);
                    return i;
                }
            }

            let Some(instrument) = &self.instrument else {
                left[i..].fill(0.0);
                right[i..].fill(0.0);
                return i;
            };

            let out = self.oscillator.produce_sample(&instrument.source) * self.gain();
            left[i] = out;
            right[i] = out;

            if self.oscillator.advance_phase(&instrument.source) == Playback::Finished {
                self.stop();
                left[i + 1..].fill(0.0);
                right[i + 1..].fill(0.0);
                return i + 1;
            }
        }

        frames
    }

    /// Runs one tick of the control clock: envelope, vibrato, arpeggio, wave
    /// sequencer, then pitch.
    pub fn tick(&mut self) {
        let Some(instrument) = &self.instrument else {
            return;
        };
        if !self.active {
            return;
        }
        self.ticks += 1;

        if self.envelope.tick(&instrument.envelope) == EnvelopeState::Off {
            self.active = false;
            return;
        }

        self.modulation
            .tick(&instrument.vibrato, &instrument.arpeggio);

        if let (SoundSource::Wavetable(source), Oscillator::Wavetable(osc)) =
            (&instrument.source, &mut self.oscillator)
        {
            if let Some(step) = self.sequencer.tick(source) {
                osc.set_wave(step.wave);
                if step.effect == StepEffect::VolumeReset {
                    self.envelope.retrigger(&instrument.envelope);
                }
            }
        }

        self.update_increment();
    }

    fn update_increment(&mut self) {
        let Some(instrument) = &self.instrument else {
            return;
        };
        let PitchOffset { semitones, cents } = self.modulation.offset();

        match (&mut self.oscillator, &instrument.source) {
            (Oscillator::Wavetable(osc), SoundSource::Wavetable(source)) => {
                let note = f32::from(self.note)
                    + f32::from(semitones)
                    + f32::from(self.sequencer.transpose(source));
                osc.set_frequency(
                    note_to_frequency(note) * cents_to_ratio(cents),
                    self.sample_rate,
                );
            }
            (Oscillator::Pcm(osc), SoundSource::Pcm(sample)) => {
                let played = (i16::from(self.note) + i16::from(sample.transpose()))
                    .clamp(0, i16::from(MAX_NOTE));
                let note = f32::from(played) + f32::from(semitones);
                let finetune = f32::from(sample.finetune()) * 100.0 / 8.0;
                osc.set_frequency(note_to_frequency(note) * cents_to_ratio(finetune + cents));
            }
            _ => {}
        }
    }

    #[inline]
    fn gain(&self) -> f32 {
        let max = f32::from(MAX_VOLUME);
        (self.envelope.volume() / max)
            * (f32::from(self.velocity) / f32::from(MAX_VELOCITY))
            * (f32::from(self.master_volume) / max)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_instrument(&self) -> bool {
        self.instrument.is_some()
    }

    pub fn instrument(&self) -> Option<&InstrumentData> {
        self.instrument.as_ref()
    }

    pub(crate) fn instrument_mut(&mut self) -> Option<&mut InstrumentData> {
        self.instrument.as_mut()
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    /// Envelope volume, 0.0 to 64.0.
    pub fn envelope_volume(&self) -> f32 {
        self.envelope.volume()
    }

    pub fn pitch_offset(&self) -> PitchOffset {
        self.modulation.offset()
    }

    pub fn arpeggio_index(&self) -> usize {
        self.modulation.arpeggio_index()
    }

    pub fn sequencer_step(&self) -> usize {
        self.sequencer.step()
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    /// Ticks run since the last note-on.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn master_volume(&self) -> u8 {
        self.master_volume
    }

    pub fn set_master_volume(&mut self, volume: u8) {
        self.master_volume = volume.min(MAX_VOLUME);
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
