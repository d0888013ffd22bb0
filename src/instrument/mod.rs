//! Instrument descriptions decoded from binary blobs.
//!
//! An [`InstrumentData`] is fully validated when it is built: wave indices are
//! in range, levels are clamped to [`MAX_VOLUME`], speeds are at least one and
//! PCM loop regions lie inside the sample buffer. The render path relies on
//! these invariants and never re-checks them.

mod encode;
mod parse;

pub use parse::{SampleDataPolicy, PCM_HEADER_LEN, SYNTH_BLOB_LEN};

use crate::{dsp::waves, MAX_VOLUME};

/// Number of steps in a wave sequencer table.
pub const SEQUENCER_STEPS: usize = 16;
/// Maximum number of entries in an arpeggio table.
pub const ARPEGGIO_STEPS: usize = 16;
/// Release length given to PCM instruments, whose blobs carry no envelope.
pub const PCM_RELEASE_TICKS: u8 = 8;

/// Which sound source an instrument drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstrumentKind {
    WavetableSynth = 0,
    PcmSample = 1,
}

impl InstrumentKind {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(InstrumentKind::WavetableSynth),
            1 => Some(InstrumentKind::PcmSample),
            _ => None,
        }
    }

    /// Minimum blob length for this kind.
    pub fn header_len(self) -> usize {
        match self {
            InstrumentKind::WavetableSynth => SYNTH_BLOB_LEN,
            InstrumentKind::PcmSample => PCM_HEADER_LEN,
        }
    }
}

/// Volume envelope shape, in ticks and 0..=64 levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvelopeParams {
    pub attack_length: u8,
    pub attack_level: u8,
    pub decay_length: u8,
    pub decay_level: u8,
    pub sustain_level: u8,
    /// Ticks to hold the sustain level before releasing on its own. 0 holds
    /// until note-off.
    pub sustain_ticks: u8,
    pub release_length: u8,
}

impl EnvelopeParams {
    /// Instant attack and decay to `level`, held until note-off.
    pub fn hold(level: u8) -> Self {
        let level = level.min(MAX_VOLUME);
        Self {
            attack_length: 0,
            attack_level: level,
            decay_length: 0,
            decay_level: level,
            sustain_level: level,
            sustain_ticks: 0,
            release_length: PCM_RELEASE_TICKS,
        }
    }
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            attack_length: 4,
            attack_level: 64,
            decay_length: 8,
            decay_level: 32,
            sustain_level: 32,
            sustain_ticks: 0,
            release_length: 8,
        }
    }
}

/// Pitch vibrato settings. Inactive unless both speed and depth are non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VibratoParams {
    /// Ticks to wait after note-on before the LFO starts.
    pub delay: u8,
    /// Ticks per half cycle.
    pub speed: u8,
    /// Peak offset in half-cent units.
    pub depth: u8,
}

impl VibratoParams {
    pub fn is_active(&self) -> bool {
        self.speed > 0 && self.depth > 0
    }
}

/// Semitone offsets stepped through once every `speed` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArpeggioTable {
    offsets: [i8; ARPEGGIO_STEPS],
    len: u8,
    speed: u8,
}

impl ArpeggioTable {
    /// Builds a table from up to 16 offsets. An empty slice yields a single
    /// zero offset; extra entries are dropped.
    pub fn new(offsets: &[i8]) -> Self {
        let mut table = [0; ARPEGGIO_STEPS];
        let len = offsets.len().clamp(1, ARPEGGIO_STEPS);
        for (slot, &offset) in table.iter_mut().zip(offsets) {
            *slot = offset;
        }
        Self {
            offsets: table,
            len: len as u8,
            speed: 1,
        }
    }

    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = speed.max(1);
        self
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.max(1);
    }

    pub fn len(&self) -> usize {
        usize::from(self.len.max(1))
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn speed(&self) -> u8 {
        self.speed.max(1)
    }

    /// Offset at `index`, wrapping around the table length.
    pub fn offset(&self, index: usize) -> i8 {
        self.offsets[index % self.len()]
    }

    pub fn offsets(&self) -> &[i8] {
        &self.offsets[..self.len()]
    }
}

impl Default for ArpeggioTable {
    fn default() -> Self {
        Self::new(&[0; ARPEGGIO_STEPS])
    }
}

/// Per-step action of the wave sequencer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepEffect {
    #[default]
    None,
    /// Restart the volume envelope from its attack phase.
    VolumeReset,
    /// Effect byte with no behaviour in this engine, kept for re-encoding.
    Other(u8),
}

impl StepEffect {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => StepEffect::None,
            1 => StepEffect::VolumeReset,
            other => StepEffect::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            StepEffect::None => 0,
            StepEffect::VolumeReset => 1,
            StepEffect::Other(byte) => byte,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequencerStep {
    pub wave: u8,
    pub transpose: i8,
    pub effect: StepEffect,
}

impl SequencerStep {
    pub fn new(wave: u8, transpose: i8) -> Self {
        Self {
            wave,
            transpose,
            effect: StepEffect::None,
        }
    }

    pub fn with_effect(mut self, effect: StepEffect) -> Self {
        self.effect = effect;
        self
    }
}

/// A wave index plus an optional table of waves to step through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WavetableSource {
    initial_wave: u8,
    steps: [SequencerStep; SEQUENCER_STEPS],
    step_count: u8,
    speed: u8,
}

impl WavetableSource {
    /// A single static wave: a one-step table holding `initial_wave`.
    pub fn new(initial_wave: u8) -> Self {
        let initial_wave = valid_wave(initial_wave);
        let mut steps = [SequencerStep::default(); SEQUENCER_STEPS];
        steps[0].wave = initial_wave;
        Self {
            initial_wave,
            steps,
            step_count: 1,
            speed: 1,
        }
    }

    /// Replaces the wave table. Step 0 always counts; the table then runs up
    /// to the last step with a non-zero wave. Steps past 16 are dropped and an
    /// empty slice keeps the current table.
    pub fn with_sequence(mut self, speed: u8, steps: &[SequencerStep]) -> Self {
        self.speed = speed.max(1);
        if steps.is_empty() {
            return self;
        }
        let mut table = [SequencerStep::default(); SEQUENCER_STEPS];
        for (slot, step) in table.iter_mut().zip(steps) {
            *slot = SequencerStep {
                wave: valid_wave(step.wave),
                ..*step
            };
        }
        self.steps = table;
        self.step_count = sequence_len(&table);
        self
    }

    /// Wave index stored in the blob header. Playback starts from step 0.
    pub fn initial_wave(&self) -> u8 {
        self.initial_wave
    }

    pub fn steps(&self) -> &[SequencerStep; SEQUENCER_STEPS] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> SequencerStep {
        self.steps[index % SEQUENCER_STEPS]
    }

    /// Number of steps the sequencer cycles through, 1..=16.
    pub fn step_count(&self) -> usize {
        usize::from(self.step_count.max(1))
    }

    /// Ticks per sequencer step.
    pub fn speed(&self) -> u8 {
        self.speed.max(1)
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.max(1);
    }

    /// Wave selected at note-on.
    pub fn start_wave(&self) -> u8 {
        self.steps[0].wave
    }
}

fn valid_wave(index: u8) -> u8 {
    if waves::is_valid_wave(index) {
        index
    } else {
        0
    }
}

fn sequence_len(steps: &[SequencerStep; SEQUENCER_STEPS]) -> u8 {
    steps
        .iter()
        .rposition(|step| step.wave != 0)
        .map_or(1, |last| last as u8 + 1)
}

/// An owned signed 8-bit sample with an optional loop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcmSample {
    volume: u8,
    finetune: i8,
    transpose: i8,
    data: Vec<i8>,
    loop_start: u32,
    loop_length: u32,
}

impl PcmSample {
    /// A one-shot sample at full volume.
    pub fn new(data: Vec<i8>) -> Self {
        Self {
            volume: MAX_VOLUME,
            finetune: 0,
            transpose: 0,
            data,
            loop_start: 0,
            loop_length: 0,
        }
    }

    pub fn with_volume(mut self, volume: u8) -> Self {
        self.volume = volume.min(MAX_VOLUME);
        self
    }

    /// Finetune in 1/8 semitone steps.
    pub fn with_finetune(mut self, finetune: i8) -> Self {
        self.finetune = finetune;
        self
    }

    pub fn with_transpose(mut self, transpose: i8) -> Self {
        self.transpose = transpose;
        self
    }

    /// Sets the loop region, moving it inside the buffer when it does not fit:
    /// a start past the end becomes 0 and an overlong loop is cut at the end.
    pub fn with_loop(mut self, start: u32, length: u32) -> Self {
        let len = self.data.len() as u64;
        let mut loop_start = u64::from(start);
        let mut loop_length = u64::from(length);
        if loop_start >= len {
            loop_start = 0;
        }
        if loop_start + loop_length > len {
            loop_length = len - loop_start;
        }
        if (loop_start, loop_length) != (u64::from(start), u64::from(length)) {
            log::debug!(
                "loop {start}+{length} truncated to {loop_start}+{loop_length} for {len} byte sample"
            );
        }
        self.loop_start = loop_start as u32;
        self.loop_length = loop_length as u32;
        self
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn finetune(&self) -> i8 {
        self.finetune
    }

    pub fn transpose(&self) -> i8 {
        self.transpose
    }

    pub fn data(&self) -> &[i8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn loop_start(&self) -> u32 {
        self.loop_start
    }

    pub fn loop_length(&self) -> u32 {
        self.loop_length
    }

    /// Loops shorter than two samples play as one-shots.
    pub fn is_looping(&self) -> bool {
        self.loop_length > 1
    }

    pub fn loop_end(&self) -> u32 {
        self.loop_start + self.loop_length
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundSource {
    Wavetable(WavetableSource),
    Pcm(PcmSample),
}

/// A complete, validated instrument owned by one voice.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstrumentData {
    pub envelope: EnvelopeParams,
    pub vibrato: VibratoParams,
    pub arpeggio: ArpeggioTable,
    pub source: SoundSource,
}

impl InstrumentData {
    /// Wavetable instrument with the default envelope and no modulation.
    pub fn wavetable(source: WavetableSource) -> Self {
        Self {
            envelope: EnvelopeParams::default(),
            vibrato: VibratoParams::default(),
            arpeggio: ArpeggioTable::default(),
            source: SoundSource::Wavetable(source),
        }
    }

    /// PCM instrument whose envelope holds the sample volume until note-off.
    pub fn pcm(sample: PcmSample) -> Self {
        Self {
            envelope: EnvelopeParams::hold(sample.volume()),
            vibrato: VibratoParams::default(),
            arpeggio: ArpeggioTable::default(),
            source: SoundSource::Pcm(sample),
        }
    }

    pub fn with_envelope(mut self, envelope: EnvelopeParams) -> Self {
        self.envelope = EnvelopeParams {
            attack_level: envelope.attack_level.min(MAX_VOLUME),
            decay_level: envelope.decay_level.min(MAX_VOLUME),
            sustain_level: envelope.sustain_level.min(MAX_VOLUME),
            ..envelope
        };
        self
    }

    pub fn with_vibrato(mut self, vibrato: VibratoParams) -> Self {
        self.vibrato = vibrato;
        self
    }

    pub fn with_arpeggio(mut self, arpeggio: ArpeggioTable) -> Self {
        self.arpeggio = arpeggio;
        self
    }

    pub fn kind(&self) -> InstrumentKind {
        match self.source {
            SoundSource::Wavetable(_) => InstrumentKind::WavetableSynth,
            SoundSource::Pcm(_) => InstrumentKind::PcmSample,
        }
    }
}
