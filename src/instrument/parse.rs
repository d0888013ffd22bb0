use log::{debug, warn};

use super::{
    ArpeggioTable, EnvelopeParams, InstrumentData, InstrumentKind, PcmSample, SequencerStep,
    StepEffect, VibratoParams, WavetableSource, ARPEGGIO_STEPS, SEQUENCER_STEPS,
};
use crate::{dsp::waves, error::ParseError, MAX_PCM_LENGTH, MAX_VOLUME};

/// Size of a wavetable synth blob.
pub const SYNTH_BLOB_LEN: usize = 76;
/// Size of the header that precedes PCM sample data.
pub const PCM_HEADER_LEN: usize = 16;

// Wavetable synth layout.
pub(super) const SYNTH_INITIAL_WAVE: usize = 1;
pub(super) const SYNTH_SPEED: usize = 2;
pub(super) const SYNTH_STEPS: usize = 3;
pub(super) const SYNTH_ATTACK_LENGTH: usize = 51;
pub(super) const SYNTH_ATTACK_LEVEL: usize = 52;
pub(super) const SYNTH_DECAY_LENGTH: usize = 53;
pub(super) const SYNTH_DECAY_LEVEL: usize = 54;
pub(super) const SYNTH_SUSTAIN_LEVEL: usize = 55;
pub(super) const SYNTH_RELEASE_LENGTH: usize = 56;
pub(super) const SYNTH_VIBRATO_DELAY: usize = 57;
pub(super) const SYNTH_VIBRATO_SPEED: usize = 58;
pub(super) const SYNTH_VIBRATO_DEPTH: usize = 59;
pub(super) const SYNTH_ARPEGGIO: usize = 60;

// PCM layout.
pub(super) const PCM_VOLUME: usize = 1;
pub(super) const PCM_FINETUNE: usize = 2;
pub(super) const PCM_TRANSPOSE: usize = 3;
pub(super) const PCM_LENGTH: usize = 4;
pub(super) const PCM_LOOP_START: usize = 8;
pub(super) const PCM_LOOP_LENGTH: usize = 12;

/// What to do when a PCM blob holds fewer sample bytes than its header
/// declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleDataPolicy {
    /// Reject the blob with [`ParseError::TooShortForSampleData`].
    #[default]
    Strict,
    /// Keep the declared length and pad the missing tail with silence.
    ZeroFill,
}

impl InstrumentData {
    /// Decodes an instrument blob, rejecting truncated sample data.
    pub fn parse(blob: &[u8]) -> Result<Self, ParseError> {
        Self::parse_with(blob, SampleDataPolicy::Strict)
    }

    pub fn parse_with(blob: &[u8], policy: SampleDataPolicy) -> Result<Self, ParseError> {
        let &kind_byte = blob.first().ok_or(ParseError::Empty)?;
        let kind = InstrumentKind::from_byte(kind_byte).ok_or(ParseError::UnknownKind(kind_byte))?;

        if blob.len() < kind.header_len() {
            return Err(ParseError::TooShortForHeader {
                kind,
                expected: kind.header_len(),
                actual: blob.len(),
            });
        }

        let instrument = match kind {
            InstrumentKind::WavetableSynth => parse_wavetable(blob),
            InstrumentKind::PcmSample => parse_pcm(blob, policy)?,
        };
        debug!("parsed {kind:?} instrument from {} byte blob", blob.len());
        Ok(instrument)
    }
}

fn parse_wavetable(blob: &[u8]) -> InstrumentData {
    let initial_wave = wave_index(blob[SYNTH_INITIAL_WAVE], "initial wave");
    let speed = blob[SYNTH_SPEED].max(1);

    let mut steps = [SequencerStep::default(); SEQUENCER_STEPS];
    for (step, raw) in steps
        .iter_mut()
        .zip(blob[SYNTH_STEPS..SYNTH_STEPS + SEQUENCER_STEPS * 3].chunks_exact(3))
    {
        *step = SequencerStep {
            wave: wave_index(raw[0], "sequencer step"),
            transpose: raw[1] as i8,
            effect: StepEffect::from_byte(raw[2]),
        };
    }

    let envelope = EnvelopeParams {
        attack_length: blob[SYNTH_ATTACK_LENGTH],
        attack_level: level(blob[SYNTH_ATTACK_LEVEL], "attack level"),
        decay_length: blob[SYNTH_DECAY_LENGTH],
        decay_level: level(blob[SYNTH_DECAY_LEVEL], "decay level"),
        sustain_level: level(blob[SYNTH_SUSTAIN_LEVEL], "sustain level"),
        sustain_ticks: 0,
        release_length: blob[SYNTH_RELEASE_LENGTH],
    };

    let vibrato = VibratoParams {
        delay: blob[SYNTH_VIBRATO_DELAY],
        speed: blob[SYNTH_VIBRATO_SPEED],
        depth: blob[SYNTH_VIBRATO_DEPTH],
    };

    let mut offsets = [0i8; ARPEGGIO_STEPS];
    for (offset, &raw) in offsets
        .iter_mut()
        .zip(&blob[SYNTH_ARPEGGIO..SYNTH_ARPEGGIO + ARPEGGIO_STEPS])
    {
        *offset = raw as i8;
    }

    InstrumentData::wavetable(WavetableSource::new(initial_wave).with_sequence(speed, &steps))
        .with_envelope(envelope)
        .with_vibrato(vibrato)
        .with_arpeggio(ArpeggioTable::new(&offsets))
}

fn parse_pcm(blob: &[u8], policy: SampleDataPolicy) -> Result<InstrumentData, ParseError> {
    let declared = read_u32_le(blob, PCM_LENGTH) as usize;
    if declared > MAX_PCM_LENGTH {
        return Err(ParseError::SampleTooLarge {
            declared,
            limit: MAX_PCM_LENGTH,
        });
    }

    let payload = &blob[PCM_HEADER_LEN..];
    if payload.len() < declared && policy == SampleDataPolicy::Strict {
        return Err(ParseError::TooShortForSampleData {
            declared,
            available: payload.len(),
        });
    }

    let mut data = Vec::new();
    data.try_reserve_exact(declared)
        .map_err(|_| ParseError::AllocationFailed {
            requested: declared,
        })?;

    let available = payload.len().min(declared);
    data.extend(payload[..available].iter().map(|&byte| byte as i8));
    if available < declared {
        warn!(
            "sample declares {declared} bytes, {available} present; padding with silence"
        );
        data.resize(declared, 0);
    }
    if payload.len() > declared {
        debug!("ignoring {} bytes past the sample data", payload.len() - declared);
    }

    let sample = PcmSample::new(data)
        .with_volume(level(blob[PCM_VOLUME], "sample volume"))
        .with_finetune(blob[PCM_FINETUNE] as i8)
        .with_transpose(blob[PCM_TRANSPOSE] as i8)
        .with_loop(
            read_u32_le(blob, PCM_LOOP_START),
            read_u32_le(blob, PCM_LOOP_LENGTH),
        );

    Ok(InstrumentData::pcm(sample))
}

fn read_u32_le(blob: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        blob[offset],
        blob[offset + 1],
        blob[offset + 2],
        blob[offset + 3],
    ])
}

fn wave_index(raw: u8, field: &str) -> u8 {
    if waves::is_valid_wave(raw) {
        raw
    } else {
        warn!("{field}: wave {raw} out of range, using wave 0");
        0
    }
}

fn level(raw: u8, field: &str) -> u8 {
    if raw > MAX_VOLUME {
        warn!("{field}: {raw} clamped to {MAX_VOLUME}");
        MAX_VOLUME
    } else {
        raw
    }
}
