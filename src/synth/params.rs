//! Live instrument parameters addressed by numeric id.
//!
//! Values cross the API normalised to 0..1 and are mapped onto the integer
//! ranges the instrument stores. Edits apply from the next tick.

use super::voice::Voice;
use crate::{error::UnknownParam, instrument::SoundSource, MAX_VOLUME};

const MAX_LENGTH: u8 = u8::MAX;
const MAX_VIBRATO: u8 = 63;
const MAX_SPEED: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum ParamId {
    /// Voice output level, 0..=64.
    Volume = 0,
    /// Attack length in ticks, 0..=255.
    AttackSpeed = 1,
    /// Decay length in ticks, 0..=255.
    DecaySpeed = 2,
    /// Sustain level, 0..=64.
    SustainVolume = 3,
    /// Release length in ticks, 0..=255.
    ReleaseSpeed = 4,
    VibratoSpeed = 5,
    VibratoDepth = 6,
    /// Vibrato start delay in ticks, 0..=255.
    VibratoDelay = 7,
    /// Ticks per arpeggio step, 1..=15.
    ArpeggioSpeed = 8,
    /// Ticks of sustain before an automatic release, 0 holds.
    SustainTicks = 16,
    /// Ticks per wave sequencer step, 1..=15. Wavetable instruments only.
    SequencerSpeed = 17,
}

impl ParamId {
    pub const ALL: [ParamId; 11] = [
        ParamId::Volume,
        ParamId::AttackSpeed,
        ParamId::DecaySpeed,
        ParamId::SustainVolume,
        ParamId::ReleaseSpeed,
        ParamId::VibratoSpeed,
        ParamId::VibratoDepth,
        ParamId::VibratoDelay,
        ParamId::ArpeggioSpeed,
        ParamId::SustainTicks,
        ParamId::SequencerSpeed,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamId::Volume => "volume",
            ParamId::AttackSpeed => "attack",
            ParamId::DecaySpeed => "decay",
            ParamId::SustainVolume => "sustain",
            ParamId::ReleaseSpeed => "release",
            ParamId::VibratoSpeed => "vibrato speed",
            ParamId::VibratoDepth => "vibrato depth",
            ParamId::VibratoDelay => "vibrato delay",
            ParamId::ArpeggioSpeed => "arpeggio speed",
            ParamId::SustainTicks => "sustain ticks",
            ParamId::SequencerSpeed => "sequencer speed",
        }
    }
}

impl TryFrom<u32> for ParamId {
    type Error = UnknownParam;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        ParamId::ALL
            .into_iter()
            .find(|param| param.id() == id)
            .ok_or(UnknownParam(id))
    }
}

fn denormalise(value: f32, max: u8) -> u8 {
    (value.clamp(0.0, 1.0) * f32::from(max)).round() as u8
}

fn normalise(value: u8, max: u8) -> f32 {
    f32::from(value) / f32::from(max)
}

impl Voice {
    /// Applies a normalised value. Instrument parameters are ignored while no
    /// instrument is loaded.
    pub fn set_param(&mut self, param: ParamId, value: f32) {
        if param == ParamId::Volume {
            self.set_master_volume(denormalise(value, MAX_VOLUME));
            return;
        }
        let Some(instrument) = self.instrument_mut() else {
            return;
        };

        let envelope = &mut instrument.envelope;
        match param {
            ParamId::Volume => {}
            ParamId::AttackSpeed => envelope.attack_length = denormalise(value, MAX_LENGTH),
            ParamId::DecaySpeed => envelope.decay_length = denormalise(value, MAX_LENGTH),
            ParamId::SustainVolume => envelope.sustain_level = denormalise(value, MAX_VOLUME),
            ParamId::ReleaseSpeed => envelope.release_length = denormalise(value, MAX_LENGTH),
            ParamId::SustainTicks => envelope.sustain_ticks = denormalise(value, MAX_LENGTH),
            ParamId::VibratoSpeed => instrument.vibrato.speed = denormalise(value, MAX_VIBRATO),
            ParamId::VibratoDepth => instrument.vibrato.depth = denormalise(value, MAX_VIBRATO),
            ParamId::VibratoDelay => instrument.vibrato.delay = denormalise(value, MAX_LENGTH),
            ParamId::ArpeggioSpeed => instrument
                .arpeggio
                .set_speed(denormalise(value, MAX_SPEED)),
            ParamId::SequencerSpeed => {
                if let SoundSource::Wavetable(source) = &mut instrument.source {
                    source.set_speed(denormalise(value, MAX_SPEED));
                }
            }
        }
    }

    /// Current normalised value, `None` when the parameter does not apply.
    pub fn param(&self, param: ParamId) -> Option<f32> {
        if param == ParamId::Volume {
            return Some(normalise(self.master_volume(), MAX_VOLUME));
        }
        let instrument = self.instrument()?;

        let envelope = &instrument.envelope;
        let value = match param {
            ParamId::Volume => normalise(self.master_volume(), MAX_VOLUME),
            ParamId::AttackSpeed => normalise(envelope.attack_length, MAX_LENGTH),
            ParamId::DecaySpeed => normalise(envelope.decay_length, MAX_LENGTH),
            ParamId::SustainVolume => normalise(envelope.sustain_level, MAX_VOLUME),
            ParamId::ReleaseSpeed => normalise(envelope.release_length, MAX_LENGTH),
            ParamId::SustainTicks => normalise(envelope.sustain_ticks, MAX_LENGTH),
            ParamId::VibratoSpeed => normalise(instrument.vibrato.speed, MAX_VIBRATO),
            ParamId::VibratoDepth => normalise(instrument.vibrato.depth, MAX_VIBRATO),
            ParamId::VibratoDelay => normalise(instrument.vibrato.delay, MAX_LENGTH),
            ParamId::ArpeggioSpeed => normalise(instrument.arpeggio.speed(), MAX_SPEED),
            ParamId::SequencerSpeed => match &instrument.source {
                SoundSource::Wavetable(source) => normalise(source.speed(), MAX_SPEED),
                SoundSource::Pcm(_) => return None,
            },
        };
        Some(value)
    }
}
