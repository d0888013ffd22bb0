use super::parse::*;
use super::{InstrumentData, PcmSample, SoundSource, WavetableSource, ARPEGGIO_STEPS};

impl InstrumentData {
    /// Encodes the instrument in the blob layout read by [`InstrumentData::parse`].
    ///
    /// Only fields the layout stores are written: PCM blobs carry no envelope
    /// or modulation, synth blobs no sustain duration or arpeggio speed.
    /// Arpeggio tables shorter than 16 entries are padded with zeros.
    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.source {
            SoundSource::Wavetable(source) => self.encode_wavetable(source),
            SoundSource::Pcm(sample) => encode_pcm(sample),
        }
    }

    fn encode_wavetable(&self, source: &WavetableSource) -> Vec<u8> {
        let mut blob = vec![0u8; SYNTH_BLOB_LEN];
        blob[SYNTH_INITIAL_WAVE] = source.initial_wave();
        blob[SYNTH_SPEED] = source.speed();

        for (raw, step) in blob[SYNTH_STEPS..].chunks_exact_mut(3).zip(source.steps()) {
            raw[0] = step.wave;
            raw[1] = step.transpose as u8;
            raw[2] = step.effect.to_byte();
        }

        let envelope = &self.envelope;
        blob[SYNTH_ATTACK_LENGTH] = envelope.attack_length;
        blob[SYNTH_ATTACK_LEVEL] = envelope.attack_level;
        blob[SYNTH_DECAY_LENGTH] = envelope.decay_length;
        blob[SYNTH_DECAY_LEVEL] = envelope.decay_level;
        blob[SYNTH_SUSTAIN_LEVEL] = envelope.sustain_level;
        blob[SYNTH_RELEASE_LENGTH] = envelope.release_length;

        blob[SYNTH_VIBRATO_DELAY] = self.vibrato.delay;
        blob[SYNTH_VIBRATO_SPEED] = self.vibrato.speed;
        blob[SYNTH_VIBRATO_DEPTH] = self.vibrato.depth;

        for (raw, &offset) in blob[SYNTH_ARPEGGIO..SYNTH_ARPEGGIO + ARPEGGIO_STEPS]
            .iter_mut()
            .zip(self.arpeggio.offsets())
        {
            *raw = offset as u8;
        }

        blob
    }
}

fn encode_pcm(sample: &PcmSample) -> Vec<u8> {
    let mut blob = vec![0u8; PCM_HEADER_LEN];
    blob[0] = 1;
    blob[PCM_VOLUME] = sample.volume();
    blob[PCM_FINETUNE] = sample.finetune() as u8;
    blob[PCM_TRANSPOSE] = sample.transpose() as u8;
    write_u32_le(&mut blob, PCM_LENGTH, sample.len() as u32);
    write_u32_le(&mut blob, PCM_LOOP_START, sample.loop_start());
    write_u32_le(&mut blob, PCM_LOOP_LENGTH, sample.loop_length());

    blob.reserve(sample.len());
    blob.extend(sample.data().iter().map(|&s| s as u8));
    blob
}

fn write_u32_le(blob: &mut [u8], offset: usize, value: u32) {
    blob[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
