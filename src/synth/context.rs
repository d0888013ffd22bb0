use log::{debug, trace};

use super::{
    message::{MessageReceiver, VoiceMessage},
    params::ParamId,
    pool::{VoiceHandle, VoicePool},
    voice::Voice,
};
use crate::{
    error::{ContextError, LoadError},
    instrument::{InstrumentData, SampleDataPolicy},
    TICK_RATE_HZ,
};

/// Owns the sample rate and a fixed pool of voices. Independent contexts
/// share nothing but the immutable wave tables.
#[derive(Debug, Clone)]
pub struct Context {
    sample_rate: u32,
    voices: VoicePool,
}

impl Context {
    /// Rates below the 50 Hz tick rate are rejected: the control clock needs
    /// at least one audio frame per tick.
    pub fn new(sample_rate: u32) -> Result<Self, ContextError> {
        if (sample_rate as f32) < TICK_RATE_HZ {
            return Err(ContextError::InvalidSampleRate(sample_rate));
        }
        debug!("context created at {sample_rate} Hz");
        Ok(Self {
            sample_rate,
            voices: VoicePool::new(sample_rate as f32),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Claims a voice. `None` when the pool is exhausted.
    pub fn create_voice(&mut self) -> Option<VoiceHandle> {
        let handle = self.voices.allocate();
        match handle {
            Some(handle) => debug!("voice {} allocated", handle.raw()),
            None => debug!("voice pool exhausted"),
        }
        handle
    }

    /// Resets the voice and returns its slot to the pool.
    pub fn destroy_voice(&mut self, handle: VoiceHandle) {
        if !self.voices.release(handle) {
            trace!("destroy ignored for free voice {}", handle.raw());
        }
    }

    /// Parses `blob` and installs it on the voice. On error the voice keeps
    /// its previous instrument and playback state.
    pub fn load_instrument(&mut self, handle: VoiceHandle, blob: &[u8]) -> Result<(), LoadError> {
        self.load_instrument_with(handle, blob, SampleDataPolicy::Strict)
    }

    /// Like [`load_instrument`](Self::load_instrument), with a choice of how a
    /// PCM blob shorter than its declared sample length is handled.
    pub fn load_instrument_with(
        &mut self,
        handle: VoiceHandle,
        blob: &[u8],
        policy: SampleDataPolicy,
    ) -> Result<(), LoadError> {
        let voice = self.voices.get_mut(handle).ok_or(LoadError::BadHandle)?;
        let instrument = InstrumentData::parse_with(blob, policy)?;
        debug!("voice {} loaded {:?} instrument", handle.raw(), instrument.kind());
        voice.load(instrument);
        Ok(())
    }

    /// Installs an already decoded instrument.
    pub fn load_instrument_data(
        &mut self,
        handle: VoiceHandle,
        instrument: InstrumentData,
    ) -> Result<(), LoadError> {
        let voice = self.voices.get_mut(handle).ok_or(LoadError::BadHandle)?;
        voice.load(instrument);
        Ok(())
    }

    pub fn note_on(&mut self, handle: VoiceHandle, note: u8, velocity: u8) {
        if let Some(voice) = self.voice_mut(handle) {
            voice.note_on(note, velocity);
        }
    }

    pub fn note_off(&mut self, handle: VoiceHandle) {
        if let Some(voice) = self.voice_mut(handle) {
            voice.note_off();
        }
    }

    /// Releases every allocated voice.
    pub fn all_notes_off(&mut self) {
        for (_, voice) in self.voices.iter_mut() {
            voice.note_off();
        }
    }

    /// Renders one voice into `left` and `right`. Unknown handles render
    /// silence. Returns the number of frames the voice produced.
    pub fn render(&mut self, handle: VoiceHandle, left: &mut [f32], right: &mut [f32]) -> usize {
        match self.voices.get_mut(handle) {
            Some(voice) => voice.render(left, right),
            None => {
                let frames = left.len().min(right.len());
                left[..frames].fill(0.0);
                right[..frames].fill(0.0);
                0
            }
        }
    }

    /// Sets a normalised parameter. Unknown ids are ignored.
    pub fn set_param(&mut self, handle: VoiceHandle, id: u32, value: f32) {
        let Ok(param) = ParamId::try_from(id) else {
            trace!("set_param ignored for unknown id {id}");
            return;
        };
        if let Some(voice) = self.voice_mut(handle) {
            voice.set_param(param, value);
        }
    }

    /// Reads a normalised parameter. `None` for unknown ids or handles and for
    /// instrument parameters while no instrument is loaded.
    pub fn get_param(&self, handle: VoiceHandle, id: u32) -> Option<f32> {
        let param = ParamId::try_from(id).ok()?;
        self.voices.get(handle)?.param(param)
    }

    /// Applies every pending message and returns how many were handled.
    pub fn process_messages<R: MessageReceiver + ?Sized>(&mut self, rx: &mut R) -> usize {
        let mut handled = 0;
        while let Some(message) = rx.pop() {
            match message {
                VoiceMessage::NoteOn {
                    voice,
                    note,
                    velocity,
                } => self.note_on(voice, note, velocity),
                VoiceMessage::NoteOff { voice } => self.note_off(voice),
                VoiceMessage::SetParam {
                    voice,
                    param,
                    value,
                } => {
                    if let Some(voice) = self.voice_mut(voice) {
                        voice.set_param(param, value);
                    }
                }
                VoiceMessage::AllNotesOff => self.all_notes_off(),
            }
            handled += 1;
        }
        handled
    }

    pub fn voice(&self, handle: VoiceHandle) -> Option<&Voice> {
        self.voices.get(handle)
    }

    pub fn voices(&self) -> &VoicePool {
        &self.voices
    }

    pub fn voices_mut(&mut self) -> &mut VoicePool {
        &mut self.voices
    }

    fn voice_mut(&mut self, handle: VoiceHandle) -> Option<&mut Voice> {
        let voice = self.voices.get_mut(handle);
        if voice.is_none() {
            trace!("ignoring call for free voice {}", handle.raw());
        }
        voice
    }
}
