#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use super::{params::ParamId, pool::VoiceHandle};

/// Control events sent to the thread that owns a [`Context`](super::Context).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceMessage {
    NoteOn {
        voice: VoiceHandle,
        note: u8,
        velocity: u8,
    },
    NoteOff {
        voice: VoiceHandle,
    },
    SetParam {
        voice: VoiceHandle,
        param: ParamId,
        value: f32,
    },
    AllNotesOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<VoiceMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        Consumer::pop(self).ok()
    }
}
