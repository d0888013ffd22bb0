// Purpose: Voice state machines, the voice pool, and the host-facing context
// This layer sits above the dsp primitives and owns all per-note state

pub mod context;
pub mod message;
pub mod params;
pub mod pool;
pub mod voice;

pub use context::Context;
pub use message::{MessageReceiver, VoiceMessage};
pub use params::ParamId;
pub use pool::{VoiceHandle, VoicePool};
pub use voice::Voice;
