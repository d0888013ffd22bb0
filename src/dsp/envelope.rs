use crate::{instrument::EnvelopeParams, MAX_VOLUME};

/*
Tick-Driven ADSR Envelope
=========================

Tracker instruments shape their volume with a linear ADSR envelope that moves
once per sequencer tick (50 times a second), not once per audio sample. The
envelope never sees the sample rate: it only counts ticks.

Vocabulary
----------

  volume      Current envelope output, 0.0 to 64.0. The voice divides by 64
              when scaling audio, so 64 is full level.

  length      How many ticks a phase lasts. A zero-length attack or decay is
              skipped at note-on, so the first audible frame already has its
              level. A zero-length release completes on its first tick.

  level       The volume a phase heads towards: attack_level for Attack,
              decay_level for Decay, sustain_level while sustaining.

  elapsed     Ticks spent in the current phase. Reset on every transition.


The Shape
---------

  Volume
   64 ┐   ╱╲
      │  ╱  ╲_____________
   32 │ ╱                 ╲
      │╱                   ╲
    0 └──────────────────────→ ticks
       A   D      S        R

Each tick adds a fixed step:

    Attack   step = attack_level / attack_length
    Decay    step = (decay_level - attack_level) / decay_length
    Release  step = -sustain_level / release_length

A phase ends when the volume reaches its target OR when `elapsed` reaches the
phase length, whichever comes first. On the transition the volume snaps to the
exact target, so float rounding never leaves a phase a hair short.

Release subtracts a step computed from the sustain level, not from the volume
at note-off time. Releasing mid-attack therefore takes at most release_length
ticks and then drops to silence.


The State Machine
-----------------

    ┌─────┐ note_on ┌────────┐        ┌───────┐        ┌─────────┐
    │ Off │ ──────→ │ Attack │ ─────→ │ Decay │ ─────→ │ Sustain │
    └─────┘         └────────┘        └───────┘        └─────────┘
       ↑                 │ note_off       │ note_off      │ note_off, or
       │                 ↓                ↓               ↓ sustain_ticks
       │            ┌──────────────────────────────────────────┐
       └─────────── │                 Release                  │
          volume 0  └──────────────────────────────────────────┘

Sustain with `sustain_ticks == 0` holds until note-off. A non-zero value makes
the envelope release on its own after that many sustain ticks.
*/

/// The current phase of the envelope state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    #[default]
    Off,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Per-voice envelope runtime state. Parameters live in the instrument and are
/// passed to every tick, so live edits take effect on the next tick.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeGenerator {
    state: EnvelopeState,
    volume: f32,
    elapsed: u32,
}

impl EnvelopeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the attack phase from silence. Zero-length attack and decay
    /// phases are applied immediately instead of waiting for the first tick.
    pub fn note_on(&mut self, params: &EnvelopeParams) {
        self.enter(EnvelopeState::Attack);
        self.volume = 0.0;
        if params.attack_length == 0 {
            self.volume = f32::from(params.attack_level.min(MAX_VOLUME));
            self.enter(EnvelopeState::Decay);
            if params.decay_length == 0 {
                self.volume = f32::from(params.decay_level.min(MAX_VOLUME));
                self.enter(EnvelopeState::Sustain);
            }
        }
    }

    /// Starts the release phase unless the envelope is off or already
    /// releasing.
    pub fn note_off(&mut self) {
        if matches!(
            self.state,
            EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Sustain
        ) {
            self.enter(EnvelopeState::Release);
        }
    }

    /// Restarts the attack from silence while a note is held. Released and
    /// silent envelopes are left alone so a looping sequence cannot revive
    /// them.
    pub fn retrigger(&mut self, params: &EnvelopeParams) {
        if matches!(
            self.state,
            EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Sustain
        ) {
            self.note_on(params);
        }
    }

    /// Silences immediately.
    pub fn force_off(&mut self) {
        self.enter(EnvelopeState::Off);
        self.volume = 0.0;
    }

    /// Advances one tick and returns the state after the step.
    pub fn tick(&mut self, params: &EnvelopeParams) -> EnvelopeState {
        if self.state == EnvelopeState::Off {
            return self.state;
        }

        self.elapsed = self.elapsed.saturating_add(1);

        match self.state {
            EnvelopeState::Off => {}

            EnvelopeState::Attack => {
                let target = f32::from(params.attack_level);
                let length = params.attack_length;
                if length == 0 {
                    self.volume = target;
                } else {
                    self.volume += target / f32::from(length);
                }
                if length == 0 || self.volume >= target || self.elapsed >= u32::from(length) {
                    self.volume = target;
                    self.enter(EnvelopeState::Decay);
                }
            }

            EnvelopeState::Decay => {
                let start = f32::from(params.attack_level);
                let target = f32::from(params.decay_level);
                let length = params.decay_length;
                let step = if length == 0 {
                    target - self.volume
                } else {
                    (target - start) / f32::from(length)
                };
                self.volume += step;
                let reached = if step <= 0.0 {
                    self.volume <= target
                } else {
                    self.volume >= target
                };
                if length == 0 || reached || self.elapsed >= u32::from(length) {
                    self.volume = target;
                    self.enter(EnvelopeState::Sustain);
                }
            }

            EnvelopeState::Sustain => {
                self.volume = f32::from(params.sustain_level);
                if params.sustain_ticks > 0 && self.elapsed >= u32::from(params.sustain_ticks) {
                    self.enter(EnvelopeState::Release);
                }
            }

            EnvelopeState::Release => {
                let length = params.release_length;
                if length > 0 {
                    self.volume -= f32::from(params.sustain_level) / f32::from(length);
                }
                if length == 0 || self.volume <= 0.0 || self.elapsed >= u32::from(length) {
                    self.force_off();
                }
            }
        }

        self.volume = self.volume.clamp(0.0, f32::from(MAX_VOLUME));
        self.state
    }

    fn enter(&mut self, state: EnvelopeState) {
        self.state = state;
        self.elapsed = 0;
    }

    /// Current volume, 0.0 to 64.0.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Off
    }

    /// Back to `Off` with all counters cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(env: &mut EnvelopeGenerator, params: &EnvelopeParams, ticks: usize) -> Vec<f32> {
        (0..ticks)
            .map(|_| {
                env.tick(params);
                env.volume()
            })
            .collect()
    }

    #[test]
    fn attack_reaches_level_on_its_last_tick() {
        let params = EnvelopeParams::default();
        let mut env = EnvelopeGenerator::new();
        env.note_on(&params);

        let volumes = run(&mut env, &params, 4);
        assert_eq!(volumes, vec![16.0, 32.0, 48.0, 64.0]);
        assert_eq!(env.state(), EnvelopeState::Decay);
    }

    #[test]
    fn decay_settles_on_decay_level() {
        let params = EnvelopeParams::default();
        let mut env = EnvelopeGenerator::new();
        env.note_on(&params);
        run(&mut env, &params, 4);

        let volumes = run(&mut env, &params, 8);
        assert!(volumes.windows(2).all(|w| w[1] <= w[0]), "decay must not rise");
        assert_eq!(volumes[7], 32.0);
        assert_eq!(env.state(), EnvelopeState::Sustain);
    }

    #[test]
    fn zero_lengths_jump_instantly() {
        let params = EnvelopeParams::hold(40);
        let mut env = EnvelopeGenerator::new();
        env.note_on(&params);

        assert_eq!(env.volume(), 40.0);
        assert_eq!(env.state(), EnvelopeState::Sustain);
        env.tick(&params);
        assert_eq!(env.volume(), 40.0);
    }

    #[test]
    fn instant_attack_is_audible_before_the_first_tick() {
        let params = EnvelopeParams {
            attack_length: 0,
            attack_level: 64,
            ..EnvelopeParams::default()
        };
        let mut env = EnvelopeGenerator::new();
        env.note_on(&params);

        assert_eq!(env.volume(), 64.0);
        assert_eq!(env.state(), EnvelopeState::Decay);
    }

    #[test]
    fn release_from_attack_ends_within_release_length() {
        let params = EnvelopeParams::default();
        let mut env = EnvelopeGenerator::new();
        env.note_on(&params);
        run(&mut env, &params, 2);

        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Release);
        let volumes = run(&mut env, &params, usize::from(params.release_length));
        assert!(volumes.windows(2).all(|w| w[1] <= w[0]), "release must not rise");
        assert_eq!(env.state(), EnvelopeState::Off);
        assert_eq!(env.volume(), 0.0);
    }

    #[test]
    fn zero_release_stops_on_next_tick() {
        let params = EnvelopeParams {
            release_length: 0,
            ..EnvelopeParams::default()
        };
        let mut env = EnvelopeGenerator::new();
        env.note_on(&params);
        env.note_off();
        env.tick(&params);
        assert!(!env.is_active());
    }

    #[test]
    fn sustain_ticks_release_automatically() {
        let params = EnvelopeParams {
            sustain_ticks: 3,
            ..EnvelopeParams::hold(64)
        };
        let mut env = EnvelopeGenerator::new();
        env.note_on(&params);
        run(&mut env, &params, 2);
        assert_eq!(env.state(), EnvelopeState::Sustain);

        run(&mut env, &params, 1);
        assert_eq!(env.state(), EnvelopeState::Release);
    }

    #[test]
    fn sustain_holds_without_note_off() {
        let params = EnvelopeParams::default();
        let mut env = EnvelopeGenerator::new();
        env.note_on(&params);
        run(&mut env, &params, 10_000);
        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert_eq!(env.volume(), 32.0);
    }

    #[test]
    fn note_off_is_ignored_when_off() {
        let params = EnvelopeParams::default();
        let mut env = EnvelopeGenerator::new();
        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Off);
        env.retrigger(&params);
        assert_eq!(env.state(), EnvelopeState::Off);
    }

    #[test]
    fn retrigger_does_not_revive_a_release() {
        let params = EnvelopeParams::default();
        let mut env = EnvelopeGenerator::new();
        env.note_on(&params);
        run(&mut env, &params, 20);
        env.note_off();
        env.tick(&params);
        env.retrigger(&params);
        assert_eq!(env.state(), EnvelopeState::Release);
    }

    #[test]
    fn rising_decay_moves_up_to_its_level() {
        let params = EnvelopeParams {
            attack_length: 0,
            attack_level: 16,
            decay_length: 4,
            decay_level: 48,
            ..EnvelopeParams::default()
        };
        let mut env = EnvelopeGenerator::new();
        env.note_on(&params);
        assert_eq!(env.volume(), 16.0);

        let volumes = run(&mut env, &params, 4);
        assert_eq!(volumes, vec![24.0, 32.0, 40.0, 48.0]);
        assert_eq!(env.state(), EnvelopeState::Sustain);
    }
}
