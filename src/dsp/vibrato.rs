//! Tick-rate sine vibrato.

/*
Vibrato
=======

A sine LFO that bends pitch by a few cents. It runs at tick rate, so its
period is counted in ticks rather than hertz:

    phase += π / speed        per tick, wrapped at 2π
    cents  = sin(phase) · depth · 0.5

A full cycle therefore takes `2 · speed` ticks, and `depth` is the peak
offset in half-cent units. After note-on the LFO waits `delay` ticks before
its phase starts moving; while waiting the offset is 0.

Speed 0 or depth 0 disables the LFO entirely and the offset is 0.
*/

use std::f32::consts::{PI, TAU};

use crate::instrument::VibratoParams;

#[derive(Debug, Clone, Default)]
pub struct Vibrato {
    delay_remaining: u8,
    phase: f32,
    cents: f32,
}

impl Vibrato {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewinds the LFO and arms the start delay.
    pub fn note_on(&mut self, params: &VibratoParams) {
        self.delay_remaining = params.delay;
        self.phase = 0.0;
        self.cents = 0.0;
    }

    /// Advances one tick and returns the pitch offset in cents.
    pub fn tick(&mut self, params: &VibratoParams) -> f32 {
        if !params.is_active() {
            self.cents = 0.0;
            return self.cents;
        }

        if self.delay_remaining > 0 {
            self.delay_remaining -= 1;
            return self.cents;
        }

        self.phase += PI / f32::from(params.speed);
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        self.cents = self.phase.sin() * f32::from(params.depth) * 0.5;
        self.cents
    }

    pub fn cents(&self) -> f32 {
        self.cents
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn delay_remaining(&self) -> u8 {
        self.delay_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_depth_never_bends() {
        let params = VibratoParams {
            delay: 0,
            speed: 4,
            depth: 0,
        };
        let mut vibrato = Vibrato::new();
        vibrato.note_on(&params);
        for _ in 0..100 {
            assert_eq!(vibrato.tick(&params), 0.0);
        }
    }

    #[test]
    fn delay_holds_phase_still() {
        let params = VibratoParams {
            delay: 3,
            speed: 2,
            depth: 20,
        };
        let mut vibrato = Vibrato::new();
        vibrato.note_on(&params);

        for _ in 0..3 {
            assert_eq!(vibrato.tick(&params), 0.0);
            assert_eq!(vibrato.phase(), 0.0);
        }
        // speed 2: a quarter cycle per tick, so the first step lands on the peak
        assert_abs_diff_eq!(vibrato.tick(&params), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn cycle_lasts_twice_speed_ticks() {
        let params = VibratoParams {
            delay: 0,
            speed: 8,
            depth: 40,
        };
        let mut vibrato = Vibrato::new();
        vibrato.note_on(&params);

        let offsets: Vec<f32> = (0..32).map(|_| vibrato.tick(&params)).collect();
        for (a, b) in offsets.iter().zip(&offsets[16..]) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }
        assert!(offsets.iter().all(|c| c.abs() <= 20.0 + 1e-4));
        assert!(vibrato.phase() < TAU);
    }
}
