//! Pitch modulation applied once per tick: vibrato, then arpeggio.

use super::{arpeggio::Arpeggio, vibrato::Vibrato};
use crate::instrument::{ArpeggioTable, VibratoParams};

/// Combined pitch offset handed to the oscillator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PitchOffset {
    pub semitones: i8,
    pub cents: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ModulationUnit {
    vibrato: Vibrato,
    arpeggio: Arpeggio,
    offset: PitchOffset,
}

impl ModulationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_on(&mut self, vibrato: &VibratoParams, arpeggio: &ArpeggioTable) {
        self.vibrato.note_on(vibrato);
        self.arpeggio.note_on();
        self.offset = PitchOffset {
            semitones: self.arpeggio.offset(arpeggio),
            cents: 0.0,
        };
    }

    pub fn tick(&mut self, vibrato: &VibratoParams, arpeggio: &ArpeggioTable) -> PitchOffset {
        let cents = self.vibrato.tick(vibrato);
        let semitones = self.arpeggio.tick(arpeggio);
        self.offset = PitchOffset { semitones, cents };
        self.offset
    }

    pub fn offset(&self) -> PitchOffset {
        self.offset
    }

    pub fn arpeggio_index(&self) -> usize {
        self.arpeggio.index()
    }
}
