//! Arpeggio stepping through a table of semitone offsets.

use crate::instrument::ArpeggioTable;

/// Position within an [`ArpeggioTable`]. Advances one entry every
/// `table.speed()` ticks and wraps at the table length.
#[derive(Debug, Clone, Default)]
pub struct Arpeggio {
    index: usize,
    counter: u8,
}

impl Arpeggio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_on(&mut self) {
        self.index = 0;
        self.counter = 0;
    }

    /// Advances one tick and returns the current offset in semitones.
    pub fn tick(&mut self, table: &ArpeggioTable) -> i8 {
        self.counter = self.counter.saturating_add(1);
        if self.counter >= table.speed() {
            self.counter = 0;
            self.index = (self.index + 1) % table.len();
        }
        table.offset(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset(&self, table: &ArpeggioTable) -> i8 {
        table.offset(self.index)
    }
}
