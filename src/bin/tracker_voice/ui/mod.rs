//! Terminal UI for live auditioning
//!
//! The computer keyboard acts as a two-octave tracker keyboard. Each key
//! press takes the next voice in round-robin order; terminals that report
//! key releases also release the matching voice.

pub mod state;
mod spectrum;
mod voices;
mod waveform;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use tracker_voice::{
    synth::{VoiceHandle, VoiceMessage},
    MAX_NOTE,
};

use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::VoiceSnapshot;
use voices::{render_voices, AudioStats};
use waveform::render_waveform;

/// Samples kept for the scope and the FFT window
pub const VIS_BUFFER_SIZE: usize = 1024;

const LOWER_ROW: &str = "zsxdcvgbhnjm";
const UPPER_ROW: &str = "q2w3er5t6y7u";
const MAX_OCTAVE: u8 = 9;

/// Semitone offset of a keyboard key from the current octave's C.
fn key_offset(key: char) -> Option<u8> {
    LOWER_ROW
        .find(key)
        .or_else(|| UPPER_ROW.find(key).map(|i| i + 12))
        .map(|i| i as u8)
}

pub struct UiApp {
    msg_tx: Producer<VoiceMessage>,
    audio_rx: Consumer<f32>,
    snapshot_rx: Consumer<VoiceSnapshot>,
    voices: Vec<VoiceHandle>,
    /// Key currently holding each voice, parallel to `voices`
    held: Vec<Option<char>>,
    next_voice: usize,
    octave: u8,
    velocity: u8,
    sample_rate: u32,
    snapshot: VoiceSnapshot,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        msg_tx: Producer<VoiceMessage>,
        audio_rx: Consumer<f32>,
        snapshot_rx: Consumer<VoiceSnapshot>,
        voices: Vec<VoiceHandle>,
        sample_rate: u32,
        octave: u8,
        velocity: u8,
    ) -> Self {
        let held = vec![None; voices.len()];
        Self {
            msg_tx,
            audio_rx,
            snapshot_rx,
            voices,
            held,
            next_voice: 0,
            octave: octave.min(MAX_OCTAVE),
            velocity,
            sample_rate,
            snapshot: VoiceSnapshot::default(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate as f32),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_snapshots();

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    match key.kind {
                        KeyEventKind::Press => self.handle_press(key.code),
                        KeyEventKind::Release => self.handle_release(key.code),
                        KeyEventKind::Repeat => {}
                    }
                }
            }
        }
        self.send(VoiceMessage::AllNotesOff);
        Ok(())
    }

    /// Keeps the newest `VIS_BUFFER_SIZE` samples.
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(..excess);
        }
        if received {
            self.spectrum.update(&self.audio_buffer);
        }
    }

    fn poll_snapshots(&mut self) {
        while let Ok(snapshot) = self.snapshot_rx.pop() {
            self.snapshot = snapshot;
        }
    }

    fn send(&mut self, message: VoiceMessage) {
        if self.msg_tx.push(message).is_err() {
            log::warn!("control ring full, dropped {message:?}");
        }
    }

    fn handle_press(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                self.held.fill(None);
                self.send(VoiceMessage::AllNotesOff);
            }
            KeyCode::Char('-') => self.octave = self.octave.saturating_sub(1),
            KeyCode::Char('=') | KeyCode::Char('+') => {
                self.octave = (self.octave + 1).min(MAX_OCTAVE)
            }
            KeyCode::Char(c) => {
                let key = c.to_ascii_lowercase();
                if let Some(offset) = key_offset(key) {
                    self.play(key, offset);
                }
            }
            _ => {}
        }
    }

    fn handle_release(&mut self, code: KeyCode) {
        let KeyCode::Char(c) = code else {
            return;
        };
        let key = c.to_ascii_lowercase();
        for i in 0..self.voices.len() {
            if self.held[i] == Some(key) {
                self.held[i] = None;
                let voice = self.voices[i];
                self.send(VoiceMessage::NoteOff { voice });
            }
        }
    }

    fn play(&mut self, key: char, offset: u8) {
        if self.voices.is_empty() {
            return;
        }
        let note = (u16::from(self.octave) * 12 + u16::from(offset)).min(u16::from(MAX_NOTE)) as u8;
        let slot = self.next_voice;
        self.next_voice = (self.next_voice + 1) % self.voices.len();
        self.held[slot] = Some(key);
        let voice = self.voices[slot];
        self.send(VoiceMessage::NoteOn {
            voice,
            note,
            velocity: self.velocity,
        });
    }

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.snapshot.voices.len() as u16 + 2),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(frame.area());
        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_voices(
            frame,
            rows[0],
            &self.snapshot,
            &stats,
            self.sample_rate,
            self.octave,
        );
        render_waveform(frame, scopes[0], &self.audio_buffer);
        render_spectrum(frame, scopes[1], self.spectrum.points());

        let help = Paragraph::new(" [z..m / q..u] Notes  [-/=] Octave  [Space] Release all  [Esc] Quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    fn app() -> (UiApp, Consumer<VoiceMessage>) {
        let (msg_tx, msg_rx) = RingBuffer::new(16);
        let (_, audio_rx) = RingBuffer::new(16);
        let (_, snapshot_rx) = RingBuffer::new(4);
        let voices = (0..3).filter_map(VoiceHandle::from_raw).collect();
        (
            UiApp::new(msg_tx, audio_rx, snapshot_rx, voices, 44_100, 4, 100),
            msg_rx,
        )
    }

    #[test]
    fn keyboard_rows_cover_two_octaves() {
        assert_eq!(key_offset('z'), Some(0));
        assert_eq!(key_offset('m'), Some(11));
        assert_eq!(key_offset('q'), Some(12));
        assert_eq!(key_offset('u'), Some(23));
        assert_eq!(key_offset('a'), None);
    }

    #[test]
    fn presses_rotate_through_voices() {
        let (mut app, mut rx) = app();
        for key in ['z', 'x', 'c', 'v'] {
            app.handle_press(KeyCode::Char(key));
        }
        let voices: Vec<i32> = std::iter::from_fn(|| rx.pop().ok())
            .map(|message| match message {
                VoiceMessage::NoteOn { voice, .. } => voice.raw(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(voices, vec![0, 1, 2, 0]);
    }

    #[test]
    fn release_stops_the_voice_holding_the_key() {
        let (mut app, mut rx) = app();
        app.handle_press(KeyCode::Char('q'));
        assert_eq!(
            rx.pop().unwrap(),
            VoiceMessage::NoteOn {
                voice: VoiceHandle::from_raw(0).unwrap(),
                note: 60,
                velocity: 100
            }
        );
        app.handle_release(KeyCode::Char('q'));
        assert_eq!(
            rx.pop().unwrap(),
            VoiceMessage::NoteOff {
                voice: VoiceHandle::from_raw(0).unwrap()
            }
        );
    }
}
