//! Voice status panel: one gauge row per voice plus output levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracker_voice::{dsp::EnvelopeState, MAX_VOLUME};

use super::state::{VoiceSnapshot, VoiceStatus};

const GAUGE_WIDTH: usize = 16;
const NOTE_NAMES: [&str; 12] = [
    "C-", "C#", "D-", "D#", "E-", "F-", "F#", "G-", "G#", "A-", "A#", "B-",
];

/// Peak and RMS of the most recent output window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        let rms = (buffer.iter().map(|&s| s * s).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Tracker-style note name, `C-4` for note 48.
pub fn note_name(note: u8) -> String {
    format!("{}{}", NOTE_NAMES[usize::from(note % 12)], note / 12)
}

fn state_color(state: EnvelopeState) -> Color {
    match state {
        EnvelopeState::Off => Color::DarkGray,
        EnvelopeState::Attack => Color::LightRed,
        EnvelopeState::Decay => Color::LightYellow,
        EnvelopeState::Sustain => Color::LightGreen,
        EnvelopeState::Release => Color::LightBlue,
    }
}

fn voice_line(index: usize, voice: &VoiceStatus) -> Line<'static> {
    let filled = ((voice.level / f32::from(MAX_VOLUME)) * GAUGE_WIDTH as f32).round() as usize;
    let gauge = format!(
        "{}{}",
        "█".repeat(filled.min(GAUGE_WIDTH)),
        "·".repeat(GAUGE_WIDTH - filled.min(GAUGE_WIDTH))
    );
    let note = if voice.active {
        note_name(voice.note)
    } else {
        "---".to_string()
    };
    let color = state_color(voice.state);

    Line::from(vec![
        Span::styled(format!(" {index} "), Style::default().fg(Color::White)),
        Span::styled(format!("{note} "), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{:<8}", format!("{:?}", voice.state)), Style::default().fg(color)),
        Span::styled(gauge, Style::default().fg(color)),
        Span::styled(
            format!(" {:>4.1}  arp {:>2}  seq {:>2}", voice.level, voice.arpeggio_index, voice.sequencer_step),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

pub fn render_voices(
    frame: &mut Frame,
    area: Rect,
    snapshot: &VoiceSnapshot,
    stats: &AudioStats,
    sample_rate: u32,
    octave: u8,
) {
    let title = format!(
        " tracker-voice  {:.1} kHz  octave {octave}  {} active  peak {:.2} rms {:.2} ",
        sample_rate as f32 / 1000.0,
        snapshot.active_count(),
        stats.peak,
        stats.rms,
    );
    let lines: Vec<Line> = snapshot
        .voices
        .iter()
        .enumerate()
        .map(|(i, voice)| voice_line(i, voice))
        .collect();

    let paragraph = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_a_square() {
        let stats = AudioStats::from_buffer(&[0.5, -0.5, 0.5, -0.5]);
        assert_eq!(stats.peak, 0.5);
        assert_eq!(stats.rms, 0.5);
        assert_eq!(AudioStats::from_buffer(&[]).peak, 0.0);
    }

    #[test]
    fn note_names_follow_tracker_notation() {
        assert_eq!(note_name(48), "C-4");
        assert_eq!(note_name(61), "C#5");
        assert_eq!(note_name(0), "C-0");
    }
}
