//! Spectrum panel
//!
//! Hann-windowed FFT of the mixed output, sampled at log-spaced frequencies
//! between 20 Hz and Nyquist.

use std::{f32::consts::TAU, sync::Arc};

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const BINS: usize = 48;
const FLOOR_DB: f64 = -100.0;
const LOWEST_HZ: f32 = 20.0;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT index read for each display bin
    indices: Vec<usize>,
    /// (frequency in Hz, level in dB)
    points: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_len: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(fft_len);
        let window = (0..fft_len)
            .map(|i| 0.5 * (1.0 - (TAU * i as f32 / (fft_len.max(2) - 1) as f32).cos()))
            .collect();

        let nyquist = (sample_rate / 2.0).max(LOWEST_HZ * 2.0);
        let last_index = (fft_len / 2).saturating_sub(1);
        let (indices, points): (Vec<usize>, Vec<(f64, f64)>) = (0..BINS)
            .map(|bin| {
                let t = bin as f32 / (BINS - 1) as f32;
                let freq = LOWEST_HZ * (nyquist / LOWEST_HZ).powf(t);
                let index = ((freq * fft_len as f32 / sample_rate).round() as usize).min(last_index);
                (index, (f64::from(freq), FLOOR_DB))
            })
            .unzip();

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_len],
            indices,
            points,
        }
    }

    /// Analyses one window of samples. Windows of the wrong length are
    /// skipped.
    pub fn update(&mut self, samples: &[f32]) {
        if samples.len() != self.window.len() {
            return;
        }
        for ((slot, &s), &w) in self.scratch.iter_mut().zip(samples).zip(&self.window) {
            *slot = Complex::new(s * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (point, &index) in self.points.iter_mut().zip(&self.indices) {
            let power = self.scratch[index].norm_sqr().max(1e-12);
            point.1 = (10.0 * f64::from(power).log10()).max(FLOOR_DB);
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    let top_hz = points.last().map_or(1.0, |&(f, _)| f);
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(" Spectrum ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([0.0, top_hz])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 40.0])
                .labels(vec!["-100", "-30", "40"])
                .style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(chart, area);
}
