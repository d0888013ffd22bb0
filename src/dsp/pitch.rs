//! Note and cent conversions.

/// MIDI note of A4, the tuning reference.
pub const REFERENCE_NOTE: f32 = 69.0;
/// Frequency of A4 in Hz.
pub const REFERENCE_FREQUENCY: f32 = 440.0;

/// Equal-tempered frequency of a (possibly fractional) MIDI note.
///
/// ```
/// use tracker_voice::dsp::pitch::note_to_frequency;
/// assert!((note_to_frequency(69.0) - 440.0).abs() < 1e-3);
/// assert!((note_to_frequency(81.0) - 880.0).abs() < 1e-3);
/// ```
#[inline]
pub fn note_to_frequency(note: f32) -> f32 {
    REFERENCE_FREQUENCY * 2.0_f32.powf((note - REFERENCE_NOTE) / 12.0)
}

/// Frequency ratio for an offset in cents.
///
/// ```
/// use tracker_voice::dsp::pitch::cents_to_ratio;
/// assert_eq!(cents_to_ratio(0.0), 1.0);
/// assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-6);
/// ```
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    2.0_f32.powf(cents / 1200.0)
}
