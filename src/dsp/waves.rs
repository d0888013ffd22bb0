//! Built-in wavetables shared by every wavetable instrument.
//!
//! The 47 waves are the fixed Future Composer 1.3 set: signed 8-bit samples of
//! varying length, stored back to back in one immutable table. Instruments
//! refer to them by index only, so they never need to own wave data.

/// Number of built-in waves. Wave indices at or above this are invalid.
pub const WAVE_COUNT: usize = 47;

/// Length in samples of each built-in wave.
#[rustfmt::skip]
pub const WAVE_LENGTHS: [usize; WAVE_COUNT] = [
    32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32,
    32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32,
    16, 16, 16, 16, 16, 16, 16, 16,
    32, 16, 32, 32, 16, 16, 48,
];

const WAVE_OFFSETS: [usize; WAVE_COUNT] = wave_offsets();

const fn wave_offsets() -> [usize; WAVE_COUNT] {
    let mut offsets = [0; WAVE_COUNT];
    let mut i = 1;
    while i < WAVE_COUNT {
        offsets[i] = offsets[i - 1] + WAVE_LENGTHS[i - 1];
        i += 1;
    }
    offsets
}

const WAVE_DATA_LEN: usize = WAVE_OFFSETS[WAVE_COUNT - 1] + WAVE_LENGTHS[WAVE_COUNT - 1];

#[rustfmt::skip]
static WAVE_DATA: [i8; WAVE_DATA_LEN] = [
    // 0..=15: triangles with a growing flat notch
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    63, 55, 47, 39, 31, 23, 15, 7, -1, 7, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, 55, 47, 39, 31, 23, 15, 7, -1, 7, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, 47, 39, 31, 23, 15, 7, -1, 7, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, 39, 31, 23, 15, 7, -1, 7, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, 31, 23, 15, 7, -1, 7, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, 23, 15, 7, -1, 7, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, -104, 15, 7, -1, 7, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, -104, -112, 7, -1, 7, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, -104, -112, -120, -1, 7, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, -104, -112, -120, -128, 7, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, -104, -112, -120, -128, -120, 15, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, -104, -112, -120, -128, -120, -112, 23, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, -104, -112, -120, -128, -120, -112, -104, 31, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, -104, -112, -120, -128, -120, -112, -104, -96, 39, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, -104, -112, -120, -128, -120, -112, -104, -96, -88, 47, 55,
    -64, -64, -48, -40, -32, -24, -16, -8, 0, -8, -16, -24, -32, -40, -48, -56,
    -64, -72, -80, -88, -96, -104, -112, -120, -128, -120, -112, -104, -96, -88, -80, 55,
    // 16..=31: pulse widths
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, -127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, -127, -127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, -127, -127, -127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, -127, -127, -127, -127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, -127, -127, -127, -127, -127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, -127, -127, -127, -127, -127, -127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, -127, -127, -127, -127, -127, -127, -127, 127, 127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, 127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, 127, 127, 127, 127, 127, 127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
    -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, 127, 127, 127, 127, 127,
    -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128,
    -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, 127, 127, 127,
    -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128,
    -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, 127, 127,
    -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128,
    -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, 127,
    -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128,
    -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, 127,
    // 32..=39: short pulses
    -128, -128, -128, -128, -128, -128, -128, -128, 127, 127, 127, 127, 127, 127, 127, 127,
    -128, -128, -128, -128, -128, -128, -128, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -128, -128, -128, -128, -128, -128, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -128, -128, -128, -128, -128, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -128, -128, -128, -128, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -128, -128, -128, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -128, -128, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    -128, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
    // 40: saw, 41: short saw
    -128, -128, -112, -104, -96, -88, -80, -72, -64, -56, -48, -40, -32, -24, -16, -8,
    0, 8, 16, 24, 32, 40, 48, 56, 64, 72, 80, 88, 96, 104, 112, 127,
    -128, -96, -80, -64, -48, -32, -16, 0, 16, 32, 48, 64, 80, 96, 112, 127,
    // 42, 43: sampled-style shapes
    69, 69, 121, 125, 122, 119, 112, 102, 97, 88, 83, 77, 44, 32, 24, 18,
    4, -37, -45, -51, -58, -68, -75, -82, -88, -93, -99, -103, -109, -114, -117, -118,
    69, 69, 121, 125, 122, 119, 112, 102, 91, 75, 67, 55, 44, 32, 24, 18,
    4, -8, -24, -37, -49, -58, -66, -80, -88, -92, -98, -102, -107, -108, -115, -125,
    // 44, 45: short triangles
    0, 0, 64, 96, 127, 96, 64, 32, 0, -32, -64, -96, -128, -96, -64, -32,
    0, 0, 64, 96, 127, 96, 64, 32, 0, -32, -64, -96, -128, -96, -64, -32,
    // 46: saw followed by short saw
    -128, -128, -112, -104, -96, -88, -80, -72, -64, -56, -48, -40, -32, -24, -16, -8,
    0, 8, 16, 24, 32, 40, 48, 56, 64, 72, 80, 88, 96, 104, 112, 127,
    -128, -96, -80, -64, -48, -32, -16, 0, 16, 32, 48, 64, 80, 96, 112, 127,
];

/// Returns the samples of a built-in wave, or `None` for an out-of-range index.
pub fn waveform(index: usize) -> Option<&'static [i8]> {
    let len = *WAVE_LENGTHS.get(index)?;
    let start = WAVE_OFFSETS[index];
    WAVE_DATA.get(start..start + len)
}

/// Length of a built-in wave. Out-of-range indices fall back to wave 0.
pub fn wave_length(index: usize) -> usize {
    WAVE_LENGTHS.get(index).copied().unwrap_or(WAVE_LENGTHS[0])
}

/// Whether `index` names a built-in wave.
pub fn is_valid_wave(index: u8) -> bool {
    (index as usize) < WAVE_COUNT
}
