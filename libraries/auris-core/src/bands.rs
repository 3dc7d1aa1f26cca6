//! Corrected frequency band registry
//!
//! The engine corrects a fixed, ordered set of center frequencies spanning the
//! speech-relevant range. Every other component indexes its per-band data by
//! position in this array, so iteration order is part of the contract: the
//! filter chain topology is built in exactly this order.

/// Center frequencies (Hz) of the corrected bands, low to high.
pub const CORRECTION_BAND_FREQUENCIES: [f32; 7] = [
    250.0, 500.0, 1000.0, 2000.0, 4000.0, 6000.0, 8000.0,
];

/// Number of corrected bands.
pub const BAND_COUNT: usize = CORRECTION_BAND_FREQUENCIES.len();

/// Look up the registry index of a center frequency.
///
/// Returns `None` for frequencies outside the registry.
pub fn band_index(frequency: f32) -> Option<usize> {
    CORRECTION_BAND_FREQUENCIES.iter().position(|&f| f == frequency)
}
