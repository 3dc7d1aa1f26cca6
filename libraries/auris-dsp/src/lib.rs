//! Auris DSP
//!
//! Real-time correction DSP for the Auris hearing-compensation engine.
//!
//! This crate provides:
//! - Per-band peaking biquad filters (RBJ cookbook coefficients)
//! - Click-free smoothed gain stages (10 ms exponential ramp)
//! - The per-ear filter/gain chain built from the band registry
//! - The pure gain calculator mapping (loss dB, tuning %) to linear gain
//!
//! All processing operates on mono f32 sample buffers in [-1.0, 1.0] range;
//! the stereo split/merge happens one layer up, in `auris-engine`.
//!
//! # Example
//!
//! ```rust
//! use auris_core::{CorrectionSettings, Ear};
//! use auris_dsp::{band_gains, EarChannel};
//!
//! let mut settings = CorrectionSettings::default();
//! settings.ear_mut(Ear::Left).set_loss_db(1000.0, 40.0);
//!
//! let mut chain = EarChannel::new(44100);
//! chain.apply_band_gains(&band_gains(&settings.left, &settings.tuning));
//!
//! let mut block = vec![0.0f32; 512];
//! chain.process(&mut block);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod biquad;
mod ear;
mod gain;

pub use biquad::PeakingFilter;
pub use ear::{EarChannel, CORRECTION_BAND_Q};
pub use gain::{band_gains, compensation_db, db_to_linear, SmoothedGain, GAIN_RAMP_MS};
