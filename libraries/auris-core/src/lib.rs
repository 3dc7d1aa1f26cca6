//! Auris Core
//!
//! Platform-agnostic domain types for the Auris hearing-compensation engine.
//!
//! This crate provides the foundational building blocks shared by the DSP and
//! engine crates:
//! - **Band registry**: the fixed ordered set of corrected center frequencies
//! - **Profiles**: per-ear hearing loss and shared amplification tuning
//! - **Engine state**: the lifecycle state machine's observable states
//! - **Error handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use auris_core::{CorrectionSettings, Ear, HearingProfile};
//!
//! let mut settings = CorrectionSettings::default();
//! settings.ear_mut(Ear::Left).set_loss_db(1000.0, 40.0);
//!
//! assert_eq!(settings.ear(Ear::Left).loss_db(1000.0), 40.0);
//! assert_eq!(settings.ear(Ear::Right).loss_db(1000.0), 0.0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bands;
pub mod error;
pub mod profile;
pub mod state;

pub use bands::{band_index, BAND_COUNT, CORRECTION_BAND_FREQUENCIES};
pub use error::{CoreError, Result};
pub use profile::{CorrectionSettings, Ear, HearingProfile, TuningProfile};
pub use state::EngineState;
