//! Auris Engine
//!
//! Lifecycle, device I/O, and stereo routing for the Auris
//! hearing-compensation engine.
//!
//! The engine owns the state machine (Stopped → Starting → Running, with
//! Error/PermissionDenied on failure), acquires the microphone through an
//! injected [`AudioBackend`], fans the downmixed mono feed into one
//! correction chain per ear, and merges them into the stereo output. All
//! control-plane operations travel to the audio callback through a bounded
//! command queue; nothing on the control thread ever blocks the real-time
//! path.
//!
//! # Example
//!
//! ```no_run
//! use auris_core::{CorrectionSettings, Ear, EngineState};
//! use auris_engine::{CpalBackend, EngineConfig, HearingEngine};
//!
//! let mut engine = HearingEngine::new(Box::new(CpalBackend::new()), EngineConfig::default());
//!
//! let mut settings = CorrectionSettings::default();
//! settings.ear_mut(Ear::Left).set_loss_db(1000.0, 40.0);
//! engine.on_settings_changed(&settings);
//!
//! if engine.start() == EngineState::Running {
//!     engine.set_ear_enabled(Ear::Right, false);
//!     let _waveform = engine.analysis_snapshot();
//!     engine.stop();
//! } else if let Some(detail) = engine.last_error() {
//!     eprintln!("could not start: {detail}");
//! }
//! ```

mod backend;
mod capture;
mod command;
mod config;
mod engine;
mod error;
mod processor;
mod tap;
pub mod testing;

pub use backend::{ActiveStream, AudioBackend, SessionParams};
pub use capture::CpalBackend;
pub use command::EngineCommand;
pub use config::EngineConfig;
pub use engine::HearingEngine;
pub use error::{EngineError, Result};
pub use processor::{downmix_to_mono, CorrectionProcessor};
pub use tap::AnalysisTap;
